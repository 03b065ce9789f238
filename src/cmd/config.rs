//! Configuration inspection — `consulta config show|init`.

use anyhow::{Context, Result};

use consulta::config::{CONFIG_FILE, Config, ConsultaToml};

use super::super::ConfigCommands;

pub fn cmd_config(config: &Config, command: Option<ConfigCommands>) -> Result<()> {
    match command.unwrap_or(ConfigCommands::Show) {
        ConfigCommands::Show => {
            let rendered = toml::to_string_pretty(&config.toml)
                .context("Failed to render effective configuration")?;
            println!("# effective configuration (file + environment)");
            print!("{}", rendered);
        }
        ConfigCommands::Init => {
            let path = config.project_dir.join(CONFIG_FILE);
            if path.exists() {
                println!("{} already exists.", path.display());
                return Ok(());
            }
            ConsultaToml::write_default(&path)?;
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}
