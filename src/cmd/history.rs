//! Lookup history — `consulta history` and `consulta reset`.

use anyhow::Result;
use console::style;
use dialoguer::{Confirm, theme::ColorfulTheme};

use consulta::config::Config;
use consulta::history::HistoryLog;

pub fn cmd_history(config: &Config) -> Result<()> {
    let log = HistoryLog::new(config.history_file.clone());
    let entries = log.entries()?;

    if entries.is_empty() {
        println!("No lookups recorded.");
        return Ok(());
    }

    println!("{} lookup(s):", entries.len());
    for entry in entries {
        println!(
            "  {}  {:<13}  {:<9}  {:>2} pts  {}",
            style(entry.timestamp.format("%Y-%m-%d %H:%M")).dim(),
            entry.tax_id,
            entry.plate,
            entry.points,
            style(entry.provenance).dim(),
        );
    }
    Ok(())
}

pub fn cmd_reset(config: &Config, force: bool) -> Result<()> {
    let log = HistoryLog::new(config.history_file.clone());

    if log.entries()?.is_empty() {
        println!("History is already empty.");
        return Ok(());
    }

    if !force {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Clear the lookup history?")
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    log.clear()?;
    println!("History cleared.");
    Ok(())
}
