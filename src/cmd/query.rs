//! One-shot scripted lookup — `consulta query`.
//!
//! Runs the full verification chain non-interactively. The process exits
//! non-zero when any gate fails, so the command composes in scripts.

use anyhow::Result;

use consulta::config::Config;
use consulta::history::HistoryLog;
use consulta::orchestrator::Orchestrator;
use consulta::registry::{
    AntClient, IdentityRegistry, MockRegistry, SriClient, VehiclePointsResolver, VehicleRegistry,
};
use consulta::ui::LookupUI;

pub async fn cmd_query(config: &Config, email: &str, ruc: &str, plate: &str) -> Result<()> {
    let ui = LookupUI::new(config.verbose);

    if config.mock {
        ui.note("using offline mock registries");
        let mut orch = Orchestrator::new(MockRegistry::new(), MockRegistry::new());
        run_query(&mut orch, config, &ui, email, ruc, plate).await
    } else {
        let sri = SriClient::new(config.toml.sri.base_url.clone(), config.timeout())?;
        let ant = AntClient::new(
            config.toml.ant.base_url.clone(),
            config.cache_ttl(),
            config.timeout(),
        )?;
        let resolver = VehiclePointsResolver::new(sri.clone(), ant);
        let mut orch = Orchestrator::new(sri, resolver);
        run_query(&mut orch, config, &ui, email, ruc, plate).await
    }
}

async fn run_query<I, V>(
    orch: &mut Orchestrator<I, V>,
    config: &Config,
    ui: &LookupUI,
    email: &str,
    ruc: &str,
    plate: &str,
) -> Result<()>
where
    I: IdentityRegistry,
    V: VehicleRegistry,
{
    let input = orch.input_mut();
    input.email = email.to_string();
    input.tax_id = ruc.to_string();
    input.plate = plate.to_string();

    let spinner = ui.spinner("Verifying taxpayer with SRI...");
    let outcome = orch.verify_identity().await;
    spinner.finish_and_clear();
    if let Err(err) = outcome {
        ui.failure(&err.to_string());
        anyhow::bail!("lookup failed: {}", err);
    }
    if let Some(contribuyente) = orch.session().identity() {
        ui.identity_confirmed(contribuyente);
    }

    let spinner = ui.spinner("Resolving vehicle and points...");
    let outcome = orch.resolve_vehicle().await;
    spinner.finish_and_clear();
    if let Err(err) = outcome {
        ui.failure(&err.to_string());
        anyhow::bail!("lookup failed: {}", err);
    }

    let session = orch.session();
    if let (Some(vehicle), Some(points)) = (session.vehicle(), session.points()) {
        ui.print_result(vehicle, points);
        HistoryLog::new(config.history_file.clone()).append(
            &session.input().tax_id,
            &vehicle.plate,
            points,
        )?;
    }

    Ok(())
}
