//! Interactive three-stage lookup — `consulta lookup`.
//!
//! Walks the user through the flow of the legacy unified-lookup form:
//! credentials first, plate only after the taxpayer is confirmed, results
//! at the end with a "new query" loop. Recovery follows the error
//! taxonomy: validation and remote failures re-prompt the same stage,
//! while an eligibility rejection asks for different credentials.

use anyhow::Result;
use dialoguer::{Confirm, Input, theme::ColorfulTheme};

use consulta::config::Config;
use consulta::errors::ErrorKind;
use consulta::history::HistoryLog;
use consulta::orchestrator::Orchestrator;
use consulta::registry::{
    AntClient, IdentityRegistry, MockRegistry, SriClient, VehiclePointsResolver, VehicleRegistry,
};
use consulta::session::Stage;
use consulta::ui::LookupUI;

pub async fn cmd_lookup(config: &Config) -> Result<()> {
    let ui = LookupUI::new(config.verbose);

    if config.mock {
        ui.note("using offline mock registries");
        let mut orch = Orchestrator::new(MockRegistry::new(), MockRegistry::new());
        run_flow(&mut orch, config, &ui).await
    } else {
        let sri = SriClient::new(config.toml.sri.base_url.clone(), config.timeout())?;
        let ant = AntClient::new(
            config.toml.ant.base_url.clone(),
            config.cache_ttl(),
            config.timeout(),
        )?;
        let resolver = VehiclePointsResolver::new(sri.clone(), ant);
        let mut orch = Orchestrator::new(sri, resolver);
        run_flow(&mut orch, config, &ui).await
    }
}

async fn run_flow<I, V>(
    orch: &mut Orchestrator<I, V>,
    config: &Config,
    ui: &LookupUI,
) -> Result<()>
where
    I: IdentityRegistry,
    V: VehicleRegistry,
{
    let history = HistoryLog::new(config.history_file.clone());
    ui.banner();

    loop {
        if !identity_stage(orch, ui).await? {
            return Ok(());
        }
        if !vehicle_stage(orch, ui).await? {
            return Ok(());
        }

        ui.stage_header(Stage::Result);
        let session = orch.session();
        if let (Some(vehicle), Some(points)) = (session.vehicle(), session.points()) {
            ui.print_result(vehicle, points);
            history.append(&session.input().tax_id, &vehicle.plate, points)?;
        }

        let again = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("New query?")
            .default(false)
            .interact()?;
        if !again {
            return Ok(());
        }
        orch.reset();
    }
}

/// Run the identity stage until it passes. Returns `false` when the user
/// gives up instead.
async fn identity_stage<I, V>(orch: &mut Orchestrator<I, V>, ui: &LookupUI) -> Result<bool>
where
    I: IdentityRegistry,
    V: VehicleRegistry,
{
    loop {
        ui.stage_header(Stage::Identity);

        let email: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Email")
            .allow_empty(true)
            .interact_text()?;
        let ruc: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("RUC (natural person)")
            .allow_empty(true)
            .interact_text()?;
        let input = orch.input_mut();
        input.email = email;
        input.tax_id = ruc;

        let spinner = ui.spinner("Verifying taxpayer with SRI...");
        let outcome = orch.verify_identity().await;
        spinner.finish_and_clear();

        match outcome {
            Ok(()) => {
                if let Some(contribuyente) = orch.session().identity() {
                    ui.identity_confirmed(contribuyente);
                }
                return Ok(true);
            }
            Err(err) => {
                ui.failure(&err.to_string());
                let hint = match err.kind() {
                    ErrorKind::Validation => "Both email and RUC are required.",
                    ErrorKind::BusinessRule => {
                        "Only valid natural-person taxpayers can continue; use different credentials."
                    }
                    ErrorKind::RemoteService => {
                        "The registry did not answer; the same credentials can be retried."
                    }
                };
                println!("    {}", console::style(hint).dim());
                if !try_again()? {
                    return Ok(false);
                }
            }
        }
    }
}

/// Run the vehicle stage until it passes. Returns `false` when the user
/// gives up instead.
async fn vehicle_stage<I, V>(orch: &mut Orchestrator<I, V>, ui: &LookupUI) -> Result<bool>
where
    I: IdentityRegistry,
    V: VehicleRegistry,
{
    loop {
        ui.stage_header(Stage::Vehicle);

        let plate: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Plate")
            .allow_empty(true)
            .interact_text()?;
        orch.input_mut().plate = plate;

        let spinner = ui.spinner("Resolving vehicle and points...");
        let outcome = orch.resolve_vehicle().await;
        spinner.finish_and_clear();

        match outcome {
            Ok(()) => return Ok(true),
            Err(err) => {
                ui.failure(&err.to_string());
                if !try_again()? {
                    return Ok(false);
                }
            }
        }
    }
}

fn try_again() -> Result<bool> {
    Ok(Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("Try again?")
        .default(true)
        .interact()?)
}
