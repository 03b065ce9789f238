//! Terminal presentation for the three-stage lookup flow.
//!
//! Styled output via `console`, spinners via `indicatif`. Everything here
//! is read-only with respect to the session: the UI renders what the
//! orchestrator exposes and never drives state itself.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::registry::{Contribuyente, PuntosLicencia, Vehiculo};
use crate::session::Stage;

pub struct LookupUI {
    verbose: bool,
}

impl LookupUI {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub fn banner(&self) {
        println!();
        println!("  {}", style("Consulta Unificada").bold().cyan());
        println!("  {}", style("SRI taxpayer registry + ANT points").dim());
        println!();
    }

    /// Three-segment progress row, filled up to the current stage.
    pub fn stage_header(&self, stage: Stage) {
        let segments: String = (0..3)
            .map(|i| {
                if i <= stage.index() {
                    format!("{} ", style("██").cyan())
                } else {
                    format!("{} ", style("██").black().bright())
                }
            })
            .collect();
        let label = match stage {
            Stage::Identity => "Step 1/3 — taxpayer verification",
            Stage::Vehicle => "Step 2/3 — vehicle and points",
            Stage::Result => "Step 3/3 — results",
        };
        println!("  {} {}", segments, style(label).bold());
        println!();
    }

    /// Spinner shown while a registry call is outstanding. The caller
    /// finishes it on resumption, success or failure.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("  {spinner} {msg}")
                .expect("progress bar template is a valid static string"),
        );
        bar.set_message(msg.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        bar
    }

    pub fn success(&self, msg: &str) {
        println!("  {} {}", style("✓").green().bold(), msg);
    }

    pub fn failure(&self, msg: &str) {
        println!("  {} {}", style("✗").red().bold(), style(msg).red());
    }

    pub fn note(&self, msg: &str) {
        if self.verbose {
            println!("    {} {}", style("→").dim(), style(msg).dim());
        }
    }

    pub fn identity_confirmed(&self, contribuyente: &Contribuyente) {
        println!();
        println!(
            "  {} {}",
            style("✓").green().bold(),
            style("Taxpayer verified").green().bold()
        );
        println!("    {}", contribuyente.name);
        println!();
    }

    pub fn print_result(&self, vehicle: &Vehiculo, points: &PuntosLicencia) {
        println!();
        println!("  {}", style("Vehicle information").bold().underlined());
        println!("    {:<8} {}", style("Plate").dim(), vehicle.plate);
        println!("    {:<8} {}", style("Brand").dim(), vehicle.brand);
        println!("    {:<8} {}", style("Model").dim(), vehicle.model);
        println!("    {:<8} {}", style("Year").dim(), vehicle.year);
        println!();
        println!("  {}", style("Licence points (ANT)").bold().underlined());
        println!("    {}", style(points.total).bold().cyan());
        println!("    {}", style(&points.status).dim());
        println!();
    }
}
