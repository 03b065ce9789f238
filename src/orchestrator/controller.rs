//! The stage controller: owns the session, routes each advance request to
//! the gate for the current stage, and handles reset-to-start.

use crate::errors::LookupError;
use crate::gates;
use crate::registry::{IdentityRegistry, VehicleRegistry};
use crate::session::{FormInput, Session, Stage};

/// Orchestrates one lookup interaction over the two registry collaborators.
///
/// The orchestrator owns the [`Session`] exclusively; the presentation
/// layer reads state through [`Orchestrator::session`] and mutates it only
/// through the gate operations, [`Orchestrator::input_mut`] and
/// [`Orchestrator::reset`].
pub struct Orchestrator<I, V> {
    session: Session,
    identity_registry: I,
    vehicle_registry: V,
}

impl<I, V> Orchestrator<I, V>
where
    I: IdentityRegistry,
    V: VehicleRegistry,
{
    pub fn new(identity_registry: I, vehicle_registry: V) -> Self {
        Self {
            session: Session::new(),
            identity_registry,
            vehicle_registry,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn input_mut(&mut self) -> &mut FormInput {
        self.session.input_mut()
    }

    /// Stage-1 gate: see [`gates::verify_identity`].
    pub async fn verify_identity(&mut self) -> Result<(), LookupError> {
        gates::verify_identity(&mut self.session, &self.identity_registry).await
    }

    /// Stage-2 gate: see [`gates::resolve_vehicle`].
    pub async fn resolve_vehicle(&mut self) -> Result<(), LookupError> {
        gates::resolve_vehicle(&mut self.session, &self.vehicle_registry).await
    }

    /// Route an advance request to the gate for the current stage. At the
    /// result stage this is a no-op; the session is terminal until reset.
    pub async fn advance(&mut self) -> Result<(), LookupError> {
        match self.session.stage() {
            Stage::Identity => self.verify_identity().await,
            Stage::Vehicle => self.resolve_vehicle().await,
            Stage::Result => Ok(()),
        }
    }

    /// Start over: the session returns to its initial state.
    pub fn reset(&mut self) {
        self.session.reset();
    }
}
