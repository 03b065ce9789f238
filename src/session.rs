//! Session state for one lookup interaction.
//!
//! A [`Session`] is the single mutable record behind the three-stage flow:
//! the form input, the fetched results, the current stage, the loading flag
//! and the last-error slot. One session exists per user interaction and it
//! is owned exclusively by its orchestrator; there is no shared or global
//! state.

use crate::errors::LookupError;
use crate::registry::{Contribuyente, PuntosLicencia, VehicleLookup, Vehiculo};

/// The three sequential phases of a lookup.
///
/// A stage only ever advances forward by exactly one via a successful gate
/// ([`Stage::next`] clamps at `Result`), or jumps back to `Identity` on an
/// explicit reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Stage 1: taxpayer identity verification (email + RUC).
    Identity,
    /// Stage 2: vehicle and points resolution (plate).
    Vehicle,
    /// Stage 3: results on display; terminal until reset.
    Result,
}

impl Stage {
    pub(crate) fn next(self) -> Stage {
        match self {
            Stage::Identity => Stage::Vehicle,
            Stage::Vehicle => Stage::Result,
            Stage::Result => Stage::Result,
        }
    }

    /// Zero-based position, for the progress banner.
    pub fn index(self) -> usize {
        match self {
            Stage::Identity => 0,
            Stage::Vehicle => 1,
            Stage::Result => 2,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Stage::Identity => "identity",
            Stage::Vehicle => "vehicle",
            Stage::Result => "result",
        };
        write!(f, "{}", label)
    }
}

/// Raw form fields, mutated incrementally as the user supplies them.
/// Nothing here is validated until a stage submission is attempted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormInput {
    pub email: String,
    pub tax_id: String,
    pub plate: String,
}

/// Single-slot holder for the last user-visible failure.
///
/// `report` overwrites, never appends; the slot is cleared the moment a new
/// attempt begins, before its outcome is known. No retry logic lives here.
#[derive(Debug, Default)]
pub struct ErrorSlot(Option<String>);

impl ErrorSlot {
    pub fn report(&mut self, message: impl Into<String>) {
        self.0 = Some(message.into());
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }

    pub fn message(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

/// The mutable record of one lookup interaction.
///
/// All fields are private: the presentation layer reads them through the
/// accessors and mutates only through the gates and [`Session::reset`].
#[derive(Debug)]
pub struct Session {
    stage: Stage,
    loading: bool,
    error: ErrorSlot,
    input: FormInput,
    identity: Option<Contribuyente>,
    vehicle: Option<Vehiculo>,
    points: Option<PuntosLicencia>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            stage: Stage::Identity,
            loading: false,
            error: ErrorSlot::default(),
            input: FormInput::default(),
            identity: None,
            vehicle: None,
            points: None,
        }
    }

    /// Return the session to its initial state: stage back to `Identity`,
    /// input, fetched data, error slot and loading flag all cleared.
    pub fn reset(&mut self) {
        *self = Session::new();
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.error.message()
    }

    pub fn input(&self) -> &FormInput {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut FormInput {
        &mut self.input
    }

    pub fn identity(&self) -> Option<&Contribuyente> {
        self.identity.as_ref()
    }

    pub fn vehicle(&self) -> Option<&Vehiculo> {
        self.vehicle.as_ref()
    }

    pub fn points(&self) -> Option<&PuntosLicencia> {
        self.points.as_ref()
    }

    /// Check-and-set the loading flag and clear the error slot before a
    /// registry call is issued. Fails without side effects if a call is
    /// already outstanding.
    pub(crate) fn begin_attempt(&mut self) -> Result<(), LookupError> {
        if self.loading {
            return Err(LookupError::RequestInFlight);
        }
        self.error.clear();
        self.loading = true;
        Ok(())
    }

    /// Clear the loading flag. Must run on every resumption path of a
    /// registry call, success or failure.
    pub(crate) fn finish_attempt(&mut self) {
        self.loading = false;
    }

    /// Record a failure in the error slot and hand it back for propagation.
    pub(crate) fn fail(&mut self, err: LookupError) -> LookupError {
        self.error.report(err.to_string());
        err
    }

    /// Advance one stage forward, but only if the calling gate still owns
    /// the current stage. `Result` is terminal until reset.
    pub(crate) fn advance_from(&mut self, stage: Stage) {
        if self.stage == stage {
            self.stage = self.stage.next();
        }
    }

    pub(crate) fn store_identity(&mut self, contribuyente: Contribuyente) {
        self.identity = Some(contribuyente);
    }

    /// Store the vehicle record and the points balance together; the two
    /// are never observable one without the other.
    pub(crate) fn store_vehicle(&mut self, lookup: VehicleLookup) {
        self.vehicle = Some(lookup.vehicle);
        self.points = Some(lookup.points);
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TaxpayerKind;

    fn sample_identity() -> Contribuyente {
        Contribuyente {
            name: "JUAN PEREZ".to_string(),
            kind: TaxpayerKind::Individual,
            valid: true,
        }
    }

    fn sample_lookup() -> VehicleLookup {
        VehicleLookup {
            vehicle: Vehiculo {
                plate: "ABC-1234".to_string(),
                brand: "TOYOTA".to_string(),
                model: "COROLLA".to_string(),
                year: 2022,
            },
            points: PuntosLicencia {
                total: 30,
                status: "cache-hit".to_string(),
            },
        }
    }

    // ── Stage transitions ────────────────────────────────────────────

    #[test]
    fn test_stage_advances_forward_by_one() {
        assert_eq!(Stage::Identity.next(), Stage::Vehicle);
        assert_eq!(Stage::Vehicle.next(), Stage::Result);
    }

    #[test]
    fn test_result_stage_clamps() {
        assert_eq!(Stage::Result.next(), Stage::Result);
    }

    #[test]
    fn test_advance_from_requires_matching_stage() {
        let mut session = Session::new();
        // A vehicle-gate advance request must not move an identity-stage session.
        session.advance_from(Stage::Vehicle);
        assert_eq!(session.stage(), Stage::Identity);

        session.advance_from(Stage::Identity);
        assert_eq!(session.stage(), Stage::Vehicle);
    }

    // ── Initial state and reset ──────────────────────────────────────

    #[test]
    fn test_new_session_starts_empty_at_identity() {
        let session = Session::new();
        assert_eq!(session.stage(), Stage::Identity);
        assert!(!session.is_loading());
        assert!(session.last_error().is_none());
        assert!(session.identity().is_none());
        assert!(session.vehicle().is_none());
        assert!(session.points().is_none());
        assert_eq!(session.input(), &FormInput::default());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut session = Session::new();
        session.input_mut().email = "a@b.com".to_string();
        session.input_mut().tax_id = "1712345678001".to_string();
        session.store_identity(sample_identity());
        session.advance_from(Stage::Identity);
        session.store_vehicle(sample_lookup());
        session.advance_from(Stage::Vehicle);
        session.fail(LookupError::MissingPlate);

        session.reset();

        assert_eq!(session.stage(), Stage::Identity);
        assert!(session.input().email.is_empty());
        assert!(session.identity().is_none());
        assert!(session.vehicle().is_none());
        assert!(session.points().is_none());
        assert!(session.last_error().is_none());
        assert!(!session.is_loading());
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut session = Session::new();
        session.store_identity(sample_identity());
        session.advance_from(Stage::Identity);

        session.reset();
        let after_one = format!("{:?}", session);
        session.reset();
        let after_two = format!("{:?}", session);
        assert_eq!(after_one, after_two);
    }

    // ── Attempt bookkeeping ──────────────────────────────────────────

    #[test]
    fn test_begin_attempt_sets_loading_and_clears_error() {
        let mut session = Session::new();
        session.fail(LookupError::MissingCredentials);
        assert!(session.last_error().is_some());

        session.begin_attempt().unwrap();
        assert!(session.is_loading());
        assert!(session.last_error().is_none());

        session.finish_attempt();
        assert!(!session.is_loading());
    }

    #[test]
    fn test_begin_attempt_refuses_second_in_flight_call() {
        let mut session = Session::new();
        session.begin_attempt().unwrap();
        let err = session.begin_attempt().unwrap_err();
        assert!(matches!(err, LookupError::RequestInFlight));
        // The guard violation must not clear the loading flag.
        assert!(session.is_loading());
    }

    #[test]
    fn test_fail_overwrites_previous_error() {
        let mut session = Session::new();
        session.fail(LookupError::MissingCredentials);
        session.fail(LookupError::MissingPlate);
        assert_eq!(session.last_error(), Some("missing plate"));
    }

    // ── Result storage ───────────────────────────────────────────────

    #[test]
    fn test_vehicle_and_points_are_stored_together() {
        let mut session = Session::new();
        session.store_vehicle(sample_lookup());
        assert!(session.vehicle().is_some());
        assert!(session.points().is_some());
        assert_eq!(session.points().unwrap().total, 30);
        assert_eq!(session.vehicle().unwrap().brand, "TOYOTA");
    }

    // ── ErrorSlot ────────────────────────────────────────────────────

    #[test]
    fn test_error_slot_overwrite_and_clear() {
        let mut slot = ErrorSlot::default();
        assert!(slot.message().is_none());
        slot.report("first");
        slot.report("second");
        assert_eq!(slot.message(), Some("second"));
        slot.clear();
        assert!(slot.message().is_none());
    }
}
