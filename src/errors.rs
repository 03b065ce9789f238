//! Typed error hierarchy for the lookup orchestrator.
//!
//! Every gate failure is one of three kinds (see [`ErrorKind`]):
//! - `Validation` — malformed or missing local input; no remote call was made
//! - `BusinessRule` — the registry answered but the eligibility predicate failed
//! - `RemoteService` — the registry call itself failed
//!
//! All of them are caught at the gate boundary and recorded as a single
//! user-visible message in the session; none crash the flow.

use thiserror::Error;

use crate::registry::RegistryError;

/// Classification of a gate failure by the recovery it allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Local input problem. Recoverable by correcting input and retrying
    /// the same stage; never reaches a remote registry.
    Validation,
    /// The registry answered, but the taxpayer failed the eligibility rule.
    /// Terminal for that identity; different credentials are required.
    BusinessRule,
    /// The registry call failed (connectivity, timeout, server error).
    /// Recoverable by retrying the same stage with the same input.
    RemoteService,
}

/// Errors surfaced by the two lookup gates.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("missing required fields")]
    MissingCredentials,

    #[error("missing plate")]
    MissingPlate,

    /// The vehicle gate was invoked out of order, before the identity
    /// stage confirmed an eligible taxpayer.
    #[error("identity not verified")]
    IdentityNotVerified,

    /// A gate was invoked while a previous call was still outstanding.
    /// The loading flag is the mutual-exclusion guard; a second call is
    /// never issued past it.
    #[error("another request is already in flight")]
    RequestInFlight,

    #[error("not a valid individual taxpayer")]
    NotIndividualTaxpayer,

    #[error("identity service unavailable")]
    IdentityService(#[source] RegistryError),

    #[error("vehicle/points service unavailable")]
    VehicleService(#[source] RegistryError),
}

impl LookupError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LookupError::MissingCredentials
            | LookupError::MissingPlate
            | LookupError::IdentityNotVerified
            | LookupError::RequestInFlight => ErrorKind::Validation,
            LookupError::NotIndividualTaxpayer => ErrorKind::BusinessRule,
            LookupError::IdentityService(_) | LookupError::VehicleService(_) => {
                ErrorKind::RemoteService
            }
        }
    }

    /// Whether retrying the same stage with the same input can succeed.
    /// Only a business-rule rejection requires different credentials.
    pub fn is_retryable(&self) -> bool {
        self.kind() != ErrorKind::BusinessRule
    }
}
