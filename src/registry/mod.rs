//! Registry collaborators consumed by the lookup orchestrator.
//!
//! Two independent government registries are involved:
//! - the SRI taxpayer registry, which confirms an identity and classifies
//!   the taxpayer (natural person vs. anything else)
//! - the ANT transit registry, which holds the driving-licence points
//!   balance surfaced alongside the vehicle record
//!
//! The orchestrator only depends on the [`IdentityRegistry`] and
//! [`VehicleRegistry`] traits; the HTTP clients in the submodules implement
//! them against the live services, and [`mock::MockRegistry`] implements
//! them offline for demos and tests.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod ant;
pub mod mock;
pub mod resolver;
pub mod sri;

pub use ant::AntClient;
pub use mock::MockRegistry;
pub use resolver::VehiclePointsResolver;
pub use sri::SriClient;

/// Taxpayer classification as reported by the identity registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxpayerKind {
    /// A natural person ("PERSONA NATURAL" in the registry).
    Individual,
    /// Companies, public entities, and anything else.
    Other,
}

impl TaxpayerKind {
    /// Map a registry classification label onto the two kinds the
    /// eligibility rule distinguishes.
    pub fn from_registry_label(label: &str) -> Self {
        if label.trim().eq_ignore_ascii_case("PERSONA NATURAL") {
            TaxpayerKind::Individual
        } else {
            TaxpayerKind::Other
        }
    }
}

/// Identity-registry record for one taxpayer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribuyente {
    pub name: String,
    pub kind: TaxpayerKind,
    pub valid: bool,
}

impl Contribuyente {
    /// The eligibility gate: only a confirmed, valid natural-person taxpayer
    /// may proceed to the vehicle stage.
    pub fn is_eligible(&self) -> bool {
        self.valid && self.kind == TaxpayerKind::Individual
    }
}

/// Vehicle record from the transit/matriculation registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehiculo {
    pub plate: String,
    pub brand: String,
    pub model: String,
    pub year: u16,
}

/// Driving-licence points balance, annotated with provenance.
///
/// `status` reports where the balance came from (served from the ANT cache
/// vs. freshly fetched) and is surfaced to the user verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PuntosLicencia {
    pub total: u32,
    pub status: String,
}

/// Combined result of one vehicle/points resolution call. Both halves are
/// produced by the same call so the session can store them atomically.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleLookup {
    pub vehicle: Vehiculo,
    pub points: PuntosLicencia,
}

/// Failures of a registry call itself (transport, status, decoding).
///
/// These are distinct from the orchestrator's gate errors: a registry that
/// *answers* with an ineligible taxpayer is a success at this layer.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("request to the {service} registry failed: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("the {service} registry returned HTTP {status}")]
    Status { service: &'static str, status: u16 },

    #[error("malformed response from the {service} registry: {detail}")]
    Malformed {
        service: &'static str,
        detail: String,
    },
}

/// Stage-1 collaborator: taxpayer identity verification.
///
/// Implementations must be idempotent: the orchestrator issues exactly one
/// call per attempt and may retry the same input after a failure.
#[allow(async_fn_in_trait)]
pub trait IdentityRegistry {
    async fn verify(&self, tax_id: &str, email: &str) -> Result<Contribuyente, RegistryError>;
}

/// Stage-2 collaborator: vehicle record plus points balance, resolved
/// together in a single call.
#[allow(async_fn_in_trait)]
pub trait VehicleRegistry {
    async fn resolve(&self, plate: &str) -> Result<VehicleLookup, RegistryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── TaxpayerKind ─────────────────────────────────────────────────

    #[test]
    fn test_natural_person_label_maps_to_individual() {
        assert_eq!(
            TaxpayerKind::from_registry_label("PERSONA NATURAL"),
            TaxpayerKind::Individual
        );
    }

    #[test]
    fn test_label_match_ignores_case_and_padding() {
        assert_eq!(
            TaxpayerKind::from_registry_label("  persona natural "),
            TaxpayerKind::Individual
        );
    }

    #[test]
    fn test_company_labels_map_to_other() {
        for label in ["SOCIEDAD", "SOCIEDAD ANONIMA", "ENTIDAD PUBLICA", ""] {
            assert_eq!(
                TaxpayerKind::from_registry_label(label),
                TaxpayerKind::Other,
                "label {:?} should not be an individual",
                label
            );
        }
    }

    // ── Eligibility predicate ────────────────────────────────────────

    fn contribuyente(kind: TaxpayerKind, valid: bool) -> Contribuyente {
        Contribuyente {
            name: "JUAN PEREZ".to_string(),
            kind,
            valid,
        }
    }

    #[test]
    fn test_valid_individual_is_eligible() {
        assert!(contribuyente(TaxpayerKind::Individual, true).is_eligible());
    }

    #[test]
    fn test_invalid_individual_is_not_eligible() {
        assert!(!contribuyente(TaxpayerKind::Individual, false).is_eligible());
    }

    #[test]
    fn test_valid_company_is_not_eligible() {
        assert!(!contribuyente(TaxpayerKind::Other, true).is_eligible());
    }

    // ── RegistryError display ────────────────────────────────────────

    #[test]
    fn test_status_error_names_service_and_code() {
        let err = RegistryError::Status {
            service: "SRI",
            status: 503,
        };
        let msg = err.to_string();
        assert!(msg.contains("SRI"));
        assert!(msg.contains("503"));
    }

    #[test]
    fn test_malformed_error_carries_detail() {
        let err = RegistryError::Malformed {
            service: "ANT",
            detail: "missing field `puntos`".to_string(),
        };
        assert!(err.to_string().contains("missing field `puntos`"));
    }
}
