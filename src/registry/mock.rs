//! Offline simulation of both registries, for demos and integration tests.
//!
//! Reproduces the demo dataset of the legacy unified-lookup app: a RUC that
//! passes the plausibility rule belongs to JUAN PEREZ (natural person)
//! unless its third digit marks a company, every plate resolves to a 2022
//! TOYOTA COROLLA with a 30-point balance, and plates beginning with `ZZZ`
//! simulate an ANT outage. Repeat resolutions of the same plate report the
//! cached provenance label, mirroring the live client's cache.

use std::collections::HashSet;
use std::sync::Mutex;

use super::sri::is_plausible_ruc;
use super::{
    Contribuyente, IdentityRegistry, PuntosLicencia, RegistryError, TaxpayerKind, VehicleLookup,
    VehicleRegistry, Vehiculo,
};

/// Prefix that makes the mock vehicle resolution fail like an outage.
pub const OUTAGE_PLATE_PREFIX: &str = "ZZZ";

#[derive(Default)]
pub struct MockRegistry {
    seen_plates: Mutex<HashSet<String>>,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn first_sighting(&self, plate: &str) -> bool {
        self.seen_plates
            .lock()
            .map(|mut seen| seen.insert(plate.to_string()))
            .unwrap_or(true)
    }
}

impl IdentityRegistry for MockRegistry {
    async fn verify(&self, tax_id: &str, _email: &str) -> Result<Contribuyente, RegistryError> {
        if !is_plausible_ruc(tax_id) {
            return Ok(Contribuyente {
                name: String::new(),
                kind: TaxpayerKind::Other,
                valid: false,
            });
        }

        // Third digit 6 or 9 marks public/private companies in a RUC.
        match tax_id.chars().nth(2) {
            Some('6') | Some('9') => Ok(Contribuyente {
                name: "SOCIEDAD EJEMPLO S.A.".to_string(),
                kind: TaxpayerKind::Other,
                valid: true,
            }),
            _ => Ok(Contribuyente {
                name: "JUAN PEREZ".to_string(),
                kind: TaxpayerKind::Individual,
                valid: true,
            }),
        }
    }
}

impl VehicleRegistry for MockRegistry {
    async fn resolve(&self, plate: &str) -> Result<VehicleLookup, RegistryError> {
        let plate = plate.to_uppercase();
        if plate.starts_with(OUTAGE_PLATE_PREFIX) {
            return Err(RegistryError::Status {
                service: "ANT",
                status: 503,
            });
        }

        let status = if self.first_sighting(&plate) {
            super::ant::STATUS_FRESH
        } else {
            super::ant::STATUS_CACHED
        };

        Ok(VehicleLookup {
            vehicle: Vehiculo {
                plate,
                brand: "TOYOTA".to_string(),
                model: "COROLLA".to_string(),
                year: 2022,
            },
            points: PuntosLicencia {
                total: 30,
                status: status.to_string(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ant::{STATUS_CACHED, STATUS_FRESH};

    #[tokio::test]
    async fn natural_person_ruc_verifies_as_juan_perez() {
        let mock = MockRegistry::new();
        let c = mock.verify("1712345678001", "a@b.com").await.unwrap();
        assert_eq!(c.name, "JUAN PEREZ");
        assert_eq!(c.kind, TaxpayerKind::Individual);
        assert!(c.valid);
        assert!(c.is_eligible());
    }

    #[tokio::test]
    async fn company_ruc_is_valid_but_not_eligible() {
        let mock = MockRegistry::new();
        let c = mock.verify("1790012345001", "a@b.com").await.unwrap();
        assert_eq!(c.kind, TaxpayerKind::Other);
        assert!(c.valid);
        assert!(!c.is_eligible());
    }

    #[tokio::test]
    async fn implausible_ruc_is_invalid() {
        let mock = MockRegistry::new();
        let c = mock.verify("999", "a@b.com").await.unwrap();
        assert!(!c.valid);
        assert!(!c.is_eligible());
    }

    #[tokio::test]
    async fn plates_resolve_to_the_demo_vehicle() {
        let mock = MockRegistry::new();
        let lookup = mock.resolve("abc-1234").await.unwrap();
        assert_eq!(lookup.vehicle.plate, "ABC-1234");
        assert_eq!(lookup.vehicle.brand, "TOYOTA");
        assert_eq!(lookup.vehicle.model, "COROLLA");
        assert_eq!(lookup.vehicle.year, 2022);
        assert_eq!(lookup.points.total, 30);
    }

    #[tokio::test]
    async fn repeat_resolution_reports_cache_provenance() {
        let mock = MockRegistry::new();
        let first = mock.resolve("ABC-1234").await.unwrap();
        let second = mock.resolve("ABC-1234").await.unwrap();
        assert_eq!(first.points.status, STATUS_FRESH);
        assert_eq!(second.points.status, STATUS_CACHED);
    }

    #[tokio::test]
    async fn outage_plates_fail_with_a_service_error() {
        let mock = MockRegistry::new();
        let err = mock.resolve("ZZZ-0001").await.unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Status {
                service: "ANT",
                status: 503
            }
        ));
    }
}
