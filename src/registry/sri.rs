//! SRI registry client — taxpayer identity and vehicle information.
//!
//! Two lookups live here: the taxpayer verification used by the identity
//! gate (an existence/validity probe composed with a person-info fetch)
//! and the vehicle record fetch used by the combined resolver.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{Contribuyente, IdentityRegistry, RegistryError, TaxpayerKind, Vehiculo};

const SERVICE: &str = "SRI";

const RUC_STATUS_PATH: &str =
    "/sri-catastro-sujeto-servicio-internet/rest/ConsolidadoContribuyente/existePorNumeroRuc";
const RUC_INFO_PATH: &str =
    "/sri-catastro-sujeto-servicio-internet/rest/ConsolidadoContribuyente/obtenerPorNumeroRuc";
const VEHICLE_PATH: &str =
    "/sri-matriculacion-vehicular-servicio-internet/rest/BaseVehiculo/obtenerPorPlaca";

/// Local plausibility check for an Ecuadorian natural-person RUC:
/// thirteen digits ending in the `001` establishment suffix.
///
/// Runs before any network call; an implausible RUC is reported as an
/// invalid taxpayer without bothering the registry.
pub fn is_plausible_ruc(ruc: &str) -> bool {
    ruc.len() == 13 && ruc.chars().all(|c| c.is_ascii_digit()) && ruc.ends_with("001")
}

/// Taxpayer info payload (subset of fields we care about).
#[derive(Debug, Deserialize)]
struct ContribuyenteResponse {
    #[serde(rename = "nombre")]
    name: String,
    #[serde(rename = "tipo")]
    kind: String,
    #[serde(rename = "estado", default)]
    state: Option<String>,
}

/// Vehicle record payload.
#[derive(Debug, Deserialize)]
struct VehiculoResponse {
    #[serde(rename = "placa")]
    plate: String,
    #[serde(rename = "marca")]
    brand: String,
    #[serde(rename = "modelo")]
    model: String,
    #[serde(rename = "anio")]
    year: u16,
}

#[derive(Clone)]
pub struct SriClient {
    http: reqwest::Client,
    base_url: String,
}

impl SriClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build SRI HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, RegistryError> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|source| RegistryError::Transport {
                service: SERVICE,
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(RegistryError::Status {
                service: SERVICE,
                status: status.as_u16(),
            });
        }

        resp.json::<T>().await.map_err(|e| RegistryError::Malformed {
            service: SERVICE,
            detail: e.to_string(),
        })
    }

    /// Vehicle record by plate, for the combined vehicle/points resolver.
    pub async fn vehicle_info(&self, plate: &str) -> Result<Vehiculo, RegistryError> {
        let resp: VehiculoResponse = self.get_json(VEHICLE_PATH, &[("placa", plate)]).await?;
        debug!(plate = %resp.plate, brand = %resp.brand, "vehicle record fetched");
        Ok(Vehiculo {
            plate: resp.plate,
            brand: resp.brand,
            model: resp.model,
            year: resp.year,
        })
    }
}

impl IdentityRegistry for SriClient {
    /// Compose the existence probe with the person-info fetch into one
    /// `Contribuyente`. The contact email travels with the attempt for
    /// audit purposes but the registry keys everything off the RUC.
    async fn verify(&self, tax_id: &str, email: &str) -> Result<Contribuyente, RegistryError> {
        debug!(%tax_id, contact = %email, "SRI verification requested");

        if !is_plausible_ruc(tax_id) {
            debug!(%tax_id, "RUC failed the local plausibility check");
            return Ok(Contribuyente {
                name: String::new(),
                kind: TaxpayerKind::Other,
                valid: false,
            });
        }

        // The existence endpoint answers with a bare boolean.
        let exists: bool = self
            .get_json(RUC_STATUS_PATH, &[("numeroRuc", tax_id)])
            .await?;
        if !exists {
            return Ok(Contribuyente {
                name: String::new(),
                kind: TaxpayerKind::Other,
                valid: false,
            });
        }

        let info: ContribuyenteResponse = self
            .get_json(RUC_INFO_PATH, &[("numeroRuc", tax_id)])
            .await?;
        let valid = info.state.as_deref().is_none_or(|s| s == "ACTIVO");
        Ok(Contribuyente {
            name: info.name,
            kind: TaxpayerKind::from_registry_label(&info.kind),
            valid,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── is_plausible_ruc ─────────────────────────────────────────────

    #[test]
    fn test_natural_person_ruc_is_plausible() {
        assert!(is_plausible_ruc("1712345678001"));
    }

    #[test]
    fn test_short_ruc_is_implausible() {
        assert!(!is_plausible_ruc("171234567"));
    }

    #[test]
    fn test_ruc_without_establishment_suffix_is_implausible() {
        assert!(!is_plausible_ruc("1712345678002"));
    }

    #[test]
    fn test_non_numeric_ruc_is_implausible() {
        assert!(!is_plausible_ruc("17123456780AB"));
    }

    #[test]
    fn test_empty_ruc_is_implausible() {
        assert!(!is_plausible_ruc(""));
    }

    // ── DTO deserialization ──────────────────────────────────────────

    #[test]
    fn test_contribuyente_response_parses_registry_fields() {
        let json = r#"{"nombre": "JUAN PEREZ", "tipo": "PERSONA NATURAL", "estado": "ACTIVO"}"#;
        let resp: ContribuyenteResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.name, "JUAN PEREZ");
        assert_eq!(resp.kind, "PERSONA NATURAL");
        assert_eq!(resp.state.as_deref(), Some("ACTIVO"));
    }

    #[test]
    fn test_contribuyente_response_state_is_optional() {
        let json = r#"{"nombre": "JUAN PEREZ", "tipo": "PERSONA NATURAL"}"#;
        let resp: ContribuyenteResponse = serde_json::from_str(json).unwrap();
        assert!(resp.state.is_none());
    }

    #[test]
    fn test_vehiculo_response_parses_registry_fields() {
        let json = r#"{"placa": "ABC-1234", "marca": "TOYOTA", "modelo": "COROLLA", "anio": 2022}"#;
        let resp: VehiculoResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.plate, "ABC-1234");
        assert_eq!(resp.brand, "TOYOTA");
        assert_eq!(resp.model, "COROLLA");
        assert_eq!(resp.year, 2022);
    }

    #[test]
    fn test_existence_probe_payload_is_a_bare_boolean() {
        let exists: bool = serde_json::from_str("true").unwrap();
        assert!(exists);
    }

    // ── Client construction ──────────────────────────────────────────

    #[test]
    fn test_client_builds_with_timeout() {
        let client = SriClient::new("https://srienlinea.sri.gob.ec", Duration::from_secs(5));
        assert!(client.is_ok());
    }
}
