//! ANT portal client — driving-licence points with a short-lived cache.
//!
//! The ANT consultation portal has low availability, so resolved balances
//! are cached and served without a remote call while still fresh. The
//! `status` field of the returned balance reports which path produced it,
//! and the presentation layer surfaces that string verbatim.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use super::{PuntosLicencia, RegistryError};

const SERVICE: &str = "ANT";

const POINTS_PATH: &str = "/PortalWEB/rest/licencia/puntos";

/// Provenance label for a balance served from the local cache.
pub const STATUS_CACHED: &str = "served from ANT cache";
/// Provenance label for a balance fetched from the portal on this call.
pub const STATUS_FRESH: &str = "fetched from ANT";

#[derive(Debug, Deserialize)]
struct PuntosResponse {
    #[serde(rename = "puntos")]
    total: u32,
}

struct CacheEntry {
    total: u32,
    stored_at: Instant,
}

pub struct AntClient {
    http: reqwest::Client,
    base_url: String,
    ttl: Duration,
    cache: Mutex<HashMap<String, CacheEntry>>,
}

impl AntClient {
    pub fn new(base_url: impl Into<String>, ttl: Duration, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build ANT HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            ttl,
            cache: Mutex::new(HashMap::new()),
        })
    }

    /// Points balance for a plate, served from the cache while fresh.
    pub async fn points(&self, plate: &str) -> Result<PuntosLicencia, RegistryError> {
        if let Some(total) = self.cached(plate) {
            debug!(%plate, total, "points served from cache");
            return Ok(PuntosLicencia {
                total,
                status: STATUS_CACHED.to_string(),
            });
        }

        let total = self.fetch(plate).await?;
        self.store(plate, total);
        debug!(%plate, total, "points fetched from the portal");
        Ok(PuntosLicencia {
            total,
            status: STATUS_FRESH.to_string(),
        })
    }

    async fn fetch(&self, plate: &str) -> Result<u32, RegistryError> {
        let url = format!("{}{}", self.base_url, POINTS_PATH);
        let resp = self
            .http
            .get(&url)
            .query(&[("ps_placa", plate)])
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

        let payload: PuntosResponse =
            resp.json().await.map_err(|e| RegistryError::Malformed {
                service: SERVICE,
                detail: e.to_string(),
            })?;
        Ok(payload.total)
    }

    fn cached(&self, plate: &str) -> Option<u32> {
        // A poisoned cache lock degrades to a miss, never to an error.
        let mut cache = self.cache.lock().ok()?;
        match cache.get(plate) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => Some(entry.total),
            Some(_) => {
                cache.remove(plate);
                None
            }
            None => None,
        }
    }

    fn store(&self, plate: &str, total: u32) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(
                plate.to_string(),
                CacheEntry {
                    total,
                    stored_at: Instant::now(),
                },
            );
        }
    }
}
