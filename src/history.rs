//! Append-only log of completed lookups.
//!
//! Format: `timestamp|tax_id|plate|points|provenance`, one line per lookup.
//! The log is plain text so it survives crashes mid-write with at most one
//! truncated line, which the reader skips.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::registry::PuntosLicencia;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub tax_id: String,
    pub plate: String,
    pub points: u32,
    pub provenance: String,
}

pub struct HistoryLog {
    file: PathBuf,
}

impl HistoryLog {
    pub fn new(file: PathBuf) -> Self {
        Self { file }
    }

    /// Record one completed lookup, stamped with the current time.
    pub fn append(&self, tax_id: &str, plate: &str, points: &PuntosLicencia) -> Result<()> {
        if let Some(parent) = self.file.parent() {
            fs::create_dir_all(parent).context("Failed to create history directory")?;
        }

        let line = format!(
            "{}|{}|{}|{}|{}\n",
            Utc::now().to_rfc3339(),
            tax_id,
            plate,
            points.total,
            points.status,
        );

        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file)
            .context("Failed to open history file")?
            .write_all(line.as_bytes())
            .context("Failed to write history entry")?;

        Ok(())
    }

    /// All recorded lookups, oldest first. Lines that do not parse are
    /// skipped rather than failing the whole read.
    pub fn entries(&self) -> Result<Vec<HistoryEntry>> {
        if !self.file.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.file).context("Failed to read history file")?;

        let entries = content
            .lines()
            .filter_map(|line| {
                let parts: Vec<&str> = line.split('|').collect();
                if parts.len() != 5 {
                    return None;
                }
                Some(HistoryEntry {
                    timestamp: DateTime::parse_from_rfc3339(parts[0])
                        .ok()?
                        .with_timezone(&Utc),
                    tax_id: parts[1].to_string(),
                    plate: parts[2].to_string(),
                    points: parts[3].parse().ok()?,
                    provenance: parts[4].to_string(),
                })
            })
            .collect();

        Ok(entries)
    }

    pub fn last(&self) -> Option<HistoryEntry> {
        self.entries().ok()?.pop()
    }

    /// Delete the log. Removing an absent file is not an error.
    pub fn clear(&self) -> Result<()> {
        if self.file.exists() {
            fs::remove_file(&self.file).context("Failed to remove history file")?;
        }
        Ok(())
    }
}
