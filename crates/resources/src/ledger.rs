//! Loading the resource ledger and social signals from JSON files.
//!
//! Both files hold a JSON array with camelCase fields. The engine treats
//! them as read-only snapshots taken at start-up.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::info;

use sr_core::config::LedgerConfig;
use sr_core::types::{ResourceRecord, SocialSignal};

use crate::signals::SignalSummary;
use crate::summary::LedgerSummary;

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// In-memory snapshot of the external inputs.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    pub resources: Vec<ResourceRecord>,
    pub signals: Vec<SocialSignal>,
}

impl Ledger {
    /// Load whichever files are configured. A missing path yields an empty
    /// collection.
    pub fn load(config: &LedgerConfig) -> Result<Self, LedgerError> {
        let resources = match &config.resources_path {
            Some(path) => load_json_array(path)?,
            None => Vec::new(),
        };
        let signals = match &config.signals_path {
            Some(path) => load_json_array(path)?,
            None => Vec::new(),
        };
        info!(
            resources = resources.len(),
            signals = signals.len(),
            "ledger loaded"
        );
        Ok(Self { resources, signals })
    }

    pub fn summary(&self) -> LedgerSummary {
        LedgerSummary::compute(&self.resources)
    }

    pub fn signal_summary(&self) -> SignalSummary {
        SignalSummary::compute(&self.signals)
    }
}

fn load_json_array<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, LedgerError> {
    let raw = fs::read_to_string(path).map_err(|source| LedgerError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| LedgerError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
