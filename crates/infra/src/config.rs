//! Runtime configuration for the inventory service.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use crate::snapshot_store::JsonFileStore;

pub const DEFAULT_DATA_FILE: &str = "warehouse_data.json";

pub const ENV_DATA_FILE: &str = "WAREHOUSE_DATA_FILE";
pub const ENV_HISTORY_LIMIT: &str = "WAREHOUSE_HISTORY_LIMIT";
pub const ENV_PRETTY_JSON: &str = "WAREHOUSE_PRETTY_JSON";

/// Inventory service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryConfig {
    /// Where the JSON snapshot lives
    pub data_file: PathBuf,
    /// Maximum undo depth; `None` keeps every step
    pub history_limit: Option<usize>,
    /// Indent the JSON snapshot
    pub pretty: bool,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            history_limit: None,
            pretty: true,
        }
    }
}

impl InventoryConfig {
    pub fn with_data_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_file = path.into();
        self
    }

    pub fn with_history_limit(mut self, limit: Option<usize>) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Defaults overridden by `WAREHOUSE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`InventoryConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(ENV_DATA_FILE).filter(|v| !v.trim().is_empty()) {
            config.data_file = PathBuf::from(path.trim());
        }

        if let Some(raw) = lookup(ENV_HISTORY_LIMIT) {
            config.history_limit = parse_limit(&raw)
                .with_context(|| format!("invalid {ENV_HISTORY_LIMIT}={raw:?}"))?;
        }

        if let Some(raw) = lookup(ENV_PRETTY_JSON) {
            config.pretty =
                parse_flag(&raw).with_context(|| format!("invalid {ENV_PRETTY_JSON}={raw:?}"))?;
        }

        Ok(config)
    }

    /// The file store this configuration points at.
    pub fn store(&self) -> JsonFileStore {
        JsonFileStore::new(&self.data_file).with_pretty(self.pretty)
    }
}

// Empty, "none" and "unlimited" all mean no limit.
fn parse_limit(raw: &str) -> Result<Option<usize>> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("none") || raw.eq_ignore_ascii_case("unlimited") {
        return Ok(None);
    }
    let limit: usize = raw.parse().context("expected a non-negative integer")?;
    Ok(Some(limit))
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("expected a boolean, got {other:?}"),
    }
}
