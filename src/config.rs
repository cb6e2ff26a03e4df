use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DocumentError;

pub const ENV_ENVIRONMENT_PREFIX: &str = "DOCMETA_ENVIRONMENT_PREFIX";
pub const ENV_TABLE_NAME: &str = "DOCMETA_TABLE_NAME";
pub const ENV_FAN_OUT_PARALLELISM: &str = "DOCMETA_FAN_OUT_PARALLELISM";
pub const ENV_ALLOW_FULL_SCAN: &str = "DOCMETA_ALLOW_FULL_SCAN";

/// Configuration for the document access layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStoreConfig {
    /// Environment prefix prepended to the table name (e.g. `dev` gives
    /// `dev-DocumentMetadata`).
    #[serde(default)]
    pub environment_prefix: Option<String>,

    /// Base table name (default: `DocumentMetadata`)
    #[serde(default = "default_table_name")]
    pub table_name: String,

    /// Upper bound on concurrent sub-queries in an IN fan-out (default: 8)
    #[serde(default = "default_fan_out_parallelism")]
    pub fan_out_parallelism: usize,

    /// Whether full-table scans may run at all (default: true)
    #[serde(default = "default_allow_full_scan")]
    pub allow_full_scan: bool,
}

impl Default for DocumentStoreConfig {
    fn default() -> Self {
        Self {
            environment_prefix: None,
            table_name: default_table_name(),
            fan_out_parallelism: default_fan_out_parallelism(),
            allow_full_scan: default_allow_full_scan(),
        }
    }
}

impl DocumentStoreConfig {
    /// Defaults overridden by any `DOCMETA_*` variables that are set.
    pub fn from_env() -> Result<Self, DocumentError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, DocumentError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(prefix) = lookup(ENV_ENVIRONMENT_PREFIX) {
            let prefix = prefix.trim().to_string();
            config.environment_prefix = (!prefix.is_empty()).then_some(prefix);
        }
        if let Some(table) = lookup(ENV_TABLE_NAME) {
            config.table_name = table.trim().to_string();
        }
        if let Some(raw) = lookup(ENV_FAN_OUT_PARALLELISM) {
            config.fan_out_parallelism = parse_var(ENV_FAN_OUT_PARALLELISM, &raw)?;
        }
        if let Some(raw) = lookup(ENV_ALLOW_FULL_SCAN) {
            config.allow_full_scan = parse_var(ENV_ALLOW_FULL_SCAN, &raw)?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn with_environment_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.environment_prefix = Some(prefix.into());
        self
    }

    pub fn with_fan_out_parallelism(mut self, parallelism: usize) -> Self {
        self.fan_out_parallelism = parallelism;
        self
    }

    pub fn with_full_scan(mut self, allowed: bool) -> Self {
        self.allow_full_scan = allowed;
        self
    }

    /// Table name with the environment prefix applied.
    pub fn resolved_table_name(&self) -> String {
        match &self.environment_prefix {
            Some(prefix) => format!("{}-{}", prefix, self.table_name),
            None => self.table_name.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), DocumentError> {
        if self.table_name.is_empty() {
            return Err(DocumentError::Config("table name must not be empty".into()));
        }
        if self.fan_out_parallelism == 0 {
            return Err(DocumentError::Config(
                "fan-out parallelism must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(key: &str, raw: &str) -> Result<T, DocumentError>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| DocumentError::Config(format!("{}={:?}: {}", key, raw, e)))
}

fn default_table_name() -> String {
    "DocumentMetadata".to_string()
}

fn default_fan_out_parallelism() -> usize {
    8
}

fn default_allow_full_scan() -> bool {
    true
}
