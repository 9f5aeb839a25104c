//! Configuration for the snapshot cache

use std::path::{Path, PathBuf};
use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::canonical::{DefaultKeyBuilder, KeyBuilder};
use crate::events::{NoEvents, SnapshotEvents};
use crate::mask::MaskSpecifier;
use crate::{Result, SnapError};

/// When a fetched exchange is persisted to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdatePolicy {
    /// Never persist; responses are returned but the exchange is not saved
    #[default]
    None,
    /// Persist only when no record existed before the fetch
    Missing,
    /// Always persist after a fetch
    All,
}

/// Configuration for one [`SnapshotCache`](crate::SnapshotCache) instance
///
/// Immutable for the lifetime of the cache.
#[derive(Clone)]
pub struct Config {
    /// Root directory of the snapshot store
    pub base_path: PathBuf,
    /// Persistence policy for fetched exchanges
    pub update_snapshots: UpdatePolicy,
    /// Never replay, even when a record exists
    pub ignore_snapshots: bool,
    /// Fields stripped before fingerprinting and persistence
    pub mask: Vec<MaskSpecifier>,
    /// Request identity strategy
    pub key_builder: Arc<dyn KeyBuilder>,
    /// Observability sink
    pub events: Arc<dyn SnapshotEvents>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("base_path", &self.base_path)
            .field("update_snapshots", &self.update_snapshots)
            .field("ignore_snapshots", &self.ignore_snapshots)
            .field("mask", &self.mask)
            .finish_non_exhaustive()
    }
}

/// On-disk configuration shape (strategies are code-only)
#[derive(Debug, Deserialize)]
struct FileConfig {
    base_path: PathBuf,
    #[serde(default)]
    update_snapshots: UpdatePolicy,
    #[serde(default)]
    ignore_snapshots: bool,
    /// Exact field names to mask
    #[serde(default)]
    mask_fields: Vec<String>,
    /// Regex patterns for fields to mask
    #[serde(default)]
    mask_patterns: Vec<String>,
}

impl Config {
    /// Create a configuration with defaults
    #[must_use]
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            update_snapshots: UpdatePolicy::default(),
            ignore_snapshots: false,
            mask: Vec::new(),
            key_builder: Arc::new(DefaultKeyBuilder),
            events: Arc::new(NoEvents),
        }
    }

    /// Set the persistence policy
    #[must_use]
    pub fn update_snapshots(mut self, policy: UpdatePolicy) -> Self {
        self.update_snapshots = policy;
        self
    }

    /// Never replay stored snapshots
    #[must_use]
    pub fn ignore_snapshots(mut self, ignore: bool) -> Self {
        self.ignore_snapshots = ignore;
        self
    }

    /// Add a mask specifier
    #[must_use]
    pub fn mask(mut self, specifier: impl Into<MaskSpecifier>) -> Self {
        self.mask.push(specifier.into());
        self
    }

    /// Replace the request identity strategy
    #[must_use]
    pub fn key_builder(mut self, builder: Arc<dyn KeyBuilder>) -> Self {
        self.key_builder = builder;
        self
    }

    /// Install an observability sink
    #[must_use]
    pub fn events(mut self, events: Arc<dyn SnapshotEvents>) -> Self {
        self.events = events;
        self
    }

    /// Load configuration from a TOML file
    ///
    /// Strategy objects (key builder, event sink) keep their defaults and
    /// are replaced in code.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed, or if a mask
    /// pattern is not a valid regex.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SnapError::Config(format!("Failed to read config file: {e}")))?;

        let file: FileConfig = toml::from_str(&content)
            .map_err(|e| SnapError::Config(format!("Failed to parse config: {e}")))?;

        let mut mask: Vec<MaskSpecifier> =
            file.mask_fields.into_iter().map(MaskSpecifier::from).collect();
        for pattern in &file.mask_patterns {
            let regex = Regex::new(pattern).map_err(|e| {
                SnapError::Config(format!("Invalid mask pattern '{pattern}': {e}"))
            })?;
            mask.push(MaskSpecifier::Pattern(regex));
        }

        let config = Self {
            base_path: file.base_path,
            update_snapshots: file.update_snapshots,
            ignore_snapshots: file.ignore_snapshots,
            mask,
            key_builder: Arc::new(DefaultKeyBuilder),
            events: Arc::new(NoEvents),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns error if configuration is invalid
    pub fn validate(&self) -> Result<()> {
        if self.base_path.as_os_str().is_empty() {
            return Err(SnapError::Config("base_path cannot be empty".to_string()));
        }

        Ok(())
    }
}
