//! Indexer configuration.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::types::EventFilter;

/// Configuration for an indexer instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexerConfig {
    /// Name of this indexer (appears in logs).
    pub id: String,
    /// Chain the events come from (e.g. `"ethereum"`).
    pub chain: String,
    /// Contract address filter.
    pub filter: EventFilter,
    /// Where entities are persisted.
    pub storage: StorageConfig,
    /// Emit one diagnostic line per projected event.
    pub trace: bool,
    /// What the host does when an event fails to project.
    pub on_error: ErrorPolicy,
    pub log: LogConfig,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            id: "wld".into(),
            chain: "ethereum".into(),
            filter: EventFilter::default(),
            storage: StorageConfig::default(),
            trace: true,
            on_error: ErrorPolicy::Abort,
            log: LogConfig::default(),
        }
    }
}

/// Storage backend selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StorageConfig {
    /// In-memory (lost on exit).
    Memory,
    /// Single-file SQLite database.
    Sqlite { path: PathBuf },
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::Sqlite {
            path: PathBuf::from("./wldindex.db"),
        }
    }
}

/// Host policy for an event that fails to decode or persist.
///
/// The projector itself never retries or skips; this is the caller's call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Stop at the first failure.
    #[default]
    Abort,
    /// Log the failure and continue with the next event.
    Skip,
}

/// Log level per component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Global default level: "trace" | "debug" | "info" | "warn" | "error"
    #[serde(default = "default_level")]
    pub level: String,
    /// Override per component: component_name → level
    #[serde(default)]
    pub components: HashMap<String, String>,
    /// Emit JSON structured logs (true) or human-readable text (false)
    #[serde(default)]
    pub json: bool,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            components: HashMap::new(),
            json: false,
        }
    }
}

impl LogConfig {
    /// `EnvFilter` directive string, e.g. `"info,wldindex_storage=debug"`.
    pub fn directives(&self) -> String {
        let mut components: Vec<_> = self.components.iter().collect();
        components.sort();
        let mut directives = self.level.clone();
        for (component, level) in components {
            directives.push_str(&format!(",{}={}", component.replace('-', "_"), level));
        }
        directives
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = IndexerConfig::default();
        assert_eq!(cfg.chain, "ethereum");
        assert!(cfg.trace);
        assert_eq!(cfg.on_error, ErrorPolicy::Abort);
        assert_eq!(
            cfg.storage,
            StorageConfig::Sqlite {
                path: PathBuf::from("./wldindex.db")
            }
        );
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: IndexerConfig = serde_json::from_str(
            r#"{
                "id": "wld-optimism",
                "filter": { "addresses": ["0xdC6fF44d5d932Cbd77B52E5612Ba0529DC6226F1"] },
                "storage": { "backend": "memory" },
                "on_error": "skip"
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.id, "wld-optimism");
        assert_eq!(cfg.chain, "ethereum");
        assert_eq!(cfg.storage, StorageConfig::Memory);
        assert_eq!(cfg.on_error, ErrorPolicy::Skip);
        assert_eq!(cfg.filter.addresses.len(), 1);
        assert_eq!(cfg.log.level, "info");
    }

    #[test]
    fn log_directives_include_components() {
        let mut log = LogConfig::default();
        log.components.insert("wldindex-storage".into(), "debug".into());
        assert_eq!(log.directives(), "info,wldindex_storage=debug");
    }
}
