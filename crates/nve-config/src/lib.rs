//! Configuration for the NVE factory-identifier loader
//!
//! Covers the candidate partition paths, the extraction strategy, the table
//! of named entries to extract, and the output sinks. All keys are optional
//! in the TOML file; the defaults mirror the values observed on HiSilicon
//! devices, so an empty (or absent) config file is a valid deployment.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Standard configuration directory
pub const CONFIG_DIR: &str = "/etc/nveinit";

/// How the extractor locates an entry's value inside the partition.
///
/// The two strategies come from different revisions of the vendor loader
/// and have different failure profiles on malformed partitions; they are
/// selected per deployment and never mixed within a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Walk packed fixed-size records and compare the name field
    Record,
    /// Byte-wise literal name match followed by hex-digit collection;
    /// tolerant of unknown record boundaries and layout drift
    #[default]
    Stream,
}

/// Candidate block device paths for the NVE partition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartitionConfig {
    /// Tried in order; the first readable path wins
    #[serde(default = "default_candidates")]
    pub candidates: Vec<PathBuf>,
}

fn default_candidates() -> Vec<PathBuf> {
    vec![
        PathBuf::from("/dev/block/by-name/nvme"),
        PathBuf::from("/dev/block/platform/hi_mci.0/by-name/nvme"),
        PathBuf::from("/dev/block/mmcblk0p7"),
    ]
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            candidates: default_candidates(),
        }
    }
}

/// Extraction tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    #[serde(default)]
    pub strategy: Strategy,

    /// Upper bound on bytes examined after a stream-strategy name match.
    /// Implementation-chosen, not derived from any documented partition
    /// format; 28 is the value carried by the vendor loader.
    #[serde(default = "default_entry_scan_limit")]
    pub entry_scan_limit: usize,
}

fn default_entry_scan_limit() -> usize {
    28
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            entry_scan_limit: default_entry_scan_limit(),
        }
    }
}

/// One named identifier to extract and where to publish it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacEntry {
    /// Literal entry name inside the partition, e.g. "MACWLAN"
    pub name: String,

    /// File the canonical MAC text is written to
    pub output: PathBuf,
}

/// Ready-flag sink, raised once the per-entry loop has run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadyConfig {
    #[serde(default = "default_ready_flag")]
    pub flag: PathBuf,
}

fn default_ready_flag() -> PathBuf {
    PathBuf::from("/run/nveinit/macs_ready")
}

impl Default for ReadyConfig {
    fn default() -> Self {
        Self {
            flag: default_ready_flag(),
        }
    }
}

fn default_entries() -> Vec<MacEntry> {
    vec![
        MacEntry {
            name: "MACWLAN".to_string(),
            output: PathBuf::from("/data/vendor/wifi/macwifi"),
        },
        MacEntry {
            name: "MACBT".to_string(),
            output: PathBuf::from("/data/vendor/bluedroid/macbt"),
        },
    ]
}

/// Main loader configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NveConfig {
    #[serde(default)]
    pub partition: PartitionConfig,

    #[serde(default)]
    pub extract: ExtractConfig,

    #[serde(default = "default_entries")]
    pub entries: Vec<MacEntry>,

    #[serde(default)]
    pub ready: ReadyConfig,
}

impl Default for NveConfig {
    fn default() -> Self {
        Self {
            partition: PartitionConfig::default(),
            extract: ExtractConfig::default(),
            entries: default_entries(),
            ready: ReadyConfig::default(),
        }
    }
}

impl NveConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the default location
    pub fn load_default() -> Result<Self, ConfigError> {
        let config_file = Path::new(CONFIG_DIR).join("config.toml");
        if config_file.exists() {
            return Self::load(&config_file);
        }

        // No file at all is a valid deployment
        tracing::warn!("No configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, contents)?;
        tracing::info!("Configuration saved to {}", path.display());
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.partition.candidates.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one partition candidate path is required".into(),
            ));
        }

        for entry in &self.entries {
            if entry.name.is_empty() {
                return Err(ConfigError::Invalid("entry name must not be empty".into()));
            }
        }

        if self.extract.entry_scan_limit == 0 {
            return Err(ConfigError::Invalid(
                "entry_scan_limit must be greater than zero".into(),
            ));
        }

        Ok(())
    }
}
