//! Output sinks for extracted identifiers
//!
//! The loader publishes each successfully extracted MAC at most once, and
//! raises a ready flag after the per-entry loop has run. The filesystem
//! sink is the production implementation; [`MockSink`] records calls in
//! memory for testing without touching real output paths.

use nve_config::MacEntry;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::NveError;

/// Destination for canonical MAC values
pub trait MacSink {
    /// Publish one identifier. Called at most once per entry and never for
    /// an entry whose extraction failed.
    fn publish(&mut self, entry: &MacEntry, mac: &str) -> Result<(), NveError>;

    /// Raise the "MACs are ready" flag. Called once, after every
    /// configured entry has been processed.
    fn mark_ready(&mut self) -> Result<(), NveError>;
}

/// Writes each MAC to its entry's output file and raises a flag file
pub struct FsSink {
    ready_flag: PathBuf,
}

impl FsSink {
    pub fn new(ready_flag: PathBuf) -> Self {
        Self { ready_flag }
    }

    fn write_value(path: &PathBuf, value: &str) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, format!("{}\n", value))
    }
}

impl MacSink for FsSink {
    fn publish(&mut self, entry: &MacEntry, mac: &str) -> Result<(), NveError> {
        Self::write_value(&entry.output, mac).map_err(|source| NveError::Publish {
            name: entry.name.clone(),
            source,
        })?;
        info!("Published {} to {}", entry.name, entry.output.display());
        Ok(())
    }

    fn mark_ready(&mut self) -> Result<(), NveError> {
        Self::write_value(&self.ready_flag, "1").map_err(|source| NveError::Publish {
            name: "ready flag".to_string(),
            source,
        })?;
        debug!("Ready flag raised at {}", self.ready_flag.display());
        Ok(())
    }
}

/// In-memory sink for tests
#[derive(Debug, Default)]
pub struct MockSink {
    pub published: Vec<(String, String)>,
    pub ready: bool,
}

impl MockSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The value published for `name`, if any
    pub fn value_for(&self, name: &str) -> Option<&str> {
        self.published
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

impl MacSink for MockSink {
    fn publish(&mut self, entry: &MacEntry, mac: &str) -> Result<(), NveError> {
        self.published.push((entry.name.clone(), mac.to_string()));
        Ok(())
    }

    fn mark_ready(&mut self) -> Result<(), NveError> {
        self.ready = true;
        Ok(())
    }
}
