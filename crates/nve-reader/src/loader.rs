//! The load pass: locate, scan, extract, format, publish
//!
//! One pass per invocation, no state carried between passes. Each entry
//! reopens the partition and re-derives the base offset, so the offset can
//! never be used against a handle other than the one that produced it.

use nve_config::{MacEntry, NveConfig, Strategy};
use std::fs::File;
use std::io::{BufReader, Seek, SeekFrom};
use std::path::Path;
use tracing::{debug, warn};

use crate::locate::locate_partition;
use crate::mac::format_mac;
use crate::publish::MacSink;
use crate::scan::find_signature;
use crate::{NveError, record, stream};

/// Record data begins this many bytes before the signature; the gap holds
/// a length/version prefix.
const BASE_OFFSET_ADJUST: u64 = 4;

/// Outcome of one load pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    /// Entries configured for this pass
    pub attempted: usize,
    /// Entries extracted and handed to the sink
    pub published: usize,
}

/// Runs the full extraction pass described by an [`NveConfig`]
pub struct NveLoader {
    config: NveConfig,
}

impl NveLoader {
    pub fn new(config: NveConfig) -> Self {
        Self { config }
    }

    /// Execute one pass against `sink`.
    ///
    /// Per-entry failures are warnings, not errors: one unreadable or
    /// missing identifier does not block the others, and the ready flag is
    /// raised once every configured entry has been processed. Only the
    /// absence of any readable partition path aborts the pass, in which
    /// case no entry was attempted and the flag stays down.
    pub fn run(&self, sink: &mut dyn MacSink) -> Result<LoadSummary, NveError> {
        let path = locate_partition(&self.config.partition.candidates)
            .ok_or(NveError::PartitionNotFound)?;

        let mut summary = LoadSummary {
            attempted: self.config.entries.len(),
            published: 0,
        };

        for entry in &self.config.entries {
            match self.read_entry(&path, entry) {
                Ok(mac) => match sink.publish(entry, &mac) {
                    Ok(()) => summary.published += 1,
                    Err(e) => warn!("Unable to publish {}: {}", entry.name, e),
                },
                Err(e) => warn!("Unable to read {} from NVE partition: {}", entry.name, e),
            }
        }

        if let Err(e) = sink.mark_ready() {
            warn!("Unable to raise ready flag: {}", e);
        }

        Ok(summary)
    }

    /// Extract and format one entry from a freshly opened partition handle
    fn read_entry(&self, path: &Path, entry: &MacEntry) -> Result<String, NveError> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);

        let signature = find_signature(&mut reader)?
            .ok_or_else(|| NveError::SignatureNotFound(path.to_path_buf()))?;
        let base = signature.saturating_sub(BASE_OFFSET_ADJUST);
        debug!(
            "Signature at offset {} in {}, record region from {}",
            signature,
            path.display(),
            base
        );

        let raw = match self.config.extract.strategy {
            Strategy::Record => record::read_entry(&mut reader, base, &entry.name)?,
            Strategy::Stream => {
                reader.seek(SeekFrom::Start(base))?;
                stream::read_entry(&mut reader, &entry.name, self.config.extract.entry_scan_limit)?
            }
        }
        .ok_or_else(|| NveError::EntryNotFound(entry.name.clone()))?;

        format_mac(&raw)
    }
}
