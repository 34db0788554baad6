//! NVE partition reader
//!
//! Extracts factory-programmed identifiers (Wi-Fi and Bluetooth MAC
//! addresses) from the raw NVE flash partition of HiSilicon devices and
//! publishes them to configured sinks. The partition layout is an
//! undocumented vendor format; the reader anchors itself by scanning for a
//! literal signature string and decoding the bytes around it.
//!
//! The pass is strictly linear: locate a readable partition path, scan for
//! the signature, extract each configured entry, format it, publish it.
//! Nothing is cached between passes; every invocation reopens the
//! partition from scratch.
//!
//! # Example
//!
//! ```no_run
//! use nve_config::NveConfig;
//! use nve_reader::{FsSink, NveLoader};
//!
//! fn main() -> Result<(), nve_reader::NveError> {
//!     let config = NveConfig::default();
//!     let mut sink = FsSink::new(config.ready.flag.clone());
//!     let summary = NveLoader::new(config).run(&mut sink)?;
//!     println!("published {} of {} entries", summary.published, summary.attempted);
//!     Ok(())
//! }
//! ```

mod loader;
mod locate;
mod mac;
mod publish;
mod record;
mod scan;
mod stream;

pub use loader::{LoadSummary, NveLoader};
pub use locate::locate_partition;
pub use mac::{MAC_LEN, format_mac};
pub use publish::{FsSink, MacSink, MockSink};
pub use record::{NvRecord, RECORD_SIZE};
pub use scan::{SCAN_WINDOW, SIGNATURE, find_signature};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NveError {
    #[error("No readable NVE partition among candidate paths")]
    PartitionNotFound,

    #[error("Signature not found in {0}")]
    SignatureNotFound(PathBuf),

    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    #[error("Not a 12-digit hex identifier: {0:?}")]
    InvalidMac(String),

    #[error("Publish failed for {name}: {source}")]
    Publish {
        name: String,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
