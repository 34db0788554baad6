//! Candidate path probing for the NVE partition
//!
//! Device variants expose the partition under different block device
//! aliases, so the loader carries an ordered candidate list and uses the
//! first path the process can actually read.

use nix::unistd::{AccessFlags, access};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Return the first candidate path that exists and is readable.
///
/// A pure probe: no file handle is opened or kept. Exhausting the list is
/// an expected outcome on device variants without an NVE partition, so it
/// is reported as `None` rather than an error.
pub fn locate_partition<P: AsRef<Path>>(candidates: &[P]) -> Option<PathBuf> {
    for candidate in candidates {
        let path = candidate.as_ref();
        match access(path, AccessFlags::R_OK) {
            Ok(()) => {
                debug!("Using NVE partition at {}", path.display());
                return Some(path.to_path_buf());
            }
            Err(errno) => {
                debug!("Skipping {}: {}", path.display(), errno);
            }
        }
    }

    warn!("No readable NVE partition among {} candidates", candidates.len());
    None
}
