//! Record-walk extraction strategy
//!
//! Treats the region after the base offset as packed fixed-size records
//! and walks them until the target name matches or the file ends. This is
//! the older of the two vendor strategies and assumes the partition layout
//! never drifts; the stream strategy in [`crate::stream`] exists because
//! that assumption broke across firmware revisions.

use std::io::{Read, Seek, SeekFrom};
use tracing::trace;

use crate::NveError;
use crate::mac::MAC_LEN;

/// Packed on-flash record size in bytes
pub const RECORD_SIZE: usize = 128;

const NAME_LEN: usize = 8;
const DATA_LEN: usize = 104;

/// One NVE record as laid out on flash: little-endian u32 fields around a
/// fixed-width name and payload.
#[derive(Debug, Clone)]
pub struct NvRecord {
    pub id: u32,
    pub name: [u8; NAME_LEN],
    pub property: u32,
    pub valid_size: u32,
    pub crc: u32,
    pub data: [u8; DATA_LEN],
}

impl NvRecord {
    /// Decode a record from its packed 128-byte form
    pub fn parse(buf: &[u8; RECORD_SIZE]) -> Self {
        let mut name = [0u8; NAME_LEN];
        name.copy_from_slice(&buf[4..12]);
        let mut data = [0u8; DATA_LEN];
        data.copy_from_slice(&buf[24..24 + DATA_LEN]);

        Self {
            id: u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]),
            name,
            property: u32::from_le_bytes([buf[12], buf[13], buf[14], buf[15]]),
            valid_size: u32::from_le_bytes([buf[16], buf[17], buf[18], buf[19]]),
            crc: u32::from_le_bytes([buf[20], buf[21], buf[22], buf[23]]),
            data,
        }
    }

    /// Length-bounded prefix comparison against the target entry name.
    /// The on-flash name field is not necessarily null-terminated.
    pub fn name_matches(&self, name: &str) -> bool {
        let target = name.as_bytes();
        target.len() <= NAME_LEN && &self.name[..target.len()] == target
    }
}

/// Walk records from `base` until one matches `name`; return the leading
/// 12 payload bytes as the raw identifier.
///
/// The record's `crc` and `valid_size` fields are deliberately not checked
/// before the payload is used; the vendor loader never did, and devices in
/// the field depend on that leniency. The caller validates the returned
/// bytes as hex before formatting.
pub fn read_entry<R: Read + Seek>(
    reader: &mut R,
    base: u64,
    name: &str,
) -> Result<Option<String>, NveError> {
    reader.seek(SeekFrom::Start(base))?;

    let mut buf = [0u8; RECORD_SIZE];
    let mut index = 0usize;
    loop {
        if !read_exact_or_eof(reader, &mut buf)? {
            trace!("Record walk hit end of file after {} records", index);
            return Ok(None);
        }

        let record = NvRecord::parse(&buf);
        if record.name_matches(name) {
            trace!("Entry {} matched at record index {}", name, index);
            let raw: String = record.data[..MAC_LEN]
                .iter()
                .map(|&b| b as char)
                .collect();
            return Ok(Some(raw));
        }

        index += 1;
    }
}

/// Read a full record, or report EOF if no complete record remains
fn read_exact_or_eof<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<bool> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..])? {
            0 => return Ok(false),
            n => filled += n,
        }
    }
    Ok(true)
}
