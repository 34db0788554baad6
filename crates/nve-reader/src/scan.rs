//! Signature scan over the raw partition
//!
//! The NVE partition carries a literal `SWVERSI` marker shortly before the
//! record region. The partition can be tens of megabytes, so it is
//! streamed in fixed windows rather than read whole.

use std::io::{Read, Seek, SeekFrom};
use tracing::trace;

use crate::NveError;

/// Literal marker preceding the record region
pub const SIGNATURE: &[u8] = b"SWVERSI";

/// Bytes read per scan step
pub const SCAN_WINDOW: usize = 4096;

/// Find the absolute offset of the first signature occurrence.
///
/// Successive windows start `SCAN_WINDOW - SIGNATURE.len()` bytes apart,
/// so each window re-reads the tail of the previous one; a marker that
/// straddles a window boundary is always seen whole in one of the two
/// windows. Returns `Ok(None)` when the signature is absent; the file is
/// read through exactly once.
pub fn find_signature<R: Read + Seek>(reader: &mut R) -> Result<Option<u64>, NveError> {
    let mut window = [0u8; SCAN_WINDOW];
    let stride = (SCAN_WINDOW - SIGNATURE.len()) as u64;
    let mut offset: u64 = 0;

    loop {
        reader.seek(SeekFrom::Start(offset))?;
        let len = read_window(reader, &mut window)?;
        trace!("Scanned {} bytes at offset {}", len, offset);

        if len >= SIGNATURE.len() {
            for pos in 0..=len - SIGNATURE.len() {
                if &window[pos..pos + SIGNATURE.len()] == SIGNATURE {
                    return Ok(Some(offset + pos as u64));
                }
            }
        }

        // A short window means the file ended inside it
        if len < SCAN_WINDOW {
            return Ok(None);
        }

        offset += stride;
    }
}

/// Fill as much of `buf` as the reader can provide before EOF
fn read_window<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..])? {
            0 => break,
            n => filled += n,
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn image_with_signature_at(pos: usize, total: usize) -> Vec<u8> {
        assert!(pos + SIGNATURE.len() <= total);
        let mut image = vec![0xEEu8; total];
        image[pos..pos + SIGNATURE.len()].copy_from_slice(SIGNATURE);
        image
    }

    #[test]
    fn test_signature_at_start() {
        let image = image_with_signature_at(0, 64);
        let found = find_signature(&mut Cursor::new(image)).unwrap();
        assert_eq!(found, Some(0));
    }

    #[test]
    fn test_signature_mid_window() {
        let image = image_with_signature_at(1000, 8192);
        let found = find_signature(&mut Cursor::new(image)).unwrap();
        assert_eq!(found, Some(1000));
    }

    #[test]
    fn test_signature_straddles_window_boundary() {
        // 4093 puts three marker bytes in the first 4096-byte window and
        // four in the next; only the overlapping re-read sees it whole.
        let image = image_with_signature_at(4093, 12288);
        let found = find_signature(&mut Cursor::new(image)).unwrap();
        assert_eq!(found, Some(4093));
    }

    #[test]
    fn test_signature_at_every_boundary_position() {
        for pos in 4085..4100 {
            let image = image_with_signature_at(pos, 8192);
            let found = find_signature(&mut Cursor::new(image)).unwrap();
            assert_eq!(found, Some(pos as u64), "marker at {} missed", pos);
        }
    }

    #[test]
    fn test_signature_at_end_of_file() {
        let total = 10_000;
        let image = image_with_signature_at(total - SIGNATURE.len(), total);
        let found = find_signature(&mut Cursor::new(image)).unwrap();
        assert_eq!(found, Some((total - SIGNATURE.len()) as u64));
    }

    #[test]
    fn test_first_occurrence_wins() {
        let mut image = vec![0u8; 16384];
        image[300..307].copy_from_slice(SIGNATURE);
        image[9000..9007].copy_from_slice(SIGNATURE);
        let found = find_signature(&mut Cursor::new(image)).unwrap();
        assert_eq!(found, Some(300));
    }

    #[test]
    fn test_no_signature_terminates() {
        // Length deliberately not a multiple of the window stride
        let image = vec![0x55u8; 10_001];
        let found = find_signature(&mut Cursor::new(image)).unwrap();
        assert_eq!(found, None);
    }

    #[test]
    fn test_partial_signature_is_not_a_match() {
        let mut image = vec![0u8; 512];
        image[100..106].copy_from_slice(b"SWVERS");
        let found = find_signature(&mut Cursor::new(image)).unwrap();
        assert_eq!(found, None);
    }

    #[test]
    fn test_file_shorter_than_signature() {
        let image = vec![b'S'; 3];
        let found = find_signature(&mut Cursor::new(image)).unwrap();
        assert_eq!(found, None);
    }

    #[test]
    fn test_empty_file() {
        let found = find_signature(&mut Cursor::new(Vec::new())).unwrap();
        assert_eq!(found, None);
    }

    #[test]
    fn test_case_sensitive_match() {
        let mut image = vec![0u8; 512];
        image[50..57].copy_from_slice(b"swversi");
        let found = find_signature(&mut Cursor::new(image)).unwrap();
        assert_eq!(found, None);
    }
}
