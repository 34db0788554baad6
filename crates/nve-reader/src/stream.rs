//! Byte-stream extraction strategy
//!
//! Makes no assumption about record boundaries: the reader walks the
//! region byte by byte looking for the literal entry name, then collects
//! hex digits from whatever follows. Tolerant of layout drift between
//! firmware revisions, at the cost of not being able to tell a corrupt
//! entry from a missing one; it simply runs out of scan budget.

use std::io::Read;
use tracing::trace;

use crate::NveError;
use crate::mac::MAC_LEN;

/// Match the entry name in the byte stream, then collect exactly twelve
/// ASCII hex digits from the bytes after it.
///
/// The match cursor resets to the start of the name on any mismatch, with
/// the mismatching byte reconsidered as a possible first name character.
/// Name substrings elsewhere in the region cause restarts but never false
/// completions, since collection begins only after the full name matched.
/// Non-hex bytes inside the post-match window are skipped, not errors.
/// Returns `Ok(None)` once `scan_limit` post-match bytes have been
/// examined without twelve digits accumulating, or at end of input.
pub fn read_entry<R: Read>(
    reader: &mut R,
    name: &str,
    scan_limit: usize,
) -> Result<Option<String>, NveError> {
    let target = name.as_bytes();
    if target.is_empty() {
        return Ok(None);
    }

    let mut matched = 0usize;
    let mut digits = String::with_capacity(MAC_LEN);
    let mut examined = 0usize;

    for byte in reader.bytes() {
        let byte = byte?;

        if matched < target.len() {
            if byte == target[matched] {
                matched += 1;
            } else {
                matched = usize::from(byte == target[0]);
            }
            continue;
        }

        examined += 1;
        if byte.is_ascii_hexdigit() {
            digits.push(byte as char);
            if digits.len() == MAC_LEN {
                return Ok(Some(digits));
            }
        }

        if examined >= scan_limit {
            trace!(
                "Entry {} scan limit of {} bytes exceeded with {} digits collected",
                name,
                scan_limit,
                digits.len()
            );
            return Ok(None);
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const LIMIT: usize = 28;

    fn extract(stream: &[u8], name: &str) -> Option<String> {
        read_entry(&mut Cursor::new(stream), name, LIMIT).unwrap()
    }

    #[test]
    fn test_name_followed_by_hex() {
        let stream = b"MACWLANAABBCCDDEEFF";
        assert_eq!(extract(stream, "MACWLAN"), Some("AABBCCDDEEFF".into()));
    }

    #[test]
    fn test_noise_before_name() {
        let stream = b"\x00\x7f\x12noiseMACWLAN112233445566tail";
        assert_eq!(extract(stream, "MACWLAN"), Some("112233445566".into()));
    }

    #[test]
    fn test_non_hex_bytes_are_skipped() {
        // NULs and punctuation interleaved with the digits
        let stream = b"MACBT\x00AA\x00BB-CC.DD\xffEE_FF";
        assert_eq!(extract(stream, "MACBT"), Some("AABBCCDDEEFF".into()));
    }

    #[test]
    fn test_stops_at_exactly_twelve_digits() {
        let stream = b"MACWLANAABBCCDDEEFF00112233";
        assert_eq!(extract(stream, "MACWLAN"), Some("AABBCCDDEEFF".into()));
    }

    #[test]
    fn test_case_preserved() {
        let stream = b"MACBTaabbccddeeff";
        assert_eq!(extract(stream, "MACBT"), Some("aabbccddeeff".into()));
    }

    #[test]
    fn test_partial_match_resets_and_recovers() {
        // Matching MACBT fails partway through MACWLAN, then succeeds on
        // the real entry downstream.
        let stream = b"MACWLANMACBT112233445566";
        assert_eq!(extract(stream, "MACBT"), Some("112233445566".into()));
    }

    #[test]
    fn test_mismatch_byte_can_restart_the_match() {
        // The second M both breaks the first attempt and starts the real one
        let stream = b"MMACWLANAABBCCDDEEFF";
        assert_eq!(extract(stream, "MACWLAN"), Some("AABBCCDDEEFF".into()));
    }

    #[test]
    fn test_name_substring_does_not_complete() {
        // "MACWLA" never completes; no digits may be collected
        let stream = b"MACWLA999999999999999999";
        assert_eq!(extract(stream, "MACWLAN"), None);
    }

    #[test]
    fn test_scan_limit_exceeded() {
        let mut stream = b"MACWLAN".to_vec();
        stream.extend(vec![b'.'; LIMIT]);
        stream.extend(b"AABBCCDDEEFF");
        assert_eq!(extract(&stream, "MACWLAN"), None);
    }

    #[test]
    fn test_digits_on_the_limit_boundary() {
        // Twelfth digit arrives exactly on the last byte of the budget
        let mut stream = b"MACBT".to_vec();
        stream.extend(vec![b'-'; LIMIT - MAC_LEN]);
        stream.extend(b"AABBCCDDEEFF");
        assert_eq!(extract(&stream, "MACBT"), Some("AABBCCDDEEFF".into()));
    }

    #[test]
    fn test_eof_during_collection() {
        let stream = b"MACWLANAABB";
        assert_eq!(extract(stream, "MACWLAN"), None);
    }

    #[test]
    fn test_name_absent() {
        let stream = b"nothing of interest here";
        assert_eq!(extract(stream, "MACWLAN"), None);
    }

    #[test]
    fn test_empty_stream() {
        assert_eq!(extract(b"", "MACWLAN"), None);
    }

    #[test]
    fn test_empty_name_never_matches() {
        assert_eq!(extract(b"AABBCCDDEEFF", ""), None);
    }
}
