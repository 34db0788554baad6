//! Canonical MAC formatting

use crate::NveError;

/// Hex digits in a MAC address, without separators
pub const MAC_LEN: usize = 12;

/// Format a 12-hex-digit string as `XX:XX:XX:XX:XX:XX`.
///
/// Case is preserved as read from the partition; there is no OUI or
/// checksum validation. Anything other than exactly twelve ASCII hex
/// digits is rejected, which also guards the record strategy, where the
/// payload bytes are used without further structure checks.
pub fn format_mac(raw: &str) -> Result<String, NveError> {
    if raw.len() != MAC_LEN || !raw.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(NveError::InvalidMac(raw.to_string()));
    }

    let mut mac = String::with_capacity(MAC_LEN + 5);
    for (i, pair) in raw.as_bytes().chunks(2).enumerate() {
        if i > 0 {
            mac.push(':');
        }
        mac.push(pair[0] as char);
        mac.push(pair[1] as char);
    }

    Ok(mac)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_uppercase() {
        assert_eq!(format_mac("AABBCCDDEEFF").unwrap(), "AA:BB:CC:DD:EE:FF");
    }

    #[test]
    fn test_format_preserves_case() {
        assert_eq!(format_mac("aAbBcC001122").unwrap(), "aA:bB:cC:00:11:22");
    }

    #[test]
    fn test_formatted_length_is_17() {
        for raw in ["000000000000", "ffffffffffff", "0123456789AB"] {
            assert_eq!(format_mac(raw).unwrap().len(), 17);
        }
    }

    #[test]
    fn test_octet_grouping() {
        let raw = "0123456789AB";
        let mac = format_mac(raw).unwrap();
        let expected = format!(
            "{}:{}:{}:{}:{}:{}",
            &raw[0..2],
            &raw[2..4],
            &raw[4..6],
            &raw[6..8],
            &raw[8..10],
            &raw[10..12]
        );
        assert_eq!(mac, expected);
    }

    #[test]
    fn test_rejects_short_input() {
        assert!(matches!(
            format_mac("AABBCC"),
            Err(NveError::InvalidMac(_))
        ));
    }

    #[test]
    fn test_rejects_long_input() {
        assert!(matches!(
            format_mac("AABBCCDDEEFF00"),
            Err(NveError::InvalidMac(_))
        ));
    }

    #[test]
    fn test_rejects_non_hex() {
        assert!(matches!(
            format_mac("AABBCCDDEEGG"),
            Err(NveError::InvalidMac(_))
        ));
    }

    #[test]
    fn test_rejects_empty() {
        assert!(matches!(format_mac(""), Err(NveError::InvalidMac(_))));
    }
}
