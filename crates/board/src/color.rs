//! `#RRGGBB` color strings from the API.

use crate::error::ColorParseError;

/// Fallback when neither the record nor the configured default parses (pale yellow).
pub const FALLBACK_NOTE_COLOR: [f32; 4] = [1.0, 0.961, 0.616, 1.0];

/// Parse `#RRGGBB` (leading `#` optional, any hex case) into opaque RGBA.
pub fn parse_hex_color(input: &str) -> Result<[f32; 4], ColorParseError> {
    let trimmed = input.trim();
    let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ColorParseError(input.to_string()));
    }

    let channel = |range: std::ops::Range<usize>| -> Result<f32, ColorParseError> {
        u8::from_str_radix(&hex[range], 16)
            .map(|value| f32::from(value) / 255.0)
            .map_err(|_| ColorParseError(input.to_string()))
    };

    Ok([channel(0..2)?, channel(2..4)?, channel(4..6)?, 1.0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_with_and_without_hash() {
        assert_eq!(parse_hex_color("#FF0000"), Ok([1.0, 0.0, 0.0, 1.0]));
        assert_eq!(parse_hex_color("00ff00"), Ok([0.0, 1.0, 0.0, 1.0]));
    }

    #[test]
    fn channel_values_are_normalized() {
        let [r, g, b, a] = parse_hex_color("#80a0Ff").expect("valid color");
        assert!((r - 128.0 / 255.0).abs() < 1e-6);
        assert!((g - 160.0 / 255.0).abs() < 1e-6);
        assert_eq!(b, 1.0);
        assert_eq!(a, 1.0);
    }

    #[test]
    fn rejects_malformed_colors() {
        for bad in ["", "#", "#FFF", "#GGGGGG", "#FF00001", "red", "#ÿÿÿ"] {
            assert_eq!(
                parse_hex_color(bad),
                Err(ColorParseError(bad.to_string())),
                "{bad:?} should be rejected"
            );
        }
    }
}
