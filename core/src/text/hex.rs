//! Hex-literal helpers shared by the extractors.

/// Prefix marking a byte-literal data line in the exports.
pub const HEX_PREFIX: &str = "0x";

pub fn is_hex_data_line(line: &str) -> bool {
    line.starts_with(HEX_PREFIX)
}

/// Parses a `0x`-prefixed literal. Returns `None` for anything else.
pub fn parse_hex_literal(literal: &str) -> Option<u32> {
    let digits = literal
        .strip_prefix("0x")
        .or_else(|| literal.strip_prefix("0X"))?;
    u32::from_str_radix(digits, 16).ok()
}

/// Formats a value as `0xNN` with at least two uppercase digits.
pub fn format_byte(value: u32) -> String {
    format!("0x{:02X}", value)
}

/// Formats a register address as `0xNNNN`.
pub fn format_word(value: u16) -> String {
    format!("0x{:04X}", value)
}

/// Counts the comma-separated literals of a byte list.
pub fn count_literals(text: &str) -> usize {
    text.split(',')
        .filter(|literal| !literal.trim().is_empty())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_either_prefix_case() {
        assert_eq!(parse_hex_literal("0x76"), Some(0x76));
        assert_eq!(parse_hex_literal("0X0a"), Some(0x0A));
        assert_eq!(parse_hex_literal("76"), None);
        assert_eq!(parse_hex_literal("0x"), None);
    }

    #[test]
    fn byte_and_word_formatting_pad_uppercase() {
        assert_eq!(format_byte(0x3), "0x03");
        assert_eq!(format_byte(0x3b), "0x3B");
        assert_eq!(format_word(0x81c), "0x081C");
    }

    #[test]
    fn literal_count_ignores_trailing_separators() {
        assert_eq!(count_literals("0x01, 0x02,\n0x03,"), 3);
        assert_eq!(count_literals(""), 0);
    }
}
