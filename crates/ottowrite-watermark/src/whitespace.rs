//! Whitespace encoding.
//!
//! After every sentence-ending period followed by a single space, the encoder
//! emits one space for bit 0 and two spaces for bit 1, consuming the
//! identifier stream left to right. Detection only looks for the repeated
//! double-space-after-period pattern; it cannot recover the identifier.

use crate::bits::BitCursor;

/// Encode the bitstream into sentence-boundary spacing.
pub fn encode(text: &str, bits: &mut BitCursor) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 32);
    let mut i = 0;
    while i < chars.len() {
        let is_boundary = chars[i] == '.'
            && i + 1 < chars.len()
            && chars[i + 1] == ' '
            && (i + 2 >= chars.len() || chars[i + 2] != ' ');
        if is_boundary {
            out.push('.');
            out.push(' ');
            if bits.next_bit() == Some(true) {
                out.push(' ');
            }
            i += 2;
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
    out
}

/// Whether the repeated double-space-after-period signature is present.
pub fn has_double_space_pattern(text: &str) -> bool {
    text.matches(".  ").count() >= 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_one_doubles_the_space() {
        let text = "One. Two. Three. Four.";
        let mut bits = BitCursor::new(&[0b1010_0000]);
        let encoded = encode(text, &mut bits);
        assert_eq!(encoded, "One.  Two. Three.  Four.");
    }

    #[test]
    fn test_zero_bits_leave_spacing_unchanged() {
        let text = "One. Two. Three.";
        let mut bits = BitCursor::new(&[0x00]);
        assert_eq!(encode(text, &mut bits), text);
    }

    #[test]
    fn test_one_bit_per_boundary() {
        let text = "A. B. C. no more periods here";
        let mut bits = BitCursor::new(&[0xFF]);
        let before = bits.remaining();
        encode(text, &mut bits);
        assert_eq!(before - bits.remaining(), 3);
    }

    #[test]
    fn test_existing_double_space_not_extended() {
        let text = "Legacy.  typed text. More.";
        let mut bits = BitCursor::new(&[0xFF]);
        let encoded = encode(text, &mut bits);
        // The pre-existing double space is not a boundary; the single-space
        // boundary after "text." is.
        assert_eq!(encoded, "Legacy.  typed text.  More.");
    }

    #[test]
    fn test_double_space_pattern_requires_repetition() {
        assert!(!has_double_space_pattern("One.  Two. Three."));
        assert!(has_double_space_pattern("One.  Two.  Three."));
        assert!(!has_double_space_pattern("No pattern at all. None."));
    }

    #[test]
    fn test_trailing_period_without_space_ignored() {
        let text = "Ends with a period.";
        let mut bits = BitCursor::new(&[0xFF]);
        assert_eq!(encode(text, &mut bits), text);
    }
}
