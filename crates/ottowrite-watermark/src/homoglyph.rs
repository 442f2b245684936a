//! Homoglyph substitution.
//!
//! Watermark-eligible Latin letters are swapped for visually identical
//! Cyrillic code points when the next bit of the identifier stream is 1, and
//! left untouched when it is 0. One bit is consumed per eligible letter
//! encountered; once the stream is exhausted the text passes through
//! unchanged.

use crate::bits::BitCursor;

/// Latin letter -> Cyrillic look-alike. Only these letters are ever touched.
pub const HOMOGLYPH_PAIRS: [(char, char); 16] = [
    ('a', '\u{0430}'),
    ('e', '\u{0435}'),
    ('o', '\u{043E}'),
    ('p', '\u{0440}'),
    ('c', '\u{0441}'),
    ('x', '\u{0445}'),
    ('y', '\u{0443}'),
    ('i', '\u{0456}'),
    ('A', '\u{0410}'),
    ('E', '\u{0415}'),
    ('O', '\u{041E}'),
    ('P', '\u{0420}'),
    ('C', '\u{0421}'),
    ('X', '\u{0425}'),
    ('Y', '\u{0423}'),
    ('I', '\u{0406}'),
];

fn substitute_for(c: char) -> Option<char> {
    HOMOGLYPH_PAIRS
        .iter()
        .find(|(latin, _)| *latin == c)
        .map(|(_, glyph)| *glyph)
}

fn latin_for(c: char) -> Option<char> {
    HOMOGLYPH_PAIRS
        .iter()
        .find(|(_, glyph)| *glyph == c)
        .map(|(latin, _)| *latin)
}

/// Whether a character belongs to the watermark-eligible Latin set.
pub fn is_eligible(c: char) -> bool {
    substitute_for(c).is_some()
}

/// Encode the bitstream into `text` by substituting eligible letters.
pub fn encode(text: &str, bits: &mut BitCursor) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match substitute_for(c) {
            Some(glyph) => match bits.next_bit() {
                Some(true) => out.push(glyph),
                Some(false) | None => out.push(c),
            },
            None => out.push(c),
        }
    }
    out
}

/// Whether any homoglyph code point is present.
pub fn contains_homoglyphs(text: &str) -> bool {
    text.chars().any(|c| latin_for(c).is_some())
}

/// Map homoglyphs back to their Latin originals.
pub fn normalize(text: &str) -> String {
    text.chars().map(|c| latin_for(c).unwrap_or(c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_eligible_letters_substituted() {
        // All-ones stream substitutes every eligible letter it reaches.
        let text = "The explorer carried maps and a copy of the journal.";
        let mut bits = BitCursor::new(&[0xFF; 32]);
        let encoded = encode(text, &mut bits);

        for (orig, enc) in text.chars().zip(encoded.chars()) {
            if is_eligible(orig) {
                assert_ne!(orig, enc, "eligible letter {:?} was not substituted", orig);
            } else {
                assert_eq!(orig, enc, "ineligible character {:?} was altered", orig);
            }
        }
    }

    #[test]
    fn test_zero_bits_leave_text_unchanged() {
        let text = "apace epoxy copy";
        let mut bits = BitCursor::new(&[0x00; 8]);
        assert_eq!(encode(text, &mut bits), text);
    }

    #[test]
    fn test_exhausted_stream_stops_substituting() {
        let text = "aaaaaaaaaa";
        let mut bits = BitCursor::new(&[0xFF]);
        let encoded = encode(text, &mut bits);
        let substituted = encoded.chars().filter(|c| *c == '\u{0430}').count();
        // Eight bits available, so only the first eight letters change.
        assert_eq!(substituted, 8);
        assert!(encoded.ends_with("aa"));
    }

    #[test]
    fn test_one_bit_consumed_per_eligible_letter() {
        let text = "ae xyz!";
        let mut bits = BitCursor::new(&[0xFF]);
        let before = bits.remaining();
        encode(text, &mut bits);
        // a, e, x, y are eligible; z and punctuation are not.
        assert_eq!(before - bits.remaining(), 4);
    }

    #[test]
    fn test_normalize_round_trip() {
        let text = "a precise copy of every chapter";
        let mut bits = BitCursor::new(&[0xFF; 16]);
        let encoded = encode(text, &mut bits);
        assert!(contains_homoglyphs(&encoded));
        assert_eq!(normalize(&encoded), text);
    }

    #[test]
    fn test_visible_text_unaffected_for_plain_ascii() {
        assert!(!contains_homoglyphs("plain text without marks"));
    }
}
