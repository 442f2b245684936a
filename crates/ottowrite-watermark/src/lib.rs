//! OttoWrite Watermarking
//!
//! Embeds a unique, low-visibility identifier into manuscript text using three
//! redundant encodings of the same id, so the mark survives copy/paste and
//! most reformatting: zero-width marks, homoglyph substitution, and
//! sentence-boundary whitespace. Each technique is independently detectable.
//!
//! All transforms are pure and total over string input; binary formats must be
//! reduced to plain text by an external extractor first.

pub mod bits;
pub mod detect;
pub mod fingerprint;
pub mod homoglyph;
pub mod id;
pub mod whitespace;
pub mod zero_width;

pub use bits::BitCursor;
pub use detect::{detect_watermark, WatermarkDetection};
pub use fingerprint::{fingerprint, CharacterFrequency, ContentFingerprint};
pub use id::{generate_watermark_id, WATERMARK_ID_LEN};

use ottowrite_core::models::WatermarkTechnique;

/// The techniques `apply_watermark` embeds, in application order.
pub fn applied_techniques() -> Vec<WatermarkTechnique> {
    vec![
        WatermarkTechnique::ZeroWidth,
        WatermarkTechnique::Homoglyph,
        WatermarkTechnique::Whitespace,
    ]
}

/// Apply all three encodings of `watermark_id` to `text`.
///
/// Each technique consumes its own cursor over the id so the encodings stay
/// independently decodable; stripping one (e.g. zero-width characters) leaves
/// the others intact.
pub fn apply_watermark(text: &str, watermark_id: &str) -> String {
    let marked = zero_width::insert_marks(text, watermark_id);

    let mut homoglyph_bits = BitCursor::new(watermark_id.as_bytes());
    let substituted = homoglyph::encode(&marked, &mut homoglyph_bits);

    let mut whitespace_bits = BitCursor::new(watermark_id.as_bytes());
    whitespace::encode(&substituted, &mut whitespace_bits)
}
