//! Watermark presence detection.
//!
//! A triage heuristic, not a proof: each encoding leaves a recognizable
//! signature, and confidence is the fraction of signature checks that matched.
//! Confidence below 1.0 means "possible match requiring human review".

use ottowrite_core::models::WatermarkTechnique;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{homoglyph, whitespace, zero_width};

/// Result of testing a text against a candidate watermark id.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct WatermarkDetection {
    pub detected: bool,
    /// Matched checks / attempted checks, in [0, 1].
    pub confidence: f64,
    /// Techniques whose signature was found.
    pub techniques: Vec<WatermarkTechnique>,
}

const CHECKS_ATTEMPTED: u32 = 4;

/// Test `text` for traces of `candidate_id`.
pub fn detect_watermark(text: &str, candidate_id: &str) -> WatermarkDetection {
    let mut matched = 0u32;
    let mut techniques = Vec::new();

    if zero_width::contains_marks(text) {
        matched += 1;
        techniques.push(WatermarkTechnique::ZeroWidth);
    }

    let exact_sequence = zero_width::contains_sequence(text, candidate_id);
    if exact_sequence {
        matched += 1;
        if !techniques.contains(&WatermarkTechnique::ZeroWidth) {
            techniques.push(WatermarkTechnique::ZeroWidth);
        }
    }

    if homoglyph::contains_homoglyphs(text) {
        matched += 1;
        techniques.push(WatermarkTechnique::Homoglyph);
    }

    if whitespace::has_double_space_pattern(text) {
        matched += 1;
        techniques.push(WatermarkTechnique::Whitespace);
    }

    WatermarkDetection {
        detected: exact_sequence || matched >= 2,
        confidence: f64::from(matched) / f64::from(CHECKS_ATTEMPTED),
        techniques,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_not_detected() {
        let result = detect_watermark("A perfectly ordinary manuscript page.", "deadbeef");
        assert!(!result.detected);
        assert_eq!(result.confidence, 0.0);
        assert!(result.techniques.is_empty());
    }

    #[test]
    fn test_exact_sequence_alone_is_detected() {
        let text = format!("Some text{}", zero_width::encode_id("deadbeef"));
        let result = detect_watermark(&text, "deadbeef");
        assert!(result.detected);
        assert!(result.confidence > 0.0);
        assert_eq!(result.techniques, vec![WatermarkTechnique::ZeroWidth]);
    }

    #[test]
    fn test_foreign_marks_alone_not_detected() {
        // Zero-width characters from some other source, wrong id.
        let text = format!("Some text{}", zero_width::encode_id("0123456789"));
        let result = detect_watermark(&text, "deadbeef");
        assert!(!result.detected);
        assert_eq!(result.confidence, 0.25);
    }

    #[test]
    fn test_confidence_counts_all_signatures() {
        let text = format!(
            "One.  Two.  Thr{}ee with а homoglyph{}",
            '\u{0435}',
            zero_width::encode_id("deadbeef")
        );
        let result = detect_watermark(&text, "deadbeef");
        assert!(result.detected);
        assert_eq!(result.confidence, 1.0);
        assert_eq!(result.techniques.len(), 3);
    }
}
