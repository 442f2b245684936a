//! Coarse content fingerprinting.
//!
//! Recognizes near-duplicate leaked copies independent of watermark survival:
//! structural counts, head/tail MD5 hashes, and the dominant character
//! distribution are folded into a single SHA-256 digest. For binary containers
//! this is the fallback signal once a format-specific extractor has supplied
//! plain text.

use md5::Md5;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use utoipa::ToSchema;

/// Number of characters hashed at each end of the text.
const EDGE_LEN: usize = 1000;
/// Number of character frequencies retained.
const TOP_CHARS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CharacterFrequency {
    pub character: String,
    pub count: usize,
}

/// Structural summary of a text plus its folded digest.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ContentFingerprint {
    pub length: usize,
    pub word_count: usize,
    pub sentence_count: usize,
    pub paragraph_count: usize,
    pub head_hash: String,
    pub tail_hash: String,
    pub top_characters: Vec<CharacterFrequency>,
    /// SHA-256 over the canonical rendering of the fields above.
    pub digest: String,
}

fn md5_hex(text: &str) -> String {
    hex::encode(Md5::digest(text.as_bytes()))
}

/// Compute the fingerprint of a text.
pub fn fingerprint(text: &str) -> ContentFingerprint {
    let chars: Vec<char> = text.chars().collect();
    let length = chars.len();

    let word_count = text.split_whitespace().count();
    let sentence_count = chars
        .iter()
        .filter(|c| matches!(c, '.' | '!' | '?'))
        .count();
    let paragraph_count = text.split("\n\n").filter(|p| !p.trim().is_empty()).count();

    let head: String = chars.iter().take(EDGE_LEN).collect();
    let tail: String = chars
        .iter()
        .skip(length.saturating_sub(EDGE_LEN))
        .collect();
    let head_hash = md5_hex(&head);
    let tail_hash = md5_hex(&tail);

    let mut counts: HashMap<char, usize> = HashMap::new();
    for c in chars.iter().filter(|c| !c.is_whitespace()) {
        *counts.entry(*c).or_insert(0) += 1;
    }
    let mut ranked: Vec<(char, usize)> = counts.into_iter().collect();
    // Sort by count descending, then by character for determinism.
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    let top_characters: Vec<CharacterFrequency> = ranked
        .into_iter()
        .take(TOP_CHARS)
        .map(|(c, count)| CharacterFrequency {
            character: c.to_string(),
            count,
        })
        .collect();

    let canonical = format!(
        "{}|{}|{}|{}|{}|{}|{}",
        length,
        word_count,
        sentence_count,
        paragraph_count,
        head_hash,
        tail_hash,
        top_characters
            .iter()
            .map(|f| format!("{}:{}", f.character, f.count))
            .collect::<Vec<_>>()
            .join(",")
    );
    let digest = hex::encode(Sha256::digest(canonical.as_bytes()));

    ContentFingerprint {
        length,
        word_count,
        sentence_count,
        paragraph_count,
        head_hash,
        tail_hash,
        top_characters,
        digest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_is_deterministic() {
        let text = "Chapter one.\n\nIt was a dark and stormy night. The rain fell.";
        assert_eq!(fingerprint(text), fingerprint(text));
    }

    #[test]
    fn test_different_texts_differ() {
        let a = fingerprint("The first manuscript draft.");
        let b = fingerprint("The second manuscript draft.");
        assert_ne!(a.digest, b.digest);
    }

    #[test]
    fn test_structural_counts() {
        let text = "One two three. Four five!\n\nSix seven?";
        let fp = fingerprint(text);
        assert_eq!(fp.word_count, 7);
        assert_eq!(fp.sentence_count, 3);
        assert_eq!(fp.paragraph_count, 2);
    }

    #[test]
    fn test_top_characters_capped_at_ten() {
        let text = "abcdefghijklmnopqrstuvwxyz".repeat(3);
        let fp = fingerprint(&text);
        assert_eq!(fp.top_characters.len(), 10);
        assert!(fp.top_characters.iter().all(|f| f.count == 3));
    }

    #[test]
    fn test_empty_text_is_total() {
        let fp = fingerprint("");
        assert_eq!(fp.length, 0);
        assert_eq!(fp.word_count, 0);
        assert!(fp.top_characters.is_empty());
        assert!(!fp.digest.is_empty());
    }
}
