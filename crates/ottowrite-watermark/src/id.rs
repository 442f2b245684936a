//! Watermark identifier generation.
//!
//! Identifiers mix the share identifiers with the current time and CSPRNG
//! bytes before hashing, so they are never reproducible from public inputs.
//! The random component makes collisions negligible; no uniqueness check is
//! performed. The weak rolling hash used for device fingerprints must never be
//! used here.

use chrono::Utc;
use rand::Rng;
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Length of the identifier in hex characters.
pub const WATERMARK_ID_LEN: usize = 32;

/// Generate a fresh watermark identifier for one share event.
pub fn generate_watermark_id(submission_id: Uuid, partner_id: Uuid, user_id: Uuid) -> String {
    let mut rng = rand::rng();
    let nonce: [u8; 8] = rng.random();
    let material = format!(
        "{}|{}|{}|{}|{}",
        submission_id,
        partner_id,
        user_id,
        Utc::now().timestamp_millis(),
        hex::encode(nonce)
    );
    let digest = Sha256::digest(material.as_bytes());
    hex::encode(digest)[..WATERMARK_ID_LEN].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_is_32_hex_chars() {
        let id = generate_watermark_id(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        assert_eq!(id.len(), WATERMARK_ID_LEN);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_same_inputs_give_distinct_ids() {
        let (s, p, u) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let a = generate_watermark_id(s, p, u);
        let b = generate_watermark_id(s, p, u);
        assert_ne!(a, b, "random component must make ids unique");
    }
}
