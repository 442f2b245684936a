//! OttoWrite Partner Verification
//!
//! Scores partner credential submissions and assigns discrete trust levels.

pub mod scorer;

pub use scorer::{
    calculate_score, evaluate, evaluate_criteria, verification_level, VerificationOutcome,
};
