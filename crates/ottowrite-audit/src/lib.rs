//! OttoWrite Audit
//!
//! Pure pieces of the leak-tracking audit trail: the device fingerprint
//! derived from request headers and the anomaly heuristics that run over
//! access-log aggregates. Persistence lives in the store crate.

pub mod detector;
pub mod fingerprint;

pub use detector::{evaluate_session, is_suspicious_user_agent, AnomalySignal, SessionStats};
pub use fingerprint::device_fingerprint;
