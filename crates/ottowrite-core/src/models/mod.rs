//! Data models for the access-control core
//!
//! Organized by domain: capability tokens, per-submission access rules,
//! watermarks, audit logging, and partner verification.

mod access;
mod audit;
mod share;
mod token;
mod verification;
mod watermark;

// Re-export all models for convenient imports
pub use access::*;
pub use audit::*;
pub use share::*;
pub use token::*;
pub use verification::*;
pub use watermark::*;
