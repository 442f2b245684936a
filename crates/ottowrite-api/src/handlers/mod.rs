//! HTTP handlers, one module per resource.

pub mod access;
pub mod alerts;
pub mod health;
pub mod shares;
pub mod verification;
pub mod watermark;
