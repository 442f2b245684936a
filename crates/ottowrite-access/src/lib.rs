//! OttoWrite Access Control
//!
//! Capability tokens and rule evaluation for shared manuscripts. A share
//! carries a signed token naming what the holder may do, and a set of rules
//! narrowing where and until when they may do it.

pub mod rules;
pub mod token;

pub use rules::{action_allowed_by_rules, evaluate, required_permission, unauthorized_action};
pub use token::{
    has_permission, AccessTokenService, IssuedToken, TokenError, TokenGrant, DEFAULT_EXPIRY_DAYS,
};
