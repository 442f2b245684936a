//! Database repositories for the data access layer.
//!
//! Each repository owns one domain entity: shares, the append-only access
//! log, and suspicious-activity alerts. All take a `PgPool` by value (pools
//! are cheaply cloneable handles) and surface `AppError`.

pub mod access_log;
pub mod alert;
pub mod share;

pub use access_log::AccessLogRepository;
pub use alert::AlertRepository;
pub use share::ShareRepository;
