use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Per-submission access policy, evaluated against the live request context on
/// every access. Independent of the token. Empty allow-lists mean "no
/// restriction", never "deny all".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct AccessControlRules {
    #[serde(default)]
    pub allow_download: bool,
    #[serde(default)]
    pub allow_print: bool,
    #[serde(default)]
    pub allow_copy: bool,
    #[serde(default)]
    pub allow_screenshot: bool,
    /// Cap on a single viewing session, in minutes.
    #[serde(default)]
    pub max_session_minutes: Option<i64>,
    /// Hard cutoff after which all access is denied.
    #[serde(default)]
    pub expiry_date: Option<DateTime<Utc>>,
    /// IP allow-list; requests from other addresses are denied.
    #[serde(default)]
    pub ip_restrictions: Vec<String>,
    /// Device-fingerprint allow-list.
    #[serde(default)]
    pub device_restrictions: Vec<String>,
}

impl Default for AccessControlRules {
    fn default() -> Self {
        Self {
            allow_download: false,
            allow_print: false,
            allow_copy: false,
            allow_screenshot: false,
            max_session_minutes: None,
            expiry_date: None,
            ip_restrictions: Vec::new(),
            device_restrictions: Vec::new(),
        }
    }
}

/// Live request context the rules are evaluated against.
#[derive(Debug, Clone)]
pub struct AccessRequestContext {
    pub ip_address: Option<String>,
    pub device_fingerprint: Option<String>,
    /// Seconds the session lasted, when the client reports one ending.
    pub session_duration_secs: Option<i64>,
    pub current_time: DateTime<Utc>,
}

impl AccessRequestContext {
    pub fn now(ip_address: Option<String>, device_fingerprint: Option<String>) -> Self {
        Self {
            ip_address,
            device_fingerprint,
            session_duration_secs: None,
            current_time: Utc::now(),
        }
    }

    pub fn with_session_duration(mut self, secs: Option<i64>) -> Self {
        self.session_duration_secs = secs;
        self
    }
}

/// Outcome of a rule evaluation. Denials are routine outcomes, not errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AccessDecision {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl AccessDecision {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    pub fn deny(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
        }
    }
}
