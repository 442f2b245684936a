//! Access rule evaluation.
//!
//! Checks run in a fixed short-circuit order - expiry, then session cap, then
//! IP, then device - because each is cheaper and more definitive than the
//! next. Denials are routine outcomes carried as data, never errors.

use ottowrite_core::models::{
    AccessAction, AccessControlRules, AccessDecision, AccessRequestContext, Permission,
};

pub const REASON_EXPIRED: &str = "Access has expired";
pub const REASON_SESSION: &str = "Session time limit exceeded";
pub const REASON_IP: &str = "IP address not authorized";
pub const REASON_DEVICE: &str = "Device not authorized";
pub const REASON_ACTION_DISABLED: &str = "Action not permitted by share settings";

/// Decide whether a request is allowed under `rules`.
///
/// Empty allow-lists mean "no restriction"; a non-empty list denies when the
/// corresponding request attribute is absent or not listed.
pub fn evaluate(rules: &AccessControlRules, ctx: &AccessRequestContext) -> AccessDecision {
    if let Some(expiry) = rules.expiry_date {
        if ctx.current_time > expiry {
            return AccessDecision::deny(REASON_EXPIRED);
        }
    }

    if let (Some(cap_minutes), Some(duration)) =
        (rules.max_session_minutes, ctx.session_duration_secs)
    {
        if duration > cap_minutes * 60 {
            return AccessDecision::deny(REASON_SESSION);
        }
    }

    if !rules.ip_restrictions.is_empty() {
        let permitted = ctx
            .ip_address
            .as_ref()
            .is_some_and(|ip| rules.ip_restrictions.iter().any(|allowed| allowed == ip));
        if !permitted {
            return AccessDecision::deny(REASON_IP);
        }
    }

    if !rules.device_restrictions.is_empty() {
        let permitted = ctx.device_fingerprint.as_ref().is_some_and(|fp| {
            rules.device_restrictions.iter().any(|allowed| allowed == fp)
        });
        if !permitted {
            return AccessDecision::deny(REASON_DEVICE);
        }
    }

    AccessDecision::allow()
}

/// Permission a mutating action requires, or `None` for view-type actions
/// (viewing is authorized by the token itself, not this check).
pub fn required_permission(action: AccessAction) -> Option<Permission> {
    match action {
        AccessAction::DownloadAttempted => Some(Permission::Download),
        AccessAction::PrintAttempted => Some(Permission::Print),
        AccessAction::CopyAttempted => Some(Permission::Copy),
        // Re-sharing hands the recipient a copy; it requires the same
        // permission as downloading one.
        AccessAction::ShareAttempted => Some(Permission::Download),
        _ => None,
    }
}

/// Whether `action` is unauthorized under `permissions`; returns the missing
/// permission when it is.
pub fn unauthorized_action(action: AccessAction, permissions: &[Permission]) -> Option<Permission> {
    match required_permission(action) {
        Some(required) if !permissions.contains(&required) => Some(required),
        _ => None,
    }
}

/// Whether the share's own settings allow `action`. The flags narrow what the
/// token grants; an action needs both its permission and its flag.
pub fn action_allowed_by_rules(rules: &AccessControlRules, action: AccessAction) -> bool {
    match action {
        AccessAction::DownloadAttempted => rules.allow_download,
        AccessAction::PrintAttempted => rules.allow_print,
        AccessAction::CopyAttempted => rules.allow_copy,
        AccessAction::ShareAttempted => rules.allow_download,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn open_rules() -> AccessControlRules {
        AccessControlRules::default()
    }

    fn ctx(ip: Option<&str>, device: Option<&str>) -> AccessRequestContext {
        AccessRequestContext::now(ip.map(String::from), device.map(String::from))
    }

    #[test]
    fn test_no_restrictions_allows() {
        let decision = evaluate(&open_rules(), &ctx(None, None));
        assert!(decision.allowed);
        assert!(decision.reason.is_none());
    }

    #[test]
    fn test_past_expiry_always_denies() {
        let mut rules = open_rules();
        rules.expiry_date = Some(Utc::now() - Duration::days(1));
        rules.ip_restrictions = vec!["10.0.0.1".to_string()];

        // Denied even when the IP would match.
        let decision = evaluate(&rules, &ctx(Some("10.0.0.1"), None));
        assert!(!decision.allowed);
        assert_eq!(decision.reason.as_deref(), Some(REASON_EXPIRED));
    }

    #[test]
    fn test_future_expiry_allows() {
        let mut rules = open_rules();
        rules.expiry_date = Some(Utc::now() + Duration::days(7));
        assert!(evaluate(&rules, &ctx(None, None)).allowed);
    }

    #[test]
    fn test_ip_allow_list() {
        let mut rules = open_rules();
        rules.ip_restrictions = vec!["10.0.0.1".to_string(), "10.0.0.2".to_string()];

        assert!(evaluate(&rules, &ctx(Some("10.0.0.2"), None)).allowed);

        let denied = evaluate(&rules, &ctx(Some("192.168.1.1"), None));
        assert_eq!(denied.reason.as_deref(), Some(REASON_IP));

        // Absent IP with a non-empty list denies too.
        let absent = evaluate(&rules, &ctx(None, None));
        assert_eq!(absent.reason.as_deref(), Some(REASON_IP));
    }

    #[test]
    fn test_device_allow_list() {
        let mut rules = open_rules();
        rules.device_restrictions = vec!["fp_abc123".to_string()];

        assert!(evaluate(&rules, &ctx(None, Some("fp_abc123"))).allowed);

        let denied = evaluate(&rules, &ctx(None, Some("fp_other")));
        assert_eq!(denied.reason.as_deref(), Some(REASON_DEVICE));
    }

    #[test]
    fn test_empty_lists_never_deny() {
        // Empty means "no restriction", not "deny all".
        let rules = open_rules();
        assert!(evaluate(&rules, &ctx(Some("203.0.113.9"), Some("fp_x"))).allowed);
        assert!(evaluate(&rules, &ctx(None, None)).allowed);
    }

    #[test]
    fn test_ip_checked_before_device() {
        let mut rules = open_rules();
        rules.ip_restrictions = vec!["10.0.0.1".to_string()];
        rules.device_restrictions = vec!["fp_abc".to_string()];

        let decision = evaluate(&rules, &ctx(Some("8.8.8.8"), Some("fp_nope")));
        assert_eq!(decision.reason.as_deref(), Some(REASON_IP));
    }

    #[test]
    fn test_session_cap_enforced() {
        let mut rules = open_rules();
        rules.max_session_minutes = Some(30);

        let within = ctx(None, None).with_session_duration(Some(29 * 60));
        assert!(evaluate(&rules, &within).allowed);

        // At the cap still allows; only exceeding it denies.
        let at_cap = ctx(None, None).with_session_duration(Some(30 * 60));
        assert!(evaluate(&rules, &at_cap).allowed);

        let over = ctx(None, None).with_session_duration(Some(30 * 60 + 1));
        let denied = evaluate(&rules, &over);
        assert!(!denied.allowed);
        assert_eq!(denied.reason.as_deref(), Some(REASON_SESSION));
    }

    #[test]
    fn test_session_cap_needs_both_sides() {
        // No cap configured: any duration passes.
        let no_cap = ctx(None, None).with_session_duration(Some(10 * 3600));
        assert!(evaluate(&open_rules(), &no_cap).allowed);

        // Cap configured but no duration reported: nothing to compare.
        let mut rules = open_rules();
        rules.max_session_minutes = Some(30);
        assert!(evaluate(&rules, &ctx(None, None)).allowed);
    }

    #[test]
    fn test_expiry_checked_before_session_cap() {
        let mut rules = open_rules();
        rules.expiry_date = Some(Utc::now() - Duration::days(1));
        rules.max_session_minutes = Some(30);

        let over = ctx(None, None).with_session_duration(Some(3600));
        assert_eq!(
            evaluate(&rules, &over).reason.as_deref(),
            Some(REASON_EXPIRED)
        );
    }

    #[test]
    fn test_action_flags_narrow_the_token() {
        let mut rules = open_rules();
        rules.allow_print = true;

        assert!(action_allowed_by_rules(&rules, AccessAction::PrintAttempted));
        assert!(!action_allowed_by_rules(&rules, AccessAction::DownloadAttempted));
        assert!(!action_allowed_by_rules(&rules, AccessAction::CopyAttempted));
        // Re-sharing rides on the download flag, like its permission.
        assert!(!action_allowed_by_rules(&rules, AccessAction::ShareAttempted));
        rules.allow_download = true;
        assert!(action_allowed_by_rules(&rules, AccessAction::ShareAttempted));

        // View actions are never gated by the flags.
        assert!(action_allowed_by_rules(&open_rules(), AccessAction::ViewFull));
        assert!(action_allowed_by_rules(&open_rules(), AccessAction::SessionEnd));
    }

    #[test]
    fn test_unauthorized_action_mapping() {
        let perms = vec![Permission::View, Permission::Print];
        assert_eq!(
            unauthorized_action(AccessAction::DownloadAttempted, &perms),
            Some(Permission::Download)
        );
        assert_eq!(unauthorized_action(AccessAction::PrintAttempted, &perms), None);
        assert_eq!(
            unauthorized_action(AccessAction::CopyAttempted, &perms),
            Some(Permission::Copy)
        );
        assert_eq!(
            unauthorized_action(AccessAction::ShareAttempted, &perms),
            Some(Permission::Download)
        );
    }

    #[test]
    fn test_view_actions_always_authorized_here() {
        assert_eq!(unauthorized_action(AccessAction::ViewFull, &[]), None);
        assert_eq!(unauthorized_action(AccessAction::ViewQuery, &[]), None);
        assert_eq!(unauthorized_action(AccessAction::SessionStart, &[]), None);
    }
}
