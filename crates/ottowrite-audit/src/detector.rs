//! Anomaly detection over the access log.
//!
//! Four fixed heuristics run over per-session aggregates after each logged
//! access. Each returns a typed signal; severity is assigned by the policy
//! layer when the signal becomes an alert. Rules are deliberately coarse -
//! they flag for human review, they never block access on their own.

use chrono::{DateTime, Utc};
use ottowrite_core::models::AlertType;
use regex::Regex;
use std::sync::LazyLock;

/// A session longer than this is flagged as excessive.
pub const MAX_SESSION_SECS: i64 = 4 * 3600;
/// More actions than this inside [`RAPID_ACCESS_WINDOW_SECS`] is flagged.
pub const RAPID_ACCESS_ACTIONS: i64 = 100;
pub const RAPID_ACCESS_WINDOW_SECS: i64 = 60;
/// More download attempts than this is flagged.
pub const MAX_DOWNLOAD_ATTEMPTS: i64 = 3;
/// More copy attempts than this is flagged.
pub const MAX_COPY_ATTEMPTS: i64 = 10;

static AUTOMATION_UA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)bot|crawl|spider|scrape|curl|wget|python|postman|insomnia|headless|phantom|selenium|puppeteer",
    )
    .unwrap_or_else(|e| panic!("invalid automation user-agent pattern: {}", e))
});

/// Per-partner, per-submission aggregates the detector runs against.
/// Computed by the access-log store over the partner's recent rows.
#[derive(Debug, Clone, Default)]
pub struct SessionStats {
    pub total_actions: i64,
    pub download_attempts: i64,
    pub copy_attempts: i64,
    /// Longest recorded session duration, if any session has ended.
    pub max_session_secs: Option<i64>,
    pub first_action_at: Option<DateTime<Utc>>,
    pub last_action_at: Option<DateTime<Utc>>,
    /// Every distinct user agent seen in the window. A scraper that rotates
    /// between an automation agent and a browser agent must not slip past by
    /// being on the browser one when the scan runs.
    pub user_agents: Vec<String>,
}

impl SessionStats {
    fn window_secs(&self) -> Option<i64> {
        match (self.first_action_at, self.last_action_at) {
            (Some(first), Some(last)) => Some((last - first).num_seconds()),
            _ => None,
        }
    }
}

/// One fired heuristic: what kind, and a human-readable account of why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnomalySignal {
    pub alert_type: AlertType,
    pub description: String,
}

/// Whether a user-agent string looks like automation rather than a browser.
///
/// `java` needs a substring check because hits like "Java/17.0.2" must fire
/// while "javascript" in a browser UA must not, and the pattern language here
/// has no way to say "java not followed by script".
pub fn is_suspicious_user_agent(user_agent: &str) -> bool {
    if AUTOMATION_UA.is_match(user_agent) {
        return true;
    }
    let lower = user_agent.to_lowercase();
    lower.contains("java") && !lower.contains("javascript")
}

/// Run every heuristic over `stats`, returning all signals that fired.
pub fn evaluate_session(stats: &SessionStats) -> Vec<AnomalySignal> {
    let mut signals = Vec::new();

    let suspicious_agents: Vec<&str> = stats
        .user_agents
        .iter()
        .map(String::as_str)
        .filter(|ua| is_suspicious_user_agent(ua))
        .collect();
    if !suspicious_agents.is_empty() {
        signals.push(AnomalySignal {
            alert_type: AlertType::SuspiciousUserAgent,
            description: format!(
                "Automated user agent detected: {}",
                suspicious_agents.join("; ")
            ),
        });
    }

    if let Some(secs) = stats.max_session_secs {
        if secs > MAX_SESSION_SECS {
            signals.push(AnomalySignal {
                alert_type: AlertType::ExcessiveDuration,
                description: format!(
                    "Session lasted {} seconds, above the {} second limit",
                    secs, MAX_SESSION_SECS
                ),
            });
        }
    }

    if stats.total_actions > RAPID_ACCESS_ACTIONS {
        if let Some(window) = stats.window_secs() {
            if window < RAPID_ACCESS_WINDOW_SECS {
                signals.push(AnomalySignal {
                    alert_type: AlertType::RapidAccess,
                    description: format!(
                        "{} actions within {} seconds",
                        stats.total_actions, window
                    ),
                });
            }
        }
    }

    if stats.download_attempts > MAX_DOWNLOAD_ATTEMPTS {
        signals.push(AnomalySignal {
            alert_type: AlertType::ExcessiveDownloads,
            description: format!(
                "{} download attempts, above the limit of {}",
                stats.download_attempts, MAX_DOWNLOAD_ATTEMPTS
            ),
        });
    }
    if stats.copy_attempts > MAX_COPY_ATTEMPTS {
        signals.push(AnomalySignal {
            alert_type: AlertType::ExcessiveCopies,
            description: format!(
                "{} copy attempts, above the limit of {}",
                stats.copy_attempts, MAX_COPY_ATTEMPTS
            ),
        });
    }

    if !signals.is_empty() {
        tracing::warn!(
            signal_count = signals.len(),
            total_actions = stats.total_actions,
            "Anomaly heuristics fired for session"
        );
    }

    signals
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn stats_with_window(actions: i64, window_secs: i64) -> SessionStats {
        let start = Utc::now() - Duration::hours(1);
        SessionStats {
            total_actions: actions,
            first_action_at: Some(start),
            last_action_at: Some(start + Duration::seconds(window_secs)),
            ..SessionStats::default()
        }
    }

    #[test]
    fn test_browser_user_agents_pass() {
        assert!(!is_suspicious_user_agent(
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
             (KHTML, like Gecko) Chrome/120.0 Safari/537.36"
        ));
        // "javascript" alone must not trip the java check.
        assert!(!is_suspicious_user_agent("Mozilla/5.0 javascript-enabled"));
    }

    #[test]
    fn test_automation_user_agents_flagged() {
        assert!(is_suspicious_user_agent("Googlebot/2.1 (+http://www.google.com/bot.html)"));
        assert!(is_suspicious_user_agent("python-requests/2.31.0"));
        assert!(is_suspicious_user_agent("curl/8.4.0"));
        assert!(is_suspicious_user_agent("Java/17.0.2"));
        assert!(is_suspicious_user_agent("HeadlessChrome/120.0"));
    }

    #[test]
    fn test_clean_session_yields_no_signals() {
        let stats = SessionStats {
            total_actions: 12,
            download_attempts: 1,
            copy_attempts: 2,
            max_session_secs: Some(1800),
            user_agents: vec!["Mozilla/5.0 (X11; Linux x86_64) Firefox/121.0".to_string()],
            ..stats_with_window(12, 1800)
        };
        assert!(evaluate_session(&stats).is_empty());
    }

    #[test]
    fn test_rotating_user_agents_still_flagged() {
        // Alternating a browser agent with an automation agent leaves both in
        // the window; the automation one must still fire.
        let stats = SessionStats {
            user_agents: vec![
                "Mozilla/5.0 (X11; Linux x86_64) Firefox/121.0".to_string(),
                "curl/8.4.0".to_string(),
            ],
            ..SessionStats::default()
        };
        let signals = evaluate_session(&stats);
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].alert_type, AlertType::SuspiciousUserAgent);
        assert!(signals[0].description.contains("curl/8.4.0"));
    }

    #[test]
    fn test_excessive_duration_fires_strictly_above_limit() {
        let mut stats = SessionStats {
            max_session_secs: Some(MAX_SESSION_SECS),
            ..SessionStats::default()
        };
        assert!(evaluate_session(&stats).is_empty());

        stats.max_session_secs = Some(MAX_SESSION_SECS + 1);
        let signals = evaluate_session(&stats);
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].alert_type, AlertType::ExcessiveDuration);
    }

    #[test]
    fn test_rapid_access_needs_both_count_and_window() {
        // 150 actions in 30 seconds fires.
        let signals = evaluate_session(&stats_with_window(150, 30));
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].alert_type, AlertType::RapidAccess);

        // Same count spread over ten minutes does not.
        assert!(evaluate_session(&stats_with_window(150, 600)).is_empty());
        // Few actions in a tight window does not.
        assert!(evaluate_session(&stats_with_window(5, 3)).is_empty());
    }

    #[test]
    fn test_download_and_copy_thresholds() {
        let stats = SessionStats {
            download_attempts: MAX_DOWNLOAD_ATTEMPTS + 1,
            copy_attempts: MAX_COPY_ATTEMPTS + 5,
            ..SessionStats::default()
        };
        let signals = evaluate_session(&stats);
        let types: Vec<_> = signals.iter().map(|s| s.alert_type).collect();
        assert!(types.contains(&AlertType::ExcessiveDownloads));
        assert!(types.contains(&AlertType::ExcessiveCopies));

        let at_limit = SessionStats {
            download_attempts: MAX_DOWNLOAD_ATTEMPTS,
            copy_attempts: MAX_COPY_ATTEMPTS,
            ..SessionStats::default()
        };
        assert!(evaluate_session(&at_limit).is_empty());
    }

    #[test]
    fn test_multiple_signals_accumulate() {
        let stats = SessionStats {
            download_attempts: 10,
            user_agents: vec!["Scrapy/2.11".to_string()],
            max_session_secs: Some(MAX_SESSION_SECS * 2),
            ..SessionStats::default()
        };
        assert_eq!(evaluate_session(&stats).len(), 3);
    }
}
