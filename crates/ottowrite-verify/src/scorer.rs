//! Partner verification scoring.
//!
//! A submitted credential set is reduced to boolean criteria, the criteria to
//! a 0-100 score, the score to a discrete level. Scoring is additive with
//! capped categories so no single category can carry a partner to Elite.

use ottowrite_core::models::{VerificationCriteria, VerificationLevel, VerificationRequest};
use serde::Serialize;
use utoipa::ToSchema;

/// Consumer mail providers whose addresses do not count as a business email.
const FREE_MAIL_DOMAINS: [&str; 8] = [
    "gmail.com",
    "yahoo.com",
    "hotmail.com",
    "outlook.com",
    "aol.com",
    "icloud.com",
    "mail.com",
    "protonmail.com",
];

/// Free site builders whose subdomains do not count as a business website.
const FREE_HOSTING_DOMAINS: [&str; 7] = [
    "wordpress.com",
    "blogspot.com",
    "wix.com",
    "weebly.com",
    "squarespace.com",
    "sites.google.com",
    "github.io",
];

pub const ELITE_THRESHOLD: u8 = 90;
pub const PREMIUM_THRESHOLD: u8 = 70;
pub const STANDARD_THRESHOLD: u8 = 50;
pub const BASIC_THRESHOLD: u8 = 30;

/// Score plus everything that went into it, returned to the reviewer UI.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VerificationOutcome {
    pub criteria: VerificationCriteria,
    pub score: u8,
    pub level: Option<VerificationLevel>,
}

fn host_matches(host: &str, domain: &str) -> bool {
    host == domain || host.ends_with(&format!(".{}", domain))
}

fn is_business_email(email: &str) -> bool {
    match email.rsplit_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => {
            let domain = domain.to_lowercase();
            !FREE_MAIL_DOMAINS.iter().any(|free| domain == *free)
        }
        _ => false,
    }
}

fn is_business_website(url: &str) -> bool {
    let stripped = url
        .trim()
        .trim_start_matches("https://")
        .trim_start_matches("http://");
    let host = stripped
        .split('/')
        .next()
        .unwrap_or("")
        .trim_start_matches("www.")
        .to_lowercase();
    if host.is_empty() || !host.contains('.') {
        return false;
    }
    !FREE_HOSTING_DOMAINS.iter().any(|free| host_matches(&host, free))
}

/// Reduce a request to the boolean criteria the score is computed from.
pub fn evaluate_criteria(request: &VerificationRequest) -> VerificationCriteria {
    VerificationCriteria {
        legitimate_business_email: request
            .business_email
            .as_deref()
            .is_some_and(is_business_email),
        legitimate_website: request.website.as_deref().is_some_and(is_business_website),
        has_phone: request.phone.as_deref().is_some_and(|p| !p.trim().is_empty()),
        has_address: request
            .address
            .as_deref()
            .is_some_and(|a| !a.trim().is_empty()),
        association_count: request.industry_associations.len(),
        has_membership_proof: request.membership_proof_url.is_some(),
        has_sales_history: request
            .sales_history
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty()),
        has_client_list: !request.client_list.is_empty(),
        social_link_count: request.social_links.len(),
    }
}

/// Additive score over the criteria, capped per category and at 100 overall.
pub fn calculate_score(criteria: &VerificationCriteria) -> u8 {
    let mut score: u32 = 0;

    if criteria.legitimate_business_email {
        score += 5;
    }
    if criteria.legitimate_website {
        score += 5;
    }
    if criteria.has_phone {
        score += 5;
    }
    if criteria.has_address {
        score += 5;
    }
    score += (criteria.association_count as u32 * 10).min(15);
    if criteria.has_membership_proof {
        score += 15;
    }
    if criteria.has_sales_history {
        score += 15;
    }
    if criteria.has_client_list {
        score += 15;
    }
    score += (criteria.social_link_count as u32 * 4).min(20);

    score.min(100) as u8
}

/// Map a score to its level; below `Basic` the partner stays unverified.
pub fn verification_level(score: u8) -> Option<VerificationLevel> {
    match score {
        s if s >= ELITE_THRESHOLD => Some(VerificationLevel::Elite),
        s if s >= PREMIUM_THRESHOLD => Some(VerificationLevel::Premium),
        s if s >= STANDARD_THRESHOLD => Some(VerificationLevel::Standard),
        s if s >= BASIC_THRESHOLD => Some(VerificationLevel::Basic),
        _ => None,
    }
}

/// Full pipeline: criteria, score, level.
pub fn evaluate(request: &VerificationRequest) -> VerificationOutcome {
    let criteria = evaluate_criteria(request);
    let score = calculate_score(&criteria);
    let level = verification_level(score);

    tracing::debug!(
        partner_id = %request.partner_id,
        score,
        level = level.map(|l| l.to_string()).unwrap_or_else(|| "none".to_string()),
        "Evaluated partner verification"
    );

    VerificationOutcome {
        criteria,
        score,
        level,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn empty_request() -> VerificationRequest {
        VerificationRequest {
            partner_id: Uuid::new_v4(),
            business_email: None,
            website: None,
            phone: None,
            address: None,
            industry_associations: Vec::new(),
            membership_proof_url: None,
            sales_history: None,
            client_list: Vec::new(),
            social_links: Vec::new(),
        }
    }

    fn full_request() -> VerificationRequest {
        VerificationRequest {
            partner_id: Uuid::new_v4(),
            business_email: Some("agent@birchlane-literary.com".to_string()),
            website: Some("https://www.birchlane-literary.com".to_string()),
            phone: Some("+1 212 555 0188".to_string()),
            address: Some("410 W 24th St, New York, NY".to_string()),
            industry_associations: vec!["AALA".to_string(), "RWA".to_string()],
            membership_proof_url: Some("https://aala.example.org/members/4417".to_string()),
            sales_history: Some("Twelve titles placed with major houses".to_string()),
            client_list: vec!["A. Rowe".to_string(), "B. Nilsen".to_string()],
            social_links: vec![
                "https://twitter.com/birchlane".to_string(),
                "https://linkedin.com/company/birchlane".to_string(),
                "https://instagram.com/birchlane".to_string(),
                "https://facebook.com/birchlane".to_string(),
                "https://bsky.app/profile/birchlane".to_string(),
            ],
        }
    }

    #[test]
    fn test_free_mail_is_not_business_email() {
        assert!(!is_business_email("someone@gmail.com"));
        assert!(!is_business_email("someone@GMAIL.com"));
        assert!(is_business_email("someone@birchlane-literary.com"));
        assert!(!is_business_email("not-an-email"));
    }

    #[test]
    fn test_free_hosting_is_not_business_website() {
        assert!(!is_business_website("https://myagency.wordpress.com"));
        assert!(!is_business_website("http://pages.github.io/agency"));
        assert!(is_business_website("https://www.birchlane-literary.com/about"));
        assert!(!is_business_website(""));
    }

    #[test]
    fn test_full_credentials_reach_elite() {
        let outcome = evaluate(&full_request());
        assert_eq!(outcome.score, 100);
        assert_eq!(outcome.level, Some(VerificationLevel::Elite));
    }

    #[test]
    fn test_empty_request_is_unverified() {
        let outcome = evaluate(&empty_request());
        assert_eq!(outcome.score, 0);
        assert_eq!(outcome.level, None);
    }

    #[test]
    fn test_category_caps() {
        let mut criteria = VerificationCriteria::default();
        criteria.association_count = 50;
        criteria.social_link_count = 50;
        // 15 for associations plus 20 for social links, nothing else.
        assert_eq!(calculate_score(&criteria), 35);
    }

    #[test]
    fn test_level_boundaries() {
        assert_eq!(verification_level(100), Some(VerificationLevel::Elite));
        assert_eq!(verification_level(90), Some(VerificationLevel::Elite));
        assert_eq!(verification_level(89), Some(VerificationLevel::Premium));
        assert_eq!(verification_level(70), Some(VerificationLevel::Premium));
        assert_eq!(verification_level(69), Some(VerificationLevel::Standard));
        assert_eq!(verification_level(50), Some(VerificationLevel::Standard));
        assert_eq!(verification_level(49), Some(VerificationLevel::Basic));
        assert_eq!(verification_level(30), Some(VerificationLevel::Basic));
        assert_eq!(verification_level(29), None);
        assert_eq!(verification_level(0), None);
    }

    #[test]
    fn test_score_is_monotone_in_criteria() {
        let mut partial = full_request();
        partial.sales_history = None;
        partial.client_list.clear();
        let lesser = evaluate(&partial);
        let greater = evaluate(&full_request());
        assert!(lesser.score < greater.score);
    }

    #[test]
    fn test_single_association_scores_ten() {
        let mut criteria = VerificationCriteria::default();
        criteria.association_count = 1;
        assert_eq!(calculate_score(&criteria), 10);
        criteria.association_count = 2;
        assert_eq!(calculate_score(&criteria), 15);
    }
}
