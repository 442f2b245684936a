use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Credentials submitted by a partner (literary agent or publisher) applying
/// for a verification badge.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct VerificationRequest {
    pub partner_id: Uuid,
    #[validate(email)]
    pub business_email: Option<String>,
    #[validate(url)]
    pub website: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[serde(default)]
    pub industry_associations: Vec<String>,
    #[validate(url)]
    pub membership_proof_url: Option<String>,
    pub sales_history: Option<String>,
    #[serde(default)]
    pub client_list: Vec<String>,
    #[serde(default)]
    pub social_links: Vec<String>,
}

/// Boolean facts derived from a verification request; inputs to the score.
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct VerificationCriteria {
    pub legitimate_business_email: bool,
    pub legitimate_website: bool,
    pub has_phone: bool,
    pub has_address: bool,
    pub association_count: usize,
    pub has_membership_proof: bool,
    pub has_sales_history: bool,
    pub has_client_list: bool,
    pub social_link_count: usize,
}

/// Discrete trust level assigned from the 0-100 score. A score below the
/// `Basic` threshold yields no level at all (unverified).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum VerificationLevel {
    Basic,
    Standard,
    Premium,
    Elite,
}

impl Display for VerificationLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let s = match self {
            VerificationLevel::Basic => "basic",
            VerificationLevel::Standard => "standard",
            VerificationLevel::Premium => "premium",
            VerificationLevel::Elite => "elite",
        };
        write!(f, "{}", s)
    }
}
