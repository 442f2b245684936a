//! Access token issuance and verification.
//!
//! Tokens are HS256 JWTs whose claims are exactly the `AccessTokenPayload`
//! fields plus the standard issued-at/expiration/subject claims. The permission
//! set is fixed at issuance; broader access means a new token. Revocation is
//! out of band (a denylist of token strings owned by the caller) - this service
//! only knows "expired" and "invalid signature".

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use ottowrite_core::models::{AccessTokenPayload, Permission};
use ottowrite_core::AppError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default lifetime of an issued token.
pub const DEFAULT_EXPIRY_DAYS: i64 = 90;

/// Minimum signing-secret length in bytes. Operating with a shorter key is a
/// configuration error, not a degraded mode.
pub const MIN_SECRET_LEN: usize = 32;

/// Why a token failed verification. Expiry is distinguishable from tampering
/// so callers can branch without parsing messages.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("Token has expired")]
    Expired,
    #[error("Invalid token: {0}")]
    Invalid(String),
}

/// What the caller wants a token to grant.
#[derive(Debug, Clone)]
pub struct TokenGrant {
    pub submission_id: Uuid,
    pub partner_id: Uuid,
    pub user_id: Uuid,
    pub watermark_id: String,
    pub permissions: Vec<Permission>,
}

/// An issued token string plus its decoded payload.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub payload: AccessTokenPayload,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
    submission_id: Uuid,
    partner_id: Uuid,
    user_id: Uuid,
    watermark_id: String,
    permissions: Vec<Permission>,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl From<Claims> for AccessTokenPayload {
    fn from(claims: Claims) -> Self {
        AccessTokenPayload {
            submission_id: claims.submission_id,
            partner_id: claims.partner_id,
            user_id: claims.user_id,
            watermark_id: claims.watermark_id,
            permissions: claims.permissions,
            created_at: claims.created_at,
            expires_at: claims.expires_at,
        }
    }
}

/// Issues and verifies signed capability tokens.
pub struct AccessTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl AccessTokenService {
    /// Construct from a signing secret, refusing keys under 32 bytes.
    pub fn new(secret: &str) -> Result<Self, AppError> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(AppError::Configuration(format!(
                "Token signing secret must be at least {} bytes",
                MIN_SECRET_LEN
            )));
        }
        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        })
    }

    /// Issue a signed token for `grant`, valid for `expiry_days` from now.
    pub fn issue(&self, grant: TokenGrant, expiry_days: i64) -> Result<IssuedToken, AppError> {
        let now = Utc::now();
        let expires_at = now + Duration::days(expiry_days);

        let payload = AccessTokenPayload {
            submission_id: grant.submission_id,
            partner_id: grant.partner_id,
            user_id: grant.user_id,
            watermark_id: grant.watermark_id,
            permissions: grant.permissions,
            created_at: now,
            expires_at,
        };

        let claims = Claims {
            sub: payload.subject(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            submission_id: payload.submission_id,
            partner_id: payload.partner_id,
            user_id: payload.user_id,
            watermark_id: payload.watermark_id.clone(),
            permissions: payload.permissions.clone(),
            created_at: payload.created_at,
            expires_at: payload.expires_at,
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign access token: {}", e)))?;

        tracing::debug!(
            submission_id = %payload.submission_id,
            partner_id = %payload.partner_id,
            expires_at = %payload.expires_at,
            "Issued access token"
        );

        Ok(IssuedToken { token, payload })
    }

    /// Verify signature and expiration, returning the decoded payload.
    ///
    /// The payload `expires_at` is re-checked against wall-clock time
    /// independent of the JWT library's own expiry validation.
    pub fn verify(&self, token: &str) -> Result<AccessTokenPayload, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default()).map_err(
            |e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            },
        )?;

        let payload = AccessTokenPayload::from(data.claims);
        if Utc::now() > payload.expires_at {
            return Err(TokenError::Expired);
        }

        Ok(payload)
    }
}

/// Pure set-membership permission check.
pub fn has_permission(permissions: &[Permission], required: Permission) -> bool {
    permissions.contains(&required)
}
