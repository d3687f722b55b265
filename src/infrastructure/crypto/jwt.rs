//! JWT token handling
//!
//! Tokens carry `{"id", "iat", "eat"}`. `eat` is the expiry instant; it is not
//! the registered `exp` claim, so the library's expiry check is disabled and
//! [`TokenService::verify`] judges `eat` against its own clock instead.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{DomainError, DomainResult, User, UserId};

/// Algorithm used for issued tokens.
const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// Algorithms accepted on verification: the HMAC family only.
const ACCEPTED_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Shared HMAC secret
    pub secret: String,
    /// Token lifetime in seconds; `None` or non-positive refuses to issue
    pub ttl_seconds: Option<i64>,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

/// Time source for issuing and expiring tokens.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Claim set inside a signed token
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    /// Subject (user ID)
    pub id: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expires at (Unix timestamp)
    pub eat: i64,
}

/// Issues and verifies signed, time-bounded tokens.
#[derive(Clone)]
pub struct TokenService {
    config: JwtConfig,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    pub fn new(config: JwtConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: JwtConfig, clock: Arc<dyn Clock>) -> Self {
        Self { config, clock }
    }

    pub fn ttl_seconds(&self) -> Option<i64> {
        self.config.ttl_seconds
    }

    /// Create a signed token for `user`.
    pub fn issue(&self, user: &User) -> DomainResult<String> {
        let ttl = match self.config.ttl_seconds {
            Some(ttl) if ttl > 0 => ttl,
            Some(ttl) => {
                return Err(DomainError::Signing(format!(
                    "token TTL must be positive, got {}",
                    ttl
                )))
            }
            None => return Err(DomainError::Signing("token TTL is not configured".into())),
        };
        if self.config.secret.is_empty() {
            return Err(DomainError::Signing("signing secret is not configured".into()));
        }

        let now = self.clock.now();
        let expires_at = Duration::try_seconds(ttl)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| DomainError::Signing(format!("token TTL {} is out of range", ttl)))?;
        let claims = TokenClaims {
            id: i64::from(user.id),
            iat: now.timestamp(),
            eat: expires_at.timestamp(),
        };

        encode(
            &Header::new(SIGNING_ALGORITHM),
            &claims,
            &EncodingKey::from_secret(self.config.secret.as_bytes()),
        )
        .map_err(|e| DomainError::Signing(e.to_string()))
    }

    /// Parse `token`, check algorithm and signature, decode the claims and
    /// reject it once `eat` has passed. Every failure is `InvalidToken`.
    pub fn verify(&self, token: &str) -> DomainResult<TokenClaims> {
        if self.config.secret.is_empty() {
            return Err(DomainError::InvalidToken(
                "signing secret is not configured".into(),
            ));
        }

        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.algorithms = ACCEPTED_ALGORITHMS.to_vec();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let claims = decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(self.config.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| DomainError::InvalidToken(e.to_string()))?
        .claims;

        let now = self.clock.now().timestamp();
        if now >= claims.eat {
            debug!(user_id = claims.id, eat = claims.eat, now, "Token expired");
            return Err(DomainError::InvalidToken("token has expired".into()));
        }

        Ok(claims)
    }

    /// Narrow the subject claim into the user id domain.
    pub fn extract_subject(claims: &TokenClaims) -> DomainResult<UserId> {
        match UserId::try_from(claims.id) {
            Ok(id) if id > 0 => Ok(id),
            _ => Err(DomainError::InvalidToken(format!(
                "subject {} is not a valid user id",
                claims.id
            ))),
        }
    }
}
