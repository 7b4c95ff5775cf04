//! Signed identity tokens
//!
//! Tokens are HS256 JWTs carrying the caller's `{email, id}` plus issuer,
//! issue and expiry claims. Nothing is stored server-side; a token is valid
//! exactly when its signature, issuer and expiry check out.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default issuer claim
pub const DEFAULT_ISSUER: &str = "Driven";

/// Default token lifetime in seconds
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;

/// Longest accepted token lifetime in seconds (ten years)
pub const MAX_TOKEN_TTL_SECS: i64 = 10 * 365 * 24 * 60 * 60;

/// Errors that can occur while issuing or verifying tokens
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,

    #[error("Invalid token: {0}")]
    Invalid(String),

    #[error("Failed to sign token: {0}")]
    Signing(String),

    #[error("Invalid token configuration: {0}")]
    Configuration(String),
}

/// The authenticated caller, as asserted by a verified token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: i64,
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    email: String,
    id: i64,
    iss: String,
    iat: i64,
    exp: i64,
}

/// Issues and verifies identity tokens with the process-wide secret
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    ttl: Duration,
}

impl TokenIssuer {
    /// Create an issuer signing with `secret`
    pub fn new(secret: &str, issuer: impl Into<String>, ttl: Duration) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::Configuration("secret is empty".to_string()));
        }
        if ttl <= Duration::zero() {
            return Err(TokenError::Configuration(
                "token lifetime must be positive".to_string(),
            ));
        }
        if ttl > Duration::seconds(MAX_TOKEN_TTL_SECS) {
            return Err(TokenError::Configuration(format!(
                "token lifetime must not exceed {} seconds",
                MAX_TOKEN_TTL_SECS
            )));
        }

        let issuer = issuer.into();
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss"]);
        validation.leeway = 0;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            issuer,
            ttl,
        })
    }

    /// Issue a token for `identity`, valid from now for the configured lifetime
    pub fn issue(&self, identity: &Identity) -> Result<String, TokenError> {
        self.issue_at(identity, Utc::now())
    }

    /// Issue a token as if it had been signed at `issued_at`
    pub fn issue_at(
        &self,
        identity: &Identity,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let expires_at = issued_at
            .checked_add_signed(self.ttl)
            .ok_or_else(|| TokenError::Signing("expiry is out of range".to_string()))?;

        let claims = Claims {
            email: identity.email.clone(),
            id: identity.id,
            iss: self.issuer.clone(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify signature, issuer and expiry and return the asserted identity
    pub fn verify(&self, token: &str) -> Result<Identity, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            }
        })?;

        Ok(Identity {
            id: data.claims.id,
            email: data.claims.email,
        })
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("secret", &"[REDACTED]")
            .field("issuer", &self.issuer)
            .field("ttl", &self.ttl)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new("test-secret", DEFAULT_ISSUER, Duration::seconds(60)).unwrap()
    }

    fn alice() -> Identity {
        Identity {
            id: 1,
            email: "alice@example.com".to_string(),
        }
    }

    #[test]
    fn test_issue_then_verify() {
        let issuer = issuer();
        let token = issuer.issue(&alice()).unwrap();
        assert_eq!(issuer.verify(&token).unwrap(), alice());
    }

    #[test]
    fn test_expired_token_rejected() {
        let issuer = issuer();
        let token = issuer
            .issue_at(&alice(), Utc::now() - Duration::seconds(120))
            .unwrap();
        assert!(matches!(issuer.verify(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let issuer = issuer();
        let token = issuer.issue(&alice()).unwrap();

        let (body, signature) = token.rsplit_once('.').unwrap();
        let flipped = if signature.starts_with('A') { 'B' } else { 'A' };
        let tampered = format!("{}.{}{}", body, flipped, &signature[1..]);

        assert!(matches!(issuer.verify(&tampered), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_other_secret_rejected() {
        let token = issuer().issue(&alice()).unwrap();
        let other = TokenIssuer::new("other-secret", DEFAULT_ISSUER, Duration::seconds(60)).unwrap();
        assert!(matches!(other.verify(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let foreign = TokenIssuer::new("test-secret", "Elsewhere", Duration::seconds(60)).unwrap();
        let token = foreign.issue(&alice()).unwrap();
        assert!(matches!(issuer().verify(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(issuer().verify("not-a-token").is_err());
        assert!(issuer().verify("").is_err());
    }

    #[test]
    fn test_invalid_configuration() {
        assert!(TokenIssuer::new("", DEFAULT_ISSUER, Duration::seconds(60)).is_err());
        assert!(TokenIssuer::new("s", DEFAULT_ISSUER, Duration::zero()).is_err());
        assert!(TokenIssuer::new(
            "s",
            DEFAULT_ISSUER,
            Duration::seconds(MAX_TOKEN_TTL_SECS + 1)
        )
        .is_err());
    }

    #[test]
    fn test_expiry_out_of_range_is_an_error() {
        let issuer = issuer();
        let result = issuer.issue_at(&alice(), DateTime::<Utc>::MAX_UTC);
        assert!(matches!(result, Err(TokenError::Signing(_))));
    }

    #[test]
    fn test_debug_redacted() {
        let debug = format!("{:?}", issuer());
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("test-secret"));
    }
}
