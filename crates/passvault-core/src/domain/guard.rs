//! Access guard
//!
//! Gate in front of every secret-resource operation. Turns an
//! `Authorization` header value into the caller's identity or a bare
//! `Unauthorized`.

use std::sync::Arc;

use crate::domain::accounts::IdentityService;
use crate::domain::security::Identity;
use crate::error::{Error, Result};

/// The only accepted authorization scheme. Case-sensitive.
pub const BEARER_SCHEME: &str = "Bearer";

#[derive(Debug, Clone)]
pub struct AccessGuard {
    identity: Arc<IdentityService>,
}

impl AccessGuard {
    pub fn new(identity: Arc<IdentityService>) -> Self {
        Self { identity }
    }

    /// Resolve the caller from an `Authorization` header value
    pub fn authorize(&self, header: Option<&str>) -> Result<Identity> {
        let Some(header) = header else {
            return Err(deny("missing authorization header"));
        };

        // Exactly one space between scheme and token
        let parts: Vec<&str> = header.split(' ').collect();
        let [scheme, token] = parts.as_slice() else {
            return Err(deny("authorization header is not two parts"));
        };

        if *scheme != BEARER_SCHEME {
            return Err(deny("unsupported authorization scheme"));
        }
        if token.is_empty() {
            return Err(deny("empty bearer token"));
        }

        self.identity.validate_token(token)
    }
}

fn deny(reason: &'static str) -> Error {
    tracing::debug!(reason, "Request denied by access guard");
    Error::Unauthorized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::security::{TokenIssuer, DEFAULT_ISSUER};
    use crate::infrastructure::MemoryStore;
    use chrono::Duration;

    fn guard() -> (AccessGuard, Arc<TokenIssuer>) {
        let tokens = Arc::new(
            TokenIssuer::new("guard-secret", DEFAULT_ISSUER, Duration::seconds(60)).unwrap(),
        );
        let identity = IdentityService::new(Arc::new(MemoryStore::new()), tokens.clone());
        (AccessGuard::new(Arc::new(identity)), tokens)
    }

    fn alice() -> Identity {
        Identity {
            id: 7,
            email: "alice@example.com".to_string(),
        }
    }

    #[test]
    fn test_valid_bearer_token() {
        let (guard, tokens) = guard();
        let token = tokens.issue(&alice()).unwrap();

        let identity = guard.authorize(Some(&format!("Bearer {}", token))).unwrap();
        assert_eq!(identity, alice());
    }

    #[test]
    fn test_missing_header() {
        let (guard, _) = guard();
        assert!(matches!(guard.authorize(None), Err(Error::Unauthorized)));
        assert!(matches!(guard.authorize(Some("")), Err(Error::Unauthorized)));
    }

    #[test]
    fn test_wrong_scheme() {
        let (guard, tokens) = guard();
        let token = tokens.issue(&alice()).unwrap();

        for scheme in ["bearer", "BEARER", "Basic", "Token"] {
            let header = format!("{} {}", scheme, token);
            assert!(matches!(guard.authorize(Some(&header)), Err(Error::Unauthorized)));
        }
    }

    #[test]
    fn test_wrong_part_count() {
        let (guard, tokens) = guard();
        let token = tokens.issue(&alice()).unwrap();

        assert!(guard.authorize(Some("Bearer")).is_err());
        assert!(guard.authorize(Some(&token)).is_err());
        assert!(guard
            .authorize(Some(&format!("Bearer {} extra", token)))
            .is_err());
    }

    #[test]
    fn test_separator_must_be_single_space() {
        let (guard, tokens) = guard();
        let token = tokens.issue(&alice()).unwrap();

        for header in [
            format!("Bearer  {}", token),
            format!("Bearer\t{}", token),
            format!(" Bearer {}", token),
            format!("Bearer {} ", token),
            "Bearer ".to_string(),
        ] {
            assert!(
                matches!(guard.authorize(Some(&header)), Err(Error::Unauthorized)),
                "accepted {:?}",
                header
            );
        }
    }

    #[test]
    fn test_invalid_token() {
        let (guard, _) = guard();
        assert!(matches!(
            guard.authorize(Some("Bearer not.a.token")),
            Err(Error::Unauthorized)
        ));

        let foreign = TokenIssuer::new("other", DEFAULT_ISSUER, Duration::seconds(60))
            .unwrap()
            .issue(&alice())
            .unwrap();
        assert!(matches!(
            guard.authorize(Some(&format!("Bearer {}", foreign))),
            Err(Error::Unauthorized)
        ));
    }
}
