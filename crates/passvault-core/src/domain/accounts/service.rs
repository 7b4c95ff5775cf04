//! Identity service
//!
//! Owns the account lifecycle: sign-up, sign-in with token issuance,
//! token validation for the access guard, and erasure.

use std::sync::{Arc, OnceLock};

use super::entity::{AccountView, ErasedAccount, NewAccount, SignInResponse};
use super::repository::AccountRepository;
use crate::domain::security::{hash_password, verify_password, Identity, TokenIssuer};
use crate::error::{Error, Result};
use crate::storage::StoreError;

/// Hash verified when sign-in finds no account, so an unknown email costs
/// the same as a wrong password.
fn dummy_hash() -> &'static str {
    static DUMMY: OnceLock<String> = OnceLock::new();
    DUMMY.get_or_init(|| hash_password("passvault-unknown-account").unwrap_or_default())
}

/// Account lifecycle and token service
#[derive(Clone)]
pub struct IdentityService {
    accounts: Arc<dyn AccountRepository>,
    tokens: Arc<TokenIssuer>,
}

impl IdentityService {
    pub fn new(accounts: Arc<dyn AccountRepository>, tokens: Arc<TokenIssuer>) -> Self {
        Self { accounts, tokens }
    }

    /// Register a new account
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<AccountView> {
        let password_hash = hash_password(password)?;
        let new_account = NewAccount {
            email: email.to_string(),
            password_hash,
        };

        match self.accounts.create(&new_account).await {
            Ok(account) => {
                tracing::info!(account_id = account.id, email = %account.email, "Account created");
                Ok(account.view())
            }
            Err(StoreError::Conflict(_)) => {
                tracing::debug!(email = %email, "Sign-up with registered email");
                Err(Error::Conflict(format!("account '{}'", email)))
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to create account");
                Err(e.into())
            }
        }
    }

    /// Authenticate and issue an access token
    ///
    /// Unknown email and wrong password are the same `Unauthorized`.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SignInResponse> {
        let Some(account) = self.accounts.find_by_email(email).await? else {
            let _ = verify_password(password, dummy_hash());
            tracing::debug!("Sign-in denied: unknown email");
            return Err(Error::Unauthorized);
        };

        if !verify_password(password, &account.password_hash)? {
            tracing::debug!(account_id = account.id, "Sign-in denied: wrong password");
            return Err(Error::Unauthorized);
        }

        let identity = Identity {
            id: account.id,
            email: account.email,
        };
        let access_token = self.tokens.issue(&identity)?;

        tracing::info!(account_id = identity.id, "Signed in");
        Ok(SignInResponse { access_token })
    }

    /// Verify a bearer token
    ///
    /// Every verification failure collapses to `Unauthorized`; the reason
    /// is only logged.
    pub fn validate_token(&self, token: &str) -> Result<Identity> {
        self.tokens.verify(token).map_err(|e| {
            tracing::debug!(reason = %e, "Token rejected");
            Error::Unauthorized
        })
    }

    /// Delete the caller's account after re-checking the password
    ///
    /// Storage cascades the deletion to every record the account owns.
    pub async fn erase(&self, identity: &Identity, password: &str) -> Result<ErasedAccount> {
        let account = self
            .accounts
            .find_by_email(&identity.email)
            .await?
            .filter(|account| account.id == identity.id)
            .ok_or(Error::Unauthorized)?;

        if !verify_password(password, &account.password_hash)? {
            tracing::debug!(account_id = account.id, "Erase denied: wrong password");
            return Err(Error::Unauthorized);
        }

        let deleted = self.accounts.delete(account.id).await.map_err(|e| match e {
            StoreError::NotFound(_) => Error::NotFound(format!("account {}", account.id)),
            other => other.into(),
        })?;

        tracing::info!(account_id = deleted.id, "Account erased");
        Ok(ErasedAccount {
            id: deleted.id,
            email: deleted.email,
        })
    }
}

impl std::fmt::Debug for IdentityService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityService")
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}
