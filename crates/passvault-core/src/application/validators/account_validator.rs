//! Account input validation

use crate::error::{Error, Result};

/// Minimum length of an account password
pub const ACCOUNT_PASSWORD_MIN_LEN: usize = 10;

/// Validator for sign-up, sign-in and erase inputs
pub struct AccountValidator;

impl AccountValidator {
    /// Validate an email address
    ///
    /// Rules:
    /// - Exactly one `@` with a non-empty local part
    /// - Domain made of non-empty dot-separated labels, at least two
    /// - No whitespace
    pub fn validate_email(email: &str) -> Result<()> {
        if email.is_empty() {
            return Err(Error::validation("email", "Email cannot be empty"));
        }
        if email.chars().any(char::is_whitespace) {
            return Err(Error::validation("email", "Email cannot contain whitespace"));
        }

        let Some((local, domain)) = email.split_once('@') else {
            return Err(Error::validation("email", "Email must contain '@'"));
        };

        if local.is_empty() || domain.contains('@') {
            return Err(Error::validation("email", "Email is not a valid address"));
        }

        let labels: Vec<&str> = domain.split('.').collect();
        if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
            return Err(Error::validation("email", "Email domain is not valid"));
        }

        Ok(())
    }

    /// Validate a password against the strength rules
    ///
    /// Rules:
    /// - At least `min_len` characters
    /// - At least one lowercase letter, one uppercase letter, one digit and
    ///   one symbol
    pub fn validate_strong_password(field: &str, password: &str, min_len: usize) -> Result<()> {
        if password.chars().count() < min_len {
            return Err(Error::validation(
                field,
                format!("Password must be at least {} characters", min_len),
            ));
        }

        let has_lower = password.chars().any(|c| c.is_lowercase());
        let has_upper = password.chars().any(|c| c.is_uppercase());
        let has_digit = password.chars().any(|c| c.is_ascii_digit());
        let has_symbol = password
            .chars()
            .any(|c| !c.is_alphanumeric() && !c.is_whitespace());

        if !(has_lower && has_upper && has_digit && has_symbol) {
            return Err(Error::validation(
                field,
                "Password must contain a lowercase letter, an uppercase letter, a number and a symbol",
            ));
        }

        Ok(())
    }

    /// Validate a required, non-empty password
    pub fn validate_password_present(password: &str) -> Result<()> {
        if password.is_empty() {
            return Err(Error::validation("password", "Password cannot be empty"));
        }
        Ok(())
    }

    /// Validate sign-up input
    pub fn validate_sign_up(email: &str, password: &str) -> Result<()> {
        Self::validate_email(email)?;
        Self::validate_strong_password("password", password, ACCOUNT_PASSWORD_MIN_LEN)
    }

    /// Validate sign-in input
    pub fn validate_sign_in(email: &str, password: &str) -> Result<()> {
        Self::validate_email(email)?;
        Self::validate_password_present(password)
    }
}
