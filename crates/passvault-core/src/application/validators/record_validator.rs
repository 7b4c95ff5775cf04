//! Secret record input validation

use super::account_validator::AccountValidator;
use crate::domain::records::{NewCard, NewCredential, NewNote};
use crate::error::{Error, Result};

/// Minimum length of a stored credential password
pub const CREDENTIAL_PASSWORD_MIN_LEN: usize = 8;

/// Maximum length of a record title
pub const TITLE_MAX_LEN: usize = 200;

/// A create payload that can check its own fields
pub trait DraftValidator {
    fn validate(&self) -> Result<()>;
}

/// Field-level rules shared by the record drafts
pub struct RecordValidator;

impl RecordValidator {
    /// Validate a required text field
    pub fn validate_required(field: &str, value: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(Error::validation(field, format!("{} cannot be empty", field)));
        }
        Ok(())
    }

    /// Validate a record title
    ///
    /// Rules:
    /// - Must not be empty
    /// - Must be 200 characters or less
    pub fn validate_title(title: &str) -> Result<()> {
        Self::validate_required("title", title)?;
        if title.chars().count() > TITLE_MAX_LEN {
            return Err(Error::validation(
                "title",
                format!("title must be {} characters or less", TITLE_MAX_LEN),
            ));
        }
        Ok(())
    }

    /// Validate an http(s) URL with a dotted host
    pub fn validate_url(url: &str) -> Result<()> {
        let rest = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
            .ok_or_else(|| Error::validation("url", "url must start with http:// or https://"))?;

        if url.chars().any(char::is_whitespace) {
            return Err(Error::validation("url", "url cannot contain whitespace"));
        }

        let authority = rest
            .split(['/', '?', '#'])
            .next()
            .unwrap_or_default();
        let host = authority.rsplit('@').next().unwrap_or_default();
        let host = host.split(':').next().unwrap_or_default();

        let labels: Vec<&str> = host.split('.').collect();
        if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
            return Err(Error::validation("url", "url must have a valid host"));
        }

        Ok(())
    }
}

impl DraftValidator for NewCredential {
    fn validate(&self) -> Result<()> {
        RecordValidator::validate_title(&self.title)?;
        RecordValidator::validate_url(&self.url)?;
        RecordValidator::validate_required("username", &self.username)?;
        AccountValidator::validate_strong_password(
            "password",
            &self.password,
            CREDENTIAL_PASSWORD_MIN_LEN,
        )
    }
}

impl DraftValidator for NewCard {
    fn validate(&self) -> Result<()> {
        RecordValidator::validate_title(&self.title)?;
        RecordValidator::validate_required("number", &self.number)?;
        RecordValidator::validate_required("name", &self.name)?;
        RecordValidator::validate_required("secureCode", &self.secure_code)?;
        RecordValidator::validate_required("password", &self.password)
    }
}

impl DraftValidator for NewNote {
    fn validate(&self) -> Result<()> {
        RecordValidator::validate_title(&self.title)?;
        RecordValidator::validate_required("description", &self.description)
    }
}
