//! Record kinds and the capability every kind provides

use serde::{Deserialize, Serialize};
use std::fmt;

/// The three kinds of secret record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Credential,
    Card,
    Note,
}

impl RecordKind {
    /// Singular name used in messages and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Credential => "credential",
            Self::Card => "card",
            Self::Note => "note",
        }
    }

    /// Plural name used for tables and routes
    pub fn plural(&self) -> &'static str {
        match self {
            Self::Credential => "credentials",
            Self::Card => "cards",
            Self::Note => "notes",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An owned record that may carry one encrypted field
///
/// The resource service is written once against this trait. Each kind
/// states which field is secret and what survives into the create and
/// remove responses.
pub trait SecretRecord: Clone + Send + Sync + 'static {
    /// Input accepted on create
    type Draft: Clone + Send + Sync + 'static;

    /// Shape returned by a successful create
    type Created: Serialize + Send + 'static;

    /// Shape returned by a successful remove
    type Removed: Serialize + Send + 'static;

    const KIND: RecordKind;

    fn id(&self) -> i64;

    fn owner_id(&self) -> i64;

    fn title(&self) -> &str;

    /// The stored secret field, if this kind has one
    fn secret_mut(&mut self) -> Option<&mut String>;

    fn draft_title(draft: &Self::Draft) -> &str;

    /// The secret field of a draft, if this kind has one
    fn draft_secret_mut(draft: &mut Self::Draft) -> Option<&mut String>;

    fn into_created(self) -> Self::Created;

    fn into_removed(self) -> Self::Removed;
}
