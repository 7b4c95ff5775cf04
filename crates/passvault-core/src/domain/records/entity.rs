//! Secret record entities
//!
//! Each kind has a stored shape, a draft accepted on create, and the
//! reduced views returned by create and remove. Stored shapes hold
//! ciphertext in their secret field until a service decrypts them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::kind::{RecordKind, SecretRecord};

/// Calendar dates given either as `YYYY-MM-DD` or as a full RFC 3339
/// timestamp, which is truncated to its UTC date
mod iso_date {
    use chrono::{DateTime, NaiveDate, Utc};
    use serde::{de, Deserialize, Deserializer};

    pub fn parse(value: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").ok().or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|at| at.with_timezone(&Utc).date_naive())
        })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let value = String::deserialize(deserializer)?;
        parse(&value)
            .ok_or_else(|| de::Error::custom(format!("not an ISO 8601 date: {}", value)))
    }
}

// ========== Credential ==========

/// A saved website login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub url: String,
    pub username: String,
    pub password: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCredential {
    pub title: String,
    pub url: String,
    pub username: String,
    pub password: String,
}

/// A credential without its password or timestamps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialView {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub url: String,
    pub username: String,
}

impl SecretRecord for Credential {
    type Draft = NewCredential;
    type Created = CredentialView;
    type Removed = CredentialView;

    const KIND: RecordKind = RecordKind::Credential;

    fn id(&self) -> i64 {
        self.id
    }

    fn owner_id(&self) -> i64 {
        self.owner_id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn secret_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.password)
    }

    fn draft_title(draft: &NewCredential) -> &str {
        &draft.title
    }

    fn draft_secret_mut(draft: &mut NewCredential) -> Option<&mut String> {
        Some(&mut draft.password)
    }

    fn into_created(self) -> CredentialView {
        CredentialView {
            id: self.id,
            owner_id: self.owner_id,
            title: self.title,
            url: self.url,
            username: self.username,
        }
    }

    fn into_removed(self) -> CredentialView {
        self.into_created()
    }
}

// ========== Card ==========

/// Card network usage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CardType {
    Credit,
    Debit,
    Both,
}

impl CardType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Credit => "CREDIT",
            Self::Debit => "DEBIT",
            Self::Both => "BOTH",
        }
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CardType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREDIT" => Ok(Self::Credit),
            "DEBIT" => Ok(Self::Debit),
            "BOTH" => Ok(Self::Both),
            other => Err(format!("unknown card type: {}", other)),
        }
    }
}

/// A payment card. Only `password` is encrypted at rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub number: String,
    pub name: String,
    pub expiration_date: NaiveDate,
    pub password: String,
    pub secure_code: String,
    pub is_virtual: bool,
    #[serde(rename = "type")]
    pub card_type: CardType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCard {
    pub title: String,
    pub number: String,
    pub name: String,
    #[serde(deserialize_with = "iso_date::deserialize")]
    pub expiration_date: NaiveDate,
    pub password: String,
    pub secure_code: String,
    pub is_virtual: bool,
    #[serde(rename = "type")]
    pub card_type: CardType,
}

/// A card as returned by create: password and timestamps removed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardView {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub number: String,
    pub name: String,
    pub expiration_date: NaiveDate,
    pub secure_code: String,
    pub is_virtual: bool,
    #[serde(rename = "type")]
    pub card_type: CardType,
}

/// A card as returned by remove: secure code removed as well
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovedCard {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub number: String,
    pub name: String,
    pub expiration_date: NaiveDate,
    pub is_virtual: bool,
    #[serde(rename = "type")]
    pub card_type: CardType,
}

impl SecretRecord for Card {
    type Draft = NewCard;
    type Created = CardView;
    type Removed = RemovedCard;

    const KIND: RecordKind = RecordKind::Card;

    fn id(&self) -> i64 {
        self.id
    }

    fn owner_id(&self) -> i64 {
        self.owner_id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn secret_mut(&mut self) -> Option<&mut String> {
        Some(&mut self.password)
    }

    fn draft_title(draft: &NewCard) -> &str {
        &draft.title
    }

    fn draft_secret_mut(draft: &mut NewCard) -> Option<&mut String> {
        Some(&mut draft.password)
    }

    fn into_created(self) -> CardView {
        CardView {
            id: self.id,
            owner_id: self.owner_id,
            title: self.title,
            number: self.number,
            name: self.name,
            expiration_date: self.expiration_date,
            secure_code: self.secure_code,
            is_virtual: self.is_virtual,
            card_type: self.card_type,
        }
    }

    fn into_removed(self) -> RemovedCard {
        RemovedCard {
            id: self.id,
            owner_id: self.owner_id,
            title: self.title,
            number: self.number,
            name: self.name,
            expiration_date: self.expiration_date,
            is_virtual: self.is_virtual,
            card_type: self.card_type,
        }
    }
}

// ========== Note ==========

/// A free-form note, stored in plaintext
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNote {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteView {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovedNote {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
}

impl SecretRecord for Note {
    type Draft = NewNote;
    type Created = NoteView;
    type Removed = RemovedNote;

    const KIND: RecordKind = RecordKind::Note;

    fn id(&self) -> i64 {
        self.id
    }

    fn owner_id(&self) -> i64 {
        self.owner_id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn secret_mut(&mut self) -> Option<&mut String> {
        None
    }

    fn draft_title(draft: &NewNote) -> &str {
        &draft.title
    }

    fn draft_secret_mut(_draft: &mut NewNote) -> Option<&mut String> {
        None
    }

    fn into_created(self) -> NoteView {
        NoteView {
            id: self.id,
            owner_id: self.owner_id,
            title: self.title,
            description: self.description,
        }
    }

    fn into_removed(self) -> RemovedNote {
        RemovedNote {
            id: self.id,
            owner_id: self.owner_id,
            title: self.title,
        }
    }
}
