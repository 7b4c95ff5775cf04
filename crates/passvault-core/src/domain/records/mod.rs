//! Secret records domain
//!
//! # Architecture
//!
//! - **Entities**: `Credential`, `Card`, `Note`, their drafts and output views
//! - **Kind**: `SecretRecord`, the capability each kind implements
//! - **Repository**: `RecordRepository<R>`, the storage collaborator
//! - **Service**: `ResourceService<R>`, shared by all three kinds
//!
//! # Example
//!
//! ```ignore
//! use passvault_core::domain::records::{CredentialService, NewCredential};
//!
//! let service = CredentialService::new(repository, cipher);
//! let created = service.create(draft, &identity).await?;
//! let mine = service.find_all(identity.id).await?;
//! let one = service.find_one(created.id, identity.id).await?;
//! service.remove(created.id, identity.id).await?;
//! ```

pub mod entity;
pub mod kind;
pub mod repository;
pub mod service;

pub use entity::{
    Card, CardType, CardView, Credential, CredentialView, NewCard, NewCredential, NewNote, Note,
    NoteView, RemovedCard, RemovedNote,
};
pub use kind::{RecordKind, SecretRecord};
pub use repository::RecordRepository;
pub use service::{CardService, CredentialService, NoteService, ResourceService};
