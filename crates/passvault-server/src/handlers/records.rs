//! Secret record handlers, shared by credentials, cards and notes.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use passvault_core::application::{DraftValidator, Vault};
use passvault_core::domain::records::{Card, Credential, Note, ResourceService, SecretRecord};
use passvault_core::domain::security::Identity;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;

/// A record kind exposed over HTTP
pub trait VaultResource: SecretRecord + Serialize
where
    Self::Draft: DeserializeOwned + DraftValidator,
{
    fn service(vault: &Vault) -> &ResourceService<Self>;
}

impl VaultResource for Credential {
    fn service(vault: &Vault) -> &ResourceService<Self> {
        &vault.credentials
    }
}

impl VaultResource for Card {
    fn service(vault: &Vault) -> &ResourceService<Self> {
        &vault.cards
    }
}

impl VaultResource for Note {
    fn service(vault: &Vault) -> &ResourceService<Self> {
        &vault.notes
    }
}

pub async fn create<R>(
    State(vault): State<Vault>,
    Extension(identity): Extension<Identity>,
    payload: Result<Json<R::Draft>, JsonRejection>,
) -> Result<(StatusCode, Json<R::Created>), ApiError>
where
    R: VaultResource,
    R::Draft: DeserializeOwned + DraftValidator,
{
    let Json(draft) = payload?;
    draft.validate()?;

    let created = R::service(&vault).create(draft, &identity).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn find_all<R>(
    State(vault): State<Vault>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<R>>, ApiError>
where
    R: VaultResource,
    R::Draft: DeserializeOwned + DraftValidator,
{
    Ok(Json(R::service(&vault).find_all(identity.id).await?))
}

pub async fn find_one<R>(
    State(vault): State<Vault>,
    Extension(identity): Extension<Identity>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<R>, ApiError>
where
    R: VaultResource,
    R::Draft: DeserializeOwned + DraftValidator,
{
    let Path(id) = id?;
    Ok(Json(R::service(&vault).find_one(id, identity.id).await?))
}

pub async fn remove<R>(
    State(vault): State<Vault>,
    Extension(identity): Extension<Identity>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<R::Removed>, ApiError>
where
    R: VaultResource,
    R::Draft: DeserializeOwned + DraftValidator,
{
    let Path(id) = id?;
    Ok(Json(R::service(&vault).remove(id, identity.id).await?))
}
