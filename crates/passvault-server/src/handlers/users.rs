//! Account handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use passvault_core::application::{AccountValidator, Vault};
use passvault_core::domain::accounts::{AccountView, ErasedAccount, SignInResponse};
use passvault_core::domain::security::Identity;
use serde::Deserialize;

use crate::error::ApiError;

#[derive(Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct EraseRequest {
    pub password: String,
}

pub async fn sign_up(
    State(vault): State<Vault>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AccountView>), ApiError> {
    let Json(req) = payload?;
    AccountValidator::validate_sign_up(&req.email, &req.password)?;

    let account = vault.identity.sign_up(&req.email, &req.password).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

pub async fn sign_in(
    State(vault): State<Vault>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<SignInResponse>, ApiError> {
    let Json(req) = payload?;
    AccountValidator::validate_sign_in(&req.email, &req.password)?;

    Ok(Json(vault.identity.sign_in(&req.email, &req.password).await?))
}

pub async fn erase(
    State(vault): State<Vault>,
    Extension(identity): Extension<Identity>,
    payload: Result<Json<EraseRequest>, JsonRejection>,
) -> Result<Json<ErasedAccount>, ApiError> {
    let Json(req) = payload?;
    AccountValidator::validate_password_present(&req.password)?;

    Ok(Json(vault.identity.erase(&identity, &req.password).await?))
}
