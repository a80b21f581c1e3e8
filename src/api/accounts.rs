//! Account-level handlers. Thin translation between HTTP and the store.
use axum::{Extension, Json, extract::Path};
use serde_json::json;

use super::StrictJson;
use crate::SharedState;
use crate::error::{AppError, Envelope};
use crate::model::{Authentication, CloudflareAccount};

// GET /accounts
pub async fn list_accounts(
    Extension(state): Extension<SharedState>,
) -> Result<Json<Envelope>, AppError> {
    let accounts = state.store.list_accounts().await;
    Ok(Envelope::success(
        Some(json!({ "accounts": accounts })),
        "Accounts retrieved successfully",
    ))
}

// POST /accounts
pub async fn create_account(
    Extension(state): Extension<SharedState>,
    StrictJson(account): StrictJson<CloudflareAccount>,
) -> Result<Json<Envelope>, AppError> {
    let account = state.store.create_account(account).await?;
    Ok(Envelope::success(
        Some(json!({ "account": account })),
        "Account added successfully",
    ))
}

// GET /accounts/{account_id}
pub async fn get_account(
    Extension(state): Extension<SharedState>,
    Path(account_id): Path<String>,
) -> Result<Json<Envelope>, AppError> {
    let account = state.store.get_account(&account_id).await?;
    Ok(Envelope::success(
        Some(json!({ "account": account })),
        "Account retrieved successfully",
    ))
}

// PUT /accounts/{account_id}
pub async fn update_account(
    Extension(state): Extension<SharedState>,
    Path(account_id): Path<String>,
    StrictJson(account): StrictJson<CloudflareAccount>,
) -> Result<Json<Envelope>, AppError> {
    let account = state.store.update_account(&account_id, account).await?;
    Ok(Envelope::success(
        Some(json!({ "account": account })),
        "Account updated successfully",
    ))
}

// DELETE /accounts/{account_id}
pub async fn delete_account(
    Extension(state): Extension<SharedState>,
    Path(account_id): Path<String>,
) -> Result<Json<Envelope>, AppError> {
    state.store.delete_account(&account_id).await?;
    Ok(Envelope::success(None, "Account deleted successfully"))
}

// PUT /accounts/{account_id}/auth
pub async fn update_authentication(
    Extension(state): Extension<SharedState>,
    Path(account_id): Path<String>,
    StrictJson(auth): StrictJson<Authentication>,
) -> Result<Json<Envelope>, AppError> {
    let auth = state.store.update_authentication(&account_id, auth).await?;
    Ok(Envelope::success(
        Some(json!({ "auth": auth })),
        "Authentication updated successfully",
    ))
}
