pub mod accounts;
pub mod zones;

use axum::{
    Extension, Json, Router,
    extract::{FromRequest, Request},
    routing::{get, put},
};
use serde::de::DeserializeOwned;

use crate::SharedState;
use crate::error::AppError;

pub fn create_router(state: SharedState) -> Router {
    use crate::api::{accounts, zones};

    Router::new()
        .route(
            "/accounts",
            get(accounts::list_accounts).post(accounts::create_account),
        )
        .route(
            "/accounts/{account_id}",
            get(accounts::get_account)
                .put(accounts::update_account)
                .delete(accounts::delete_account),
        )
        .route(
            "/accounts/{account_id}/auth",
            put(accounts::update_authentication),
        )
        .route(
            "/accounts/{account_id}/zones",
            get(zones::list_zones).post(zones::create_zone),
        )
        .route(
            "/accounts/{account_id}/zones/{zone_id}",
            get(zones::get_zone)
                .put(zones::update_zone)
                .delete(zones::delete_zone),
        )
        .layer(Extension(state))
}

/// `Json` wrapper whose rejection goes through the envelope as a validation
/// error. Combined with `deny_unknown_fields` on the models this gives the
/// closed request schema: unknown keys, wrong types and malformed bodies all
/// fail with 422.
pub struct StrictJson<T>(pub T);

impl<S, T> FromRequest<S> for StrictJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(StrictJson(value)),
            Err(rejection) => Err(AppError::Validation(rejection.body_text())),
        }
    }
}
