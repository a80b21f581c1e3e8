//! Zone-level handlers, scoped under an account.
use axum::{Extension, Json, extract::Path};
use serde_json::json;

use super::StrictJson;
use crate::SharedState;
use crate::error::{AppError, Envelope};
use crate::model::{Zone, ZoneCreate};

// GET /accounts/{account_id}/zones
pub async fn list_zones(
    Extension(state): Extension<SharedState>,
    Path(account_id): Path<String>,
) -> Result<Json<Envelope>, AppError> {
    let zones = state.store.list_zones(&account_id).await?;
    Ok(Envelope::success(
        Some(json!({ "zones": zones })),
        "Zones retrieved successfully",
    ))
}

// POST /accounts/{account_id}/zones
pub async fn create_zone(
    Extension(state): Extension<SharedState>,
    Path(account_id): Path<String>,
    StrictJson(zone): StrictJson<ZoneCreate>,
) -> Result<Json<Envelope>, AppError> {
    let zone = state.store.create_zone(&account_id, zone).await?;
    Ok(Envelope::success(
        Some(json!({ "zone": zone })),
        "Zone created successfully",
    ))
}

// GET /accounts/{account_id}/zones/{zone_id}
pub async fn get_zone(
    Extension(state): Extension<SharedState>,
    Path((account_id, zone_id)): Path<(String, String)>,
) -> Result<Json<Envelope>, AppError> {
    let zone = state.store.get_zone(&account_id, &zone_id).await?;
    Ok(Envelope::success(
        Some(json!({ "zone": zone })),
        "Zone retrieved successfully",
    ))
}

// PUT /accounts/{account_id}/zones/{zone_id}
pub async fn update_zone(
    Extension(state): Extension<SharedState>,
    Path((account_id, zone_id)): Path<(String, String)>,
    StrictJson(zone): StrictJson<Zone>,
) -> Result<Json<Envelope>, AppError> {
    let zone = state.store.update_zone(&account_id, &zone_id, zone).await?;
    Ok(Envelope::success(
        Some(json!({ "zone": zone })),
        "Zone updated successfully",
    ))
}

// DELETE /accounts/{account_id}/zones/{zone_id}
pub async fn delete_zone(
    Extension(state): Extension<SharedState>,
    Path((account_id, zone_id)): Path<(String, String)>,
) -> Result<Json<Envelope>, AppError> {
    state.store.delete_zone(&account_id, &zone_id).await?;
    Ok(Envelope::success(None, "Zone deleted successfully"))
}
