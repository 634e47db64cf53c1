//! Parcel API Handlers
//!
//! Thin translation layer: deserialize the request, call the lifecycle
//! engine or repository, wrap the result in the response envelope. No
//! business rules live here.

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
    http::StatusCode,
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::parcel::{self as parcel_repo, ParcelFilter};
use crate::lifecycle;
use crate::utils::{AppError, AppJson, AppResponse, AppResult, ok};
use shared::models::{Parcel, ParcelCreate, ParcelStatus, StatusUpdate};
use shared::types::{Paginated, PaginationParams, SortOrder, SortParams};

/// Query string for GET /api/parcels
///
/// One flat struct so unrecognized keys are silently dropped by serde
/// instead of leaking through as untyped filters.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParcelListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort_by: Option<String>,
    pub order: Option<SortOrder>,
    pub status: Option<ParcelStatus>,
    pub sender_id: Option<String>,
    pub receiver_id: Option<String>,
    pub tracking_id: Option<String>,
    /// Free-text term matched against origin/destination/trackingId
    pub q: Option<String>,
    /// Inclusive creation-time lower bound (epoch millis)
    pub from: Option<i64>,
    /// Inclusive creation-time upper bound (epoch millis)
    pub to: Option<i64>,
}

/// POST /api/parcels - create a parcel
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    AppJson(payload): AppJson<ParcelCreate>,
) -> AppResult<(StatusCode, Json<AppResponse<Parcel>>)> {
    tracing::debug!(operator = %current_user.id, "Create parcel requested");
    let parcel = lifecycle::create(&state.pool, payload).await?;
    Ok((StatusCode::CREATED, ok(parcel)))
}

/// GET /api/parcels - filtered, paginated, sorted list
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ParcelListQuery>,
) -> AppResult<Json<AppResponse<Paginated<Parcel>>>> {
    let pagination = PaginationParams {
        page: query.page.unwrap_or(1),
        limit: query.limit.unwrap_or(20),
    };
    let sort = SortParams {
        sort_by: query.sort_by,
        order: query.order.unwrap_or_default(),
    };
    let filter = ParcelFilter {
        status: query.status,
        sender_id: query.sender_id,
        receiver_id: query.receiver_id,
        tracking_id: query.tracking_id,
        q: query.q,
        from: query.from,
        to: query.to,
    };

    let (items, total) = parcel_repo::query(&state.pool, &filter, &pagination, &sort).await?;
    Ok(ok(Paginated::new(items, total, &pagination)))
}

/// GET /api/parcels/{id} - fetch by internal ID
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Parcel>>> {
    let parcel = parcel_repo::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Parcel {id}")))?;
    Ok(ok(parcel))
}

/// GET /api/parcels/track/{tracking_id} - public customer-facing lookup
pub async fn track(
    State(state): State<ServerState>,
    Path(tracking_id): Path<String>,
) -> AppResult<Json<AppResponse<Parcel>>> {
    let parcel = parcel_repo::find_by_tracking_id(&state.pool, &tracking_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Parcel {tracking_id}")))?;
    Ok(ok(parcel))
}

/// PATCH /api/parcels/{id}/status - transition the parcel status
pub async fn update_status(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<StatusUpdate>,
) -> AppResult<Json<AppResponse<Parcel>>> {
    let parcel = lifecycle::update_status(
        &state.pool,
        &id,
        payload.status,
        Some(&current_user.id),
        payload.note,
    )
    .await?;
    Ok(ok(parcel))
}

/// PATCH /api/parcels/{id}/cancel - cancel before dispatch
pub async fn cancel(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Parcel>>> {
    let parcel = lifecycle::cancel(&state.pool, &id, Some(&current_user.id)).await?;
    Ok(ok(parcel))
}
