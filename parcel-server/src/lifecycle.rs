//! Parcel Lifecycle Engine
//!
//! All status-affecting business rules live here. The engine is stateless:
//! every operation fetches the aggregate through the repository, mutates it
//! in memory and hands it back to the repository to persist.
//!
//! `update_status` accepts any target status; there is no transition
//! graph. The single enforced guard is that cancellation is rejected once
//! a parcel has been dispatched.

use sqlx::SqlitePool;

use crate::db::repository::{RepoError, parcel as parcel_repo};
use crate::utils::validation::{
    MAX_LOCATION_LEN, MAX_NOTE_LEN, MAX_USER_REF_LEN, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult};
use shared::models::{Parcel, ParcelCreate, ParcelStatus};
use shared::util::{now_millis, snowflake_id, tracking_code};

/// Note recorded on the initial log entry when the caller supplies none
const DEFAULT_CREATE_NOTE: &str = "Parcel created";

/// Note recorded on cancellation entries
const CANCEL_NOTE: &str = "Cancelled by user";

/// Attempts to allocate a unique tracking code before giving up
const MAX_CREATE_ATTEMPTS: u32 = 3;

/// Create a new parcel.
///
/// Validates required fields, generates a tracking code and builds the
/// aggregate with its initial `Created` log entry (`updated_by` is the
/// sender). A tracking code collision is retried internally with a fresh
/// code and never surfaces to the caller unless every attempt collides.
pub async fn create(pool: &SqlitePool, payload: ParcelCreate) -> AppResult<Parcel> {
    validate_required_text(&payload.sender_id, "senderId", MAX_USER_REF_LEN)?;
    validate_required_text(&payload.receiver_id, "receiverId", MAX_USER_REF_LEN)?;
    validate_required_text(&payload.origin, "origin", MAX_LOCATION_LEN)?;
    validate_required_text(&payload.destination, "destination", MAX_LOCATION_LEN)?;
    validate_optional_text(&payload.note, "note", MAX_NOTE_LEN)?;

    let note = payload
        .note
        .clone()
        .unwrap_or_else(|| DEFAULT_CREATE_NOTE.to_string());

    for attempt in 1..=MAX_CREATE_ATTEMPTS {
        let now = now_millis();
        let mut parcel = Parcel {
            id: snowflake_id(),
            tracking_id: tracking_code(),
            sender_id: payload.sender_id.clone(),
            receiver_id: payload.receiver_id.clone(),
            origin: payload.origin.clone(),
            destination: payload.destination.clone(),
            weight: payload.weight,
            price: payload.price,
            status: ParcelStatus::Created,
            status_logs: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        parcel.record_status(
            ParcelStatus::Created,
            Some(note.clone()),
            Some(payload.sender_id.clone()),
        );

        match parcel_repo::create(pool, &parcel).await {
            Ok(()) => {
                tracing::info!(
                    parcel_id = parcel.id,
                    tracking_id = %parcel.tracking_id,
                    "Parcel created"
                );
                return Ok(parcel);
            }
            Err(RepoError::Duplicate(_)) => {
                tracing::warn!(attempt, "Tracking code collision, regenerating");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(AppError::conflict(
        "Could not allocate a unique tracking code",
    ))
}

/// Move a parcel to `new_status` and append the matching log entry.
///
/// Any target status is accepted; there is no transition graph.
/// `updated_by` is recorded only when an acting user was supplied
/// (absent for system-generated transitions).
pub async fn update_status(
    pool: &SqlitePool,
    parcel_id: &str,
    new_status: ParcelStatus,
    acting_user: Option<&str>,
    note: Option<String>,
) -> AppResult<Parcel> {
    validate_optional_text(&note, "note", MAX_NOTE_LEN)?;

    let mut parcel = parcel_repo::find_by_id(pool, parcel_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Parcel {parcel_id}")))?;

    parcel.record_status(new_status, note, acting_user.map(String::from));
    parcel_repo::save(pool, &parcel).await?;

    tracing::info!(
        parcel_id = parcel.id,
        status = %new_status,
        "Parcel status updated"
    );
    Ok(parcel)
}

/// Cancel a parcel.
///
/// Only permitted before dispatch: a parcel that is `Dispatched`,
/// `InTransit` or `Delivered` is rejected and left untouched.
pub async fn cancel(
    pool: &SqlitePool,
    parcel_id: &str,
    acting_user: Option<&str>,
) -> AppResult<Parcel> {
    let mut parcel = parcel_repo::find_by_id(pool, parcel_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Parcel {parcel_id}")))?;

    if !parcel.status.is_cancellable() {
        return Err(AppError::illegal_transition(format!(
            "Cannot cancel a parcel that is already {}",
            parcel.status
        )));
    }

    parcel.record_status(
        ParcelStatus::Cancelled,
        Some(CANCEL_NOTE.to_string()),
        acting_user.map(String::from),
    );
    parcel_repo::save(pool, &parcel).await?;

    tracing::info!(parcel_id = parcel.id, "Parcel cancelled");
    Ok(parcel)
}
