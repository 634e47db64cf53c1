//! Parcel Model
//!
//! The parcel aggregate: one record per shipment with an embedded,
//! append-only status log. The log is the audit trail; `status` is
//! always the status of the last log entry.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::util::now_millis;

/// Parcel lifecycle status
///
/// `Delivered` and `Cancelled` are terminal by convention. The only
/// mechanically enforced rule is that cancellation is rejected once a
/// parcel has been dispatched (see the lifecycle engine).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParcelStatus {
    Created,
    Dispatched,
    InTransit,
    Delivered,
    Cancelled,
}

impl ParcelStatus {
    /// Canonical wire/storage representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ParcelStatus::Created => "Created",
            ParcelStatus::Dispatched => "Dispatched",
            ParcelStatus::InTransit => "InTransit",
            ParcelStatus::Delivered => "Delivered",
            ParcelStatus::Cancelled => "Cancelled",
        }
    }

    /// Whether a parcel in this status may still be cancelled.
    ///
    /// Cancellation is only permitted before dispatch.
    pub fn is_cancellable(&self) -> bool {
        !matches!(
            self,
            ParcelStatus::Dispatched | ParcelStatus::InTransit | ParcelStatus::Delivered
        )
    }
}

impl fmt::Display for ParcelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for unrecognized status strings
#[derive(Debug, thiserror::Error)]
#[error("unknown parcel status: {0}")]
pub struct ParseStatusError(pub String);

impl FromStr for ParcelStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Created" => Ok(ParcelStatus::Created),
            "Dispatched" => Ok(ParcelStatus::Dispatched),
            "InTransit" => Ok(ParcelStatus::InTransit),
            "Delivered" => Ok(ParcelStatus::Delivered),
            "Cancelled" => Ok(ParcelStatus::Cancelled),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

/// One immutable audit record of a status change
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusLogEntry {
    pub status: ParcelStatus,
    /// Epoch millis, set by the system, never by the caller
    pub timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Acting user ID; `None` for system-generated entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
}

/// Parcel aggregate root
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parcel {
    pub id: i64,
    /// Customer-facing tracking code, unique, immutable
    pub tracking_id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub origin: String,
    pub destination: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    pub status: ParcelStatus,
    /// Append-only; insertion order is chronological order
    pub status_logs: Vec<StatusLogEntry>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Parcel {
    /// Append a status log entry and move `status` along with it.
    ///
    /// This is the only sanctioned way to change a parcel's status, so the
    /// "status equals last log entry" invariant holds by construction.
    pub fn record_status(
        &mut self,
        status: ParcelStatus,
        note: Option<String>,
        updated_by: Option<String>,
    ) {
        let now = now_millis();
        self.status_logs.push(StatusLogEntry {
            status,
            timestamp: now,
            note,
            updated_by,
        });
        self.status = status;
        self.updated_at = now;
    }

    /// The most recent status log entry.
    ///
    /// A persisted parcel always has at least the `Created` entry.
    pub fn last_log(&self) -> Option<&StatusLogEntry> {
        self.status_logs.last()
    }
}

/// Create parcel payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParcelCreate {
    pub sender_id: String,
    pub receiver_id: String,
    pub origin: String,
    pub destination: String,
    pub weight: Option<f64>,
    pub price: Option<f64>,
    /// Note for the initial log entry; defaults to "Parcel created"
    pub note: Option<String>,
}

/// Status update payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub status: ParcelStatus,
    pub note: Option<String>,
}

#[cfg(feature = "db")]
impl sqlx::FromRow<'_, sqlx::sqlite::SqliteRow> for Parcel {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        use sqlx::Row;

        let status: String = row.try_get("status")?;
        let status = status
            .parse::<ParcelStatus>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "status".into(),
                source: Box::new(e),
            })?;

        let status_logs: String = row.try_get("status_logs")?;
        let status_logs: Vec<StatusLogEntry> =
            serde_json::from_str(&status_logs).map_err(|e| sqlx::Error::ColumnDecode {
                index: "status_logs".into(),
                source: Box::new(e),
            })?;

        Ok(Self {
            id: row.try_get("id")?,
            tracking_id: row.try_get("tracking_id")?,
            sender_id: row.try_get("sender_id")?,
            receiver_id: row.try_get("receiver_id")?,
            origin: row.try_get("origin")?,
            destination: row.try_get("destination")?,
            weight: row.try_get("weight")?,
            price: row.try_get("price")?,
            status,
            status_logs,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_parcel() -> Parcel {
        let now = now_millis();
        Parcel {
            id: 1,
            tracking_id: "TRK-TESTTESTAA".to_string(),
            sender_id: "S1".to_string(),
            receiver_id: "R1".to_string(),
            origin: "Lagos".to_string(),
            destination: "Abuja".to_string(),
            weight: None,
            price: None,
            status: ParcelStatus::Created,
            status_logs: vec![StatusLogEntry {
                status: ParcelStatus::Created,
                timestamp: now,
                note: Some("Parcel created".to_string()),
                updated_by: Some("S1".to_string()),
            }],
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            ParcelStatus::Created,
            ParcelStatus::Dispatched,
            ParcelStatus::InTransit,
            ParcelStatus::Delivered,
            ParcelStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<ParcelStatus>().unwrap(), status);
        }
        assert!("Shipped".parse::<ParcelStatus>().is_err());
    }

    #[test]
    fn cancellable_only_before_dispatch() {
        assert!(ParcelStatus::Created.is_cancellable());
        assert!(ParcelStatus::Cancelled.is_cancellable());
        assert!(!ParcelStatus::Dispatched.is_cancellable());
        assert!(!ParcelStatus::InTransit.is_cancellable());
        assert!(!ParcelStatus::Delivered.is_cancellable());
    }

    #[test]
    fn record_status_keeps_status_in_sync_with_log() {
        let mut parcel = sample_parcel();
        parcel.record_status(ParcelStatus::Dispatched, None, Some("admin".into()));

        assert_eq!(parcel.status, ParcelStatus::Dispatched);
        assert_eq!(parcel.status_logs.len(), 2);
        let last = parcel.last_log().unwrap();
        assert_eq!(last.status, ParcelStatus::Dispatched);
        assert_eq!(last.updated_by.as_deref(), Some("admin"));
        assert!(last.note.is_none());
    }

    #[test]
    fn wire_names_are_camel_case() {
        let parcel = sample_parcel();
        let json = serde_json::to_value(&parcel).unwrap();
        assert_eq!(json["trackingId"], "TRK-TESTTESTAA");
        assert_eq!(json["status"], "Created");
        assert_eq!(json["statusLogs"][0]["updatedBy"], "S1");
        // absent optionals are omitted, not null
        assert!(json.get("weight").is_none());
    }
}
