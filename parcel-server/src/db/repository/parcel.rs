//! Parcel Repository
//!
//! The aggregate is stored as one row; `status_logs` is serialized into a
//! JSON column so every `save` is a single atomic row write. Concurrent
//! saves of the same parcel are last-write-wins.

use super::{RepoError, RepoResult};
use shared::models::{Parcel, ParcelStatus};
use shared::types::{PaginationParams, SortParams};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

/// Recognized filter keys for parcel queries.
///
/// This is the closed set of predicates the list endpoint understands;
/// anything else in the query string is dropped at deserialization time
/// instead of being passed through untyped.
#[derive(Debug, Clone, Default)]
pub struct ParcelFilter {
    /// Exact status match
    pub status: Option<ParcelStatus>,
    /// Exact sender reference match
    pub sender_id: Option<String>,
    /// Exact receiver reference match
    pub receiver_id: Option<String>,
    /// Exact tracking code match
    pub tracking_id: Option<String>,
    /// Substring match across origin/destination/tracking_id; ASCII
    /// case-insensitive, `%`/`_` are taken literally
    pub q: Option<String>,
    /// Inclusive lower bound on created_at (epoch millis)
    pub from: Option<i64>,
    /// Inclusive upper bound on created_at (epoch millis)
    pub to: Option<i64>,
}

const SELECT_COLUMNS: &str = "SELECT id, tracking_id, sender_id, receiver_id, origin, \
     destination, weight, price, status, status_logs, created_at, updated_at FROM parcel";

/// Store a new aggregate, initial status log included.
///
/// A `tracking_id` collision surfaces as [`RepoError::Duplicate`]; the
/// caller retries with a freshly generated code.
pub async fn create(pool: &SqlitePool, parcel: &Parcel) -> RepoResult<()> {
    let status_logs = serde_json::to_string(&parcel.status_logs)?;
    sqlx::query(
        "INSERT INTO parcel (id, tracking_id, sender_id, receiver_id, origin, destination, \
         weight, price, status, status_logs, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
    )
    .bind(parcel.id)
    .bind(&parcel.tracking_id)
    .bind(&parcel.sender_id)
    .bind(&parcel.receiver_id)
    .bind(&parcel.origin)
    .bind(&parcel.destination)
    .bind(parcel.weight)
    .bind(parcel.price)
    .bind(parcel.status.as_str())
    .bind(status_logs)
    .bind(parcel.created_at)
    .bind(parcel.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// Look up a parcel by its customer-facing tracking code. Read-only.
pub async fn find_by_tracking_id(pool: &SqlitePool, tracking_id: &str) -> RepoResult<Option<Parcel>> {
    let sql = format!("{SELECT_COLUMNS} WHERE tracking_id = ?");
    let row = sqlx::query_as::<_, Parcel>(&sql)
        .bind(tracking_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Look up a parcel by internal ID, given as a string.
///
/// A malformed ID yields `None`, deliberately indistinguishable from a
/// missing row so callers never learn the internal ID structure.
pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<Parcel>> {
    let Ok(id) = id.parse::<i64>() else {
        return Ok(None);
    };
    let sql = format!("{SELECT_COLUMNS} WHERE id = ?");
    let row = sqlx::query_as::<_, Parcel>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Query a page of parcels plus the total match count.
///
/// The count runs over the same predicate but ignores pagination, so the
/// caller can derive the page count.
pub async fn query(
    pool: &SqlitePool,
    filter: &ParcelFilter,
    pagination: &PaginationParams,
    sort: &SortParams,
) -> RepoResult<(Vec<Parcel>, i64)> {
    let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM parcel");
    push_filters(&mut count_query, filter);
    let total: i64 = count_query.build_query_scalar().fetch_one(pool).await?;

    let mut select_query = QueryBuilder::new(SELECT_COLUMNS);
    push_filters(&mut select_query, filter);
    select_query.push(format!(
        " ORDER BY {} {}",
        sort_column(sort),
        sort.order.as_sql()
    ));
    select_query
        .push(" LIMIT ")
        .push_bind(i64::from(pagination.limit()))
        .push(" OFFSET ")
        .push_bind(pagination.offset());

    let items = select_query
        .build_query_as::<Parcel>()
        .fetch_all(pool)
        .await?;

    Ok((items, total))
}

/// Persist the current state of a parcel after a lifecycle mutation.
///
/// One UPDATE touching `status`, `status_logs` and `updated_at`; atomic at
/// the row level. No optimistic-lock token: concurrent writers race with
/// last-write-wins.
pub async fn save(pool: &SqlitePool, parcel: &Parcel) -> RepoResult<()> {
    let status_logs = serde_json::to_string(&parcel.status_logs)?;
    let rows = sqlx::query(
        "UPDATE parcel SET status = ?1, status_logs = ?2, updated_at = ?3 WHERE id = ?4",
    )
    .bind(parcel.status.as_str())
    .bind(status_logs)
    .bind(parcel.updated_at)
    .bind(parcel.id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Parcel {}", parcel.id)));
    }
    Ok(())
}

fn push_filters(query: &mut QueryBuilder<'_, Sqlite>, filter: &ParcelFilter) {
    query.push(" WHERE 1 = 1");

    if let Some(status) = filter.status {
        query.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(sender_id) = &filter.sender_id {
        query.push(" AND sender_id = ").push_bind(sender_id.clone());
    }
    if let Some(receiver_id) = &filter.receiver_id {
        query
            .push(" AND receiver_id = ")
            .push_bind(receiver_id.clone());
    }
    if let Some(tracking_id) = &filter.tracking_id {
        query
            .push(" AND tracking_id = ")
            .push_bind(tracking_id.clone());
    }
    if let Some(q) = &filter.q {
        let pattern = like_pattern(q);
        query
            .push(" AND (LOWER(origin) LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR LOWER(destination) LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR LOWER(tracking_id) LIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\')");
    }
    if let Some(from) = filter.from {
        query.push(" AND created_at >= ").push_bind(from);
    }
    if let Some(to) = filter.to {
        query.push(" AND created_at <= ").push_bind(to);
    }
}

/// Build a `%term%` LIKE pattern with `%`, `_` and `\` treated as literals.
///
/// Case folding is ASCII-only to agree with SQLite's `LOWER()`, which
/// leaves non-ASCII characters untouched; a search term therefore matches
/// non-ASCII text case-sensitively on both sides.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c.to_ascii_lowercase());
    }
    escaped.push('%');
    escaped
}

/// Resolve the wire-level sort field against the sortable column whitelist.
///
/// Unknown or absent fields fall back to `created_at` (newest first when
/// combined with the default descending order).
fn sort_column(sort: &SortParams) -> &'static str {
    match sort.sort_by.as_deref() {
        Some("createdAt" | "created_at") => "created_at",
        Some("updatedAt" | "updated_at") => "updated_at",
        Some("status") => "status",
        Some("trackingId" | "tracking_id") => "tracking_id",
        _ => "created_at",
    }
}
