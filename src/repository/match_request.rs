use chrono::{DateTime, FixedOffset};
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::{
    core::sqlx_utils::{binds_query_as, query_builder, SqlxBinds},
    model::match_request::{MatchRequest, TABLE_NAME},
};

pub async fn get_match_request_by_id(
    tx: &mut Transaction<'_, Postgres>,
    id: &Uuid,
) -> anyhow::Result<Option<MatchRequest>> {
    let binds: Vec<SqlxBinds> = vec![SqlxBinds::Uuid(*id)];
    let filters: Vec<String> = vec!["id = $1".to_string()];
    let stmt = query_builder(None, TABLE_NAME, &filters, vec![], None, None);
    let data = binds_query_as::<MatchRequest>(&stmt, binds)
        .fetch_optional(&mut **tx)
        .await?;
    Ok(data)
}

/// The pending row for an ordered (sender, receiver) pair, if any. The
/// partial unique index guarantees at most one.
pub async fn get_pending_match_request(
    tx: &mut Transaction<'_, Postgres>,
    sender_id: &Uuid,
    receiver_id: &Uuid,
) -> anyhow::Result<Option<MatchRequest>> {
    let data: Option<MatchRequest> = sqlx::query_as(
        format!(
            r#"SELECT *
        FROM {}
        WHERE sender_id = $1 AND receiver_id = $2 AND status = 'pending'
        "#,
            TABLE_NAME
        )
        .as_str(),
    )
    .bind(sender_id)
    .bind(receiver_id)
    .fetch_optional(&mut **tx)
    .await?;
    Ok(data)
}

pub async fn get_sent_match_requests(
    tx: &mut Transaction<'_, Postgres>,
    user_id: &Uuid,
) -> anyhow::Result<Vec<MatchRequest>> {
    let binds: Vec<SqlxBinds> = vec![SqlxBinds::Uuid(*user_id)];
    let filters: Vec<String> = vec!["sender_id = $1".to_string()];
    let stmt = query_builder(
        None,
        TABLE_NAME,
        &filters,
        vec!["updated_date DESC".to_string()],
        None,
        None,
    );
    let data = binds_query_as::<MatchRequest>(&stmt, binds)
        .fetch_all(&mut **tx)
        .await?;
    Ok(data)
}

pub async fn get_received_match_requests(
    tx: &mut Transaction<'_, Postgres>,
    user_id: &Uuid,
) -> anyhow::Result<Vec<MatchRequest>> {
    let binds: Vec<SqlxBinds> = vec![SqlxBinds::Uuid(*user_id)];
    let filters: Vec<String> = vec!["receiver_id = $1".to_string()];
    let stmt = query_builder(
        None,
        TABLE_NAME,
        &filters,
        vec!["updated_date DESC".to_string()],
        None,
        None,
    );
    let data = binds_query_as::<MatchRequest>(&stmt, binds)
        .fetch_all(&mut **tx)
        .await?;
    Ok(data)
}

/// Every match the user appears in, either side, any status.
pub async fn get_match_requests_involving(
    tx: &mut Transaction<'_, Postgres>,
    user_id: &Uuid,
) -> anyhow::Result<Vec<MatchRequest>> {
    let data: Vec<MatchRequest> = sqlx::query_as(
        format!(
            r#"SELECT *
        FROM {}
        WHERE sender_id = $1 OR receiver_id = $1
        "#,
            TABLE_NAME
        )
        .as_str(),
    )
    .bind(user_id)
    .fetch_all(&mut **tx)
    .await?;
    Ok(data)
}

/// (accepted, total) counts over all matches involving the user.
pub async fn count_match_outcomes(
    tx: &mut Transaction<'_, Postgres>,
    user_id: &Uuid,
) -> anyhow::Result<(i64, i64)> {
    let counts: (i64, i64) = sqlx::query_as(
        format!(
            r#"SELECT
            COUNT(*) FILTER (WHERE status = 'accepted'),
            COUNT(*)
        FROM {}
        WHERE sender_id = $1 OR receiver_id = $1
        "#,
            TABLE_NAME
        )
        .as_str(),
    )
    .bind(user_id)
    .fetch_one(&mut **tx)
    .await?;
    Ok(counts)
}

pub async fn create_match_request(
    tx: &mut Transaction<'_, Postgres>,
    match_request: &MatchRequest,
) -> anyhow::Result<()> {
    sqlx::query(
        format!(
            r#"
        INSERT INTO {} (id, sender_id, receiver_id, status, restaurant_preference, proposed_date, created_date, updated_date)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
            TABLE_NAME
        )
        .as_str(),
    )
    .bind(match_request.id)
    .bind(match_request.sender_id)
    .bind(match_request.receiver_id)
    .bind(match_request.status)
    .bind(&match_request.restaurant_preference)
    .bind(match_request.proposed_date)
    .bind(match_request.created_date)
    .bind(match_request.updated_date)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

pub async fn update_match_request(
    tx: &mut Transaction<'_, Postgres>,
    match_request: &mut MatchRequest,
    now: &DateTime<FixedOffset>,
) -> anyhow::Result<()> {
    match_request.updated_date = Some(*now);
    sqlx::query(
        format!(
            r#"UPDATE {}
            SET status = $1, restaurant_preference = $2, proposed_date = $3, updated_date = $4
            WHERE id = $5"#,
            TABLE_NAME
        )
        .as_str(),
    )
    .bind(match_request.status)
    .bind(&match_request.restaurant_preference)
    .bind(match_request.proposed_date)
    .bind(match_request.updated_date)
    .bind(match_request.id)
    .execute(&mut **tx)
    .await?;
    Ok(())
}
