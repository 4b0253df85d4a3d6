use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::{
    core::sqlx_utils::{binds_query_as, query_builder, SqlxBinds},
    model::{
        profile::{Profile, TABLE_NAME as PROFILE_TABLE_NAME},
        user::{User, TABLE_NAME},
    },
};

pub async fn get_user_by_id(
    tx: &mut Transaction<'_, Postgres>,
    id: &Uuid,
) -> anyhow::Result<Option<User>> {
    let binds: Vec<SqlxBinds> = vec![SqlxBinds::Uuid(*id)];
    let filters: Vec<String> = vec!["id = $1".to_string()];
    let stmt = query_builder(None, TABLE_NAME, &filters, vec![], None, None);
    let user = binds_query_as::<User>(&stmt, binds)
        .fetch_optional(&mut **tx)
        .await?;
    Ok(user)
}

pub async fn get_user_by_email(
    tx: &mut Transaction<'_, Postgres>,
    email: &str,
) -> anyhow::Result<Option<User>> {
    let user: Option<User> = sqlx::query_as(
        r#"SELECT *
        FROM public.user
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(&mut **tx)
    .await?;
    Ok(user)
}

pub async fn get_user_by_username(
    tx: &mut Transaction<'_, Postgres>,
    username: &str,
) -> anyhow::Result<Option<User>> {
    let user: Option<User> = sqlx::query_as(
        r#"SELECT *
        FROM public.user
        WHERE user_name = $1
        "#,
    )
    .bind(username)
    .fetch_optional(&mut **tx)
    .await?;
    Ok(user)
}

/// Login identifier may be an email or a username; email wins when both match.
pub async fn get_user_by_login(
    tx: &mut Transaction<'_, Postgres>,
    identifier: &str,
) -> anyhow::Result<Option<User>> {
    if let Some(user) = get_user_by_email(tx, identifier).await? {
        return Ok(Some(user));
    }
    get_user_by_username(tx, identifier).await
}

pub async fn create_user(tx: &mut Transaction<'_, Postgres>, user: &User) -> anyhow::Result<()> {
    sqlx::query(
        format!(
            r#"
        INSERT INTO {} (id, email, user_name, password, is_active, created_date, updated_date)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
            TABLE_NAME
        )
        .as_str(),
    )
    .bind(user.id)
    .bind(&user.email)
    .bind(&user.user_name)
    .bind(&user.password)
    .bind(user.is_active)
    .bind(user.created_date)
    .bind(user.updated_date)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Active users with a profile whose id is not in `excluded`, in stable
/// enumeration order (creation order). Ranking relies on that order for
/// tie-breaking, so keep the ORDER BY deterministic.
pub async fn get_candidates(
    tx: &mut Transaction<'_, Postgres>,
    excluded: &[Uuid],
) -> anyhow::Result<Vec<(User, Profile)>> {
    let users: Vec<User> = sqlx::query_as(
        format!(
            r#"SELECT u.*
        FROM {} u
        JOIN {} p ON p.user_id = u.id
        WHERE u.is_active = TRUE AND u.id <> ALL($1)
        ORDER BY u.created_date, u.id
        "#,
            TABLE_NAME, PROFILE_TABLE_NAME
        )
        .as_str(),
    )
    .bind(excluded)
    .fetch_all(&mut **tx)
    .await?;

    let mut result: Vec<(User, Profile)> = Vec::with_capacity(users.len());
    for user in users {
        let profile: Option<Profile> = sqlx::query_as(
            format!("SELECT * FROM {} WHERE user_id = $1", PROFILE_TABLE_NAME).as_str(),
        )
        .bind(user.id)
        .fetch_optional(&mut **tx)
        .await?;
        if let Some(profile) = profile {
            result.push((user, profile));
        }
    }
    Ok(result)
}
