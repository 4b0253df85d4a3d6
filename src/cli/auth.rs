use chrono::Local;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{core::security::hash_password, model::user::User, repository};

pub async fn create_user(
    pool: &PgPool,
    email: &str,
    username: &str,
    password: &str,
) -> anyhow::Result<()> {
    let mut tx = pool.begin().await?;

    let hashed_password = match hash_password(password) {
        Ok(val) => val,
        Err(err) => anyhow::bail!("unable to hash password: {}", err),
    };
    let now = Local::now().fixed_offset();
    let user = User {
        id: Uuid::now_v7(),
        email: email.to_string(),
        user_name: username.to_string(),
        password: hashed_password,
        is_active: Some(true),
        created_date: Some(now),
        updated_date: Some(now),
    };
    repository::user::create_user(&mut tx, &user).await?;
    tx.commit().await?;
    Ok(())
}
