use chrono::Local;
use redis::ConnectionLike;
use sqlx::pool::PoolConnection;
use sqlx::types::Json;
use sqlx::Postgres;
use uuid::Uuid;

use super::security::{generate_refresh_token_from_user, generate_token_from_user};
use crate::core::security::hash_password;
use crate::core::session::add_session;
use crate::model::profile::{Profile, VerificationStatus};
use crate::model::user::User;
use crate::settings::Config;

pub struct TestUser {
    pub user: User,
    pub token: String,
    pub refresh_token: String,
}

/// Creates an active user row plus a live session. Profiles are attached
/// separately with [`generate_test_profile`] so tests can cover the
/// profile-less case.
pub async fn generate_test_user<C: ConnectionLike>(
    db: &mut PoolConnection<Postgres>,
    redis_conn: &mut C,
    config: Config,
    username: &str,
    password: &str,
) -> anyhow::Result<TestUser> {
    let hashed_password = hash_password(password).unwrap();
    let id = Uuid::now_v7();
    let now = Local::now().fixed_offset();
    let user = User {
        id,
        email: format!("{}@local.test", username),
        user_name: username.to_string(),
        password: hashed_password,
        is_active: Some(true),
        created_date: Some(now),
        updated_date: Some(now),
    };

    sqlx::query(
        r#"
        INSERT INTO public.user (id, email, user_name, password, is_active, created_date, updated_date)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(user.id)
    .bind(&user.email)
    .bind(&user.user_name)
    .bind(&user.password)
    .bind(user.is_active)
    .bind(user.created_date)
    .bind(user.updated_date)
    .execute(&mut **db)
    .await?;

    // Generate token
    let token = generate_token_from_user(user.clone(), config.clone()).await?;
    let refresh_token = generate_refresh_token_from_user(user.clone(), config.clone()).await?;
    add_session(
        redis_conn,
        &user,
        &config,
        token.clone(),
        refresh_token.clone(),
    )?;

    Ok(TestUser {
        user,
        token,
        refresh_token,
    })
}

pub async fn generate_test_profile(
    db: &mut PoolConnection<Postgres>,
    user_id: &Uuid,
    cuisine_preferences: Option<&str>,
    dietary_restrictions: Option<&str>,
    location: Option<&str>,
) -> anyhow::Result<Profile> {
    let now = Local::now().fixed_offset();
    let profile = Profile {
        id: Uuid::now_v7(),
        user_id: *user_id,
        full_name: None,
        bio: None,
        cuisine_preferences: cuisine_preferences.map(|x| x.to_string()),
        dietary_restrictions: dietary_restrictions.map(|x| x.to_string()),
        location: location.map(|x| x.to_string()),
        avatar_url: None,
        profile_photos: Json(vec![]),
        verification_status: VerificationStatus::Unverified,
        verification_date: None,
        cooking_level: None,
        preferred_dining_time: None,
        preferred_meal_types: None,
        preferred_group_size: None,
        food_allergies: None,
        special_diets: None,
        favorite_cuisines: Json(vec![]),
        price_range: None,
        created_date: Some(now),
        updated_date: Some(now),
    };
    sqlx::query(
        r#"
        INSERT INTO public.profile (id, user_id, cuisine_preferences, dietary_restrictions, location, created_date, updated_date)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(profile.id)
    .bind(profile.user_id)
    .bind(&profile.cuisine_preferences)
    .bind(&profile.dietary_restrictions)
    .bind(&profile.location)
    .bind(profile.created_date)
    .bind(profile.updated_date)
    .execute(&mut **db)
    .await?;
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use sqlx::{Acquire, PgPool};
    use uuid::Uuid;

    use crate::{
        core::{
            security::get_user_from_token, session::get_session,
            test_utils::generate_test_profile, test_utils::generate_test_user,
        },
        settings::get_config,
    };

    #[sqlx::test]
    async fn test_generate_test_user(pool: PgPool) -> anyhow::Result<()> {
        // Given
        let config = get_config();
        let client = redis::Client::open(config.redis_url.clone()).unwrap();
        let mut redis_conn = client.get_connection().unwrap();

        // When
        let mut db = pool.acquire().await?;
        let res = generate_test_user(
            &mut db,
            &mut redis_conn,
            config.clone(),
            "testuser",
            "testpassword",
        )
        .await?;
        generate_test_profile(&mut db, &res.user.id, Some("Italian"), None, Some("NYC")).await?;

        // Expect
        // is user exists on db
        let user: Option<(Uuid, String)> =
            sqlx::query_as("SELECT id, user_name FROM public.user WHERE id = $1")
                .bind(res.user.id)
                .fetch_optional(&mut *db)
                .await?;
        assert!(user.is_some());
        let profile: Option<(Uuid, Option<String>)> = sqlx::query_as(
            "SELECT id, cuisine_preferences FROM public.profile WHERE user_id = $1",
        )
        .bind(res.user.id)
        .fetch_optional(&mut *db)
        .await?;
        assert!(profile.is_some());
        assert_eq!(profile.unwrap().1, Some("Italian".to_string()));

        // is jwt token valid
        let mut tx = db.begin().await?;
        let user_token =
            get_user_from_token(&mut tx, &mut redis_conn, Some(res.token.clone())).await?;
        assert!(user_token.is_some());
        assert_eq!(user_token.unwrap().user_name, "testuser".to_string());

        // is user exists on redis
        let session = get_session(&mut redis_conn, res.token)?;
        assert!(session.is_some());
        Ok(())
    }
}
