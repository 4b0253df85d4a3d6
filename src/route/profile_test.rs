use std::sync::Arc;

use poem::{http::StatusCode, test::TestClient};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    core::test_utils::{generate_test_profile, generate_test_user},
    init_openapi_route,
    settings::get_config,
    AppState,
};

#[sqlx::test]
async fn test_create_profile_api(pool: PgPool) -> anyhow::Result<()> {
    // Given
    let mut config = get_config();
    config.prefix = Some("/api".to_string());
    let client = redis::Client::open(config.redis_url.clone()).unwrap();
    let redis_pool = r2d2::Pool::builder().build(client).unwrap();
    let app_state = Arc::new(AppState {
        db: pool,
        redis_conn: redis_pool,
    });
    let mut db = app_state.db.acquire().await?;
    let mut redis_conn = app_state.redis_conn.get()?;
    let test_user =
        generate_test_user(&mut db, &mut redis_conn, config.clone(), "diner", "password").await?;
    let app = init_openapi_route(app_state.clone(), &config);
    let cli = TestClient::new(app);

    // When
    let resp = cli
        .post("/api/profile")
        .header("authorization", format!("Bearer {}", test_user.token))
        .body_json(&json!({
            "full_name": "Test Diner",
            "cuisine_preferences": "Italian,Thai",
            "dietary_restrictions": "vegetarian",
            "location": "NYC",
            "favorite_cuisines": ["Italian", "Thai"]
        }))
        .send()
        .await;

    // Expect
    resp.assert_status(StatusCode::CREATED);
    let json_resp = resp.json().await;
    let obj = json_resp.value().object();
    assert_eq!(
        obj.get_opt("user_id").unwrap().deserialize::<String>(),
        test_user.user.id.to_string()
    );
    assert_eq!(
        obj.get_opt("verification_status")
            .unwrap()
            .deserialize::<String>(),
        "unverified"
    );

    // Expect row on db
    let row: Option<(Option<String>, Option<String>)> = sqlx::query_as(
        "SELECT cuisine_preferences, location FROM public.profile WHERE user_id = $1",
    )
    .bind(test_user.user.id)
    .fetch_optional(&mut *db)
    .await?;
    assert!(row.is_some());
    let (cuisine_preferences, location) = row.unwrap();
    assert_eq!(cuisine_preferences, Some("Italian,Thai".to_string()));
    assert_eq!(location, Some("NYC".to_string()));

    // When second create
    let resp = cli
        .post("/api/profile")
        .header("authorization", format!("Bearer {}", test_user.token))
        .body_json(&json!({
            "location": "Boston"
        }))
        .send()
        .await;

    // Expect one profile per user
    resp.assert_status(StatusCode::CONFLICT);
    Ok(())
}

#[sqlx::test]
async fn test_get_my_profile_api(pool: PgPool) -> anyhow::Result<()> {
    // Given
    let mut config = get_config();
    config.prefix = Some("/api".to_string());
    let client = redis::Client::open(config.redis_url.clone()).unwrap();
    let redis_pool = r2d2::Pool::builder().build(client).unwrap();
    let app_state = Arc::new(AppState {
        db: pool,
        redis_conn: redis_pool,
    });
    let mut db = app_state.db.acquire().await?;
    let mut redis_conn = app_state.redis_conn.get()?;
    let test_user =
        generate_test_user(&mut db, &mut redis_conn, config.clone(), "diner", "password").await?;
    let app = init_openapi_route(app_state.clone(), &config);
    let cli = TestClient::new(app);

    // When no profile yet
    let resp = cli
        .get("/api/profile/me")
        .header("authorization", format!("Bearer {}", test_user.token))
        .send()
        .await;

    // Expect
    resp.assert_status(StatusCode::NOT_FOUND);

    // When profile exists
    let profile = generate_test_profile(
        &mut db,
        &test_user.user.id,
        Some("Italian"),
        None,
        Some("NYC"),
    )
    .await?;
    let resp = cli
        .get("/api/profile/me")
        .header("authorization", format!("Bearer {}", test_user.token))
        .send()
        .await;

    // Expect
    resp.assert_status_is_ok();
    let json_resp = resp.json().await;
    let obj = json_resp.value().object();
    assert_eq!(
        obj.get_opt("id").unwrap().deserialize::<String>(),
        profile.id.to_string()
    );
    assert_eq!(
        obj.get_opt("location").unwrap().deserialize::<Option<String>>(),
        Some("NYC".to_string())
    );
    Ok(())
}

#[sqlx::test]
async fn test_update_my_profile_api(pool: PgPool) -> anyhow::Result<()> {
    // Given
    let mut config = get_config();
    config.prefix = Some("/api".to_string());
    let client = redis::Client::open(config.redis_url.clone()).unwrap();
    let redis_pool = r2d2::Pool::builder().build(client).unwrap();
    let app_state = Arc::new(AppState {
        db: pool,
        redis_conn: redis_pool,
    });
    let mut db = app_state.db.acquire().await?;
    let mut redis_conn = app_state.redis_conn.get()?;
    let test_user =
        generate_test_user(&mut db, &mut redis_conn, config.clone(), "diner", "password").await?;
    generate_test_profile(
        &mut db,
        &test_user.user.id,
        Some("Italian"),
        Some("vegetarian"),
        Some("NYC"),
    )
    .await?;
    let app = init_openapi_route(app_state.clone(), &config);
    let cli = TestClient::new(app);

    // When partial update
    let resp = cli
        .put("/api/profile/me")
        .header("authorization", format!("Bearer {}", test_user.token))
        .body_json(&json!({
            "bio": "loves pasta",
            "location": "Boston"
        }))
        .send()
        .await;

    // Expect changed fields updated, the rest untouched
    resp.assert_status_is_ok();
    let row: Option<(Option<String>, Option<String>, Option<String>)> = sqlx::query_as(
        "SELECT bio, location, cuisine_preferences FROM public.profile WHERE user_id = $1",
    )
    .bind(test_user.user.id)
    .fetch_optional(&mut *db)
    .await?;
    assert!(row.is_some());
    let (bio, location, cuisine_preferences) = row.unwrap();
    assert_eq!(bio, Some("loves pasta".to_string()));
    assert_eq!(location, Some("Boston".to_string()));
    assert_eq!(cuisine_preferences, Some("Italian".to_string()));
    Ok(())
}

#[sqlx::test]
async fn test_get_detail_profile_api(pool: PgPool) -> anyhow::Result<()> {
    // Given
    let mut config = get_config();
    config.prefix = Some("/api".to_string());
    let client = redis::Client::open(config.redis_url.clone()).unwrap();
    let redis_pool = r2d2::Pool::builder().build(client).unwrap();
    let app_state = Arc::new(AppState {
        db: pool,
        redis_conn: redis_pool,
    });
    let mut db = app_state.db.acquire().await?;
    let mut redis_conn = app_state.redis_conn.get()?;
    let test_user =
        generate_test_user(&mut db, &mut redis_conn, config.clone(), "diner", "password").await?;
    let other =
        generate_test_user(&mut db, &mut redis_conn, config.clone(), "other", "password").await?;
    let other_profile =
        generate_test_profile(&mut db, &other.user.id, Some("Thai"), None, None).await?;
    let app = init_openapi_route(app_state.clone(), &config);
    let cli = TestClient::new(app);

    // When
    let resp = cli
        .get("/api/profile/detail")
        .header("authorization", format!("Bearer {}", test_user.token))
        .query("user_id", &other.user.id.to_string())
        .send()
        .await;

    // Expect
    resp.assert_status_is_ok();
    let json_resp = resp.json().await;
    let obj = json_resp.value().object();
    assert_eq!(
        obj.get_opt("id").unwrap().deserialize::<String>(),
        other_profile.id.to_string()
    );

    // When unknown user
    let resp = cli
        .get("/api/profile/detail")
        .header("authorization", format!("Bearer {}", test_user.token))
        .query("user_id", &Uuid::now_v7().to_string())
        .send()
        .await;

    // Expect
    resp.assert_status(StatusCode::NOT_FOUND);
    Ok(())
}
