use std::sync::Arc;

use poem::{http::StatusCode, test::TestClient};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    core::test_utils::generate_test_user, init_openapi_route, model::match_request::MatchStatus,
    settings::get_config, AppState,
};

#[sqlx::test]
async fn test_create_match_api(pool: PgPool) -> anyhow::Result<()> {
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
    let sender =
        generate_test_user(&mut db, &mut redis_conn, config.clone(), "sender", "password").await?;
    let receiver = generate_test_user(
        &mut db,
        &mut redis_conn,
        config.clone(),
        "receiver",
        "password",
    )
    .await?;
    let app = init_openapi_route(app_state.clone(), &config);
    let cli = TestClient::new(app);

    // When
    let resp = cli
        .post("/api/match")
        .header("authorization", format!("Bearer {}", sender.token))
        .body_json(&json!({
            "receiver_id": receiver.user.id.to_string(),
            "restaurant_preference": "Luigi's",
            "proposed_date": "2026-09-12T19:30:00Z"
        }))
        .send()
        .await;

    // Expect
    resp.assert_status(StatusCode::CREATED);
    let json_resp = resp.json().await;
    let obj = json_resp.value().object();
    assert_eq!(
        obj.get_opt("status").unwrap().deserialize::<String>(),
        "pending"
    );
    assert_eq!(
        obj.get_opt("sender_id").unwrap().deserialize::<String>(),
        sender.user.id.to_string()
    );
    let row: Option<(MatchStatus,)> = sqlx::query_as(
        "SELECT status FROM public.match_request WHERE sender_id = $1 AND receiver_id = $2",
    )
    .bind(sender.user.id)
    .bind(receiver.user.id)
    .fetch_optional(&mut *db)
    .await?;
    assert_eq!(row.map(|x| x.0), Some(MatchStatus::Pending));

    // When duplicate while pending
    let resp = cli
        .post("/api/match")
        .header("authorization", format!("Bearer {}", sender.token))
        .body_json(&json!({
            "receiver_id": receiver.user.id.to_string()
        }))
        .send()
        .await;

    // Expect
    resp.assert_status(StatusCode::CONFLICT);

    // When self match
    let resp = cli
        .post("/api/match")
        .header("authorization", format!("Bearer {}", sender.token))
        .body_json(&json!({
            "receiver_id": sender.user.id.to_string()
        }))
        .send()
        .await;

    // Expect no row written
    resp.assert_status(StatusCode::BAD_REQUEST);
    let count: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM public.match_request WHERE sender_id = $1 AND receiver_id = $1",
    )
    .bind(sender.user.id)
    .fetch_one(&mut *db)
    .await?;
    assert_eq!(count.0, 0);

    // When unknown receiver
    let resp = cli
        .post("/api/match")
        .header("authorization", format!("Bearer {}", sender.token))
        .body_json(&json!({
            "receiver_id": Uuid::now_v7().to_string()
        }))
        .send()
        .await;

    // Expect
    resp.assert_status(StatusCode::NOT_FOUND);

    // When malformed proposed_date
    let resp = cli
        .post("/api/match")
        .header("authorization", format!("Bearer {}", sender.token))
        .body_json(&json!({
            "receiver_id": receiver.user.id.to_string(),
            "proposed_date": "next friday"
        }))
        .send()
        .await;

    // Expect
    resp.assert_status(StatusCode::BAD_REQUEST);
    Ok(())
}

#[sqlx::test]
async fn test_sent_and_received_match_api(pool: PgPool) -> anyhow::Result<()> {
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
    let sender =
        generate_test_user(&mut db, &mut redis_conn, config.clone(), "sender", "password").await?;
    let receiver = generate_test_user(
        &mut db,
        &mut redis_conn,
        config.clone(),
        "receiver",
        "password",
    )
    .await?;
    let app = init_openapi_route(app_state.clone(), &config);
    let cli = TestClient::new(app);
    let resp = cli
        .post("/api/match")
        .header("authorization", format!("Bearer {}", sender.token))
        .body_json(&json!({
            "receiver_id": receiver.user.id.to_string()
        }))
        .send()
        .await;
    resp.assert_status(StatusCode::CREATED);

    // When sender lists sent
    let resp = cli
        .get("/api/match/sent")
        .header("authorization", format!("Bearer {}", sender.token))
        .send()
        .await;

    // Expect
    resp.assert_status_is_ok();
    let json_resp = resp.json().await;
    let items: Vec<serde_json::Value> = json_resp.value().deserialize();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["receiver_id"], receiver.user.id.to_string());

    // When sender lists received
    let resp = cli
        .get("/api/match/received")
        .header("authorization", format!("Bearer {}", sender.token))
        .send()
        .await;

    // Expect nothing, the request went the other way
    resp.assert_status_is_ok();
    resp.assert_json(&json!([])).await;

    // When receiver lists received
    let resp = cli
        .get("/api/match/received")
        .header("authorization", format!("Bearer {}", receiver.token))
        .send()
        .await;

    // Expect
    resp.assert_status_is_ok();
    let json_resp = resp.json().await;
    let items: Vec<serde_json::Value> = json_resp.value().deserialize();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["sender_id"], sender.user.id.to_string());
    Ok(())
}

#[sqlx::test]
async fn test_accept_match_api(pool: PgPool) -> anyhow::Result<()> {
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
    let sender =
        generate_test_user(&mut db, &mut redis_conn, config.clone(), "sender", "password").await?;
    let receiver = generate_test_user(
        &mut db,
        &mut redis_conn,
        config.clone(),
        "receiver",
        "password",
    )
    .await?;
    let outsider = generate_test_user(
        &mut db,
        &mut redis_conn,
        config.clone(),
        "outsider",
        "password",
    )
    .await?;
    let app = init_openapi_route(app_state.clone(), &config);
    let cli = TestClient::new(app);
    let resp = cli
        .post("/api/match")
        .header("authorization", format!("Bearer {}", sender.token))
        .body_json(&json!({
            "receiver_id": receiver.user.id.to_string()
        }))
        .send()
        .await;
    resp.assert_status(StatusCode::CREATED);
    let json_resp = resp.json().await;
    let match_id: String = json_resp
        .value()
        .object()
        .get_opt("id")
        .unwrap()
        .deserialize();

    // When the sender responds
    let resp = cli
        .put("/api/match")
        .header("authorization", format!("Bearer {}", sender.token))
        .query("id", &match_id)
        .body_json(&json!({
            "status": "accepted"
        }))
        .send()
        .await;

    // Expect only the receiver may respond
    resp.assert_status(StatusCode::FORBIDDEN);

    // When an outsider responds
    let resp = cli
        .put("/api/match")
        .header("authorization", format!("Bearer {}", outsider.token))
        .query("id", &match_id)
        .body_json(&json!({
            "status": "accepted"
        }))
        .send()
        .await;

    // Expect
    resp.assert_status(StatusCode::FORBIDDEN);

    // When the receiver sets an unknown status
    let resp = cli
        .put("/api/match")
        .header("authorization", format!("Bearer {}", receiver.token))
        .query("id", &match_id)
        .body_json(&json!({
            "status": "maybe"
        }))
        .send()
        .await;

    // Expect
    resp.assert_status(StatusCode::BAD_REQUEST);

    // When the receiver tries to keep it pending
    let resp = cli
        .put("/api/match")
        .header("authorization", format!("Bearer {}", receiver.token))
        .query("id", &match_id)
        .body_json(&json!({
            "status": "pending"
        }))
        .send()
        .await;

    // Expect
    resp.assert_status(StatusCode::BAD_REQUEST);

    // When the receiver accepts
    let resp = cli
        .put("/api/match")
        .header("authorization", format!("Bearer {}", receiver.token))
        .query("id", &match_id)
        .body_json(&json!({
            "status": "accepted",
            "restaurant_preference": "Luigi's"
        }))
        .send()
        .await;

    // Expect
    resp.assert_status_is_ok();
    let json_resp = resp.json().await;
    let obj = json_resp.value().object();
    assert_eq!(
        obj.get_opt("status").unwrap().deserialize::<String>(),
        "accepted"
    );
    let row: Option<(MatchStatus, Option<String>)> =
        sqlx::query_as("SELECT status, restaurant_preference FROM public.match_request WHERE id = $1")
            .bind(Uuid::parse_str(&match_id)?)
            .fetch_optional(&mut *db)
            .await?;
    assert!(row.is_some());
    let (status, restaurant_preference) = row.unwrap();
    assert_eq!(status, MatchStatus::Accepted);
    assert_eq!(restaurant_preference, Some("Luigi's".to_string()));

    // When the receiver rejects after accepting
    let resp = cli
        .put("/api/match")
        .header("authorization", format!("Bearer {}", receiver.token))
        .query("id", &match_id)
        .body_json(&json!({
            "status": "rejected"
        }))
        .send()
        .await;

    // Expect resolved matches are immutable and the row untouched
    resp.assert_status(StatusCode::CONFLICT);
    let row: Option<(MatchStatus,)> =
        sqlx::query_as("SELECT status FROM public.match_request WHERE id = $1")
            .bind(Uuid::parse_str(&match_id)?)
            .fetch_optional(&mut *db)
            .await?;
    assert_eq!(row.map(|x| x.0), Some(MatchStatus::Accepted));

    // When unknown match id
    let resp = cli
        .put("/api/match")
        .header("authorization", format!("Bearer {}", receiver.token))
        .query("id", &Uuid::now_v7().to_string())
        .body_json(&json!({
            "status": "accepted"
        }))
        .send()
        .await;

    // Expect
    resp.assert_status(StatusCode::NOT_FOUND);
    Ok(())
}

#[sqlx::test]
async fn test_resend_after_rejection(pool: PgPool) -> anyhow::Result<()> {
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
    let sender =
        generate_test_user(&mut db, &mut redis_conn, config.clone(), "sender", "password").await?;
    let receiver = generate_test_user(
        &mut db,
        &mut redis_conn,
        config.clone(),
        "receiver",
        "password",
    )
    .await?;
    let app = init_openapi_route(app_state.clone(), &config);
    let cli = TestClient::new(app);
    let resp = cli
        .post("/api/match")
        .header("authorization", format!("Bearer {}", sender.token))
        .body_json(&json!({
            "receiver_id": receiver.user.id.to_string()
        }))
        .send()
        .await;
    resp.assert_status(StatusCode::CREATED);
    let json_resp = resp.json().await;
    let match_id: String = json_resp
        .value()
        .object()
        .get_opt("id")
        .unwrap()
        .deserialize();
    let resp = cli
        .put("/api/match")
        .header("authorization", format!("Bearer {}", receiver.token))
        .query("id", &match_id)
        .body_json(&json!({
            "status": "rejected"
        }))
        .send()
        .await;
    resp.assert_status_is_ok();

    // When the pair has no pending request anymore
    let resp = cli
        .post("/api/match")
        .header("authorization", format!("Bearer {}", sender.token))
        .body_json(&json!({
            "receiver_id": receiver.user.id.to_string()
        }))
        .send()
        .await;

    // Expect a fresh request is allowed
    resp.assert_status(StatusCode::CREATED);
    Ok(())
}
