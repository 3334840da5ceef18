mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{parse_body, venue_payload, Profile, TestApp};
use serde_json::json;
use sqlx::Row;
use tokio::task::JoinSet;

async fn setup_event(app: &TestApp, owner: &str) -> String {
    let token = app.user_token(owner);
    let admin = app.admin_token("admin-1");

    let res = app.request("POST", "/api/v1/venues/register", Some(&token), Some(venue_payload("Idem Club"))).await;
    let venue_id = parse_body(res).await["id"].as_str().unwrap().to_string();
    app.request("POST", &format!("/api/v1/admin/venues/{}/approve", venue_id), Some(&admin), None).await;

    let date = (Utc::now() + Duration::days(3)).format("%Y-%m-%d").to_string();
    let res = app.request("POST", "/api/v1/events", Some(&token), Some(json!({
        "name": "House Night",
        "event_date": date,
        "start_time": "21:00",
        "price": 300
    }))).await;
    parse_body(res).await["id"].as_str().unwrap().to_string()
}

async fn count_users(app: &TestApp, id: &str) -> i64 {
    sqlx::query("SELECT COUNT(*) AS n FROM users WHERE id = ?")
        .bind(id)
        .fetch_one(&app.pool)
        .await
        .unwrap()
        .get::<i64, _>("n")
}

#[tokio::test]
async fn test_repeated_bookings_reuse_one_user_row() {
    let app = TestApp::new().await;
    let event_id = setup_event(&app, "owner-i1").await;
    let guest = app.user_token("guest-i1");

    for _ in 0..3 {
        let res = app.request("POST", "/api/v1/bookings", Some(&guest), Some(json!({
            "event_id": event_id,
            "number_of_people": 1
        }))).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    assert_eq!(count_users(&app, "guest-i1").await, 1);
}

#[tokio::test]
async fn test_concurrent_first_contact_provisions_exactly_one_user() {
    let app = TestApp::new().await;
    let event_id = setup_event(&app, "owner-i2").await;

    // Every task carries the same brand-new identity: the classic
    // thundering herd on the users table.
    let mut set = JoinSet::new();
    for _ in 0..8 {
        let router = app.router.clone();
        let token = app.user_token("herd-user");
        let event_id = event_id.clone();
        set.spawn(async move {
            use axum::{body::Body, http::{header, Request}};
            use tower::ServiceExt;
            let payload = serde_json::json!({
                "event_id": event_id,
                "number_of_people": 1
            });
            let res = router.oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/bookings")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            ).await.unwrap();
            res.status()
        });
    }

    while let Some(result) = set.join_next().await {
        assert_eq!(result.unwrap(), StatusCode::OK);
    }

    assert_eq!(count_users(&app, "herd-user").await, 1);

    let bookings = sqlx::query("SELECT COUNT(*) AS n FROM bookings WHERE user_id = 'herd-user'")
        .fetch_one(&app.pool)
        .await
        .unwrap()
        .get::<i64, _>("n");
    assert_eq!(bookings, 8);
}

#[tokio::test]
async fn test_email_collision_degrades_without_blocking() {
    let app = TestApp::new().await;
    let event_id = setup_event(&app, "owner-i3").await;

    let first = app.user_token_with_profile("user-email-a", &Profile {
        name: Some("First".into()),
        email: Some("shared@example.com".into()),
        ..Profile::default()
    });
    let res = app.request("POST", "/api/v1/bookings", Some(&first), Some(json!({
        "event_id": event_id,
        "number_of_people": 1
    }))).await;
    assert_eq!(res.status(), StatusCode::OK);

    // A different account claiming the same email must still get through;
    // the colliding field is dropped, not the booking.
    let second = app.user_token_with_profile("user-email-b", &Profile {
        name: Some("Second".into()),
        email: Some("shared@example.com".into()),
        ..Profile::default()
    });
    let res = app.request("POST", "/api/v1/bookings", Some(&second), Some(json!({
        "event_id": event_id,
        "number_of_people": 1
    }))).await;
    assert_eq!(res.status(), StatusCode::OK);

    let row = sqlx::query("SELECT email FROM users WHERE id = 'user-email-b'")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert!(row.get::<Option<String>, _>("email").is_none());

    let row = sqlx::query("SELECT email FROM users WHERE id = 'user-email-a'")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(row.get::<Option<String>, _>("email").as_deref(), Some("shared@example.com"));
}

#[tokio::test]
async fn test_phone_collision_degrades_without_blocking() {
    let app = TestApp::new().await;
    let event_id = setup_event(&app, "owner-i4").await;

    let first = app.user_token_with_profile("user-phone-a", &Profile {
        phone: Some("+919900112233".into()),
        ..Profile::default()
    });
    app.request("POST", "/api/v1/bookings", Some(&first), Some(json!({
        "event_id": event_id,
        "number_of_people": 1
    }))).await;

    let second = app.user_token_with_profile("user-phone-b", &Profile {
        phone: Some("+919900112233".into()),
        ..Profile::default()
    });
    let res = app.request("POST", "/api/v1/bookings", Some(&second), Some(json!({
        "event_id": event_id,
        "number_of_people": 1
    }))).await;
    assert_eq!(res.status(), StatusCode::OK);

    let row = sqlx::query("SELECT phone FROM users WHERE id = 'user-phone-b'")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert!(row.get::<Option<String>, _>("phone").is_none());
}

#[tokio::test]
async fn test_profile_refresh_fills_missing_fields() {
    let app = TestApp::new().await;
    let event_id = setup_event(&app, "owner-i5").await;

    // First contact with a bare token: row exists with no profile.
    let bare = app.user_token("guest-i5");
    app.request("POST", "/api/v1/bookings", Some(&bare), Some(json!({
        "event_id": event_id,
        "number_of_people": 1
    }))).await;

    // The provider later supplies the profile; a follow-up call fills it.
    let enriched = app.user_token_with_profile("guest-i5", &Profile {
        name: Some("Ravi".into()),
        email: Some("ravi@example.com".into()),
        ..Profile::default()
    });
    app.request("POST", "/api/v1/bookings", Some(&enriched), Some(json!({
        "event_id": event_id,
        "number_of_people": 1
    }))).await;

    let row = sqlx::query("SELECT name, email FROM users WHERE id = 'guest-i5'")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(row.get::<Option<String>, _>("name").as_deref(), Some("Ravi"));
    assert_eq!(row.get::<Option<String>, _>("email").as_deref(), Some("ravi@example.com"));
}
