mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{parse_body, venue_payload, TestApp};
use serde_json::json;
use tokio::task::JoinSet;

/// Registers and approves a venue for `owner`, then creates an event at
/// the given price. Returns (venue_id, event_id).
async fn setup_event(app: &TestApp, owner: &str, price: i64) -> (String, String) {
    let token = app.user_token(owner);
    let admin = app.admin_token("admin-1");

    let res = app.request("POST", "/api/v1/venues/register", Some(&token), Some(venue_payload("Bassline"))).await;
    assert_eq!(res.status(), StatusCode::OK);
    let venue_id = parse_body(res).await["id"].as_str().unwrap().to_string();

    let res = app.request("POST", &format!("/api/v1/admin/venues/{}/approve", venue_id), Some(&admin), None).await;
    assert_eq!(res.status(), StatusCode::OK);

    let date = (Utc::now() + Duration::days(7)).format("%Y-%m-%d").to_string();
    let res = app.request("POST", "/api/v1/events", Some(&token), Some(json!({
        "name": "Saturday Techno",
        "description": "All night",
        "event_date": date,
        "start_time": "22:00",
        "price": price
    }))).await;
    assert_eq!(res.status(), StatusCode::OK);
    let event_id = parse_body(res).await["id"].as_str().unwrap().to_string();

    (venue_id, event_id)
}

#[tokio::test]
async fn test_booking_computes_total_server_side() {
    let app = TestApp::new().await;
    let (_venue_id, event_id) = setup_event(&app, "owner-b1", 500).await;
    let guest = app.user_token("guest-b1");

    let res = app.request("POST", "/api/v1/bookings", Some(&guest), Some(json!({
        "event_id": event_id,
        "number_of_people": 2
    }))).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["total_amount"], 1000);
    assert_eq!(body["number_of_people"], 2);
    assert_eq!(body["payment_status"], "COMPLETED");
    assert!(body["id"].as_str().unwrap().starts_with("BK-"));
    assert!(body["qr_code"].as_str().unwrap().starts_with("https://qr.test/"));

    let res = app.request("GET", &format!("/api/v1/events/{}", event_id), None, None).await;
    assert_eq!(parse_body(res).await["booked"], 2);
}

#[tokio::test]
async fn test_booking_rejects_client_price_fields() {
    let app = TestApp::new().await;
    let (_venue_id, event_id) = setup_event(&app, "owner-b2", 500).await;
    let guest = app.user_token("guest-b2");

    for field in ["price", "total_amount", "amount"] {
        let mut payload = json!({
            "event_id": event_id,
            "number_of_people": 2
        });
        payload[field] = json!(1);

        let res = app.request("POST", "/api/v1/bookings", Some(&guest), Some(payload)).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(parse_body(res).await["code"], "price_manipulation");
    }

    // Nothing was booked and the counter never moved.
    let res = app.request("GET", &format!("/api/v1/events/{}", event_id), None, None).await;
    assert_eq!(parse_body(res).await["booked"], 0);
}

#[tokio::test]
async fn test_booking_people_bounds() {
    let app = TestApp::new().await;
    let (_venue_id, event_id) = setup_event(&app, "owner-b3", 500).await;
    let guest = app.user_token("guest-b3");

    for n in [0, -3, 101] {
        let res = app.request("POST", "/api/v1/bookings", Some(&guest), Some(json!({
            "event_id": event_id,
            "number_of_people": n
        }))).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    let res = app.request("POST", "/api/v1/bookings", Some(&guest), Some(json!({
        "event_id": event_id,
        "number_of_people": 100
    }))).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_booking_unknown_event() {
    let app = TestApp::new().await;
    let guest = app.user_token("guest-b4");

    let res = app.request("POST", "/api/v1/bookings", Some(&guest), Some(json!({
        "event_id": "nope",
        "number_of_people": 1
    }))).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_booking_rejected_when_venue_paused() {
    let app = TestApp::new().await;
    let (_venue_id, event_id) = setup_event(&app, "owner-b5", 500).await;
    let owner = app.user_token("owner-b5");
    let guest = app.user_token("guest-b5");

    app.request("PUT", "/api/v1/venues/me/booking-paused", Some(&owner), Some(json!({"paused": true}))).await;

    let res = app.request("POST", "/api/v1/bookings", Some(&guest), Some(json!({
        "event_id": event_id,
        "number_of_people": 1
    }))).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(parse_body(res).await["code"], "invalid_state");

    app.request("PUT", "/api/v1/venues/me/booking-paused", Some(&owner), Some(json!({"paused": false}))).await;

    let res = app.request("POST", "/api/v1/bookings", Some(&guest), Some(json!({
        "event_id": event_id,
        "number_of_people": 1
    }))).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_booking_rejected_for_unapproved_venue() {
    let app = TestApp::new().await;
    let token = app.user_token("owner-b6");
    let guest = app.user_token("guest-b6");

    let res = app.request("POST", "/api/v1/venues/register", Some(&token), Some(venue_payload("Unapproved"))).await;
    let venue_id = parse_body(res).await["id"].as_str().unwrap().to_string();

    // The owner cannot create events pre-approval, so plant one directly.
    sqlx::query(
        "INSERT INTO events (id, venue_id, name, event_date, start_time, price, booked, created_at) VALUES (?, ?, ?, ?, ?, ?, 0, ?)",
    )
        .bind("ev-unapproved")
        .bind(&venue_id)
        .bind("Shadow Event")
        .bind("2026-09-01")
        .bind("21:00")
        .bind(500_i64)
        .bind(Utc::now())
        .execute(&app.pool)
        .await
        .unwrap();

    let res = app.request("POST", "/api/v1/bookings", Some(&guest), Some(json!({
        "event_id": "ev-unapproved",
        "number_of_people": 1
    }))).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(parse_body(res).await["code"], "invalid_state");
}

#[tokio::test]
async fn test_booking_amount_ceiling() {
    let app = TestApp::new().await;
    let (venue_id, _event_id) = setup_event(&app, "owner-b7", 500).await;
    let guest = app.user_token("guest-b7");

    // Corrupted price data has to be caught before any money math sticks.
    sqlx::query(
        "INSERT INTO events (id, venue_id, name, event_date, start_time, price, booked, created_at) VALUES (?, ?, ?, ?, ?, ?, 0, ?)",
    )
        .bind("ev-corrupt")
        .bind(&venue_id)
        .bind("Corrupt Price")
        .bind("2026-09-01")
        .bind("21:00")
        .bind(200_000_000_i64)
        .bind(Utc::now())
        .execute(&app.pool)
        .await
        .unwrap();

    let res = app.request("POST", "/api/v1/bookings", Some(&guest), Some(json!({
        "event_id": "ev-corrupt",
        "number_of_people": 1
    }))).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(parse_body(res).await["code"], "invalid_amount");
}

#[tokio::test]
async fn test_booking_survives_qr_outage() {
    let app = TestApp::with_failing_qr().await;
    let (_venue_id, event_id) = setup_event(&app, "owner-b8", 500).await;
    let guest = app.user_token("guest-b8");

    let res = app.request("POST", "/api/v1/bookings", Some(&guest), Some(json!({
        "event_id": event_id,
        "number_of_people": 3
    }))).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["qr_code"], "");
    assert_eq!(body["total_amount"], 1500);
}

#[tokio::test]
async fn test_booking_listing_and_ownership() {
    let app = TestApp::new().await;
    let (_venue_id, event_id) = setup_event(&app, "owner-b9", 500).await;
    let owner = app.user_token("owner-b9");
    let guest = app.user_token("guest-b9");
    let stranger = app.user_token("stranger-b9");

    let res = app.request("POST", "/api/v1/bookings", Some(&guest), Some(json!({
        "event_id": event_id,
        "number_of_people": 2
    }))).await;
    let booking_id = parse_body(res).await["id"].as_str().unwrap().to_string();

    let res = app.request("GET", "/api/v1/bookings", Some(&guest), None).await;
    let body = parse_body(res).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"].as_str().unwrap(), booking_id);

    // Only the booking's owner (or an admin) may read it.
    let res = app.request("GET", &format!("/api/v1/bookings/{}", booking_id), Some(&stranger), None).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // The venue owner sees the guest list for their event.
    let res = app.request("GET", &format!("/api/v1/events/{}/bookings", event_id), Some(&owner), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await.as_array().unwrap().len(), 1);

    let res = app.request("GET", &format!("/api/v1/events/{}/bookings", event_id), Some(&stranger), None).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_counter_conservation_under_concurrent_bookings() {
    let app = TestApp::new().await;
    let (_venue_id, event_id) = setup_event(&app, "owner-b10", 100).await;

    let mut set = JoinSet::new();
    for i in 1..=10_i64 {
        let router = app.router.clone();
        let token = app.user_token(&format!("swarm-{}", i));
        let event_id = event_id.clone();
        set.spawn(async move {
            use axum::{body::Body, http::{header, Request}};
            use tower::ServiceExt;
            let payload = serde_json::json!({
                "event_id": event_id,
                "number_of_people": i
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

    // Sum 1..=10 = 55; any lost update shows up here.
    let res = app.request("GET", &format!("/api/v1/events/{}", event_id), None, None).await;
    assert_eq!(parse_body(res).await["booked"], 55);
}
