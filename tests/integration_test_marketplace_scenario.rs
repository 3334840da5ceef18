mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{parse_body, venue_payload, TestApp};
use serde_json::json;

/// The full lifecycle: registration, rejection with history,
/// re-registration, approval, a paid booking, and the settlement run.
#[tokio::test]
async fn test_full_marketplace_flow() {
    let app = TestApp::new().await;
    let owner = app.user_token("scenario-owner");
    let guest = app.user_token("scenario-guest");
    let admin = app.admin_token("scenario-admin");

    // Venue registers -> PENDING
    let res = app.request("POST", "/api/v1/venues/register", Some(&owner), Some(venue_payload("Velvet Underground"))).await;
    assert_eq!(res.status(), StatusCode::OK);
    let venue = parse_body(res).await;
    let venue_id = venue["id"].as_str().unwrap().to_string();
    assert_eq!(venue["status"], "PENDING");

    // Admin rejects -> REJECTED, one history item
    let res = app.request("POST", &format!("/api/v1/admin/venues/{}/reject", venue_id), Some(&admin), Some(json!({"reason": "bad documents"}))).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["status"], "REJECTED");
    assert_eq!(body["rejection_count"], 1);

    // Owner re-registers with corrected fields -> PENDING, lineage intact
    let res = app.request("POST", "/api/v1/venues/register", Some(&owner), Some(venue_payload("Velvet Underground (Corrected)"))).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["status"], "PENDING");
    assert_eq!(body["rejection_count"], 1);

    let res = app.request("GET", "/api/v1/venues/me", Some(&owner), None).await;
    let body = parse_body(res).await;
    let rejections = body["rejections"].as_array().unwrap();
    assert_eq!(rejections.len(), 1);
    assert_eq!(rejections[0]["venue_snapshot"]["name"], "Velvet Underground");
    assert_ne!(body["venue"]["name"], rejections[0]["venue_snapshot"]["name"]);

    // Admin approves -> APPROVED
    let res = app.request("POST", &format!("/api/v1/admin/venues/{}/approve", venue_id), Some(&admin), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await["status"], "APPROVED");

    // Owner publishes a 500-rupee event
    let date = (Utc::now() + Duration::days(2)).format("%Y-%m-%d").to_string();
    let res = app.request("POST", "/api/v1/events", Some(&owner), Some(json!({
        "name": "Friday Live Set",
        "event_date": date,
        "start_time": "22:30",
        "price": 500
    }))).await;
    assert_eq!(res.status(), StatusCode::OK);
    let event_id = parse_body(res).await["id"].as_str().unwrap().to_string();

    // Guest books 2 seats -> total 1000, counter moves by 2
    let res = app.request("POST", "/api/v1/bookings", Some(&guest), Some(json!({
        "event_id": event_id,
        "number_of_people": 2
    }))).await;
    assert_eq!(res.status(), StatusCode::OK);
    let booking = parse_body(res).await;
    assert_eq!(booking["total_amount"], 1000);
    assert_eq!(booking["payment_status"], "COMPLETED");

    let res = app.request("GET", &format!("/api/v1/events/{}", event_id), None, None).await;
    assert_eq!(parse_body(res).await["booked"], 2);

    // Admin settles the period at 10% commission
    let today = Utc::now().format("%Y-%m-%d").to_string();
    let res = app.request("POST", "/api/v1/admin/payouts", Some(&admin), Some(json!({
        "venue_id": venue_id,
        "period_start": today,
        "period_end": today,
        "commission_rate": 10.0
    }))).await;
    assert_eq!(res.status(), StatusCode::OK);
    let payout = parse_body(res).await;
    assert_eq!(payout["total_revenue"], 1000);
    assert_eq!(payout["commission_amount"], 100);
    assert_eq!(payout["net_amount"], 900);
    assert_eq!(payout["booking_count"], 1);

    // Regenerating the identical period is already done.
    let res = app.request("POST", "/api/v1/admin/payouts", Some(&admin), Some(json!({
        "venue_id": venue_id,
        "period_start": today,
        "period_end": today,
        "commission_rate": 10.0
    }))).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(parse_body(res).await["code"], "duplicate_payout");
}
