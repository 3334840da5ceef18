use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::api::handlers::{booking, event, health, payout, venue};
use crate::state::AppState;
use tower_http::{
    classify::ServerErrorsFailureClass,
    trace::TraceLayer,
};
use tracing::{error, info, info_span, Span};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Venue lifecycle
        .route("/api/v1/venues/register", post(venue::register_venue))
        .route("/api/v1/venues/me", get(venue::get_my_venue))
        .route("/api/v1/venues/me/booking-paused", put(venue::set_booking_paused))
        .route("/api/v1/venues", get(venue::list_public_venues))
        .route("/api/v1/admin/venues", get(venue::list_venues))
        .route("/api/v1/admin/venues/{venue_id}/approve", post(venue::approve_venue))
        .route("/api/v1/admin/venues/{venue_id}/reject", post(venue::reject_venue))

        // Events
        .route("/api/v1/events", post(event::create_event).get(event::list_events))
        .route("/api/v1/venues/me/events", get(event::list_my_events))
        .route("/api/v1/events/{event_id}", get(event::get_event))
        .route("/api/v1/events/{event_id}/bookings", get(booking::list_bookings_for_event))

        // Bookings
        .route("/api/v1/bookings", post(booking::create_booking).get(booking::list_my_bookings))
        .route("/api/v1/bookings/{booking_id}", get(booking::get_booking))

        // Payout ledger
        .route("/api/v1/admin/payouts", post(payout::generate_payout).get(payout::list_payouts))
        .route("/api/v1/admin/payouts/bulk", post(payout::bulk_generate_payout))
        .route("/api/v1/admin/payouts/{payout_id}/process", post(payout::process_payout))
        .route("/api/v1/admin/payouts/{payout_id}/processing", post(payout::mark_payout_processing))
        .route("/api/v1/admin/payouts/{payout_id}/cancel", post(payout::cancel_payout))
        .route("/api/v1/venues/me/payouts", get(payout::list_my_payouts))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
