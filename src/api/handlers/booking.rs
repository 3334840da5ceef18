use axum::{extract::{Path, State}, response::IntoResponse, Json};
use crate::api::dtos::requests::CreateBookingRequest;
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::booking::{Booking, MAX_BOOKING_AMOUNT, MAX_PEOPLE_PER_BOOKING};
use crate::domain::models::job::Job;
use crate::error::AppError;
use crate::state::AppState;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

const INSERT_ATTEMPTS: u32 = 3;

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.number_of_people < 1 || payload.number_of_people > MAX_PEOPLE_PER_BOOKING {
        return Err(AppError::Validation(format!(
            "number_of_people must be between 1 and {}",
            MAX_PEOPLE_PER_BOOKING
        )));
    }

    // Pricing is server-authoritative. A request that carries any price
    // field was built against a different contract than ours, or is
    // probing for client-side total computation; either way it dies here.
    if payload.price.is_some() || payload.total_amount.is_some() || payload.amount.is_some() {
        warn!(
            security = true,
            user_id = %identity.id,
            event_id = %payload.event_id,
            "booking rejected: client supplied price field"
        );
        return Err(AppError::PriceManipulation);
    }

    let event = state.event_repo.find_by_id(&payload.event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    let venue = state.venue_repo.find_by_id(&event.venue_id).await?
        .ok_or(AppError::NotFound("Venue not found".into()))?;
    if venue.status != "APPROVED" {
        return Err(AppError::InvalidState("Venue is not accepting bookings".into()));
    }
    if venue.booking_paused {
        return Err(AppError::InvalidState("Bookings are paused for this venue".into()));
    }

    let total_amount = event
        .price
        .checked_mul(payload.number_of_people)
        .unwrap_or(i64::MAX);
    if total_amount <= 0 || total_amount > MAX_BOOKING_AMOUNT {
        warn!(
            security = true,
            user_id = %identity.id,
            event_id = %event.id,
            price = event.price,
            number_of_people = payload.number_of_people,
            "booking rejected: computed total outside sane bounds"
        );
        return Err(AppError::InvalidAmount(format!(
            "Computed total {} is outside the accepted range",
            total_amount
        )));
    }

    // The booking row carries a required user reference; provision the
    // account first and fail the whole request if that cannot converge.
    let user = state.identity_service.ensure_user(&identity.id, &identity.profile).await?;

    let mut last_err = AppError::InsertConflict;
    for attempt in 0..INSERT_ATTEMPTS {
        let mut booking = Booking::new(
            user.id.clone(),
            event.id.clone(),
            payload.number_of_people,
            total_amount,
        );

        // A missing pass is a degraded booking, not a failed one.
        match state.qr_service.generate(&booking.id).await {
            Ok(url) => booking.qr_code = url,
            Err(e) => {
                warn!("QR generation failed for booking {}: {}", booking.id, e);
            }
        }

        let job = Job::new("CONFIRMATION", booking.id.clone(), user.id.clone(), Utc::now());

        match state.booking_repo.create_with_counter(&booking, &job).await {
            Ok(created) => {
                info!(
                    "Booking confirmed: {} for event {} ({} people, total {})",
                    created.id, event.id, created.number_of_people, created.total_amount
                );
                return Ok(Json(created));
            }
            Err(e) if e.is_unique_violation() => {
                warn!(
                    "Booking id collision on attempt {}: {}, retrying with fresh id",
                    attempt + 1,
                    booking.id
                );
                last_err = AppError::InsertConflict;
            }
            Err(e) => return Err(e),
        }
    }

    Err(last_err)
}

pub async fn list_my_bookings(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let bookings = state.booking_repo.list_by_user(&identity.id).await?;
    Ok(Json(bookings))
}

pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.booking_repo.find_by_id(&booking_id).await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;

    if booking.user_id != identity.id && !identity.admin {
        return Err(AppError::Forbidden("Not your booking".into()));
    }
    Ok(Json(booking))
}

/// Venue owners see the guest list for their own events.
pub async fn list_bookings_for_event(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_id(&event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;
    let venue = state.venue_repo.find_by_id(&event.venue_id).await?
        .ok_or(AppError::NotFound("Venue not found".into()))?;

    if venue.owner_id != identity.id && !identity.admin {
        return Err(AppError::Forbidden("Not your event".into()));
    }

    let bookings = state.booking_repo.list_by_event(&event_id).await?;
    Ok(Json(bookings))
}
