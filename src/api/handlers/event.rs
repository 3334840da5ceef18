use axum::{extract::{Path, State}, response::IntoResponse, Json};
use crate::api::dtos::requests::CreateEventRequest;
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::event::Event;
use crate::error::AppError;
use crate::state::AppState;
use chrono::NaiveTime;
use std::sync::Arc;
use tracing::info;

pub async fn create_event(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Json(payload): Json<CreateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("Event name is required".into()));
    }
    if payload.price < 0 {
        return Err(AppError::Validation("Price must not be negative".into()));
    }
    NaiveTime::parse_from_str(&payload.start_time, "%H:%M")
        .map_err(|_| AppError::Validation("Invalid start time format (HH:MM)".into()))?;

    let venue = state.venue_repo.find_by_owner(&identity.id).await?
        .ok_or(AppError::NotFound("No venue registered for this account".into()))?;
    if venue.status != "APPROVED" {
        return Err(AppError::InvalidState("Venue is not approved yet".into()));
    }

    let event = Event::new(
        venue.id.clone(),
        payload.name,
        payload.description,
        payload.event_date,
        payload.start_time,
        payload.price,
    );
    let created = state.event_repo.create(&event).await?;
    info!("Event created: {} at venue {}", created.id, venue.id);
    Ok(Json(created))
}

pub async fn list_events(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let events = state.event_repo.list_bookable().await?;
    Ok(Json(events))
}

pub async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_id(&event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;
    Ok(Json(event))
}

pub async fn list_my_events(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let venue = state.venue_repo.find_by_owner(&identity.id).await?
        .ok_or(AppError::NotFound("No venue registered for this account".into()))?;
    let events = state.event_repo.list_by_venue(&venue.id).await?;
    Ok(Json(events))
}
