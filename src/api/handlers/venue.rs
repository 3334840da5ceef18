use axum::{extract::{Path, Query, State}, response::IntoResponse, Json};
use crate::api::dtos::requests::{RegisterVenueRequest, RejectVenueRequest, SetBookingPausedRequest, VenueListQuery};
use crate::api::dtos::responses::{VenueStatusResponse, VenueSummary};
use crate::api::extractors::auth::{AdminUser, AuthUser};
use crate::domain::models::venue::{NewVenueParams, Venue, VenueRejection};
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tracing::info;

fn venue_params(owner_id: String, payload: RegisterVenueRequest) -> Result<NewVenueParams, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("Venue name is required".into()));
    }
    if payload.bank_account_number.trim().is_empty() || payload.bank_ifsc_code.trim().is_empty() {
        return Err(AppError::Validation("Bank account and IFSC code are required".into()));
    }
    Ok(NewVenueParams {
        owner_id,
        name: payload.name,
        description: payload.description,
        address: payload.address,
        city: payload.city,
        pincode: payload.pincode,
        owner_name: payload.owner_name,
        gst_number: payload.gst_number,
        license_number: payload.license_number,
        pan_number: payload.pan_number,
        bank_account_number: payload.bank_account_number,
        bank_ifsc_code: payload.bank_ifsc_code,
        documents: payload.documents,
        photos: payload.photos,
    })
}

/// First registration creates the venue in PENDING. If the caller's only
/// venue is REJECTED this is a re-registration: same row, fields
/// overwritten, status back to PENDING, rejection lineage preserved.
pub async fn register_venue(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Json(payload): Json<RegisterVenueRequest>,
) -> Result<impl IntoResponse, AppError> {
    let params = venue_params(identity.id.clone(), payload)?;

    // The venue row references the user row, so the account must exist
    // before anything is written.
    let user = state.identity_service.ensure_user(&identity.id, &identity.profile).await?;

    match state.venue_repo.find_by_owner(&user.id).await? {
        None => {
            let venue = Venue::new(params);
            let created = state.venue_repo.create(&venue).await.map_err(|e| {
                if e.is_unique_violation() {
                    // Concurrent registration by the same owner.
                    AppError::Conflict("A venue registration already exists for this account".into())
                } else {
                    e
                }
            })?;
            info!("Venue registered: {} (owner {})", created.id, user.id);
            Ok(Json(created))
        }
        Some(existing) if existing.status == "REJECTED" => {
            let mut venue = existing;
            venue.apply_reregistration(params);
            let updated = state.venue_repo.reregister(&venue).await?;
            info!(
                "Venue re-registered: {} (rejection_count {})",
                updated.id, updated.rejection_count
            );
            Ok(Json(updated))
        }
        Some(_) => Err(AppError::Conflict(
            "A venue registration already exists for this account".into(),
        )),
    }
}

pub async fn get_my_venue(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let venue = state.venue_repo.find_by_owner(&identity.id).await?
        .ok_or(AppError::NotFound("No venue registered for this account".into()))?;
    let rejections = state.venue_repo.list_rejections(&venue.id).await?;
    Ok(Json(VenueStatusResponse { venue, rejections }))
}

pub async fn set_booking_paused(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
    Json(payload): Json<SetBookingPausedRequest>,
) -> Result<impl IntoResponse, AppError> {
    let venue = state.venue_repo.find_by_owner(&identity.id).await?
        .ok_or(AppError::NotFound("No venue registered for this account".into()))?;

    if venue.status != "APPROVED" {
        return Err(AppError::InvalidState("Only approved venues can pause bookings".into()));
    }

    let updated = state.venue_repo.set_booking_paused(&venue.id, payload.paused).await?;
    info!("Venue {} booking_paused set to {}", updated.id, payload.paused);
    Ok(Json(updated))
}

pub async fn list_public_venues(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let venues = state.venue_repo.list_by_status("APPROVED").await?;
    let summaries: Vec<VenueSummary> = venues.into_iter().map(VenueSummary::from).collect();
    Ok(Json(summaries))
}

pub async fn list_venues(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Query(query): Query<VenueListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let status = query.status.as_deref().unwrap_or("PENDING");
    if !matches!(status, "PENDING" | "APPROVED" | "REJECTED") {
        return Err(AppError::Validation("Unknown venue status filter".into()));
    }
    let venues = state.venue_repo.list_by_status(status).await?;
    Ok(Json(venues))
}

/// Only legal from PENDING. An already-approved venue fails loudly so a
/// stale admin dashboard gets a clear signal instead of a silent success.
pub async fn approve_venue(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(venue_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.venue_repo.find_by_id(&venue_id).await?
        .ok_or(AppError::NotFound("Venue not found".into()))?;

    let approved = state.venue_repo.approve(&venue_id).await?
        .ok_or(AppError::InvalidState("Venue is not pending approval".into()))?;

    info!("Venue {} approved by {}", approved.id, admin.id);
    Ok(Json(approved))
}

pub async fn reject_venue(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(venue_id): Path<String>,
    Json(payload): Json<RejectVenueRequest>,
) -> Result<impl IntoResponse, AppError> {
    let reason = payload.reason.trim();
    if reason.is_empty() {
        return Err(AppError::Validation("A rejection reason is required".into()));
    }

    let venue = state.venue_repo.find_by_id(&venue_id).await?
        .ok_or(AppError::NotFound("Venue not found".into()))?;

    // Snapshot the row as it stands right now; the history item must show
    // what the admin actually rejected.
    let rejection = VenueRejection::new(&venue, reason.to_string(), admin.id.clone());

    let rejected = state.venue_repo.reject(&rejection).await?
        .ok_or(AppError::InvalidState("Venue is not pending approval".into()))?;

    info!(
        "Venue {} rejected by {} (rejection #{})",
        rejected.id, admin.id, rejected.rejection_count
    );
    Ok(Json(rejected))
}
