use axum::{extract::{Path, Query, State}, response::IntoResponse, Json};
use crate::api::dtos::requests::{BulkGeneratePayoutRequest, GeneratePayoutRequest, PayoutListQuery, ProcessPayoutRequest};
use crate::api::dtos::responses::{BulkPayoutFailure, BulkPayoutResponse};
use crate::api::extractors::auth::{AdminUser, AuthUser};
use crate::domain::models::payout::{NewPayoutParams, Payout};
use crate::domain::models::venue::Venue;
use crate::error::AppError;
use crate::state::AppState;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{info, warn};

fn validate_period(period_start: NaiveDate, period_end: NaiveDate, rate: f64) -> Result<(), AppError> {
    if period_start > period_end {
        return Err(AppError::Validation("period_start must not be after period_end".into()));
    }
    if !(0.0..=100.0).contains(&rate) || !rate.is_finite() {
        return Err(AppError::Validation("commission_rate must be between 0 and 100".into()));
    }
    Ok(())
}

/// Aggregates the venue's completed bookings over the inclusive date range
/// and persists one settlement row. The unique period index arbitrates
/// when two generators race; the loser sees DuplicatePayout like everyone
/// else.
async fn generate_for_venue(
    state: &AppState,
    venue: &Venue,
    period_start: NaiveDate,
    period_end: NaiveDate,
    commission_rate: f64,
) -> Result<Payout, AppError> {
    if venue.status != "APPROVED" {
        return Err(AppError::InvalidState("Venue is not approved for payouts".into()));
    }

    if state
        .payout_repo
        .find_by_period(&venue.id, period_start, period_end)
        .await?
        .is_some()
    {
        return Err(AppError::DuplicatePayout);
    }

    let from = period_start
        .and_hms_opt(0, 0, 0)
        .ok_or(AppError::Validation("Invalid period start".into()))?
        .and_utc();
    let to_exclusive = period_end
        .succ_opt()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or(AppError::Validation("Invalid period end".into()))?
        .and_utc();

    let (total_revenue, booking_count) = state
        .payout_repo
        .aggregate_completed(&venue.id, from, to_exclusive)
        .await?;

    // A zero-revenue period still gets a record: it documents that the
    // period was settled and nothing was owed.
    let payout = Payout::new(NewPayoutParams {
        venue_id: venue.id.clone(),
        period_start,
        period_end,
        commission_rate,
        total_revenue,
        booking_count,
        bank_account_number: venue.bank_account_number.clone(),
        bank_ifsc_code: venue.bank_ifsc_code.clone(),
    });

    state.payout_repo.create(&payout).await.map_err(|e| {
        if e.is_unique_violation() {
            AppError::DuplicatePayout
        } else {
            e
        }
    })
}

pub async fn generate_payout(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Json(payload): Json<GeneratePayoutRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_period(payload.period_start, payload.period_end, payload.commission_rate)?;

    let venue = state.venue_repo.find_by_id(&payload.venue_id).await?
        .ok_or(AppError::NotFound("Venue not found".into()))?;

    let payout = generate_for_venue(
        &state,
        &venue,
        payload.period_start,
        payload.period_end,
        payload.commission_rate,
    )
    .await?;

    info!(
        "Payout {} generated by {} for venue {}: revenue {}, commission {}, net {}",
        payout.id, admin.id, venue.id, payout.total_revenue, payout.commission_amount, payout.net_amount
    );
    Ok(Json(payout))
}

/// Sweeps every approved venue. Individual failures never abort the run;
/// each venue lands in exactly one of successful / skipped / failed.
pub async fn bulk_generate_payout(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Json(payload): Json<BulkGeneratePayoutRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_period(payload.period_start, payload.period_end, payload.commission_rate)?;

    let venues = state.venue_repo.list_by_status("APPROVED").await?;

    let mut successful = 0;
    let mut skipped = 0;
    let mut failures: Vec<BulkPayoutFailure> = Vec::new();

    for venue in &venues {
        match generate_for_venue(
            &state,
            venue,
            payload.period_start,
            payload.period_end,
            payload.commission_rate,
        )
        .await
        {
            Ok(_) => successful += 1,
            Err(AppError::DuplicatePayout) => skipped += 1,
            Err(e) => {
                warn!("Bulk payout failed for venue {}: {}", venue.id, e);
                failures.push(BulkPayoutFailure {
                    venue_id: venue.id.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    info!(
        "Bulk payout by {}: {} successful, {} skipped, {} failed over {} venues",
        admin.id,
        successful,
        skipped,
        failures.len(),
        venues.len()
    );

    Ok(Json(BulkPayoutResponse {
        successful,
        skipped,
        failed: failures.len(),
        failures,
    }))
}

pub async fn list_payouts(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Query(query): Query<PayoutListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let payouts = state
        .payout_repo
        .list(query.venue_id.as_deref(), query.status.as_deref())
        .await?;
    Ok(Json(payouts))
}

pub async fn list_my_payouts(
    State(state): State<Arc<AppState>>,
    AuthUser(identity): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let venue = state.venue_repo.find_by_owner(&identity.id).await?
        .ok_or(AppError::NotFound("No venue registered for this account".into()))?;
    let payouts = state.payout_repo.list(Some(&venue.id), None).await?;
    Ok(Json(payouts))
}

/// Records an external bank transfer that already happened. Human action,
/// never retried automatically.
pub async fn process_payout(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(payout_id): Path<String>,
    Json(payload): Json<ProcessPayoutRequest>,
) -> Result<impl IntoResponse, AppError> {
    let transaction_id = payload.transaction_id.trim();
    if transaction_id.is_empty() {
        return Err(AppError::Validation("A transaction id is required".into()));
    }

    state.payout_repo.find_by_id(&payout_id).await?
        .ok_or(AppError::NotFound("Payout not found".into()))?;

    let processed = state
        .payout_repo
        .mark_processed(&payout_id, transaction_id, &admin.id)
        .await?
        .ok_or(AppError::InvalidState("Payout is not pending or processing".into()))?;

    info!("Payout {} marked processed by {} (txn {})", processed.id, admin.id, transaction_id);
    Ok(Json(processed))
}

pub async fn mark_payout_processing(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(payout_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.payout_repo.find_by_id(&payout_id).await?
        .ok_or(AppError::NotFound("Payout not found".into()))?;

    let payout = state.payout_repo.mark_processing(&payout_id).await?
        .ok_or(AppError::InvalidState("Payout is not pending".into()))?;

    info!("Payout {} marked processing by {}", payout.id, admin.id);
    Ok(Json(payout))
}

pub async fn cancel_payout(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(payout_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.payout_repo.find_by_id(&payout_id).await?
        .ok_or(AppError::NotFound("Payout not found".into()))?;

    let payout = state.payout_repo.cancel(&payout_id).await?
        .ok_or(AppError::InvalidState("Payout is not pending or processing".into()))?;

    info!("Payout {} cancelled by {}", payout.id, admin.id);
    Ok(Json(payout))
}
