use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, info_span, Instrument};
use crate::domain::models::job::Job;
use crate::error::AppError;
use crate::state::AppState;

/// Drains the deferred-notification queue. Everything here is
/// fire-and-forget from the booking's point of view: a failed delivery
/// marks the job FAILED and nothing else.
pub async fn start_background_worker(state: Arc<AppState>) {
    info!("Starting background job worker...");

    loop {
        match state.job_repo.find_pending(10).await {
            Ok(jobs) => {
                for job in jobs {
                    let span = info_span!(
                        "background_job",
                        job_id = %job.id,
                        job_type = %job.job_type,
                    );

                    let state = state.clone();

                    async move {
                        info!("Processing job: {}", job.job_type);
                        match process_job(&state, &job).await {
                            Ok(_) => {
                                info!("Job completed successfully");
                                if let Err(e) = state.job_repo.update_status(&job.id, "COMPLETED", None).await {
                                    error!("Failed to mark job as completed: {:?}", e);
                                }
                            }
                            Err(e) => {
                                let err_msg = format!("{}", e);
                                error!("Job failed with error: {}", err_msg);
                                if let Err(up_err) = state.job_repo.update_status(&job.id, "FAILED", Some(err_msg)).await {
                                    error!("Failed to mark job as failed: {:?}", up_err);
                                }
                            }
                        }
                    }
                        .instrument(span)
                        .await;
                }
            }
            Err(e) => error!("Failed to fetch pending jobs: {:?}", e),
        }
        sleep(Duration::from_secs(5)).await;
    }
}

async fn process_job(state: &Arc<AppState>, job: &Job) -> Result<(), AppError> {
    if job.job_type != "CONFIRMATION" {
        return Err(AppError::InternalWithMsg(format!(
            "Unknown job type {}",
            job.job_type
        )));
    }

    let booking_id = &job.payload.booking_id;
    let user_id = &job.payload.user_id;

    let booking = state.booking_repo.find_by_id(booking_id).await?
        .ok_or(AppError::NotFound(format!("Booking {} not found", booking_id)))?;
    let user = state.user_repo.find_by_id(user_id).await?
        .ok_or(AppError::NotFound(format!("User {} not found", user_id)))?;
    let event = state.event_repo.find_by_id(&booking.event_id).await?
        .ok_or(AppError::NotFound(format!("Event {} not found", booking.event_id)))?;
    let venue = state.venue_repo.find_by_id(&event.venue_id).await?
        .ok_or(AppError::NotFound(format!("Venue {} not found", event.venue_id)))?;

    state
        .notification_service
        .send_booking_confirmation(&user, &booking, &event, &venue)
        .await
}
