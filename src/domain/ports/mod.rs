use crate::domain::models::{
    booking::Booking, event::Event, job::Job, payout::Payout, user::User,
    venue::{Venue, VenueRejection},
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    /// Best-effort profile refresh; only fills fields, never blanks them.
    async fn update_profile(&self, user: &User) -> Result<User, AppError>;
}

#[async_trait]
pub trait VenueRepository: Send + Sync {
    async fn create(&self, venue: &Venue) -> Result<Venue, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Venue>, AppError>;
    async fn find_by_owner(&self, owner_id: &str) -> Result<Option<Venue>, AppError>;
    async fn list_by_status(&self, status: &str) -> Result<Vec<Venue>, AppError>;
    /// Overwrites editable fields and flips a REJECTED venue back to
    /// PENDING. The WHERE clause guards the state transition; zero rows
    /// affected means the venue left REJECTED in the meantime.
    async fn reregister(&self, venue: &Venue) -> Result<Venue, AppError>;
    /// PENDING -> APPROVED, conditional on the current state.
    async fn approve(&self, id: &str) -> Result<Option<Venue>, AppError>;
    /// PENDING -> REJECTED plus the immutable history append, in one
    /// transaction. Returns None when the venue was not PENDING.
    async fn reject(&self, rejection: &VenueRejection) -> Result<Option<Venue>, AppError>;
    async fn set_booking_paused(&self, id: &str, paused: bool) -> Result<Venue, AppError>;
    async fn list_rejections(&self, venue_id: &str) -> Result<Vec<VenueRejection>, AppError>;
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: &Event) -> Result<Event, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError>;
    /// Public browse: events of approved venues that accept bookings.
    async fn list_bookable(&self) -> Result<Vec<Event>, AppError>;
    async fn list_by_venue(&self, venue_id: &str) -> Result<Vec<Event>, AppError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Inserts the booking, applies the relative attendee-counter update
    /// and enqueues the confirmation job in one transaction.
    async fn create_with_counter(&self, booking: &Booking, job: &Job) -> Result<Booking, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError>;
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Booking>, AppError>;
    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Booking>, AppError>;
}

#[async_trait]
pub trait PayoutRepository: Send + Sync {
    async fn create(&self, payout: &Payout) -> Result<Payout, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Payout>, AppError>;
    async fn find_by_period(
        &self,
        venue_id: &str,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> Result<Option<Payout>, AppError>;
    /// Sum and count of completed bookings for the venue's events whose
    /// created_at falls in [from, to_exclusive).
    async fn aggregate_completed(
        &self,
        venue_id: &str,
        from: DateTime<Utc>,
        to_exclusive: DateTime<Utc>,
    ) -> Result<(i64, i64), AppError>;
    async fn list(&self, venue_id: Option<&str>, status: Option<&str>) -> Result<Vec<Payout>, AppError>;
    /// {PENDING, PROCESSING} -> PROCESSED. Returns None when the payout
    /// was in neither state.
    async fn mark_processed(
        &self,
        id: &str,
        transaction_id: &str,
        processed_by: &str,
    ) -> Result<Option<Payout>, AppError>;
    /// PENDING -> PROCESSING.
    async fn mark_processing(&self, id: &str) -> Result<Option<Payout>, AppError>;
    /// {PENDING, PROCESSING} -> CANCELLED.
    async fn cancel(&self, id: &str) -> Result<Option<Payout>, AppError>;
}

#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn find_pending(&self, limit: i32) -> Result<Vec<Job>, AppError>;
    async fn update_status(&self, id: &str, status: &str, error_message: Option<String>) -> Result<(), AppError>;
}

#[async_trait]
pub trait QrService: Send + Sync {
    /// Renders the scannable pass for a booking and returns the hosted
    /// image URL. Re-rendering for the same id is acceptable.
    async fn generate(&self, booking_id: &str) -> Result<String, AppError>;
}

#[async_trait]
pub trait NotificationService: Send + Sync {
    async fn send_booking_confirmation(
        &self,
        user: &User,
        booking: &Booking,
        event: &Event,
        venue: &Venue,
    ) -> Result<(), AppError>;
}
