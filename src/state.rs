use std::sync::Arc;
use crate::config::Config;
use crate::domain::ports::{
    BookingRepository, EventRepository, JobRepository, NotificationService, PayoutRepository,
    QrService, UserRepository, VenueRepository,
};
use crate::domain::services::identity::IdentityService;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub user_repo: Arc<dyn UserRepository>,
    pub venue_repo: Arc<dyn VenueRepository>,
    pub event_repo: Arc<dyn EventRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub payout_repo: Arc<dyn PayoutRepository>,
    pub job_repo: Arc<dyn JobRepository>,
    pub identity_service: Arc<IdentityService>,
    pub qr_service: Arc<dyn QrService>,
    pub notification_service: Arc<dyn NotificationService>,
}
