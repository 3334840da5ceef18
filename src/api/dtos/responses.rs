use crate::domain::models::venue::{Venue, VenueRejection};
use serde::Serialize;

#[derive(Serialize)]
pub struct VenueStatusResponse {
    pub venue: Venue,
    pub rejections: Vec<VenueRejection>,
}

/// Public browse shape: no KYC or bank fields leave the building.
#[derive(Serialize)]
pub struct VenueSummary {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub address: String,
    pub city: String,
    pub photos: Vec<String>,
}

impl From<Venue> for VenueSummary {
    fn from(venue: Venue) -> Self {
        Self {
            id: venue.id,
            name: venue.name,
            description: venue.description,
            address: venue.address,
            city: venue.city,
            photos: venue.photos.0,
        }
    }
}

#[derive(Serialize)]
pub struct BulkPayoutFailure {
    pub venue_id: String,
    pub error: String,
}

#[derive(Serialize)]
pub struct BulkPayoutResponse {
    pub successful: usize,
    pub skipped: usize,
    pub failed: usize,
    pub failures: Vec<BulkPayoutFailure>,
}
