use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct RegisterVenueRequest {
    pub name: String,
    pub description: Option<String>,
    pub address: String,
    pub city: String,
    pub pincode: String,
    pub owner_name: String,
    pub gst_number: Option<String>,
    pub license_number: Option<String>,
    pub pan_number: Option<String>,
    pub bank_account_number: String,
    pub bank_ifsc_code: String,
    #[serde(default)]
    pub documents: Vec<String>,
    #[serde(default)]
    pub photos: Vec<String>,
}

#[derive(Deserialize)]
pub struct RejectVenueRequest {
    pub reason: String,
}

#[derive(Deserialize)]
pub struct SetBookingPausedRequest {
    pub paused: bool,
}

#[derive(Deserialize)]
pub struct VenueListQuery {
    pub status: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateEventRequest {
    pub name: String,
    pub description: Option<String>,
    pub event_date: NaiveDate,
    pub start_time: String,
    pub price: i64,
}

/// The price-shaped fields are decoys: pricing is server-authoritative,
/// so any client that fills one is treated as hostile and rejected.
#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub event_id: String,
    pub number_of_people: i64,
    #[serde(default)]
    pub price: Option<serde_json::Value>,
    #[serde(default)]
    pub total_amount: Option<serde_json::Value>,
    #[serde(default)]
    pub amount: Option<serde_json::Value>,
}

#[derive(Deserialize)]
pub struct GeneratePayoutRequest {
    pub venue_id: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub commission_rate: f64,
}

#[derive(Deserialize)]
pub struct BulkGeneratePayoutRequest {
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub commission_rate: f64,
}

#[derive(Deserialize)]
pub struct ProcessPayoutRequest {
    pub transaction_id: String,
}

#[derive(Deserialize)]
pub struct PayoutListQuery {
    pub venue_id: Option<String>,
    pub status: Option<String>,
}
