use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;

/// Venue lifecycle: PENDING -> APPROVED, PENDING -> REJECTED,
/// REJECTED -> PENDING (re-registration). APPROVED is never reachable
/// from REJECTED without a fresh PENDING review.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Venue {
    pub id: String,
    pub owner_id: String,
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
    pub status: String,
    pub booking_paused: bool,
    pub rejected_at: Option<DateTime<Utc>>,
    pub rejection_count: i32,
    pub rejection_reason: Option<String>,
    pub documents: Json<Vec<String>>,
    pub photos: Json<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewVenueParams {
    pub owner_id: String,
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
    pub documents: Vec<String>,
    pub photos: Vec<String>,
}

impl Venue {
    pub fn new(params: NewVenueParams) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            owner_id: params.owner_id,
            name: params.name,
            description: params.description,
            address: params.address,
            city: params.city,
            pincode: params.pincode,
            owner_name: params.owner_name,
            gst_number: params.gst_number,
            license_number: params.license_number,
            pan_number: params.pan_number,
            bank_account_number: params.bank_account_number,
            bank_ifsc_code: params.bank_ifsc_code,
            status: "PENDING".to_string(),
            booking_paused: false,
            rejected_at: None,
            rejection_count: 0,
            rejection_reason: None,
            documents: Json(params.documents),
            photos: Json(params.photos),
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrites the editable fields for a re-registration. Status flips
    /// back to PENDING; rejected_at and rejection_count stay untouched so
    /// the rejection lineage survives.
    pub fn apply_reregistration(&mut self, params: NewVenueParams) {
        self.name = params.name;
        self.description = params.description;
        self.address = params.address;
        self.city = params.city;
        self.pincode = params.pincode;
        self.owner_name = params.owner_name;
        self.gst_number = params.gst_number;
        self.license_number = params.license_number;
        self.pan_number = params.pan_number;
        self.bank_account_number = params.bank_account_number;
        self.bank_ifsc_code = params.bank_ifsc_code;
        self.documents = Json(params.documents);
        self.photos = Json(params.photos);
        self.status = "PENDING".to_string();
        self.rejection_reason = None;
        self.updated_at = Utc::now();
    }
}

/// Immutable record of one rejection decision. venue_snapshot holds the
/// venue row as it was at the moment of rejection, not at re-registration.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct VenueRejection {
    pub id: String,
    pub venue_id: String,
    pub seq_no: i32,
    pub reason: String,
    pub rejected_by: String,
    pub rejected_at: DateTime<Utc>,
    pub venue_snapshot: Json<serde_json::Value>,
}

impl VenueRejection {
    pub fn new(venue: &Venue, reason: String, rejected_by: String) -> Self {
        let snapshot = serde_json::to_value(venue).unwrap_or(serde_json::Value::Null);
        Self {
            id: Uuid::new_v4().to_string(),
            venue_id: venue.id.clone(),
            seq_no: venue.rejection_count + 1,
            reason,
            rejected_by,
            rejected_at: Utc::now(),
            venue_snapshot: Json(snapshot),
        }
    }
}
