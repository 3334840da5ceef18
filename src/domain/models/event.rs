use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

/// A ticketed night at a venue. price is the authoritative per-head entry
/// price in whole rupees; booked counts committed attendees and is only
/// ever moved by relative updates.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Event {
    pub id: String,
    pub venue_id: String,
    pub name: String,
    pub description: Option<String>,
    pub event_date: NaiveDate,
    pub start_time: String,
    pub price: i64,
    pub booked: i64,
    pub created_at: DateTime<Utc>,
}

impl Event {
    pub fn new(
        venue_id: String,
        name: String,
        description: Option<String>,
        event_date: NaiveDate,
        start_time: String,
        price: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            venue_id,
            name,
            description,
            event_date,
            start_time,
            price,
            booked: 0,
            created_at: Utc::now(),
        }
    }
}
