use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use rand::{distributions::Alphanumeric, Rng};

pub const MAX_PEOPLE_PER_BOOKING: i64 = 100;

/// Sanity ceiling on a single booking's total (1 crore rupees). Anything
/// above this means corrupted price data, not a real purchase.
pub const MAX_BOOKING_AMOUNT: i64 = 10_000_000;

/// A paid entry pass. total_amount is always event.price * number_of_people
/// computed server-side at creation; it is a fact, never an input.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Booking {
    pub id: String,
    pub user_id: String,
    pub event_id: String,
    pub number_of_people: i64,
    pub total_amount: i64,
    pub payment_status: String,
    pub qr_code: String,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn new(user_id: String, event_id: String, number_of_people: i64, total_amount: i64) -> Self {
        Self {
            id: generate_booking_id(),
            user_id,
            event_id,
            number_of_people,
            total_amount,
            // Payment capture is stubbed: every booking settles at creation.
            payment_status: "COMPLETED".to_string(),
            qr_code: String::new(),
            created_at: Utc::now(),
        }
    }
}

/// Wall-clock millis plus a random alphanumeric suffix. Unique with high
/// probability under concurrent creation; collisions surface as an insert
/// conflict and are retried with a fresh id.
fn generate_booking_id() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect();
    format!("BK-{}-{}", Utc::now().timestamp_millis(), suffix)
}
