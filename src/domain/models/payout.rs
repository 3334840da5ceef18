use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

/// One settlement record for one venue over one inclusive date range.
/// At most one payout may exist per (venue, period_start, period_end);
/// the bank fields are a snapshot taken at generation time.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Payout {
    pub id: String,
    pub venue_id: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub commission_rate: f64,
    pub total_revenue: i64,
    pub commission_amount: i64,
    pub net_amount: i64,
    pub booking_count: i64,
    pub status: String,
    pub bank_account_number: String,
    pub bank_ifsc_code: String,
    pub transaction_id: Option<String>,
    pub processed_by: Option<String>,
    pub processed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

pub struct NewPayoutParams {
    pub venue_id: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub commission_rate: f64,
    pub total_revenue: i64,
    pub booking_count: i64,
    pub bank_account_number: String,
    pub bank_ifsc_code: String,
}

impl Payout {
    pub fn new(params: NewPayoutParams) -> Self {
        let commission_amount = (params.total_revenue as f64 * params.commission_rate / 100.0).round() as i64;
        Self {
            id: Uuid::new_v4().to_string(),
            venue_id: params.venue_id,
            period_start: params.period_start,
            period_end: params.period_end,
            commission_rate: params.commission_rate,
            total_revenue: params.total_revenue,
            commission_amount,
            net_amount: params.total_revenue - commission_amount,
            booking_count: params.booking_count,
            status: "PENDING".to_string(),
            bank_account_number: params.bank_account_number,
            bank_ifsc_code: params.bank_ifsc_code,
            transaction_id: None,
            processed_by: None,
            processed_at: None,
            created_at: Utc::now(),
        }
    }
}
