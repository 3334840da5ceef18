use crate::domain::{models::payout::Payout, ports::PayoutRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Row, SqlitePool};

pub struct SqlitePayoutRepo {
    pool: SqlitePool,
}

impl SqlitePayoutRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PayoutRepository for SqlitePayoutRepo {
    async fn create(&self, payout: &Payout) -> Result<Payout, AppError> {
        sqlx::query_as::<_, Payout>(
            "INSERT INTO payouts (id, venue_id, period_start, period_end, commission_rate, total_revenue, commission_amount, net_amount, booking_count, status, bank_account_number, bank_ifsc_code, transaction_id, processed_by, processed_at, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
            .bind(&payout.id).bind(&payout.venue_id).bind(payout.period_start).bind(payout.period_end)
            .bind(payout.commission_rate).bind(payout.total_revenue).bind(payout.commission_amount)
            .bind(payout.net_amount).bind(payout.booking_count).bind(&payout.status)
            .bind(&payout.bank_account_number).bind(&payout.bank_ifsc_code)
            .bind(&payout.transaction_id).bind(&payout.processed_by).bind(payout.processed_at)
            .bind(payout.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Payout>, AppError> {
        sqlx::query_as::<_, Payout>("SELECT * FROM payouts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_period(
        &self,
        venue_id: &str,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> Result<Option<Payout>, AppError> {
        sqlx::query_as::<_, Payout>(
            "SELECT * FROM payouts WHERE venue_id = ? AND period_start = ? AND period_end = ?",
        )
            .bind(venue_id)
            .bind(period_start)
            .bind(period_end)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn aggregate_completed(
        &self,
        venue_id: &str,
        from: DateTime<Utc>,
        to_exclusive: DateTime<Utc>,
    ) -> Result<(i64, i64), AppError> {
        let row = sqlx::query(
            "SELECT COALESCE(SUM(b.total_amount), 0) AS revenue, COUNT(*) AS booking_count
             FROM bookings b
             JOIN events e ON b.event_id = e.id
             WHERE e.venue_id = ? AND b.payment_status = 'COMPLETED' AND b.created_at >= ? AND b.created_at < ?",
        )
            .bind(venue_id)
            .bind(from)
            .bind(to_exclusive)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok((row.get::<i64, _>("revenue"), row.get::<i64, _>("booking_count")))
    }

    async fn list(&self, venue_id: Option<&str>, status: Option<&str>) -> Result<Vec<Payout>, AppError> {
        let mut sql = String::from("SELECT * FROM payouts WHERE 1 = 1");
        if venue_id.is_some() {
            sql.push_str(" AND venue_id = ?");
        }
        if status.is_some() {
            sql.push_str(" AND status = ?");
        }
        sql.push_str(" ORDER BY created_at DESC");

        let mut query = sqlx::query_as::<_, Payout>(&sql);
        if let Some(v) = venue_id {
            query = query.bind(v);
        }
        if let Some(s) = status {
            query = query.bind(s);
        }
        query.fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn mark_processed(
        &self,
        id: &str,
        transaction_id: &str,
        processed_by: &str,
    ) -> Result<Option<Payout>, AppError> {
        sqlx::query_as::<_, Payout>(
            "UPDATE payouts SET status = 'PROCESSED', transaction_id = ?, processed_by = ?, processed_at = ?
             WHERE id = ? AND status IN ('PENDING', 'PROCESSING')
             RETURNING *",
        )
            .bind(transaction_id)
            .bind(processed_by)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn mark_processing(&self, id: &str) -> Result<Option<Payout>, AppError> {
        sqlx::query_as::<_, Payout>(
            "UPDATE payouts SET status = 'PROCESSING' WHERE id = ? AND status = 'PENDING' RETURNING *",
        )
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn cancel(&self, id: &str) -> Result<Option<Payout>, AppError> {
        sqlx::query_as::<_, Payout>(
            "UPDATE payouts SET status = 'CANCELLED' WHERE id = ? AND status IN ('PENDING', 'PROCESSING') RETURNING *",
        )
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
