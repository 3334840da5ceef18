use crate::domain::{models::payout::Payout, ports::PayoutRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgPool, Row};

pub struct PostgresPayoutRepo {
    pool: PgPool,
}

impl PostgresPayoutRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PayoutRepository for PostgresPayoutRepo {
    async fn create(&self, payout: &Payout) -> Result<Payout, AppError> {
        sqlx::query_as::<_, Payout>(
            "INSERT INTO payouts (id, venue_id, period_start, period_end, commission_rate, total_revenue, commission_amount, net_amount, booking_count, status, bank_account_number, bank_ifsc_code, transaction_id, processed_by, processed_at, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
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
        sqlx::query_as::<_, Payout>("SELECT * FROM payouts WHERE id = $1")
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
            "SELECT * FROM payouts WHERE venue_id = $1 AND period_start = $2 AND period_end = $3",
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
            "SELECT COALESCE(SUM(b.total_amount), 0)::BIGINT AS revenue, COUNT(*) AS booking_count
             FROM bookings b
             JOIN events e ON b.event_id = e.id
             WHERE e.venue_id = $1 AND b.payment_status = 'COMPLETED' AND b.created_at >= $2 AND b.created_at < $3",
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
        let mut idx = 0;
        if venue_id.is_some() {
            idx += 1;
            sql.push_str(&format!(" AND venue_id = ${}", idx));
        }
        if status.is_some() {
            idx += 1;
            sql.push_str(&format!(" AND status = ${}", idx));
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
            "UPDATE payouts SET status = 'PROCESSED', transaction_id = $1, processed_by = $2, processed_at = $3
             WHERE id = $4 AND status IN ('PENDING', 'PROCESSING')
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
            "UPDATE payouts SET status = 'PROCESSING' WHERE id = $1 AND status = 'PENDING' RETURNING *",
        )
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn cancel(&self, id: &str) -> Result<Option<Payout>, AppError> {
        sqlx::query_as::<_, Payout>(
            "UPDATE payouts SET status = 'CANCELLED' WHERE id = $1 AND status IN ('PENDING', 'PROCESSING') RETURNING *",
        )
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
