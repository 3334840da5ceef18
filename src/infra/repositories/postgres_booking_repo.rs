use crate::domain::{
    models::{booking::Booking, job::Job},
    ports::BookingRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresBookingRepo {
    pool: PgPool,
}

impl PostgresBookingRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for PostgresBookingRepo {
    async fn create_with_counter(&self, booking: &Booking, job: &Job) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let created = sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (id, user_id, event_id, number_of_people, total_amount, payment_status, qr_code, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING *",
        )
            .bind(&booking.id).bind(&booking.user_id).bind(&booking.event_id)
            .bind(booking.number_of_people).bind(booking.total_amount)
            .bind(&booking.payment_status).bind(&booking.qr_code).bind(booking.created_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        // Relative update: the attendee counter must never be read-modify-written.
        let result = sqlx::query("UPDATE events SET booked = booked + $1 WHERE id = $2")
            .bind(booking.number_of_people)
            .bind(&booking.event_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Event not found".into()));
        }

        sqlx::query(
            "INSERT INTO jobs (id, job_type, payload, execute_at, status, error_message, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
            .bind(&job.id).bind(&job.job_type).bind(&job.payload).bind(job.execute_at)
            .bind(&job.status).bind(&job.error_message).bind(job.created_at)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE user_id = $1 ORDER BY created_at DESC",
        )
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE event_id = $1 ORDER BY created_at DESC",
        )
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
