use crate::domain::{
    models::venue::{Venue, VenueRejection},
    ports::VenueRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

pub struct PostgresVenueRepo {
    pool: PgPool,
}

impl PostgresVenueRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VenueRepository for PostgresVenueRepo {
    async fn create(&self, venue: &Venue) -> Result<Venue, AppError> {
        sqlx::query_as::<_, Venue>(
            "INSERT INTO venues (id, owner_id, name, description, address, city, pincode, owner_name, gst_number, license_number, pan_number, bank_account_number, bank_ifsc_code, status, booking_paused, rejected_at, rejection_count, rejection_reason, documents, photos, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $21, $22)
             RETURNING *",
        )
            .bind(&venue.id).bind(&venue.owner_id).bind(&venue.name).bind(&venue.description)
            .bind(&venue.address).bind(&venue.city).bind(&venue.pincode).bind(&venue.owner_name)
            .bind(&venue.gst_number).bind(&venue.license_number).bind(&venue.pan_number)
            .bind(&venue.bank_account_number).bind(&venue.bank_ifsc_code).bind(&venue.status)
            .bind(venue.booking_paused).bind(venue.rejected_at).bind(venue.rejection_count)
            .bind(&venue.rejection_reason).bind(&venue.documents).bind(&venue.photos)
            .bind(venue.created_at).bind(venue.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Venue>, AppError> {
        sqlx::query_as::<_, Venue>("SELECT * FROM venues WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_owner(&self, owner_id: &str) -> Result<Option<Venue>, AppError> {
        sqlx::query_as::<_, Venue>("SELECT * FROM venues WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_status(&self, status: &str) -> Result<Vec<Venue>, AppError> {
        sqlx::query_as::<_, Venue>("SELECT * FROM venues WHERE status = $1 ORDER BY created_at ASC")
            .bind(status)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn reregister(&self, venue: &Venue) -> Result<Venue, AppError> {
        sqlx::query_as::<_, Venue>(
            "UPDATE venues SET name = $1, description = $2, address = $3, city = $4, pincode = $5, owner_name = $6, gst_number = $7, license_number = $8, pan_number = $9, bank_account_number = $10, bank_ifsc_code = $11, documents = $12, photos = $13, status = 'PENDING', rejection_reason = NULL, updated_at = $14
             WHERE id = $15 AND status = 'REJECTED'
             RETURNING *",
        )
            .bind(&venue.name).bind(&venue.description).bind(&venue.address).bind(&venue.city)
            .bind(&venue.pincode).bind(&venue.owner_name).bind(&venue.gst_number)
            .bind(&venue.license_number).bind(&venue.pan_number).bind(&venue.bank_account_number)
            .bind(&venue.bank_ifsc_code).bind(&venue.documents).bind(&venue.photos)
            .bind(venue.updated_at)
            .bind(&venue.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::InvalidState("Venue is not rejected".into()))
    }

    async fn approve(&self, id: &str) -> Result<Option<Venue>, AppError> {
        sqlx::query_as::<_, Venue>(
            "UPDATE venues SET status = 'APPROVED', updated_at = $1 WHERE id = $2 AND status = 'PENDING' RETURNING *",
        )
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn reject(&self, rejection: &VenueRejection) -> Result<Option<Venue>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let rejected = sqlx::query_as::<_, Venue>(
            "UPDATE venues SET status = 'REJECTED', rejected_at = $1, rejection_count = rejection_count + 1, rejection_reason = $2, updated_at = $3
             WHERE id = $4 AND status = 'PENDING'
             RETURNING *",
        )
            .bind(rejection.rejected_at)
            .bind(&rejection.reason)
            .bind(rejection.rejected_at)
            .bind(&rejection.venue_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        let Some(venue) = rejected else {
            return Ok(None);
        };

        sqlx::query(
            "INSERT INTO venue_rejections (id, venue_id, seq_no, reason, rejected_by, rejected_at, venue_snapshot) VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
            .bind(&rejection.id)
            .bind(&rejection.venue_id)
            .bind(rejection.seq_no)
            .bind(&rejection.reason)
            .bind(&rejection.rejected_by)
            .bind(rejection.rejected_at)
            .bind(&rejection.venue_snapshot)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(Some(venue))
    }

    async fn set_booking_paused(&self, id: &str, paused: bool) -> Result<Venue, AppError> {
        sqlx::query_as::<_, Venue>(
            "UPDATE venues SET booking_paused = $1, updated_at = $2 WHERE id = $3 RETURNING *",
        )
            .bind(paused)
            .bind(Utc::now())
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_rejections(&self, venue_id: &str) -> Result<Vec<VenueRejection>, AppError> {
        sqlx::query_as::<_, VenueRejection>(
            "SELECT * FROM venue_rejections WHERE venue_id = $1 ORDER BY seq_no ASC",
        )
            .bind(venue_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
