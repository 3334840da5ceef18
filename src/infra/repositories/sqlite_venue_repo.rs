use crate::domain::{
    models::venue::{Venue, VenueRejection},
    ports::VenueRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

pub struct SqliteVenueRepo {
    pool: SqlitePool,
}

impl SqliteVenueRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VenueRepository for SqliteVenueRepo {
    async fn create(&self, venue: &Venue) -> Result<Venue, AppError> {
        sqlx::query_as::<_, Venue>(
            "INSERT INTO venues (id, owner_id, name, description, address, city, pincode, owner_name, gst_number, license_number, pan_number, bank_account_number, bank_ifsc_code, status, booking_paused, rejected_at, rejection_count, rejection_reason, documents, photos, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
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
        sqlx::query_as::<_, Venue>("SELECT * FROM venues WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_owner(&self, owner_id: &str) -> Result<Option<Venue>, AppError> {
        sqlx::query_as::<_, Venue>("SELECT * FROM venues WHERE owner_id = ?")
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_status(&self, status: &str) -> Result<Vec<Venue>, AppError> {
        sqlx::query_as::<_, Venue>("SELECT * FROM venues WHERE status = ? ORDER BY created_at ASC")
            .bind(status)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn reregister(&self, venue: &Venue) -> Result<Venue, AppError> {
        sqlx::query_as::<_, Venue>(
            "UPDATE venues SET name = ?, description = ?, address = ?, city = ?, pincode = ?, owner_name = ?, gst_number = ?, license_number = ?, pan_number = ?, bank_account_number = ?, bank_ifsc_code = ?, documents = ?, photos = ?, status = 'PENDING', rejection_reason = NULL, updated_at = ?
             WHERE id = ? AND status = 'REJECTED'
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
            "UPDATE venues SET status = 'APPROVED', updated_at = ? WHERE id = ? AND status = 'PENDING' RETURNING *",
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
            "UPDATE venues SET status = 'REJECTED', rejected_at = ?, rejection_count = rejection_count + 1, rejection_reason = ?, updated_at = ?
             WHERE id = ? AND status = 'PENDING'
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
            "INSERT INTO venue_rejections (id, venue_id, seq_no, reason, rejected_by, rejected_at, venue_snapshot) VALUES (?, ?, ?, ?, ?, ?, ?)",
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
            "UPDATE venues SET booking_paused = ?, updated_at = ? WHERE id = ? RETURNING *",
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
            "SELECT * FROM venue_rejections WHERE venue_id = ? ORDER BY seq_no ASC",
        )
            .bind(venue_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
