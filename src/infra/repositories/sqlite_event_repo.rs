use crate::domain::{models::event::Event, ports::EventRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteEventRepo {
    pool: SqlitePool,
}

impl SqliteEventRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for SqliteEventRepo {
    async fn create(&self, event: &Event) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            "INSERT INTO events (id, venue_id, name, description, event_date, start_time, price, booked, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
            .bind(&event.id).bind(&event.venue_id).bind(&event.name).bind(&event.description)
            .bind(event.event_date).bind(&event.start_time).bind(event.price)
            .bind(event.booked).bind(event.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_bookable(&self) -> Result<Vec<Event>, AppError> {
        sqlx::query_as::<_, Event>(
            "SELECT e.* FROM events e
             JOIN venues v ON e.venue_id = v.id
             WHERE v.status = 'APPROVED' AND v.booking_paused = 0
             ORDER BY e.event_date ASC, e.start_time ASC",
        )
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_venue(&self, venue_id: &str) -> Result<Vec<Event>, AppError> {
        sqlx::query_as::<_, Event>(
            "SELECT * FROM events WHERE venue_id = ? ORDER BY event_date ASC",
        )
            .bind(venue_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
