use crate::domain::{models::event::Event, ports::EventRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresEventRepo {
    pool: PgPool,
}

impl PostgresEventRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for PostgresEventRepo {
    async fn create(&self, event: &Event) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            "INSERT INTO events (id, venue_id, name, description, event_date, start_time, price, booked, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
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
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_bookable(&self) -> Result<Vec<Event>, AppError> {
        sqlx::query_as::<_, Event>(
            "SELECT e.* FROM events e
             JOIN venues v ON e.venue_id = v.id
             WHERE v.status = 'APPROVED' AND v.booking_paused = FALSE
             ORDER BY e.event_date ASC, e.start_time ASC",
        )
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_venue(&self, venue_id: &str) -> Result<Vec<Event>, AppError> {
        sqlx::query_as::<_, Event>(
            "SELECT * FROM events WHERE venue_id = $1 ORDER BY event_date ASC",
        )
            .bind(venue_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
