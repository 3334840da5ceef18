use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::domain::services::identity::IdentityService;
use crate::infra::notify::http_notification_service::HttpNotificationService;
use crate::infra::qr::http_qr_service::HttpQrService;
use crate::infra::repositories::{
    postgres_booking_repo::PostgresBookingRepo, postgres_event_repo::PostgresEventRepo,
    postgres_job_repo::PostgresJobRepo, postgres_payout_repo::PostgresPayoutRepo,
    postgres_user_repo::PostgresUserRepo, postgres_venue_repo::PostgresVenueRepo,
    sqlite_booking_repo::SqliteBookingRepo, sqlite_event_repo::SqliteEventRepo,
    sqlite_job_repo::SqliteJobRepo, sqlite_payout_repo::SqlitePayoutRepo,
    sqlite_user_repo::SqliteUserRepo, sqlite_venue_repo::SqliteVenueRepo,
};
use crate::state::AppState;

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;

    let qr_service = Arc::new(HttpQrService::new(
        config.qr_service_url.clone(),
        config.qr_service_token.clone(),
    ));
    let notification_service = Arc::new(HttpNotificationService::new(
        config.notify_service_url.clone(),
        config.notify_service_token.clone(),
    ));

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        let user_repo = Arc::new(PostgresUserRepo::new(pool.clone()));
        let identity_service = Arc::new(IdentityService::new(user_repo.clone()));

        AppState {
            config: config.clone(),
            user_repo,
            venue_repo: Arc::new(PostgresVenueRepo::new(pool.clone())),
            event_repo: Arc::new(PostgresEventRepo::new(pool.clone())),
            booking_repo: Arc::new(PostgresBookingRepo::new(pool.clone())),
            payout_repo: Arc::new(PostgresPayoutRepo::new(pool.clone())),
            job_repo: Arc::new(PostgresJobRepo::new(pool.clone())),
            identity_service,
            qr_service,
            notification_service,
        }
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        let user_repo = Arc::new(SqliteUserRepo::new(pool.clone()));
        let identity_service = Arc::new(IdentityService::new(user_repo.clone()));

        AppState {
            config: config.clone(),
            user_repo,
            venue_repo: Arc::new(SqliteVenueRepo::new(pool.clone())),
            event_repo: Arc::new(SqliteEventRepo::new(pool.clone())),
            booking_repo: Arc::new(SqliteBookingRepo::new(pool.clone())),
            payout_repo: Arc::new(SqlitePayoutRepo::new(pool.clone())),
            job_repo: Arc::new(SqliteJobRepo::new(pool.clone())),
            identity_service,
            qr_service,
            notification_service,
        }
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
