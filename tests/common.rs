#![allow(dead_code)]

use nightlife_backend::{
    api::router::create_router,
    background::start_background_worker,
    config::Config,
    domain::models::{booking::Booking, event::Event, user::User, venue::Venue},
    domain::ports::{NotificationService, QrService},
    domain::services::identity::IdentityService,
    error::AppError,
    infra::repositories::{
        sqlite_booking_repo::SqliteBookingRepo,
        sqlite_event_repo::SqliteEventRepo,
        sqlite_job_repo::SqliteJobRepo,
        sqlite_payout_repo::SqlitePayoutRepo,
        sqlite_user_repo::SqliteUserRepo,
        sqlite_venue_repo::SqliteVenueRepo,
    },
    state::AppState,
};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use uuid::Uuid;

pub struct MockQrService;

#[async_trait]
impl QrService for MockQrService {
    async fn generate(&self, booking_id: &str) -> Result<String, AppError> {
        Ok(format!("https://qr.test/{}.png", booking_id))
    }
}

/// Simulates a dead QR renderer; bookings must still go through.
pub struct FailingQrService;

#[async_trait]
impl QrService for FailingQrService {
    async fn generate(&self, _booking_id: &str) -> Result<String, AppError> {
        Err(AppError::InternalWithMsg("QR renderer unreachable".to_string()))
    }
}

pub struct MockNotificationService;

#[async_trait]
impl NotificationService for MockNotificationService {
    async fn send_booking_confirmation(
        &self,
        _user: &User,
        _booking: &Booking,
        _event: &Event,
        _venue: &Venue,
    ) -> Result<(), AppError> {
        Ok(())
    }
}

#[derive(Serialize)]
struct TestClaims {
    iss: String,
    sub: String,
    aud: String,
    exp: usize,
    iat: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    picture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
}

#[derive(Default, Clone)]
pub struct Profile {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    encoding_key: EncodingKey,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::build(Arc::new(MockQrService)).await
    }

    pub async fn with_failing_qr() -> Self {
        Self::build(Arc::new(FailingQrService)).await
    }

    async fn build(qr_service: Arc<dyn QrService>) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let priv_key_pem = include_str!("../tests/keys/test_private.pem");
        let pub_key_pem = include_str!("../tests/keys/test_public.pem");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            qr_service_url: "http://localhost".to_string(),
            qr_service_token: "token".to_string(),
            notify_service_url: "http://localhost".to_string(),
            notify_service_token: "token".to_string(),
            idp_public_key: pub_key_pem.to_string(),
            idp_issuer: "test-issuer".to_string(),
            idp_audience: "test-audience".to_string(),
        };

        let user_repo = Arc::new(SqliteUserRepo::new(pool.clone()));
        let identity_service = Arc::new(IdentityService::new(user_repo.clone()));

        let state = Arc::new(AppState {
            config: config.clone(),
            user_repo,
            venue_repo: Arc::new(SqliteVenueRepo::new(pool.clone())),
            event_repo: Arc::new(SqliteEventRepo::new(pool.clone())),
            booking_repo: Arc::new(SqliteBookingRepo::new(pool.clone())),
            payout_repo: Arc::new(SqlitePayoutRepo::new(pool.clone())),
            job_repo: Arc::new(SqliteJobRepo::new(pool.clone())),
            identity_service,
            qr_service,
            notification_service: Arc::new(MockNotificationService),
        });

        let worker_state = state.clone();
        tokio::spawn(async move {
            start_background_worker(worker_state).await;
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
            encoding_key: EncodingKey::from_ed_pem(priv_key_pem.as_bytes())
                .expect("Invalid test private key"),
        }
    }

    fn mint(&self, sub: &str, role: Option<&str>, profile: &Profile) -> String {
        let now = Utc::now().timestamp() as usize;
        let claims = TestClaims {
            iss: "test-issuer".to_string(),
            sub: sub.to_string(),
            aud: "test-audience".to_string(),
            exp: now + 3600,
            iat: now,
            name: profile.name.clone(),
            email: profile.email.clone(),
            phone: profile.phone.clone(),
            picture: None,
            role: role.map(|r| r.to_string()),
        };
        encode(&Header::new(Algorithm::EdDSA), &claims, &self.encoding_key)
            .expect("Failed to mint test token")
    }

    pub fn user_token(&self, sub: &str) -> String {
        self.mint(sub, None, &Profile::default())
    }

    pub fn user_token_with_profile(&self, sub: &str, profile: &Profile) -> String {
        self.mint(sub, None, profile)
    }

    pub fn admin_token(&self, sub: &str) -> String {
        self.mint(sub, Some("ADMIN"), &Profile::default())
    }

    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.router.clone().oneshot(request).await.unwrap()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}

#[allow(dead_code)]
pub async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[allow(dead_code)]
pub fn venue_payload(name: &str) -> Value {
    serde_json::json!({
        "name": name,
        "description": "Rooftop bar and club",
        "address": "12 MG Road",
        "city": "Bengaluru",
        "pincode": "560001",
        "owner_name": "Asha Rao",
        "gst_number": "29ABCDE1234F1Z5",
        "license_number": "LIC-9921",
        "pan_number": "ABCDE1234F",
        "bank_account_number": "001122334455",
        "bank_ifsc_code": "HDFC0000123",
        "documents": ["https://files.test/kyc/license.pdf"],
        "photos": ["https://files.test/photos/front.jpg"]
    })
}
