use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub qr_service_url: String,
    pub qr_service_token: String,
    pub notify_service_url: String,
    pub notify_service_token: String,
    pub idp_public_key: String, // Identity provider verification key (Ed25519 PEM)
    pub idp_issuer: String,
    pub idp_audience: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            qr_service_url: env::var("QR_SERVICE_URL").unwrap_or_else(|_| "http://localhost:8100/api/v1/render".to_string()),
            qr_service_token: env::var("QR_SERVICE_TOKEN").unwrap_or_else(|_| "test-token-1".to_string()),
            notify_service_url: env::var("NOTIFY_SERVICE_URL").unwrap_or_else(|_| "http://localhost:8200/api/v1/dispatch".to_string()),
            notify_service_token: env::var("NOTIFY_SERVICE_TOKEN").unwrap_or_else(|_| "test-token-1".to_string()),
            idp_public_key: env::var("IDP_PUBLIC_KEY").expect("IDP_PUBLIC_KEY must be set (Ed25519 Public Key)"),
            idp_issuer: env::var("IDP_ISSUER").unwrap_or_else(|_| "https://id.nightlife.local".to_string()),
            idp_audience: env::var("IDP_AUDIENCE").unwrap_or_else(|_| "nightlife-app".to_string()),
        }
    }
}
