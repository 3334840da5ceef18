use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Local shadow of an identity-provider account. The id is the provider's
/// opaque subject identifier and is never generated locally.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct User {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Optional profile fields carried alongside a verified identity.
#[derive(Debug, Clone, Default)]
pub struct ProfileHint {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
}

impl User {
    pub fn from_hint(external_id: &str, hint: &ProfileHint) -> Self {
        Self {
            id: external_id.to_string(),
            name: hint.name.clone(),
            email: hint.email.clone(),
            phone: hint.phone.clone(),
            photo_url: hint.photo_url.clone(),
            created_at: Utc::now(),
        }
    }
}
