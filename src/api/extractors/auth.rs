use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use crate::domain::models::user::ProfileHint;
use crate::error::AppError;
use crate::state::AppState;
use serde::Deserialize;
use std::sync::Arc;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use tracing::Span;

/// Claims minted by the external identity provider. `sub` is the opaque
/// user identifier the whole core keys on; the profile claims are hints,
/// not authoritative data.
#[derive(Debug, Deserialize)]
pub struct IdpClaims {
    pub iss: String,
    pub sub: String,
    pub aud: String,
    pub exp: usize,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// A verified caller. The id comes straight from the provider's token and
/// is never re-derived locally.
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: String,
    pub admin: bool,
    pub profile: ProfileHint,
}

pub struct AuthUser(pub Identity);

/// Admin-gated variant for operator endpoints.
pub struct AdminUser(pub Identity);

fn verify_token(parts: &Parts, state: &AppState) -> Result<Identity, AppError> {
    let token = parts
        .headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or(AppError::Unauthorized)?;

    let decoding_key = DecodingKey::from_ed_pem(state.config.idp_public_key.as_bytes())
        .map_err(|_| AppError::InternalWithMsg("Invalid identity provider key".into()))?;

    let mut validation = Validation::new(Algorithm::EdDSA);
    validation.set_audience(&[state.config.idp_audience.clone()]);
    validation.set_issuer(&[state.config.idp_issuer.clone()]);

    let token_data = decode::<IdpClaims>(token, &decoding_key, &validation)
        .map_err(|_| AppError::Unauthorized)?;

    let claims = token_data.claims;
    let identity = Identity {
        id: claims.sub,
        admin: claims.role.as_deref() == Some("ADMIN"),
        profile: ProfileHint {
            name: claims.name,
            email: claims.email,
            phone: claims.phone,
            photo_url: claims.picture,
        },
    };

    Span::current().record("user_id", identity.id.as_str());

    Ok(identity)
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);
        let identity = verify_token(parts, &app_state)?;
        Ok(AuthUser(identity))
    }
}

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);
        let identity = verify_token(parts, &app_state)?;
        if !identity.admin {
            return Err(AppError::Forbidden("Administrator role required".into()));
        }
        Ok(AdminUser(identity))
    }
}
