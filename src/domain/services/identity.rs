use std::sync::Arc;
use crate::domain::models::user::{ProfileHint, User};
use crate::domain::ports::UserRepository;
use crate::error::AppError;
use tracing::{info, warn};

/// Bridges the external identity provider to local user rows. Every core
/// write that references a user goes through ensure_user first, so the
/// foreign key is guaranteed to resolve.
pub struct IdentityService {
    users: Arc<dyn UserRepository>,
}

impl IdentityService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Idempotent upsert keyed on the provider's opaque id.
    ///
    /// Concurrent callers may both observe "no such user" and race the
    /// insert; the unique primary key arbitrates and the loser converges
    /// by re-fetching. A collision on a secondary unique field (email or
    /// phone already claimed by another account) degrades by dropping the
    /// colliding field from the insert, with a warning for later audit.
    pub async fn ensure_user(&self, external_id: &str, hint: &ProfileHint) -> Result<User, AppError> {
        if let Some(existing) = self.users.find_by_id(external_id).await? {
            return self.refresh_profile(existing, hint).await;
        }

        let mut candidate = User::from_hint(external_id, hint);

        for _ in 0..3 {
            match self.users.create(&candidate).await {
                Ok(created) => {
                    info!("Provisioned user {}", created.id);
                    return Ok(created);
                }
                Err(e) => {
                    let Some(violation) = e.unique_violation_message() else {
                        return Err(e);
                    };
                    if violation.contains("users.id") || violation.contains("users_pkey") {
                        // Concurrent creator won; their row is ours.
                        break;
                    }
                    if violation.contains("email") && candidate.email.is_some() {
                        warn!(
                            user_id = %external_id,
                            "ensure_user: email already claimed by another account, dropping field"
                        );
                        candidate.email = None;
                        continue;
                    }
                    if violation.contains("phone") && candidate.phone.is_some() {
                        warn!(
                            user_id = %external_id,
                            "ensure_user: phone already claimed by another account, dropping field"
                        );
                        candidate.phone = None;
                        continue;
                    }
                    break;
                }
            }
        }

        match self.users.find_by_id(external_id).await? {
            Some(user) => Ok(user),
            None => Err(AppError::AccountSyncFailure(format!(
                "user {} could not be provisioned",
                external_id
            ))),
        }
    }

    /// Fills profile fields the row is missing. Failures here are not
    /// fatal; the verified identity is what matters.
    async fn refresh_profile(&self, mut user: User, hint: &ProfileHint) -> Result<User, AppError> {
        let mut dirty = false;
        if user.name.is_none() && hint.name.is_some() {
            user.name = hint.name.clone();
            dirty = true;
        }
        if user.email.is_none() && hint.email.is_some() {
            user.email = hint.email.clone();
            dirty = true;
        }
        if user.phone.is_none() && hint.phone.is_some() {
            user.phone = hint.phone.clone();
            dirty = true;
        }
        if user.photo_url.is_none() && hint.photo_url.is_some() {
            user.photo_url = hint.photo_url.clone();
            dirty = true;
        }
        if !dirty {
            return Ok(user);
        }
        match self.users.update_profile(&user).await {
            Ok(updated) => Ok(updated),
            Err(e) => {
                warn!("ensure_user: profile refresh for {} failed: {}", user.id, e);
                Ok(user)
            }
        }
    }
}
