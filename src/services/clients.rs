//! Client profiles and directory

use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::profile::{AccessClaims, Profile, UpdateProfile},
    repository::Repository,
};

#[derive(Clone)]
pub struct ClientsService {
    repository: Repository,
}

impl ClientsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Profile of the token holder; it must have gone through onboarding
    pub async fn current(&self, claims: &AccessClaims) -> AppResult<Profile> {
        self.repository.profiles.find(claims.sub).await?.ok_or_else(|| {
            AppError::ProfileIncomplete("No profile yet, complete onboarding first".to_string())
        })
    }

    /// Profile of the token holder, which must be an admin
    pub async fn require_admin(&self, claims: &AccessClaims) -> AppResult<Profile> {
        let profile = self
            .repository
            .profiles
            .find(claims.sub)
            .await?
            .ok_or_else(|| AppError::Authorization("Admin access required".to_string()))?;
        profile.require_admin()?;
        Ok(profile)
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Profile> {
        self.repository.profiles.get(id).await
    }

    /// Onboarding: create or update the caller's own profile
    pub async fn update_own_profile(
        &self,
        claims: &AccessClaims,
        data: &UpdateProfile,
    ) -> AppResult<Profile> {
        data.validate()?;
        let profile = self
            .repository
            .profiles
            .upsert(claims.sub, data, claims.email.as_deref())
            .await?;
        tracing::info!("Profile {} updated", profile.id);
        Ok(profile)
    }

    pub async fn search(&self, text: Option<&str>) -> AppResult<Vec<Profile>> {
        self.repository.profiles.search_clients(text).await
    }
}
