use chrono::{NaiveDate, Utc};
use shared::pregnancy::{summarize, ProfileSummary};
use shared::{CreateMotherProfile, MotherProfile, UpdateMotherProfile, Validate};
use tracing::{info, warn};

use crate::domain::{new_meta, now_timestamp};
use crate::error::{ServiceError, ServiceResult};
use crate::storage::{is_unique_violation, DbConnection, ProfileRepository};

const PROFILE_LABEL: &str = "Mother profile";

/// The single mother profile each user owns.
#[derive(Clone)]
pub struct ProfileService {
    repository: ProfileRepository,
}

impl ProfileService {
    pub fn new(db: DbConnection) -> Self {
        Self {
            repository: ProfileRepository::new(db),
        }
    }

    /// A second profile for the same user is rejected by the storage
    /// constraint and surfaces as a conflict.
    pub async fn create_profile(
        &self,
        user_id: &str,
        input: &CreateMotherProfile,
    ) -> ServiceResult<MotherProfile> {
        input.validate()?;
        let profile = MotherProfile::build(new_meta(user_id), input);

        if let Err(e) = self.repository.store_profile(&profile).await {
            if is_unique_violation(&e) {
                warn!("User {} already has a mother profile", user_id);
                return Err(ServiceError::Conflict(
                    "Mother profile already exists".to_string(),
                ));
            }
            return Err(e.into());
        }

        info!("Created {} profile {} for user {}", profile.stage, profile.id, user_id);
        Ok(profile)
    }

    pub async fn get_profile(&self, user_id: &str) -> ServiceResult<MotherProfile> {
        self.repository
            .get_by_user(user_id)
            .await?
            .ok_or(ServiceError::NotFound(PROFILE_LABEL))
    }

    pub async fn update_profile(
        &self,
        user_id: &str,
        patch: &UpdateMotherProfile,
    ) -> ServiceResult<MotherProfile> {
        patch.validate()?;
        let mut profile = self.get_profile(user_id).await?;
        profile.apply(patch);
        profile.updated_at = now_timestamp();
        self.repository.update_profile(&profile).await?;

        info!("Updated mother profile for user {} (stage {})", user_id, profile.stage);
        Ok(profile)
    }

    pub async fn summary(&self, user_id: &str) -> ServiceResult<ProfileSummary> {
        self.summary_on(user_id, Utc::now().date_naive()).await
    }

    pub async fn summary_on(&self, user_id: &str, today: NaiveDate) -> ServiceResult<ProfileSummary> {
        let profile = self.get_profile(user_id).await?;
        Ok(summarize(&profile, today))
    }
}
