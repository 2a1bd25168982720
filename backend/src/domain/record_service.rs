use shared::Validate;
use tracing::{info, warn};

use crate::domain::{new_meta, now_timestamp};
use crate::error::{ServiceError, ServiceResult};
use crate::storage::{DbConnection, Record, RecordRepository};

/// CRUD for one record type, scoped to the calling user.
#[derive(Clone)]
pub struct RecordService<R> {
    repository: RecordRepository<R>,
}

impl<R: Record> RecordService<R> {
    pub fn new(db: DbConnection) -> Self {
        Self {
            repository: RecordRepository::new(db),
        }
    }

    pub fn repository(&self) -> &RecordRepository<R> {
        &self.repository
    }

    pub async fn list(&self, user_id: &str) -> ServiceResult<Vec<R>> {
        let records = self.repository.list(user_id).await?;
        info!("Found {} {} records for user {}", records.len(), R::TABLE, user_id);
        Ok(records)
    }

    pub async fn get(&self, user_id: &str, id: &str) -> ServiceResult<R> {
        match self.repository.get(user_id, id).await? {
            Some(record) => Ok(record),
            None => {
                warn!("{} not found: {} (user {})", R::LABEL, id, user_id);
                Err(ServiceError::NotFound(R::LABEL))
            }
        }
    }

    pub async fn create(&self, user_id: &str, input: &R::Create) -> ServiceResult<R> {
        input.validate()?;
        let record = R::build(new_meta(user_id), input);
        self.insert(record).await
    }

    /// Stores an already built record.
    pub async fn insert(&self, record: R) -> ServiceResult<R> {
        self.repository.insert(&record).await?;
        info!("Created {} {} for user {}", R::LABEL, record.id(), record.user_id());
        Ok(record)
    }

    /// Applies a partial patch and stores the result.
    pub async fn update(&self, user_id: &str, id: &str, patch: &R::Update) -> ServiceResult<R> {
        patch.validate()?;
        let mut record = self.get(user_id, id).await?;
        record.apply(patch)?;
        record.touch(now_timestamp());

        if !self.repository.update(&record).await? {
            // Deleted between the read and the write.
            return Err(ServiceError::NotFound(R::LABEL));
        }
        info!("Updated {} {} for user {}", R::LABEL, id, user_id);
        Ok(record)
    }

    pub async fn delete(&self, user_id: &str, id: &str) -> ServiceResult<()> {
        if !self.repository.delete(user_id, id).await? {
            warn!("{} not found for delete: {} (user {})", R::LABEL, id, user_id);
            return Err(ServiceError::NotFound(R::LABEL));
        }
        info!("Deleted {} {} for user {}", R::LABEL, id, user_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_support::seed_user;
    use shared::{
        CreateDiaperLog, CreateSleepLog, DiaperLog, DiaperType, SleepLog, UpdateDiaperLog,
        UpdateSleepLog, ValidationError,
    };

    async fn setup<R: Record>() -> RecordService<R> {
        let db = DbConnection::in_memory().await.expect("Failed to create test database");
        seed_user(&db, "user-1").await;
        seed_user(&db, "user-2").await;
        RecordService::new(db)
    }

    fn diaper(changed_at: &str) -> CreateDiaperLog {
        CreateDiaperLog {
            diaper_type: DiaperType::Wet,
            changed_at: changed_at.to_string(),
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_owner() {
        let service = setup::<DiaperLog>().await;
        let created = service.create("user-1", &diaper("2025-05-01T06:00:00Z")).await.unwrap();

        assert!(!created.id.is_empty());
        assert_eq!(created.user_id, "user-1");
        assert!(created.created_at.ends_with('Z'));
        assert_eq!(service.get("user-1", &created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_input() {
        let service = setup::<DiaperLog>().await;
        let err = service.create("user-1", &diaper("yesterday")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert!(service.list("user-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_is_partial() {
        let service = setup::<DiaperLog>().await;
        let created = service.create("user-1", &diaper("2025-05-01T06:00:00Z")).await.unwrap();

        let updated = service
            .update(
                "user-1",
                &created.id,
                &UpdateDiaperLog {
                    diaper_type: Some(DiaperType::Dirty),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.diaper_type, DiaperType::Dirty);
        assert_eq!(updated.changed_at, created.changed_at);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_update_rejects_patch_that_breaks_record() {
        let service = setup::<SleepLog>().await;
        let created = service
            .create(
                "user-1",
                &CreateSleepLog {
                    started_at: "2025-05-01T20:00:00Z".to_string(),
                    ended_at: Some("2025-05-01T23:00:00Z".to_string()),
                    quality: None,
                    notes: None,
                },
            )
            .await
            .unwrap();

        let err = service
            .update(
                "user-1",
                &created.id,
                &UpdateSleepLog {
                    ended_at: Some("2025-05-01T19:00:00Z".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ValidationError::Invalid { .. })));
        assert_eq!(service.get("user-1", &created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_other_users_records_are_not_found() {
        let service = setup::<DiaperLog>().await;
        let created = service.create("user-1", &diaper("2025-05-01T06:00:00Z")).await.unwrap();

        assert!(matches!(
            service.get("user-2", &created.id).await,
            Err(ServiceError::NotFound("Diaper log"))
        ));
        assert!(matches!(
            service
                .update("user-2", &created.id, &UpdateDiaperLog::default())
                .await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            service.delete("user-2", &created.id).await,
            Err(ServiceError::NotFound(_))
        ));
        assert_eq!(service.list("user-1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_twice_reports_not_found() {
        let service = setup::<DiaperLog>().await;
        let created = service.create("user-1", &diaper("2025-05-01T06:00:00Z")).await.unwrap();

        service.delete("user-1", &created.id).await.unwrap();
        assert!(matches!(
            service.delete("user-1", &created.id).await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
