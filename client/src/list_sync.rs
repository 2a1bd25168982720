use chrono::{SecondsFormat, Utc};
use shared::{RecordMeta, Resource, Validate};
use tracing::{info, warn};

use crate::api::ResourceService;
use crate::error::{ClientError, ClientResult};
use crate::optimistic::{OptimisticList, UpdateStrategy};

/// Keeps an [`OptimisticList`] in step with the server through a
/// [`ResourceService`].
///
/// Calls take `&mut self`, so one screen's list sees its responses in the
/// order it awaited them.
pub struct ListSync<R> {
    service: ResourceService<R>,
    list: OptimisticList<R>,
}

impl<R: Resource> ListSync<R> {
    pub fn new(service: ResourceService<R>, strategy: UpdateStrategy) -> Self {
        Self {
            service,
            list: OptimisticList::new(strategy),
        }
    }

    pub fn list(&self) -> &OptimisticList<R> {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut OptimisticList<R> {
        &mut self.list
    }

    pub fn service(&self) -> &ResourceService<R> {
        &self.service
    }

    /// Reloads the list from the server. On failure the old list stays.
    pub async fn refresh(&mut self) -> ClientResult<()> {
        match self.service.list().await {
            Ok(records) => {
                info!("Loaded {} {} records", records.len(), R::LABEL);
                self.list.replace_all(records);
                Ok(())
            }
            Err(e) => {
                warn!("Failed to load {} records: {}", R::LABEL, e);
                self.list.set_error(e.to_string());
                Err(e)
            }
        }
    }

    fn placeholder(&self, input: &R::Create) -> R {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
        let user_id = self
            .service
            .client()
            .current_user()
            .map(|user| user.id)
            .unwrap_or_default();
        R::build(
            RecordMeta {
                id: String::new(),
                user_id,
                created_at: now.clone(),
                updated_at: now,
            },
            input,
        )
    }

    /// Shows a placeholder at the front until the server answers.
    pub async fn create(&mut self, input: &R::Create) -> ClientResult<R> {
        if let Err(e) = input.validate() {
            self.list.set_error(e.to_string());
            return Err(e.into());
        }

        let placeholder = self.placeholder(input);
        let temp_id = self.list.begin_create(placeholder);
        match self.service.create(input).await {
            Ok(record) => {
                self.list.confirm_create(&temp_id, record.clone());
                Ok(record)
            }
            Err(e) => {
                warn!("Failed to create {}: {}", R::LABEL, e);
                self.list.fail_create(&temp_id, e.to_string());
                Err(e)
            }
        }
    }

    /// Applies `patch`, either at once or after the server confirms, per the
    /// list's [`UpdateStrategy`].
    pub async fn update(&mut self, id: &str, patch: &R::Update) -> ClientResult<R> {
        if let Err(e) = patch.validate() {
            self.list.set_error(e.to_string());
            return Err(e.into());
        }

        let mut edited = match self.list.get(id) {
            Some(current) => current.clone(),
            None => return self.update_unlisted(id, patch).await,
        };
        if let Err(e) = edited.apply(patch) {
            self.list.set_error(e.to_string());
            return Err(ClientError::Validation(e));
        }

        self.list.begin_update(edited);
        match self.service.update(id, patch).await {
            Ok(record) => {
                self.list.confirm_update(record.clone());
                Ok(record)
            }
            Err(e) => {
                warn!("Failed to update {} {}: {}", R::LABEL, id, e);
                self.list.fail_update(id, e.to_string());
                Err(e)
            }
        }
    }

    async fn update_unlisted(&mut self, id: &str, patch: &R::Update) -> ClientResult<R> {
        let result = self.service.update(id, patch).await;
        if let Err(e) = &result {
            self.list.set_error(e.to_string());
        }
        result
    }

    /// Removes the record at once and restores it if the server refuses.
    pub async fn delete(&mut self, id: &str) -> ClientResult<()> {
        self.list.begin_delete(id);
        match self.service.delete(id).await {
            Ok(_) => {
                self.list.confirm_delete(id);
                Ok(())
            }
            Err(e) => {
                warn!("Failed to delete {} {}: {}", R::LABEL, id, e);
                self.list.fail_delete(id, e.to_string());
                Err(e)
            }
        }
    }

    pub fn ids(&self) -> Vec<String> {
        self.list
            .items()
            .iter()
            .map(|record| record.id().to_string())
            .collect()
    }
}
