//! # Optimistic List
//!
//! Local copy of a server list that applies creates, deletes and (optionally)
//! updates before the server confirms them, and undoes them when it refuses.
//!
//! Every change is split into a `begin_*` step, applied at once, and a
//! `confirm_*` / `fail_*` step applied when the response arrives. Responses
//! are applied in arrival order; the last one wins.

use std::collections::HashMap;

use shared::Identified;
use tracing::debug;

/// Prefix of ids given to records the server has not stored yet.
pub const TEMP_ID_PREFIX: &str = "temp-";

pub fn temp_id() -> String {
    format!("{}{}", TEMP_ID_PREFIX, uuid::Uuid::new_v4())
}

pub fn is_temp_id(id: &str) -> bool {
    id.starts_with(TEMP_ID_PREFIX)
}

/// How edits reach the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateStrategy {
    /// Replace the item at once and roll back if the server refuses.
    #[default]
    Optimistic,
    /// Leave the item alone until the server answers.
    Pessimistic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListState {
    Idle,
    Submitting,
    Editing(String),
}

#[derive(Debug, Clone)]
pub struct OptimisticList<T> {
    items: Vec<T>,
    state: ListState,
    strategy: UpdateStrategy,
    error: Option<String>,
    /// Removed items by id, with the index they were removed from.
    deleted: HashMap<String, (usize, T)>,
    /// Items as they were before an optimistic update.
    replaced: HashMap<String, T>,
}

impl<T> Default for OptimisticList<T> {
    fn default() -> Self {
        Self::new(UpdateStrategy::default())
    }
}

impl<T> OptimisticList<T> {
    pub fn new(strategy: UpdateStrategy) -> Self {
        Self {
            items: Vec::new(),
            state: ListState::Idle,
            strategy,
            error: None,
            deleted: HashMap::new(),
            replaced: HashMap::new(),
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn strategy(&self) -> UpdateStrategy {
        self.strategy
    }

    /// Last failure, kept for inline display until cleared.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn set_error(&mut self, error: impl Into<String>) {
        self.error = Some(error.into());
    }
}

impl<T: Identified + Clone> OptimisticList<T> {
    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    /// Replaces the whole list with the server's.
    pub fn replace_all(&mut self, items: Vec<T>) {
        self.items = items;
        self.deleted.clear();
        self.replaced.clear();
    }

    /// Puts `placeholder` at the front under a fresh temporary id and returns it.
    pub fn begin_create(&mut self, mut placeholder: T) -> String {
        let id = temp_id();
        placeholder.set_id(id.clone());
        self.items.insert(0, placeholder);
        self.state = ListState::Submitting;
        self.error = None;
        id
    }

    /// Swaps the placeholder for the stored record, in place.
    pub fn confirm_create(&mut self, temp_id: &str, record: T) {
        match self.position(temp_id) {
            Some(index) => self.items[index] = record,
            None => {
                debug!("Placeholder {} no longer listed; adding record at the front", temp_id);
                self.items.insert(0, record);
            }
        }
        self.state = ListState::Idle;
    }

    pub fn fail_create(&mut self, temp_id: &str, error: impl Into<String>) {
        self.items.retain(|item| item.id() != temp_id);
        self.state = ListState::Idle;
        self.error = Some(error.into());
    }

    /// Removes the item at once. Returns false when it was not listed.
    pub fn begin_delete(&mut self, id: &str) -> bool {
        match self.position(id) {
            Some(index) => {
                let item = self.items.remove(index);
                self.deleted.insert(id.to_string(), (index, item));
                self.error = None;
                true
            }
            None => false,
        }
    }

    pub fn confirm_delete(&mut self, id: &str) {
        self.deleted.remove(id);
    }

    /// Puts the item back where it was.
    pub fn fail_delete(&mut self, id: &str, error: impl Into<String>) {
        if let Some((index, item)) = self.deleted.remove(id) {
            let index = index.min(self.items.len());
            self.items.insert(index, item);
        }
        self.error = Some(error.into());
    }

    pub fn begin_edit(&mut self, id: &str) {
        self.state = ListState::Editing(id.to_string());
        self.error = None;
    }

    pub fn cancel_edit(&mut self) {
        self.state = ListState::Idle;
    }

    /// Starts an update. The optimistic strategy shows `updated` right away.
    pub fn begin_update(&mut self, updated: T) {
        let id = updated.id().to_string();
        if self.strategy == UpdateStrategy::Optimistic {
            if let Some(index) = self.position(&id) {
                let previous = std::mem::replace(&mut self.items[index], updated);
                self.replaced.entry(id).or_insert(previous);
            }
        }
        self.state = ListState::Submitting;
        self.error = None;
    }

    pub fn confirm_update(&mut self, record: T) {
        let id = record.id().to_string();
        self.replaced.remove(&id);
        if let Some(index) = self.position(&id) {
            self.items[index] = record;
        }
        self.state = ListState::Idle;
    }

    /// Restores the pre-update item. The edit stays open for another try.
    pub fn fail_update(&mut self, id: &str, error: impl Into<String>) {
        if let Some(previous) = self.replaced.remove(id) {
            if let Some(index) = self.position(id) {
                self.items[index] = previous;
            }
        }
        self.state = ListState::Editing(id.to_string());
        self.error = Some(error.into());
    }
}
