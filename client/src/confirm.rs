//! Confirmation step before destructive actions such as deletes.
//!
//! `Idle -> Pending(action) -> Confirmed(action) | Cancelled`. Only a
//! confirmed action is handed back to run.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmState<A> {
    Idle,
    Pending(A),
    Confirmed(A),
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct ConfirmDialog<A> {
    state: ConfirmState<A>,
    prompt: Option<String>,
}

impl<A> Default for ConfirmDialog<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> ConfirmDialog<A> {
    pub fn new() -> Self {
        Self {
            state: ConfirmState::Idle,
            prompt: None,
        }
    }

    pub fn state(&self) -> &ConfirmState<A> {
        &self.state
    }

    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, ConfirmState::Pending(_))
    }

    /// Asks for confirmation, replacing any question still open.
    pub fn request(&mut self, action: A, prompt: impl Into<String>) {
        self.state = ConfirmState::Pending(action);
        self.prompt = Some(prompt.into());
    }

    pub fn cancel(&mut self) {
        if self.is_open() {
            self.state = ConfirmState::Cancelled;
            self.prompt = None;
        }
    }

    pub fn reset(&mut self) {
        self.state = ConfirmState::Idle;
        self.prompt = None;
    }
}

impl<A: Clone> ConfirmDialog<A> {
    /// Returns the action to run, or `None` if nothing was pending.
    pub fn confirm(&mut self) -> Option<A> {
        match std::mem::replace(&mut self.state, ConfirmState::Idle) {
            ConfirmState::Pending(action) => {
                self.state = ConfirmState::Confirmed(action.clone());
                self.prompt = None;
                Some(action)
            }
            other => {
                self.state = other;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirm_hands_back_the_action() {
        let mut dialog = ConfirmDialog::new();
        dialog.request("note-1".to_string(), "Delete this note?");
        assert!(dialog.is_open());
        assert_eq!(dialog.prompt(), Some("Delete this note?"));

        assert_eq!(dialog.confirm(), Some("note-1".to_string()));
        assert_eq!(dialog.state(), &ConfirmState::Confirmed("note-1".to_string()));
        assert_eq!(dialog.confirm(), None);
    }

    #[test]
    fn test_cancel_discards_the_action() {
        let mut dialog = ConfirmDialog::new();
        dialog.request(7, "Delete?");
        dialog.cancel();
        assert_eq!(dialog.state(), &ConfirmState::Cancelled);
        assert_eq!(dialog.confirm(), None);
        assert_eq!(dialog.prompt(), None);
    }

    #[test]
    fn test_confirm_without_request_is_a_no_op() {
        let mut dialog: ConfirmDialog<u32> = ConfirmDialog::default();
        assert_eq!(dialog.confirm(), None);
        dialog.cancel();
        assert_eq!(dialog.state(), &ConfirmState::Idle);
    }
}
