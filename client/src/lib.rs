//! Client side of BloomBuhay: typed REST calls and optimistic list state.
//!
//! - **api**: [`ApiClient`] session plus a [`ResourceService`] per record type
//! - **optimistic**: [`OptimisticList`], the local list with rollback
//! - **list_sync**: [`ListSync`], which drives the two together
//! - **confirm**: [`ConfirmDialog`] for destructive actions

pub mod api;
pub mod confirm;
pub mod error;
pub mod list_sync;
pub mod optimistic;

pub use api::{ApiClient, ClientConfig, ResourceService};
pub use confirm::{ConfirmDialog, ConfirmState};
pub use error::{to_envelope, ClientError, ClientResult};
pub use list_sync::ListSync;
pub use optimistic::{ListState, OptimisticList, UpdateStrategy};
