//! Editing and selection state for a media asset browser.
//!
//! All mutation happens on the caller's UI thread. The only asynchronous step
//! is persisting an edit through an [`AssetStore`].

use async_trait::async_trait;
use shared::{
    domain::{Asset, AssetId},
    error::StoreError,
    protocol::AssetPatch,
};

pub mod coordinator;
pub mod drag;
pub mod edit_session;
pub mod editor;
pub mod error;
pub mod events;
pub mod selection;
pub mod tags;

pub use coordinator::{AssetListCoordinator, Propagation};
pub use drag::{DragController, DragSession};
pub use edit_session::{CommitDiff, EditField, EditSession, EditableFields};
pub use editor::{AssetEditor, PendingSubmit, SessionToken, SubmitOutcome, SubmitStart};
pub use error::EditorError;
pub use events::{host_channel, HostEvent, SaveError, SaveErrorCategory};
pub use selection::{ClickModifiers, ClickPolicy, SelectionModel, ToggleClickPolicy};

/// Persists partial updates to assets. A patch is applied atomically: either
/// every field in it is visible afterwards or none is.
#[async_trait]
pub trait AssetStore: Send + Sync {
    async fn patch(&self, id: &AssetId, patch: &AssetPatch) -> Result<Asset, StoreError>;
}

#[cfg(test)]
#[path = "tests/edit_session_tests.rs"]
mod edit_session_tests;

#[cfg(test)]
#[path = "tests/editor_tests.rs"]
mod editor_tests;

#[cfg(test)]
#[path = "tests/selection_tests.rs"]
mod selection_tests;

#[cfg(test)]
#[path = "tests/coordinator_tests.rs"]
mod coordinator_tests;

#[cfg(test)]
#[path = "tests/support.rs"]
mod support;
