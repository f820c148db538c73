//! Outbound events for the hosting UI and save-failure modeling.

use crossbeam_channel::{unbounded, Receiver, Sender, TrySendError};
use shared::{
    domain::{Asset, AssetId},
    error::{ErrorCode, StoreError},
};

#[derive(Debug, Clone)]
pub enum HostEvent {
    /// A row was double-clicked; the modal host should open an editor.
    OpenEditor(Asset),
    /// The externally observed "is dragging" flag flipped.
    DraggingChanged(bool),
    SelectionChanged {
        count: usize,
    },
    /// The patch was persisted and the edit session is gone.
    SaveComplete(Asset),
    /// The edit session was closed without saving.
    EditorClosed {
        asset_id: AssetId,
    },
    SaveFailed {
        asset_id: AssetId,
        error: SaveError,
    },
}

impl HostEvent {
    fn name(&self) -> &'static str {
        match self {
            Self::OpenEditor(_) => "open_editor",
            Self::DraggingChanged(_) => "dragging_changed",
            Self::SelectionChanged { .. } => "selection_changed",
            Self::SaveComplete(_) => "save_complete",
            Self::EditorClosed { .. } => "editor_closed",
            Self::SaveFailed { .. } => "save_failed",
        }
    }
}

/// Queue for core->host events. It is unbounded so that state transitions
/// (a dragging flip pair, `SaveComplete`, `EditorClosed`) are never lost
/// while the host is busy. Hosts that bring a bounded sender must also read
/// the return values of `DragController::end`, `AssetEditor::submit` and
/// friends, which report the same transitions.
pub fn host_channel() -> (Sender<HostEvent>, Receiver<HostEvent>) {
    unbounded()
}

/// Pushes an event to the host without blocking the UI thread. On a full or
/// disconnected queue the event is dropped and logged.
pub fn emit(events: &Sender<HostEvent>, event: HostEvent) {
    let name = event.name();
    match events.try_send(event) {
        Ok(()) => tracing::debug!(event = name, "queued core->host event"),
        Err(TrySendError::Full(_)) => {
            tracing::warn!(event = name, "host event queue is full; dropping event");
        }
        Err(TrySendError::Disconnected(_)) => {
            tracing::debug!(event = name, "host event queue disconnected; dropping event");
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveErrorCategory {
    NotFound,
    Validation,
    Transport,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveError {
    category: SaveErrorCategory,
    message: String,
}

impl SaveError {
    pub fn from_store_error(err: &StoreError) -> Self {
        let category = match err.code {
            ErrorCode::NotFound => SaveErrorCategory::NotFound,
            ErrorCode::Validation => SaveErrorCategory::Validation,
            ErrorCode::Unavailable => SaveErrorCategory::Transport,
            ErrorCode::Internal => SaveErrorCategory::Unknown,
        };
        Self {
            category,
            message: err.message.clone(),
        }
    }

    /// Whether resubmitting the same draft can reasonably succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category,
            SaveErrorCategory::Transport | SaveErrorCategory::Unknown
        )
    }

    pub fn category(&self) -> SaveErrorCategory {
        self.category
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
