use crossbeam_channel::Sender;
use shared::domain::{Asset, AssetId};
use tracing::{debug, warn};

use crate::{
    events::{emit, HostEvent},
    selection::SelectionModel,
};

/// Transient state of one drag gesture. The payload is fixed when the
/// gesture starts; later clicks or list refreshes do not change it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    source: Asset,
    assets: Vec<Asset>,
    carries_selection: bool,
}

impl DragSession {
    pub fn source(&self) -> &Asset {
        &self.source
    }

    /// Implicated assets in list order. Never empty.
    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn ids(&self) -> impl Iterator<Item = &AssetId> {
        self.assets.iter().map(|asset| &asset.id)
    }

    pub fn count(&self) -> usize {
        self.assets.len()
    }

    /// True when the whole selection is being dragged rather than the
    /// single source row.
    pub fn carries_selection(&self) -> bool {
        self.carries_selection
    }
}

pub struct DragController {
    events: Sender<HostEvent>,
    active: Option<DragSession>,
}

impl DragController {
    pub fn new(events: Sender<HostEvent>) -> Self {
        Self {
            events,
            active: None,
        }
    }

    /// Starts a gesture from `asset`. Starting on a selected row drags the
    /// whole selection, ordered as in `list`. Returns `None` if a gesture is
    /// already active.
    pub fn begin(
        &mut self,
        asset: &Asset,
        selection: &SelectionModel,
        list: &[Asset],
    ) -> Option<&DragSession> {
        if let Some(active) = &self.active {
            warn!(
                active_source = %active.source.id,
                requested_source = %asset.id,
                "ignoring nested drag start"
            );
            return None;
        }

        let selected: Vec<Asset> = if selection.contains(&asset.id) {
            selection.ordered(list).into_iter().cloned().collect()
        } else {
            Vec::new()
        };
        let carries_selection = selected.iter().any(|candidate| candidate.id == asset.id);
        let assets = if carries_selection {
            selected
        } else {
            vec![asset.clone()]
        };
        debug!(asset_id = %asset.id, count = assets.len(), "drag started");

        self.active = Some(DragSession {
            source: asset.clone(),
            assets,
            carries_selection,
        });
        emit(&self.events, HostEvent::DraggingChanged(true));
        self.active.as_ref()
    }

    /// Clears drag state and returns whether the dragging flag flipped back
    /// to false. Calling it without an active gesture does nothing.
    pub fn end(&mut self) -> bool {
        let Some(ended) = self.active.take() else {
            return false;
        };
        debug!(asset_id = %ended.source.id, "drag ended");
        emit(&self.events, HostEvent::DraggingChanged(false));
        true
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.active.as_ref()
    }
}
