//! Row-level interaction dispatch over an asset list snapshot.

use std::sync::Arc;

use crossbeam_channel::Sender;
use shared::domain::{Asset, AssetId};
use tracing::debug;

use crate::{
    drag::{DragController, DragSession},
    events::{emit, HostEvent},
    selection::{ClickModifiers, ClickPolicy, SelectionModel, ToggleClickPolicy},
};

/// Whether a UI event should keep bubbling after the core handled it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    Stop,
    Continue,
}

pub struct AssetListCoordinator {
    assets: Arc<[Asset]>,
    selection: SelectionModel,
    drag: DragController,
    click_policy: Box<dyn ClickPolicy>,
    events: Sender<HostEvent>,
}

impl AssetListCoordinator {
    pub fn new(events: Sender<HostEvent>) -> Self {
        Self::with_click_policy(events, Box::new(ToggleClickPolicy))
    }

    pub fn with_click_policy(events: Sender<HostEvent>, click_policy: Box<dyn ClickPolicy>) -> Self {
        Self {
            assets: Arc::from(Vec::new()),
            selection: SelectionModel::new(),
            drag: DragController::new(events.clone()),
            click_policy,
            events,
        }
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    /// Shared handle to the current list snapshot. Refreshes never mutate a
    /// snapshot in place.
    pub fn snapshot(&self) -> Arc<[Asset]> {
        Arc::clone(&self.assets)
    }

    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Checkbox state for a row.
    pub fn is_checked(&self, id: &AssetId) -> bool {
        self.selection.contains(id)
    }

    pub fn selected_assets(&self) -> Vec<&Asset> {
        self.selection.ordered(&self.assets)
    }

    /// Assets carried by the active drag gesture, as captured at drag start.
    pub fn dragged_assets(&self) -> &[Asset] {
        self.drag.session().map(DragSession::assets).unwrap_or_default()
    }

    pub fn on_row_click(&mut self, id: &AssetId) -> Propagation {
        self.on_row_click_with(id, ClickModifiers::default())
    }

    /// Applies the click policy. Always stops propagation so an embedded
    /// checkbox click does not also trigger a row-level action.
    pub fn on_row_click_with(&mut self, id: &AssetId, modifiers: ClickModifiers) -> Propagation {
        if !self.assets.iter().any(|asset| &asset.id == id) {
            debug!(asset_id = %id, "ignoring click on asset outside the current list");
            return Propagation::Stop;
        }

        let before = self.selection.clone();
        self.click_policy
            .apply(&mut self.selection, id, modifiers, &self.assets);
        self.prune_selection();
        if self.selection != before {
            self.notify_selection();
        }
        Propagation::Stop
    }

    pub fn on_checkbox_click(&mut self, id: &AssetId, modifiers: ClickModifiers) -> Propagation {
        self.on_row_click_with(id, modifiers)
    }

    /// Asks the modal host to open an editor. Selection is left untouched.
    pub fn on_row_double_click(&self, asset: &Asset) {
        emit(&self.events, HostEvent::OpenEditor(asset.clone()));
    }

    pub fn on_row_drag_start(&mut self, asset: &Asset) -> Option<&DragSession> {
        self.drag.begin(asset, &self.selection, &self.assets)
    }

    /// Returns whether a gesture was active and the dragging flag flipped.
    pub fn on_row_drag_end(&mut self) -> bool {
        self.drag.end()
    }

    /// Installs a freshly fetched list and keeps only the selected ids that
    /// still exist in it.
    pub fn replace_assets(&mut self, assets: impl Into<Arc<[Asset]>>) {
        self.assets = assets.into();
        let before = self.selection.len();
        self.prune_selection();
        let pruned = before - self.selection.len();
        if pruned > 0 {
            debug!(pruned, "pruned stale selection after list refresh");
            self.notify_selection();
        }
    }

    /// Writes a saved asset back into a new snapshot. Unknown ids are ignored.
    pub fn apply_saved(&mut self, saved: &Asset) {
        let Some(index) = self.assets.iter().position(|asset| asset.id == saved.id) else {
            debug!(asset_id = %saved.id, "saved asset is not in the current list");
            return;
        };
        let mut next = self.assets.to_vec();
        next[index] = saved.clone();
        self.assets = next.into();
    }

    fn prune_selection(&mut self) {
        let kept: Vec<AssetId> = self
            .assets
            .iter()
            .filter(|asset| self.selection.contains(&asset.id))
            .map(|asset| asset.id.clone())
            .collect();
        if kept.len() != self.selection.len() {
            self.selection.replace_all(kept);
        }
    }

    fn notify_selection(&self) {
        emit(
            &self.events,
            HostEvent::SelectionChanged {
                count: self.selection.len(),
            },
        );
    }
}
