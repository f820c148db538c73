use std::collections::HashSet;

use shared::domain::{Asset, AssetId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClickModifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub meta: bool,
}

/// Unordered set of selected asset ids. Presentation order always comes from
/// the asset list, see [`SelectionModel::ordered`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionModel {
    ids: HashSet<AssetId>,
}

impl SelectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether `id` is selected after the toggle.
    pub fn toggle(&mut self, id: &AssetId) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.clone());
            true
        }
    }

    pub fn contains(&self, id: &AssetId) -> bool {
        self.ids.contains(id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn replace_all(&mut self, ids: impl IntoIterator<Item = AssetId>) {
        self.ids = ids.into_iter().collect();
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssetId> {
        self.ids.iter()
    }

    /// Selected assets in list order.
    pub fn ordered<'a>(&self, assets: &'a [Asset]) -> Vec<&'a Asset> {
        assets
            .iter()
            .filter(|asset| self.ids.contains(&asset.id))
            .collect()
    }
}

/// How a row click mutates the selection. Implementations may interpret
/// modifiers (range or additive selection); `assets` is the current list in
/// presentation order and the clicked id is always a member of it.
pub trait ClickPolicy: Send + Sync {
    fn apply(
        &self,
        selection: &mut SelectionModel,
        clicked: &AssetId,
        modifiers: ClickModifiers,
        assets: &[Asset],
    );
}

/// Toggles only the clicked id, whatever modifiers are held.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToggleClickPolicy;

impl ClickPolicy for ToggleClickPolicy {
    fn apply(
        &self,
        selection: &mut SelectionModel,
        clicked: &AssetId,
        _modifiers: ClickModifiers,
        _assets: &[Asset],
    ) {
        selection.toggle(clicked);
    }
}
