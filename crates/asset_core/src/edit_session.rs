//! Dirty tracking for the editable fields of a single asset.

use shared::{
    domain::{Asset, AssetId},
    protocol::AssetPatch,
};

use crate::tags::{join_tags, split_tags};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditField {
    Alt,
    Title,
    Tags,
}

impl EditField {
    pub const ALL: [EditField; 3] = [EditField::Alt, EditField::Title, EditField::Tags];

    pub fn label(self) -> &'static str {
        match self {
            Self::Alt => "Alt text",
            Self::Title => "Title",
            Self::Tags => "Tags",
        }
    }

    /// Hint shown by an input while its draft value is empty.
    pub fn placeholder(self) -> &'static str {
        match self {
            Self::Alt => "No alt text yet...",
            Self::Title => "No title yet...",
            Self::Tags => "No tags yet...",
        }
    }
}

/// The editable triple. `tags` is kept as the raw delimited string the user
/// typed, trailing separators included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditableFields {
    pub alt: String,
    pub title: String,
    pub tags: String,
}

impl EditableFields {
    pub fn from_asset(asset: &Asset) -> Self {
        Self {
            alt: asset.alt.clone().unwrap_or_default(),
            title: asset.title.clone().unwrap_or_default(),
            tags: asset
                .tags
                .as_deref()
                .map(join_tags)
                .unwrap_or_default(),
        }
    }

    pub fn get(&self, field: EditField) -> &str {
        match field {
            EditField::Alt => &self.alt,
            EditField::Title => &self.title,
            EditField::Tags => &self.tags,
        }
    }

    fn set(&mut self, field: EditField, value: String) {
        match field {
            EditField::Alt => self.alt = value,
            EditField::Title => self.title = value,
            EditField::Tags => self.tags = value,
        }
    }

    fn to_patch(&self) -> AssetPatch {
        AssetPatch {
            alt: self.alt.clone(),
            title: self.title.clone(),
            tags: split_tags(&self.tags),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitDiff {
    /// Nothing changed; the caller closes without touching the store.
    Unchanged,
    Patch(AssetPatch),
}

/// Baseline/draft pair for one open edit surface. The baseline is fixed at
/// `open` and never mutates.
#[derive(Debug, Clone)]
pub struct EditSession {
    asset_id: AssetId,
    baseline: EditableFields,
    draft: EditableFields,
}

impl EditSession {
    pub fn open(asset: &Asset) -> Self {
        let baseline = EditableFields::from_asset(asset);
        Self {
            asset_id: asset.id.clone(),
            draft: baseline.clone(),
            baseline,
        }
    }

    pub fn asset_id(&self) -> &AssetId {
        &self.asset_id
    }

    pub fn baseline(&self) -> &EditableFields {
        &self.baseline
    }

    pub fn draft(&self) -> &EditableFields {
        &self.draft
    }

    pub fn update(&mut self, field: EditField, value: impl Into<String>) {
        self.draft.set(field, value.into());
    }

    /// Field-wise raw string comparison. Tags are compared as typed, so a
    /// whitespace-only edit counts as a change even though the submitted
    /// payload trims it away.
    pub fn is_dirty(&self) -> bool {
        self.draft != self.baseline
    }

    pub fn dirty_fields(&self) -> Vec<EditField> {
        EditField::ALL
            .into_iter()
            .filter(|field| self.draft.get(*field) != self.baseline.get(*field))
            .collect()
    }

    /// Produces the whole triple when anything changed; tags are re-split and
    /// trimmed even if only alt or title was edited.
    pub fn commit_diff(&self) -> CommitDiff {
        if !self.is_dirty() {
            return CommitDiff::Unchanged;
        }
        CommitDiff::Patch(self.draft.to_patch())
    }
}
