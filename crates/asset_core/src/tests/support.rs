use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use crossbeam_channel::{Receiver, Sender};
use shared::{
    domain::{Asset, AssetId, AssetKind, AssetMetadata, Dimensions},
    error::{ErrorCode, StoreError},
    protocol::AssetPatch,
};

use crate::{host_channel, AssetStore, HostEvent};

pub fn image(id: &str) -> Asset {
    Asset {
        id: AssetId::new(id),
        created_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        kind: AssetKind::ImageAsset,
        original_filename: format!("{id}.jpg"),
        extension: "jpg".into(),
        size: 1024,
        url: format!("https://cdn.example.com/{id}.jpg"),
        title: None,
        alt: None,
        tags: None,
        metadata: AssetMetadata {
            dimensions: Some(Dimensions::new(640, 480).expect("dimensions")),
        },
    }
}

pub fn assets(ids: &[&str]) -> Vec<Asset> {
    ids.iter().map(|id| image(id)).collect()
}

pub fn ids(ids: &[&str]) -> Vec<AssetId> {
    ids.iter().map(|id| AssetId::new(*id)).collect()
}

pub fn channel() -> (Sender<HostEvent>, Receiver<HostEvent>) {
    host_channel()
}

pub fn drain(rx: &Receiver<HostEvent>) -> Vec<HostEvent> {
    rx.try_iter().collect()
}

/// In-memory store that records every patch it receives.
pub struct MemoryAssetStore {
    assets: Mutex<Vec<Asset>>,
    patches: Mutex<Vec<(AssetId, AssetPatch)>>,
    fail_with: Mutex<Option<StoreError>>,
    calls: AtomicUsize,
}

impl MemoryAssetStore {
    pub fn new(assets: Vec<Asset>) -> Self {
        Self {
            assets: Mutex::new(assets),
            patches: Mutex::new(Vec::new()),
            fail_with: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn fail_next(&self, code: ErrorCode, message: &str) {
        *self.fail_with.lock().unwrap() = Some(StoreError::new(code, message));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn patches(&self) -> Vec<(AssetId, AssetPatch)> {
        self.patches.lock().unwrap().clone()
    }
}

#[async_trait]
impl AssetStore for MemoryAssetStore {
    async fn patch(&self, id: &AssetId, patch: &AssetPatch) -> Result<Asset, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.fail_with.lock().unwrap().take() {
            return Err(err);
        }

        let mut assets = self.assets.lock().unwrap();
        let asset = assets
            .iter_mut()
            .find(|asset| &asset.id == id)
            .ok_or_else(|| StoreError::not_found(format!("asset {id} not found")))?;
        asset.alt = Some(patch.alt.clone());
        asset.title = Some(patch.title.clone());
        asset.tags = Some(patch.tags.clone());
        self.patches
            .lock()
            .unwrap()
            .push((id.clone(), patch.clone()));
        Ok(asset.clone())
    }
}
