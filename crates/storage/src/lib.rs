use anyhow::{anyhow, Context, Result};
use asset_core::AssetStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::debug;

use shared::{
    domain::{Asset, AssetId, AssetKind, AssetMetadata, Dimensions},
    error::StoreError,
    protocol::AssetPatch,
};

const ASSET_COLUMNS: &str = "id, created_at, kind, original_filename, extension, size_bytes, url, \
     title, alt, tags_json, width, height";

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

/// Fields for an asset that has not been stored yet. The id and creation
/// time are assigned on insert.
#[derive(Debug, Clone)]
pub struct NewAsset {
    pub kind: AssetKind,
    pub original_filename: String,
    pub extension: String,
    pub size: u64,
    pub url: String,
    pub title: Option<String>,
    pub alt: Option<String>,
    pub tags: Option<Vec<String>>,
    pub dimensions: Option<Dimensions>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    pub async fn insert_asset(&self, new_asset: NewAsset) -> Result<Asset> {
        let prefix = match new_asset.kind {
            AssetKind::ImageAsset => "image",
            AssetKind::FileAsset => "file",
        };
        let id = AssetId(format!("{prefix}-{}", uuid::Uuid::new_v4().simple()));
        let dimensions = match new_asset.kind {
            AssetKind::ImageAsset => new_asset.dimensions,
            AssetKind::FileAsset => None,
        };
        let tags_json = new_asset
            .tags
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .context("failed to encode tags")?;

        let row = sqlx::query(&format!(
            "INSERT INTO assets (id, created_at, kind, original_filename, extension, size_bytes,
                                 url, title, alt, tags_json, width, height)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING {ASSET_COLUMNS}"
        ))
        .bind(&id.0)
        .bind(Utc::now())
        .bind(new_asset.kind.as_str())
        .bind(&new_asset.original_filename)
        .bind(&new_asset.extension)
        .bind(i64::try_from(new_asset.size).context("asset size does not fit in sqlite integer")?)
        .bind(&new_asset.url)
        .bind(&new_asset.title)
        .bind(&new_asset.alt)
        .bind(tags_json)
        .bind(dimensions.map(|d| i64::from(d.width())))
        .bind(dimensions.map(|d| i64::from(d.height())))
        .fetch_one(&self.pool)
        .await
        .with_context(|| format!("failed to insert asset {id}"))?;

        let asset = asset_from_row(&row)?;
        debug!(asset_id = %asset.id, "inserted asset");
        Ok(asset)
    }

    pub async fn get_asset(&self, id: &AssetId) -> Result<Option<Asset>> {
        let row = sqlx::query(&format!("SELECT {ASSET_COLUMNS} FROM assets WHERE id = ?"))
            .bind(&id.0)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(asset_from_row).transpose()
    }

    /// Newest first.
    pub async fn list_assets(&self) -> Result<Vec<Asset>> {
        let rows = sqlx::query(&format!(
            "SELECT {ASSET_COLUMNS} FROM assets ORDER BY created_at DESC, id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(asset_from_row).collect()
    }

    /// Sets alt, title and tags in a single statement. Returns `None` when
    /// the asset does not exist.
    pub async fn patch_asset(&self, id: &AssetId, patch: &AssetPatch) -> Result<Option<Asset>> {
        let tags_json = serde_json::to_string(&patch.tags).context("failed to encode tags")?;
        let row = sqlx::query(&format!(
            "UPDATE assets SET alt = ?, title = ?, tags_json = ?
             WHERE id = ?
             RETURNING {ASSET_COLUMNS}"
        ))
        .bind(&patch.alt)
        .bind(&patch.title)
        .bind(tags_json)
        .bind(&id.0)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("failed to patch asset {id}"))?;
        row.as_ref().map(asset_from_row).transpose()
    }
}

#[async_trait]
impl AssetStore for Storage {
    async fn patch(&self, id: &AssetId, patch: &AssetPatch) -> Result<Asset, StoreError> {
        match self.patch_asset(id, patch).await {
            Ok(Some(asset)) => Ok(asset),
            Ok(None) => Err(StoreError::not_found(format!("asset {id} not found"))),
            Err(err) => Err(StoreError::internal(format!("{err:#}"))),
        }
    }
}

fn asset_from_row(row: &SqliteRow) -> Result<Asset> {
    let raw_kind: String = row.try_get("kind")?;
    let kind = AssetKind::parse(&raw_kind).ok_or_else(|| anyhow!("unknown asset kind '{raw_kind}'"))?;
    let size: i64 = row.try_get("size_bytes")?;
    let tags_json: Option<String> = row.try_get("tags_json")?;
    let tags = tags_json
        .as_deref()
        .map(serde_json::from_str::<Vec<String>>)
        .transpose()
        .context("failed to decode stored tags")?;
    let width: Option<i64> = row.try_get("width")?;
    let height: Option<i64> = row.try_get("height")?;
    let dimensions = match (width, height) {
        (Some(width), Some(height)) => Some(Dimensions::new(
            u32::try_from(width).context("stored width out of range")?,
            u32::try_from(height).context("stored height out of range")?,
        )?),
        _ => None,
    };

    Ok(Asset {
        id: AssetId(row.try_get("id")?),
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        kind,
        original_filename: row.try_get("original_filename")?,
        extension: row.try_get("extension")?,
        size: u64::try_from(size).context("stored size is negative")?,
        url: row.try_get("url")?,
        title: row.try_get("title")?,
        alt: row.try_get("alt")?,
        tags,
        metadata: AssetMetadata { dimensions },
    })
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url == "sqlite::memory:" || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
