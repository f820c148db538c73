use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use asset_core::{
    host_channel,
    tags::{join_tags, split_tags},
    AssetEditor, AssetListCoordinator, EditField, HostEvent, SubmitOutcome,
};
use clap::{Parser, Subcommand};
use crossbeam_channel::Receiver;
use serde::Serialize;
use shared::domain::{Asset, AssetId, AssetKind, Dimensions};
use storage::{NewAsset, Storage};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;

use config::{load_settings, normalize_database_url};

#[derive(Parser, Debug)]
struct Cli {
    /// Overrides the configured database url.
    #[arg(long)]
    database_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Import {
        filename: String,
        #[arg(long)]
        url: String,
        #[arg(long)]
        size: u64,
        #[arg(long, default_value = "image")]
        kind: String,
        #[arg(long)]
        width: Option<u32>,
        #[arg(long)]
        height: Option<u32>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        alt: Option<String>,
        /// Comma separated.
        #[arg(long)]
        tags: Option<String>,
    },
    List {
        #[arg(long)]
        json: bool,
    },
    Show {
        id: String,
    },
    /// Edits alt text, title and tags of one asset and saves if anything changed.
    Edit {
        id: String,
        #[arg(long)]
        alt: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        tags: Option<String>,
    },
    /// Shows what a drag started on `source` would carry for a given selection.
    DragPreview {
        source: String,
        #[arg(long, value_delimiter = ',')]
        select: Vec<String>,
    },
}

#[derive(Debug, Serialize)]
struct AssetRow<'a> {
    id: &'a str,
    title: &'a str,
    alt: &'a str,
    tags: String,
    dimensions: Option<String>,
    kind: &'static str,
    extension: String,
    size: u64,
    created_at: String,
}

impl<'a> AssetRow<'a> {
    fn from_asset(asset: &'a Asset) -> Self {
        Self {
            id: asset.id.as_str(),
            title: asset.display_title(),
            alt: asset.alt.as_deref().unwrap_or_default(),
            tags: asset.tags.as_deref().map(join_tags).unwrap_or_default(),
            dimensions: asset.dimensions().map(|d| d.to_string()),
            kind: asset.kind.as_str(),
            extension: asset.extension.to_uppercase(),
            size: asset.size,
            created_at: asset.created_at.to_rfc3339(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = load_settings();
    if let Some(url) = &cli.database_url {
        settings.database_url = normalize_database_url(url);
    }

    let filter = EnvFilter::try_new(&settings.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let storage = Storage::new(&settings.database_url)
        .await
        .with_context(|| format!("failed to open asset database '{}'", settings.database_url))?;

    match cli.command {
        Command::Import {
            filename,
            url,
            size,
            kind,
            width,
            height,
            title,
            alt,
            tags,
        } => {
            let kind = AssetKind::parse(&kind).ok_or_else(|| anyhow!("unknown asset kind '{kind}'"))?;
            let dimensions = match (width, height) {
                (Some(width), Some(height)) => Some(Dimensions::new(width, height)?),
                (None, None) => None,
                _ => bail!("--width and --height must be given together"),
            };
            let extension = Path::new(&filename)
                .extension()
                .map(|ext| ext.to_string_lossy().to_lowercase())
                .unwrap_or_default();
            let asset = storage
                .insert_asset(NewAsset {
                    kind,
                    original_filename: filename,
                    extension,
                    size,
                    url,
                    title,
                    alt,
                    tags: tags.as_deref().map(split_tags),
                    dimensions,
                })
                .await?;
            println!("imported asset_id={}", asset.id);
        }
        Command::List { json } => {
            let assets = storage.list_assets().await?;
            let rows: Vec<AssetRow<'_>> = assets.iter().map(AssetRow::from_asset).collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                for row in rows {
                    println!(
                        "{}\t{}\t{}\t{}\t{}\t{}\t{}",
                        row.id,
                        row.title,
                        row.alt,
                        row.tags,
                        row.dimensions.unwrap_or_default(),
                        row.extension,
                        row.size
                    );
                }
            }
        }
        Command::Show { id } => {
            let asset = storage
                .get_asset(&AssetId::new(id.as_str()))
                .await?
                .ok_or_else(|| anyhow!("asset {id} not found"))?;
            println!("{}", serde_json::to_string_pretty(&asset)?);
        }
        Command::Edit {
            id,
            alt,
            title,
            tags,
        } => {
            edit_asset(&storage, AssetId::new(id), alt, title, tags).await?;
        }
        Command::DragPreview { source, select } => {
            let (tx, _rx) = host_channel();
            let mut coordinator = AssetListCoordinator::new(tx);
            coordinator.replace_assets(storage.list_assets().await?);

            for id in select {
                coordinator.on_row_click(&AssetId::new(id));
            }
            let source = AssetId::new(source);
            let asset = coordinator
                .assets()
                .iter()
                .find(|asset| asset.id == source)
                .cloned()
                .ok_or_else(|| anyhow!("asset {source} not found"))?;

            let count = coordinator
                .on_row_drag_start(&asset)
                .map(|session| session.count())
                .unwrap_or_default();
            println!("dragging {count} asset(s):");
            for dragged in coordinator.dragged_assets() {
                println!("  {}\t{}", dragged.id, dragged.display_title());
            }
            coordinator.on_row_drag_end();
        }
    }

    Ok(())
}

async fn edit_asset(
    storage: &Storage,
    id: AssetId,
    alt: Option<String>,
    title: Option<String>,
    tags: Option<String>,
) -> Result<()> {
    let (tx, rx) = host_channel();
    let mut coordinator = AssetListCoordinator::new(tx.clone());
    let mut editor = AssetEditor::new(tx);
    coordinator.replace_assets(storage.list_assets().await?);

    let asset = coordinator
        .assets()
        .iter()
        .find(|asset| asset.id == id)
        .cloned()
        .ok_or_else(|| anyhow!("asset {id} not found"))?;
    coordinator.on_row_double_click(&asset);
    let opened = next_open_request(&rx).ok_or_else(|| anyhow!("editor was not requested"))?;
    editor.open(&opened);

    for (field, value) in [
        (EditField::Alt, alt),
        (EditField::Title, title),
        (EditField::Tags, tags),
    ] {
        if let Some(value) = value {
            editor.update(field, value)?;
        }
    }

    if let Some(session) = editor.session() {
        let dirty: Vec<&str> = session
            .dirty_fields()
            .into_iter()
            .map(EditField::label)
            .collect();
        info!(asset_id = %id, dirty = ?dirty, "submitting edit");
    }

    match editor.submit(storage).await {
        SubmitOutcome::Closed => println!("no changes for asset_id={id}"),
        SubmitOutcome::Saved(saved) => {
            coordinator.apply_saved(&saved);
            println!("saved asset_id={}", saved.id);
            println!("{}", serde_json::to_string_pretty(&AssetRow::from_asset(&saved))?);
        }
        SubmitOutcome::Failed(err) => {
            bail!("failed to save asset {id}: {}", err.message());
        }
        outcome @ (SubmitOutcome::Ignored | SubmitOutcome::Stale) => {
            bail!("submit for asset {id} did not run: {outcome:?}");
        }
    }

    Ok(())
}

fn next_open_request(rx: &Receiver<HostEvent>) -> Option<Asset> {
    rx.try_iter().find_map(|event| match event {
        HostEvent::OpenEditor(asset) => Some(asset),
        _ => None,
    })
}
