use super::*;

fn photo(filename: &str) -> NewAsset {
    NewAsset {
        kind: AssetKind::ImageAsset,
        original_filename: filename.to_string(),
        extension: "jpg".into(),
        size: 4096,
        url: format!("https://cdn.example.com/{filename}"),
        title: None,
        alt: Some("old".into()),
        tags: Some(vec!["x".into(), "y".into()]),
        dimensions: Some(Dimensions::new(3020, 2034).expect("dimensions")),
    }
}

#[tokio::test]
async fn health_check_succeeds_for_live_pool() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.health_check().await.expect("health check");
}

#[tokio::test]
async fn inserts_and_reads_back_asset() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let inserted = storage.insert_asset(photo("a.jpg")).await.expect("insert");

    assert!(inserted.id.as_str().starts_with("image-"));
    let loaded = storage
        .get_asset(&inserted.id)
        .await
        .expect("get")
        .expect("asset exists");
    assert_eq!(loaded, inserted);
    assert_eq!(loaded.tags, Some(vec!["x".to_string(), "y".to_string()]));
    assert_eq!(loaded.dimensions().map(|d| d.width()), Some(3020));
}

#[tokio::test]
async fn file_assets_never_carry_dimensions() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let mut new_asset = photo("notes.pdf");
    new_asset.kind = AssetKind::FileAsset;
    new_asset.extension = "pdf".into();

    let inserted = storage.insert_asset(new_asset).await.expect("insert");
    assert!(inserted.id.as_str().starts_with("file-"));
    assert_eq!(inserted.metadata.dimensions, None);
}

#[tokio::test]
async fn patch_sets_all_three_fields() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let inserted = storage.insert_asset(photo("a.jpg")).await.expect("insert");

    let patched = storage
        .patch_asset(
            &inserted.id,
            &AssetPatch {
                alt: "new".into(),
                title: String::new(),
                tags: vec!["sea".into()],
            },
        )
        .await
        .expect("patch")
        .expect("asset exists");

    assert_eq!(patched.alt.as_deref(), Some("new"));
    assert_eq!(patched.title.as_deref(), Some(""));
    assert_eq!(patched.tags, Some(vec!["sea".to_string()]));
    assert_eq!(patched.created_at, inserted.created_at);
}

#[tokio::test]
async fn store_patch_reports_missing_asset_as_not_found() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let err = AssetStore::patch(
        &storage,
        &AssetId::new("image-missing"),
        &AssetPatch {
            alt: String::new(),
            title: String::new(),
            tags: Vec::new(),
        },
    )
    .await
    .expect_err("missing asset");
    assert_eq!(err.code, shared::error::ErrorCode::NotFound);
}

#[tokio::test]
async fn creates_database_file_when_missing() {
    let suffix = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = std::env::temp_dir().join(format!("asset_storage_test_{suffix}"));
    let db_path = temp_root.join("nested").join("assets.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    let storage = Storage::new(&database_url).await.expect("db");
    drop(storage);

    assert!(
        db_path.exists(),
        "database file should exist: {}",
        db_path.display()
    );

    std::fs::remove_dir_all(temp_root).expect("cleanup");
}

#[test]
fn memory_url_has_no_path() {
    assert_eq!(sqlite_path("sqlite::memory:"), None);
    assert_eq!(
        sqlite_path("sqlite://./data/assets.db?mode=rwc"),
        Some(PathBuf::from("./data/assets.db"))
    );
}
