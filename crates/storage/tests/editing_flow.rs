use asset_core::{
    host_channel, AssetEditor, AssetListCoordinator, EditField, HostEvent, SubmitOutcome,
};
use shared::domain::{AssetKind, Dimensions};
use storage::{NewAsset, Storage};

fn new_image(filename: &str, tags: &[&str]) -> NewAsset {
    NewAsset {
        kind: AssetKind::ImageAsset,
        original_filename: filename.to_string(),
        extension: "jpg".into(),
        size: 2048,
        url: format!("https://cdn.example.com/{filename}"),
        title: None,
        alt: None,
        tags: Some(tags.iter().map(|t| t.to_string()).collect()),
        dimensions: Some(Dimensions::new(800, 600).expect("dimensions")),
    }
}

#[tokio::test]
async fn double_click_edit_save_and_refresh_round_trip() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let first = storage
        .insert_asset(new_image("harbour.jpg", &["sea"]))
        .await
        .expect("first");
    let second = storage
        .insert_asset(new_image("forest.jpg", &[]))
        .await
        .expect("second");

    let (tx, rx) = host_channel();
    let mut coordinator = AssetListCoordinator::new(tx.clone());
    let mut editor = AssetEditor::new(tx);
    coordinator.replace_assets(storage.list_assets().await.expect("list"));
    coordinator.on_row_click(&second.id);

    coordinator.on_row_double_click(&first);
    let opened = rx
        .try_iter()
        .find_map(|event| match event {
            HostEvent::OpenEditor(asset) => Some(asset),
            _ => None,
        })
        .expect("open editor event");
    editor.open(&opened);
    editor.update(EditField::Title, "Harbour at dawn").expect("title");
    editor.update(EditField::Tags, "sea, dawn ,").expect("tags");

    let outcome = editor.submit(&storage).await;
    let SubmitOutcome::Saved(saved) = outcome else {
        panic!("expected save");
    };
    assert_eq!(saved.tags, Some(vec!["sea".into(), "dawn".into(), String::new()]));
    assert_eq!(saved.display_title(), "Harbour at dawn");

    coordinator.replace_assets(storage.list_assets().await.expect("refresh"));
    assert!(coordinator.is_checked(&second.id));
    let refreshed = coordinator
        .assets()
        .iter()
        .find(|asset| asset.id == first.id)
        .expect("first still listed");
    assert_eq!(refreshed.title.as_deref(), Some("Harbour at dawn"));
}

#[tokio::test]
async fn saving_a_deleted_asset_keeps_the_draft_open() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let asset = storage
        .insert_asset(new_image("gone.jpg", &["x"]))
        .await
        .expect("insert");
    sqlx::query("DELETE FROM assets WHERE id = ?")
        .bind(asset.id.as_str())
        .execute(storage.pool())
        .await
        .expect("delete");

    let (tx, _rx) = host_channel();
    let mut editor = AssetEditor::new(tx);
    editor.open(&asset);
    editor.update(EditField::Alt, "still here").expect("alt");

    let outcome = editor.submit(&storage).await;

    assert!(matches!(outcome, SubmitOutcome::Failed(_)));
    assert!(editor.is_open());
    assert_eq!(
        editor.session().expect("session").draft().alt,
        "still here"
    );
}
