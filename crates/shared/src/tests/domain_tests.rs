use chrono::{TimeZone, Utc};

use crate::domain::{Asset, AssetId, AssetKind, AssetMetadata, Dimensions, InvalidDimensions};

fn asset(kind: AssetKind, title: Option<&str>) -> Asset {
    Asset {
        id: AssetId::new("image-a1"),
        created_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        kind,
        original_filename: "DSC_0001.jpg".into(),
        extension: "jpg".into(),
        size: 2048,
        url: "https://cdn.example.com/a1.jpg".into(),
        title: title.map(str::to_string),
        alt: None,
        tags: None,
        metadata: AssetMetadata {
            dimensions: Some(Dimensions::new(3020, 2034).expect("dimensions")),
        },
    }
}

#[test]
fn display_title_falls_back_to_original_filename() {
    assert_eq!(
        asset(AssetKind::ImageAsset, None).display_title(),
        "DSC_0001.jpg"
    );
    assert_eq!(
        asset(AssetKind::ImageAsset, Some("")).display_title(),
        "DSC_0001.jpg"
    );
    assert_eq!(
        asset(AssetKind::ImageAsset, Some("Harbour")).display_title(),
        "Harbour"
    );
}

#[test]
fn dimensions_are_only_reported_for_images() {
    let image = asset(AssetKind::ImageAsset, None);
    assert_eq!(image.dimensions().map(|d| d.to_string()), Some("3020 x 2034".into()));

    let file = asset(AssetKind::FileAsset, None);
    assert_eq!(file.dimensions(), None);
}

#[test]
fn asset_kind_uses_kebab_case_on_the_wire() {
    let json = serde_json::to_string(&AssetKind::ImageAsset).expect("serialize");
    assert_eq!(json, "\"image-asset\"");
    assert_eq!(AssetKind::parse("file"), Some(AssetKind::FileAsset));
    assert_eq!(AssetKind::parse("video"), None);
}

#[test]
fn missing_optional_fields_deserialize_as_absent() {
    let raw = serde_json::json!({
        "id": "file-b2",
        "created_at": "2024-03-01T12:00:00Z",
        "kind": "file-asset",
        "original_filename": "notes.pdf",
        "extension": "pdf",
        "size": 10,
        "url": "https://cdn.example.com/b2.pdf"
    });

    let asset: Asset = serde_json::from_value(raw).expect("deserialize");
    assert_eq!(asset.tags, None);
    assert_eq!(asset.metadata.dimensions, None);
    assert_eq!(asset.id.as_str(), "file-b2");
}

#[test]
fn zero_sized_dimensions_are_rejected() {
    assert_eq!(
        Dimensions::new(0, 480),
        Err(InvalidDimensions {
            width: 0,
            height: 480
        })
    );
    assert!(Dimensions::new(640, 0).is_err());

    let parsed: Result<Dimensions, _> =
        serde_json::from_value(serde_json::json!({ "width": 640, "height": 0 }));
    assert!(parsed.is_err());

    let ok: Dimensions =
        serde_json::from_value(serde_json::json!({ "width": 640, "height": 480 })).expect("valid");
    assert_eq!((ok.width(), ok.height()), (640, 480));
}
