//! Integration tests for two-tier settings persistence.

mod helpers;

use serde_json::json;

use configurator_core::config::app::AppSection;
use configurator_settings::{GlobalSettings, SettingsError, SettingsStore};

use helpers::{TestHost, local_settings_file, ndjson};

#[tokio::test]
async fn test_global_settings_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let app = AppSection {
        app_id: "heatlabs-configurator".to_string(),
        settings_dir: Some(dir.path().join("heatlabs-configurator")),
    };
    let store = SettingsStore::from_config(&app).unwrap();

    assert_eq!(store.load_global().await.unwrap(), GlobalSettings::default());
    assert!(!store.global_path().exists());

    let patch = json!({"gamePath": "/games/heat", "window": {"w": 1280}});
    store
        .update_global(patch.as_object().unwrap())
        .await
        .unwrap();

    let text = tokio::fs::read_to_string(store.global_path()).await.unwrap();
    let on_disk: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(
        on_disk,
        json!({"gamePath": "/games/heat", "autoLoad": true, "window": {"w": 1280}})
    );
    assert!(text.contains('\n'));

    tokio::fs::write(store.global_path(), "\"just a string\"")
        .await
        .unwrap();
    assert!(matches!(
        store.load_global().await,
        Err(SettingsError::ParseFailed { .. })
    ));
}

#[tokio::test]
async fn test_local_settings_follow_the_project() {
    let mut app = TestHost::connected().await;
    let project = app.write_project("projects/tanks.project", "v1").await;
    let store = SettingsStore::new(app.path("global"));
    store
        .save_local(&project, json!({"zoom": 3}).as_object().unwrap())
        .await
        .unwrap();

    let moved = app.path("archive/tanks.project");
    tokio::fs::create_dir_all(moved.parent().unwrap()).await.unwrap();

    let input = ndjson(&[
        json!({"command": "open", "path": project}),
        json!({"command": "save-as", "path": moved, "content": "v2"}),
    ]);
    app.host.run(input.as_bytes(), std::future::pending()).await;

    let replies = app.replies();
    assert_eq!(replies[0]["local_settings"], json!({"zoom": 3}));
    assert!(local_settings_file(&moved).exists());
    assert_eq!(
        store.load_local(&moved).await.unwrap(),
        json!({"zoom": 3}).as_object().cloned()
    );
}
