//! Integration tests for the host event loop driving presence.

mod helpers;

use serde_json::json;

use configurator_core::types::status::ConnectionState;
use configurator_host::Exit;
use configurator_presence::channel::memory::ChannelOp;

use helpers::{TestHost, ndjson, text};

#[tokio::test]
async fn test_open_edit_save_as_flow() {
    let mut app = TestHost::connected().await;
    let project = app.write_project("tanks.project", "armor = 120").await;
    let copy = app.path("tanks-copy.project");

    let input = ndjson(&[
        json!({"command": "open", "path": project}),
        json!({"event": "custom-status", "details": "Tuning armor", "state": "Tier X"}),
        json!({"command": "save-as", "path": copy, "content": "armor = 150"}),
    ]);
    let exit = app.host.run(input.as_bytes(), std::future::pending()).await;
    assert_eq!(exit, Exit::EndOfInput);

    app.wait_for_statuses(6).await;
    assert_eq!(
        app.texts(),
        vec![
            text("Using HEAT Labs Configurator", "Idle"),
            text("Loading project", "Opening file"),
            text("Editing: tanks.project", "Making changes"),
            text("Tuning armor", "Tier X"),
            text("Saving project", "Writing changes"),
            text("Editing: tanks-copy.project", "Making changes"),
        ]
    );

    let replies = app.replies();
    assert_eq!(replies[0]["reply"], "opened");
    assert_eq!(replies[0]["content"], "armor = 120");
    assert_eq!(replies[1]["reply"], "saved");
    assert_eq!(
        tokio::fs::read_to_string(&copy).await.unwrap(),
        "armor = 150"
    );
}

#[tokio::test]
async fn test_failed_open_emits_only_loading() {
    let mut app = TestHost::connected().await;
    let missing = app.path("missing.project");

    let input = ndjson(&[
        json!({"command": "open", "path": missing}),
        json!({"event": "status-changed", "kind": "something-new"}),
    ]);
    app.host.run(input.as_bytes(), std::future::pending()).await;

    app.wait_for_statuses(3).await;
    assert_eq!(
        app.texts(),
        vec![
            text("Using HEAT Labs Configurator", "Idle"),
            text("Loading project", "Opening file"),
            text("Using HEAT Labs Configurator", "Idle"),
        ]
    );
    assert_eq!(app.replies()[0]["reply"], "error");
}

#[tokio::test]
async fn test_quit_then_shutdown_clears_presence() {
    let mut app = TestHost::connected().await;

    let input = ndjson(&[
        json!({"event": "file-saving"}),
        json!({"command": "quit"}),
        json!({"event": "file-opened"}),
    ]);
    let exit = app.host.run(input.as_bytes(), std::future::pending()).await;
    assert_eq!(exit, Exit::Quit);

    app.wait_for_statuses(2).await;
    app.controller.shutdown().await;

    assert_eq!(app.controller.state(), ConnectionState::Disconnected);
    let calls = app.channel.calls();
    assert_eq!(calls.last().map(|c| c.op.clone()), Some(ChannelOp::ClearAndDisconnect));
    assert_eq!(app.texts().len(), 2);
    app.task.await.unwrap();
}

#[tokio::test]
async fn test_restart_presence_after_send_failure() {
    let mut app = TestHost::connected().await;

    app.channel.fail_next_sends(1);
    let input = ndjson(&[json!({"event": "file-saving"})]);
    app.host.run(input.as_bytes(), std::future::pending()).await;
    app.wait_for_statuses(2).await;

    let mut state = app.controller.watch_state();
    state
        .wait_for(|s| *s == ConnectionState::Disconnected)
        .await
        .unwrap();

    let input = ndjson(&[json!({"command": "restart-presence"})]);
    app.host.run(input.as_bytes(), std::future::pending()).await;

    app.wait_for_statuses(3).await;
    assert_eq!(app.texts()[2], text("Using HEAT Labs Configurator", "Idle"));
    assert_eq!(app.channel.connect_times().len(), 2);
}
