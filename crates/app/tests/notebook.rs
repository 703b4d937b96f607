//! End-to-end backup, settings and assistant flows.

use bapp_app::AppContext;
use bapp_core::models::{AiProvider, Theme};
use bapp_core::{AppConfig, Error, Note, SettingsPatch, Verse, VerseRef};
use httpmock::prelude::*;
use serde_json::json;
use tempfile::TempDir;

async fn context(dir: &TempDir, name: &str) -> AppContext {
    let config = AppConfig { db_path: dir.path().join(name), ..Default::default() };
    AppContext::init(config).await.unwrap()
}

#[tokio::test]
async fn test_export_import_reproduces_every_record() {
    let dir = TempDir::new().unwrap();
    let source = context(&dir, "source.sqlite").await;

    let verse = VerseRef::new("jhn", 3, 16);
    source.notebook().save_note(&verse, "God so loved").await.unwrap();
    source.notebook().toggle_bookmark(&verse).await.unwrap();
    source.notebook().record_research(&verse, "world?", "kosmos").await.unwrap();
    source
        .settings()
        .update(SettingsPatch { theme: Some(Theme::Dark), font_size: Some(18), ..Default::default() })
        .await
        .unwrap();

    let json = source.export_backup().await.unwrap();

    let target = context(&dir, "target.sqlite").await;
    let summary = target.import_backup(&json).await.unwrap();
    assert_eq!(summary.notes, 1);
    assert_eq!(summary.bookmarks, 1);
    assert_eq!(summary.research, 1);
    assert_eq!(summary.settings, 1);

    assert_eq!(source.store().backup().await.unwrap(), target.store().backup().await.unwrap());
    assert_eq!(target.settings().read().await.font_size, 18);

    source.shutdown().await.unwrap();
    target.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_partial_import_keeps_other_collections() {
    let dir = TempDir::new().unwrap();
    let ctx = context(&dir, "bapp.sqlite").await;
    let verse = VerseRef::new("gen", 1, 1);
    ctx.notebook().toggle_bookmark(&verse).await.unwrap();

    let json = r#"{"version":1,"notes":[{"id":"gen:1:1","content":"test","createdAt":1,"updatedAt":1}]}"#;
    ctx.import_backup(json).await.unwrap();

    assert!(ctx.notebook().is_bookmarked(&verse).await.unwrap());
    let note: Note = ctx.notebook().note(&verse).await.unwrap().unwrap();
    assert_eq!(note.content, "test");
    ctx.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_rejected_import_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let ctx = context(&dir, "bapp.sqlite").await;

    let json = r#"{"version":1,"notes":[{"id":"a","content":"x","createdAt":1,"updatedAt":1}],"bookmarks":[{"id":"b"}]}"#;
    assert!(matches!(ctx.import_backup(json).await, Err(Error::InvalidBackup(_))));
    assert!(ctx.notebook().notes().await.unwrap().is_empty());
    ctx.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_settings_survive_restart() {
    let dir = TempDir::new().unwrap();
    let ctx = context(&dir, "bapp.sqlite").await;
    ctx.settings()
        .update(SettingsPatch { font_size: Some(22), ..Default::default() })
        .await
        .unwrap();
    ctx.shutdown().await.unwrap();

    let ctx = context(&dir, "bapp.sqlite").await;
    let settings = ctx.settings().read().await;
    assert_eq!(settings.font_size, 22);
    assert_eq!(settings.theme, Theme::Auto);
    ctx.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_malformed_ai_url_rejected_before_opening_store() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("bapp.sqlite");
    let config = AppConfig { db_path: db_path.clone(), gemini_base_url: "not a url".into(), ..Default::default() };

    let Err(err) = AppContext::init(config).await else {
        panic!("malformed gemini_base_url should be rejected");
    };
    assert!(matches!(err, Error::InvalidInput(_)));
    assert!(err.to_string().contains("gemini_base_url"));
    assert!(!db_path.exists());
}

#[tokio::test]
async fn test_analysis_without_credentials_makes_no_request() {
    let server = MockServer::start_async().await;
    let any = server
        .mock_async(|_when, then| {
            then.status(200);
        })
        .await;

    let dir = TempDir::new().unwrap();
    let config = AppConfig {
        db_path: dir.path().join("bapp.sqlite"),
        gemini_base_url: server.base_url(),
        claude_base_url: server.base_url(),
        ..Default::default()
    };
    let ctx = AppContext::init(config).await.unwrap();

    let verse = Verse {
        book_id: "gen".into(),
        chapter: 1,
        verse: 1,
        text_cn: "起初，神创造天地。".into(),
        text_en: "In the beginning, God created the heavens and the earth.".into(),
    };
    let err = ctx.assistant().analyze(&verse, None).await.unwrap_err();
    assert!(matches!(err, Error::NotConfigured(_)));

    any.assert_hits_async(0).await;
    ctx.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_configured_claude_answers() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/messages").header("x-api-key", "c-key");
            then.status(200).json_body(json!({"content": [{"type": "text", "text": "太初有道 / In the beginning was the Word"}]}));
        })
        .await;

    let dir = TempDir::new().unwrap();
    let config =
        AppConfig { db_path: dir.path().join("bapp.sqlite"), claude_base_url: server.base_url(), ..Default::default() };
    let ctx = AppContext::init(config).await.unwrap();

    ctx.settings()
        .update(SettingsPatch {
            ai_provider: Some(AiProvider::Claude),
            claude_api_key: Some("c-key".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(ctx.assistant().provider().await, Some(AiProvider::Claude));

    let answer = ctx.assistant().ask("John 1:1", "What is the Word?").await.unwrap();
    assert!(answer.contains("In the beginning was the Word"));
    mock.assert_async().await;
    ctx.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_saved_customizations() {
    let dir = TempDir::new().unwrap();
    let ctx = context(&dir, "bapp.sqlite").await;

    let changes: Vec<bapp_core::VibeChange> = serde_json::from_str(
        r#"[{"type":"css","description":"serif","code":"body { font-family: serif; }"},
            {"type":"feature","description":"verse of the day","code":"showVerseOfDay()"}]"#,
    )
    .unwrap();
    ctx.save_customizations(&changes).await.unwrap();
    assert_eq!(ctx.customizations().await.unwrap(), changes);

    assert_eq!(ctx.clear_customizations().await.unwrap(), 2);
    assert!(ctx.customizations().await.unwrap().is_empty());
    ctx.shutdown().await.unwrap();
}
