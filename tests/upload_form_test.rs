use anyhow::Result;
use convert_pro::core::ads::{AdNetwork, DEFAULT_SCRIPT_URL};
use convert_pro::core::uploader::{SelectedFile, UploadState, GENERIC_FAILURE_MESSAGE};
use convert_pro::core::{ConversionCategory, UserId};
use convert_pro::{
    build_router, AppState, HttpConvertClient, LocalStorage, MemoryStore, PassthroughConverter,
    SystemClock, TokenIdentity, UploadForm,
};
use httpmock::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

fn selected(name: &str, data: &[u8]) -> SelectedFile {
    SelectedFile {
        name: name.to_string(),
        content_type: Some("text/plain".to_string()),
        data: data.to_vec(),
    }
}

fn downloads(temp_dir: &TempDir) -> LocalStorage {
    LocalStorage::new(temp_dir.path().to_string_lossy().to_string())
}

#[tokio::test]
async fn test_submit_downloads_converted_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();
    let convert_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/convert")
            .header("authorization", "Bearer tok-free")
            .body_contains("outputFormat")
            .body_contains("documents");
        then.status(200)
            .header("Content-Type", "text/plain")
            .header("Content-Disposition", "attachment; filename=\"converted.pdf\"")
            .body("converted bytes");
    });

    let client = HttpConvertClient::new(&server.base_url(), Some("tok-free".to_string()))?;
    let mut form = UploadForm::new(client, downloads(&temp_dir), ConversionCategory::Documents, false);

    assert!(form.select_file(selected("notes.txt", b"hello")));
    form.select_output_format("PDF");
    let state = form.submit().await.clone();

    convert_mock.assert();
    let saved = temp_dir.path().join("converted.pdf");
    assert_eq!(
        state,
        UploadState::Succeeded {
            saved_as: saved.to_string_lossy().to_string()
        }
    );
    assert_eq!(std::fs::read(&saved)?, b"converted bytes");
    assert!(form.file().is_none());
    assert!(form.output_format().is_none());
    Ok(())
}

#[tokio::test]
async fn test_server_error_message_surfaces_verbatim() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();
    let convert_mock = server.mock(|when, then| {
        when.method(POST).path("/api/convert");
        then.status(429).json_body(serde_json::json!({
            "error": "Daily conversion limit reached. Upgrade to Premium for unlimited conversions."
        }));
    });

    let client = HttpConvertClient::new(&server.base_url(), Some("tok-free".to_string()))?;
    let mut form = UploadForm::new(client, downloads(&temp_dir), ConversionCategory::Images, false);
    form.select_file(selected("a.png", b"png"));
    form.select_output_format("WEBP");

    let state = form.submit().await.clone();

    convert_mock.assert();
    assert_eq!(
        state,
        UploadState::Failed {
            message: "Daily conversion limit reached. Upgrade to Premium for unlimited conversions."
                .to_string()
        }
    );
    assert!(!form.is_submitting());
    assert!(!temp_dir.path().join("converted.webp").exists());
    Ok(())
}

#[tokio::test]
async fn test_error_without_message_uses_fallback() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/convert");
        then.status(502).body("<html>bad gateway</html>");
    });

    let client = HttpConvertClient::new(&server.base_url(), None)?;
    let mut form = UploadForm::new(client, downloads(&temp_dir), ConversionCategory::Media, true);
    form.select_file(selected("clip.mov", b"mov"));
    form.select_output_format("MP4");
    form.submit().await;

    assert_eq!(form.error(), Some(GENERIC_FAILURE_MESSAGE));
    Ok(())
}

#[tokio::test]
async fn test_validation_errors_make_no_request() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();
    let convert_mock = server.mock(|when, then| {
        when.method(POST).path("/api/convert");
        then.status(200);
    });

    let client = HttpConvertClient::new(&server.base_url(), None)?;
    let mut form = UploadForm::new(client, downloads(&temp_dir), ConversionCategory::Documents, false);

    assert!(!form.select_file(selected("big.pdf", &vec![0u8; 10 * 1024 * 1024 + 1])));
    form.select_output_format("PDF");
    form.submit().await;

    assert_eq!(form.error(), Some("Please select a file and output format"));
    convert_mock.assert_hits(0);
    Ok(())
}

#[tokio::test]
async fn test_form_against_running_server() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = Arc::new(MemoryStore::new());
    let identity = TokenIdentity::new([("tok".to_string(), UserId::new("dana"))]);
    let state = AppState::new(
        Arc::new(identity),
        store.clone(),
        store.clone(),
        Arc::new(PassthroughConverter::new(Duration::from_millis(10))),
        Arc::new(SystemClock),
        AdNetwork {
            publisher_id: "ca-pub-test".to_string(),
            script_url: DEFAULT_SCRIPT_URL.to_string(),
            production: false,
        },
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let base = format!("http://{}", listener.local_addr()?);
    let app = build_router(Arc::new(state));
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    let client = HttpConvertClient::new(&base, Some("tok".to_string()))?;
    let entitlement = client.entitlement().await?;
    assert!(!entitlement.is_premium);

    let mut form = UploadForm::new(
        client.clone(),
        downloads(&temp_dir),
        ConversionCategory::Documents,
        entitlement.is_premium,
    );
    form.select_file(selected("memo.txt", b"plain text"));
    form.select_output_format("RTF");
    let state = form.submit().await.clone();

    assert!(matches!(state, UploadState::Succeeded { .. }));
    assert_eq!(
        std::fs::read(temp_dir.path().join("converted.rtf"))?,
        b"plain text"
    );

    let history = client.history().await?;
    assert!(history.authenticated);
    assert_eq!(history.conversions.len(), 1);
    assert_eq!(history.conversions[0].file_name, "memo.txt");
    assert_eq!(history.conversions[0].conversion_type, "documents");
    assert_eq!(store.records_for(&UserId::new("dana")).len(), 1);
    Ok(())
}
