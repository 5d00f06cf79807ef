//! Downloads against a real Drive account.
//!
//! Ignored by default. Run with
//! `DRIVE_TEST_CREDENTIALS=config/cred.json DRIVE_TEST_DATA=test_data/test_data.json cargo test -- --ignored`.
//! The data file lists file IDs by category:
//!
//! ```json
//! {
//!   "VALID_FILE_IDS": [{"file_id": "...", "comment": "owner"}],
//!   "DOC_FILE_TYPES": [{"file_id": "...", "comment": "docx"}],
//!   "FOLDER_ID": "...",
//!   "INVALID_FILE_IDS": [{"file_id": "...", "comment": "deleted"}]
//! }
//! ```

use std::path::PathBuf;

use serde::Deserialize;
use tempfile::TempDir;

use drive_download::download::{download_file, DownloadConfig};
use drive_download::progress::LogReporter;
use drive_download::{authenticate, DriveClient, DriveError};

#[derive(Debug, Deserialize)]
struct Sample {
    file_id: String,
    comment: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
struct TestData {
    valid_file_ids: Vec<Sample>,
    shared_file_id: Option<String>,
    doc_file_types: Vec<Sample>,
    spreadsheet_file_types: Vec<Sample>,
    ppt_file_types: Vec<Sample>,
    image_file_types: Vec<Sample>,
    audio_file_types: Vec<Sample>,
    video_file_types: Vec<Sample>,
    archive_file_types: Vec<Sample>,
    scripts_file_types: Vec<Sample>,
    application_file_types: Vec<Sample>,
    folder_id: Option<String>,
    invalid_file_ids: Vec<Sample>,
    insufficient_permissions_file_id: Option<String>,
    large_file_id: Option<String>,
}

fn load() -> (DriveClient, TestData) {
    let cred = PathBuf::from(std::env::var("DRIVE_TEST_CREDENTIALS").expect("DRIVE_TEST_CREDENTIALS not set"));
    let data_path = std::env::var("DRIVE_TEST_DATA").expect("DRIVE_TEST_DATA not set");

    let client = authenticate(Some(cred.as_path()), None).expect("authentication failed");
    let data = std::fs::read_to_string(&data_path).expect("cannot read test data");
    let data: TestData = serde_json::from_str(&data).expect("malformed test data");
    (client, data)
}

/// Download and compare the byte count with the size Drive reports.
async fn assert_size_matches(client: &DriveClient, file_id: &str, comment: &str) {
    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("download.out");

    let summary = download_file(client, file_id, &dest, &DownloadConfig::default(), &LogReporter)
        .await
        .unwrap_or_else(|e| panic!("{file_id} ({comment}): {e}"));

    let remote = client.get_file(file_id).await.unwrap();
    let local = std::fs::metadata(&dest).unwrap().len();
    assert_eq!(summary.bytes_written, local);
    assert_eq!(remote.size, Some(local), "{file_id} ({comment}): size mismatch");
}

/// Exported documents have no remote size; only require a non-empty file.
async fn assert_exported(client: &DriveClient, file_id: &str, comment: &str) {
    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("export.out");

    download_file(client, file_id, &dest, &DownloadConfig::default(), &LogReporter)
        .await
        .unwrap_or_else(|e| panic!("{file_id} ({comment}): {e}"));

    assert!(std::fs::metadata(&dest).unwrap().len() > 0, "{file_id} ({comment}): empty export");
}

/// Uploaded Office files keep their stored bytes; native ones are exported.
async fn assert_downloadable(client: &DriveClient, sample: &Sample) {
    let mime_type = client.get_mime_type(&sample.file_id).await.unwrap();
    if mime_type.starts_with(drive_download::export::NATIVE_PREFIX) {
        assert_exported(client, &sample.file_id, &sample.comment).await;
    } else {
        assert_size_matches(client, &sample.file_id, &sample.comment).await;
    }
}

#[tokio::test]
#[ignore]
async fn stored_files_match_remote_size() {
    let (client, data) = load();
    let stored = data
        .valid_file_ids
        .iter()
        .chain(&data.image_file_types)
        .chain(&data.audio_file_types)
        .chain(&data.video_file_types)
        .chain(&data.archive_file_types)
        .chain(&data.scripts_file_types)
        .chain(&data.application_file_types);

    for sample in stored {
        assert_size_matches(&client, &sample.file_id, &sample.comment).await;
    }
    if let Some(id) = &data.shared_file_id {
        assert_size_matches(&client, id, "shared by another user").await;
    }
}

#[tokio::test]
#[ignore]
async fn office_and_native_documents_download() {
    let (client, data) = load();
    let documents = data
        .doc_file_types
        .iter()
        .chain(&data.spreadsheet_file_types)
        .chain(&data.ppt_file_types);

    for sample in documents {
        assert_downloadable(&client, sample).await;
    }
}

#[tokio::test]
#[ignore]
async fn folder_is_unsupported() {
    let (client, data) = load();
    let Some(folder_id) = data.folder_id else { return };

    let dir = TempDir::new().unwrap();
    let err = download_file(&client, &folder_id, &dir.path().join("x"), &DownloadConfig::default(), &LogReporter)
        .await
        .unwrap_err();
    assert!(matches!(err, DriveError::UnsupportedType(ref m) if m == "application/vnd.google-apps.folder"));
}

#[tokio::test]
#[ignore]
async fn inaccessible_ids_fail() {
    let (client, data) = load();
    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("x");

    let ids = data
        .invalid_file_ids
        .iter()
        .map(|s| s.file_id.clone())
        .chain(data.insufficient_permissions_file_id);
    for id in ids {
        let result = download_file(&client, &id, &dest, &DownloadConfig::default(), &LogReporter).await;
        assert!(result.is_err(), "{id} should not be downloadable");
    }
}

#[tokio::test]
#[ignore]
async fn large_file_over_2gb() {
    let (client, data) = load();
    if let Some(id) = &data.large_file_id {
        assert_size_matches(&client, id, "2 GB or larger").await;
    }
}
