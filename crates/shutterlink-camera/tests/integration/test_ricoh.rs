//! Integration tests for the Ricoh/Pentax WiFi profile
//!
//! Verifies end-to-end behavior of the provider against a wiremock
//! camera API:
//! - Folder and file listing, order preservation
//! - Format filtering of RAW+JPEG pairs
//! - Content fetch with declared length
//! - Error mapping (404, 5xx, malformed bodies)

use shutterlink_camera::profile::PhotoFormat;
use shutterlink_core::domain::errors::DeviceError;
use shutterlink_core::ports::camera_device::ICameraDevice;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common;

fn two_folder_listing() -> serde_json::Value {
    serde_json::json!({
        "dirs": [
            {"name": "101_0412", "files": ["IMGP0001.JPG", "IMGP0002.JPG"]},
            {"name": "102_1026", "files": ["_AMP9018.JPG", "_AMP9018.DNG"]}
        ]
    })
}

#[tokio::test]
async fn test_list_folders_newest_last() {
    let server = MockServer::start().await;
    common::mount_ricoh_listing(&server, two_folder_listing()).await;
    let provider = common::ricoh_provider(&server, PhotoFormat::All);

    let folders = provider.list_folders().await.unwrap();
    let names: Vec<&str> = folders.iter().map(|f| f.as_str()).collect();
    assert_eq!(names, vec!["101_0412", "102_1026"]);
}

#[tokio::test]
async fn test_list_files_in_device_order() {
    let server = MockServer::start().await;
    common::mount_ricoh_listing(&server, two_folder_listing()).await;
    let provider = common::ricoh_provider(&server, PhotoFormat::All);

    let folder = "101_0412".parse().unwrap();
    let files = provider.list_files(&folder).await.unwrap();
    let names: Vec<&str> = files.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["IMGP0001.JPG", "IMGP0002.JPG"]);
}

#[tokio::test]
async fn test_list_files_applies_format_filter() {
    let server = MockServer::start().await;
    common::mount_ricoh_listing(&server, two_folder_listing()).await;
    let provider = common::ricoh_provider(&server, PhotoFormat::Jpg);

    let folder = "102_1026".parse().unwrap();
    let files = provider.list_files(&folder).await.unwrap();
    let names: Vec<&str> = files.iter().map(|e| e.name.as_str()).collect();
    // The DNG half of the RAW+JPEG pair is filtered out.
    assert_eq!(names, vec!["_AMP9018.JPG"]);
}

#[tokio::test]
async fn test_list_files_unknown_folder_is_not_found() {
    let server = MockServer::start().await;
    common::mount_ricoh_listing(&server, two_folder_listing()).await;
    let provider = common::ricoh_provider(&server, PhotoFormat::All);

    let folder = "999_0000".parse().unwrap();
    let err = provider.list_files(&folder).await.unwrap_err();
    assert!(matches!(err, DeviceError::NotFound(_)));
}

#[tokio::test]
async fn test_fetch_photo_returns_bytes_and_declared_len() {
    let server = MockServer::start().await;
    common::mount_ricoh_listing(&server, two_folder_listing()).await;
    let content = b"fake jpeg bytes".to_vec();
    common::mount_ricoh_content(&server, "102_1026", "_AMP9018.JPG", &content).await;
    let provider = common::ricoh_provider(&server, PhotoFormat::Jpg);

    let folder = "102_1026".parse().unwrap();
    let files = provider.list_files(&folder).await.unwrap();
    let photo = provider.fetch_photo(&files[0]).await.unwrap();

    assert_eq!(photo.data, content);
    assert_eq!(photo.declared_len, Some(content.len() as u64));
    assert!(photo.is_complete());
}

#[tokio::test]
async fn test_fetch_missing_photo_is_not_found() {
    let server = MockServer::start().await;
    common::mount_ricoh_listing(&server, two_folder_listing()).await;
    // No content mock mounted: wiremock answers 404.
    let provider = common::ricoh_provider(&server, PhotoFormat::All);

    let folder = "101_0412".parse().unwrap();
    let files = provider.list_files(&folder).await.unwrap();
    let err = provider.fetch_photo(&files[0]).await.unwrap_err();
    assert!(matches!(err, DeviceError::NotFound(_)));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn test_malformed_listing_is_protocol_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/photos"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>rebooting</html>"))
        .mount(&server)
        .await;
    let provider = common::ricoh_provider(&server, PhotoFormat::All);

    let err = provider.list_folders().await.unwrap_err();
    assert!(matches!(err, DeviceError::Protocol(_)));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_server_error_is_transient_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/photos"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let provider = common::ricoh_provider(&server, PhotoFormat::All);

    let err = provider.list_folders().await.unwrap_err();
    assert!(matches!(err, DeviceError::Http { status: 503, .. }));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_unreachable_device_maps_to_unreachable() {
    // Point the provider at a server that is no longer listening.
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let client = shutterlink_camera::client::CameraClient::new(
        uri,
        std::time::Duration::from_secs(1),
    )
    .unwrap();
    let provider = shutterlink_camera::provider::CameraDeviceProvider::new(
        client,
        shutterlink_camera::profile::DeviceProfile::RicohWifi {
            storage: shutterlink_camera::profile::SdSlot::Sd2,
        },
        PhotoFormat::All,
    );

    let err = provider.list_folders().await.unwrap_err();
    assert!(matches!(err, DeviceError::Unreachable(_)));
    assert!(err.is_transient());
}
