//! Integration tests for the FluCard profile
//!
//! Verifies the refresh-then-list handshake, folder derivation from
//! photo URLs, and content fetch through the absolute URLs the card
//! hands out.

use shutterlink_core::domain::errors::DeviceError;
use shutterlink_core::ports::camera_device::ICameraDevice;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common;

fn listing_body(server_uri: &str) -> String {
    format!(
        "{uri}/DCIM/100__07/ABCD1234.jpg<br>\n\
         {uri}/DCIM/100__07/ABCD1235.jpg<br>\n\
         {uri}/DCIM/101__07/ABCD0001.jpg<br>\n",
        uri = server_uri
    )
}

#[tokio::test]
async fn test_list_folders_in_first_appearance_order() {
    let server = MockServer::start().await;
    common::mount_flucard_listing(&server, &listing_body(&server.uri())).await;
    let provider = common::flucard_provider(&server);

    let folders = provider.list_folders().await.unwrap();
    let names: Vec<&str> = folders.iter().map(|f| f.as_str()).collect();
    assert_eq!(names, vec!["100__07", "101__07"]);
}

#[tokio::test]
async fn test_list_files_scoped_to_folder() {
    let server = MockServer::start().await;
    common::mount_flucard_listing(&server, &listing_body(&server.uri())).await;
    let provider = common::flucard_provider(&server);

    let folder = "100__07".parse().unwrap();
    let files = provider.list_files(&folder).await.unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0].name.as_str(), "ABCD1234.jpg");
    assert_eq!(files[1].name.as_str(), "ABCD1235.jpg");
}

#[tokio::test]
async fn test_fetch_photo_follows_absolute_url() {
    let server = MockServer::start().await;
    common::mount_flucard_listing(&server, &listing_body(&server.uri())).await;

    let content = b"flucard jpeg".to_vec();
    Mock::given(method("GET"))
        .and(path("/DCIM/100__07/ABCD1234.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(content.clone()))
        .mount(&server)
        .await;

    let provider = common::flucard_provider(&server);
    let folder = "100__07".parse().unwrap();
    let files = provider.list_files(&folder).await.unwrap();
    let photo = provider.fetch_photo(&files[0]).await.unwrap();
    assert_eq!(photo.data, content);
}

#[tokio::test]
async fn test_failed_refresh_fails_listing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cgi-bin/refresh"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let provider = common::flucard_provider(&server);

    let err = provider.list_folders().await.unwrap_err();
    assert!(matches!(err, DeviceError::Http { status: 500, .. }));
}

#[tokio::test]
async fn test_empty_card_lists_no_folders() {
    let server = MockServer::start().await;
    common::mount_flucard_listing(&server, "").await;
    let provider = common::flucard_provider(&server);

    let folders = provider.list_folders().await.unwrap();
    assert!(folders.is_empty());
}
