//! Shared test helpers for camera API integration tests
//!
//! Provides wiremock-based mock server setup for the Ricoh/Pentax and
//! FluCard endpoint families. Each helper mounts the necessary mock
//! endpoints and returns a provider pointed at the mock server.

use std::time::Duration;

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shutterlink_camera::client::CameraClient;
use shutterlink_camera::profile::{DeviceProfile, PhotoFormat, SdSlot};
use shutterlink_camera::provider::CameraDeviceProvider;

/// Builds a provider for the Ricoh profile pointed at the mock server.
pub fn ricoh_provider(server: &MockServer, format: PhotoFormat) -> CameraDeviceProvider {
    let client = CameraClient::new(server.uri(), Duration::from_secs(5)).unwrap();
    CameraDeviceProvider::new(
        client,
        DeviceProfile::RicohWifi {
            storage: SdSlot::Sd2,
        },
        format,
    )
}

/// Builds a provider for the FluCard profile pointed at the mock server.
pub fn flucard_provider(server: &MockServer) -> CameraDeviceProvider {
    let client = CameraClient::new(server.uri(), Duration::from_secs(5)).unwrap();
    CameraDeviceProvider::new(client, DeviceProfile::FluCard, PhotoFormat::All)
}

/// Mounts the Ricoh photo-listing endpoint with the given JSON body.
pub async fn mount_ricoh_listing(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/v1/photos"))
        .and(query_param("storage", "sd2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Mounts a Ricoh content endpoint for one folder/file pair.
pub async fn mount_ricoh_content(server: &MockServer, folder: &str, file: &str, content: &[u8]) {
    Mock::given(method("GET"))
        .and(path(format!("/v1/photos/{folder}/{file}")))
        .and(query_param("storage", "sd2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(content.to_vec())
                .append_header("Content-Type", "application/octet-stream"),
        )
        .mount(server)
        .await;
}

/// Mounts the FluCard refresh poke and photo list endpoints.
pub async fn mount_flucard_listing(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/cgi-bin/refresh"))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/cgi-bin/photolist"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body.to_string()))
        .mount(server)
        .await;
}
