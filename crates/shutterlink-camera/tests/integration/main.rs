//! Integration tests for shutterlink-camera
//!
//! Uses wiremock to simulate the camera's web API and verifies
//! end-to-end behavior of the CameraDeviceProvider for both supported
//! device families: catalog listing, content fetch, and error mapping.

mod common;

mod test_flucard;
mod test_ricoh;
