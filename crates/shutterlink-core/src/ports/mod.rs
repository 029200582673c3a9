//! Port definitions (hexagonal architecture interfaces)
//!
//! This module defines the port traits that form the boundaries of the
//! hexagonal architecture. Ports are interfaces that the domain core
//! depends on, but whose implementations live in adapter crates.
//!
//! ## Ports Overview
//!
//! - [`ICameraDevice`] - Camera web API: catalog listing and content fetch
//! - [`IImportLedger`] - Durable storage for the downloaded-set ledger

pub mod camera_device;
pub mod import_ledger;

pub use camera_device::ICameraDevice;
pub use import_ledger::IImportLedger;
