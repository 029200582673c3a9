//! Shutterlink Core - Domain logic and business rules
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain types** - `PhotoEntry`, `ImportState`, validated newtypes
//! - **Port definitions** - Traits for adapters: `ICameraDevice`, `IImportLedger`
//! - **Configuration** - Typed config loaded from YAML
//!
//! # Architecture
//!
//! This crate follows the hexagonal (ports & adapters) architecture pattern.
//! The domain module contains pure import bookkeeping with no I/O.
//! Ports define trait interfaces that adapter crates implement: the camera
//! web API lives behind [`ports::camera_device::ICameraDevice`] and the
//! durable download ledger behind [`ports::import_ledger::IImportLedger`].

pub mod config;
pub mod domain;
pub mod ports;
