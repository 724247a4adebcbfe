//! dashsync Core - Domain types and ports
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain entities** - `Resource`, `Folder`, `DashboardWrapper`
//! - **Port definitions** - Traits for adapters: `RemoteGateway`, `Notifier`
//! - **Configuration** - YAML configuration with environment overrides
//!
//! # Architecture
//!
//! The domain module contains plain data types with no I/O.
//! Ports define trait interfaces that adapter crates implement.
//! The sync crate orchestrates domain types through port interfaces.

pub mod config;
pub mod domain;
pub mod ports;
