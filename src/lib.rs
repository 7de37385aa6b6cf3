//! dcd-bridge - editor-agnostic completion bridge for the D Completion Daemon.
//!
//! Module structure:
//! - models: buffer and document data model (cursor -> byte offset mapping)
//! - kernel: headless completion core (model + services)
//! - kernel::services::ports: pure contracts/types used across the crate
//! - kernel::services::adapters: process/async implementations (dcd-client)
//! - logging: tracing initialization for binary hosts

pub mod kernel;
pub mod logging;
pub mod models;
