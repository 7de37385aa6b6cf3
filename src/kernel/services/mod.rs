//! Services layer (ports + adapters).
//!
//! - `ports`: pure contracts/types used across the crate.
//! - `adapters`: OS/runtime specific implementations (process + async IO).

pub mod adapters;
pub mod ports;
