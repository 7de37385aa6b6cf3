//! Service adapters: OS/runtime specific implementations (process + async IO).

pub mod dcd;

pub use dcd::{parse_candidates, DcdError, DcdService};
