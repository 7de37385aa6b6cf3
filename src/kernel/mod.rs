//! Headless completion core (model + services).

pub mod completion;
pub mod services;

pub use completion::{DcdCompletion, GROUP_TITLE};
