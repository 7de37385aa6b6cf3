//! Pure contracts/types used across kernel + adapters.

pub mod completion;
pub mod config;
pub mod project;

pub use completion::{
    Candidate, CompletionModel, InvocationKind, NodeRef, Position, QueryRange,
};
pub use config::DcdConfig;
pub use project::DcdProjectSettings;
