//! Data model layer.

pub mod document;
pub mod text_buffer;

pub use document::Document;
pub use text_buffer::{slice_to_cow, TextBuffer};
