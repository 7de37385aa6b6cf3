//! A file-backed document: the buffer plus the path the daemon is told about.

use super::TextBuffer;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Clone)]
pub struct Document {
    path: PathBuf,
    buffer: TextBuffer,
}

impl Document {
    pub fn new(path: PathBuf, buffer: TextBuffer) -> Self {
        Self { path, buffer }
    }

    /// Load a document from disk. The daemon re-reads the file itself, so
    /// the path should be the one the file is actually stored under.
    pub fn open(path: &Path) -> io::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            buffer: TextBuffer::from_text(&text),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }
}
