use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::input::Input;
use crate::model::Chunk;

/// Stores the whole document in memory.
#[derive(Debug, Default, Clone)]
pub struct Buffer {
    data: String,
    chunk: Chunk,
    base_dir: Option<PathBuf>,
}

impl Buffer {
    pub fn new(data: impl ToString) -> Self {
        Self {
            data: data.to_string(),
            ..Default::default()
        }
    }

    pub fn with_chunk(mut self, chunk: Chunk) -> Self {
        self.chunk = chunk;
        self
    }

    pub fn with_base_dir<P: Into<PathBuf>>(mut self, base_dir: P) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }
}

impl Input for Buffer {
    fn chunk(&self) -> &Chunk {
        &self.chunk
    }

    fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }

    fn read(&self) -> Result<String> {
        Ok(self.data.clone())
    }
}
