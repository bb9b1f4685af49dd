use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};

use crate::input::Input;
use crate::model::Chunk;

/// A single document on the file system.
#[derive(Debug, Clone)]
pub struct File {
    path: PathBuf,
    chunk: Chunk,
}

impl File {
    /// The chunk is named after the file name alone.
    pub fn new<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let path = path.into();
        let file_name = path
            .file_name()
            .ok_or_else(|| anyhow!("'{}' is not a file path", path.display()))?
            .to_owned();
        Ok(Self {
            chunk: Chunk::with_relative_file_path(file_name),
            path,
        })
    }

    /// A file at `root/relative_path`, with a chunk named by `relative_path`.
    pub fn with_root<P: AsRef<Path>, R: Into<PathBuf>>(root: P, relative_path: R) -> Self {
        let relative_path = relative_path.into();
        Self {
            path: root.as_ref().join(&relative_path),
            chunk: Chunk::with_relative_file_path(relative_path),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Input for File {
    fn chunk(&self) -> &Chunk {
        &self.chunk
    }

    fn base_dir(&self) -> Option<&Path> {
        self.path.parent()
    }

    fn read(&self) -> Result<String> {
        fs::read_to_string(&self.path).with_context(|| {
            format!(
                "Failed to open input file for read: {}",
                self.path.display()
            )
        })
    }
}
