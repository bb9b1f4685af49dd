use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};

use crate::model::Chunk;
use crate::output::Output;

/// Writes each chunk to its own file underneath a root directory, creating directories as needed.
///
/// The root may already hold files, e.g. artifacts from other documents or earlier runs. Files
/// with the same path are replaced.
#[derive(Debug, Default)]
pub struct FileSet {
    root: PathBuf,
    current: Option<fs::File>,
}

impl FileSet {
    pub fn new<P: Into<PathBuf>>(root: P) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .with_context(|| format!("failed to create output root '{}'", root.display()))?;
        if !root.is_dir() {
            bail!("output root '{}' is not a directory", root.display());
        }
        Ok(Self {
            root,
            current: None,
        })
    }
}

impl Output for FileSet {
    /// Closes the previous file, if any, and creates the file named by `chunk`.
    fn write_chunk(&mut self, chunk: &Chunk) -> Result<()> {
        self.current = None;
        let relative_path = chunk
            .relative_file_path
            .as_ref()
            .ok_or_else(|| anyhow!("cannot write chunk '{}' without a file path", chunk))?;
        let path = self.root.join(relative_path);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let file = fs::File::create(&path)
            .with_context(|| format!("failed to create '{}'", path.display()))?;
        self.current = Some(file);
        Ok(())
    }

    fn write_str(&mut self, data: &str) -> Result<()> {
        let file = self
            .current
            .as_mut()
            .ok_or_else(|| anyhow!("no chunk to write to"))?;
        file.write_all(data.as_bytes())?;
        Ok(())
    }
}
