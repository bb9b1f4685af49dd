use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

#[derive(Default, Debug, Clone, Eq, PartialEq, Hash)]
pub struct Chunk {
    /// Relative path including file name from a common root path shared by the other [Chunk]s
    /// from the [crate::Input]. Used to name the document in diagnostics and to decide where the
    /// artifact generated from it is written.
    pub relative_file_path: Option<PathBuf>,
}

impl Chunk {
    pub fn with_relative_file_path<P: Into<PathBuf>>(relative_file_path: P) -> Self {
        Self {
            relative_file_path: Some(relative_file_path.into()),
        }
    }

    /// A chunk in the same relative directory as this one, named `file_name`.
    pub fn sibling(&self, file_name: &str) -> Self {
        match self.relative_file_path.as_deref().and_then(Path::parent) {
            Some(parent) => Self::with_relative_file_path(parent.join(file_name)),
            None => Self::with_relative_file_path(file_name),
        }
    }
}

impl Display for Chunk {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.relative_file_path {
            Some(path) => write!(f, "{}", path.display()),
            None => write!(f, "<buffer>"),
        }
    }
}
