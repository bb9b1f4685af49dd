use std::path::Path;

use anyhow::Result;

pub use buffer::Buffer;
pub use file::File;
pub use glob::Glob;

use crate::model::Chunk;

mod buffer;
mod file;
mod glob;

/// An [Input] hands a single API description document to the [crate::Executor].
///
/// Each pipeline invocation processes exactly one [Input]. Sources that yield many documents
/// (e.g. [Glob]) expose them as a list of [Input]s, each of which is run independently.
///
/// Reading is deferred to [Input::read] so that configuration problems are reported before any
/// document is touched.
pub trait Input {
    /// Identifies the document relative to the input root.
    fn chunk(&self) -> &Chunk;

    /// Directory that relative cross-document references are resolved against.
    fn base_dir(&self) -> Option<&Path>;

    fn read(&self) -> Result<String>;
}
