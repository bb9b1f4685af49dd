use std::fmt::Debug;

use anyhow::Result;

pub use buffer::Buffer;
pub use file_set::FileSet;
pub use stdout::StdOut;

use crate::model::Chunk;

mod buffer;
mod file_set;
mod stdout;

/// Receives the artifact produced by the [crate::Executor].
///
/// The executor first selects the target with [Output::write_chunk] and then writes the artifact
/// text. The core never touches storage itself.
pub trait Output: Debug {
    /// Starts a new target at `chunk`'s `relative_file_path`.
    fn write_chunk(&mut self, chunk: &Chunk) -> Result<()>;

    fn write_str(&mut self, data: &str) -> Result<()>;
}
