use std::io::{stdout, Write};

use anyhow::Result;

use crate::model::Chunk;
use crate::output::Output;

/// Prints artifacts to stdout, each preceded by a header line naming its target.
#[derive(Debug, Default)]
pub struct StdOut {}

impl Output for StdOut {
    fn write_chunk(&mut self, chunk: &Chunk) -> Result<()> {
        writeln!(stdout().lock(), "// {}", chunk)?;
        Ok(())
    }

    fn write_str(&mut self, data: &str) -> Result<()> {
        let mut out = stdout().lock();
        out.write_all(data.as_bytes())?;
        out.write_all(b"\n")?;
        Ok(())
    }
}
