use std::fmt::{Display, Formatter};

use anyhow::Result;

use crate::model::Chunk;
use crate::output::Output;

/// Keeps the artifact in memory along with the chunk it was written to.
#[derive(Debug, Default)]
pub struct Buffer {
    chunk: Option<Chunk>,
    data: String,
}

impl Buffer {
    /// The most recently written chunk, if any.
    pub fn chunk(&self) -> Option<&Chunk> {
        self.chunk.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.chunk.is_none() && self.data.is_empty()
    }
}

impl Display for Buffer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.data)
    }
}

impl Output for Buffer {
    fn write_chunk(&mut self, chunk: &Chunk) -> Result<()> {
        self.chunk = Some(chunk.clone());
        self.data.clear();
        Ok(())
    }

    fn write_str(&mut self, data: &str) -> Result<()> {
        self.data.push_str(data);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;

    use crate::model::Chunk;
    use crate::output::Buffer;
    use crate::Output;

    #[test]
    fn write_appends() -> Result<()> {
        let mut output = Buffer::default();
        output.write_str("abc")?;
        output.write_str("def")?;
        assert_eq!(output.to_string(), "abcdef");
        Ok(())
    }

    #[test]
    fn chunk_starts_fresh() -> Result<()> {
        let mut output = Buffer::default();
        assert!(output.is_empty());
        output.write_chunk(&Chunk::with_relative_file_path("a.json"))?;
        output.write_str("first")?;
        output.write_chunk(&Chunk::with_relative_file_path("b.json"))?;
        output.write_str("second")?;
        assert_eq!(output.to_string(), "second");
        assert_eq!(
            output.chunk(),
            Some(&Chunk::with_relative_file_path("b.json"))
        );
        Ok(())
    }
}
