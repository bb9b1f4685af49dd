use anyhow::{anyhow, Result};
use serde_json::Value;

/// A parsed `$ref` string.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Reference<'a> {
    /// `#/json/pointer`, a location within the referring document.
    Internal { pointer: &'a str },

    /// `other.yaml#/json/pointer`, a location within another document, relative to the referring
    /// document's directory. An empty pointer refers to the whole document.
    External { file: &'a str, pointer: &'a str },

    /// Anything with a URL scheme.
    Remote(&'a str),
}

impl<'a> Reference<'a> {
    pub fn parse(reference: &'a str) -> Self {
        let (file, pointer) = match reference.split_once('#') {
            Some((file, pointer)) => (file, pointer),
            None => (reference, ""),
        };
        if file.is_empty() {
            Reference::Internal { pointer }
        } else if file.contains("://") {
            Reference::Remote(reference)
        } else {
            Reference::External { file, pointer }
        }
    }
}

/// The `$ref` string of `value`, if `value` is a reference object. Sibling members of `$ref` are
/// ignored.
pub fn target(value: &Value) -> Option<&str> {
    value.as_object()?.get("$ref")?.as_str()
}

/// Looks up `pointer` (RFC 6901) in `root`. An empty pointer is `root` itself.
pub fn lookup<'v>(root: &'v Value, pointer: &str) -> Result<&'v Value> {
    if pointer.is_empty() {
        return Ok(root);
    }
    if !pointer.starts_with('/') {
        return Err(anyhow!("invalid JSON pointer '{}'", pointer));
    }
    root.pointer(pointer)
        .ok_or_else(|| anyhow!("target '#{}' does not exist", pointer))
}

/// Escapes a key for use as a JSON pointer segment.
pub fn escape(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}
