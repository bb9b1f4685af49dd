use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use serde_json::{Map, Value};

use crate::input::Input;
use crate::model::Chunk;

/// An API description document in one of its resolution states, along with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub value: Value,
    pub chunk: Chunk,

    /// Directory that relative cross-document references are resolved against. `None` for
    /// documents that did not come from the file system.
    pub base_dir: Option<PathBuf>,
}

impl Document {
    pub fn new(value: Value) -> Self {
        Self {
            value,
            chunk: Chunk::default(),
            base_dir: None,
        }
    }

    /// Reads and parses the document behind `input`.
    pub fn load(input: &dyn Input) -> Result<Self> {
        let chunk = input.chunk().clone();
        let data = input
            .read()
            .with_context(|| format!("failed to read document '{}'", chunk))?;
        let value = parse(&data, chunk.relative_file_path.as_deref())
            .with_context(|| format!("failed to parse document '{}'", chunk))?;
        Ok(Self {
            value,
            chunk,
            base_dir: input.base_dir().map(Path::to_path_buf),
        })
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Format {
    Json,
    Yaml,
    Unknown,
}

impl Format {
    fn from_path(path: Option<&Path>) -> Self {
        let extension = path
            .and_then(Path::extension)
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("json") => Format::Json,
            Some("yaml") | Some("yml") => Format::Yaml,
            _ => Format::Unknown,
        }
    }
}

/// Parses document text as JSON or YAML. The format is picked from the extension of `path` when
/// it has one, otherwise JSON is tried before YAML.
pub fn parse(data: &str, path: Option<&Path>) -> Result<Value> {
    match Format::from_path(path) {
        Format::Json => Ok(serde_json::from_str(data)?),
        Format::Yaml => from_yaml(serde_yaml::from_str(data)?),
        Format::Unknown => match serde_json::from_str(data) {
            Ok(value) => Ok(value),
            Err(json_err) => {
                let yaml = serde_yaml::from_str(data).map_err(|yaml_err| {
                    anyhow!(
                        "document is neither JSON ({}) nor YAML ({})",
                        json_err,
                        yaml_err
                    )
                })?;
                from_yaml(yaml)
            }
        },
    }
}

/// YAML allows non-string mapping keys (e.g. unquoted `200:` response codes), JSON does not.
fn from_yaml(value: serde_yaml::Value) -> Result<Value> {
    use serde_yaml::Value as Yaml;
    Ok(match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => serde_json::to_value(n)?,
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(items) => {
            Value::Array(items.into_iter().map(from_yaml).collect::<Result<_>>()?)
        }
        Yaml::Mapping(mapping) => Value::Object(
            mapping
                .into_iter()
                .map(|(key, value)| Ok((yaml_key(key)?, from_yaml(value)?)))
                .collect::<Result<Map<String, Value>>>()?,
        ),
        Yaml::Tagged(tagged) => from_yaml(tagged.value)?,
    })
}

fn yaml_key(key: serde_yaml::Value) -> Result<String> {
    use serde_yaml::Value as Yaml;
    match key {
        Yaml::String(s) => Ok(s),
        Yaml::Number(n) => Ok(n.to_string()),
        Yaml::Bool(b) => Ok(b.to_string()),
        other => bail!("unsupported mapping key: {:?}", other),
    }
}
