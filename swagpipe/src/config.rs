use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ConfigError;
use crate::generator::Mode;

/// User-facing run options, typically read from a JSON file and/or command line flags.
///
/// Nothing here is trusted until [Options::finalize] turns it into a [RunConfig].
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Options {
    /// File name of the artifact, placed next to the input document's relative path.
    pub filename: Option<String>,

    /// Generate source code instead of writing the resolved document as JSON.
    pub codegen: Option<CodegenOptions>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CodegenOptions {
    /// Defaults to [Mode::Custom].
    #[serde(rename = "type")]
    pub mode: Option<Mode>,
    pub module_name: Option<String>,
    pub class_name: Option<String>,
    pub template: Option<TemplateSource>,

    /// Extra values made available to templates.
    pub mustache: Map<String, Value>,
}

/// Where template text comes from: either a single class template, or separate class, method
/// and request templates, each optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TemplateSource {
    Class(PathBuf),
    Parts {
        #[serde(default)]
        class: Option<PathBuf>,
        #[serde(default)]
        method: Option<PathBuf>,
        #[serde(default)]
        request: Option<PathBuf>,
    },
}

/// Template text. Fragments that were not supplied are empty.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Templates {
    pub class: String,
    pub method: String,
    pub request: String,
}

impl Templates {
    pub fn load(source: Option<&TemplateSource>) -> Result<Self, ConfigError> {
        match source {
            None => Ok(Self::default()),
            Some(TemplateSource::Class(class)) => Ok(Self {
                class: load_template(Some(class))?,
                ..Default::default()
            }),
            Some(TemplateSource::Parts {
                class,
                method,
                request,
            }) => Ok(Self {
                class: load_template(class.as_deref())?,
                method: load_template(method.as_deref())?,
                request: load_template(request.as_deref())?,
            }),
        }
    }

    /// True when no fragment has any text.
    pub fn is_empty(&self) -> bool {
        self.class.is_empty() && self.method.is_empty() && self.request.is_empty()
    }
}

/// Loads template text from `path`, or returns an empty string if no path was supplied.
pub fn load_template(path: Option<&Path>) -> Result<String, ConfigError> {
    match path {
        None => Ok(String::new()),
        Some(path) => fs::read_to_string(path).map_err(|source| ConfigError::Template {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Validated configuration for an [crate::Executor].
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub filename: String,
    pub target: Target,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    /// Serialize the fully-resolved document.
    Json,

    /// Generate source code from the fully-resolved document.
    Code(GenerationConfig),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    pub mode: Mode,
    pub module_name: Option<String>,
    pub class_name: Option<String>,
    pub templates: Templates,
    pub mustache: Map<String, Value>,
}

impl Options {
    /// Checks the options and loads any template files.
    pub fn finalize(self) -> Result<RunConfig, ConfigError> {
        let filename = self
            .filename
            .filter(|filename| !filename.is_empty())
            .ok_or(ConfigError::MissingFilename)?;
        let target = match self.codegen {
            None => Target::Json,
            Some(codegen) => Target::Code(codegen.finalize()?),
        };
        let config = RunConfig { filename, target };
        debug!("Run Config: {:#?}", config);
        Ok(config)
    }
}

impl CodegenOptions {
    fn finalize(self) -> Result<GenerationConfig, ConfigError> {
        let mode = self.mode.unwrap_or_default();
        let templates = Templates::load(self.template.as_ref())?;
        if mode == Mode::Custom && templates.is_empty() {
            return Err(ConfigError::MissingTemplate);
        }
        Ok(GenerationConfig {
            mode,
            module_name: self.module_name,
            class_name: self.class_name,
            templates,
            mustache: self.mustache,
        })
    }
}
