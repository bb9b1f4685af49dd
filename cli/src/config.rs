use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use swagpipe::{Mode, Options, TemplateSource};

#[derive(Parser, Debug, Default)]
#[command(name = "swagpipe", author, version, about)]
pub struct Config {
    /// Unix-style glob of API description documents (JSON or YAML).
    ///
    /// If running in a unix-style shell, you'll need to enclose inside '' or it will be expanded
    /// by the shell itself.
    ///
    /// If the glob is relative, it will be relative to the current working directory.
    #[arg(short, long, value_name = "GLOB")]
    pub input: String,

    /// Path to a [swagpipe::Options] file in json format. Flags override its values.
    #[arg(long, value_name = "JSON")]
    pub config: Option<PathBuf>,

    /// File name of the artifact generated from each document. The artifact is written to the
    /// document's directory relative to the glob root, underneath --output-root.
    #[arg(short, long)]
    pub filename: Option<String>,

    /// Defaults to working directory.
    #[arg(long, default_value = ".")]
    pub output_root: PathBuf,

    /// Generate code in this mode (node, angular or custom) instead of writing the resolved
    /// document as JSON.
    #[arg(short, long, value_name = "MODE")]
    pub codegen: Option<Mode>,

    #[arg(long)]
    pub module_name: Option<String>,

    #[arg(long)]
    pub class_name: Option<String>,

    /// Class template. Shorthand for --class-template.
    #[arg(short, long, conflicts_with = "class_template")]
    pub template: Option<PathBuf>,

    #[arg(long)]
    pub class_template: Option<PathBuf>,

    /// Template registered as the `method` partial.
    #[arg(long)]
    pub method_template: Option<PathBuf>,

    /// Template registered as the `request` partial.
    #[arg(long)]
    pub request_template: Option<PathBuf>,

    /// Print artifacts to stdout instead of writing files.
    #[arg(long)]
    pub dry_run: bool,
}

impl Config {
    /// The --config file, if any, with flags applied on top.
    pub fn options(&self) -> Result<Options> {
        let mut options = match &self.config {
            None => Options::default(),
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("read options file '{}'", path.display()))?;
                serde_json::from_reader(BufReader::new(file))
                    .with_context(|| format!("parse options file '{}'", path.display()))?
            }
        };
        self.apply(&mut options);
        Ok(options)
    }

    fn apply(&self, options: &mut Options) {
        if let Some(filename) = &self.filename {
            options.filename = Some(filename.clone());
        }

        let template = self.template_source();
        if self.codegen.is_none()
            && self.module_name.is_none()
            && self.class_name.is_none()
            && template.is_none()
        {
            return;
        }
        let codegen = options.codegen.get_or_insert_with(Default::default);
        if let Some(mode) = self.codegen {
            codegen.mode = Some(mode);
        }
        if let Some(module_name) = &self.module_name {
            codegen.module_name = Some(module_name.clone());
        }
        if let Some(class_name) = &self.class_name {
            codegen.class_name = Some(class_name.clone());
        }
        if template.is_some() {
            codegen.template = template;
        }
    }

    /// Template flags replace the options file's templates as a whole.
    fn template_source(&self) -> Option<TemplateSource> {
        if let Some(template) = &self.template {
            return Some(TemplateSource::Class(template.clone()));
        }
        if self.class_template.is_none()
            && self.method_template.is_none()
            && self.request_template.is_none()
        {
            return None;
        }
        Some(TemplateSource::Parts {
            class: self.class_template.clone(),
            method: self.method_template.clone(),
            request: self.request_template.clone(),
        })
    }
}
