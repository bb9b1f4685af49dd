use log::{debug, info};

use crate::config::{GenerationConfig, RunConfig, Target};
use crate::error::{Error, ErrorKind};
use crate::generator::{EmitSettings, Emitter, EntryPoint};
use crate::input::Input;
use crate::model::{Chunk, Document, SchemaIndex};
use crate::output::Output;
use crate::resolver::{Dereferencer, Policy, Resolver};
use crate::validate::{self, Checker, SwaggerChecker};

/// Runs the pipeline for one document at a time:
///
/// 1. resolve cross-document references
/// 2. validate, aborting on any error
/// 3. resolve every remaining reference
/// 4. serialize the document, or extract schemas, build [EmitSettings] and emit code
/// 5. deliver the artifact to an [Output]
///
/// An [Executor] holds no per-document state, so one instance can process any number of
/// documents, concurrently if `R` and `C` allow it.
pub struct Executor<R: Resolver = Dereferencer, C: Checker = SwaggerChecker> {
    filename: String,
    emission: Emission,
    resolver: R,
    checker: C,
}

enum Emission {
    Json,
    Code {
        config: GenerationConfig,
        entry_point: EntryPoint,
    },
}

impl Executor {
    /// An executor with the default engines.
    pub fn new(config: RunConfig) -> Result<Self, Error> {
        Self::with_engines(
            config,
            Dereferencer::default(),
            SwaggerChecker::new().map_err(ErrorKind::Validator)?,
            &Emitter::default(),
        )
    }
}

impl<R: Resolver, C: Checker> Executor<R, C> {
    /// Fails if `emitter` has no entry point for the configured generation mode.
    pub fn with_engines(
        config: RunConfig,
        resolver: R,
        checker: C,
        emitter: &Emitter,
    ) -> Result<Self, Error> {
        let emission = match config.target {
            Target::Json => Emission::Json,
            Target::Code(generation) => {
                let entry_point = emitter
                    .entry_point(generation.mode)
                    .map_err(ErrorKind::Emit)?;
                debug!("Entry point: {}", generation.mode.entry_point_name());
                Emission::Code {
                    config: generation,
                    entry_point,
                }
            }
        };
        Ok(Self {
            filename: config.filename,
            emission,
            resolver,
            checker,
        })
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Produces the artifact for the document behind `input`.
    pub fn process(&self, input: &dyn Input) -> Result<String, Error> {
        let chunk = input.chunk();

        info!("Resolving external references in '{}'...", chunk);
        let document = Document::load(input)
            .and_then(|document| self.resolver.resolve(document, Policy::EXTERNAL))
            .map_err(ErrorKind::Resolve)?;

        info!("Validating '{}'...", chunk);
        let verdict =
            validate::gate(&self.checker, &document.value).map_err(ErrorKind::Validator)?;
        if verdict.is_abort() {
            return Err(ErrorKind::Invalid.into());
        }

        info!("Resolving all references in '{}'...", chunk);
        let document = self
            .resolver
            .resolve(document, Policy::ALL)
            .map_err(ErrorKind::Resolve)?;

        match &self.emission {
            Emission::Json => Ok(document.value.to_string()),
            Emission::Code {
                config,
                entry_point,
            } => {
                info!("Extracting schemas from '{}'...", chunk);
                let index = SchemaIndex::extract(&document.value);
                debug!("Indexed {} path(s)", index.paths().count());
                let settings = EmitSettings::build(config, &document.value, &index);

                info!("Generating {} code for '{}'...", config.mode, chunk);
                let code = entry_point(&settings).map_err(ErrorKind::Emit)?;
                Ok(code)
            }
        }
    }

    /// Processes the document behind `input` and delivers the artifact to `output`. Nothing is
    /// written on failure.
    pub fn execute(&self, input: &dyn Input, output: &mut dyn Output) -> Result<(), Error> {
        let artifact = self.process(input)?;
        self.deliver(input.chunk(), &artifact, output)
    }

    /// Writes `artifact` to `output`, named by the configured filename in the relative
    /// directory of the document `chunk`.
    pub fn deliver(
        &self,
        chunk: &Chunk,
        artifact: &str,
        output: &mut dyn Output,
    ) -> Result<(), Error> {
        let target = chunk.sibling(&self.filename);
        info!("Writing '{}'...", target);
        write_artifact(output, &target, artifact).map_err(ErrorKind::Output)?;
        Ok(())
    }
}

fn write_artifact(output: &mut dyn Output, target: &Chunk, artifact: &str) -> anyhow::Result<()> {
    output.write_chunk(target)?;
    output.write_str(artifact)
}
