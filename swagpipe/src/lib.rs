pub use config::{CodegenOptions, GenerationConfig, Options, RunConfig, Target, TemplateSource, Templates};
pub use error::{ConfigError, Error, ErrorKind};
pub use executor::Executor;
pub use generator::{EmitSettings, Emitter, EntryPoint, Mode};
pub use input::Input;
pub use output::Output;
pub use resolver::{Policy, Resolver};
pub use validate::{Checker, Finding, ValidationResult, Verdict};

pub mod config;
pub mod error;
pub mod executor;
pub mod generator;
pub mod input;
pub mod model;
pub mod output;
pub mod resolver;
pub mod validate;

#[cfg(test)]
pub mod test_util;
