use anyhow::{bail, Result};
use clap::Parser;
use itertools::Itertools;
use log::{error, info, warn};
use rayon::prelude::*;
use swagpipe::input::File;
use swagpipe::output::{FileSet, StdOut};
use swagpipe::{Executor, Input, Output};

use crate::config::Config;

mod config;

fn main() -> Result<()> {
    env_logger::init();
    let config = Config::parse();
    let executor = Executor::new(config.options()?.finalize()?)?;
    let input = swagpipe::input::Glob::new(&config.input)?;
    let mut output = output(&config)?;
    run(&executor, input.files(), output.as_mut())
}

fn output(config: &Config) -> Result<Box<dyn Output>> {
    if config.dry_run {
        Ok(Box::new(StdOut::default()))
    } else {
        Ok(Box::new(FileSet::new(&config.output_root)?))
    }
}

/// Documents are processed in parallel, then delivered in input order. Every document is
/// attempted even if others fail.
fn run(executor: &Executor, files: &[File], output: &mut dyn Output) -> Result<()> {
    if files.is_empty() {
        warn!("No documents matched the input glob");
        return Ok(());
    }
    info!("Processing {} document(s)...", files.len());
    let artifacts = files
        .par_iter()
        .map(|file| executor.process(file))
        .collect::<Vec<_>>();

    let mut failed = vec![];
    for (file, artifact) in files.iter().zip(artifacts) {
        let result =
            artifact.and_then(|artifact| executor.deliver(file.chunk(), &artifact, output));
        if let Err(err) = result {
            error!("{}: {}", file.chunk(), err);
            failed.push(file.chunk());
        }
    }
    if !failed.is_empty() {
        bail!(
            "{} of {} document(s) failed: {}",
            failed.len(),
            files.len(),
            failed.iter().join(", ")
        );
    }
    Ok(())
}
