use std::{env, path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use breed_viewer::{
    config::ViewerConfig,
    pipeline::{BreedPipeline, preprocess},
    types::CaptureOutcome,
};

fn main() -> ExitCode {
    env_logger::init();

    let paths: Vec<PathBuf> = env::args_os().skip(1).map(PathBuf::from).collect();
    if paths.is_empty() {
        eprintln!("usage: classify-photo <photo>...");
        return ExitCode::from(2);
    }

    match run(&paths) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(paths: &[PathBuf]) -> Result<()> {
    let config = ViewerConfig::from_env();
    let mut pipeline =
        BreedPipeline::from_config(&config).context("failed to prepare classification models")?;

    for path in paths {
        let photo = match preprocess::load_photo(path) {
            Ok(photo) => photo,
            Err(err) => {
                log::error!("skipping {}: {err}", path.display());
                println!("{}: unreadable ({err})", path.display());
                continue;
            }
        };

        let outcome = pipeline.run(&photo);
        println!("{}: {}", path.display(), outcome.notification());
        match &outcome {
            CaptureOutcome::Breed {
                candidates, asset, ..
            } => {
                for candidate in candidates {
                    println!("  #{} {}", candidate.id, candidate.display_text());
                }
                if let Some(asset) = asset {
                    println!("  model: {asset}");
                }
            }
            CaptureOutcome::NotADog {
                top_animal: Some(animal),
            } => println!("  top animal: {}", animal.display_text()),
            _ => {}
        }
    }

    Ok(())
}
