//! Composition root: wire configuration into a running pipeline.

use crate::config::Config;
use crate::defaults;
use crate::device::{DeviceCapability, SystemCommandExecutor, TermuxDevice};
use crate::pipeline::{CdisPipeline, PipelineResult};
use crate::preprocess::ImagePreprocessor;
use crate::remote::{FalconInstructionClient, OpenAiDescriptionClient};
use crate::runner::ContinuousRunner;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

/// Build the production pipeline from configuration.
///
/// The device handle is returned separately so callers can speak outside
/// of pipeline invocations (welcome message, shutdown notices).
fn build_pipeline(config: &Config) -> Result<(Arc<dyn DeviceCapability>, Arc<CdisPipeline>)> {
    let device: Arc<dyn DeviceCapability> = Arc::new(TermuxDevice::new(
        SystemCommandExecutor,
        config.resolved_capture_dir(),
    ));

    let mut preprocessor = ImagePreprocessor::new(config.image.jpeg_quality);
    if let Some(dir) = &config.image.scratch_dir {
        preprocessor = preprocessor.with_scratch_dir(dir.clone());
    }

    let describer = OpenAiDescriptionClient::from_config(config.describe.clone())?;
    let instructor = FalconInstructionClient::from_config(config.instruct.clone())?;

    let pipeline = CdisPipeline::new(
        device.clone(),
        preprocessor,
        Arc::new(describer),
        Arc::new(instructor),
    )
    .with_camera(config.camera.selector)
    .with_target_size(config.image.target_size);

    Ok((device, Arc::new(pipeline)))
}

fn print_result(result: &PipelineResult, quiet: bool) {
    if quiet {
        return;
    }
    match result {
        PipelineResult::Success {
            description,
            instruction,
            spoken,
        } => {
            println!("Scene: {}", description);
            println!("Guidance: {}", instruction);
            if !spoken {
                eprintln!("(text-to-speech unavailable; guidance shown only)");
            }
        }
        PipelineResult::PartialFailure {
            stage,
            description,
            message,
        } => {
            if let Some(description) = description {
                println!("Scene: {}", description);
            }
            eprintln!("{} stage failed: {}", stage, message);
        }
        PipelineResult::Failure { stage, message } => {
            eprintln!("{} stage failed: {}", stage, message);
        }
    }
}

/// Run a single capture-describe-instruct-speak cycle.
///
/// Exits with an error on a hard failure so scripts can tell silence from
/// success.
pub async fn run_once_command(config: Config, quiet: bool) -> Result<()> {
    let (_device, pipeline) = build_pipeline(&config)?;
    let result = pipeline.run_once().await;
    print_result(&result, quiet);
    if let PipelineResult::Failure { stage, message } = result {
        anyhow::bail!("{} failed: {}", stage, message);
    }
    Ok(())
}

/// Run cycles continuously until Ctrl-C or a hard failure.
pub async fn run_walk_command(
    config: Config,
    interval_override: Option<u64>,
    quiet: bool,
) -> Result<()> {
    let (device, pipeline) = build_pipeline(&config)?;
    let interval = Duration::from_secs(interval_override.unwrap_or(config.runner.interval_secs));

    // Greet before the first capture so the user knows the loop is live.
    if let Err(e) = device.speak(defaults::WELCOME_MESSAGE) {
        tracing::warn!(error = %e, "could not speak welcome message");
    }
    if !quiet {
        println!("{}", defaults::WELCOME_MESSAGE);
        println!("Press Ctrl-C to stop.");
    }

    let runner = ContinuousRunner::new(pipeline, interval);
    let rx = runner.subscribe();
    let printer = std::thread::spawn(move || {
        for result in rx.iter() {
            print_result(&result, quiet);
        }
    });

    runner.start();

    // Wait for Ctrl-C or for the runner to stop itself on a hard failure.
    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                signal?;
                if !quiet {
                    eprintln!("Stopping...");
                }
                break;
            }
            _ = tokio::time::sleep(Duration::from_millis(250)) => {
                if !runner.is_running() {
                    break;
                }
            }
        }
    }

    runner.stop().await;
    drop(runner);
    if printer.join().is_err() {
        tracing::warn!("result printer thread panicked");
    }
    Ok(())
}
