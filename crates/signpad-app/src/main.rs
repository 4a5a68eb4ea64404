//! Main application entry point (native).
//!
//! Usage: `signpad <script.json> [output.png]`

use clap::Parser;
use signpad_app::{Script, ScriptError, replay};
use signpad_core::SignatureArtifact;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "signpad",
    about = "Replay a pointer script through the signature pad and write the PNG"
)]
struct Cli {
    /// Pointer script (JSON)
    script: PathBuf,

    /// Output PNG, defaults to the script path with a `.png` extension
    output: Option<PathBuf>,
}

impl Cli {
    fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.script.with_extension("png"))
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    env_logger::init();
    log::info!("Starting signpad");

    match run(&cli.script, &cli.output_path()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(script_path: &Path, output_path: &Path) -> Result<(), ScriptError> {
    let script = Script::load(script_path)?;
    let outcome = replay(&script)?;

    log::info!(
        "Replayed {} steps: {} notifications, ink: {}",
        script.steps.len(),
        outcome.notifications.len(),
        outcome.has_ink
    );

    // Write what the form would hold; fall back to the live surface.
    let captured = outcome
        .current_signature()
        .map(SignatureArtifact::from_data_uri)
        .transpose()?;
    let artifact = match captured {
        Some(artifact) => artifact,
        None => {
            log::warn!("No signature captured, writing current surface");
            outcome.final_surface
        }
    };

    std::fs::write(output_path, artifact.png()).map_err(|e| {
        ScriptError::Io(format!("Failed to write {}: {}", output_path.display(), e))
    })?;
    log::info!(
        "Exported PNG to: {:?} ({}x{})",
        output_path,
        artifact.width(),
        artifact.height()
    );
    Ok(())
}
