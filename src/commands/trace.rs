use tracing::info;
use vectrace::{TraceStatus, VectraceResult};

use crate::cli::TraceCommand;

use super::utils::{build_vectrace, derive_svg_path};

/// The main function to run the trace command.
pub fn run(cmd: TraceCommand) -> VectraceResult<()> {
    let vectrace = build_vectrace(&cmd.settings);
    let output_path = cmd
        .output
        .clone()
        .unwrap_or_else(|| derive_svg_path(&cmd.input));

    let traced = vectrace.vectorize(&cmd.input)?;
    traced.document.save(&output_path)?;

    match traced.document.status() {
        TraceStatus::Traced { paths, boundaries } => {
            println!("detected {boundaries} contours");
            info!(paths, boundaries, stats = ?traced.stats, "trace complete");
        }
        TraceStatus::Empty => {
            println!("detected 0 contours");
            info!("no foreground found; wrote an empty document");
        }
    }
    println!("SVG saved to {}", output_path.display());

    Ok(())
}
