use vectrace::VectraceResult;

use crate::cli::MaskCommand;

use super::utils::{build_vectrace, derive_variant_path};

/// The main function to run the mask command.
pub fn run(cmd: MaskCommand) -> VectraceResult<()> {
    let vectrace = build_vectrace(&cmd.settings);
    let output_path = cmd
        .output
        .clone()
        .unwrap_or_else(|| derive_variant_path(&cmd.input, "mask", "png"));

    let bitmap = vectrace.for_image(&cmd.input)?.processed();
    bitmap.save(&output_path)?;
    println!("Mask PNG saved to {}", output_path.display());

    Ok(())
}
