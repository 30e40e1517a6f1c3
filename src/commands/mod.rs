mod mask;
mod trace;
mod utils;

use crate::cli::{Cli, Commands};
use vectrace::VectraceResult;

/// The main function to run the command based on CLI input.
pub fn run(cli: Cli) -> VectraceResult<()> {
    dispatch(cli.command)
}

/// Dispatch the command to the appropriate handler.
fn dispatch(command: Commands) -> VectraceResult<()> {
    match command {
        Commands::Trace(cmd) => trace::run(cmd),
        Commands::Mask(cmd) => mask::run(cmd),
    }
}
