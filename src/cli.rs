use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use vectrace::{ChainApproximation, DEFAULT_THRESHOLD, TraceSettings};

/// Environment variable for the binarization cutoff.
pub const ENV_THRESHOLD: &str = "VECTRACE_THRESHOLD";
/// Environment variable that inverts polarity.
pub const ENV_INVERT: &str = "VECTRACE_INVERT";
/// Environment variable that disables simplification.
pub const ENV_NO_SIMPLIFY: &str = "VECTRACE_NO_SIMPLIFY";
/// Environment variable that disables smoothing.
pub const ENV_NO_SMOOTH: &str = "VECTRACE_NO_SMOOTH";
/// Environment variable for the chain approximation.
pub const ENV_APPROXIMATION: &str = "VECTRACE_APPROXIMATION";

/// Command line interface definition.
#[derive(Parser, Debug)]
#[command(author, version, about, propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug)]
pub struct GlobalOptions {
    /// Log pipeline details (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Trace an image into an SVG document
    Trace(TraceCommand),
    /// Export the binarized bitmap as a PNG
    Mask(MaskCommand),
}

#[derive(Args, Debug)]
pub struct TraceCommand {
    /// Input image path
    pub input: PathBuf,
    /// Output SVG path (defaults to input name with `.svg`)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    #[command(flatten)]
    pub settings: TraceSettingsArgs,
}

#[derive(Args, Debug)]
pub struct MaskCommand {
    /// Input image path
    pub input: PathBuf,
    /// Output path (defaults to `<name>-mask.png`)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    #[command(flatten)]
    pub settings: TraceSettingsArgs,
}

#[derive(Args, Debug)]
pub struct TraceSettingsArgs {
    /// Binarization threshold (0-255 or 0.0-1.0)
    #[arg(short, long, env = ENV_THRESHOLD, default_value_t = DEFAULT_THRESHOLD, value_parser = parse_threshold)]
    pub threshold: u8,
    /// Treat pixels at or below the threshold as foreground
    #[arg(long, env = ENV_INVERT)]
    pub invert: bool,
    /// Keep every traced point instead of simplifying boundaries
    #[arg(long = "no-simplify", env = ENV_NO_SIMPLIFY)]
    pub no_simplify: bool,
    /// Skip the closing/opening pass before tracing
    #[arg(long = "no-smooth", env = ENV_NO_SMOOTH)]
    pub no_smooth: bool,
    /// Border points kept by the contour tracer
    #[arg(long, value_enum, env = ENV_APPROXIMATION, default_value_t = ApproximationArg::Simple)]
    pub approximation: ApproximationArg,
}

impl From<&TraceSettingsArgs> for TraceSettings {
    fn from(args: &TraceSettingsArgs) -> Self {
        TraceSettings::default()
            .with_threshold(args.threshold)
            .with_invert(args.invert)
            .with_simplify(!args.no_simplify)
            .with_smooth(!args.no_smooth)
            .with_approximation(args.approximation.into())
    }
}

/// Chain approximation modes for contour tracing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ApproximationArg {
    None,
    Simple,
}

impl From<ApproximationArg> for ChainApproximation {
    fn from(value: ApproximationArg) -> Self {
        match value {
            ApproximationArg::None => ChainApproximation::None,
            ApproximationArg::Simple => ChainApproximation::Simple,
        }
    }
}

fn parse_threshold(value: &str) -> Result<u8, String> {
    if let Ok(int_value) = value.parse::<u8>() {
        return Ok(int_value);
    }

    let float_value = value
        .parse::<f32>()
        .map_err(|_| format!("threshold must be numeric (0-255 or 0.0-1.0), got `{value}`"))?;

    if (0.0..=1.0).contains(&float_value) {
        let scaled = (float_value * 255.0).round() as i32;
        return Ok(scaled.clamp(0, 255) as u8);
    }

    if float_value.fract().abs() <= f32::EPSILON && (0.0..=255.0).contains(&float_value) {
        return Ok(float_value as u8);
    }

    Err(format!(
        "threshold {value} is out of range; expected 0-255 or 0.0-1.0"
    ))
}
