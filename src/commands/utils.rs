use std::path::{Path, PathBuf};

use vectrace::{TraceSettings, Vectrace};

use crate::cli::TraceSettingsArgs;

/// Build a Vectrace instance from the shared trace flags.
pub fn build_vectrace(args: &TraceSettingsArgs) -> Vectrace {
    Vectrace::new(TraceSettings::from(args))
}

/// Derive a variant file path by appending a suffix before the extension.
pub fn derive_variant_path(input: &Path, suffix: &str, extension: &str) -> PathBuf {
    let mut derived = input.to_path_buf();
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| suffix.to_string());
    derived.set_file_name(format!("{stem}-{suffix}.{extension}"));
    derived
}

/// Derive an SVG file path by changing the extension to "svg".
pub fn derive_svg_path(input: &Path) -> PathBuf {
    input.with_extension("svg")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn svg_path_replaces_extension() {
        assert_eq!(derive_svg_path(Path::new("art/logo.png")), PathBuf::from("art/logo.svg"));
        assert_eq!(derive_svg_path(Path::new("scan")), PathBuf::from("scan.svg"));
    }

    #[test]
    fn variant_path_keeps_directory() {
        assert_eq!(
            derive_variant_path(Path::new("art/logo.jpg"), "mask", "png"),
            PathBuf::from("art/logo-mask.png")
        );
    }
}
