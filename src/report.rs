use vectrace::VectraceError;

pub fn report_error(err: &VectraceError) {
    match err {
        VectraceError::InputNotFound { path } => {
            eprintln!("Input file not found: {}", path.display());
            eprintln!();
            eprintln!("Pass the path of a PNG, JPEG, BMP or other raster image as the first argument.");
        }
        VectraceError::InvalidImage { reason } => {
            eprintln!("Could not use the input image: {reason}");
        }
        _ => {
            eprintln!("{err}");
        }
    }
}
