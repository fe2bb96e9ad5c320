use crate::metadata::CaptureTimestamp;
use std::path::Path;

pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

const BASE_NAME_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// `YYYY-MM-DD_HH-MM-SS` for the capture time, without extension.
pub fn canonical_base(timestamp: &CaptureTimestamp) -> String {
    timestamp.value.format(BASE_NAME_FORMAT).to_string()
}

/// Lower-cased extension with its leading dot, e.g. `.jpg`.
pub fn normalized_extension(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?;
    if ext.is_empty() {
        return None;
    }
    Some(format!(".{}", ext.to_lowercase()))
}

pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy();
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
        .unwrap_or(false)
}

/// Name for the given suffix counter; `None` is the bare canonical name.
pub fn compose_name(base: &str, counter: Option<u32>, extension: &str) -> String {
    match counter {
        Some(n) => format!("{}_{}{}", base, n, extension),
        None => format!("{}{}", base, extension),
    }
}
