pub mod extract;
pub mod fill;
pub mod serve;

use std::path::Path;

/// Extension the core parser dispatches on, taken from the filename.
pub(crate) fn data_extension(path: &Path) -> &str {
    path.extension().and_then(|e| e.to_str()).unwrap_or("")
}
