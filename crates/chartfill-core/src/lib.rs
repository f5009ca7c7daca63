pub mod archive;
pub mod dates;
pub mod error;
pub mod extract;
pub mod layout;
pub mod merge;
pub mod model;
pub mod overlay;

use std::fs;
use std::path::{Path, PathBuf};

use error::FillError;
use model::Record;

/// What a completed batch produced, in generation order (ascending
/// appointment time).
#[derive(Debug, Clone, serde::Serialize)]
pub struct BatchSummary {
    pub record_count: usize,
    pub files: Vec<PathBuf>,
}

/// Main API entry point: fill one form per record.
///
/// Parses the data file, sorts by appointment time, then renders and
/// merges each record onto the template, writing `<sanitized name>.pdf`
/// into `output_dir`. The directory is recreated fresh at the start of
/// the batch; callers that need concurrent batches must pass distinct
/// directories. The first failing record aborts the whole batch.
pub fn fill_batch(
    data_bytes: &[u8],
    data_extension: &str,
    template_bytes: &[u8],
    output_dir: &Path,
) -> Result<BatchSummary, FillError> {
    let records = extract::extract_records(data_bytes, data_extension)?;
    tracing::info!(records = records.len(), "starting form fill batch");

    if output_dir.exists() {
        fs::remove_dir_all(output_dir)?;
    }
    fs::create_dir_all(output_dir)?;

    let mut files = Vec::new();
    for record in &records {
        let path = output_dir.join(format!("{}.pdf", record.file_stem()));
        let filled = fill_record(record, template_bytes)?;
        fs::write(&path, filled)?;
        tracing::debug!(path = %path.display(), "wrote filled form");
        files.push(path);
    }

    Ok(BatchSummary {
        record_count: records.len(),
        files,
    })
}

/// Render and merge a single record onto the template.
pub fn fill_record(record: &Record, template_bytes: &[u8]) -> Result<Vec<u8>, FillError> {
    let overlay = overlay::render_overlay(record);
    merge::merge_overlay(template_bytes, &overlay)
}

/// Run a batch and package the output directory as a ZIP in one step.
pub fn fill_batch_to_archive(
    data_bytes: &[u8],
    data_extension: &str,
    template_bytes: &[u8],
    output_dir: &Path,
) -> Result<(BatchSummary, Vec<u8>), FillError> {
    let summary = fill_batch(data_bytes, data_extension, template_bytes, output_dir)?;
    let bytes = archive::archive_directory(output_dir)?;
    Ok((summary, bytes))
}
