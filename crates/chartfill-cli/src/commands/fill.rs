use std::fs;
use std::path::PathBuf;

use chartfill_core::error::FillError;

use crate::commands::data_extension;

pub fn run(
    data_file: PathBuf,
    template: PathBuf,
    out: PathBuf,
    keep_output: Option<PathBuf>,
) -> Result<(), FillError> {
    let data_bytes = fs::read(&data_file)?;
    let template_bytes = fs::read(&template)?;
    let extension = data_extension(&data_file);

    let (summary, archive) = match keep_output {
        Some(dir) => {
            chartfill_core::fill_batch_to_archive(&data_bytes, extension, &template_bytes, &dir)?
        }
        None => {
            // Per-batch working directory; removed when the guard drops.
            let workdir = tempfile::tempdir()?;
            chartfill_core::fill_batch_to_archive(
                &data_bytes,
                extension,
                &template_bytes,
                &workdir.path().join("output"),
            )?
        }
    };

    fs::write(&out, archive)?;
    eprintln!(
        "Filled {} form(s), archive written to {}",
        summary.record_count,
        out.display()
    );
    Ok(())
}
