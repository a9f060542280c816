// src/output.rs
// =============================================================================
// Writes fetched datasets to disk.
//
// Each dataset is serialized into a temporary file inside the target
// directory and then renamed over `<name>.<ext>`. A crash half way through a
// write never leaves a truncated file behind.
// =============================================================================

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::config::OutputFormat;
use crate::error::OutputError;

/// Serializes `data` to `dir/name.<ext>` and returns the written path
pub fn write_dataset<D>(
    dir: &Path,
    name: &str,
    format: OutputFormat,
    data: &D,
) -> Result<PathBuf, OutputError>
where
    D: Serialize + ?Sized,
{
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("{name}.{}", format.extension()));

    let mut file = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(file.as_file_mut());
        match format {
            // Named fields keep the files readable without our struct layout
            OutputFormat::MsgPack => rmp_serde::encode::write_named(&mut writer, data)?,
            OutputFormat::Json => serde_json::to_writer_pretty(&mut writer, data)?,
        }
        writer.flush()?;
    }
    file.persist(&path)?;

    debug!(path = %path.display(), "wrote dataset");
    Ok(path)
}
