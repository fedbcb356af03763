//! JSON file codec for one entity collection.
//!
//! Each collection is a single JSON array on disk. An absent file is an
//! empty collection, so a freshly created workspace needs no placeholder
//! files before its first write.

use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::Path,
};

use serde::{Serialize, de::DeserializeOwned};

/// Errors that can occur when loading a collection file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file exists but could not be read.
    #[error("failed to read collection file: {0}")]
    Io(#[from] io::Error),
    /// The file's content is not a valid JSON array of entities.
    #[error("failed to parse collection file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Loads a collection from the given path.
///
/// A missing file yields an empty collection; any other failure is an error.
///
/// # Errors
///
/// Returns [`LoadError::Io`] if the file exists but cannot be read, or
/// [`LoadError::Json`] if its content does not deserialize.
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, LoadError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

/// Writes a collection to the given path, replacing any existing content.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written to.
pub fn save<T: Serialize>(path: &Path, entities: &[T], pretty: bool) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    if pretty {
        serde_json::to_writer_pretty(&mut writer, entities)?;
    } else {
        serde_json::to_writer(&mut writer, entities)?;
    }
    // Trailing newline keeps the files diff-friendly under version control.
    writer.write_all(b"\n")?;
    writer.flush()
}
