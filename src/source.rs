//! Reading the byte stream to transmit.
//!
//! Source failures belong to the caller: they are reported here, before any
//! fragmentation happens, and never enter the reassembly error taxonomy.

use std::{
    fs::File,
    io::{self, Read},
    path::{Path, PathBuf},
};

use thiserror::Error;

/// Errors raised while loading a source file.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The file could not be opened.
    #[error("could not open file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The file was opened but reading it failed.
    #[error("could not read file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Read the whole file at `path` into memory.
///
/// # Errors
///
/// Returns [`SourceError::Open`] if the file cannot be opened and
/// [`SourceError::Read`] if reading its contents fails.
pub fn read_source(path: impl AsRef<Path>) -> Result<Vec<u8>, SourceError> {
    let path = path.as_ref();
    let mut file = File::open(path).map_err(|source| SourceError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mut contents = Vec::new();
    file.read_to_end(&mut contents)
        .map_err(|source| SourceError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(contents)
}
