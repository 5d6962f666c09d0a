pub mod check;
pub mod run;

use std::fs;
use std::io;
use std::path::PathBuf;

/// Why a command could not obtain its program text.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("no program given")]
    Missing,

    #[error("cannot use a program file together with --code")]
    Conflicting,

    #[error("failed to read code file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Program text from a file path or from `--code`, exactly one of which must be set.
pub fn load_source(file: Option<PathBuf>, code: Option<String>) -> Result<String, SourceError> {
    match (file, code) {
        (Some(path), None) => fs::read_to_string(&path).map_err(|source| SourceError::Read { path, source }),
        (None, Some(code)) => Ok(code),
        (None, None) => Err(SourceError::Missing),
        (Some(_), Some(_)) => Err(SourceError::Conflicting),
    }
}
