//! Error types for statement ingestion

use std::path::PathBuf;

use thiserror::Error;

/// The only fatal condition is failing to obtain the document text.
/// Anything malformed inside the text degrades to a skipped row or an empty
/// field instead.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, IngestError>;
