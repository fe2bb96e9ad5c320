use serde::{Serialize, Serializer};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single file. Never aborts the batch.
#[derive(Debug, Error)]
pub enum RenameError {
    #[error("could not determine capture time: {0}")]
    Timestamp(String),
    #[error("file has no parent directory: {}", .0.display())]
    NoParent(PathBuf),
    #[error("file has no usable extension: {}", .0.display())]
    NoExtension(PathBuf),
    #[error("no free name for {base}{extension} within {max_suffix} suffixes")]
    SuffixExhausted {
        base: String,
        extension: String,
        max_suffix: u32,
    },
    #[error("rename {} -> {} failed: {source}", .from.display(), .to.display())]
    Io {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Serialize for RenameError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
