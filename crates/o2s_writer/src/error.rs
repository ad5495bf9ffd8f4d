// o2s_writer/error - Failures raised while emitting output files
use o2s_intentions::IntentionError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WriterError {
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The graph handed to the writer is not well formed.
    #[error("malformed intention graph: {0}")]
    Intention(#[from] IntentionError),
}

impl WriterError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        WriterError::Io {
            path: path.into(),
            source,
        }
    }
}
