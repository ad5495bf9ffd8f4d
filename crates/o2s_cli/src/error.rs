// o2s_cli/error - Failures of a rewrite run
use crate::config::ConfigError;
use o2s_intentions::IntentionError;
use o2s_passes::PassError;
use o2s_writer::WriterError;
use thiserror::Error;

/// Aborts a rewrite. Problems inside the Objective-C input are diagnostics,
/// not errors: they never stop the run.
#[derive(Debug, Error)]
pub enum RewriterError {
    #[error("failed to load input {source_name}: {source}")]
    Load {
        source_name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build intentions for {source_name}: {source}")]
    Build {
        source_name: String,
        #[source]
        source: IntentionError,
    },

    #[error(transparent)]
    Pass(#[from] PassError),

    #[error(transparent)]
    Writer(#[from] WriterError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to start worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}
