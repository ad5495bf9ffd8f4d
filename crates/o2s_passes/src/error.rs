// o2s_passes/error - Failures raised while running intention passes
use o2s_intentions::IntentionError;

/// Internal errors of the pass stage. None of these are user diagnostics:
/// they signal a pass that broke the graph or a misconfigured pipeline.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PassError {
    #[error("pass `{pass}` failed: {source}")]
    Pass {
        pass: &'static str,
        #[source]
        source: IntentionError,
    },

    #[error("graph integrity check after pass `{pass}` failed: {source}")]
    Integrity {
        pass: &'static str,
        #[source]
        source: IntentionError,
    },

    #[error("unknown intention pass `{name}`")]
    UnknownPass { name: String },
}

impl PassError {
    /// Name of the pass the error is attributed to, if any.
    pub fn pass_name(&self) -> Option<&'static str> {
        match self {
            PassError::Pass { pass, .. } | PassError::Integrity { pass, .. } => Some(pass),
            PassError::UnknownPass { .. } => None,
        }
    }
}
