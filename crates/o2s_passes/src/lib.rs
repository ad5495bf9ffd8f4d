// o2s_passes - Rewrites applied to the intention graph before emission
//! The pass stage runs strictly after every file's intentions have been
//! merged into one [`IntentionCollection`](o2s_intentions::IntentionCollection),
//! single-threaded, in the order given by an [`IntentionPassPipeline`].

pub mod context;
pub mod error;
pub mod pass;
pub mod passes;
pub mod pipeline;

pub use context::IntentionPassContext;
pub use error::PassError;
pub use pass::IntentionPass;
pub use passes::*;
pub use pipeline::{pass_by_name, IntentionPassPipeline, PipelineBuilder, DEFAULT_PASS_NAMES};

#[cfg(test)]
mod tests;
