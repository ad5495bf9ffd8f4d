// o2s_passes/pass - Intention pass interface
use crate::context::IntentionPassContext;
use o2s_intentions::{IntentionCollection, IntentionError};

/// A rewrite over the whole intention graph.
///
/// A pass must not rely on any other pass having run, and must leave every
/// parent back-reference consistent with its parent's child lists.
pub trait IntentionPass: Send + Sync {
    /// Identifier used in configuration and logs, e.g. `property-merge`.
    fn name(&self) -> &'static str;

    fn apply(
        &self,
        collection: &mut IntentionCollection,
        context: &mut IntentionPassContext,
    ) -> Result<(), IntentionError>;
}
