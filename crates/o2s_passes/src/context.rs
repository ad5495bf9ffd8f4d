// o2s_passes/context - Shared services handed to every pass
use o2s_intentions::{IntentionCollection, IntentionError, IntentionId};
use o2s_typesystem::{
    DefaultTypeResolverInvoker, IntentionCollectionTypeSystem, TypeResolverInvoker,
};
use tracing::trace;

/// Type system and resolver invoker shared by the passes of one run.
///
/// The type system is a snapshot of the graph; passes that add, remove or
/// reshape declarations call [`IntentionPassContext::refresh`] before asking
/// for re-resolution.
pub struct IntentionPassContext {
    type_system: IntentionCollectionTypeSystem,
    invoker: Box<dyn TypeResolverInvoker>,
}

impl IntentionPassContext {
    pub fn new(collection: &IntentionCollection) -> Self {
        Self::with_invoker(collection, Box::new(DefaultTypeResolverInvoker))
    }

    pub fn with_invoker(
        collection: &IntentionCollection,
        invoker: Box<dyn TypeResolverInvoker>,
    ) -> Self {
        Self {
            type_system: IntentionCollectionTypeSystem::new(collection),
            invoker,
        }
    }

    pub fn type_system(&self) -> &IntentionCollectionTypeSystem {
        &self.type_system
    }

    pub fn invoker(&self) -> &dyn TypeResolverInvoker {
        self.invoker.as_ref()
    }

    /// Rebuilds the type system snapshot from the current graph.
    pub fn refresh(&mut self, collection: &IntentionCollection) {
        self.type_system.refresh(collection);
    }

    /// Resolves every body in the graph.
    pub fn resolve_all(&self, collection: &mut IntentionCollection) {
        self.invoker.resolve_all(&self.type_system, collection);
    }

    /// Re-resolves only the bodies owned by `owner`.
    pub fn resolve_expressions_in(
        &self,
        collection: &mut IntentionCollection,
        owner: IntentionId,
    ) -> Result<(), IntentionError> {
        trace!(%owner, "re-resolving bodies");
        self.invoker
            .resolve_expressions_in(&self.type_system, collection, owner)
    }
}
