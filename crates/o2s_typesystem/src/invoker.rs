// o2s_typesystem/invoker - Entry points for running the resolver over intentions
use crate::resolver::{ExpressionTypeResolver, ResolutionContext};
use crate::type_system::TypeSystem;
use o2s_ast::{Expression, SwiftType};
use o2s_intentions::{Intention, IntentionCollection, IntentionError, IntentionId, PropertyMode};
use tracing::{debug, trace};

/// Runs expression type resolution over whole graphs, single owners, or
/// detached expressions. Passes that rewrite a body call
/// [`TypeResolverInvoker::resolve_expressions_in`] for just that owner.
pub trait TypeResolverInvoker: Send + Sync {
    fn resolve_all(&self, type_system: &dyn TypeSystem, collection: &mut IntentionCollection);

    fn resolve_expressions_in(
        &self,
        type_system: &dyn TypeSystem,
        collection: &mut IntentionCollection,
        owner: IntentionId,
    ) -> Result<(), IntentionError>;

    /// Resolves an expression that is not (yet) part of the graph, as if it
    /// appeared in a body of `owner`.
    fn resolve_expression(
        &self,
        type_system: &dyn TypeSystem,
        collection: &IntentionCollection,
        owner: IntentionId,
        expression: &mut Expression,
    ) -> Result<SwiftType, IntentionError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTypeResolverInvoker;

impl TypeResolverInvoker for DefaultTypeResolverInvoker {
    fn resolve_all(&self, type_system: &dyn TypeSystem, collection: &mut IntentionCollection) {
        let owners = collection.function_body_owners();
        debug!(owners = owners.len(), "resolving expression types");
        for owner in owners {
            // Owners come from the collection itself and cannot be missing.
            if let Err(error) = self.resolve_expressions_in(type_system, collection, owner) {
                trace!(%owner, %error, "skipped body owner");
            }
        }
    }

    fn resolve_expressions_in(
        &self,
        type_system: &dyn TypeSystem,
        collection: &mut IntentionCollection,
        owner: IntentionId,
    ) -> Result<(), IntentionError> {
        let contexts = body_contexts(collection, owner)?;
        let initializer_type = match collection.get(owner) {
            Some(Intention::GlobalVariable(variable)) => Some(variable.storage.ty.clone()),
            _ => None,
        };

        for (body, context) in collection.bodies_mut(owner).into_iter().zip(contexts) {
            ExpressionTypeResolver::new(type_system, context).resolve_compound(body);
        }
        if let (Some(ty), Some(initializer)) = (initializer_type, collection.initializer_mut(owner))
        {
            initializer.expected_type = Some(ty);
            ExpressionTypeResolver::new(type_system, ResolutionContext::global())
                .resolve_expression(initializer);
        }
        Ok(())
    }

    fn resolve_expression(
        &self,
        type_system: &dyn TypeSystem,
        collection: &IntentionCollection,
        owner: IntentionId,
        expression: &mut Expression,
    ) -> Result<SwiftType, IntentionError> {
        let context = body_contexts(collection, owner)?
            .into_iter()
            .next()
            .unwrap_or_else(|| base_context(collection, owner, false));
        Ok(ExpressionTypeResolver::new(type_system, context).resolve_expression(expression))
    }
}

/// Lexical context of `owner` without parameters or return type.
fn base_context(collection: &IntentionCollection, owner: IntentionId, is_static: bool) -> ResolutionContext {
    let Some(type_id) = collection.enclosing_type(owner).or_else(|| {
        matches!(collection.get(owner), Some(Intention::Type(_))).then_some(owner)
    }) else {
        return ResolutionContext::global();
    };
    let Ok(ty) = collection.type_intention(type_id) else {
        return ResolutionContext::global();
    };
    let mut context = ResolutionContext::in_type(ty.type_name.clone());
    context.superclass = ty.superclass_name().map(SwiftType::named);
    context.is_static = is_static;
    context
}

/// One context per body returned by `IntentionCollection::bodies_mut`, in
/// the same order.
fn body_contexts(
    collection: &IntentionCollection,
    owner: IntentionId,
) -> Result<Vec<ResolutionContext>, IntentionError> {
    let intention = collection
        .get(owner)
        .ok_or(IntentionError::Missing { id: owner })?;
    let contexts = match intention {
        Intention::Method(method) => {
            let signature = &method.signature;
            let mut context = base_context(collection, owner, signature.is_static);
            for parameter in &signature.parameters {
                context = context.with_parameter(parameter.name.clone(), parameter.ty.clone());
            }
            vec![context.with_return_type(signature.return_type.clone())]
        }
        Intention::GlobalFunction(function) => {
            let signature = &function.signature;
            let mut context = ResolutionContext::global();
            for parameter in &signature.parameters {
                context = context.with_parameter(parameter.name.clone(), parameter.ty.clone());
            }
            vec![context.with_return_type(signature.return_type.clone())]
        }
        Intention::Property(property) => {
            let base = base_context(collection, owner, property.is_static);
            let getter = base.clone().with_return_type(property.storage.ty.clone());
            let setter_context = |value_identifier: &str| {
                base.clone()
                    .with_parameter(value_identifier, property.storage.ty.clone())
                    .with_return_type(SwiftType::void())
            };
            match &property.mode {
                PropertyMode::Field => Vec::new(),
                PropertyMode::Computed { setter, .. } => {
                    let mut contexts = vec![getter];
                    if let Some(setter) = setter {
                        contexts.push(setter_context(&setter.value_identifier));
                    }
                    contexts
                }
                PropertyMode::Property { setter, .. } => {
                    vec![getter, setter_context(&setter.value_identifier)]
                }
            }
        }
        _ => vec![base_context(collection, owner, false)],
    };
    Ok(contexts)
}
