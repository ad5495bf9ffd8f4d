// o2s_passes/passes/protocol_nullability - Protocol signatures inform conformers
use crate::context::IntentionPassContext;
use crate::pass::IntentionPass;
use crate::passes::propagate_nullability;
use o2s_intentions::{FunctionSignature, IntentionCollection, IntentionError, IntentionId};
use std::collections::HashMap;
use tracing::trace;

/// Copies nullability from protocol method signatures onto the methods of
/// conforming classes and extensions that implement them.
///
/// A conforming method is matched by selector shape and static flag; only
/// its implicitly unwrapped parameter and return types are replaced, so an
/// explicit annotation on the implementation always wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProtocolNullabilityPropagationPass;

impl ProtocolNullabilityPropagationPass {
    pub const NAME: &'static str = "protocol-nullability-propagation";
}

impl IntentionPass for ProtocolNullabilityPropagationPass {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn apply(
        &self,
        collection: &mut IntentionCollection,
        _context: &mut IntentionPassContext,
    ) -> Result<(), IntentionError> {
        let protocols = protocol_signatures(collection)?;
        if protocols.is_empty() {
            return Ok(());
        }

        let mut updates: Vec<(IntentionId, FunctionSignature)> = Vec::new();
        for type_id in collection.type_intentions() {
            let ty = collection.type_intention(type_id)?;
            if ty.is_protocol() {
                continue;
            }
            let mut requirements = Vec::new();
            for conformance in ty.protocols() {
                let name = &collection.protocol_conformance(*conformance)?.protocol_name;
                if let Some(signatures) = protocols.get(name.as_str()) {
                    requirements.extend(signatures.iter());
                }
            }
            if requirements.is_empty() {
                continue;
            }
            for method_id in ty.methods() {
                let signature = &collection.method(*method_id)?.signature;
                let Some(requirement) = requirements.iter().find(|requirement| {
                    requirement.is_static == signature.is_static
                        && requirement.matches_as_selector(signature)
                }) else {
                    continue;
                };
                let mut propagated = signature.clone();
                if propagate_nullability(&mut propagated, requirement) {
                    updates.push((*method_id, propagated));
                }
            }
        }

        for (method_id, signature) in updates {
            trace!(method = %method_id, selector = %signature.selector(), "propagated nullability");
            collection.method_mut(method_id)?.signature = signature;
        }
        Ok(())
    }
}

/// Method signatures of every protocol intention, keyed by protocol name.
fn protocol_signatures(
    collection: &IntentionCollection,
) -> Result<HashMap<String, Vec<FunctionSignature>>, IntentionError> {
    let mut protocols: HashMap<String, Vec<FunctionSignature>> = HashMap::new();
    for type_id in collection.type_intentions() {
        let ty = collection.type_intention(type_id)?;
        if !ty.is_protocol() {
            continue;
        }
        let signatures = protocols.entry(ty.type_name.clone()).or_default();
        for method_id in ty.methods() {
            signatures.push(collection.method(*method_id)?.signature.clone());
        }
    }
    Ok(protocols)
}
