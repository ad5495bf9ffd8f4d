// o2s_passes/passes/property_merge - Folds accessor methods into properties
use crate::context::IntentionPassContext;
use crate::pass::IntentionPass;
use o2s_intentions::{
    FunctionBody, Intention, IntentionCollection, IntentionError, IntentionId,
    MethodGenerationIntention, PropertyGenerationIntention, PropertyMode, PropertySetter,
};
use std::collections::HashSet;
use tracing::debug;

/// Merges getter and setter methods into the property they implement.
///
/// For each `Field` property of a class or extension the first sibling
/// method (in declaration order) shaped like its getter and, unless the
/// property is readonly, its setter are located:
///
/// - getter and setter: both methods are removed and the property becomes
///   [`PropertyMode::Property`] (computed with a setter inside extensions);
/// - getter only: the getter is removed and the property becomes
///   [`PropertyMode::Computed`];
/// - anything else leaves the property and methods alone.
///
/// Further methods with the same shape stay as plain methods.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertyMergePass;

impl PropertyMergePass {
    pub const NAME: &'static str = "property-merge";
}

struct Accessors {
    getter: IntentionId,
    setter: Option<IntentionId>,
}

impl IntentionPass for PropertyMergePass {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn apply(
        &self,
        collection: &mut IntentionCollection,
        context: &mut IntentionPassContext,
    ) -> Result<(), IntentionError> {
        let mut merged = Vec::new();
        for type_id in collection.type_intentions() {
            let ty = collection.type_intention(type_id)?;
            if ty.is_protocol() {
                continue;
            }
            let in_extension = ty.is_extension();
            let properties = ty.properties().to_vec();
            let methods = ty.methods().to_vec();
            let mut consumed = HashSet::new();

            for property_id in properties {
                let property = collection.property(property_id)?;
                if !property.mode.is_field() {
                    continue;
                }
                let Some(accessors) = find_accessors(collection, property, &methods, &consumed)?
                else {
                    continue;
                };
                consumed.insert(accessors.getter);
                consumed.extend(accessors.setter);

                let getter = take_body(collection, type_id, accessors.getter)?;
                let setter = match accessors.setter {
                    Some(setter_id) => {
                        let value_identifier = collection
                            .method(setter_id)?
                            .signature
                            .parameters
                            .first()
                            .map(|parameter| parameter.name.clone())
                            .unwrap_or_else(|| "newValue".to_string());
                        let body = take_body(collection, type_id, setter_id)?;
                        Some(PropertySetter {
                            value_identifier,
                            body,
                        })
                    }
                    None => None,
                };

                let property = collection.property_mut(property_id)?;
                property.mode = match setter {
                    Some(setter) if !in_extension => PropertyMode::Property { getter, setter },
                    setter => PropertyMode::Computed { getter, setter },
                };
                debug!(
                    property = property.name.as_str(),
                    computed = property.mode.is_computed(),
                    "merged accessors into property"
                );
                merged.push(property_id);
            }
        }

        if !merged.is_empty() {
            context.refresh(collection);
            for property_id in merged {
                context.resolve_expressions_in(collection, property_id)?;
            }
        }
        Ok(())
    }
}

fn find_accessors(
    collection: &IntentionCollection,
    property: &PropertyGenerationIntention,
    methods: &[IntentionId],
    consumed: &HashSet<IntentionId>,
) -> Result<Option<Accessors>, IntentionError> {
    let getter_name = property.getter_name();
    let setter_name = property.setter_name();
    let mut getter = None;
    let mut setter = None;

    for id in methods.iter().copied().filter(|id| !consumed.contains(id)) {
        let method = collection.method(id)?;
        if method.is_static() != property.is_static {
            continue;
        }
        if getter.is_none() && is_getter(method, &getter_name) {
            getter = Some(id);
        } else if setter.is_none()
            && !property.is_readonly()
            && is_setter(method, &setter_name, property)
        {
            setter = Some(id);
        }
    }

    Ok(getter.map(|getter| Accessors { getter, setter }))
}

fn is_getter(method: &MethodGenerationIntention, name: &str) -> bool {
    method.name() == name && method.signature.parameters.is_empty()
}

/// `set<Name>(_ value: T)` where `T` equals the property type ignoring
/// nullability.
fn is_setter(
    method: &MethodGenerationIntention,
    name: &str,
    property: &PropertyGenerationIntention,
) -> bool {
    let signature = &method.signature;
    match signature.parameters.as_slice() {
        [parameter] => {
            signature.name == name
                && parameter.label.is_none()
                && parameter.ty.deep_unwrapped() == property.ty().deep_unwrapped()
                && signature.return_type.is_void()
        }
        _ => false,
    }
}

/// Removes the accessor method and hands back its body.
fn take_body(
    collection: &mut IntentionCollection,
    type_id: IntentionId,
    method_id: IntentionId,
) -> Result<FunctionBody, IntentionError> {
    match collection.remove_child(type_id, method_id)? {
        Intention::Method(method) => Ok(method.body.unwrap_or_default()),
        other => Err(IntentionError::UnexpectedKind {
            id: method_id,
            expected: "method",
            found: other.kind_name(),
        }),
    }
}
