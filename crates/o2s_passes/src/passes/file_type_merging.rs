// o2s_passes/passes/file_type_merging - Joins interface and implementation types
use crate::context::IntentionPassContext;
use crate::pass::IntentionPass;
use crate::passes::{propagate_nullability, propagate_type};
use o2s_intentions::{
    Intention, IntentionCollection, IntentionError, IntentionId, TypeGenerationIntention,
    TypeIntentionKind,
};
use tracing::debug;

/// Merges type intentions that describe the same Swift type across files.
///
/// Classes merge by name, categories by class and category name. Class
/// extensions (`@interface Foo ()`) merge into their class. The surviving
/// intention is the class found in an implementation file when there is
/// one; the others contribute their superclass, protocols, properties,
/// instance variables and unmatched methods. Methods matched by selector
/// keep the implementation's body and take nullability from the interface.
///
/// Header files left without any declaration are removed.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileTypeMergingPass;

impl FileTypeMergingPass {
    pub const NAME: &'static str = "file-type-merging";
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum MergeKey {
    Class(String),
    Category { class: String, category: String },
}

impl MergeKey {
    fn of(ty: &TypeGenerationIntention) -> Option<Self> {
        match &ty.kind {
            TypeIntentionKind::Class { .. }
            | TypeIntentionKind::Extension {
                category_name: None,
            } => Some(MergeKey::Class(ty.type_name.clone())),
            TypeIntentionKind::Extension {
                category_name: Some(category),
            } => Some(MergeKey::Category {
                class: ty.type_name.clone(),
                category: category.clone(),
            }),
            TypeIntentionKind::Protocol => None,
        }
    }
}

impl IntentionPass for FileTypeMergingPass {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn apply(
        &self,
        collection: &mut IntentionCollection,
        context: &mut IntentionPassContext,
    ) -> Result<(), IntentionError> {
        let mut changed = false;
        for group in merge_groups(collection)? {
            if group.len() < 2 {
                continue;
            }
            let target = pick_target(collection, &group)?;
            for source in group.into_iter().filter(|id| *id != target) {
                merge_type(collection, target, source)?;
                changed = true;
            }
        }

        for file_id in collection.files().to_vec() {
            let file = collection.file(file_id)?;
            if file.is_header() && file.is_empty() {
                debug!(file = file.source_path.as_str(), "removing emptied header");
                collection.remove(file_id)?;
                changed = true;
            }
        }

        if changed {
            context.refresh(collection);
        }
        Ok(())
    }
}

/// Type intentions sharing a merge key, in order of first appearance.
fn merge_groups(collection: &IntentionCollection) -> Result<Vec<Vec<IntentionId>>, IntentionError> {
    let mut keys: Vec<MergeKey> = Vec::new();
    let mut groups: Vec<Vec<IntentionId>> = Vec::new();
    for type_id in collection.type_intentions() {
        let Some(key) = MergeKey::of(collection.type_intention(type_id)?) else {
            continue;
        };
        match keys.iter().position(|existing| *existing == key) {
            Some(index) => groups[index].push(type_id),
            None => {
                keys.push(key);
                groups.push(vec![type_id]);
            }
        }
    }
    Ok(groups)
}

fn pick_target(
    collection: &IntentionCollection,
    group: &[IntentionId],
) -> Result<IntentionId, IntentionError> {
    let mut best = group[0];
    let mut best_rank = 0;
    for id in group.iter().copied() {
        let ty = collection.type_intention(id)?;
        let in_implementation = match collection.enclosing_file(id) {
            Some(file) => !collection.file(file)?.is_header(),
            None => false,
        };
        let rank = u8::from(!ty.is_extension()) * 2 + u8::from(in_implementation);
        if rank > best_rank {
            best = id;
            best_rank = rank;
        }
    }
    Ok(best)
}

fn merge_type(
    collection: &mut IntentionCollection,
    target: IntentionId,
    source: IntentionId,
) -> Result<(), IntentionError> {
    let donor = collection.type_intention(source)?.clone();
    debug!(
        ty = donor.type_name.as_str(),
        %source,
        %target,
        "merging type intentions"
    );

    let recipient = collection.type_intention_mut(target)?;
    if let (
        TypeIntentionKind::Class {
            superclass_name: slot @ None,
        },
        Some(superclass),
    ) = (&mut recipient.kind, donor.superclass_name())
    {
        *slot = Some(superclass.to_string());
    }
    recipient.header.in_nonnull_context |= donor.header.in_nonnull_context;
    if recipient.header.source.is_none() {
        recipient.header.source = donor.header.source.clone();
    }

    for id in donor.protocols().iter().copied() {
        let name = collection.protocol_conformance(id)?.protocol_name.clone();
        let duplicate = find_child(collection, target, |recipient| recipient.protocols(), |other| {
            matches!(other, Intention::ProtocolConformance(conformance) if conformance.protocol_name == name)
        })?;
        relocate(collection, id, target, duplicate.is_some())?;
    }

    for id in donor.properties().iter().copied() {
        let property = collection.property(id)?.clone();
        let existing = find_child(collection, target, |recipient| recipient.properties(), |other| {
            matches!(other, Intention::Property(candidate)
                if candidate.name == property.name && candidate.is_static == property.is_static)
        })?;
        if let Some(existing) = existing {
            let kept = collection.property_mut(existing)?;
            propagate_type(&mut kept.storage.ty, &property.storage.ty);
            for attribute in property.attributes {
                if !kept.attributes.contains(&attribute) {
                    kept.attributes.push(attribute);
                }
            }
        }
        relocate(collection, id, target, existing.is_some())?;
    }

    for id in donor.instance_variables().iter().copied() {
        let name = collection.instance_variable(id)?.name.clone();
        let duplicate = find_child(
            collection,
            target,
            |recipient| recipient.instance_variables(),
            |other| matches!(other, Intention::InstanceVariable(ivar) if ivar.name == name),
        )?;
        relocate(collection, id, target, duplicate.is_some())?;
    }

    for id in donor.methods().iter().copied() {
        let method = collection.method(id)?.clone();
        let existing = find_child(collection, target, |recipient| recipient.methods(), |other| {
            matches!(other, Intention::Method(candidate)
                if candidate.signature.is_static == method.signature.is_static
                    && candidate.signature.matches_as_selector(&method.signature))
        })?;
        if let Some(existing) = existing {
            let kept = collection.method_mut(existing)?;
            propagate_nullability(&mut kept.signature, &method.signature);
            if kept.body.is_none() {
                kept.body = method.body;
            }
        }
        relocate(collection, id, target, existing.is_some())?;
    }

    collection.remove(source)?;
    Ok(())
}

/// First child of `parent` among the ids returned by `list` that satisfies
/// `predicate`.
fn find_child(
    collection: &IntentionCollection,
    parent: IntentionId,
    list: impl Fn(&TypeGenerationIntention) -> &[IntentionId],
    predicate: impl Fn(&Intention) -> bool,
) -> Result<Option<IntentionId>, IntentionError> {
    let parent_type = collection.type_intention(parent)?;
    Ok(list(parent_type)
        .iter()
        .copied()
        .find(|id| collection.get(*id).is_some_and(&predicate)))
}

/// Moves `id` under `target`, or drops it when `target` already has an
/// equivalent member.
fn relocate(
    collection: &mut IntentionCollection,
    id: IntentionId,
    target: IntentionId,
    duplicate: bool,
) -> Result<(), IntentionError> {
    if duplicate {
        collection.remove(id)?;
    } else {
        collection.move_to(id, target)?;
    }
    Ok(())
}
