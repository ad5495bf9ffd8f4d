// o2s_typesystem/intention_system - Type system view of an intention graph
use crate::builtins::builtin_types;
use crate::type_system::{
    KnownGlobal, KnownMember, KnownType, KnownTypeKind, MapTypeSystem, TypeSystem,
};
use o2s_intentions::{Intention, IntentionCollection, TypeIntentionKind};
use tracing::debug;

/// Snapshot of the declarations in an [`IntentionCollection`], layered over
/// the builtin catalogue. Declarations that extend a builtin type (e.g. a
/// category on `NSObject`) are merged into a copy of that builtin.
///
/// The snapshot does not track later graph edits; call [`Self::refresh`]
/// after passes that add or remove declarations.
#[derive(Debug, Clone, Default)]
pub struct IntentionCollectionTypeSystem {
    declared: MapTypeSystem,
}

impl IntentionCollectionTypeSystem {
    pub fn new(collection: &IntentionCollection) -> Self {
        let mut system = Self::default();
        system.refresh(collection);
        system
    }

    pub fn refresh(&mut self, collection: &IntentionCollection) {
        let mut declared = MapTypeSystem::new();
        for (_, intention) in collection.iter() {
            match intention {
                Intention::Type(ty) => {
                    let kind = match ty.kind {
                        TypeIntentionKind::Protocol => KnownTypeKind::Protocol,
                        _ => KnownTypeKind::Class,
                    };
                    let builtin = match declared.lookup_type(&ty.type_name) {
                        Some(_) => None,
                        None => builtin_types().lookup_type(&ty.type_name).cloned(),
                    };
                    let mut known =
                        builtin.unwrap_or_else(|| KnownType::new(ty.type_name.clone(), kind));
                    let mut additions = KnownType::new(ty.type_name.clone(), kind);
                    additions.supertype = ty.superclass_name().map(str::to_string);
                    for id in ty.protocols() {
                        if let Ok(conformance) = collection.protocol_conformance(*id) {
                            additions.conformances.push(conformance.protocol_name.clone());
                        }
                    }
                    for id in ty.properties() {
                        if let Ok(property) = collection.property(*id) {
                            additions.members.push(KnownMember::Property {
                                name: property.name.clone(),
                                ty: property.storage.ty.clone(),
                                is_static: property.is_static,
                            });
                        }
                    }
                    for id in ty.methods() {
                        if let Ok(method) = collection.method(*id) {
                            additions.members.push(KnownMember::Method(method.signature.clone()));
                        }
                    }
                    for id in ty.instance_variables() {
                        if let Ok(ivar) = collection.instance_variable(*id) {
                            additions.members.push(KnownMember::Field {
                                name: ivar.name.clone(),
                                ty: ivar.storage.ty.clone(),
                            });
                        }
                    }
                    known.absorb(additions);
                    declared.add_type(known);
                }
                Intention::GlobalFunction(function) => {
                    declared.add_global(KnownGlobal::Function(function.signature.clone()));
                }
                Intention::GlobalVariable(variable) => declared.add_global(KnownGlobal::Variable {
                    name: variable.name.clone(),
                    ty: variable.storage.ty.clone(),
                }),
                Intention::Typealias(alias) => {
                    if let Some(target) = alias.aliased.type_name() {
                        if let Some(aliased) = declared
                            .lookup_type(target)
                            .or_else(|| builtin_types().lookup_type(target))
                        {
                            let mut renamed = aliased.clone();
                            renamed.name = alias.name.clone();
                            declared.add_type(renamed);
                        }
                    }
                }
                _ => {}
            }
        }
        debug!(
            types = declared.types().count(),
            "refreshed intention type system"
        );
        self.declared = declared;
    }
}

impl TypeSystem for IntentionCollectionTypeSystem {
    fn lookup_type(&self, name: &str) -> Option<&KnownType> {
        self.declared
            .lookup_type(name)
            .or_else(|| builtin_types().lookup_type(name))
    }

    fn lookup_global(&self, name: &str) -> Option<&KnownGlobal> {
        self.declared
            .lookup_global(name)
            .or_else(|| builtin_types().lookup_global(name))
    }
}
