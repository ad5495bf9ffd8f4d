// o2s_typesystem/type_system - Symbol lookup service used by the resolver
//! Lookups are total: absence is `None`, never an error.

use indexmap::IndexMap;
use o2s_ast::SwiftType;
use o2s_intentions::FunctionSignature;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KnownTypeKind {
    Class,
    Protocol,
    Struct,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum KnownMember {
    Property {
        name: String,
        ty: SwiftType,
        is_static: bool,
    },
    /// Stored instance variable.
    Field { name: String, ty: SwiftType },
    Method(FunctionSignature),
}

impl KnownMember {
    pub fn property(name: impl Into<String>, ty: SwiftType) -> Self {
        KnownMember::Property {
            name: name.into(),
            ty,
            is_static: false,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            KnownMember::Property { name, .. } | KnownMember::Field { name, .. } => name,
            KnownMember::Method(signature) => &signature.name,
        }
    }

    pub fn is_static(&self) -> bool {
        match self {
            KnownMember::Property { is_static, .. } => *is_static,
            KnownMember::Field { .. } => false,
            KnownMember::Method(signature) => signature.is_static,
        }
    }

    /// Type of the member when referenced without a call: the stored type
    /// for properties and fields, the closure type for methods.
    pub fn member_type(&self) -> SwiftType {
        match self {
            KnownMember::Property { ty, .. } | KnownMember::Field { ty, .. } => ty.clone(),
            KnownMember::Method(signature) => signature.swift_closure_type(),
        }
    }

    pub fn as_method(&self) -> Option<&FunctionSignature> {
        match self {
            KnownMember::Method(signature) => Some(signature),
            _ => None,
        }
    }

    fn substituted(&self, substitutions: &HashMap<&str, &SwiftType>) -> Self {
        match self {
            KnownMember::Property {
                name,
                ty,
                is_static,
            } => KnownMember::Property {
                name: name.clone(),
                ty: substitute(ty, substitutions),
                is_static: *is_static,
            },
            KnownMember::Field { name, ty } => KnownMember::Field {
                name: name.clone(),
                ty: substitute(ty, substitutions),
            },
            KnownMember::Method(signature) => {
                let mut signature = signature.clone();
                signature.return_type = substitute(&signature.return_type, substitutions);
                for parameter in &mut signature.parameters {
                    parameter.ty = substitute(&parameter.ty, substitutions);
                }
                KnownMember::Method(signature)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnownSubscript {
    pub index: SwiftType,
    pub element: SwiftType,
}

/// A type the resolver can look members up on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnownType {
    pub name: String,
    pub kind: KnownTypeKind,
    /// Generic parameter names, substituted from the receiver's arguments.
    pub generic_parameters: Vec<String>,
    pub supertype: Option<String>,
    pub conformances: Vec<String>,
    pub members: Vec<KnownMember>,
    pub subscript: Option<KnownSubscript>,
}

impl KnownType {
    pub fn new(name: impl Into<String>, kind: KnownTypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            generic_parameters: Vec::new(),
            supertype: None,
            conformances: Vec::new(),
            members: Vec::new(),
            subscript: None,
        }
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name, KnownTypeKind::Class)
    }

    pub fn with_supertype(mut self, supertype: impl Into<String>) -> Self {
        self.supertype = Some(supertype.into());
        self
    }

    pub fn with_generic_parameters(mut self, parameters: &[&str]) -> Self {
        self.generic_parameters = parameters.iter().map(|name| name.to_string()).collect();
        self
    }

    pub fn with_conformance(mut self, protocol: impl Into<String>) -> Self {
        self.conformances.push(protocol.into());
        self
    }

    pub fn with_member(mut self, member: KnownMember) -> Self {
        self.members.push(member);
        self
    }

    pub fn with_subscript(mut self, index: SwiftType, element: SwiftType) -> Self {
        self.subscript = Some(KnownSubscript { index, element });
        self
    }

    pub fn members_named<'a>(
        &'a self,
        name: &'a str,
        is_static: bool,
    ) -> impl Iterator<Item = &'a KnownMember> + 'a {
        self.members
            .iter()
            .filter(move |member| member.name() == name && member.is_static() == is_static)
    }

    /// Folds the members and conformances of an extension into this type.
    pub fn absorb(&mut self, other: KnownType) {
        if self.supertype.is_none() {
            self.supertype = other.supertype;
        }
        for conformance in other.conformances {
            if !self.conformances.contains(&conformance) {
                self.conformances.push(conformance);
            }
        }
        self.members.extend(other.members);
        if self.subscript.is_none() {
            self.subscript = other.subscript;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum KnownGlobal {
    Variable { name: String, ty: SwiftType },
    Function(FunctionSignature),
}

impl KnownGlobal {
    pub fn name(&self) -> &str {
        match self {
            KnownGlobal::Variable { name, .. } => name,
            KnownGlobal::Function(signature) => &signature.name,
        }
    }

    pub fn global_type(&self) -> SwiftType {
        match self {
            KnownGlobal::Variable { ty, .. } => ty.clone(),
            KnownGlobal::Function(signature) => signature.swift_closure_type(),
        }
    }
}

/// Symbol lookups consumed by the expression resolver.
pub trait TypeSystem: Send + Sync {
    fn lookup_type(&self, name: &str) -> Option<&KnownType>;

    fn lookup_global(&self, name: &str) -> Option<&KnownGlobal>;

    /// Member named `name` on the type `on`, searching supertypes and then
    /// protocol conformances. Optional layers of `on` are ignored and a
    /// metatype receiver looks up static members.
    fn lookup_member(&self, on: &SwiftType, name: &str, is_static: bool) -> Option<KnownMember> {
        self.lookup_members(on, name, is_static).into_iter().next()
    }

    /// Every overload of `name` visible on `on`, nearest declarations first.
    fn lookup_members(&self, on: &SwiftType, name: &str, is_static: bool) -> Vec<KnownMember> {
        let receiver = on.deep_unwrapped();
        if let SwiftType::Metatype(inner) = receiver {
            return self.lookup_members(inner, name, true);
        }
        let mut found = Vec::new();
        for (type_name, arguments) in receiver_type_names(receiver) {
            for known in type_hierarchy(self, type_name) {
                let substitutions: HashMap<&str, &SwiftType> = known
                    .generic_parameters
                    .iter()
                    .map(String::as_str)
                    .zip(arguments.iter())
                    .collect();
                found.extend(
                    known
                        .members_named(name, is_static)
                        .map(|member| member.substituted(&substitutions)),
                );
            }
        }
        found
    }

    /// Element type produced by subscripting `on`.
    fn lookup_subscript(&self, on: &SwiftType) -> Option<SwiftType> {
        let receiver = on.deep_unwrapped();
        if let Some(element) = receiver.array_element() {
            return Some(element.clone());
        }
        if let Some((_, value)) = receiver.dictionary_types() {
            return Some(SwiftType::optional(value.clone()));
        }
        for (type_name, arguments) in receiver_type_names(receiver) {
            for known in type_hierarchy(self, type_name) {
                if let Some(subscript) = &known.subscript {
                    let substitutions: HashMap<&str, &SwiftType> = known
                        .generic_parameters
                        .iter()
                        .map(String::as_str)
                        .zip(arguments.iter())
                        .collect();
                    return Some(substitute(&subscript.element, &substitutions));
                }
            }
        }
        None
    }

    /// Whether `ty` is `supertype` or inherits from it.
    fn is_subtype(&self, ty: &str, supertype: &str) -> bool {
        type_hierarchy(self, ty)
            .iter()
            .any(|known| known.name == supertype)
    }
}

/// Nominal names a member lookup on `receiver` searches, with the generic
/// arguments of each.
fn receiver_type_names(receiver: &SwiftType) -> Vec<(&str, &[SwiftType])> {
    match receiver {
        SwiftType::Named(name) => vec![(name.as_str(), &[][..])],
        // `AnyObject<P>` searches the protocols it is constrained to.
        SwiftType::Generic { name, parameters } if name == "AnyObject" => parameters
            .iter()
            .flat_map(receiver_type_names)
            .collect(),
        SwiftType::Generic { name, parameters } => vec![(name.as_str(), parameters.as_slice())],
        SwiftType::ProtocolComposition(members) => {
            members.iter().flat_map(receiver_type_names).collect()
        }
        SwiftType::Nested(parts) => parts
            .last()
            .map(receiver_type_names)
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

/// `name` followed by its supertypes, then every protocol reachable from
/// them, breadth first and without repeats.
pub fn type_hierarchy<'a, S: TypeSystem + ?Sized>(system: &'a S, name: &str) -> Vec<&'a KnownType> {
    let mut visited = HashSet::new();
    let mut hierarchy = Vec::new();
    let mut protocols = VecDeque::new();

    let mut current = system.lookup_type(name);
    while let Some(known) = current {
        if !visited.insert(known.name.clone()) {
            break;
        }
        hierarchy.push(known);
        protocols.extend(known.conformances.iter().cloned());
        current = known
            .supertype
            .as_deref()
            .and_then(|supertype| system.lookup_type(supertype));
    }

    while let Some(protocol) = protocols.pop_front() {
        if visited.contains(&protocol) {
            continue;
        }
        if let Some(known) = system.lookup_type(&protocol) {
            visited.insert(protocol);
            protocols.extend(known.conformances.iter().cloned());
            hierarchy.push(known);
        }
    }
    hierarchy
}

fn substitute(ty: &SwiftType, substitutions: &HashMap<&str, &SwiftType>) -> SwiftType {
    if substitutions.is_empty() {
        return ty.clone();
    }
    let all = |types: &[SwiftType]| -> Vec<SwiftType> {
        types.iter().map(|ty| substitute(ty, substitutions)).collect()
    };
    match ty {
        SwiftType::Named(name) => substitutions
            .get(name.as_str())
            .map(|replacement| (*replacement).clone())
            .unwrap_or_else(|| ty.clone()),
        SwiftType::Generic { name, parameters } => SwiftType::generic(name.clone(), all(parameters)),
        SwiftType::ProtocolComposition(members) => SwiftType::ProtocolComposition(all(members)),
        SwiftType::Tuple(members) => SwiftType::Tuple(all(members)),
        SwiftType::Block {
            return_type,
            parameters,
        } => SwiftType::block(substitute(return_type, substitutions), all(parameters)),
        SwiftType::Optional(inner) => SwiftType::optional(substitute(inner, substitutions)),
        SwiftType::ImplicitlyUnwrappedOptional(inner) => {
            SwiftType::implicitly_unwrapped(substitute(inner, substitutions))
        }
        SwiftType::Metatype(inner) => SwiftType::metatype(substitute(inner, substitutions)),
        SwiftType::Nested(parts) => SwiftType::Nested(all(parts)),
    }
}

/// Type system backed by plain maps; other type systems layer over it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapTypeSystem {
    types: IndexMap<String, KnownType>,
    globals: IndexMap<String, KnownGlobal>,
}

impl MapTypeSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `ty`, folding it into an existing type of the same name.
    pub fn add_type(&mut self, ty: KnownType) {
        match self.types.get_mut(&ty.name) {
            Some(existing) => existing.absorb(ty),
            None => {
                self.types.insert(ty.name.clone(), ty);
            }
        }
    }

    pub fn add_global(&mut self, global: KnownGlobal) {
        self.globals.insert(global.name().to_string(), global);
    }

    pub fn types(&self) -> impl Iterator<Item = &KnownType> {
        self.types.values()
    }

    pub fn extend(&mut self, other: MapTypeSystem) {
        for (_, ty) in other.types {
            self.add_type(ty);
        }
        for (name, global) in other.globals {
            self.globals.entry(name).or_insert(global);
        }
    }
}

impl TypeSystem for MapTypeSystem {
    fn lookup_type(&self, name: &str) -> Option<&KnownType> {
        self.types.get(name)
    }

    fn lookup_global(&self, name: &str) -> Option<&KnownGlobal> {
        self.globals.get(name)
    }
}
