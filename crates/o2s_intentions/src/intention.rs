// o2s_intentions/intention - Intention payloads
//! Data carried by each node of the intention graph. Child lists are owned
//! by the [`IntentionCollection`](crate::IntentionCollection) and exposed
//! read-only; use the collection to attach, move or remove children.

use crate::collection::IntentionId;
use crate::signature::FunctionSignature;
use o2s_ast::{CompoundStatement, Expression, Span, SwiftType};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AccessLevel {
    Private,
    Fileprivate,
    #[default]
    Internal,
    Public,
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AccessLevel::Private => "private",
            AccessLevel::Fileprivate => "fileprivate",
            AccessLevel::Internal => "internal",
            AccessLevel::Public => "public",
        })
    }
}

/// Syntax node an intention was created from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceNodeRef {
    pub file: Option<String>,
    pub node_kind: String,
    pub span: Span,
}

impl SourceNodeRef {
    pub fn new(file: Option<&str>, node_kind: impl Into<String>, span: Span) -> Self {
        Self {
            file: file.map(str::to_string),
            node_kind: node_kind.into(),
            span,
        }
    }
}

/// Attributes shared by every intention.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IntentionHeader {
    pub access_level: AccessLevel,
    /// `None` for intentions synthesized by passes.
    pub source: Option<SourceNodeRef>,
    /// Declared between `NS_ASSUME_NONNULL_BEGIN` and `NS_ASSUME_NONNULL_END`.
    pub in_nonnull_context: bool,
}

impl IntentionHeader {
    pub fn from_source(source: SourceNodeRef, in_nonnull_context: bool) -> Self {
        Self {
            access_level: AccessLevel::Internal,
            source: Some(source),
            in_nonnull_context,
        }
    }

    pub fn synthesized() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Ownership {
    #[default]
    Strong,
    Weak,
    Unowned,
    UnownedUnsafe,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueStorage {
    pub ty: SwiftType,
    pub ownership: Ownership,
    pub is_constant: bool,
}

impl ValueStorage {
    pub fn new(ty: SwiftType) -> Self {
        Self {
            ty,
            ownership: Ownership::Strong,
            is_constant: false,
        }
    }

    pub fn with_ownership(mut self, ownership: Ownership) -> Self {
        self.ownership = ownership;
        self
    }

    pub fn constant(mut self) -> Self {
        self.is_constant = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FunctionBody {
    pub body: CompoundStatement,
    pub source: Option<SourceNodeRef>,
}

impl FunctionBody {
    pub fn new(body: CompoundStatement) -> Self {
        Self { body, source: None }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySetter {
    /// Name the new value is bound to inside the setter body.
    pub value_identifier: String,
    pub body: FunctionBody,
}

/// How a property is emitted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum PropertyMode {
    /// Plain stored `var`; accessors have not been folded in.
    #[default]
    Field,
    /// Computed property backed by accessor bodies.
    Computed {
        getter: FunctionBody,
        setter: Option<PropertySetter>,
    },
    /// Property whose getter and setter methods were both folded in.
    Property {
        getter: FunctionBody,
        setter: PropertySetter,
    },
}

impl PropertyMode {
    pub fn is_field(&self) -> bool {
        matches!(self, PropertyMode::Field)
    }

    pub fn is_computed(&self) -> bool {
        matches!(self, PropertyMode::Computed { .. })
    }

    pub fn has_accessors(&self) -> bool {
        !self.is_field()
    }
}

/// Objective-C property attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyAttribute {
    Attribute(String),
    Getter(String),
    Setter(String),
}

impl PropertyAttribute {
    /// Parses a raw attribute such as `readonly`, `getter=isOn` or
    /// `setter=setOn:`.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.split_once('=') {
            Some((key, value)) if key.trim() == "getter" => {
                PropertyAttribute::Getter(value.trim().to_string())
            }
            Some((key, value)) if key.trim() == "setter" => {
                PropertyAttribute::Setter(value.trim().trim_end_matches(':').to_string())
            }
            _ => PropertyAttribute::Attribute(raw.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyGenerationIntention {
    pub name: String,
    pub storage: ValueStorage,
    pub mode: PropertyMode,
    pub attributes: Vec<PropertyAttribute>,
    pub is_static: bool,
    pub header: IntentionHeader,
}

impl PropertyGenerationIntention {
    pub fn new(name: impl Into<String>, ty: SwiftType) -> Self {
        Self {
            name: name.into(),
            storage: ValueStorage::new(ty),
            mode: PropertyMode::Field,
            attributes: Vec::new(),
            is_static: false,
            header: IntentionHeader::synthesized(),
        }
    }

    pub fn with_attributes(mut self, attributes: Vec<PropertyAttribute>) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn ty(&self) -> &SwiftType {
        &self.storage.ty
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes
            .iter()
            .any(|attribute| matches!(attribute, PropertyAttribute::Attribute(value) if value == name))
    }

    pub fn is_readonly(&self) -> bool {
        self.has_attribute("readonly")
    }

    /// Getter selector name: `getter=` attribute or the property name.
    pub fn getter_name(&self) -> String {
        self.attributes
            .iter()
            .find_map(|attribute| match attribute {
                PropertyAttribute::Getter(name) => Some(name.clone()),
                _ => None,
            })
            .unwrap_or_else(|| self.name.clone())
    }

    /// Setter selector name: `setter=` attribute or `set<Name>`.
    pub fn setter_name(&self) -> String {
        self.attributes
            .iter()
            .find_map(|attribute| match attribute {
                PropertyAttribute::Setter(name) => Some(name.clone()),
                _ => None,
            })
            .unwrap_or_else(|| format!("set{}", capitalized(&self.name)))
    }
}

fn capitalized(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodGenerationIntention {
    pub signature: FunctionSignature,
    pub body: Option<FunctionBody>,
    pub header: IntentionHeader,
}

impl MethodGenerationIntention {
    pub fn new(signature: FunctionSignature) -> Self {
        Self {
            signature,
            body: None,
            header: IntentionHeader::synthesized(),
        }
    }

    pub fn with_body(mut self, body: FunctionBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn name(&self) -> &str {
        &self.signature.name
    }

    pub fn is_static(&self) -> bool {
        self.signature.is_static
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceVariableGenerationIntention {
    pub name: String,
    pub storage: ValueStorage,
    pub header: IntentionHeader,
}

impl InstanceVariableGenerationIntention {
    pub fn new(name: impl Into<String>, ty: SwiftType) -> Self {
        Self {
            name: name.into(),
            storage: ValueStorage::new(ty),
            header: IntentionHeader {
                access_level: AccessLevel::Private,
                ..IntentionHeader::synthesized()
            },
        }
    }
}

/// Conformance of a type to a protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtocolInheritanceIntention {
    pub protocol_name: String,
    pub header: IntentionHeader,
}

impl ProtocolInheritanceIntention {
    pub fn new(protocol_name: impl Into<String>) -> Self {
        Self {
            protocol_name: protocol_name.into(),
            header: IntentionHeader::synthesized(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalFunctionGenerationIntention {
    pub signature: FunctionSignature,
    pub body: Option<FunctionBody>,
    pub header: IntentionHeader,
}

impl GlobalFunctionGenerationIntention {
    pub fn new(signature: FunctionSignature) -> Self {
        Self {
            signature,
            body: None,
            header: IntentionHeader::synthesized(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalVariableGenerationIntention {
    pub name: String,
    pub storage: ValueStorage,
    pub initial_value: Option<Expression>,
    pub header: IntentionHeader,
}

impl GlobalVariableGenerationIntention {
    pub fn new(name: impl Into<String>, storage: ValueStorage) -> Self {
        Self {
            name: name.into(),
            storage,
            initial_value: None,
            header: IntentionHeader::synthesized(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypealiasIntention {
    pub name: String,
    pub aliased: SwiftType,
    pub header: IntentionHeader,
}

impl TypealiasIntention {
    pub fn new(name: impl Into<String>, aliased: SwiftType) -> Self {
        Self {
            name: name.into(),
            aliased,
            header: IntentionHeader::synthesized(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeIntentionKind {
    Class { superclass_name: Option<String> },
    /// Objective-C category or class extension.
    Extension { category_name: Option<String> },
    Protocol,
}

/// Class, extension or protocol declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeGenerationIntention {
    pub type_name: String,
    pub kind: TypeIntentionKind,
    pub header: IntentionHeader,
    pub(crate) properties: Vec<IntentionId>,
    pub(crate) methods: Vec<IntentionId>,
    pub(crate) instance_variables: Vec<IntentionId>,
    pub(crate) protocols: Vec<IntentionId>,
}

impl TypeGenerationIntention {
    pub fn class(type_name: impl Into<String>) -> Self {
        Self::with_kind(
            type_name,
            TypeIntentionKind::Class {
                superclass_name: None,
            },
        )
    }

    pub fn extension(type_name: impl Into<String>, category_name: Option<&str>) -> Self {
        Self::with_kind(
            type_name,
            TypeIntentionKind::Extension {
                category_name: category_name.map(str::to_string),
            },
        )
    }

    pub fn protocol(type_name: impl Into<String>) -> Self {
        Self::with_kind(type_name, TypeIntentionKind::Protocol)
    }

    fn with_kind(type_name: impl Into<String>, kind: TypeIntentionKind) -> Self {
        Self {
            type_name: type_name.into(),
            kind,
            header: IntentionHeader::synthesized(),
            properties: Vec::new(),
            methods: Vec::new(),
            instance_variables: Vec::new(),
            protocols: Vec::new(),
        }
    }

    pub fn with_superclass(mut self, superclass: impl Into<String>) -> Self {
        if let TypeIntentionKind::Class { superclass_name } = &mut self.kind {
            *superclass_name = Some(superclass.into());
        }
        self
    }

    pub fn is_class(&self) -> bool {
        matches!(self.kind, TypeIntentionKind::Class { .. })
    }

    pub fn is_extension(&self) -> bool {
        matches!(self.kind, TypeIntentionKind::Extension { .. })
    }

    pub fn is_protocol(&self) -> bool {
        matches!(self.kind, TypeIntentionKind::Protocol)
    }

    pub fn superclass_name(&self) -> Option<&str> {
        match &self.kind {
            TypeIntentionKind::Class { superclass_name } => superclass_name.as_deref(),
            _ => None,
        }
    }

    pub fn category_name(&self) -> Option<&str> {
        match &self.kind {
            TypeIntentionKind::Extension { category_name } => category_name.as_deref(),
            _ => None,
        }
    }

    pub fn properties(&self) -> &[IntentionId] {
        &self.properties
    }

    pub fn methods(&self) -> &[IntentionId] {
        &self.methods
    }

    pub fn instance_variables(&self) -> &[IntentionId] {
        &self.instance_variables
    }

    pub fn protocols(&self) -> &[IntentionId] {
        &self.protocols
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileGenerationIntention {
    pub source_path: String,
    pub target_path: String,
    pub header: IntentionHeader,
    pub preprocessor_directives: Vec<String>,
    pub(crate) types: Vec<IntentionId>,
    pub(crate) typealiases: Vec<IntentionId>,
    pub(crate) global_functions: Vec<IntentionId>,
    pub(crate) global_variables: Vec<IntentionId>,
}

impl FileGenerationIntention {
    pub fn new(source_path: impl Into<String>, target_path: impl Into<String>) -> Self {
        Self {
            source_path: source_path.into(),
            target_path: target_path.into(),
            header: IntentionHeader::synthesized(),
            preprocessor_directives: Vec::new(),
            types: Vec::new(),
            typealiases: Vec::new(),
            global_functions: Vec::new(),
            global_variables: Vec::new(),
        }
    }

    /// Whether the source is an Objective-C header.
    pub fn is_header(&self) -> bool {
        self.source_path.ends_with(".h")
    }

    pub fn types(&self) -> &[IntentionId] {
        &self.types
    }

    pub fn typealiases(&self) -> &[IntentionId] {
        &self.typealiases
    }

    pub fn global_functions(&self) -> &[IntentionId] {
        &self.global_functions
    }

    pub fn global_variables(&self) -> &[IntentionId] {
        &self.global_variables
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
            && self.typealiases.is_empty()
            && self.global_functions.is_empty()
            && self.global_variables.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Intention {
    File(FileGenerationIntention),
    Type(TypeGenerationIntention),
    Property(PropertyGenerationIntention),
    Method(MethodGenerationIntention),
    InstanceVariable(InstanceVariableGenerationIntention),
    ProtocolConformance(ProtocolInheritanceIntention),
    GlobalFunction(GlobalFunctionGenerationIntention),
    GlobalVariable(GlobalVariableGenerationIntention),
    Typealias(TypealiasIntention),
}

impl Intention {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Intention::File(_) => "file",
            Intention::Type(_) => "type",
            Intention::Property(_) => "property",
            Intention::Method(_) => "method",
            Intention::InstanceVariable(_) => "instance variable",
            Intention::ProtocolConformance(_) => "protocol conformance",
            Intention::GlobalFunction(_) => "global function",
            Intention::GlobalVariable(_) => "global variable",
            Intention::Typealias(_) => "typealias",
        }
    }

    pub fn header(&self) -> &IntentionHeader {
        match self {
            Intention::File(file) => &file.header,
            Intention::Type(ty) => &ty.header,
            Intention::Property(property) => &property.header,
            Intention::Method(method) => &method.header,
            Intention::InstanceVariable(ivar) => &ivar.header,
            Intention::ProtocolConformance(conformance) => &conformance.header,
            Intention::GlobalFunction(function) => &function.header,
            Intention::GlobalVariable(variable) => &variable.header,
            Intention::Typealias(alias) => &alias.header,
        }
    }

    pub fn header_mut(&mut self) -> &mut IntentionHeader {
        match self {
            Intention::File(file) => &mut file.header,
            Intention::Type(ty) => &mut ty.header,
            Intention::Property(property) => &mut property.header,
            Intention::Method(method) => &mut method.header,
            Intention::InstanceVariable(ivar) => &mut ivar.header,
            Intention::ProtocolConformance(conformance) => &mut conformance.header,
            Intention::GlobalFunction(function) => &mut function.header,
            Intention::GlobalVariable(variable) => &mut variable.header,
            Intention::Typealias(alias) => &mut alias.header,
        }
    }

    /// All child ids in declaration order.
    pub fn children(&self) -> Vec<IntentionId> {
        match self {
            Intention::File(file) => file
                .types
                .iter()
                .chain(&file.typealiases)
                .chain(&file.global_functions)
                .chain(&file.global_variables)
                .copied()
                .collect(),
            Intention::Type(ty) => ty
                .properties
                .iter()
                .chain(&ty.methods)
                .chain(&ty.instance_variables)
                .chain(&ty.protocols)
                .copied()
                .collect(),
            _ => Vec::new(),
        }
    }

    pub(crate) fn child_lists_mut(&mut self) -> Vec<&mut Vec<IntentionId>> {
        match self {
            Intention::File(file) => vec![
                &mut file.types,
                &mut file.typealiases,
                &mut file.global_functions,
                &mut file.global_variables,
            ],
            Intention::Type(ty) => vec![
                &mut ty.properties,
                &mut ty.methods,
                &mut ty.instance_variables,
                &mut ty.protocols,
            ],
            _ => Vec::new(),
        }
    }
}
