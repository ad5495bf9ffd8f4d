// o2s_objc/node - Objective-C syntax tree handed over by the parser
//! The parser collaborator delivers one [`ObjcNode`] tree per input file.
//! Method and function bodies arrive already lowered to Swift statement
//! trees, with unparseable fragments as `Unknown` nodes.

use crate::types::ObjcType;
use o2s_ast::{CompoundStatement, Expression, Span};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjcNode {
    pub kind: ObjcNodeKind,
    #[serde(default)]
    pub span: Span,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ObjcNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum ObjcNodeKind {
    GlobalContext,
    ClassInterface {
        name: String,
    },
    ClassImplementation {
        name: String,
    },
    /// Category interface or implementation; `category_name` is absent for
    /// class extensions (`@interface Foo ()`).
    ClassCategory {
        class_name: String,
        #[serde(default)]
        category_name: Option<String>,
        #[serde(default)]
        implementation: bool,
    },
    ProtocolDeclaration {
        name: String,
    },
    SuperclassName {
        name: String,
    },
    ProtocolReferenceList {
        protocols: Vec<String>,
    },
    PropertyDefinition {
        name: String,
        ty: ObjcType,
        /// Raw attribute spellings: `nonatomic`, `readonly`, `getter=isOn`.
        #[serde(default)]
        attributes: Vec<String>,
    },
    MethodDefinition(MethodDefinition),
    IvarsList,
    IvarDeclaration {
        name: String,
        ty: ObjcType,
    },
    /// Access keywords inside ivar lists (`@private`, `@public`, ...) and
    /// `@optional`/`@required` inside protocols.
    Keyword {
        keyword: String,
    },
    VariableDeclaration {
        name: String,
        ty: ObjcType,
        #[serde(default)]
        initializer: Option<Expression>,
    },
    FunctionDefinition {
        name: String,
        return_type: ObjcType,
        #[serde(default)]
        parameters: Vec<FunctionParameter>,
        #[serde(default)]
        body: Option<CompoundStatement>,
    },
    Typedef {
        name: String,
        ty: ObjcType,
    },
    /// Bare identifiers at file scope, e.g. `NS_ASSUME_NONNULL_BEGIN`.
    Identifier {
        name: String,
    },
    PreprocessorDirective {
        text: String,
    },
    Unknown {
        text: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDefinition {
    #[serde(default)]
    pub is_class_method: bool,
    pub return_type: ObjcType,
    pub selector: MethodSelector,
    #[serde(default)]
    pub body: Option<CompoundStatement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MethodSelector {
    /// Selector without arguments, e.g. `- (void)reload`.
    Simple(String),
    Keywords(Vec<KeywordDeclarator>),
}

/// One `keyword:(Type)name` part of a selector. The keyword may be empty
/// for selectors such as `add::`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordDeclarator {
    #[serde(default)]
    pub keyword: Option<String>,
    pub ty: ObjcType,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionParameter {
    pub name: String,
    pub ty: ObjcType,
}

impl MethodSelector {
    /// Selector spelling, e.g. `insert:atIndex:`.
    pub fn selector_string(&self) -> String {
        match self {
            MethodSelector::Simple(name) => name.clone(),
            MethodSelector::Keywords(keywords) => keywords
                .iter()
                .map(|part| format!("{}:", part.keyword.as_deref().unwrap_or("")))
                .collect(),
        }
    }
}

impl ObjcNode {
    pub fn new(kind: ObjcNodeKind) -> Self {
        Self {
            kind,
            span: Span::dummy(),
            children: Vec::new(),
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn with_children(mut self, children: Vec<ObjcNode>) -> Self {
        self.children = children;
        self
    }

    /// Short kind name used in logs and diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            ObjcNodeKind::GlobalContext => "global context",
            ObjcNodeKind::ClassInterface { .. } => "class interface",
            ObjcNodeKind::ClassImplementation { .. } => "class implementation",
            ObjcNodeKind::ClassCategory { .. } => "class category",
            ObjcNodeKind::ProtocolDeclaration { .. } => "protocol declaration",
            ObjcNodeKind::SuperclassName { .. } => "superclass name",
            ObjcNodeKind::ProtocolReferenceList { .. } => "protocol reference list",
            ObjcNodeKind::PropertyDefinition { .. } => "property definition",
            ObjcNodeKind::MethodDefinition(_) => "method definition",
            ObjcNodeKind::IvarsList => "ivars list",
            ObjcNodeKind::IvarDeclaration { .. } => "ivar declaration",
            ObjcNodeKind::Keyword { .. } => "keyword",
            ObjcNodeKind::VariableDeclaration { .. } => "variable declaration",
            ObjcNodeKind::FunctionDefinition { .. } => "function definition",
            ObjcNodeKind::Typedef { .. } => "typedef",
            ObjcNodeKind::Identifier { .. } => "identifier",
            ObjcNodeKind::PreprocessorDirective { .. } => "preprocessor directive",
            ObjcNodeKind::Unknown { .. } => "unknown",
        }
    }

    /// Declared name for named nodes.
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            ObjcNodeKind::ClassInterface { name }
            | ObjcNodeKind::ClassImplementation { name }
            | ObjcNodeKind::ProtocolDeclaration { name }
            | ObjcNodeKind::SuperclassName { name }
            | ObjcNodeKind::PropertyDefinition { name, .. }
            | ObjcNodeKind::IvarDeclaration { name, .. }
            | ObjcNodeKind::VariableDeclaration { name, .. }
            | ObjcNodeKind::FunctionDefinition { name, .. }
            | ObjcNodeKind::Typedef { name, .. }
            | ObjcNodeKind::Identifier { name } => Some(name.as_str()),
            ObjcNodeKind::ClassCategory { class_name, .. } => Some(class_name.as_str()),
            _ => None,
        }
    }

    /// Superclass named by a direct `SuperclassName` child.
    pub fn superclass_name(&self) -> Option<&str> {
        self.children.iter().find_map(|child| match &child.kind {
            ObjcNodeKind::SuperclassName { name } => Some(name.as_str()),
            _ => None,
        })
    }

    /// Protocols listed by direct `ProtocolReferenceList` children.
    pub fn protocol_names(&self) -> Vec<&str> {
        self.children
            .iter()
            .filter_map(|child| match &child.kind {
                ObjcNodeKind::ProtocolReferenceList { protocols } => Some(protocols),
                _ => None,
            })
            .flatten()
            .map(String::as_str)
            .collect()
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(ObjcNode::node_count).sum::<usize>()
    }
}
