// o2s_ast/swift_type - Target type model
//! Closed model of the Swift types the rewriter can emit.
//!
//! Arrays and dictionaries are ordinary generic types named `Array` and
//! `Dictionary`; only their textual form is special (`[T]`, `[K: V]`). The
//! empty tuple doubles as `Void`.

use serde::{Deserialize, Serialize};
use std::fmt;

const UNKNOWN_TYPE_NAME: &str = "<<unknown>>";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwiftType {
    /// Plain nominal type, e.g. `Int`.
    Named(String),
    /// Nominal type with generic arguments, e.g. `Set<Int>`.
    Generic {
        name: String,
        parameters: Vec<SwiftType>,
    },
    /// `A & B`; always two or more members.
    ProtocolComposition(Vec<SwiftType>),
    /// `(A, B)`; either empty (`Void`) or two or more members.
    Tuple(Vec<SwiftType>),
    Block {
        return_type: Box<SwiftType>,
        parameters: Vec<SwiftType>,
    },
    Optional(Box<SwiftType>),
    ImplicitlyUnwrappedOptional(Box<SwiftType>),
    Metatype(Box<SwiftType>),
    /// `A.B.C`
    Nested(Vec<SwiftType>),
}

/// One layer of optionality, outermost first when collected from a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionalKind {
    Optional,
    ImplicitlyUnwrapped,
}

impl SwiftType {
    pub fn named(name: impl Into<String>) -> Self {
        SwiftType::Named(name.into())
    }

    pub fn generic(name: impl Into<String>, parameters: Vec<SwiftType>) -> Self {
        SwiftType::Generic {
            name: name.into(),
            parameters,
        }
    }

    pub fn array(element: SwiftType) -> Self {
        SwiftType::generic("Array", vec![element])
    }

    pub fn dictionary(key: SwiftType, value: SwiftType) -> Self {
        SwiftType::generic("Dictionary", vec![key, value])
    }

    /// Builds `A & B & ...`. Callers must pass at least two members.
    pub fn protocol_composition(types: Vec<SwiftType>) -> Self {
        debug_assert!(
            types.len() >= 2,
            "protocol composition requires at least two members"
        );
        SwiftType::ProtocolComposition(types)
    }

    /// Builds a tuple. Callers must pass zero or at least two members.
    pub fn tuple(types: Vec<SwiftType>) -> Self {
        debug_assert!(
            types.len() != 1,
            "single-element tuples are not representable"
        );
        SwiftType::Tuple(types)
    }

    pub fn block(return_type: SwiftType, parameters: Vec<SwiftType>) -> Self {
        SwiftType::Block {
            return_type: Box::new(return_type),
            parameters,
        }
    }

    pub fn optional(inner: SwiftType) -> Self {
        SwiftType::Optional(Box::new(inner))
    }

    pub fn implicitly_unwrapped(inner: SwiftType) -> Self {
        SwiftType::ImplicitlyUnwrappedOptional(Box::new(inner))
    }

    pub fn metatype(inner: SwiftType) -> Self {
        SwiftType::Metatype(Box::new(inner))
    }

    pub fn nested(types: Vec<SwiftType>) -> Self {
        SwiftType::Nested(types)
    }

    pub fn void() -> Self {
        SwiftType::Tuple(Vec::new())
    }

    pub fn int() -> Self {
        SwiftType::named("Int")
    }

    pub fn uint() -> Self {
        SwiftType::named("UInt")
    }

    pub fn bool() -> Self {
        SwiftType::named("Bool")
    }

    pub fn float() -> Self {
        SwiftType::named("Float")
    }

    pub fn double() -> Self {
        SwiftType::named("Double")
    }

    pub fn cg_float() -> Self {
        SwiftType::named("CGFloat")
    }

    pub fn string() -> Self {
        SwiftType::named("String")
    }

    pub fn any() -> Self {
        SwiftType::named("Any")
    }

    pub fn any_object() -> Self {
        SwiftType::named("AnyObject")
    }

    pub fn selector() -> Self {
        SwiftType::named("Selector")
    }

    /// Sentinel assigned by the type resolver when resolution fails.
    pub fn unknown() -> Self {
        SwiftType::named(UNKNOWN_TYPE_NAME)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, SwiftType::Named(name) if name == UNKNOWN_TYPE_NAME)
    }

    pub fn is_void(&self) -> bool {
        match self {
            SwiftType::Tuple(types) => types.is_empty(),
            SwiftType::Named(name) => name == "Void",
            _ => false,
        }
    }

    /// `true` for both `T?` and `T!`.
    pub fn is_optional(&self) -> bool {
        matches!(
            self,
            SwiftType::Optional(_) | SwiftType::ImplicitlyUnwrappedOptional(_)
        )
    }

    pub fn is_implicitly_unwrapped(&self) -> bool {
        matches!(self, SwiftType::ImplicitlyUnwrappedOptional(_))
    }

    pub fn is_block(&self) -> bool {
        matches!(self, SwiftType::Block { .. })
    }

    pub fn is_metatype(&self) -> bool {
        matches!(self, SwiftType::Metatype(_))
    }

    pub fn wrapped_in_optional(self) -> Self {
        SwiftType::optional(self)
    }

    pub fn wrapped_in_implicitly_unwrapped(self) -> Self {
        SwiftType::implicitly_unwrapped(self)
    }

    /// Strips one optional layer.
    pub fn unwrapped(&self) -> &SwiftType {
        match self {
            SwiftType::Optional(inner) | SwiftType::ImplicitlyUnwrappedOptional(inner) => inner,
            other => other,
        }
    }

    /// Strips every optional layer.
    pub fn deep_unwrapped(&self) -> &SwiftType {
        let mut current = self;
        while current.is_optional() {
            current = current.unwrapped();
        }
        current
    }

    pub fn optional_layers(&self) -> Vec<OptionalKind> {
        let mut layers = Vec::new();
        let mut current = self;
        loop {
            match current {
                SwiftType::Optional(inner) => {
                    layers.push(OptionalKind::Optional);
                    current = inner;
                }
                SwiftType::ImplicitlyUnwrappedOptional(inner) => {
                    layers.push(OptionalKind::ImplicitlyUnwrapped);
                    current = inner;
                }
                _ => return layers,
            }
        }
    }

    /// Replaces the optional shape of `self` with the shape of `other`,
    /// keeping the deep-unwrapped base of `self`.
    pub fn with_same_optionality_as(&self, other: &SwiftType) -> SwiftType {
        other
            .optional_layers()
            .into_iter()
            .rev()
            .fold(self.deep_unwrapped().clone(), |ty, layer| match layer {
                OptionalKind::Optional => SwiftType::optional(ty),
                OptionalKind::ImplicitlyUnwrapped => SwiftType::implicitly_unwrapped(ty),
            })
    }

    /// Name of a nominal (plain or generic) type.
    pub fn type_name(&self) -> Option<&str> {
        match self {
            SwiftType::Named(name) => Some(name),
            SwiftType::Generic { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn is_nominal(&self) -> bool {
        self.type_name().is_some()
    }

    pub fn generic_parameters(&self) -> &[SwiftType] {
        match self {
            SwiftType::Generic { parameters, .. } => parameters,
            _ => &[],
        }
    }

    pub fn array_element(&self) -> Option<&SwiftType> {
        match self {
            SwiftType::Generic { name, parameters } if name == "Array" && parameters.len() == 1 => {
                parameters.first()
            }
            _ => None,
        }
    }

    pub fn dictionary_types(&self) -> Option<(&SwiftType, &SwiftType)> {
        match self {
            SwiftType::Generic { name, parameters }
                if name == "Dictionary" && parameters.len() == 2 =>
            {
                Some((&parameters[0], &parameters[1]))
            }
            _ => None,
        }
    }

    /// Return and parameter types of a block type.
    pub fn block_signature(&self) -> Option<(&SwiftType, &[SwiftType])> {
        match self {
            SwiftType::Block {
                return_type,
                parameters,
            } => Some((return_type, parameters)),
            _ => None,
        }
    }

    fn needs_parens_before_suffix(&self) -> bool {
        matches!(
            self,
            SwiftType::ProtocolComposition(_) | SwiftType::Block { .. }
        )
    }

    fn fmt_with_suffix(&self, f: &mut fmt::Formatter<'_>, suffix: &str) -> fmt::Result {
        if self.needs_parens_before_suffix() {
            write!(f, "({}){}", self, suffix)
        } else {
            write!(f, "{}{}", self, suffix)
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, types: &[SwiftType], separator: &str) -> fmt::Result {
    for (index, ty) in types.iter().enumerate() {
        if index > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{}", ty)?;
    }
    Ok(())
}

impl fmt::Display for SwiftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwiftType::Named(name) => f.write_str(name),
            SwiftType::Generic { name, parameters } => {
                if let Some(element) = self.array_element() {
                    return write!(f, "[{}]", element);
                }
                if let Some((key, value)) = self.dictionary_types() {
                    return write!(f, "[{}: {}]", key, value);
                }
                write!(f, "{}<", name)?;
                write_joined(f, parameters, ", ")?;
                f.write_str(">")
            }
            SwiftType::ProtocolComposition(types) => write_joined(f, types, " & "),
            SwiftType::Tuple(types) if types.is_empty() => f.write_str("Void"),
            SwiftType::Tuple(types) => {
                f.write_str("(")?;
                write_joined(f, types, ", ")?;
                f.write_str(")")
            }
            SwiftType::Block {
                return_type,
                parameters,
            } => {
                f.write_str("(")?;
                write_joined(f, parameters, ", ")?;
                write!(f, ") -> {}", return_type)
            }
            SwiftType::Optional(inner) => inner.fmt_with_suffix(f, "?"),
            SwiftType::ImplicitlyUnwrappedOptional(inner) => inner.fmt_with_suffix(f, "!"),
            SwiftType::Metatype(inner) => inner.fmt_with_suffix(f, ".Type"),
            SwiftType::Nested(types) => write_joined(f, types, "."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deep_unwrapped_strips_every_layer() {
        let ty = SwiftType::optional(SwiftType::implicitly_unwrapped(SwiftType::int()));
        assert_eq!(ty.deep_unwrapped(), &SwiftType::int());
        assert_eq!(ty.unwrapped(), &SwiftType::implicitly_unwrapped(SwiftType::int()));
    }

    #[test]
    fn same_optionality_copies_shape_onto_base() {
        let shape = SwiftType::optional(SwiftType::implicitly_unwrapped(SwiftType::int()));
        let base = SwiftType::implicitly_unwrapped(SwiftType::string());

        let result = base.with_same_optionality_as(&shape);

        assert_eq!(
            result,
            SwiftType::optional(SwiftType::implicitly_unwrapped(SwiftType::string()))
        );
        assert_eq!(
            SwiftType::string().with_same_optionality_as(&SwiftType::int()),
            SwiftType::string()
        );
    }

    #[test]
    fn unknown_sentinel_is_recognised() {
        assert!(SwiftType::unknown().is_unknown());
        assert!(!SwiftType::named("Unknown").is_unknown());
    }
}
