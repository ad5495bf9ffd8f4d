// o2s_intentions/signature - Function and method signatures
use o2s_ast::SwiftType;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParameterSignature {
    /// External label; `None` is the `_` wildcard.
    pub label: Option<String>,
    pub name: String,
    pub ty: SwiftType,
}

impl ParameterSignature {
    pub fn new(label: Option<&str>, name: impl Into<String>, ty: SwiftType) -> Self {
        Self {
            label: label.map(str::to_string),
            name: name.into(),
            ty,
        }
    }

    pub fn unlabeled(name: impl Into<String>, ty: SwiftType) -> Self {
        Self::new(None, name, ty)
    }

    pub fn label_str(&self) -> &str {
        self.label.as_deref().unwrap_or("_")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionSignature {
    pub name: String,
    pub parameters: Vec<ParameterSignature>,
    pub return_type: SwiftType,
    pub is_static: bool,
}

impl FunctionSignature {
    pub fn new(
        name: impl Into<String>,
        parameters: Vec<ParameterSignature>,
        return_type: SwiftType,
        is_static: bool,
    ) -> Self {
        Self {
            name: name.into(),
            parameters,
            return_type,
            is_static,
        }
    }

    /// Compares the selector shape only: name, arity and the label of every
    /// parameter. Types and the static flag are ignored; callers pairing
    /// `+` and `-` methods compare `is_static` themselves.
    pub fn matches_as_selector(&self, other: &FunctionSignature) -> bool {
        self.name == other.name
            && self.parameters.len() == other.parameters.len()
            && self
                .parameters
                .iter()
                .zip(&other.parameters)
                .all(|(lhs, rhs)| lhs.label == rhs.label)
    }

    /// Whether a call with these argument labels could target this signature.
    pub fn accepts_labels(&self, labels: &[Option<&str>]) -> bool {
        self.parameters.len() == labels.len()
            && self
                .parameters
                .iter()
                .zip(labels)
                .all(|(parameter, label)| parameter.label.as_deref() == *label)
    }

    /// Swift selector spelling, e.g. `insert(_:atIndex:)`.
    pub fn selector(&self) -> String {
        let labels: String = self
            .parameters
            .iter()
            .map(|parameter| format!("{}:", parameter.label_str()))
            .collect();
        format!("{}({})", self.name, labels)
    }

    /// The signature as a Swift function type.
    pub fn swift_closure_type(&self) -> SwiftType {
        SwiftType::block(
            self.return_type.clone(),
            self.parameters
                .iter()
                .map(|parameter| parameter.ty.clone())
                .collect(),
        )
    }

    pub fn is_initializer(&self) -> bool {
        self.name == "init"
    }
}

impl fmt::Display for FunctionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_static {
            f.write_str("static ")?;
        }
        if self.is_initializer() {
            f.write_str("init(")?;
        } else {
            write!(f, "func {}(", self.name)?;
        }
        for (index, parameter) in self.parameters.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            match &parameter.label {
                Some(label) if *label == parameter.name => {
                    write!(f, "{}: {}", parameter.name, parameter.ty)?
                }
                Some(label) => write!(f, "{} {}: {}", label, parameter.name, parameter.ty)?,
                None => write!(f, "_ {}: {}", parameter.name, parameter.ty)?,
            }
        }
        f.write_str(")")?;
        if !self.return_type.is_void() && !self.is_initializer() {
            write!(f, " -> {}", self.return_type)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insert_signature(index_type: SwiftType, return_type: SwiftType) -> FunctionSignature {
        FunctionSignature::new(
            "insert",
            vec![
                ParameterSignature::unlabeled("object", SwiftType::any_object()),
                ParameterSignature::new(Some("atIndex"), "index", index_type),
            ],
            return_type,
            false,
        )
    }

    #[test]
    fn selector_match_ignores_types() {
        let lhs = insert_signature(SwiftType::int(), SwiftType::void());
        let rhs = insert_signature(
            SwiftType::implicitly_unwrapped(SwiftType::uint()),
            SwiftType::bool(),
        );

        assert!(lhs.matches_as_selector(&rhs));
        assert_ne!(lhs, rhs);
    }

    #[test]
    fn selector_match_ignores_static_flag() {
        let instance = insert_signature(SwiftType::int(), SwiftType::void());
        let mut class_method = instance.clone();
        class_method.is_static = true;

        assert!(instance.matches_as_selector(&class_method));
    }

    #[test]
    fn selector_match_checks_arity_and_labels() {
        let base = insert_signature(SwiftType::int(), SwiftType::void());

        let mut fewer = base.clone();
        fewer.parameters.pop();
        let mut relabeled = base.clone();
        relabeled.parameters[1].label = Some("at".to_string());
        let mut unlabeled = base.clone();
        unlabeled.parameters[1].label = None;
        let mut renamed = base.clone();
        renamed.name = "append".to_string();

        for other in [fewer, relabeled, unlabeled, renamed] {
            assert!(!base.matches_as_selector(&other), "{} should not match", other);
        }
    }

    #[test]
    fn renders_selector_and_declaration() {
        let signature = insert_signature(SwiftType::int(), SwiftType::bool());

        assert_eq!(signature.selector(), "insert(_:atIndex:)");
        assert_eq!(
            signature.to_string(),
            "func insert(_ object: AnyObject, atIndex index: Int) -> Bool"
        );
        assert_eq!(
            signature.swift_closure_type(),
            SwiftType::block(SwiftType::bool(), vec![SwiftType::any_object(), SwiftType::int()])
        );
    }
}
