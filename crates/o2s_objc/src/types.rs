// o2s_objc/types - Objective-C type expressions as delivered by the parser
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjcType {
    Void,
    /// Any plain type name: structs, typedefs, primitives, `instancetype`.
    Struct(String),
    /// `id` or `id<P, Q>`.
    Id { protocols: Vec<String> },
    /// `NSArray<NSString *>` or `UIView<UIDelegate>`.
    Generic {
        name: String,
        parameters: Vec<ObjcType>,
    },
    Pointer(Box<ObjcType>),
    /// Leading specifiers such as `const`, `static` or `__weak`.
    Specified {
        specifiers: Vec<String>,
        ty: Box<ObjcType>,
    },
    /// Trailing qualifiers such as `const` or `_Nullable`.
    Qualified {
        ty: Box<ObjcType>,
        qualifiers: Vec<String>,
    },
    BlockType {
        name: Option<String>,
        return_type: Box<ObjcType>,
        parameters: Vec<ObjcType>,
    },
    FunctionPointer {
        name: Option<String>,
        return_type: Box<ObjcType>,
        parameters: Vec<ObjcType>,
    },
    FixedArray {
        ty: Box<ObjcType>,
        length: usize,
    },
}

impl ObjcType {
    pub fn struct_named(name: impl Into<String>) -> Self {
        ObjcType::Struct(name.into())
    }

    pub fn id() -> Self {
        ObjcType::Id {
            protocols: Vec::new(),
        }
    }

    pub fn id_with(protocols: &[&str]) -> Self {
        ObjcType::Id {
            protocols: protocols.iter().map(|name| name.to_string()).collect(),
        }
    }

    pub fn pointer(inner: ObjcType) -> Self {
        ObjcType::Pointer(Box::new(inner))
    }

    /// `Name *`
    pub fn pointer_to(name: impl Into<String>) -> Self {
        ObjcType::pointer(ObjcType::Struct(name.into()))
    }

    pub fn generic(name: impl Into<String>, parameters: Vec<ObjcType>) -> Self {
        ObjcType::Generic {
            name: name.into(),
            parameters,
        }
    }

    pub fn specified(specifiers: &[&str], ty: ObjcType) -> Self {
        ObjcType::Specified {
            specifiers: specifiers.iter().map(|name| name.to_string()).collect(),
            ty: Box::new(ty),
        }
    }

    pub fn qualified(ty: ObjcType, qualifiers: &[&str]) -> Self {
        ObjcType::Qualified {
            ty: Box::new(ty),
            qualifiers: qualifiers.iter().map(|name| name.to_string()).collect(),
        }
    }

    pub fn block(name: Option<&str>, return_type: ObjcType, parameters: Vec<ObjcType>) -> Self {
        ObjcType::BlockType {
            name: name.map(str::to_string),
            return_type: Box::new(return_type),
            parameters,
        }
    }

    /// Type with specifier and qualifier wrappers removed.
    pub fn base(&self) -> &ObjcType {
        match self {
            ObjcType::Specified { ty, .. } | ObjcType::Qualified { ty, .. } => ty.base(),
            other => other,
        }
    }

    /// Specifiers and qualifiers collected from every wrapper layer.
    pub fn modifiers(&self) -> Vec<&str> {
        let mut modifiers = Vec::new();
        let mut current = self;
        loop {
            match current {
                ObjcType::Specified { specifiers, ty } => {
                    modifiers.extend(specifiers.iter().map(String::as_str));
                    current = ty;
                }
                ObjcType::Qualified { ty, qualifiers } => {
                    modifiers.extend(qualifiers.iter().map(String::as_str));
                    current = ty;
                }
                _ => return modifiers,
            }
        }
    }

    /// Types that become references (and thus may be optional) in Swift.
    pub fn is_pointer_like(&self) -> bool {
        match self.base() {
            ObjcType::Pointer(_)
            | ObjcType::Id { .. }
            | ObjcType::BlockType { .. }
            | ObjcType::FunctionPointer { .. } => true,
            ObjcType::Struct(name) => name == "instancetype" || name == "id",
            _ => false,
        }
    }
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for ObjcType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjcType::Void => f.write_str("void"),
            ObjcType::Struct(name) => f.write_str(name),
            ObjcType::Id { protocols } if protocols.is_empty() => f.write_str("id"),
            ObjcType::Id { protocols } => {
                f.write_str("id<")?;
                write_list(f, protocols)?;
                f.write_str(">")
            }
            ObjcType::Generic { name, parameters } => {
                write!(f, "{}<", name)?;
                write_list(f, parameters)?;
                f.write_str(">")
            }
            ObjcType::Pointer(inner) => write!(f, "{}*", inner),
            ObjcType::Specified { specifiers, ty } => write!(f, "{} {}", specifiers.join(" "), ty),
            ObjcType::Qualified { ty, qualifiers } => write!(f, "{} {}", ty, qualifiers.join(" ")),
            ObjcType::BlockType {
                name,
                return_type,
                parameters,
            } => {
                write!(f, "{} (^{})(", return_type, name.as_deref().unwrap_or(""))?;
                write_list(f, parameters)?;
                f.write_str(")")
            }
            ObjcType::FunctionPointer {
                name,
                return_type,
                parameters,
            } => {
                write!(f, "{} (*{})(", return_type, name.as_deref().unwrap_or(""))?;
                write_list(f, parameters)?;
                f.write_str(")")
            }
            ObjcType::FixedArray { ty, length } => write!(f, "{}[{}]", ty, length),
        }
    }
}
