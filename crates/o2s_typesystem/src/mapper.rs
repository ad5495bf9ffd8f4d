// o2s_typesystem/mapper - Objective-C to Swift type conversion
//! Pure conversion from [`ObjcType`] to [`SwiftType`]. The mapper never
//! fails: names it does not recognise pass through as named types.

use o2s_ast::SwiftType;
use o2s_intentions::Ownership;
use o2s_objc::ObjcType;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Nullability annotation written on a declaration or type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Nullability {
    Nonnull,
    Nullable,
    NullResettable,
    /// Explicit `null_unspecified`.
    Unspecified,
}

impl Nullability {
    /// Parses a property attribute or type qualifier spelling.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "nonnull" | "_Nonnull" | "__nonnull" => Some(Nullability::Nonnull),
            "nullable" | "_Nullable" | "__nullable" => Some(Nullability::Nullable),
            "null_resettable" => Some(Nullability::NullResettable),
            "null_unspecified" | "_Null_unspecified" | "__null_unspecified" => {
                Some(Nullability::Unspecified)
            }
            _ => None,
        }
    }
}

/// Declaration-level facts that influence optionality.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeMappingContext {
    pub explicit_nullability: Option<Nullability>,
    pub in_nonnull_region: bool,
    /// Declared `weak` through a property attribute.
    pub is_weak: bool,
}

impl TypeMappingContext {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_nullability(nullability: Nullability) -> Self {
        Self {
            explicit_nullability: Some(nullability),
            ..Self::default()
        }
    }

    pub fn in_nonnull_region(mut self, in_nonnull_region: bool) -> Self {
        self.in_nonnull_region = in_nonnull_region;
        self
    }

    pub fn weak(mut self, is_weak: bool) -> Self {
        self.is_weak = is_weak;
        self
    }

    /// Reads nullability and `weak` from raw property attributes.
    pub fn from_attributes<'a>(
        attributes: impl IntoIterator<Item = &'a str>,
        in_nonnull_region: bool,
    ) -> Self {
        let mut context = Self::empty().in_nonnull_region(in_nonnull_region);
        for attribute in attributes {
            if let Some(nullability) = Nullability::from_keyword(attribute) {
                context.explicit_nullability = Some(nullability);
            } else if attribute == "weak" {
                context.is_weak = true;
            }
        }
        context
    }

    /// Context for block parameters and return types.
    fn nested(&self, nonnull: bool) -> Self {
        Self {
            explicit_nullability: None,
            in_nonnull_region: nonnull,
            is_weak: false,
        }
    }
}

static PRIMITIVES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("NSInteger", "Int"),
        ("NSUInteger", "UInt"),
        ("BOOL", "Bool"),
        ("bool", "Bool"),
        ("_Bool", "Bool"),
        ("CGFloat", "CGFloat"),
        ("NSTimeInterval", "TimeInterval"),
        ("SEL", "Selector"),
        ("char", "CChar"),
        ("signed char", "CChar"),
        ("unsigned char", "UInt8"),
        ("short", "Int16"),
        ("unsigned short", "UInt16"),
        ("int", "Int32"),
        ("signed", "Int32"),
        ("unsigned", "UInt32"),
        ("unsigned int", "UInt32"),
        ("long", "Int"),
        ("unsigned long", "UInt"),
        ("long long", "Int64"),
        ("unsigned long long", "UInt64"),
        ("float", "Float"),
        ("double", "Double"),
        ("int8_t", "Int8"),
        ("int16_t", "Int16"),
        ("int32_t", "Int32"),
        ("int64_t", "Int64"),
        ("uint8_t", "UInt8"),
        ("uint16_t", "UInt16"),
        ("uint32_t", "UInt32"),
        ("uint64_t", "UInt64"),
        ("size_t", "Int"),
    ])
});

/// Foundation classes imported as Swift value types.
static BRIDGED_CLASSES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("NSString", "String"),
        ("NSMutableString", "String"),
        ("NSDate", "Date"),
        ("NSData", "Data"),
        ("NSURL", "URL"),
    ])
});

const OBJECT_TYPE_NAMES: [&str; 2] = ["id", "instancetype"];

pub fn is_primitive_name(name: &str) -> bool {
    PRIMITIVES.contains_key(name)
}

/// Ownership implied by property attributes and type specifiers.
pub fn ownership_of<'a>(ty: &'a ObjcType, attributes: impl IntoIterator<Item = &'a str>) -> Ownership {
    let modifiers = ty.modifiers();
    let keywords = attributes.into_iter().chain(modifiers);
    let mut ownership = Ownership::Strong;
    for keyword in keywords {
        match keyword {
            "weak" | "__weak" => return Ownership::Weak,
            "unsafe_unretained" | "__unsafe_unretained" => ownership = Ownership::UnownedUnsafe,
            "assign" if ty.is_pointer_like() => ownership = Ownership::UnownedUnsafe,
            _ => {}
        }
    }
    ownership
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TypeMapper;

impl TypeMapper {
    pub fn new() -> Self {
        TypeMapper
    }

    /// Maps `ty` and renders the result, e.g. `String!`.
    pub fn type_name(&self, ty: &ObjcType, context: &TypeMappingContext) -> String {
        self.swift_type(ty, context).to_string()
    }

    pub fn swift_type(&self, ty: &ObjcType, context: &TypeMappingContext) -> SwiftType {
        let modifiers = ty.modifiers();
        let nullability = modifiers
            .iter()
            .rev()
            .find_map(|modifier| Nullability::from_keyword(modifier))
            .or(context.explicit_nullability);
        let is_weak = context.is_weak || modifiers.iter().any(|modifier| *modifier == "__weak");
        let base = ty.base();

        let nested_nonnull =
            context.in_nonnull_region || nullability == Some(Nullability::Nonnull);
        let mapped = self.map_base(base, &context.nested(nested_nonnull));

        if !base.is_pointer_like() {
            return mapped;
        }
        if is_weak {
            return SwiftType::optional(mapped);
        }
        match nullability {
            Some(Nullability::Nullable) => SwiftType::optional(mapped),
            Some(Nullability::Nonnull) => mapped,
            Some(Nullability::NullResettable) | Some(Nullability::Unspecified) => {
                SwiftType::implicitly_unwrapped(mapped)
            }
            None if context.in_nonnull_region => mapped,
            // Blocks and function pointers import as non-optional closures.
            None if is_callable(base) => mapped,
            None => SwiftType::implicitly_unwrapped(mapped),
        }
    }

    fn map_base(&self, ty: &ObjcType, nested: &TypeMappingContext) -> SwiftType {
        match ty {
            ObjcType::Void => SwiftType::void(),
            ObjcType::Struct(name) => self.map_name(name),
            ObjcType::Id { protocols } => object_with_protocols(protocols),
            ObjcType::Generic { name, parameters } => self.map_generic(name, parameters),
            ObjcType::Pointer(inner) => self.map_pointer(inner),
            ObjcType::BlockType {
                return_type,
                parameters,
                ..
            }
            | ObjcType::FunctionPointer {
                return_type,
                parameters,
                ..
            } => SwiftType::block(
                self.swift_type(return_type, nested),
                parameters
                    .iter()
                    .filter(|parameter| !matches!(parameter.base(), ObjcType::Void))
                    .map(|parameter| self.swift_type(parameter, nested))
                    .collect(),
            ),
            ObjcType::FixedArray { ty, length } => {
                let element = self.swift_type(ty, nested);
                match length {
                    0 => SwiftType::void(),
                    1 => element,
                    _ => SwiftType::tuple(vec![element; *length]),
                }
            }
            ObjcType::Specified { .. } | ObjcType::Qualified { .. } => {
                self.swift_type(ty, nested)
            }
        }
    }

    fn map_name(&self, name: &str) -> SwiftType {
        if let Some(swift) = PRIMITIVES.get(name) {
            return SwiftType::named(*swift);
        }
        if OBJECT_TYPE_NAMES.contains(&name) {
            return SwiftType::any_object();
        }
        SwiftType::named(name)
    }

    fn map_pointer(&self, pointee: &ObjcType) -> SwiftType {
        match pointee.base() {
            ObjcType::Struct(name) if is_primitive_name(name) => SwiftType::generic(
                "UnsafeMutablePointer",
                vec![self.map_name(name)],
            ),
            ObjcType::Struct(name) => match BRIDGED_CLASSES.get(name.as_str()) {
                Some(bridged) => SwiftType::named(*bridged),
                None => self.map_name(name),
            },
            ObjcType::Void => SwiftType::named("UnsafeMutableRawPointer"),
            ObjcType::Pointer(_) | ObjcType::Id { .. } => SwiftType::generic(
                "UnsafeMutablePointer",
                vec![self.swift_type(pointee, &TypeMappingContext::with_nullability(Nullability::Nullable))],
            ),
            other => self.map_base(other, &TypeMappingContext::empty()),
        }
    }

    fn map_generic(&self, name: &str, parameters: &[ObjcType]) -> SwiftType {
        let element = |ty: &ObjcType| {
            self.swift_type(ty, &TypeMappingContext::with_nullability(Nullability::Nonnull))
        };
        match (name, parameters) {
            (_, []) => self.map_name(name),
            ("NSArray", [value]) => SwiftType::array(element(value)),
            ("NSDictionary", [key, value]) => SwiftType::dictionary(element(key), element(value)),
            ("NSSet", [value]) => SwiftType::generic("Set", vec![element(value)]),
            // Mutable collections keep reference semantics and drop parameters.
            (mutable, _) if mutable.starts_with("NSMutable") => SwiftType::named(mutable),
            _ => {
                let mut members = vec![self.map_name(name)];
                members.extend(parameters.iter().filter_map(protocol_name).map(SwiftType::named));
                if members.len() == 1 {
                    members.remove(0)
                } else {
                    SwiftType::protocol_composition(members)
                }
            }
        }
    }
}

fn is_callable(ty: &ObjcType) -> bool {
    matches!(ty, ObjcType::BlockType { .. } | ObjcType::FunctionPointer { .. })
}

fn protocol_name(ty: &ObjcType) -> Option<&str> {
    match ty.base() {
        ObjcType::Struct(name) => Some(name),
        _ => None,
    }
}

fn object_with_protocols(protocols: &[String]) -> SwiftType {
    match protocols {
        [] => SwiftType::any_object(),
        [single] => SwiftType::generic("AnyObject", vec![SwiftType::named(single.clone())]),
        many => SwiftType::generic(
            "AnyObject",
            vec![SwiftType::protocol_composition(
                many.iter().cloned().map(SwiftType::named).collect(),
            )],
        ),
    }
}
