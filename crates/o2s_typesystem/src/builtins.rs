// o2s_typesystem/builtins - Swift and Foundation types known up front
use crate::type_system::{KnownGlobal, KnownMember, KnownType, KnownTypeKind, MapTypeSystem};
use o2s_ast::SwiftType;
use o2s_intentions::{FunctionSignature, ParameterSignature};
use once_cell::sync::Lazy;

static BUILTINS: Lazy<MapTypeSystem> = Lazy::new(build_builtins);

/// Shared catalogue of standard library and Foundation types.
pub fn builtin_types() -> &'static MapTypeSystem {
    &BUILTINS
}

fn method(name: &str, parameters: Vec<ParameterSignature>, return_type: SwiftType) -> KnownMember {
    KnownMember::Method(FunctionSignature::new(name, parameters, return_type, false))
}

fn static_method(
    name: &str,
    parameters: Vec<ParameterSignature>,
    return_type: SwiftType,
) -> KnownMember {
    KnownMember::Method(FunctionSignature::new(name, parameters, return_type, true))
}

fn init(parameters: Vec<ParameterSignature>, ty: &str) -> KnownMember {
    static_method("init", parameters, SwiftType::named(ty))
}

fn value_struct(name: &str) -> KnownType {
    KnownType::new(name, KnownTypeKind::Struct).with_member(init(vec![], name))
}

fn build_builtins() -> MapTypeSystem {
    let mut system = MapTypeSystem::new();
    let element = || SwiftType::named("Element");

    for numeric in [
        "Int", "UInt", "Int8", "Int16", "Int32", "Int64", "UInt8", "UInt16", "UInt32", "UInt64",
        "Float", "Double", "CGFloat", "TimeInterval",
    ] {
        system.add_type(
            value_struct(numeric)
                .with_conformance("Numeric")
                .with_member(KnownMember::property("description", SwiftType::string())),
        );
    }
    system.add_type(value_struct("Bool"));
    system.add_type(KnownType::new("Numeric", KnownTypeKind::Protocol));

    system.add_type(
        value_struct("String")
            .with_member(KnownMember::property("count", SwiftType::int()))
            .with_member(KnownMember::property("isEmpty", SwiftType::bool()))
            .with_member(method(
                "appending",
                vec![ParameterSignature::unlabeled("other", SwiftType::string())],
                SwiftType::string(),
            ))
            .with_member(method(
                "hasPrefix",
                vec![ParameterSignature::unlabeled("prefix", SwiftType::string())],
                SwiftType::bool(),
            ))
            .with_member(method(
                "hasSuffix",
                vec![ParameterSignature::unlabeled("suffix", SwiftType::string())],
                SwiftType::bool(),
            ))
            .with_member(method("lowercased", vec![], SwiftType::string()))
            .with_member(method("uppercased", vec![], SwiftType::string())),
    );

    system.add_type(
        KnownType::new("Array", KnownTypeKind::Struct)
            .with_generic_parameters(&["Element"])
            .with_member(KnownMember::property("count", SwiftType::int()))
            .with_member(KnownMember::property("isEmpty", SwiftType::bool()))
            .with_member(KnownMember::property("first", SwiftType::optional(element())))
            .with_member(KnownMember::property("last", SwiftType::optional(element())))
            .with_member(method(
                "append",
                vec![ParameterSignature::unlabeled("newElement", element())],
                SwiftType::void(),
            ))
            .with_member(method(
                "contains",
                vec![ParameterSignature::unlabeled("element", element())],
                SwiftType::bool(),
            ))
            .with_member(method(
                "remove",
                vec![ParameterSignature::new(Some("at"), "index", SwiftType::int())],
                element(),
            ))
            .with_subscript(SwiftType::int(), element()),
    );

    system.add_type(
        KnownType::new("Dictionary", KnownTypeKind::Struct)
            .with_generic_parameters(&["Key", "Value"])
            .with_member(KnownMember::property("count", SwiftType::int()))
            .with_member(KnownMember::property("isEmpty", SwiftType::bool()))
            .with_member(KnownMember::property(
                "keys",
                SwiftType::array(SwiftType::named("Key")),
            ))
            .with_member(KnownMember::property(
                "values",
                SwiftType::array(SwiftType::named("Value")),
            )),
    );

    system.add_type(
        KnownType::new("Set", KnownTypeKind::Struct)
            .with_generic_parameters(&["Element"])
            .with_member(KnownMember::property("count", SwiftType::int()))
            .with_member(method(
                "contains",
                vec![ParameterSignature::unlabeled("member", element())],
                SwiftType::bool(),
            )),
    );

    system.add_type(
        KnownType::new("NSObjectProtocol", KnownTypeKind::Protocol)
            .with_member(method(
                "isEqual",
                vec![ParameterSignature::unlabeled(
                    "object",
                    SwiftType::optional(SwiftType::any()),
                )],
                SwiftType::bool(),
            ))
            .with_member(method(
                "responds",
                vec![ParameterSignature::new(Some("to"), "selector", SwiftType::selector())],
                SwiftType::bool(),
            ))
            .with_member(KnownMember::property("description", SwiftType::string())),
    );
    system.add_type(
        KnownType::class("NSObject")
            .with_conformance("NSObjectProtocol")
            .with_member(init(vec![], "NSObject"))
            .with_member(KnownMember::property("hash", SwiftType::int()))
            .with_member(method("copy", vec![], SwiftType::any()))
            .with_member(method("mutableCopy", vec![], SwiftType::any())),
    );
    system.add_type(
        KnownType::class("NSNumber")
            .with_supertype("NSObject")
            .with_member(KnownMember::property("intValue", SwiftType::named("Int32")))
            .with_member(KnownMember::property("integerValue", SwiftType::int()))
            .with_member(KnownMember::property("doubleValue", SwiftType::double()))
            .with_member(KnownMember::property("boolValue", SwiftType::bool())),
    );
    system.add_type(
        KnownType::class("NSError")
            .with_supertype("NSObject")
            .with_member(KnownMember::property("code", SwiftType::int()))
            .with_member(KnownMember::property("domain", SwiftType::string()))
            .with_member(KnownMember::property("localizedDescription", SwiftType::string())),
    );
    system.add_type(
        KnownType::class("NSArray")
            .with_supertype("NSObject")
            .with_member(KnownMember::property("count", SwiftType::int()))
            .with_member(method(
                "object",
                vec![ParameterSignature::new(Some("at"), "index", SwiftType::int())],
                SwiftType::any(),
            ))
            .with_subscript(SwiftType::int(), SwiftType::any()),
    );
    system.add_type(
        KnownType::class("NSMutableArray")
            .with_supertype("NSArray")
            .with_member(method(
                "add",
                vec![ParameterSignature::unlabeled("anObject", SwiftType::any())],
                SwiftType::void(),
            )),
    );
    system.add_type(
        KnownType::class("NSDictionary")
            .with_supertype("NSObject")
            .with_member(KnownMember::property("count", SwiftType::int()))
            .with_subscript(SwiftType::any(), SwiftType::optional(SwiftType::any())),
    );
    system.add_type(
        KnownType::class("NSMutableDictionary")
            .with_supertype("NSDictionary")
            .with_member(method(
                "removeAllObjects",
                vec![],
                SwiftType::void(),
            )),
    );
    for value in ["Date", "Data", "URL"] {
        system.add_type(value_struct(value));
    }
    system.add_type(
        KnownType::class("UIView")
            .with_supertype("UIResponder")
            .with_member(KnownMember::property("frame", SwiftType::named("CGRect")))
            .with_member(KnownMember::property("bounds", SwiftType::named("CGRect")))
            .with_member(KnownMember::property(
                "superview",
                SwiftType::optional(SwiftType::named("UIView")),
            ))
            .with_member(KnownMember::property(
                "subviews",
                SwiftType::array(SwiftType::named("UIView")),
            ))
            .with_member(method(
                "addSubview",
                vec![ParameterSignature::unlabeled("view", SwiftType::named("UIView"))],
                SwiftType::void(),
            ))
            .with_member(init(
                vec![ParameterSignature::new(Some("frame"), "frame", SwiftType::named("CGRect"))],
                "UIView",
            )),
    );
    system.add_type(KnownType::class("UIResponder").with_supertype("NSObject"));
    system.add_type(
        value_struct("CGRect")
            .with_member(KnownMember::property("origin", SwiftType::named("CGPoint")))
            .with_member(KnownMember::property("size", SwiftType::named("CGSize"))),
    );
    system.add_type(
        value_struct("CGPoint")
            .with_member(KnownMember::property("x", SwiftType::cg_float()))
            .with_member(KnownMember::property("y", SwiftType::cg_float())),
    );
    system.add_type(
        value_struct("CGSize")
            .with_member(KnownMember::property("width", SwiftType::cg_float()))
            .with_member(KnownMember::property("height", SwiftType::cg_float())),
    );

    system.add_global(KnownGlobal::Function(FunctionSignature::new(
        "NSLog",
        vec![ParameterSignature::unlabeled("format", SwiftType::string())],
        SwiftType::void(),
        false,
    )));
    for (name, ty) in [
        ("CGRectZero", SwiftType::named("CGRect")),
        ("NSNotFound", SwiftType::int()),
    ] {
        system.add_global(KnownGlobal::Variable {
            name: name.to_string(),
            ty,
        });
    }
    for (name, ty) in [("MAX", SwiftType::any()), ("MIN", SwiftType::any())] {
        system.add_global(KnownGlobal::Function(FunctionSignature::new(
            name,
            vec![
                ParameterSignature::unlabeled("a", ty.clone()),
                ParameterSignature::unlabeled("b", ty.clone()),
            ],
            ty,
            false,
        )));
    }
    system
}
