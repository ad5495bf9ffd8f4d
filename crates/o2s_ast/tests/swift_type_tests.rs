use o2s_ast::SwiftType;
use test_case::test_case;

fn named(name: &str) -> SwiftType {
    SwiftType::named(name)
}

fn round_trip(ty: &SwiftType) -> SwiftType {
    let json = serde_json::to_string(ty).expect("type should serialize");
    serde_json::from_str(&json).expect("type should deserialize")
}

#[test]
fn nested_generics_round_trip() {
    let ty = SwiftType::generic(
        "Result",
        vec![
            SwiftType::array(SwiftType::dictionary(
                SwiftType::string(),
                SwiftType::optional(SwiftType::generic("Set", vec![SwiftType::int()])),
            )),
            SwiftType::nested(vec![named("Foundation"), named("NSError")]),
        ],
    );
    assert_eq!(round_trip(&ty), ty);
}

#[test]
fn protocol_composition_round_trip() {
    let ty = SwiftType::optional(SwiftType::protocol_composition(vec![
        named("UIView"),
        named("UITableViewDelegate"),
        SwiftType::metatype(named("NSObject")),
    ]));
    assert_eq!(round_trip(&ty), ty);
}

#[test_case(0 ; "empty tuple")]
#[test_case(2 ; "pair")]
#[test_case(5 ; "five members")]
fn tuple_round_trip(arity: usize) {
    let members = (0..arity)
        .map(|index| named(&format!("T{}", index)))
        .collect();
    let ty = SwiftType::tuple(members);
    assert_eq!(round_trip(&ty), ty);
}

#[test]
fn block_types_with_optional_returns_round_trip() {
    let optional_return = SwiftType::block(
        SwiftType::optional(SwiftType::string()),
        vec![SwiftType::int(), SwiftType::implicitly_unwrapped(named("NSObject"))],
    );
    let iuo_return = SwiftType::optional(SwiftType::block(
        SwiftType::implicitly_unwrapped(SwiftType::any_object()),
        vec![],
    ));
    assert_eq!(round_trip(&optional_return), optional_return);
    assert_eq!(round_trip(&iuo_return), iuo_return);
}

#[test_case(SwiftType::int(), "Int" ; "plain name")]
#[test_case(SwiftType::generic("Set", vec![SwiftType::int()]), "Set<Int>" ; "generic")]
#[test_case(SwiftType::array(SwiftType::string()), "[String]" ; "array sugar")]
#[test_case(SwiftType::dictionary(SwiftType::string(), SwiftType::int()), "[String: Int]" ; "dictionary sugar")]
#[test_case(SwiftType::protocol_composition(vec![named("A"), named("B"), named("C")]), "A & B & C" ; "composition")]
#[test_case(SwiftType::void(), "Void" ; "empty tuple is void")]
#[test_case(SwiftType::tuple(vec![named("A"), named("B")]), "(A, B)" ; "tuple")]
#[test_case(SwiftType::block(SwiftType::void(), vec![named("A"), named("B")]), "(A, B) -> Void" ; "block")]
#[test_case(SwiftType::optional(SwiftType::optional(named("A"))), "A??" ; "double optional")]
#[test_case(SwiftType::optional(SwiftType::implicitly_unwrapped(named("A"))), "A!?" ; "optional of iuo")]
#[test_case(SwiftType::optional(SwiftType::protocol_composition(vec![named("A"), named("B")])), "(A & B)?" ; "optional composition")]
#[test_case(SwiftType::implicitly_unwrapped(SwiftType::block(SwiftType::void(), vec![])), "(() -> Void)!" ; "iuo block")]
#[test_case(SwiftType::metatype(named("A")), "A.Type" ; "metatype")]
#[test_case(SwiftType::nested(vec![named("A"), SwiftType::generic("B", vec![named("C")])]), "A.B<C>" ; "nested")]
fn type_descriptions(ty: SwiftType, expected: &str) {
    assert_eq!(ty.to_string(), expected);
}
