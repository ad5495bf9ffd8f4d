use super::*;
use o2s_ast::{
    BlockParameter, CompoundStatement, Expression, FunctionArgument, OptionalAccess, Statement,
    SwiftOperator, SwiftType,
};
use o2s_intentions::{
    FileGenerationIntention, FunctionBody, FunctionSignature, IntentionCollection,
    MethodGenerationIntention, ParameterSignature, PropertyGenerationIntention,
    TypeGenerationIntention,
};

fn resolve(context: ResolutionContext, expression: &mut Expression) -> SwiftType {
    ExpressionTypeResolver::new(builtin_types(), context).resolve_expression(expression)
}

fn receiver_of(expression: &Expression) -> &Expression {
    match expression.as_postfix() {
        Some((receiver, _)) => receiver,
        None => panic!("Expected postfix expression, got {:?}", expression.kind),
    }
}

fn widget_system() -> MapTypeSystem {
    let mut system = MapTypeSystem::new();
    system.add_type(
        KnownType::class("Widget")
            .with_supertype("NSObject")
            .with_member(KnownMember::property("title", SwiftType::string()))
            .with_member(KnownMember::Method(FunctionSignature::new(
                "configure",
                vec![ParameterSignature::unlabeled("count", SwiftType::int())],
                SwiftType::int(),
                false,
            )))
            .with_member(KnownMember::Method(FunctionSignature::new(
                "configure",
                vec![ParameterSignature::new(Some("with"), "title", SwiftType::string())],
                SwiftType::string(),
                false,
            ))),
    );
    system
}

#[test]
fn failed_member_only_poisons_later_steps() {
    let mut system = widget_system();
    system.extend(builtin_types().clone());
    let mut expression = Expression::identifier("self")
        .dot("title")
        .dot("missing")
        .dot("count");

    let resolved = ExpressionTypeResolver::new(&system, ResolutionContext::in_type("Widget"))
        .resolve_expression(&mut expression);

    assert!(resolved.is_unknown());
    let missing = receiver_of(&expression);
    assert_eq!(missing.resolved_type, Some(SwiftType::unknown()));
    let title = receiver_of(missing);
    assert_eq!(title.resolved_type, Some(SwiftType::string()));
    let self_expression = receiver_of(title);
    assert_eq!(self_expression.resolved_type, Some(SwiftType::named("Widget")));
}

#[test]
fn null_coalesce_takes_rhs_optionality() {
    let context = ResolutionContext::global()
        .with_parameter("name", SwiftType::optional(SwiftType::string()));
    let mut expression = Expression::binary(
        Expression::identifier("name"),
        SwiftOperator::NullCoalesce,
        Expression::string("fallback"),
    );

    assert_eq!(resolve(context, &mut expression), SwiftType::string());
    match &expression.kind {
        o2s_ast::ExpressionKind::Binary { rhs, .. } => {
            assert_eq!(rhs.expected_type, Some(SwiftType::string()));
        }
        other => panic!("Expected binary expression, got {:?}", other),
    }
}

#[test]
fn null_coalesce_with_mismatched_sides_is_unknown() {
    let context = ResolutionContext::global()
        .with_parameter("name", SwiftType::optional(SwiftType::string()));
    let mut expression = Expression::binary(
        Expression::identifier("name"),
        SwiftOperator::NullCoalesce,
        Expression::int(1),
    );

    assert!(resolve(context, &mut expression).is_unknown());
}

#[test]
fn nil_takes_type_of_compared_operand() {
    let optional_string = SwiftType::optional(SwiftType::string());
    let context = ResolutionContext::global().with_parameter("name", optional_string.clone());
    let mut expression = Expression::binary(
        Expression::identifier("name"),
        SwiftOperator::Equals,
        Expression::nil(),
    );

    assert_eq!(resolve(context, &mut expression), SwiftType::bool());
    match &expression.kind {
        o2s_ast::ExpressionKind::Binary { rhs, .. } => {
            assert_eq!(rhs.expected_type, Some(optional_string.clone()));
            assert_eq!(rhs.resolved_type, Some(optional_string));
        }
        other => panic!("Expected binary expression, got {:?}", other),
    }
}

#[test]
fn literals_resolve_to_swift_defaults() {
    let mut float = Expression::constant(o2s_ast::Constant::Float(1.5));
    let mut nil = Expression::nil();
    let mut text = Expression::string("a");

    assert_eq!(resolve(ResolutionContext::global(), &mut float), SwiftType::float());
    assert_eq!(
        resolve(ResolutionContext::global(), &mut nil),
        SwiftType::optional(SwiftType::any_object())
    );
    assert_eq!(resolve(ResolutionContext::global(), &mut text), SwiftType::string());
}

#[test]
fn arithmetic_widens_to_larger_numeric_type() {
    let context = ResolutionContext::global()
        .with_parameter("count", SwiftType::int())
        .with_parameter("scale", SwiftType::cg_float());
    let mut expression = Expression::binary(
        Expression::identifier("count"),
        SwiftOperator::Multiply,
        Expression::identifier("scale"),
    );

    assert_eq!(resolve(context, &mut expression), SwiftType::cg_float());
}

#[test]
fn method_overload_is_picked_by_argument_labels() {
    let mut system = widget_system();
    system.extend(builtin_types().clone());
    let context = ResolutionContext::global().with_parameter("widget", SwiftType::named("Widget"));

    let mut labeled = Expression::identifier("widget")
        .dot("configure")
        .call(vec![FunctionArgument::labeled("with", Expression::string("x"))]);
    let mut unlabeled = Expression::identifier("widget")
        .dot("configure")
        .call(vec![FunctionArgument::unlabeled(Expression::int(3))]);

    let mut resolver = ExpressionTypeResolver::new(&system, context);
    assert_eq!(resolver.resolve_expression(&mut labeled), SwiftType::string());
    assert_eq!(resolver.resolve_expression(&mut unlabeled), SwiftType::int());
    assert_eq!(
        receiver_of(&labeled).resolved_type,
        Some(SwiftType::block(SwiftType::string(), vec![SwiftType::string()]))
    );
}

#[test]
fn initializer_call_on_type_name_yields_instance() {
    let mut expression = Expression::identifier("UIView").call(vec![FunctionArgument::labeled(
        "frame",
        Expression::identifier("CGRectZero"),
    )]);

    assert_eq!(
        resolve(ResolutionContext::global(), &mut expression),
        SwiftType::named("UIView")
    );
    assert_eq!(
        receiver_of(&expression).resolved_type,
        Some(SwiftType::metatype(SwiftType::named("UIView")))
    );
}

#[test]
fn optional_chaining_makes_member_optional() {
    let context = ResolutionContext::global()
        .with_parameter("view", SwiftType::optional(SwiftType::named("UIView")));
    let mut chained = Expression::identifier("view")
        .dot("frame")
        .with_optional_access(OptionalAccess::SafeUnwrap);
    let mut forced = Expression::identifier("view")
        .dot("frame")
        .with_optional_access(OptionalAccess::ForceUnwrap);

    assert_eq!(
        resolve(context.clone(), &mut chained),
        SwiftType::optional(SwiftType::named("CGRect"))
    );
    assert_eq!(resolve(context, &mut forced), SwiftType::named("CGRect"));
}

#[test]
fn implicitly_unwrapped_receiver_is_looked_through() {
    let context = ResolutionContext::global()
        .with_parameter("text", SwiftType::implicitly_unwrapped(SwiftType::string()));
    let mut expression = Expression::identifier("text").dot("count");

    assert_eq!(resolve(context, &mut expression), SwiftType::int());
}

#[test]
fn generic_members_are_substituted() {
    let context = ResolutionContext::global()
        .with_parameter("names", SwiftType::array(SwiftType::string()))
        .with_parameter(
            "table",
            SwiftType::dictionary(SwiftType::string(), SwiftType::int()),
        );
    let mut first = Expression::identifier("names").dot("first");
    let mut element = Expression::identifier("names").sub(Expression::int(0));
    let mut value = Expression::identifier("table").sub(Expression::string("key"));

    assert_eq!(
        resolve(context.clone(), &mut first),
        SwiftType::optional(SwiftType::string())
    );
    assert_eq!(resolve(context.clone(), &mut element), SwiftType::string());
    assert_eq!(
        resolve(context, &mut value),
        SwiftType::optional(SwiftType::int())
    );
}

#[test]
fn block_parameters_are_scoped_to_the_block() {
    let body = CompoundStatement::new(vec![Statement::Return(Some(Expression::binary(
        Expression::identifier("value"),
        SwiftOperator::Add,
        Expression::int(1),
    )))]);
    let mut block = Expression::block(
        vec![BlockParameter {
            name: "value".to_string(),
            ty: SwiftType::int(),
        }],
        SwiftType::int(),
        body,
    );
    let mut outside = Expression::identifier("value");

    let mut resolver = ExpressionTypeResolver::new(builtin_types(), ResolutionContext::global());
    assert_eq!(
        resolver.resolve_expression(&mut block),
        SwiftType::block(SwiftType::int(), vec![SwiftType::int()])
    );
    assert!(resolver.resolve_expression(&mut outside).is_unknown());

    let Some((_, _, body)) = block.as_block() else {
        panic!("Expected block, got {:?}", block.kind);
    };
    match &body.statements[0] {
        Statement::Return(Some(value)) => {
            assert_eq!(value.expected_type, Some(SwiftType::int()));
            assert_eq!(value.resolved_type, Some(SwiftType::int()));
        }
        other => panic!("Expected return statement, got {:?}", other),
    }
}

#[test]
fn declarations_infer_types_for_later_statements() {
    let mut body = CompoundStatement::new(vec![
        Statement::variable("count", SwiftType::unknown(), Some(Expression::int(1)), true),
        Statement::expression(Expression::identifier("count")),
        Statement::ForIn {
            binding: "name".to_string(),
            sequence: Expression::identifier("names"),
            body: CompoundStatement::new(vec![Statement::expression(Expression::identifier(
                "name",
            ))]),
        },
    ]);
    let context = ResolutionContext::global()
        .with_parameter("names", SwiftType::array(SwiftType::string()));

    ExpressionTypeResolver::new(builtin_types(), context).resolve_compound(&mut body);

    match &body.statements[1] {
        Statement::Expressions(expressions) => {
            assert_eq!(expressions[0].resolved_type, Some(SwiftType::int()));
        }
        other => panic!("Expected expression statement, got {:?}", other),
    }
    match &body.statements[2] {
        Statement::ForIn { body, .. } => match &body.statements[0] {
            Statement::Expressions(expressions) => {
                assert_eq!(expressions[0].resolved_type, Some(SwiftType::string()));
            }
            other => panic!("Expected expression statement, got {:?}", other),
        },
        other => panic!("Expected for-in statement, got {:?}", other),
    }
}

#[test]
fn conditions_expect_bool() {
    let mut statement = Statement::if_statement(
        Expression::identifier("flag"),
        CompoundStatement::empty(),
        None,
    );
    let context = ResolutionContext::global().with_parameter("flag", SwiftType::bool());

    ExpressionTypeResolver::new(builtin_types(), context).resolve_statement(&mut statement);

    match &statement {
        Statement::If { condition, .. } => {
            assert_eq!(condition.expected_type, Some(SwiftType::bool()));
        }
        other => panic!("Expected if statement, got {:?}", other),
    }
}

#[test]
fn static_context_resolves_self_to_metatype() {
    let mut context = ResolutionContext::in_type("NSObject");
    context.is_static = true;
    let mut expression = Expression::identifier("self");

    assert_eq!(
        resolve(context, &mut expression),
        SwiftType::metatype(SwiftType::named("NSObject"))
    );
}

#[test]
fn hierarchy_lists_supertypes_before_protocols() {
    let names: Vec<&str> = type_hierarchy(builtin_types(), "NSMutableArray")
        .into_iter()
        .map(|known| known.name.as_str())
        .collect();

    assert_eq!(
        names,
        vec!["NSMutableArray", "NSArray", "NSObject", "NSObjectProtocol"]
    );
    assert!(builtin_types().is_subtype("UIView", "NSObject"));
    assert!(!builtin_types().is_subtype("NSObject", "UIView"));
}

#[test]
fn protocol_members_are_found_through_conformance() {
    let member = builtin_types()
        .lookup_member(&SwiftType::named("NSNumber"), "description", false)
        .expect("description should be inherited from NSObjectProtocol");
    assert_eq!(member.member_type(), SwiftType::string());
}

fn widget_collection() -> (IntentionCollection, o2s_intentions::IntentionId) {
    let mut collection = IntentionCollection::new();
    let file = collection.add_file(FileGenerationIntention::new("Widget.m", "Widget.swift"));
    let widget = collection
        .add_type(file, TypeGenerationIntention::class("Widget").with_superclass("NSObject"))
        .expect("type should be added to file");
    collection
        .add_property(widget, PropertyGenerationIntention::new("title", SwiftType::string()))
        .expect("property should be added to type");
    let body = CompoundStatement::new(vec![Statement::Return(Some(
        Expression::identifier("self").dot("title").dot("count"),
    ))]);
    let method = collection
        .add_method(
            widget,
            MethodGenerationIntention::new(FunctionSignature::new(
                "titleLength",
                vec![],
                SwiftType::int(),
                false,
            ))
            .with_body(FunctionBody::new(body)),
        )
        .expect("method should be added to type");

    let category = collection
        .add_type(file, TypeGenerationIntention::extension("NSObject", Some("Extras")))
        .expect("extension should be added to file");
    collection
        .add_method(
            category,
            MethodGenerationIntention::new(FunctionSignature::new(
                "extraValue",
                vec![],
                SwiftType::int(),
                false,
            )),
        )
        .expect("method should be added to extension");

    (collection, method)
}

#[test]
fn intention_type_system_layers_declarations_over_builtins() {
    let (collection, _) = widget_collection();
    let system = IntentionCollectionTypeSystem::new(&collection);
    let widget = SwiftType::named("Widget");

    assert!(system.lookup_member(&widget, "title", false).is_some());
    assert!(system.lookup_member(&widget, "hash", false).is_some());
    assert!(system.lookup_member(&widget, "extraValue", false).is_some());
    let object = system
        .lookup_type("NSObject")
        .expect("NSObject should stay declared");
    assert_eq!(
        object.members_named("init", true).count(),
        1,
        "builtin members should not be duplicated"
    );
}

#[test]
fn invoker_resolves_method_bodies_in_type_context() {
    let (mut collection, method) = widget_collection();
    let system = IntentionCollectionTypeSystem::new(&collection);

    DefaultTypeResolverInvoker.resolve_all(&system, &mut collection);

    let body = collection
        .method(method)
        .expect("method should exist")
        .body
        .as_ref()
        .expect("method should keep its body");
    match &body.body.statements[0] {
        Statement::Return(Some(value)) => {
            assert_eq!(value.resolved_type, Some(SwiftType::int()));
            assert_eq!(value.expected_type, Some(SwiftType::int()));
        }
        other => panic!("Expected return statement, got {:?}", other),
    }
}

#[test]
fn invoker_resolves_detached_expression_for_owner() {
    let (collection, method) = widget_collection();
    let system = IntentionCollectionTypeSystem::new(&collection);
    let mut expression = Expression::identifier("title");

    let resolved = DefaultTypeResolverInvoker
        .resolve_expression(&system, &collection, method, &mut expression)
        .expect("owner should exist");

    assert_eq!(resolved, SwiftType::string());
}
