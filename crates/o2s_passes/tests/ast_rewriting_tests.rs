use o2s_ast::{
    CompoundStatement, Expression, FunctionArgument, Statement, SwiftOperator, SwiftType,
};
use o2s_intentions::{
    FileGenerationIntention, FunctionBody, FunctionSignature, IntentionCollection, IntentionId,
    MethodGenerationIntention, ParameterSignature, PropertyGenerationIntention,
    TypeGenerationIntention,
};
use o2s_passes::{AstRewritingPass, IntentionPass, IntentionPassContext};
use test_case::test_case;

fn method_with_body(
    parameters: Vec<ParameterSignature>,
    statements: Vec<Statement>,
) -> (IntentionCollection, IntentionId) {
    let mut collection = IntentionCollection::new();
    let file = collection.add_file(FileGenerationIntention::new("A.m", "A.swift"));
    let ty = collection
        .add_type(file, TypeGenerationIntention::class("A"))
        .expect("type should be added");
    let method = collection
        .add_method(
            ty,
            MethodGenerationIntention::new(FunctionSignature::new(
                "run",
                parameters,
                SwiftType::void(),
                false,
            ))
            .with_body(FunctionBody::new(CompoundStatement::new(statements))),
        )
        .expect("method should be added");
    (collection, method)
}

fn rewrite(collection: &mut IntentionCollection) {
    let mut context = IntentionPassContext::new(collection);
    AstRewritingPass
        .apply(collection, &mut context)
        .expect("rewriting should succeed");
}

fn body_text(collection: &IntentionCollection, method: IntentionId) -> Vec<String> {
    collection
        .method(method)
        .expect("method should exist")
        .body
        .as_ref()
        .expect("method should have a body")
        .body
        .statements
        .iter()
        .map(|statement| match statement {
            Statement::Expressions(expressions) => expressions
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; "),
            other => format!("{:?}", other),
        })
        .collect()
}

fn alloc() -> Expression {
    Expression::identifier("UIView").dot("alloc").call(vec![])
}

#[test]
fn folds_alloc_init() {
    let expression = alloc().dot("init").call(vec![]);
    let (mut collection, method) =
        method_with_body(vec![], vec![Statement::expression(expression)]);

    rewrite(&mut collection);

    assert_eq!(body_text(&collection, method), vec!["UIView()"]);
}

#[test]
fn folds_alloc_init_with_arguments_and_resolves_type() {
    let expression = alloc().dot("initWithFrame").call(vec![FunctionArgument::unlabeled(
        Expression::identifier("CGRectZero"),
    )]);
    let (mut collection, method) =
        method_with_body(vec![], vec![Statement::expression(expression)]);

    rewrite(&mut collection);

    assert_eq!(body_text(&collection, method), vec!["UIView(frame: CGRectZero)"]);
    let body = &collection
        .method(method)
        .expect("method should exist")
        .body
        .as_ref()
        .expect("method should have a body")
        .body;
    match &body.statements[0] {
        Statement::Expressions(expressions) => {
            assert_eq!(expressions[0].resolved_type, Some(SwiftType::named("UIView")));
        }
        other => panic!("Expected expression statement, got {:?}", other),
    }
}

#[test]
fn keeps_labels_after_the_first_argument() {
    let expression = Expression::identifier("Point")
        .dot("alloc")
        .call(vec![])
        .dot("initWithX")
        .call(vec![
            FunctionArgument::unlabeled(Expression::int(1)),
            FunctionArgument::labeled("y", Expression::int(2)),
        ]);
    let (mut collection, method) =
        method_with_body(vec![], vec![Statement::expression(expression)]);

    rewrite(&mut collection);

    assert_eq!(body_text(&collection, method), vec!["Point(x: 1, y: 2)"]);
}

#[test_case(Expression::identifier("self").dot("alloc").call(vec![]).dot("init").call(vec![]); "self receiver")]
#[test_case(Expression::identifier("A").dot("alloc").call(vec![]).dot("setup").call(vec![]); "not an initializer")]
#[test_case(Expression::identifier("A").dot("alloc").call(vec![]).dot("initialize").call(vec![]); "init prefix only")]
#[test_case(Expression::identifier("A").dot("new").call(vec![]); "single call")]
fn leaves_other_chains_alone(expression: Expression) {
    let expected = expression.to_string();
    let (mut collection, method) =
        method_with_body(vec![], vec![Statement::expression(expression)]);

    rewrite(&mut collection);

    assert_eq!(body_text(&collection, method), vec![expected]);
}

fn block_parameter() -> ParameterSignature {
    ParameterSignature::unlabeled(
        "completion",
        SwiftType::optional(SwiftType::block(SwiftType::void(), vec![SwiftType::int()])),
    )
}

fn guarded_call(condition: Expression) -> Statement {
    Statement::if_statement(
        condition,
        CompoundStatement::new(vec![Statement::expression(
            Expression::identifier("completion")
                .call(vec![FunctionArgument::unlabeled(Expression::int(1))]),
        )]),
        None,
    )
}

#[test_case(Expression::binary(Expression::identifier("completion"), SwiftOperator::Unequals, Expression::nil()); "not equal nil")]
#[test_case(Expression::binary(Expression::nil(), SwiftOperator::Unequals, Expression::identifier("completion")); "nil not equal")]
#[test_case(Expression::identifier("completion"); "truthy")]
#[test_case(Expression::parens(Expression::identifier("completion")); "parenthesised")]
fn nil_checked_block_call_becomes_optional_call(condition: Expression) {
    let (mut collection, method) =
        method_with_body(vec![block_parameter()], vec![guarded_call(condition)]);

    rewrite(&mut collection);

    assert_eq!(body_text(&collection, method), vec!["completion?(1)"]);
}

#[test]
fn nil_compare_is_not_rewritten() {
    let condition = Expression::binary(
        Expression::identifier("completion"),
        SwiftOperator::Equals,
        Expression::nil(),
    );
    let (mut collection, method) =
        method_with_body(vec![block_parameter()], vec![guarded_call(condition)]);

    rewrite(&mut collection);

    assert!(matches!(
        collection
            .method(method)
            .expect("method should exist")
            .body
            .as_ref()
            .expect("method should have a body")
            .body
            .statements[0],
        Statement::If { .. }
    ));
}

#[test]
fn guarded_call_with_else_is_not_rewritten() {
    let statement = Statement::if_statement(
        Expression::identifier("completion"),
        CompoundStatement::new(vec![Statement::expression(
            Expression::identifier("completion").call(vec![]),
        )]),
        Some(CompoundStatement::empty()),
    );
    let (mut collection, method) = method_with_body(vec![block_parameter()], vec![statement]);

    rewrite(&mut collection);

    let body = &collection
        .method(method)
        .expect("method should exist")
        .body
        .as_ref()
        .expect("method should have a body")
        .body;
    assert!(matches!(body.statements[0], Statement::If { .. }));
}

/// Class `A` with a `reload()` method, an `Int` property `count` and an
/// optional block property `handler`, whose `run` method holds `statement`.
fn class_with_members(statement: Statement) -> (IntentionCollection, IntentionId) {
    let mut collection = IntentionCollection::new();
    let file = collection.add_file(FileGenerationIntention::new("A.m", "A.swift"));
    let ty = collection
        .add_type(file, TypeGenerationIntention::class("A"))
        .expect("type should be added");
    collection
        .add_property(ty, PropertyGenerationIntention::new("count", SwiftType::int()))
        .expect("property should be added");
    collection
        .add_property(
            ty,
            PropertyGenerationIntention::new(
                "handler",
                SwiftType::optional(SwiftType::block(SwiftType::void(), vec![])),
            ),
        )
        .expect("property should be added");
    collection
        .add_method(
            ty,
            MethodGenerationIntention::new(FunctionSignature::new(
                "reload",
                vec![],
                SwiftType::void(),
                false,
            )),
        )
        .expect("method should be added");
    let run = collection
        .add_method(
            ty,
            MethodGenerationIntention::new(FunctionSignature::new(
                "run",
                vec![],
                SwiftType::void(),
                false,
            ))
            .with_body(FunctionBody::new(CompoundStatement::new(vec![statement]))),
        )
        .expect("method should be added");
    (collection, run)
}

fn guarded_member_call(member: &str) -> Statement {
    let callee = Expression::identifier("self").dot(member);
    Statement::if_statement(
        callee.clone(),
        CompoundStatement::new(vec![Statement::expression(callee.call(vec![]))]),
        None,
    )
}

fn resolve_and_rewrite(collection: &mut IntentionCollection) {
    let mut context = IntentionPassContext::new(collection);
    context.resolve_all(collection);
    AstRewritingPass
        .apply(collection, &mut context)
        .expect("rewriting should succeed");
}

#[test_case("reload" ; "method")]
#[test_case("count" ; "non block property")]
fn guarded_call_of_non_block_member_is_not_rewritten(member: &str) {
    let (mut collection, run) = class_with_members(guarded_member_call(member));

    resolve_and_rewrite(&mut collection);

    let body = &collection
        .method(run)
        .expect("method should exist")
        .body
        .as_ref()
        .expect("method should have a body")
        .body;
    assert!(
        matches!(body.statements[0], Statement::If { .. }),
        "got {:?}",
        body.statements[0]
    );
}

#[test]
fn guarded_call_of_block_property_becomes_optional_call() {
    let (mut collection, run) = class_with_members(guarded_member_call("handler"));

    resolve_and_rewrite(&mut collection);

    assert_eq!(body_text(&collection, run), vec!["self.handler?()"]);
}
