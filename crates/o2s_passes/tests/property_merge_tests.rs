use o2s_ast::{CompoundStatement, Expression, Statement, SwiftType};
use o2s_intentions::{
    FileGenerationIntention, FunctionBody, FunctionSignature, IntentionCollection, IntentionId,
    MethodGenerationIntention, ParameterSignature, PropertyAttribute, PropertyGenerationIntention,
    PropertyMode, TypeGenerationIntention,
};
use o2s_passes::{IntentionPass, IntentionPassContext, PropertyMergePass};

fn collection_with(ty: TypeGenerationIntention) -> (IntentionCollection, IntentionId) {
    let mut collection = IntentionCollection::new();
    let file = collection.add_file(FileGenerationIntention::new("a", "a"));
    let type_id = collection
        .add_type(file, ty)
        .expect("type should be added to file");
    (collection, type_id)
}

fn getter(name: &str, ty: SwiftType) -> MethodGenerationIntention {
    MethodGenerationIntention::new(FunctionSignature::new(name, vec![], ty, false))
}

fn setter(name: &str, ty: SwiftType) -> MethodGenerationIntention {
    MethodGenerationIntention::new(FunctionSignature::new(
        name,
        vec![ParameterSignature::unlabeled("a", ty)],
        SwiftType::void(),
        false,
    ))
}

fn readonly(property: PropertyGenerationIntention) -> PropertyGenerationIntention {
    property.with_attributes(vec![PropertyAttribute::Attribute("readonly".to_string())])
}

fn run(collection: &mut IntentionCollection) {
    let mut context = IntentionPassContext::new(collection);
    PropertyMergePass
        .apply(collection, &mut context)
        .expect("property merge should succeed");
    collection
        .verify_integrity()
        .expect("graph should stay consistent");
}

fn only_property(collection: &IntentionCollection, type_id: IntentionId) -> &PropertyGenerationIntention {
    let ty = collection.type_intention(type_id).expect("type should exist");
    assert_eq!(ty.properties().len(), 1);
    collection
        .property(ty.properties()[0])
        .expect("property should exist")
}

fn method_count(collection: &IntentionCollection, type_id: IntentionId) -> usize {
    collection
        .type_intention(type_id)
        .expect("type should exist")
        .methods()
        .len()
}

#[test]
fn merges_getter_and_setter_into_property() {
    let (mut collection, type_id) = collection_with(TypeGenerationIntention::class("A"));
    collection
        .add_property(type_id, PropertyGenerationIntention::new("a", SwiftType::int()))
        .expect("property should be added");
    collection
        .add_method(type_id, getter("a", SwiftType::int()))
        .expect("getter should be added");
    collection
        .add_method(type_id, setter("setA", SwiftType::int()))
        .expect("setter should be added");

    run(&mut collection);

    assert_eq!(method_count(&collection, type_id), 0);
    match &only_property(&collection, type_id).mode {
        PropertyMode::Property { setter, .. } => assert_eq!(setter.value_identifier, "a"),
        other => panic!("Expected property mode, got {:?}", other),
    }
}

#[test]
fn merges_readonly_property_with_getter_into_computed() {
    let (mut collection, type_id) = collection_with(TypeGenerationIntention::class("A"));
    collection
        .add_property(type_id, readonly(PropertyGenerationIntention::new("a", SwiftType::int())))
        .expect("property should be added");
    collection
        .add_method(type_id, getter("a", SwiftType::int()))
        .expect("getter should be added");

    run(&mut collection);

    assert_eq!(method_count(&collection, type_id), 0);
    match &only_property(&collection, type_id).mode {
        PropertyMode::Computed { setter: None, .. } => {}
        other => panic!("Expected computed mode, got {:?}", other),
    }
}

#[test]
fn merges_category_accessors_into_computed() {
    let (mut collection, type_id) = collection_with(TypeGenerationIntention::extension("A", None));
    collection
        .add_property(type_id, readonly(PropertyGenerationIntention::new("a", SwiftType::int())))
        .expect("property should be added");
    collection
        .add_method(type_id, getter("a", SwiftType::int()))
        .expect("getter should be added");

    run(&mut collection);

    assert_eq!(method_count(&collection, type_id), 0);
    assert!(only_property(&collection, type_id).mode.is_computed());
}

#[test]
fn extension_keeps_setter_on_computed_property() {
    let (mut collection, type_id) =
        collection_with(TypeGenerationIntention::extension("A", Some("Extras")));
    collection
        .add_property(type_id, PropertyGenerationIntention::new("a", SwiftType::int()))
        .expect("property should be added");
    collection
        .add_method(type_id, getter("a", SwiftType::int()))
        .expect("getter should be added");
    collection
        .add_method(type_id, setter("setA", SwiftType::int()))
        .expect("setter should be added");

    run(&mut collection);

    assert_eq!(method_count(&collection, type_id), 0);
    match &only_property(&collection, type_id).mode {
        PropertyMode::Computed {
            setter: Some(setter),
            ..
        } => assert_eq!(setter.value_identifier, "a"),
        other => panic!("Expected computed mode with setter, got {:?}", other),
    }
}

#[test]
fn readonly_property_never_takes_a_setter() {
    let (mut collection, type_id) = collection_with(TypeGenerationIntention::class("A"));
    collection
        .add_property(type_id, readonly(PropertyGenerationIntention::new("a", SwiftType::int())))
        .expect("property should be added");
    collection
        .add_method(type_id, getter("a", SwiftType::int()))
        .expect("getter should be added");
    collection
        .add_method(type_id, setter("setA", SwiftType::int()))
        .expect("setter should be added");

    run(&mut collection);

    assert_eq!(method_count(&collection, type_id), 1);
    assert!(only_property(&collection, type_id).mode.is_computed());
}

#[test]
fn unmatched_property_is_left_alone() {
    let (mut collection, type_id) = collection_with(TypeGenerationIntention::class("A"));
    collection
        .add_property(type_id, PropertyGenerationIntention::new("a", SwiftType::int()))
        .expect("property should be added");
    collection
        .add_method(type_id, getter("b", SwiftType::int()))
        .expect("method should be added");
    collection
        .add_method(type_id, setter("setA", SwiftType::string()))
        .expect("method should be added");

    run(&mut collection);

    assert_eq!(method_count(&collection, type_id), 2);
    assert!(only_property(&collection, type_id).mode.is_field());
}

#[test]
fn first_declared_getter_wins() {
    let (mut collection, type_id) = collection_with(TypeGenerationIntention::class("A"));
    collection
        .add_property(type_id, readonly(PropertyGenerationIntention::new("a", SwiftType::int())))
        .expect("property should be added");
    let first_body = CompoundStatement::new(vec![Statement::Return(Some(Expression::int(1)))]);
    let second_body = CompoundStatement::new(vec![Statement::Return(Some(Expression::int(2)))]);
    collection
        .add_method(
            type_id,
            getter("a", SwiftType::int()).with_body(FunctionBody::new(first_body.clone())),
        )
        .expect("getter should be added");
    let duplicate = collection
        .add_method(
            type_id,
            getter("a", SwiftType::int()).with_body(FunctionBody::new(second_body)),
        )
        .expect("duplicate getter should be added");

    run(&mut collection);

    let ty = collection.type_intention(type_id).expect("type should exist");
    assert_eq!(ty.methods(), &[duplicate]);
    match &only_property(&collection, type_id).mode {
        PropertyMode::Computed { getter, .. } => assert_eq!(getter.body, first_body),
        other => panic!("Expected computed mode, got {:?}", other),
    }
}

#[test]
fn honours_custom_accessor_names() {
    let (mut collection, type_id) = collection_with(TypeGenerationIntention::class("A"));
    collection
        .add_property(
            type_id,
            PropertyGenerationIntention::new("enabled", SwiftType::bool()).with_attributes(vec![
                PropertyAttribute::parse("getter=isEnabled"),
                PropertyAttribute::parse("setter=updateEnabled:"),
            ]),
        )
        .expect("property should be added");
    collection
        .add_method(type_id, getter("isEnabled", SwiftType::bool()))
        .expect("getter should be added");
    collection
        .add_method(type_id, setter("updateEnabled", SwiftType::bool()))
        .expect("setter should be added");

    run(&mut collection);

    assert_eq!(method_count(&collection, type_id), 0);
    assert!(matches!(
        only_property(&collection, type_id).mode,
        PropertyMode::Property { .. }
    ));
}

#[test]
fn setter_type_ignores_nullability() {
    let (mut collection, type_id) = collection_with(TypeGenerationIntention::class("A"));
    collection
        .add_property(
            type_id,
            PropertyGenerationIntention::new("name", SwiftType::optional(SwiftType::string())),
        )
        .expect("property should be added");
    collection
        .add_method(
            type_id,
            getter("name", SwiftType::implicitly_unwrapped(SwiftType::string())),
        )
        .expect("getter should be added");
    collection
        .add_method(
            type_id,
            setter("setName", SwiftType::implicitly_unwrapped(SwiftType::string())),
        )
        .expect("setter should be added");

    run(&mut collection);

    assert_eq!(method_count(&collection, type_id), 0);
    assert!(matches!(
        only_property(&collection, type_id).mode,
        PropertyMode::Property { .. }
    ));
}

#[test]
fn merged_getter_body_is_resolved_against_property_type() {
    let (mut collection, type_id) = collection_with(TypeGenerationIntention::class("A"));
    collection
        .add_property(type_id, readonly(PropertyGenerationIntention::new("count", SwiftType::int())))
        .expect("property should be added");
    let body = CompoundStatement::new(vec![Statement::Return(Some(Expression::int(3)))]);
    collection
        .add_method(
            type_id,
            getter("count", SwiftType::int()).with_body(FunctionBody::new(body)),
        )
        .expect("getter should be added");

    run(&mut collection);

    match &only_property(&collection, type_id).mode {
        PropertyMode::Computed { getter, .. } => match &getter.body.statements[0] {
            Statement::Return(Some(value)) => {
                assert_eq!(value.expected_type, Some(SwiftType::int()));
                assert_eq!(value.resolved_type, Some(SwiftType::int()));
            }
            other => panic!("Expected return statement, got {:?}", other),
        },
        other => panic!("Expected computed mode, got {:?}", other),
    }
}
