use super::*;
use o2s_ast::{CompoundStatement, Expression, Statement, SwiftType};
use o2s_intentions::{
    FileGenerationIntention, FunctionBody, FunctionSignature, IntentionCollection, IntentionError,
    MethodGenerationIntention, ParameterSignature, PropertyGenerationIntention,
    ProtocolInheritanceIntention, PropertyMode, TypeGenerationIntention,
};
use std::sync::{Arc, Mutex};

struct RecordingPass {
    name: &'static str,
    log: Arc<Mutex<Vec<&'static str>>>,
}

impl IntentionPass for RecordingPass {
    fn name(&self) -> &'static str {
        self.name
    }

    fn apply(
        &self,
        _collection: &mut IntentionCollection,
        _context: &mut IntentionPassContext,
    ) -> Result<(), IntentionError> {
        self.log.lock().expect("log lock should not be poisoned").push(self.name);
        Ok(())
    }
}

struct FailingPass;

impl IntentionPass for FailingPass {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn apply(
        &self,
        collection: &mut IntentionCollection,
        _context: &mut IntentionPassContext,
    ) -> Result<(), IntentionError> {
        let file = collection.files()[0];
        collection.method(file).map(|_| ())
    }
}

fn string_method(name: &str, ty: SwiftType) -> MethodGenerationIntention {
    MethodGenerationIntention::new(FunctionSignature::new(
        name,
        vec![ParameterSignature::unlabeled("value", ty.clone())],
        ty,
        false,
    ))
}

#[test]
fn default_pipeline_runs_passes_in_documented_order() {
    let pipeline = IntentionPassPipeline::default_pipeline();

    assert_eq!(pipeline.pass_names(), DEFAULT_PASS_NAMES.to_vec());
    assert_eq!(
        DEFAULT_PASS_NAMES,
        [
            "file-type-merging",
            "protocol-nullability-propagation",
            "property-merge",
            "ast-rewriting"
        ]
    );
}

#[test]
fn pipeline_from_names_keeps_given_order() {
    let pipeline = IntentionPassPipeline::from_names(&["ast-rewriting", "property-merge"])
        .expect("known passes should build");

    assert_eq!(pipeline.pass_names(), vec!["ast-rewriting", "property-merge"]);
}

#[test]
fn pipeline_from_names_rejects_unknown_pass() {
    let error = match IntentionPassPipeline::from_names(&["property-merge", "inline-everything"]) {
        Ok(_) => panic!("Expected unknown pass error"),
        Err(error) => error,
    };

    assert_eq!(
        error,
        PassError::UnknownPass {
            name: "inline-everything".to_string()
        }
    );
    assert_eq!(error.pass_name(), None);
}

#[test]
fn custom_passes_run_in_insertion_order() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let pipeline = IntentionPassPipeline::builder()
        .with_pass(RecordingPass {
            name: "first",
            log: Arc::clone(&log),
        })
        .with_pass(RecordingPass {
            name: "second",
            log: Arc::clone(&log),
        })
        .build();
    let mut collection = IntentionCollection::new();
    let mut context = IntentionPassContext::new(&collection);

    pipeline
        .run(&mut collection, &mut context)
        .expect("recording passes should succeed");

    assert_eq!(
        *log.lock().expect("log lock should not be poisoned"),
        vec!["first", "second"]
    );
}

#[test]
fn failing_pass_stops_pipeline_and_names_itself() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let pipeline = IntentionPassPipeline::builder()
        .with_pass(FailingPass)
        .with_pass(RecordingPass {
            name: "after",
            log: Arc::clone(&log),
        })
        .build();
    let mut collection = IntentionCollection::new();
    collection.add_file(FileGenerationIntention::new("A.m", "A.swift"));
    let mut context = IntentionPassContext::new(&collection);

    let error = match pipeline.run(&mut collection, &mut context) {
        Ok(()) => panic!("Expected failing pass to abort the pipeline"),
        Err(error) => error,
    };

    match &error {
        PassError::Pass {
            pass: "failing",
            source: IntentionError::UnexpectedKind { .. },
        } => {}
        other => panic!("Expected pass failure, got {:?}", other),
    }
    assert_eq!(error.pass_name(), Some("failing"));
    assert!(log.lock().expect("log lock should not be poisoned").is_empty());
}

#[test]
fn protocol_nullability_replaces_only_implicitly_unwrapped_types() {
    let mut collection = IntentionCollection::new();
    let file = collection.add_file(FileGenerationIntention::new("A.m", "A.swift"));
    let protocol = collection
        .add_type(file, TypeGenerationIntention::protocol("Source"))
        .expect("protocol should be added");
    collection
        .add_method(
            protocol,
            string_method("title", SwiftType::optional(SwiftType::string())),
        )
        .expect("requirement should be added");
    collection
        .add_method(protocol, string_method("subtitle", SwiftType::string()))
        .expect("requirement should be added");

    let class = collection
        .add_type(file, TypeGenerationIntention::class("Feed"))
        .expect("class should be added");
    collection
        .add_protocol_conformance(class, ProtocolInheritanceIntention::new("Source"))
        .expect("conformance should be added");
    let title = collection
        .add_method(
            class,
            string_method("title", SwiftType::implicitly_unwrapped(SwiftType::string())),
        )
        .expect("method should be added");
    let subtitle = collection
        .add_method(
            class,
            string_method(
                "subtitle",
                SwiftType::optional(SwiftType::string()),
            ),
        )
        .expect("method should be added");

    let mut context = IntentionPassContext::new(&collection);
    ProtocolNullabilityPropagationPass
        .apply(&mut collection, &mut context)
        .expect("propagation should succeed");

    let title = &collection.method(title).expect("title should exist").signature;
    assert_eq!(title.return_type, SwiftType::optional(SwiftType::string()));
    assert_eq!(
        title.parameters[0].ty,
        SwiftType::optional(SwiftType::string())
    );
    let subtitle = &collection
        .method(subtitle)
        .expect("subtitle should exist")
        .signature;
    assert_eq!(subtitle.return_type, SwiftType::optional(SwiftType::string()));
}

#[test]
fn protocol_nullability_ignores_non_conforming_types() {
    let mut collection = IntentionCollection::new();
    let file = collection.add_file(FileGenerationIntention::new("A.m", "A.swift"));
    let protocol = collection
        .add_type(file, TypeGenerationIntention::protocol("Source"))
        .expect("protocol should be added");
    collection
        .add_method(protocol, string_method("title", SwiftType::string()))
        .expect("requirement should be added");
    let class = collection
        .add_type(file, TypeGenerationIntention::class("Other"))
        .expect("class should be added");
    let title = collection
        .add_method(
            class,
            string_method("title", SwiftType::implicitly_unwrapped(SwiftType::string())),
        )
        .expect("method should be added");

    let mut context = IntentionPassContext::new(&collection);
    ProtocolNullabilityPropagationPass
        .apply(&mut collection, &mut context)
        .expect("propagation should succeed");

    assert_eq!(
        collection
            .method(title)
            .expect("title should exist")
            .signature
            .return_type,
        SwiftType::implicitly_unwrapped(SwiftType::string())
    );
}

#[test]
fn default_pipeline_merges_files_and_properties_then_rewrites_bodies() {
    let mut collection = IntentionCollection::new();
    let header = collection.add_file(FileGenerationIntention::new("Feed.h", "Feed.swift"));
    let interface = collection
        .add_type(
            header,
            TypeGenerationIntention::class("Feed").with_superclass("NSObject"),
        )
        .expect("interface should be added");
    collection
        .add_property(
            interface,
            PropertyGenerationIntention::new("view", SwiftType::named("UIView")),
        )
        .expect("property should be added");

    let implementation = collection.add_file(FileGenerationIntention::new("Feed.m", "Feed.swift"));
    let class = collection
        .add_type(implementation, TypeGenerationIntention::class("Feed"))
        .expect("class should be added");
    let getter_body = CompoundStatement::new(vec![Statement::Return(Some(
        Expression::identifier("UIView")
            .dot("alloc")
            .call(vec![])
            .dot("init")
            .call(vec![]),
    ))]);
    collection
        .add_method(
            class,
            MethodGenerationIntention::new(FunctionSignature::new(
                "view",
                vec![],
                SwiftType::named("UIView"),
                false,
            ))
            .with_body(FunctionBody::new(getter_body)),
        )
        .expect("getter should be added");

    let mut context = IntentionPassContext::new(&collection);
    context.resolve_all(&mut collection);
    IntentionPassPipeline::default_pipeline()
        .run(&mut collection, &mut context)
        .expect("default pipeline should succeed");

    assert_eq!(collection.files(), &[implementation]);
    let class = collection.type_intention(class).expect("class should remain");
    assert_eq!(class.superclass_name(), Some("NSObject"));
    assert!(class.methods().is_empty());
    let property = collection
        .property(class.properties()[0])
        .expect("property should be merged");
    let PropertyMode::Computed { getter, setter } = &property.mode else {
        panic!("Expected computed property, got {:?}", property.mode);
    };
    assert!(setter.is_none());
    match &getter.body.statements[0] {
        Statement::Return(Some(value)) => {
            assert_eq!(value.to_string(), "UIView()");
            assert_eq!(value.resolved_type, Some(SwiftType::named("UIView")));
        }
        other => panic!("Expected return statement, got {:?}", other),
    }
}
