use o2s_ast::{CompoundStatement, Expression, SourceText, Span, Statement, SwiftOperator, SwiftType};
use o2s_intentions::{
    FileGenerationIntention, FunctionBody, FunctionSignature, GlobalFunctionGenerationIntention,
    GlobalVariableGenerationIntention, InstanceVariableGenerationIntention, IntentionCollection,
    MethodGenerationIntention, Ownership, ParameterSignature, PropertyAttribute,
    PropertyGenerationIntention, PropertyMode, PropertySetter, ProtocolInheritanceIntention,
    TypeGenerationIntention, TypealiasIntention, ValueStorage,
};
use o2s_writer::swift_writer::write_statement;
use o2s_writer::{MemoryWriterOutput, StringOutputTarget, SwiftWriter, SwiftWriterConfig};
use test_case::test_case;

fn body(statements: Vec<Statement>) -> FunctionBody {
    FunctionBody::new(CompoundStatement::new(statements))
}

fn method(name: &str, return_type: SwiftType) -> MethodGenerationIntention {
    MethodGenerationIntention::new(FunctionSignature::new(name, vec![], return_type, false))
}

fn feed_collection() -> IntentionCollection {
    let mut collection = IntentionCollection::new();
    let mut file = FileGenerationIntention::new("Feed.m", "Feed.swift");
    file.preprocessor_directives.push("#import \"Feed.h\"".to_string());
    let file = collection.add_file(file);

    let extension = collection
        .add_type(file, TypeGenerationIntention::extension("Feed", Some("Loading")))
        .expect("extension should be added");
    collection
        .add_method(extension, method("load", SwiftType::void()))
        .expect("extension method should be added");

    let class = collection
        .add_type(file, TypeGenerationIntention::class("Feed").with_superclass("NSObject"))
        .expect("class should be added");
    collection
        .add_protocol_conformance(class, ProtocolInheritanceIntention::new("FeedDelegate"))
        .expect("conformance should be added");
    collection
        .add_instance_variable(
            class,
            InstanceVariableGenerationIntention::new("_count", SwiftType::int()),
        )
        .expect("ivar should be added");

    let mut delegate = PropertyGenerationIntention::new(
        "delegate",
        SwiftType::optional(SwiftType::named("FeedDelegate")),
    );
    delegate.storage.ownership = Ownership::Weak;
    collection
        .add_property(class, delegate)
        .expect("delegate should be added");

    let mut title = PropertyGenerationIntention::new("title", SwiftType::string());
    title.mode = PropertyMode::Computed {
        getter: body(vec![Statement::Return(Some(Expression::string("Feed")))]),
        setter: None,
    };
    collection
        .add_property(class, title)
        .expect("title should be added");

    let mut count = PropertyGenerationIntention::new("count", SwiftType::int());
    count.mode = PropertyMode::Property {
        getter: body(vec![Statement::Return(Some(Expression::identifier("_count")))]),
        setter: PropertySetter {
            value_identifier: "value".to_string(),
            body: body(vec![Statement::expression(Expression::assignment(
                Expression::identifier("_count"),
                SwiftOperator::Assign,
                Expression::identifier("value"),
            ))]),
        },
    };
    collection
        .add_property(class, count)
        .expect("count should be added");

    let reload = body(vec![Statement::if_statement(
        Expression::binary(
            Expression::identifier("count"),
            SwiftOperator::GreaterThan,
            Expression::int(0),
        ),
        CompoundStatement::new(vec![Statement::expression(
            Expression::identifier("self").dot("update").call(vec![]),
        )]),
        Some(CompoundStatement::new(vec![Statement::if_statement(
            Expression::binary(
                Expression::identifier("count"),
                SwiftOperator::Equals,
                Expression::int(0),
            ),
            CompoundStatement::new(vec![Statement::Return(None)]),
            Some(CompoundStatement::new(vec![Statement::expression(
                Expression::identifier("reset").call(vec![]),
            )])),
        )])),
    )]);
    collection
        .add_method(class, method("reload", SwiftType::void()).with_body(reload))
        .expect("reload should be added");
    collection
        .add_method(
            class,
            method("init", SwiftType::named("Feed")).with_body(FunctionBody::empty()),
        )
        .expect("init should be added");

    let protocol = collection
        .add_type(file, TypeGenerationIntention::protocol("FeedDelegate"))
        .expect("protocol should be added");
    collection
        .add_property(
            protocol,
            PropertyGenerationIntention::new("isReady", SwiftType::bool())
                .with_attributes(vec![PropertyAttribute::parse("readonly")]),
        )
        .expect("protocol property should be added");
    collection
        .add_method(
            protocol,
            MethodGenerationIntention::new(FunctionSignature::new(
                "feedDidLoad",
                vec![ParameterSignature::unlabeled("feed", SwiftType::named("Feed"))],
                SwiftType::void(),
                false,
            )),
        )
        .expect("protocol method should be added");

    let mut feed_count = GlobalFunctionGenerationIntention::new(FunctionSignature::new(
        "feedCount",
        vec![],
        SwiftType::int(),
        false,
    ));
    feed_count.body = Some(body(vec![Statement::Return(Some(Expression::int(0)))]));
    collection
        .add_global_function(file, feed_count)
        .expect("global function should be added");

    let mut limit =
        GlobalVariableGenerationIntention::new("kFeedLimit", ValueStorage::new(SwiftType::int()).constant());
    limit.initial_value = Some(Expression::int(10));
    collection
        .add_global_variable(file, limit)
        .expect("global variable should be added");

    collection
        .add_typealias(
            file,
            TypealiasIntention::new(
                "Completion",
                SwiftType::block(SwiftType::void(), vec![SwiftType::bool()]),
            ),
        )
        .expect("typealias should be added");

    collection
}

const FEED_SWIFT: &str = r#"// Preprocessor directives found in file:
// #import "Feed.h"

typealias Completion = (Bool) -> Void

let kFeedLimit: Int = 10

func feedCount() -> Int {
    return 0
}

protocol FeedDelegate {
    var isReady: Bool { get }
    func feedDidLoad(_ feed: Feed)
}

class Feed: NSObject, FeedDelegate {
    private var _count: Int

    weak var delegate: FeedDelegate?
    var title: String {
        return "Feed"
    }
    var count: Int {
        get {
            return _count
        }
        set(value) {
            _count = value
        }
    }

    init() {
    }

    func reload() {
        if count > 0 {
            self.update()
        } else if count == 0 {
            return
        } else {
            reset()
        }
    }
}

// MARK: - Loading
extension Feed {
    func load() {
    }
}
"#;

#[test]
fn writes_declarations_in_fixed_order() {
    let collection = feed_collection();
    let mut output = MemoryWriterOutput::new("    ");

    let written = SwiftWriter::default()
        .write(&collection, &mut output)
        .expect("writing should succeed");

    assert_eq!(written, vec!["Feed.swift".to_string()]);
    assert_eq!(output.file("Feed.swift"), Some(FEED_SWIFT));
}

#[test]
fn source_comments_can_be_disabled() {
    let collection = feed_collection();
    let writer = SwiftWriter::new(SwiftWriterConfig {
        include_source_comments: false,
        ..SwiftWriterConfig::default()
    });
    let mut target = StringOutputTarget::new("    ");

    writer
        .write_file(&collection, collection.files()[0], &mut target)
        .expect("writing should succeed");

    assert!(target.as_str().starts_with("typealias Completion"));
}

#[test]
fn files_sharing_a_target_are_concatenated() {
    let mut collection = IntentionCollection::new();
    let header = collection.add_file(FileGenerationIntention::new("Feed.h", "Feed.swift"));
    collection
        .add_global_variable(
            header,
            GlobalVariableGenerationIntention::new("FeedVersion", ValueStorage::new(SwiftType::double())),
        )
        .expect("global variable should be added");
    let implementation = collection.add_file(FileGenerationIntention::new("Feed.m", "Feed.swift"));
    collection
        .add_type(implementation, TypeGenerationIntention::class("Feed"))
        .expect("class should be added");
    let other = collection.add_file(FileGenerationIntention::new("Other.m", "Other.swift"));
    collection
        .add_type(other, TypeGenerationIntention::class("Other"))
        .expect("class should be added");
    let mut output = MemoryWriterOutput::new("    ");

    let written = SwiftWriter::default()
        .write(&collection, &mut output)
        .expect("writing should succeed");

    assert_eq!(written, vec!["Feed.swift".to_string(), "Other.swift".to_string()]);
    assert_eq!(
        output.file("Feed.swift"),
        Some("var FeedVersion: Double\n\nclass Feed {\n}\n")
    );
    assert_eq!(output.file("Other.swift"), Some("class Other {\n}\n"));
}

#[test]
fn extension_accessors_print_as_computed_get_set() {
    let mut collection = IntentionCollection::new();
    let file = collection.add_file(FileGenerationIntention::new("A.m", "A.swift"));
    let extension = collection
        .add_type(file, TypeGenerationIntention::extension("A", None))
        .expect("extension should be added");
    let mut flag = PropertyGenerationIntention::new("flag", SwiftType::bool());
    flag.mode = PropertyMode::Computed {
        getter: body(vec![Statement::Return(Some(Expression::boolean(true)))]),
        setter: Some(PropertySetter {
            value_identifier: "newValue".to_string(),
            body: FunctionBody::empty(),
        }),
    };
    collection
        .add_property(extension, flag)
        .expect("property should be added");
    let mut output = MemoryWriterOutput::new("  ");

    SwiftWriter::default()
        .write(&collection, &mut output)
        .expect("writing should succeed");

    assert_eq!(
        output.file("A.swift"),
        Some("extension A {\n  var flag: Bool {\n    get {\n      return true\n    }\n    set {\n    }\n  }\n}\n")
    );
}

#[test_case(Ownership::Strong, "var view: UIView?" ; "strong")]
#[test_case(Ownership::Weak, "weak var view: UIView?" ; "weak")]
#[test_case(Ownership::Unowned, "unowned var view: UIView?" ; "unowned")]
#[test_case(Ownership::UnownedUnsafe, "unowned(unsafe) var view: UIView?" ; "unowned unsafe")]
fn field_properties_carry_ownership(ownership: Ownership, expected: &str) {
    let mut collection = IntentionCollection::new();
    let file = collection.add_file(FileGenerationIntention::new("A.m", "A.swift"));
    let class = collection
        .add_type(file, TypeGenerationIntention::class("A"))
        .expect("class should be added");
    let mut view =
        PropertyGenerationIntention::new("view", SwiftType::optional(SwiftType::named("UIView")));
    view.storage.ownership = ownership;
    collection
        .add_property(class, view)
        .expect("property should be added");
    let mut target = StringOutputTarget::new("");

    SwiftWriter::default()
        .write_file(&collection, file, &mut target)
        .expect("writing should succeed");

    assert_eq!(target.as_str(), format!("class A {{\n{}\n}}\n", expected));
}

#[test_case(
    Statement::While {
        condition: Expression::identifier("running"),
        body: CompoundStatement::new(vec![Statement::Break]),
    },
    "while running {\n    break\n}\n" ; "while loop"
)]
#[test_case(
    Statement::DoWhile {
        body: CompoundStatement::new(vec![Statement::Continue]),
        condition: Expression::boolean(false),
    },
    "repeat {\n    continue\n} while false\n" ; "repeat while"
)]
#[test_case(
    Statement::ForIn {
        binding: "item".to_string(),
        sequence: Expression::identifier("items"),
        body: CompoundStatement::empty(),
    },
    "for item in items {\n}\n" ; "for in"
)]
#[test_case(
    Statement::Compound(CompoundStatement::new(vec![Statement::Return(None)])),
    "do {\n    return\n}\n" ; "compound"
)]
#[test_case(
    Statement::variable("total", SwiftType::int(), Some(Expression::int(0)), false),
    "var total: Int = 0\n" ; "variable declaration"
)]
#[test_case(
    Statement::Unknown(SourceText::new("@try {\n}", Span::dummy())),
    "// @try {\n// }\n" ; "unknown source"
)]
fn statements_print_one_per_line(statement: Statement, expected: &str) {
    let mut target = StringOutputTarget::new("    ");

    write_statement(&statement, &mut target);

    assert_eq!(target.as_str(), expected);
}
