use o2s_ast::SwiftType;
use o2s_intentions::*;

fn file_with_class(collection: &mut IntentionCollection, path: &str, class: &str) -> IntentionId {
    let file = collection.add_file(FileGenerationIntention::new(path, path.replace(".m", ".swift")));
    let ty = collection
        .add_type(file, TypeGenerationIntention::class(class))
        .expect("class should attach");
    collection
        .add_method(
            ty,
            MethodGenerationIntention::new(FunctionSignature::new(
                "run",
                vec![],
                SwiftType::void(),
                false,
            )),
        )
        .expect("method should attach");
    file
}

#[test]
fn removal_detaches_and_frees_subtree() {
    let mut collection = IntentionCollection::new();
    let file = file_with_class(&mut collection, "A.m", "A");
    let ty = collection.file(file).expect("file").types()[0];
    let method = collection.type_intention(ty).expect("type").methods()[0];

    let removed = collection.remove(ty).expect("type should be removable");

    assert!(matches!(removed, Intention::Type(ref t) if t.methods().is_empty()));
    assert!(collection.file(file).expect("file").types().is_empty());
    assert!(!collection.contains(method));
    assert_eq!(collection.parent(method), None);
    assert!(collection.verify_integrity().is_ok());
}

#[test]
fn removing_from_the_wrong_parent_is_an_error() {
    let mut collection = IntentionCollection::new();
    let first = file_with_class(&mut collection, "A.m", "A");
    let second = file_with_class(&mut collection, "B.m", "B");
    let ty = collection.file(first).expect("file").types()[0];

    match collection.remove_child(second, ty) {
        Err(IntentionError::NotAChild { child, parent }) => {
            assert_eq!(child, ty);
            assert_eq!(parent, second);
        }
        other => panic!("Expected NotAChild, got {:?}", other),
    }
    assert!(collection.contains(ty));
}

#[test]
fn move_to_reparents() {
    let mut collection = IntentionCollection::new();
    let first = file_with_class(&mut collection, "A.m", "A");
    let second = file_with_class(&mut collection, "B.m", "B");
    let source = collection.file(first).expect("file").types()[0];
    let target = collection.file(second).expect("file").types()[0];
    let method = collection.type_intention(source).expect("type").methods()[0];

    collection.move_to(method, target).expect("method should move");

    assert_eq!(collection.parent(method), Some(target));
    assert_eq!(collection.type_intention(target).expect("type").methods().len(), 2);
    assert!(collection.type_intention(source).expect("type").methods().is_empty());
    assert!(collection.verify_integrity().is_ok());
}

#[test]
fn merge_remaps_ids() {
    let mut first = IntentionCollection::new();
    file_with_class(&mut first, "A.m", "A");
    let mut second = IntentionCollection::new();
    file_with_class(&mut second, "B.m", "B");

    let appended = first.merge(second);

    assert_eq!(appended.len(), 1);
    assert_eq!(first.files().len(), 2);
    let ty = first.file(appended[0]).expect("file").types()[0];
    assert_eq!(first.type_intention(ty).expect("type").type_name, "B");
    let method = first.type_intention(ty).expect("type").methods()[0];
    assert_eq!(first.parent(method), Some(ty));
    assert!(first.verify_integrity().is_ok());
    assert_eq!(first.type_intentions().len(), 2);
}

#[test]
fn collection_survives_json() {
    let mut collection = IntentionCollection::new();
    file_with_class(&mut collection, "A.m", "A");

    let json = serde_json::to_string(&collection).expect("collection should serialize");
    let decoded: IntentionCollection =
        serde_json::from_str(&json).expect("collection should deserialize");

    assert_eq!(decoded, collection);
}
