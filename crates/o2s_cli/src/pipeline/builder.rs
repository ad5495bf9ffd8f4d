// o2s_cli/pipeline/builder - Lowers one syntax tree into file intentions
use super::signature::SignatureGenerator;
use o2s_ast::{CompoundStatement, Expression, SwiftType, VisitAction};
use o2s_intentions::{
    AccessLevel, FileGenerationIntention, FunctionBody, GlobalFunctionGenerationIntention,
    GlobalVariableGenerationIntention, InstanceVariableGenerationIntention, IntentionCollection,
    IntentionError, IntentionHeader, IntentionId, MethodGenerationIntention, PropertyAttribute,
    PropertyGenerationIntention, ProtocolInheritanceIntention, SourceNodeRef, TypeGenerationIntention,
    TypeIntentionKind, TypealiasIntention, ValueStorage,
};
use o2s_objc::{
    traverse, DiagnosticsSink, FunctionParameter, MethodDefinition, ObjcNode, ObjcNodeKind,
    ObjcNodeVisitor, ObjcType, Severity, SourceLocation,
};
use o2s_typesystem::{ownership_of, TypeMapper, TypeMappingContext};
use std::path::Path;
use tracing::{debug, trace};

const NONNULL_BEGIN: &str = "NS_ASSUME_NONNULL_BEGIN";
const NONNULL_END: &str = "NS_ASSUME_NONNULL_END";

/// Builds the intentions of one source file. The returned collection holds
/// exactly one file intention.
pub fn build_file_intentions(
    source_name: &str,
    root: &ObjcNode,
    diagnostics: &mut dyn DiagnosticsSink,
) -> Result<IntentionCollection, IntentionError> {
    let mut builder = IntentionBuilder::new(source_name, diagnostics);
    traverse(&mut builder, root);
    builder.finish()
}

/// Objective-C path of an input: the parser's JSON dumps are named after
/// the file they describe (`Feed.m.json`).
pub fn objc_source_path(source_name: &str) -> &str {
    source_name.strip_suffix(".json").unwrap_or(source_name)
}

/// `Feed.h` and `Feed.m` both emit `Feed.swift`.
pub fn swift_target_path(source_path: &str) -> String {
    let stem = Path::new(source_path)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| source_path.to_string());
    format!("{}.swift", stem)
}

enum BuildContext {
    Type(IntentionId),
    IvarList(AccessLevel),
    /// Placeholder keeping enter/exit balanced when a node was not lowered.
    Skipped,
}

struct IntentionBuilder<'a> {
    source_path: String,
    mapper: TypeMapper,
    collection: IntentionCollection,
    file: IntentionId,
    contexts: Vec<BuildContext>,
    in_nonnull_region: bool,
    diagnostics: &'a mut dyn DiagnosticsSink,
    error: Option<IntentionError>,
}

impl<'a> IntentionBuilder<'a> {
    fn new(source_name: &str, diagnostics: &'a mut dyn DiagnosticsSink) -> Self {
        let source_path = objc_source_path(source_name).to_string();
        let mut collection = IntentionCollection::new();
        let file = collection.add_file(FileGenerationIntention::new(
            source_path.clone(),
            swift_target_path(&source_path),
        ));
        Self {
            source_path,
            mapper: TypeMapper::new(),
            collection,
            file,
            contexts: Vec::new(),
            in_nonnull_region: false,
            diagnostics,
            error: None,
        }
    }

    fn finish(self) -> Result<IntentionCollection, IntentionError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        debug!(
            file = %self.source_path,
            intentions = self.collection.len(),
            "built file intentions"
        );
        Ok(self.collection)
    }

    fn header(&self, node: &ObjcNode) -> IntentionHeader {
        IntentionHeader::from_source(
            SourceNodeRef::new(Some(&self.source_path), node.kind_name(), node.span.clone()),
            self.in_nonnull_region,
        )
    }

    fn current_type(&self) -> Option<IntentionId> {
        self.contexts.iter().rev().find_map(|context| match context {
            BuildContext::Type(id) => Some(*id),
            _ => None,
        })
    }

    fn current_ivar_access(&mut self) -> Option<&mut AccessLevel> {
        match self.contexts.last_mut() {
            Some(BuildContext::IvarList(access)) => Some(access),
            _ => None,
        }
    }

    fn map_type(&self, ty: &ObjcType) -> SwiftType {
        self.mapper.swift_type(
            ty,
            &TypeMappingContext::empty().in_nonnull_region(self.in_nonnull_region),
        )
    }

    fn record(&mut self, result: Result<IntentionId, IntentionError>) {
        if let Err(error) = result {
            self.error.get_or_insert(error);
        }
    }

    fn warn(&mut self, node: &ObjcNode, message: String) {
        self.diagnostics.record(
            Severity::Warning,
            message,
            SourceLocation::from_span(Some(&self.source_path), &node.span),
        );
    }

    fn enter_type(&mut self, node: &ObjcNode, mut intention: TypeGenerationIntention) {
        intention.header = self.header(node);
        trace!(name = %intention.type_name, "entering type");
        let context = match self.collection.add_type(self.file, intention) {
            Ok(id) => BuildContext::Type(id),
            Err(error) => {
                self.error.get_or_insert(error);
                BuildContext::Skipped
            }
        };
        self.contexts.push(context);
    }

    fn visit_superclass(&mut self, name: &str) {
        let Some(type_id) = self.current_type() else {
            return;
        };
        match self.collection.type_intention_mut(type_id) {
            Ok(ty) => {
                if let TypeIntentionKind::Class { superclass_name } = &mut ty.kind {
                    *superclass_name = Some(name.to_string());
                }
            }
            Err(error) => {
                self.error.get_or_insert(error);
            }
        }
    }

    fn visit_protocol_list(&mut self, node: &ObjcNode, protocols: &[String]) {
        let Some(type_id) = self.current_type() else {
            return;
        };
        for protocol in protocols {
            let mut conformance = ProtocolInheritanceIntention::new(protocol.clone());
            conformance.header = self.header(node);
            let result = self.collection.add_protocol_conformance(type_id, conformance);
            self.record(result);
        }
    }

    fn visit_property(&mut self, node: &ObjcNode, name: &str, ty: &ObjcType, attributes: &[String]) {
        let Some(type_id) = self.current_type() else {
            self.warn(node, format!("property `{}` outside of a type declaration", name));
            return;
        };
        let raw = attributes.iter().map(String::as_str);
        let context = TypeMappingContext::from_attributes(raw.clone(), self.in_nonnull_region);
        let mut property = PropertyGenerationIntention::new(name, self.mapper.swift_type(ty, &context))
            .with_attributes(attributes.iter().map(|raw| PropertyAttribute::parse(raw)).collect());
        property.storage.ownership = ownership_of(ty, raw);
        property.is_static = property.has_attribute("class");
        property.header = self.header(node);
        let result = self.collection.add_property(type_id, property);
        self.record(result);
    }

    fn visit_method(&mut self, node: &ObjcNode, definition: &MethodDefinition) {
        let Some(type_id) = self.current_type() else {
            self.warn(node, "method outside of a type declaration".to_string());
            return;
        };
        let owner_type = self
            .collection
            .type_intention(type_id)
            .ok()
            .filter(|ty| !ty.is_protocol())
            .map(|ty| ty.type_name.clone());
        let signature = SignatureGenerator::new(&self.mapper, self.in_nonnull_region)
            .with_owner_type(owner_type.as_deref())
            .method_signature(definition);
        let mut method = MethodGenerationIntention::new(signature);
        method.header = self.header(node);
        method.body = definition.body.clone().map(|body| self.function_body(node, body));
        let result = self.collection.add_method(type_id, method);
        self.record(result);
    }

    fn visit_keyword(&mut self, keyword: &str) {
        let Some(access) = self.current_ivar_access() else {
            return;
        };
        match keyword {
            "@private" => *access = AccessLevel::Private,
            "@public" => *access = AccessLevel::Public,
            "@package" | "@protected" => *access = AccessLevel::Internal,
            _ => {}
        }
    }

    fn visit_ivar(&mut self, node: &ObjcNode, name: &str, ty: &ObjcType) {
        let Some(type_id) = self.current_type() else {
            self.warn(node, format!("instance variable `{}` outside of a class", name));
            return;
        };
        let access = self.current_ivar_access().map(|access| *access);
        let mut ivar = InstanceVariableGenerationIntention::new(name, self.map_type(ty));
        ivar.storage.ownership = ownership_of(ty, []);
        ivar.header = self.header(node);
        ivar.header.access_level = access.unwrap_or(AccessLevel::Private);
        let result = self.collection.add_instance_variable(type_id, ivar);
        self.record(result);
    }

    fn visit_global_variable(
        &mut self,
        node: &ObjcNode,
        name: &str,
        ty: &ObjcType,
        initializer: Option<&Expression>,
    ) {
        if self.current_type().is_some() {
            return;
        }
        let mut storage = ValueStorage::new(self.map_type(ty)).with_ownership(ownership_of(ty, []));
        if ty.modifiers().contains(&"const") {
            storage = storage.constant();
        }
        let mut variable = GlobalVariableGenerationIntention::new(name, storage);
        variable.initial_value = initializer.cloned();
        variable.header = self.header(node);
        let result = self.collection.add_global_variable(self.file, variable);
        self.record(result);
    }

    fn visit_function(
        &mut self,
        node: &ObjcNode,
        name: &str,
        return_type: &ObjcType,
        parameters: &[FunctionParameter],
        body: Option<&CompoundStatement>,
    ) {
        let signature = SignatureGenerator::new(&self.mapper, self.in_nonnull_region)
            .function_signature(name, return_type, parameters);
        let mut function = GlobalFunctionGenerationIntention::new(signature);
        function.header = self.header(node);
        function.body = body.cloned().map(|body| self.function_body(node, body));
        let result = self.collection.add_global_function(self.file, function);
        self.record(result);
    }

    fn visit_typedef(&mut self, node: &ObjcNode, name: &str, ty: &ObjcType) {
        let aliased = self.map_type(ty);
        // `typedef struct Foo Foo;` names the type itself.
        if aliased.type_name() == Some(name) {
            return;
        }
        let mut alias = TypealiasIntention::new(name, aliased);
        alias.header = self.header(node);
        let result = self.collection.add_typealias(self.file, alias);
        self.record(result);
    }

    fn visit_directive(&mut self, text: &str) {
        match self.collection.file_mut(self.file) {
            Ok(file) => file.preprocessor_directives.push(text.trim().to_string()),
            Err(error) => {
                self.error.get_or_insert(error);
            }
        }
    }

    fn function_body(&self, node: &ObjcNode, body: CompoundStatement) -> FunctionBody {
        let mut body = FunctionBody::new(body);
        body.source = Some(SourceNodeRef::new(
            Some(&self.source_path),
            node.kind_name(),
            node.span.clone(),
        ));
        body
    }
}

impl ObjcNodeVisitor for IntentionBuilder<'_> {
    fn enter(&mut self, node: &ObjcNode) {
        match &node.kind {
            ObjcNodeKind::ClassInterface { name } | ObjcNodeKind::ClassImplementation { name } => {
                self.enter_type(node, TypeGenerationIntention::class(name.clone()))
            }
            ObjcNodeKind::ClassCategory {
                class_name,
                category_name,
                ..
            } => self.enter_type(
                node,
                TypeGenerationIntention::extension(class_name.clone(), category_name.as_deref()),
            ),
            ObjcNodeKind::ProtocolDeclaration { name } => {
                self.enter_type(node, TypeGenerationIntention::protocol(name.clone()))
            }
            ObjcNodeKind::IvarsList => self.contexts.push(BuildContext::IvarList(AccessLevel::Private)),
            _ => {}
        }
    }

    fn visit(&mut self, node: &ObjcNode) -> VisitAction {
        match &node.kind {
            ObjcNodeKind::SuperclassName { name } => self.visit_superclass(name),
            ObjcNodeKind::ProtocolReferenceList { protocols } => {
                self.visit_protocol_list(node, protocols)
            }
            ObjcNodeKind::PropertyDefinition {
                name,
                ty,
                attributes,
            } => self.visit_property(node, name, ty, attributes),
            ObjcNodeKind::MethodDefinition(definition) => self.visit_method(node, definition),
            ObjcNodeKind::Keyword { keyword } => self.visit_keyword(keyword),
            ObjcNodeKind::IvarDeclaration { name, ty } => self.visit_ivar(node, name, ty),
            ObjcNodeKind::VariableDeclaration {
                name,
                ty,
                initializer,
            } => self.visit_global_variable(node, name, ty, initializer.as_ref()),
            ObjcNodeKind::FunctionDefinition {
                name,
                return_type,
                parameters,
                body,
            } => self.visit_function(node, name, return_type, parameters, body.as_ref()),
            ObjcNodeKind::Typedef { name, ty } => self.visit_typedef(node, name, ty),
            ObjcNodeKind::Identifier { name } if name == NONNULL_BEGIN => {
                self.in_nonnull_region = true
            }
            ObjcNodeKind::Identifier { name } if name == NONNULL_END => {
                self.in_nonnull_region = false
            }
            ObjcNodeKind::PreprocessorDirective { text } => self.visit_directive(text),
            ObjcNodeKind::Unknown { text } => {
                let first_line = text.lines().next().unwrap_or("").trim();
                self.warn(node, format!("skipped unrecognized declaration `{}`", first_line));
                return VisitAction::SkipChildren;
            }
            _ => {}
        }
        VisitAction::Continue
    }

    fn exit(&mut self, node: &ObjcNode) {
        match &node.kind {
            ObjcNodeKind::ClassInterface { .. }
            | ObjcNodeKind::ClassImplementation { .. }
            | ObjcNodeKind::ClassCategory { .. }
            | ObjcNodeKind::ProtocolDeclaration { .. }
            | ObjcNodeKind::IvarsList => {
                self.contexts.pop();
            }
            _ => {}
        }
    }
}
