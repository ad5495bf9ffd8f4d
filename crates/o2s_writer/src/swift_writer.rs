// o2s_writer/swift_writer - Prints an intention graph as Swift source
use crate::config::SwiftWriterConfig;
use crate::error::WriterError;
use crate::output::{indented, OutputTarget, WriterOutput};
use indexmap::IndexMap;
use o2s_ast::{CompoundStatement, Expression, Statement};
use o2s_intentions::{
    AccessLevel, FunctionBody, FunctionSignature, IntentionCollection, IntentionHeader,
    IntentionId, Ownership, PropertyGenerationIntention, PropertyMode, PropertySetter,
    TypeGenerationIntention, TypeIntentionKind, ValueStorage,
};
use tracing::{debug, debug_span, trace};

/// Emits Swift for every file of an intention graph.
///
/// Each file is printed in a fixed order: typealiases, global variables,
/// global functions, protocols, classes, then extensions. Inside a type,
/// instance variables come first, then properties, initializers and
/// methods. Files that share a target path are concatenated in graph order.
#[derive(Debug, Clone, Default)]
pub struct SwiftWriter {
    config: SwiftWriterConfig,
}

/// Inserts one blank line between consecutive declarations.
#[derive(Default)]
struct Spacer {
    emitted: bool,
}

impl Spacer {
    fn before<T: OutputTarget + ?Sized>(&mut self, target: &mut T) {
        if self.emitted {
            target.output_line("");
        }
        self.emitted = true;
    }
}

impl SwiftWriter {
    pub fn new(config: SwiftWriterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SwiftWriterConfig {
        &self.config
    }

    /// Writes every file to `output` and returns the created paths in
    /// creation order.
    pub fn write(
        &self,
        collection: &IntentionCollection,
        output: &mut dyn WriterOutput,
    ) -> Result<Vec<String>, WriterError> {
        let mut groups: IndexMap<&str, Vec<IntentionId>> = IndexMap::new();
        for &file_id in collection.files() {
            let file = collection.file(file_id)?;
            groups
                .entry(file.target_path.as_str())
                .or_default()
                .push(file_id);
        }

        let mut written = Vec::with_capacity(groups.len());
        for (path, files) in groups {
            let _span = debug_span!("write_file", path).entered();
            let mut target = output.create_file(path)?;
            let mut spacer = Spacer::default();
            for file_id in files {
                spacer.before(&mut *target);
                self.write_file(collection, file_id, &mut *target)?;
            }
            target.finish()?;
            written.push(path.to_string());
        }
        debug!(files = written.len(), "wrote swift output");
        Ok(written)
    }

    /// Prints the declarations of one file intention.
    pub fn write_file<T: OutputTarget + ?Sized>(
        &self,
        collection: &IntentionCollection,
        file_id: IntentionId,
        target: &mut T,
    ) -> Result<(), WriterError> {
        let file = collection.file(file_id)?;
        let mut spacer = Spacer::default();

        if self.config.include_source_comments && !file.preprocessor_directives.is_empty() {
            spacer.before(target);
            target.output_line("// Preprocessor directives found in file:");
            for directive in &file.preprocessor_directives {
                target.output_line(&format!("// {}", directive));
            }
        }

        if !file.typealiases().is_empty() {
            spacer.before(target);
            for id in file.typealiases() {
                let alias = collection.typealias(*id)?;
                target.output_line(&format!(
                    "{}typealias {} = {}",
                    access_prefix(&alias.header),
                    alias.name,
                    alias.aliased
                ));
            }
        }

        if !file.global_variables().is_empty() {
            spacer.before(target);
            for id in file.global_variables() {
                let variable = collection.global_variable(*id)?;
                let mut line =
                    storage_declaration(&variable.header, false, &variable.name, &variable.storage);
                if let Some(value) = &variable.initial_value {
                    line.push_str(&format!(" = {}", value));
                }
                target.output_line(&line);
            }
        }

        for id in file.global_functions() {
            let function = collection.global_function(*id)?;
            spacer.before(target);
            write_function(
                &access_prefix(&function.header),
                &function.signature,
                function.body.as_ref(),
                target,
            );
        }

        let types = file
            .types()
            .iter()
            .map(|id| collection.type_intention(*id).map(|ty| (*id, ty)))
            .collect::<Result<Vec<_>, _>>()?;
        let ordered = types
            .iter()
            .filter(|(_, ty)| ty.is_protocol())
            .chain(types.iter().filter(|(_, ty)| ty.is_class()))
            .chain(types.iter().filter(|(_, ty)| ty.is_extension()));
        for (id, ty) in ordered {
            spacer.before(target);
            trace!(ty = ty.type_name.as_str(), "writing type");
            self.write_type(collection, *id, ty, target)?;
        }
        Ok(())
    }

    fn write_type<T: OutputTarget + ?Sized>(
        &self,
        collection: &IntentionCollection,
        id: IntentionId,
        ty: &TypeGenerationIntention,
        target: &mut T,
    ) -> Result<(), WriterError> {
        let mut inherited: Vec<String> = ty.superclass_name().map(str::to_string).into_iter().collect();
        for conformance in ty.protocols() {
            let conformance = collection.protocol_conformance(*conformance)?;
            inherited.push(conformance.protocol_name.clone());
        }
        let keyword = match &ty.kind {
            TypeIntentionKind::Class { .. } => "class",
            TypeIntentionKind::Extension { category_name } => {
                if let Some(category) = category_name {
                    target.output_line(&format!("// MARK: - {}", category));
                }
                "extension"
            }
            TypeIntentionKind::Protocol => "protocol",
        };
        let mut opening = format!("{}{} {}", access_prefix(&ty.header), keyword, ty.type_name);
        if !inherited.is_empty() {
            opening.push_str(": ");
            opening.push_str(&inherited.join(", "));
        }
        opening.push_str(" {");
        target.output_line(&opening);

        if ty.is_protocol() {
            indented(target, |target| write_protocol_members(collection, ty, target))?;
        } else {
            indented(target, |target| write_type_members(collection, ty, target))?;
        }
        target.output_line("}");
        trace!(%id, "wrote type");
        Ok(())
    }
}

fn write_protocol_members<T: OutputTarget + ?Sized>(
    collection: &IntentionCollection,
    ty: &TypeGenerationIntention,
    target: &mut T,
) -> Result<(), WriterError> {
    for id in ty.properties() {
        let property = collection.property(*id)?;
        let accessors = if property.is_readonly() {
            "{ get }"
        } else {
            "{ get set }"
        };
        target.output_line(&format!(
            "{}var {}: {} {}",
            static_prefix(property.is_static),
            property.name,
            property.storage.ty,
            accessors
        ));
    }
    for id in ty.methods() {
        let method = collection.method(*id)?;
        target.output_line(&method.signature.to_string());
    }
    Ok(())
}

fn write_type_members<T: OutputTarget + ?Sized>(
    collection: &IntentionCollection,
    ty: &TypeGenerationIntention,
    target: &mut T,
) -> Result<(), WriterError> {
    let mut spacer = Spacer::default();

    if !ty.instance_variables().is_empty() {
        spacer.before(target);
        for id in ty.instance_variables() {
            let ivar = collection.instance_variable(*id)?;
            let line = storage_declaration(&ivar.header, false, &ivar.name, &ivar.storage);
            target.output_line(&line);
        }
    }

    if !ty.properties().is_empty() {
        spacer.before(target);
        for id in ty.properties() {
            write_property(collection.property(*id)?, target);
        }
    }

    let mut methods = ty
        .methods()
        .iter()
        .map(|id| collection.method(*id))
        .collect::<Result<Vec<_>, _>>()?;
    methods.sort_by_key(|method| !method.signature.is_initializer());
    let empty = FunctionBody::empty();
    for method in methods {
        spacer.before(target);
        write_function(
            &access_prefix(&method.header),
            &method.signature,
            Some(method.body.as_ref().unwrap_or(&empty)),
            target,
        );
    }
    Ok(())
}

fn write_property<T: OutputTarget + ?Sized>(property: &PropertyGenerationIntention, target: &mut T) {
    let declaration = storage_declaration(
        &property.header,
        property.is_static,
        &property.name,
        &property.storage,
    );
    match &property.mode {
        PropertyMode::Field => target.output_line(&declaration),
        PropertyMode::Computed {
            getter,
            setter: None,
        } => {
            target.output_line(&format!("{} {{", declaration));
            indented(target, |target| write_compound(&getter.body, target));
            target.output_line("}");
        }
        PropertyMode::Computed {
            getter,
            setter: Some(setter),
        }
        | PropertyMode::Property { getter, setter } => {
            target.output_line(&format!("{} {{", declaration));
            indented(target, |target| write_accessors(getter, setter, target));
            target.output_line("}");
        }
    }
}

fn write_accessors<T: OutputTarget + ?Sized>(
    getter: &FunctionBody,
    setter: &PropertySetter,
    target: &mut T,
) {
    target.output_line("get {");
    indented(target, |target| write_compound(&getter.body, target));
    target.output_line("}");
    if setter.value_identifier == "newValue" {
        target.output_line("set {");
    } else {
        target.output_line(&format!("set({}) {{", setter.value_identifier));
    }
    indented(target, |target| write_compound(&setter.body.body, target));
    target.output_line("}");
}

fn write_function<T: OutputTarget + ?Sized>(
    prefix: &str,
    signature: &FunctionSignature,
    body: Option<&FunctionBody>,
    target: &mut T,
) {
    match body {
        Some(body) => {
            target.output_line(&format!("{}{} {{", prefix, signature));
            indented(target, |target| write_compound(&body.body, target));
            target.output_line("}");
        }
        None => target.output_line(&format!("{}{}", prefix, signature)),
    }
}

fn access_prefix(header: &IntentionHeader) -> String {
    match header.access_level {
        AccessLevel::Internal => String::new(),
        level => format!("{} ", level),
    }
}

fn static_prefix(is_static: bool) -> &'static str {
    if is_static {
        "static "
    } else {
        ""
    }
}

fn ownership_prefix(ownership: Ownership) -> &'static str {
    match ownership {
        Ownership::Strong => "",
        Ownership::Weak => "weak ",
        Ownership::Unowned => "unowned ",
        Ownership::UnownedUnsafe => "unowned(unsafe) ",
    }
}

/// `[access] [static] [ownership] var|let name: Type`
fn storage_declaration(
    header: &IntentionHeader,
    is_static: bool,
    name: &str,
    storage: &ValueStorage,
) -> String {
    format!(
        "{}{}{}{} {}: {}",
        access_prefix(header),
        static_prefix(is_static),
        ownership_prefix(storage.ownership),
        if storage.is_constant { "let" } else { "var" },
        name,
        storage.ty
    )
}

/// Prints `body` one statement per line; nested bodies are indented.
pub fn write_compound<T: OutputTarget + ?Sized>(body: &CompoundStatement, target: &mut T) {
    for statement in &body.statements {
        write_statement(statement, target);
    }
}

fn write_braced<T: OutputTarget + ?Sized>(opening: &str, body: &CompoundStatement, target: &mut T) {
    target.output_line(&format!("{} {{", opening));
    indented(target, |target| write_compound(body, target));
}

pub fn write_statement<T: OutputTarget + ?Sized>(statement: &Statement, target: &mut T) {
    match statement {
        Statement::Compound(body) => {
            write_braced("do", body, target);
            target.output_line("}");
        }
        Statement::If {
            condition,
            body,
            else_body,
        } => write_if("if", condition, body, else_body.as_ref(), target),
        Statement::While { condition, body } => {
            write_braced(&format!("while {}", condition), body, target);
            target.output_line("}");
        }
        Statement::DoWhile { body, condition } => {
            write_braced("repeat", body, target);
            target.output_line(&format!("}} while {}", condition));
        }
        Statement::ForIn {
            binding,
            sequence,
            body,
        } => {
            write_braced(&format!("for {} in {}", binding, sequence), body, target);
            target.output_line("}");
        }
        Statement::Expressions(expressions) => {
            for expression in expressions {
                target.output_line(&expression.to_string());
            }
        }
        Statement::VariableDeclarations(declarations) => {
            for declaration in declarations {
                target.output_line(&declaration.to_string());
            }
        }
        Statement::Unknown(source) => {
            for line in source.text.lines() {
                target.output_line(&format!("// {}", line));
            }
        }
        Statement::Return(_) | Statement::Break | Statement::Continue => {
            target.output_line(&statement.to_string());
        }
    }
}

/// `else { if ... }` with nothing else in the branch prints as `else if`.
fn write_if<T: OutputTarget + ?Sized>(
    keyword: &str,
    condition: &Expression,
    body: &CompoundStatement,
    else_body: Option<&CompoundStatement>,
    target: &mut T,
) {
    write_braced(&format!("{} {}", keyword, condition), body, target);
    let Some(else_body) = else_body else {
        target.output_line("}");
        return;
    };
    match else_body.statements.as_slice() {
        [Statement::If {
            condition,
            body,
            else_body,
        }] => write_if("} else if", condition, body, else_body.as_ref(), target),
        _ => {
            write_braced("} else", else_body, target);
            target.output_line("}");
        }
    }
}
