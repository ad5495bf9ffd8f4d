// o2s_typesystem/resolver - Expression type resolution
//! Annotates expressions with resolved and expected types.
//!
//! Resolution is best effort: anything that cannot be resolved gets the
//! unknown sentinel ([`SwiftType::unknown`]) and the walk continues. Postfix
//! chains resolve receiver first, so a failed step only poisons the steps to
//! its right, which resolve against the unknown type without raising.

use crate::type_system::{KnownMember, TypeSystem};
use o2s_ast::{
    CompoundStatement, Constant, Expression, ExpressionKind, FunctionArgument, OperatorCategory,
    OptionalAccess, Postfix, SizeOfTarget, Statement, SwiftOperator, SwiftType,
};
use o2s_intentions::{FunctionSignature, ParameterSignature};
use std::collections::HashMap;
use tracing::trace;

/// Lexical facts about the body being resolved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolutionContext {
    /// Type `self` refers to; `None` outside of types.
    pub self_type: Option<SwiftType>,
    pub superclass: Option<SwiftType>,
    pub is_static: bool,
    pub parameters: Vec<(String, SwiftType)>,
    /// Expected type of `return` expressions.
    pub return_type: Option<SwiftType>,
}

impl ResolutionContext {
    pub fn global() -> Self {
        Self::default()
    }

    pub fn in_type(type_name: impl Into<String>) -> Self {
        Self {
            self_type: Some(SwiftType::named(type_name)),
            ..Self::default()
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, ty: SwiftType) -> Self {
        self.parameters.push((name.into(), ty));
        self
    }

    pub fn with_return_type(mut self, ty: SwiftType) -> Self {
        self.return_type = Some(ty);
        self
    }
}

pub struct ExpressionTypeResolver<'a> {
    type_system: &'a dyn TypeSystem,
    context: ResolutionContext,
    scopes: Vec<HashMap<String, SwiftType>>,
}

impl<'a> ExpressionTypeResolver<'a> {
    pub fn new(type_system: &'a dyn TypeSystem, context: ResolutionContext) -> Self {
        let parameters = context.parameters.iter().cloned().collect();
        Self {
            type_system,
            context,
            scopes: vec![parameters],
        }
    }

    /// Runs `body` inside a fresh local scope.
    fn with_scope<R>(&mut self, body: impl FnOnce(&mut Self) -> R) -> R {
        self.scopes.push(HashMap::new());
        let result = body(self);
        self.scopes.pop();
        result
    }

    fn define(&mut self, name: &str, ty: SwiftType) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), ty);
        }
    }

    fn lookup_local(&self, name: &str) -> Option<&SwiftType> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    pub fn resolve_compound(&mut self, body: &mut CompoundStatement) {
        self.with_scope(|resolver| {
            for statement in &mut body.statements {
                resolver.resolve_statement(statement);
            }
        });
    }

    pub fn resolve_statement(&mut self, statement: &mut Statement) {
        match statement {
            Statement::Compound(body) => self.resolve_compound(body),
            Statement::If {
                condition,
                body,
                else_body,
            } => {
                self.resolve_condition(condition);
                self.resolve_compound(body);
                if let Some(else_body) = else_body {
                    self.resolve_compound(else_body);
                }
            }
            Statement::While { condition, body } | Statement::DoWhile { body, condition } => {
                self.resolve_condition(condition);
                self.resolve_compound(body);
            }
            Statement::ForIn {
                binding,
                sequence,
                body,
            } => {
                let sequence_type = self.resolve_expression(sequence);
                let element = element_type(&sequence_type);
                self.with_scope(|resolver| {
                    resolver.define(binding, element);
                    resolver.resolve_compound(body);
                });
            }
            Statement::Return(value) => {
                if let Some(value) = value {
                    value.expected_type = self.context.return_type.clone();
                    self.resolve_expression(value);
                }
            }
            Statement::Expressions(expressions) => {
                for expression in expressions {
                    self.resolve_expression(expression);
                }
            }
            Statement::VariableDeclarations(declarations) => {
                for declaration in declarations {
                    let mut declared = declaration.ty.clone();
                    if let Some(initialization) = &mut declaration.initialization {
                        if !declared.is_unknown() {
                            initialization.expected_type = Some(declared.clone());
                        }
                        let initial = self.resolve_expression(initialization);
                        if declared.is_unknown() {
                            declared = initial;
                        }
                    }
                    self.define(&declaration.name, declared);
                }
            }
            Statement::Break | Statement::Continue | Statement::Unknown(_) => {}
        }
    }

    fn resolve_condition(&mut self, condition: &mut Expression) {
        condition.expected_type = Some(SwiftType::bool());
        self.resolve_expression(condition);
    }

    /// Resolves `expression` and its sub-expressions, returning the type
    /// stored in its resolved slot.
    pub fn resolve_expression(&mut self, expression: &mut Expression) -> SwiftType {
        let expected = expression.expected_type.clone();
        let resolved = match &mut expression.kind {
            ExpressionKind::Identifier(name) => self.resolve_identifier(name),
            ExpressionKind::Constant(constant) => constant_type(constant, expected.as_ref()),
            ExpressionKind::Unary { op, operand } => self.resolve_unary(*op, operand),
            ExpressionKind::Binary { lhs, op, rhs } => self.resolve_binary(lhs, *op, rhs),
            ExpressionKind::Ternary {
                condition,
                if_true,
                if_false,
            } => {
                self.resolve_condition(condition);
                if_true.expected_type = expected.clone();
                if_false.expected_type = expected.clone();
                let true_type = self.resolve_expression(if_true);
                let false_type = self.resolve_expression(if_false);
                unify_branches(true_type, false_type, if_true.is_nil(), if_false.is_nil())
            }
            ExpressionKind::Assignment { lhs, rhs, .. } => {
                let target = self.resolve_expression(lhs);
                if !target.is_unknown() {
                    rhs.expected_type = Some(target);
                }
                self.resolve_expression(rhs);
                SwiftType::void()
            }
            ExpressionKind::Postfix {
                receiver,
                op,
                optional_access,
            } => self.resolve_postfix(receiver, op, *optional_access),
            ExpressionKind::Cast {
                expression: inner,
                target,
            } => {
                self.resolve_expression(inner);
                SwiftType::optional(target.clone())
            }
            ExpressionKind::SizeOf(target) => {
                if let SizeOfTarget::Expression(inner) = target {
                    self.resolve_expression(inner);
                }
                SwiftType::int()
            }
            ExpressionKind::Parens(inner) => {
                inner.expected_type = expected.clone();
                self.resolve_expression(inner)
            }
            ExpressionKind::ArrayLiteral(elements) => {
                let expected_element = expected
                    .as_ref()
                    .and_then(|ty| ty.deep_unwrapped().array_element().cloned());
                let types: Vec<SwiftType> = elements
                    .iter_mut()
                    .map(|element| {
                        element.expected_type = expected_element.clone();
                        self.resolve_expression(element)
                    })
                    .collect();
                SwiftType::array(
                    common_type(&types)
                        .or(expected_element)
                        .unwrap_or_else(SwiftType::any),
                )
            }
            ExpressionKind::DictionaryLiteral(pairs) => {
                let mut keys = Vec::with_capacity(pairs.len());
                let mut values = Vec::with_capacity(pairs.len());
                for pair in pairs.iter_mut() {
                    keys.push(self.resolve_expression(&mut pair.key));
                    values.push(self.resolve_expression(&mut pair.value));
                }
                let expected_pair = expected
                    .as_ref()
                    .and_then(|ty| ty.deep_unwrapped().dictionary_types())
                    .map(|(key, value)| (key.clone(), value.clone()));
                match (common_type(&keys), common_type(&values), expected_pair) {
                    (Some(key), Some(value), _) => SwiftType::dictionary(key, value),
                    (_, _, Some((key, value))) => SwiftType::dictionary(key, value),
                    _ => SwiftType::dictionary(SwiftType::named("AnyHashable"), SwiftType::any()),
                }
            }
            ExpressionKind::Block {
                parameters,
                return_type,
                body,
            } => {
                let block_type = SwiftType::block(
                    return_type.clone(),
                    parameters.iter().map(|parameter| parameter.ty.clone()).collect(),
                );
                let outer_return = self.context.return_type.replace(return_type.clone());
                self.with_scope(|resolver| {
                    for parameter in parameters.iter() {
                        resolver.define(&parameter.name, parameter.ty.clone());
                    }
                    resolver.resolve_compound(body);
                });
                self.context.return_type = outer_return;
                block_type
            }
            ExpressionKind::Unknown(_) => SwiftType::unknown(),
        };
        expression.resolved_type = Some(resolved.clone());
        resolved
    }

    fn resolve_identifier(&self, name: &str) -> SwiftType {
        if let Some(local) = self.lookup_local(name) {
            return local.clone();
        }
        match name {
            "self" => {
                if let Some(self_type) = &self.context.self_type {
                    return if self.context.is_static {
                        SwiftType::metatype(self_type.clone())
                    } else {
                        self_type.clone()
                    };
                }
            }
            "super" => {
                if let Some(superclass) = &self.context.superclass {
                    return superclass.clone();
                }
            }
            _ => {}
        }
        if let Some(self_type) = &self.context.self_type {
            if let Some(member) =
                self.type_system
                    .lookup_member(self_type, name, self.context.is_static)
            {
                return member.member_type();
            }
        }
        if let Some(global) = self.type_system.lookup_global(name) {
            return global.global_type();
        }
        if self.type_system.lookup_type(name).is_some() {
            return SwiftType::metatype(SwiftType::named(name));
        }
        trace!(identifier = name, "unresolved identifier");
        SwiftType::unknown()
    }

    fn resolve_unary(&mut self, op: SwiftOperator, operand: &mut Expression) -> SwiftType {
        if op == SwiftOperator::Negate {
            operand.expected_type = Some(SwiftType::bool());
            self.resolve_expression(operand);
            return SwiftType::bool();
        }
        let operand_type = self.resolve_expression(operand);
        match op {
            SwiftOperator::Add | SwiftOperator::Subtract | SwiftOperator::BitwiseNot
                if is_numeric(&operand_type) =>
            {
                without_iuo(&operand_type).clone()
            }
            _ => SwiftType::unknown(),
        }
    }

    fn resolve_binary(
        &mut self,
        lhs: &mut Expression,
        op: SwiftOperator,
        rhs: &mut Expression,
    ) -> SwiftType {
        if op.category() == OperatorCategory::Logical {
            lhs.expected_type = Some(SwiftType::bool());
            rhs.expected_type = Some(SwiftType::bool());
        }
        // `nil` takes the type of the operand it is compared against.
        let (lhs_type, rhs_type) = if lhs.is_nil() {
            let rhs_type = self.resolve_expression(rhs);
            lhs.expected_type = Some(rhs_type.clone());
            (self.resolve_expression(lhs), rhs_type)
        } else {
            let lhs_type = self.resolve_expression(lhs);
            if rhs.is_nil() {
                rhs.expected_type = Some(lhs_type.clone());
            } else if op == SwiftOperator::NullCoalesce && !lhs_type.is_unknown() {
                rhs.expected_type = Some(lhs_type.deep_unwrapped().clone());
            }
            let rhs_type = self.resolve_expression(rhs);
            (lhs_type, rhs_type)
        };

        match op.category() {
            OperatorCategory::Comparison | OperatorCategory::Logical => SwiftType::bool(),
            OperatorCategory::Arithmetic => arithmetic_type(op, &lhs_type, &rhs_type),
            OperatorCategory::Bitwise => {
                let lhs_base = without_iuo(&lhs_type);
                if is_integer(lhs_base) && lhs_base == without_iuo(&rhs_type) {
                    lhs_base.clone()
                } else if is_integer(lhs_base)
                    && matches!(op, SwiftOperator::ShiftLeft | SwiftOperator::ShiftRight)
                {
                    lhs_base.clone()
                } else {
                    SwiftType::unknown()
                }
            }
            OperatorCategory::NullCoalesce => {
                if lhs_type.is_unknown() || rhs_type.is_unknown() {
                    SwiftType::unknown()
                } else if lhs_type.deep_unwrapped() == rhs_type.deep_unwrapped() {
                    lhs_type.with_same_optionality_as(&rhs_type)
                } else {
                    SwiftType::unknown()
                }
            }
            OperatorCategory::Range => {
                let bound = without_iuo(&lhs_type);
                if bound.is_unknown() {
                    SwiftType::unknown()
                } else {
                    let name = if op == SwiftOperator::ClosedRange {
                        "ClosedRange"
                    } else {
                        "Range"
                    };
                    SwiftType::generic(name, vec![bound.clone()])
                }
            }
            OperatorCategory::Assignment => SwiftType::unknown(),
        }
    }

    fn resolve_postfix(
        &mut self,
        receiver: &mut Expression,
        op: &mut Postfix,
        access: OptionalAccess,
    ) -> SwiftType {
        // Method calls resolve the member together with the call so the
        // argument labels can pick the overload.
        if let Postfix::FunctionCall(arguments) = op {
            if let ExpressionKind::Postfix {
                receiver: target,
                op: Postfix::Member(member),
                optional_access: member_access,
            } = &mut receiver.kind
            {
                let target_type = self.resolve_expression(target);
                let (base, propagate) = unwrap_receiver(&target_type, *member_access);
                let candidates = self
                    .type_system
                    .lookup_members(&base, member, false)
                    .into_iter()
                    .chain(self.type_system.lookup_members(&base, member, true))
                    .collect::<Vec<_>>();
                let (callee, result) = match select_overload(&candidates, arguments) {
                    Some(signature) => {
                        self.resolve_arguments(arguments, Some(&signature));
                        (signature.swift_closure_type(), Some(signature.return_type))
                    }
                    None => {
                        self.resolve_arguments(arguments, None);
                        let callee = candidates
                            .first()
                            .map(KnownMember::member_type)
                            .unwrap_or_else(SwiftType::unknown);
                        (callee, None)
                    }
                };
                let callee = rewrap(callee, propagate);
                let (callee_base, propagate_call) = unwrap_receiver(&callee, access);
                let result = result.unwrap_or_else(|| call_result(&callee_base));
                receiver.resolved_type = Some(callee);
                return rewrap(result, propagate || propagate_call);
            }
        }

        let receiver_type = self.resolve_expression(receiver);
        let (base, propagate) = unwrap_receiver(&receiver_type, access);
        let result = match op {
            Postfix::Member(member) => {
                let is_static = base.is_metatype();
                match self.type_system.lookup_member(&base, member, is_static) {
                    Some(found) => found.member_type(),
                    None => {
                        trace!(member = member.as_str(), receiver = %base, "unresolved member");
                        SwiftType::unknown()
                    }
                }
            }
            Postfix::FunctionCall(arguments) => match &base {
                SwiftType::Metatype(instance) => {
                    let initializers = self.type_system.lookup_members(&base, "init", true);
                    let signature = select_overload(&initializers, arguments);
                    self.resolve_arguments(arguments, signature.as_ref());
                    (**instance).clone()
                }
                callee => {
                    let signature = block_signature(callee);
                    self.resolve_arguments(arguments, signature.as_ref());
                    call_result(callee)
                }
            },
            Postfix::Subscript(index) => {
                self.resolve_expression(index);
                self.type_system
                    .lookup_subscript(&base)
                    .unwrap_or_else(SwiftType::unknown)
            }
        };
        rewrap(result, propagate)
    }

    fn resolve_arguments(
        &mut self,
        arguments: &mut [FunctionArgument],
        signature: Option<&FunctionSignature>,
    ) {
        for (index, argument) in arguments.iter_mut().enumerate() {
            if let Some(parameter) = signature.and_then(|signature| signature.parameters.get(index)) {
                argument.expression.expected_type = Some(parameter.ty.clone());
            }
            self.resolve_expression(&mut argument.expression);
        }
    }
}

/// Strips the optional layer a postfix step looks through. Returns the base
/// type and whether the step's result must become optional.
fn unwrap_receiver(receiver: &SwiftType, access: OptionalAccess) -> (SwiftType, bool) {
    match (receiver, access) {
        (SwiftType::ImplicitlyUnwrappedOptional(inner), _) => ((**inner).clone(), false),
        (SwiftType::Optional(inner), OptionalAccess::ForceUnwrap) => ((**inner).clone(), false),
        (SwiftType::Optional(inner), _) => ((**inner).clone(), true),
        (other, _) => (other.clone(), false),
    }
}

fn rewrap(result: SwiftType, propagate: bool) -> SwiftType {
    if propagate && !result.is_unknown() && !matches!(result, SwiftType::Optional(_)) {
        SwiftType::optional(result.deep_unwrapped().clone())
    } else {
        result
    }
}

fn block_signature(callee: &SwiftType) -> Option<FunctionSignature> {
    callee.block_signature().map(|(return_type, parameters)| {
        FunctionSignature::new(
            "",
            parameters
                .iter()
                .enumerate()
                .map(|(index, ty)| {
                    ParameterSignature::unlabeled(format!("p{}", index), ty.clone())
                })
                .collect(),
            return_type.clone(),
            false,
        )
    })
}

fn call_result(callee: &SwiftType) -> SwiftType {
    match without_iuo(callee).block_signature() {
        Some((return_type, _)) => return_type.clone(),
        None => SwiftType::unknown(),
    }
}

/// First method among `candidates` whose labels accept the call's
/// arguments.
fn select_overload(
    candidates: &[KnownMember],
    arguments: &[FunctionArgument],
) -> Option<FunctionSignature> {
    let labels: Vec<Option<&str>> = arguments
        .iter()
        .map(|argument| argument.label.as_deref())
        .collect();
    candidates
        .iter()
        .filter_map(KnownMember::as_method)
        .find(|signature| signature.accepts_labels(&labels))
        .cloned()
}

fn constant_type(constant: &Constant, expected: Option<&SwiftType>) -> SwiftType {
    match constant {
        Constant::Int(_) | Constant::Binary(_) | Constant::Octal(_) | Constant::Hexadecimal(_) => {
            SwiftType::int()
        }
        Constant::Float(_) => SwiftType::float(),
        Constant::Boolean(_) => SwiftType::bool(),
        Constant::String(_) => SwiftType::string(),
        Constant::Nil => match expected {
            Some(expected) if expected.is_optional() => expected.clone(),
            _ => SwiftType::optional(SwiftType::any_object()),
        },
        Constant::Raw(_) => SwiftType::unknown(),
    }
}

fn without_iuo(ty: &SwiftType) -> &SwiftType {
    match ty {
        SwiftType::ImplicitlyUnwrappedOptional(inner) => inner,
        other => other,
    }
}

/// Widening rank of numeric types; wider types win in arithmetic.
fn numeric_rank(ty: &SwiftType) -> Option<u8> {
    let rank = match ty.type_name()? {
        "Int8" | "UInt8" | "CChar" => 1,
        "Int16" | "UInt16" => 2,
        "Int32" | "UInt32" => 3,
        "Int" | "UInt" | "Int64" | "UInt64" => 4,
        "Float" => 5,
        "CGFloat" => 6,
        "Double" | "TimeInterval" => 7,
        _ => return None,
    };
    Some(rank)
}

fn is_numeric(ty: &SwiftType) -> bool {
    numeric_rank(without_iuo(ty)).is_some()
}

fn is_integer(ty: &SwiftType) -> bool {
    numeric_rank(ty).is_some_and(|rank| rank <= 4)
}

fn arithmetic_type(op: SwiftOperator, lhs: &SwiftType, rhs: &SwiftType) -> SwiftType {
    let (lhs, rhs) = (without_iuo(lhs), without_iuo(rhs));
    match (numeric_rank(lhs), numeric_rank(rhs)) {
        (Some(left), Some(right)) if right > left => rhs.clone(),
        (Some(_), Some(_)) => lhs.clone(),
        _ if op == SwiftOperator::Add && lhs == rhs && *lhs == SwiftType::string() => lhs.clone(),
        _ => SwiftType::unknown(),
    }
}

fn unify_branches(
    true_type: SwiftType,
    false_type: SwiftType,
    true_is_nil: bool,
    false_is_nil: bool,
) -> SwiftType {
    if true_is_nil && !false_type.is_unknown() {
        return SwiftType::optional(false_type.deep_unwrapped().clone());
    }
    if false_is_nil && !true_type.is_unknown() {
        return SwiftType::optional(true_type.deep_unwrapped().clone());
    }
    if true_type == false_type {
        true_type
    } else {
        SwiftType::unknown()
    }
}

/// Shared type of all `types`, `None` for an empty or mixed list.
fn common_type(types: &[SwiftType]) -> Option<SwiftType> {
    let first = types.first()?;
    if first.is_unknown() || types.iter().any(|ty| ty != first) {
        return None;
    }
    Some(first.clone())
}

fn element_type(sequence: &SwiftType) -> SwiftType {
    let sequence = sequence.deep_unwrapped();
    if let Some(element) = sequence.array_element() {
        return element.clone();
    }
    if let Some((key, value)) = sequence.dictionary_types() {
        return SwiftType::tuple(vec![key.clone(), value.clone()]);
    }
    match sequence {
        SwiftType::Generic { name, parameters }
            if (name == "Set" || name == "Range" || name == "ClosedRange") && parameters.len() == 1 =>
        {
            parameters[0].clone()
        }
        _ => SwiftType::unknown(),
    }
}
