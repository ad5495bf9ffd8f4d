// o2s_ast/expression - Expression tree with type-annotation slots
use crate::operators::SwiftOperator;
use crate::span::SourceText;
use crate::statement::CompoundStatement;
use crate::swift_type::SwiftType;
use serde::{Deserialize, Serialize};

/// A Swift expression.
///
/// Besides its shape, every node carries two slots filled in by the type
/// resolver and an optional reference to the Objective-C text it came from.
/// Equality compares shape only; see the `PartialEq` impl.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expression {
    pub kind: ExpressionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_type: Option<SwiftType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_type: Option<SwiftType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceText>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExpressionKind {
    Identifier(String),
    Constant(Constant),
    Unary {
        op: SwiftOperator,
        operand: Box<Expression>,
    },
    Binary {
        lhs: Box<Expression>,
        op: SwiftOperator,
        rhs: Box<Expression>,
    },
    Ternary {
        condition: Box<Expression>,
        if_true: Box<Expression>,
        if_false: Box<Expression>,
    },
    Assignment {
        lhs: Box<Expression>,
        op: SwiftOperator,
        rhs: Box<Expression>,
    },
    Postfix {
        receiver: Box<Expression>,
        op: Postfix,
        #[serde(default)]
        optional_access: OptionalAccess,
    },
    Cast {
        expression: Box<Expression>,
        target: SwiftType,
    },
    SizeOf(SizeOfTarget),
    Parens(Box<Expression>),
    ArrayLiteral(Vec<Expression>),
    DictionaryLiteral(Vec<DictionaryPair>),
    Block {
        parameters: Vec<BlockParameter>,
        return_type: SwiftType,
        body: CompoundStatement,
    },
    /// Source that could not be lowered.
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Constant {
    Int(i64),
    Binary(i64),
    Octal(i64),
    Hexadecimal(i64),
    Float(f64),
    Boolean(bool),
    String(String),
    Nil,
    /// Literal text kept verbatim.
    Raw(String),
}

impl Constant {
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            Constant::Int(_) | Constant::Binary(_) | Constant::Octal(_) | Constant::Hexadecimal(_)
        )
    }

    pub fn integer_value(&self) -> Option<i64> {
        match self {
            Constant::Int(value)
            | Constant::Binary(value)
            | Constant::Octal(value)
            | Constant::Hexadecimal(value) => Some(*value),
            _ => None,
        }
    }
}

/// Unwrapping applied to a postfix receiver (`a?.b`, `a!.b`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OptionalAccess {
    #[default]
    None,
    SafeUnwrap,
    ForceUnwrap,
}

/// Operation applied by a postfix expression to its receiver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Postfix {
    Member(String),
    FunctionCall(Vec<FunctionArgument>),
    Subscript(Box<Expression>),
}

impl Postfix {
    pub fn as_member(&self) -> Option<&str> {
        match self {
            Postfix::Member(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_function_call(&self) -> Option<&[FunctionArgument]> {
        match self {
            Postfix::FunctionCall(arguments) => Some(arguments),
            _ => None,
        }
    }

    pub fn as_subscript(&self) -> Option<&Expression> {
        match self {
            Postfix::Subscript(index) => Some(index),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionArgument {
    pub label: Option<String>,
    pub expression: Expression,
}

impl FunctionArgument {
    pub fn unlabeled(expression: Expression) -> Self {
        Self {
            label: None,
            expression,
        }
    }

    pub fn labeled(label: impl Into<String>, expression: Expression) -> Self {
        Self {
            label: Some(label.into()),
            expression,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SizeOfTarget {
    Expression(Box<Expression>),
    Type(SwiftType),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictionaryPair {
    pub key: Expression,
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockParameter {
    pub name: String,
    pub ty: SwiftType,
}

impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl From<ExpressionKind> for Expression {
    fn from(kind: ExpressionKind) -> Self {
        Expression::new(kind)
    }
}

impl Expression {
    pub fn new(kind: ExpressionKind) -> Self {
        Self {
            kind,
            resolved_type: None,
            expected_type: None,
            source: None,
        }
    }

    pub fn with_source(mut self, source: SourceText) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_resolved_type(mut self, ty: SwiftType) -> Self {
        self.resolved_type = Some(ty);
        self
    }

    pub fn identifier(name: impl Into<String>) -> Self {
        Expression::new(ExpressionKind::Identifier(name.into()))
    }

    pub fn constant(constant: Constant) -> Self {
        Expression::new(ExpressionKind::Constant(constant))
    }

    pub fn int(value: i64) -> Self {
        Expression::constant(Constant::Int(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expression::constant(Constant::String(value.into()))
    }

    pub fn boolean(value: bool) -> Self {
        Expression::constant(Constant::Boolean(value))
    }

    pub fn nil() -> Self {
        Expression::constant(Constant::Nil)
    }

    pub fn unary(op: SwiftOperator, operand: Expression) -> Self {
        Expression::new(ExpressionKind::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    pub fn binary(lhs: Expression, op: SwiftOperator, rhs: Expression) -> Self {
        Expression::new(ExpressionKind::Binary {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
        })
    }

    pub fn ternary(condition: Expression, if_true: Expression, if_false: Expression) -> Self {
        Expression::new(ExpressionKind::Ternary {
            condition: Box::new(condition),
            if_true: Box::new(if_true),
            if_false: Box::new(if_false),
        })
    }

    pub fn assignment(lhs: Expression, op: SwiftOperator, rhs: Expression) -> Self {
        Expression::new(ExpressionKind::Assignment {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
        })
    }

    pub fn postfix(receiver: Expression, op: Postfix) -> Self {
        Expression::new(ExpressionKind::Postfix {
            receiver: Box::new(receiver),
            op,
            optional_access: OptionalAccess::None,
        })
    }

    /// Sets the unwrapping of a postfix receiver; no-op for other variants.
    pub fn with_optional_access(mut self, access: OptionalAccess) -> Self {
        if let ExpressionKind::Postfix {
            optional_access, ..
        } = &mut self.kind
        {
            *optional_access = access;
        }
        self
    }

    pub fn cast(expression: Expression, target: SwiftType) -> Self {
        Expression::new(ExpressionKind::Cast {
            expression: Box::new(expression),
            target,
        })
    }

    pub fn size_of(target: SizeOfTarget) -> Self {
        Expression::new(ExpressionKind::SizeOf(target))
    }

    pub fn parens(inner: Expression) -> Self {
        Expression::new(ExpressionKind::Parens(Box::new(inner)))
    }

    pub fn array_literal(elements: Vec<Expression>) -> Self {
        Expression::new(ExpressionKind::ArrayLiteral(elements))
    }

    pub fn dictionary_literal(pairs: Vec<DictionaryPair>) -> Self {
        Expression::new(ExpressionKind::DictionaryLiteral(pairs))
    }

    pub fn block(
        parameters: Vec<BlockParameter>,
        return_type: SwiftType,
        body: CompoundStatement,
    ) -> Self {
        Expression::new(ExpressionKind::Block {
            parameters,
            return_type,
            body,
        })
    }

    pub fn unknown(text: impl Into<String>) -> Self {
        Expression::new(ExpressionKind::Unknown(text.into()))
    }

    /// `self.member`
    pub fn dot(self, member: impl Into<String>) -> Self {
        Expression::postfix(self, Postfix::Member(member.into()))
    }

    /// `self(arguments...)`
    pub fn call(self, arguments: Vec<FunctionArgument>) -> Self {
        Expression::postfix(self, Postfix::FunctionCall(arguments))
    }

    /// `self[index]`
    pub fn sub(self, index: Expression) -> Self {
        Expression::postfix(self, Postfix::Subscript(Box::new(index)))
    }

    pub fn as_identifier(&self) -> Option<&str> {
        match &self.kind {
            ExpressionKind::Identifier(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_constant(&self) -> Option<&Constant> {
        match &self.kind {
            ExpressionKind::Constant(constant) => Some(constant),
            _ => None,
        }
    }

    /// Receiver and operation of a postfix expression.
    pub fn as_postfix(&self) -> Option<(&Expression, &Postfix)> {
        match &self.kind {
            ExpressionKind::Postfix { receiver, op, .. } => Some((receiver, op)),
            _ => None,
        }
    }

    pub fn as_block(&self) -> Option<(&[BlockParameter], &SwiftType, &CompoundStatement)> {
        match &self.kind {
            ExpressionKind::Block {
                parameters,
                return_type,
                body,
            } => Some((parameters, return_type, body)),
            _ => None,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self.kind, ExpressionKind::Constant(Constant::Nil))
    }

    pub fn is_postfix(&self) -> bool {
        matches!(self.kind, ExpressionKind::Postfix { .. })
    }

    pub fn is_block(&self) -> bool {
        matches!(self.kind, ExpressionKind::Block { .. })
    }

    /// Strips any number of surrounding parentheses.
    pub fn unwrapping_parens(&self) -> &Expression {
        let mut current = self;
        while let ExpressionKind::Parens(inner) = &current.kind {
            current = inner;
        }
        current
    }

    /// Direct sub-expressions in evaluation order. Block bodies are statements
    /// and are not included here.
    pub fn sub_expressions(&self) -> Vec<&Expression> {
        match &self.kind {
            ExpressionKind::Identifier(_)
            | ExpressionKind::Constant(_)
            | ExpressionKind::Unknown(_)
            | ExpressionKind::Block { .. } => Vec::new(),
            ExpressionKind::SizeOf(SizeOfTarget::Type(_)) => Vec::new(),
            ExpressionKind::SizeOf(SizeOfTarget::Expression(inner))
            | ExpressionKind::Parens(inner)
            | ExpressionKind::Unary { operand: inner, .. }
            | ExpressionKind::Cast {
                expression: inner, ..
            } => vec![inner.as_ref()],
            ExpressionKind::Binary { lhs, rhs, .. }
            | ExpressionKind::Assignment { lhs, rhs, .. } => vec![lhs.as_ref(), rhs.as_ref()],
            ExpressionKind::Ternary {
                condition,
                if_true,
                if_false,
            } => vec![condition.as_ref(), if_true.as_ref(), if_false.as_ref()],
            ExpressionKind::Postfix { receiver, op, .. } => {
                let mut children = vec![receiver.as_ref()];
                match op {
                    Postfix::Member(_) => {}
                    Postfix::FunctionCall(arguments) => {
                        children.extend(arguments.iter().map(|argument| &argument.expression))
                    }
                    Postfix::Subscript(index) => children.push(index.as_ref()),
                }
                children
            }
            ExpressionKind::ArrayLiteral(elements) => elements.iter().collect(),
            ExpressionKind::DictionaryLiteral(pairs) => pairs
                .iter()
                .flat_map(|pair| [&pair.key, &pair.value])
                .collect(),
        }
    }

    /// Mutable counterpart of [`Expression::sub_expressions`].
    pub fn sub_expressions_mut(&mut self) -> Vec<&mut Expression> {
        match &mut self.kind {
            ExpressionKind::Identifier(_)
            | ExpressionKind::Constant(_)
            | ExpressionKind::Unknown(_)
            | ExpressionKind::Block { .. } => Vec::new(),
            ExpressionKind::SizeOf(SizeOfTarget::Type(_)) => Vec::new(),
            ExpressionKind::SizeOf(SizeOfTarget::Expression(inner))
            | ExpressionKind::Parens(inner)
            | ExpressionKind::Unary { operand: inner, .. }
            | ExpressionKind::Cast {
                expression: inner, ..
            } => vec![inner.as_mut()],
            ExpressionKind::Binary { lhs, rhs, .. }
            | ExpressionKind::Assignment { lhs, rhs, .. } => vec![lhs.as_mut(), rhs.as_mut()],
            ExpressionKind::Ternary {
                condition,
                if_true,
                if_false,
            } => vec![condition.as_mut(), if_true.as_mut(), if_false.as_mut()],
            ExpressionKind::Postfix { receiver, op, .. } => {
                let mut children = vec![receiver.as_mut()];
                match op {
                    Postfix::Member(_) => {}
                    Postfix::FunctionCall(arguments) => children
                        .extend(arguments.iter_mut().map(|argument| &mut argument.expression)),
                    Postfix::Subscript(index) => children.push(index.as_mut()),
                }
                children
            }
            ExpressionKind::ArrayLiteral(elements) => elements.iter_mut().collect(),
            ExpressionKind::DictionaryLiteral(pairs) => pairs
                .iter_mut()
                .flat_map(|pair| [&mut pair.key, &mut pair.value])
                .collect(),
        }
    }
}
