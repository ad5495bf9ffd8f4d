// o2s_ast/statement - Statement nodes for method, function and block bodies
use crate::expression::Expression;
use crate::span::SourceText;
use crate::swift_type::SwiftType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    Compound(CompoundStatement),
    If {
        condition: Expression,
        body: CompoundStatement,
        else_body: Option<CompoundStatement>,
    },
    While {
        condition: Expression,
        body: CompoundStatement,
    },
    DoWhile {
        body: CompoundStatement,
        condition: Expression,
    },
    ForIn {
        binding: String,
        sequence: Expression,
        body: CompoundStatement,
    },
    Return(Option<Expression>),
    Expressions(Vec<Expression>),
    VariableDeclarations(Vec<VariableDeclaration>),
    Break,
    Continue,
    /// Source that could not be lowered.
    Unknown(SourceText),
}

/// Ordered statement list; also the body type of functions and blocks.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CompoundStatement {
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDeclaration {
    pub name: String,
    pub ty: SwiftType,
    pub initialization: Option<Expression>,
    pub is_constant: bool,
}

impl CompoundStatement {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }
}

impl From<Vec<Statement>> for CompoundStatement {
    fn from(statements: Vec<Statement>) -> Self {
        CompoundStatement::new(statements)
    }
}

impl Statement {
    pub fn expression(expression: Expression) -> Self {
        Statement::Expressions(vec![expression])
    }

    pub fn variable(
        name: impl Into<String>,
        ty: SwiftType,
        initialization: Option<Expression>,
        is_constant: bool,
    ) -> Self {
        Statement::VariableDeclarations(vec![VariableDeclaration {
            name: name.into(),
            ty,
            initialization,
            is_constant,
        }])
    }

    pub fn if_statement(
        condition: Expression,
        body: CompoundStatement,
        else_body: Option<CompoundStatement>,
    ) -> Self {
        Statement::If {
            condition,
            body,
            else_body,
        }
    }

    /// Expressions owned directly by this statement, excluding nested
    /// statement bodies.
    pub fn expressions(&self) -> Vec<&Expression> {
        match self {
            Statement::If { condition, .. }
            | Statement::While { condition, .. }
            | Statement::DoWhile { condition, .. } => vec![condition],
            Statement::ForIn { sequence, .. } => vec![sequence],
            Statement::Return(value) => value.iter().collect(),
            Statement::Expressions(expressions) => expressions.iter().collect(),
            Statement::VariableDeclarations(declarations) => declarations
                .iter()
                .filter_map(|declaration| declaration.initialization.as_ref())
                .collect(),
            Statement::Compound(_) | Statement::Break | Statement::Continue | Statement::Unknown(_) => {
                Vec::new()
            }
        }
    }

    /// Nested statement bodies in source order.
    pub fn bodies(&self) -> Vec<&CompoundStatement> {
        match self {
            Statement::Compound(body)
            | Statement::While { body, .. }
            | Statement::DoWhile { body, .. }
            | Statement::ForIn { body, .. } => vec![body],
            Statement::If {
                body, else_body, ..
            } => {
                let mut bodies = vec![body];
                bodies.extend(else_body.iter());
                bodies
            }
            _ => Vec::new(),
        }
    }
}
