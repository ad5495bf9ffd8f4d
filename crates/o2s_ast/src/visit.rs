// o2s_ast/visit - Visitor traits and pre-order iteration over syntax trees
use crate::expression::{Expression, ExpressionKind};
use crate::statement::{CompoundStatement, Statement};

/// Returned by visitor hooks to control descent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitAction {
    Continue,
    SkipChildren,
}

/// Read-only visitor. `walk_*` drive the traversal and call `exit_*` after
/// a node's children, including when they were skipped.
pub trait SyntaxVisitor {
    fn visit_expression(&mut self, _expression: &Expression) -> VisitAction {
        VisitAction::Continue
    }

    fn exit_expression(&mut self, _expression: &Expression) {}

    fn visit_statement(&mut self, _statement: &Statement) -> VisitAction {
        VisitAction::Continue
    }

    fn exit_statement(&mut self, _statement: &Statement) {}
}

pub fn walk_expression<V: SyntaxVisitor + ?Sized>(visitor: &mut V, expression: &Expression) {
    if visitor.visit_expression(expression) == VisitAction::Continue {
        for child in expression.sub_expressions() {
            walk_expression(visitor, child);
        }
        if let ExpressionKind::Block { body, .. } = &expression.kind {
            walk_compound(visitor, body);
        }
    }
    visitor.exit_expression(expression);
}

pub fn walk_statement<V: SyntaxVisitor + ?Sized>(visitor: &mut V, statement: &Statement) {
    if visitor.visit_statement(statement) == VisitAction::Continue {
        for expression in statement.expressions() {
            walk_expression(visitor, expression);
        }
        for body in statement.bodies() {
            walk_compound(visitor, body);
        }
    }
    visitor.exit_statement(statement);
}

pub fn walk_compound<V: SyntaxVisitor + ?Sized>(visitor: &mut V, body: &CompoundStatement) {
    for statement in &body.statements {
        walk_statement(visitor, statement);
    }
}

/// Mutating visitor used by rewriters. `exit_*` runs after children so a
/// rewriter sees already-rewritten operands.
pub trait SyntaxVisitorMut {
    fn visit_expression_mut(&mut self, _expression: &mut Expression) -> VisitAction {
        VisitAction::Continue
    }

    fn exit_expression_mut(&mut self, _expression: &mut Expression) {}

    fn visit_statement_mut(&mut self, _statement: &mut Statement) -> VisitAction {
        VisitAction::Continue
    }

    fn exit_statement_mut(&mut self, _statement: &mut Statement) {}
}

pub fn walk_expression_mut<V: SyntaxVisitorMut + ?Sized>(
    visitor: &mut V,
    expression: &mut Expression,
) {
    if visitor.visit_expression_mut(expression) == VisitAction::Continue {
        for child in expression.sub_expressions_mut() {
            walk_expression_mut(visitor, child);
        }
        if let ExpressionKind::Block { body, .. } = &mut expression.kind {
            walk_compound_mut(visitor, body);
        }
    }
    visitor.exit_expression_mut(expression);
}

pub fn walk_statement_mut<V: SyntaxVisitorMut + ?Sized>(
    visitor: &mut V,
    statement: &mut Statement,
) {
    if visitor.visit_statement_mut(statement) == VisitAction::Continue {
        match statement {
            Statement::Compound(body) => walk_compound_mut(visitor, body),
            Statement::If {
                condition,
                body,
                else_body,
            } => {
                walk_expression_mut(visitor, condition);
                walk_compound_mut(visitor, body);
                if let Some(else_body) = else_body {
                    walk_compound_mut(visitor, else_body);
                }
            }
            Statement::While { condition, body } | Statement::DoWhile { body, condition } => {
                walk_expression_mut(visitor, condition);
                walk_compound_mut(visitor, body);
            }
            Statement::ForIn { sequence, body, .. } => {
                walk_expression_mut(visitor, sequence);
                walk_compound_mut(visitor, body);
            }
            Statement::Return(value) => {
                if let Some(value) = value {
                    walk_expression_mut(visitor, value);
                }
            }
            Statement::Expressions(expressions) => {
                for expression in expressions {
                    walk_expression_mut(visitor, expression);
                }
            }
            Statement::VariableDeclarations(declarations) => {
                for declaration in declarations {
                    if let Some(initialization) = &mut declaration.initialization {
                        walk_expression_mut(visitor, initialization);
                    }
                }
            }
            Statement::Break | Statement::Continue | Statement::Unknown(_) => {}
        }
    }
    visitor.exit_statement_mut(statement);
}

pub fn walk_compound_mut<V: SyntaxVisitorMut + ?Sized>(
    visitor: &mut V,
    body: &mut CompoundStatement,
) {
    for statement in &mut body.statements {
        walk_statement_mut(visitor, statement);
    }
}

/// Node yielded by [`SyntaxNodeIterator`].
#[derive(Debug, Clone, Copy)]
pub enum SyntaxNode<'a> {
    Expression(&'a Expression),
    Statement(&'a Statement),
}

impl<'a> SyntaxNode<'a> {
    pub fn as_expression(&self) -> Option<&'a Expression> {
        match self {
            SyntaxNode::Expression(expression) => Some(expression),
            SyntaxNode::Statement(_) => None,
        }
    }
}

/// Pre-order iterator over a syntax tree.
///
/// When `inspect_blocks` is false the bodies of block expressions are not
/// entered; the block expression itself is still yielded.
pub struct SyntaxNodeIterator<'a> {
    stack: Vec<SyntaxNode<'a>>,
    inspect_blocks: bool,
}

impl<'a> SyntaxNodeIterator<'a> {
    pub fn from_expression(expression: &'a Expression, inspect_blocks: bool) -> Self {
        Self {
            stack: vec![SyntaxNode::Expression(expression)],
            inspect_blocks,
        }
    }

    pub fn from_compound(body: &'a CompoundStatement, inspect_blocks: bool) -> Self {
        Self {
            stack: body.statements.iter().rev().map(SyntaxNode::Statement).collect(),
            inspect_blocks,
        }
    }

    fn push_statements(&mut self, body: &'a CompoundStatement) {
        self.stack
            .extend(body.statements.iter().rev().map(SyntaxNode::Statement));
    }
}

impl<'a> Iterator for SyntaxNodeIterator<'a> {
    type Item = SyntaxNode<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        match node {
            SyntaxNode::Expression(expression) => {
                if let ExpressionKind::Block { body, .. } = &expression.kind {
                    if self.inspect_blocks {
                        self.push_statements(body);
                    }
                }
                self.stack.extend(
                    expression
                        .sub_expressions()
                        .into_iter()
                        .rev()
                        .map(SyntaxNode::Expression),
                );
            }
            SyntaxNode::Statement(statement) => {
                for body in statement.bodies().into_iter().rev() {
                    self.push_statements(body);
                }
                self.stack.extend(
                    statement
                        .expressions()
                        .into_iter()
                        .rev()
                        .map(SyntaxNode::Expression),
                );
            }
        }
        Some(node)
    }
}
