// o2s_ast/matcher/expression - Matchers over expression trees
use super::Matcher;
use crate::expression::{Constant, Expression, ExpressionKind, FunctionArgument, Postfix};
use crate::operators::SwiftOperator;
use crate::postfix_chain::PostfixChain;
use crate::swift_type::SwiftType;
use crate::visit::SyntaxNodeIterator;

impl Matcher<Expression> {
    pub fn identifier(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::predicate(move |expression| expression.as_identifier() == Some(name.as_str()))
    }

    pub fn any_identifier() -> Self {
        Self::predicate(|expression| expression.as_identifier().is_some())
    }

    pub fn constant(constant: Constant) -> Self {
        Self::predicate(move |expression| expression.as_constant() == Some(&constant))
    }

    pub fn nil_literal() -> Self {
        Self::predicate(Expression::is_nil)
    }

    pub fn any_block() -> Self {
        Self::predicate(Expression::is_block)
    }

    pub fn unary(op: SwiftOperator, operand: Matcher<Expression>) -> Self {
        Self::predicate(move |expression| match &expression.kind {
            ExpressionKind::Unary {
                op: candidate,
                operand: value,
            } => *candidate == op && operand.matches(value),
            _ => false,
        })
    }

    pub fn binary(lhs: Matcher<Expression>, op: SwiftOperator, rhs: Matcher<Expression>) -> Self {
        Self::predicate(move |expression| match &expression.kind {
            ExpressionKind::Binary {
                lhs: left,
                op: candidate,
                rhs: right,
            } => *candidate == op && lhs.matches(left) && rhs.matches(right),
            _ => false,
        })
    }

    pub fn assignment(
        lhs: Matcher<Expression>,
        op: SwiftOperator,
        rhs: Matcher<Expression>,
    ) -> Self {
        Self::predicate(move |expression| match &expression.kind {
            ExpressionKind::Assignment {
                lhs: left,
                op: candidate,
                rhs: right,
            } => *candidate == op && lhs.matches(left) && rhs.matches(right),
            _ => false,
        })
    }

    /// Postfix expression whose receiver and operation match.
    pub fn postfix(receiver: Matcher<Expression>, op: Matcher<Postfix>) -> Self {
        Self::predicate(move |expression| {
            expression
                .as_postfix()
                .is_some_and(|(value, operation)| receiver.matches(value) && op.matches(operation))
        })
    }

    /// `self.member`
    pub fn dot(self, member: impl Into<String>) -> Self {
        Matcher::postfix(self, Matcher::<Postfix>::member(member))
    }

    /// `self(arguments...)`, one matcher per argument.
    pub fn call(self, arguments: Vec<Matcher<FunctionArgument>>) -> Self {
        Matcher::postfix(self, Matcher::<Postfix>::function_call(arguments))
    }

    /// `self(...)` with any arguments.
    pub fn call_any(self) -> Self {
        Matcher::postfix(self, Matcher::<Postfix>::any_function_call())
    }

    /// `self[index]`
    pub fn sub(self, index: Matcher<Expression>) -> Self {
        Matcher::postfix(self, Matcher::<Postfix>::subscript(index))
    }

    /// Applies this matcher after stripping surrounding parentheses.
    pub fn ignoring_parens(self) -> Self {
        Self::predicate(move |expression| self.matches(expression.unwrapping_parens()))
    }

    /// Matches on the resolved type. With `ignoring_nullability` both sides
    /// are compared deep-unwrapped.
    pub fn resolved_type(ty: SwiftType, ignoring_nullability: bool) -> Self {
        Self::predicate(move |expression| {
            type_slot_matches(expression.resolved_type.as_ref(), &ty, ignoring_nullability)
        })
    }

    pub fn expected_type(ty: SwiftType, ignoring_nullability: bool) -> Self {
        Self::predicate(move |expression| {
            type_slot_matches(expression.expected_type.as_ref(), &ty, ignoring_nullability)
        })
    }

    /// `x != nil`, `nil != x` or a bare `x` used as a condition.
    pub fn nil_check(against: Matcher<Expression>) -> Self {
        let not_equal = |subject: Matcher<Expression>| {
            Matcher::binary(subject.clone(), SwiftOperator::Unequals, Matcher::nil_literal()).or(
                Matcher::binary(Matcher::nil_literal(), SwiftOperator::Unequals, subject),
            )
        };
        not_equal(against.clone())
            .or(against)
            .ignoring_parens()
    }

    /// `x == nil`, `nil == x` or `!x`.
    pub fn nil_compare(against: Matcher<Expression>) -> Self {
        Matcher::binary(against.clone(), SwiftOperator::Equals, Matcher::nil_literal())
            .or(Matcher::binary(
                Matcher::nil_literal(),
                SwiftOperator::Equals,
                against.clone(),
            ))
            .or(Matcher::unary(SwiftOperator::Negate, against.ignoring_parens()))
            .ignoring_parens()
    }

    /// Matches when the expression or any descendant matches, searched in
    /// pre-order. Block bodies are skipped unless `inspect_blocks` is set.
    pub fn find_any(matcher: Matcher<Expression>, inspect_blocks: bool) -> Self {
        Self::predicate(move |expression| {
            SyntaxNodeIterator::from_expression(expression, inspect_blocks)
                .filter_map(|node| node.as_expression())
                .any(|candidate| matcher.matches(candidate))
        })
    }

    /// Matches the left-to-right inversion of a postfix chain.
    pub fn inverted(chain: Matcher<PostfixChain>) -> Self {
        Self::predicate(move |expression| {
            expression.is_postfix() && chain.matches(&PostfixChain::invert(expression))
        })
    }
}

fn type_slot_matches(slot: Option<&SwiftType>, expected: &SwiftType, ignoring_nullability: bool) -> bool {
    match slot {
        Some(actual) if ignoring_nullability => actual.deep_unwrapped() == expected.deep_unwrapped(),
        Some(actual) => actual == expected,
        None => false,
    }
}

impl Matcher<Postfix> {
    pub fn member(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::predicate(move |postfix| postfix.as_member() == Some(name.as_str()))
    }

    pub fn any_member() -> Self {
        Self::predicate(|postfix| postfix.as_member().is_some())
    }

    pub fn function_call(arguments: Vec<Matcher<FunctionArgument>>) -> Self {
        Self::narrow(Postfix::as_function_call, Matcher::elements(arguments))
    }

    pub fn any_function_call() -> Self {
        Self::predicate(|postfix| postfix.as_function_call().is_some())
    }

    pub fn subscript(index: Matcher<Expression>) -> Self {
        Self::narrow(Postfix::as_subscript, index)
    }
}

impl Matcher<FunctionArgument> {
    pub fn unlabeled(expression: Matcher<Expression>) -> Self {
        Self::project_is_none(|argument: &FunctionArgument| argument.label.as_deref())
            .with(|argument| &argument.expression, expression)
    }

    pub fn labeled(label: impl Into<String>, expression: Matcher<Expression>) -> Self {
        Self::narrow(
            |argument: &FunctionArgument| argument.label.as_deref(),
            Matcher::string(label),
        )
        .with(|argument| &argument.expression, expression)
    }

    pub fn any_argument() -> Self {
        Self::any()
    }
}
