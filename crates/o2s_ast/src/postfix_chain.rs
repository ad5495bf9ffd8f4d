// o2s_ast/postfix_chain - Left-to-right view of nested postfix expressions
//! Postfix expressions nest inside out: in `a.b(x).c` the outermost node is
//! the `.c` access. [`PostfixChain::invert`] flattens such a tree into its
//! root receiver plus the operations applied to it, leftmost first.
//!
//! A member access directly followed by a call is folded into a single
//! [`PostfixOperation::MethodCall`] entry, so `a.b(x).c[y]` has three
//! entries: `b(x)` on `a`, `.c`, then `[y]`.

use crate::expression::{Expression, FunctionArgument, OptionalAccess, Postfix};

#[derive(Debug, Clone, PartialEq)]
pub struct PostfixChain {
    /// Innermost non-postfix expression.
    pub root: Expression,
    pub entries: Vec<PostfixChainEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostfixChainEntry {
    /// Expression the operation is applied to.
    pub receiver: Expression,
    pub operation: PostfixOperation,
    /// Unwrapping applied to `receiver`.
    pub optional_access: OptionalAccess,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PostfixOperation {
    Member(String),
    MethodCall {
        member: String,
        arguments: Vec<FunctionArgument>,
        /// Unwrapping applied to the member before it is called (`a.b?()`).
        callee_access: OptionalAccess,
    },
    FunctionCall(Vec<FunctionArgument>),
    Subscript(Expression),
}

impl PostfixChain {
    pub fn invert(expression: &Expression) -> PostfixChain {
        let mut raw = Vec::new();
        let mut current = expression;
        while let Some((receiver, op)) = current.as_postfix() {
            raw.push((receiver, op, optional_access_of(current)));
            current = receiver;
        }
        raw.reverse();

        let mut entries = Vec::with_capacity(raw.len());
        let mut index = 0;
        while index < raw.len() {
            let (receiver, op, access) = raw[index];
            let next_call = raw
                .get(index + 1)
                .and_then(|(_, next, next_access)| Some((next.as_function_call()?, *next_access)));

            let operation = match (op, next_call) {
                (Postfix::Member(member), Some((arguments, callee_access))) => {
                    index += 1;
                    PostfixOperation::MethodCall {
                        member: member.clone(),
                        arguments: arguments.to_vec(),
                        callee_access,
                    }
                }
                (Postfix::Member(member), None) => PostfixOperation::Member(member.clone()),
                (Postfix::FunctionCall(arguments), _) => {
                    PostfixOperation::FunctionCall(arguments.clone())
                }
                (Postfix::Subscript(index_expression), _) => {
                    PostfixOperation::Subscript(index_expression.as_ref().clone())
                }
            };
            entries.push(PostfixChainEntry {
                receiver: receiver.clone(),
                operation,
                optional_access: access,
            });
            index += 1;
        }

        PostfixChain {
            root: current.clone(),
            entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at a 1-based position, matching how chains are read aloud.
    pub fn entry_at(&self, position: usize) -> Option<&PostfixChainEntry> {
        position.checked_sub(1).and_then(|index| self.entries.get(index))
    }
}

fn optional_access_of(expression: &Expression) -> OptionalAccess {
    match &expression.kind {
        crate::expression::ExpressionKind::Postfix {
            optional_access, ..
        } => *optional_access,
        _ => OptionalAccess::None,
    }
}

impl PostfixChainEntry {
    pub fn is_function_call(&self) -> bool {
        matches!(
            self.operation,
            PostfixOperation::MethodCall { .. } | PostfixOperation::FunctionCall(_)
        )
    }

    pub fn is_member_access(&self) -> bool {
        matches!(self.operation, PostfixOperation::Member(_))
    }

    pub fn is_subscription(&self) -> bool {
        matches!(self.operation, PostfixOperation::Subscript(_))
    }

    /// Member name for member accesses and method calls.
    pub fn member_name(&self) -> Option<&str> {
        match &self.operation {
            PostfixOperation::Member(member) | PostfixOperation::MethodCall { member, .. } => {
                Some(member)
            }
            _ => None,
        }
    }

    pub fn arguments(&self) -> Option<&[FunctionArgument]> {
        match &self.operation {
            PostfixOperation::MethodCall { arguments, .. }
            | PostfixOperation::FunctionCall(arguments) => Some(arguments),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_postfix_expression_has_no_entries() {
        let chain = PostfixChain::invert(&Expression::identifier("a"));
        assert!(chain.is_empty());
        assert_eq!(chain.root, Expression::identifier("a"));
    }

    #[test]
    fn free_function_call_is_not_folded() {
        let expression = Expression::identifier("f").call(vec![]).dot("g");
        let chain = PostfixChain::invert(&expression);

        assert_eq!(chain.len(), 2);
        assert!(matches!(
            chain.entries[0].operation,
            PostfixOperation::FunctionCall(_)
        ));
        assert_eq!(chain.entries[1].member_name(), Some("g"));
    }
}
