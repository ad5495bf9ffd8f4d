// o2s_ast/matcher/chain - Matchers over inverted postfix chains
use super::Matcher;
use crate::expression::{Expression, FunctionArgument};
use crate::postfix_chain::{PostfixChain, PostfixChainEntry, PostfixOperation};

impl Matcher<PostfixChain> {
    pub fn root(matcher: Matcher<Expression>) -> Self {
        Self::project(|chain| &chain.root, matcher)
    }

    /// Chain with exactly `count` entries.
    pub fn entry_count(count: usize) -> Self {
        Self::predicate(move |chain| chain.len() == count)
    }

    /// Entry at a 1-based `position`.
    pub fn entry(position: usize, matcher: Matcher<PostfixChainEntry>) -> Self {
        Self::narrow(move |chain| chain.entry_at(position), matcher)
    }

    /// One matcher per entry, leftmost first; the lengths must agree.
    pub fn entries(matchers: Vec<Matcher<PostfixChainEntry>>) -> Self {
        Self::project(
            |chain| chain.entries.as_slice(),
            Matcher::elements(matchers),
        )
    }
}

impl Matcher<PostfixChainEntry> {
    pub fn function_call() -> Self {
        Self::predicate(PostfixChainEntry::is_function_call)
    }

    pub fn member_access() -> Self {
        Self::predicate(PostfixChainEntry::is_member_access)
    }

    pub fn subscription() -> Self {
        Self::predicate(PostfixChainEntry::is_subscription)
    }

    pub fn member_named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::predicate(move |entry| entry.member_name() == Some(name.as_str()))
    }

    /// `.member(arguments...)` with one matcher per argument.
    pub fn method_call(
        member: impl Into<String>,
        arguments: Vec<Matcher<FunctionArgument>>,
    ) -> Self {
        let member = member.into();
        Self::predicate(move |entry| match &entry.operation {
            PostfixOperation::MethodCall {
                member: name,
                arguments: values,
                ..
            } => {
                *name == member
                    && values.len() == arguments.len()
                    && values
                        .iter()
                        .zip(&arguments)
                        .all(|(value, matcher)| matcher.matches(value))
            }
            _ => false,
        })
    }

    /// Method call whose member name satisfies `name`, with any arguments.
    pub fn method_call_where(name: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Self::predicate(move |entry| match &entry.operation {
            PostfixOperation::MethodCall { member, .. } => name(member),
            _ => false,
        })
    }

    pub fn receiver(matcher: Matcher<Expression>) -> Self {
        Self::project(|entry| &entry.receiver, matcher)
    }
}
