// o2s_ast/matcher - Composable structural predicates
//! A [`Matcher<T>`] is a shareable predicate over `T`. Matchers are built from
//! explicit constructors ([`Matcher::any`], [`Matcher::equals`],
//! [`Matcher::predicate`]) and combined with projections, variant narrowing
//! and boolean combinators. Expression-specific constructors live in
//! [`expression`]; postfix-chain matchers in [`chain`].

pub mod chain;
pub mod expression;

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

type Predicate<T> = dyn Fn(&T) -> bool + Send + Sync;

pub struct Matcher<T: ?Sized> {
    predicate: Arc<Predicate<T>>,
}

impl<T: ?Sized> Clone for Matcher<T> {
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Matcher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Matcher(..)")
    }
}

impl<T: ?Sized + 'static> Matcher<T> {
    /// Matches every value.
    pub fn any() -> Self {
        Self::predicate(|_| true)
    }

    /// Matches no value.
    pub fn never() -> Self {
        Self::predicate(|_| false)
    }

    pub fn predicate(predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        Self {
            predicate: Arc::new(predicate),
        }
    }

    /// Matches values equal to `value`.
    pub fn equals<V>(value: V) -> Self
    where
        V: Borrow<T> + Send + Sync + 'static,
        T: PartialEq,
    {
        Self::predicate(move |candidate| candidate == value.borrow())
    }

    pub fn matches(&self, value: &T) -> bool {
        (self.predicate)(value)
    }

    pub fn and(self, other: Matcher<T>) -> Self {
        Self::predicate(move |value| self.matches(value) && other.matches(value))
    }

    pub fn or(self, other: Matcher<T>) -> Self {
        Self::predicate(move |value| self.matches(value) || other.matches(value))
    }

    pub fn negated(self) -> Self {
        Self::predicate(move |value| !self.matches(value))
    }

    /// Matches when every matcher matches; an empty list matches everything.
    pub fn all(matchers: Vec<Matcher<T>>) -> Self {
        Self::predicate(move |value| matchers.iter().all(|matcher| matcher.matches(value)))
    }

    /// Matches when at least one matcher matches.
    pub fn any_of(matchers: Vec<Matcher<T>>) -> Self {
        Self::predicate(move |value| matchers.iter().any(|matcher| matcher.matches(value)))
    }

    /// Matches on a borrowed field of the value.
    pub fn project<U: ?Sized + 'static>(
        projection: impl for<'a> Fn(&'a T) -> &'a U + Send + Sync + 'static,
        matcher: Matcher<U>,
    ) -> Self {
        Self::predicate(move |value| matcher.matches(projection(value)))
    }

    /// Matches on a value computed from the input.
    pub fn project_value<U: 'static>(
        projection: impl Fn(&T) -> U + Send + Sync + 'static,
        matcher: Matcher<U>,
    ) -> Self {
        Self::predicate(move |value| matcher.matches(&projection(value)))
    }

    /// Succeeds only when `narrowing` yields a view of the value (for example
    /// a specific enum variant), then delegates to `matcher`.
    pub fn narrow<U: ?Sized + 'static>(
        narrowing: impl for<'a> Fn(&'a T) -> Option<&'a U> + Send + Sync + 'static,
        matcher: Matcher<U>,
    ) -> Self {
        Self::predicate(move |value| narrowing(value).is_some_and(|view| matcher.matches(view)))
    }

    /// Matches when an optional projection is absent.
    pub fn project_is_none<U: ?Sized + 'static>(
        projection: impl for<'a> Fn(&'a T) -> Option<&'a U> + Send + Sync + 'static,
    ) -> Self {
        Self::predicate(move |value| projection(value).is_none())
    }

    /// Adds a projected condition to this matcher.
    pub fn with<U: ?Sized + 'static>(
        self,
        projection: impl for<'a> Fn(&'a T) -> &'a U + Send + Sync + 'static,
        matcher: Matcher<U>,
    ) -> Self {
        self.and(Matcher::project(projection, matcher))
    }
}

impl<U: 'static> Matcher<Option<U>> {
    pub fn is_none() -> Self {
        Self::predicate(|value| value.is_none())
    }

    pub fn is_some() -> Self {
        Self::predicate(|value| value.is_some())
    }

    /// Matches `Some(inner)` where `inner` satisfies `matcher`.
    pub fn some(matcher: Matcher<U>) -> Self {
        Self::predicate(move |value| value.as_ref().is_some_and(|inner| matcher.matches(inner)))
    }
}

impl Matcher<str> {
    pub fn string(value: impl Into<String>) -> Self {
        Matcher::equals(value.into())
    }
}

impl<U: 'static> Matcher<[U]> {
    /// Matches slices with exactly one element matcher per position.
    pub fn elements(matchers: Vec<Matcher<U>>) -> Self {
        Self::predicate(move |values| {
            values.len() == matchers.len()
                && values
                    .iter()
                    .zip(&matchers)
                    .all(|(value, matcher)| matcher.matches(value))
        })
    }

    pub fn count(count: usize) -> Self {
        Self::predicate(move |values| values.len() == count)
    }
}

/// Method-call sugar for applying a matcher.
pub trait Matchable {
    fn matches(&self, matcher: &Matcher<Self>) -> bool;
}

impl<T: ?Sized + 'static> Matchable for T {
    fn matches(&self, matcher: &Matcher<Self>) -> bool {
        matcher.matches(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Person {
        name: String,
        nickname: Option<String>,
        age: u32,
    }

    fn person() -> Person {
        Person {
            name: "Ada".to_string(),
            nickname: None,
            age: 36,
        }
    }

    #[test]
    fn projections_and_combinators_compose() {
        let matcher = Matcher::<Person>::project(|p| p.name.as_str(), Matcher::string("Ada"))
            .and(Matcher::project_value(|p: &Person| p.age > 30, Matcher::equals(true)));

        assert!(person().matches(&matcher));
        assert!(!person().matches(&matcher.clone().negated()));
    }

    #[test]
    fn optional_projection_nil_check() {
        let no_nickname = Matcher::<Person>::project_is_none(|p| p.nickname.as_deref());
        let nicknamed =
            Matcher::<Person>::narrow(|p| p.nickname.as_deref(), Matcher::string("Countess"));

        assert!(person().matches(&no_nickname));
        assert!(!person().matches(&nicknamed));
    }

    #[test]
    fn empty_all_matches_and_empty_any_of_does_not() {
        assert!(Matcher::<u8>::all(vec![]).matches(&1));
        assert!(!Matcher::<u8>::any_of(vec![]).matches(&1));
    }
}
