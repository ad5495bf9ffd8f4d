// o2s_ast - Swift syntax model used by the Objective-C rewriter
//! Expression and statement trees, the Swift type model, visitors, postfix
//! chain inversion and the structural [`Matcher`] DSL used by rewriting
//! passes to recognise expression shapes.

pub mod display;
pub mod expression;
pub mod matcher;
pub mod operators;
pub mod postfix_chain;
pub mod span;
pub mod statement;
pub mod swift_type;
pub mod visit;

pub use expression::*;
pub use matcher::{Matchable, Matcher};
pub use operators::*;
pub use postfix_chain::*;
pub use span::*;
pub use statement::*;
pub use swift_type::*;
pub use visit::*;
