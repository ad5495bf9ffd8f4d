// o2s_typesystem - Types for the rewriter: mapping, lookup and resolution
//! [`TypeMapper`] converts Objective-C types, [`TypeSystem`] answers symbol
//! lookups and [`ExpressionTypeResolver`] fills the type slots of expression
//! trees. [`DefaultTypeResolverInvoker`] drives the resolver over intentions.

pub mod builtins;
pub mod intention_system;
pub mod invoker;
pub mod mapper;
pub mod resolver;
pub mod type_system;

pub use builtins::builtin_types;
pub use intention_system::IntentionCollectionTypeSystem;
pub use invoker::{DefaultTypeResolverInvoker, TypeResolverInvoker};
pub use mapper::{is_primitive_name, ownership_of, Nullability, TypeMapper, TypeMappingContext};
pub use resolver::{ExpressionTypeResolver, ResolutionContext};
pub use type_system::*;

#[cfg(test)]
mod tests;
