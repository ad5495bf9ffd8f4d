// o2s_intentions - Declarations the rewriter will emit
//! The intention graph: files, types and members produced from Objective-C
//! declarations and mutated in place by intention passes. Every intention is
//! owned by one [`IntentionCollection`] and addressed by [`IntentionId`].

pub mod collection;
pub mod error;
pub mod intention;
pub mod signature;

pub use collection::*;
pub use error::*;
pub use intention::*;
pub use signature::*;
