// o2s_objc - Objective-C side of the rewriter
//! Source model for the Objective-C input: types, the syntax tree delivered
//! by the parser collaborator, input sources and the diagnostics sink.

pub mod diagnostics;
pub mod json;
pub mod node;
pub mod source;
pub mod types;
pub mod visit;

pub use diagnostics::*;
pub use json::*;
pub use node::*;
pub use source::*;
pub use types::*;
pub use visit::*;
