// o2s_passes/passes - Built-in intention passes
mod ast_rewriting;
mod file_type_merging;
mod property_merge;
mod protocol_nullability;

pub use ast_rewriting::AstRewritingPass;
pub use file_type_merging::FileTypeMergingPass;
pub use property_merge::PropertyMergePass;
pub use protocol_nullability::ProtocolNullabilityPropagationPass;

use o2s_ast::SwiftType;
use o2s_intentions::FunctionSignature;

/// Takes parameter and return optionality from `source` wherever `target`
/// has an implicitly unwrapped version of the same type. Returns whether
/// anything changed.
pub(crate) fn propagate_nullability(
    target: &mut FunctionSignature,
    source: &FunctionSignature,
) -> bool {
    let mut changed = propagate_type(&mut target.return_type, &source.return_type);
    for (parameter, requirement) in target.parameters.iter_mut().zip(&source.parameters) {
        changed |= propagate_type(&mut parameter.ty, &requirement.ty);
    }
    changed
}

pub(crate) fn propagate_type(target: &mut SwiftType, source: &SwiftType) -> bool {
    if !target.is_implicitly_unwrapped()
        || source.is_implicitly_unwrapped()
        || target.deep_unwrapped() != source.deep_unwrapped()
    {
        return false;
    }
    *target = source.clone();
    true
}
