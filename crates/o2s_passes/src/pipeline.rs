// o2s_passes/pipeline - Ordered execution of intention passes
use crate::context::IntentionPassContext;
use crate::error::PassError;
use crate::pass::IntentionPass;
use crate::passes::{
    AstRewritingPass, FileTypeMergingPass, PropertyMergePass, ProtocolNullabilityPropagationPass,
};
use o2s_intentions::IntentionCollection;
use tracing::{debug, info_span};

/// Pass names in the order of [`IntentionPassPipeline::default_pipeline`].
pub const DEFAULT_PASS_NAMES: [&str; 4] = [
    FileTypeMergingPass::NAME,
    ProtocolNullabilityPropagationPass::NAME,
    PropertyMergePass::NAME,
    AstRewritingPass::NAME,
];

/// Instantiates a pass from its configuration name.
pub fn pass_by_name(name: &str) -> Option<Box<dyn IntentionPass>> {
    let pass: Box<dyn IntentionPass> = match name {
        FileTypeMergingPass::NAME => Box::new(FileTypeMergingPass),
        ProtocolNullabilityPropagationPass::NAME => Box::new(ProtocolNullabilityPropagationPass),
        PropertyMergePass::NAME => Box::new(PropertyMergePass),
        AstRewritingPass::NAME => Box::new(AstRewritingPass),
        _ => return None,
    };
    Some(pass)
}

/// Fixed, ordered list of passes. Each pass runs once over the whole graph
/// and the graph's integrity is verified after every pass.
pub struct IntentionPassPipeline {
    passes: Vec<Box<dyn IntentionPass>>,
}

impl IntentionPassPipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    pub fn default_pipeline() -> Self {
        Self::builder()
            .with_pass(FileTypeMergingPass)
            .with_pass(ProtocolNullabilityPropagationPass)
            .with_pass(PropertyMergePass)
            .with_pass(AstRewritingPass)
            .build()
    }

    /// Pipeline running the named passes in the given order.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, PassError> {
        let mut builder = Self::builder();
        for name in names {
            let name = name.as_ref();
            let pass = pass_by_name(name).ok_or_else(|| PassError::UnknownPass {
                name: name.to_string(),
            })?;
            builder.push_boxed(pass);
        }
        Ok(builder.build())
    }

    pub fn pass_names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|pass| pass.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    /// Runs every pass in order, stopping at the first failure.
    pub fn run(
        &self,
        collection: &mut IntentionCollection,
        context: &mut IntentionPassContext,
    ) -> Result<(), PassError> {
        for pass in &self.passes {
            let name = pass.name();
            let _span = info_span!("intention_pass", pass = name).entered();
            pass.apply(collection, context)
                .map_err(|source| PassError::Pass { pass: name, source })?;
            collection
                .verify_integrity()
                .map_err(|source| PassError::Integrity { pass: name, source })?;
            debug!(intentions = collection.len(), "pass finished");
        }
        Ok(())
    }
}

impl Default for IntentionPassPipeline {
    fn default() -> Self {
        Self::default_pipeline()
    }
}

#[derive(Default)]
pub struct PipelineBuilder {
    passes: Vec<Box<dyn IntentionPass>>,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self { passes: Vec::new() }
    }

    pub fn with_pass(mut self, pass: impl IntentionPass + 'static) -> Self {
        self.passes.push(Box::new(pass));
        self
    }

    pub fn push_boxed(&mut self, pass: Box<dyn IntentionPass>) -> &mut Self {
        self.passes.push(pass);
        self
    }

    pub fn build(self) -> IntentionPassPipeline {
        IntentionPassPipeline {
            passes: self.passes,
        }
    }
}
