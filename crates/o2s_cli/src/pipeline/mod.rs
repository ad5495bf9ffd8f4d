// o2s_cli/pipeline - Load, build, run passes, write
//! One rewrite run:
//!
//! 1. load every input source and parse it into a syntax tree
//! 2. lower each tree into a single-file intention collection
//! 3. merge the per-file collections in input order
//! 4. resolve expression types and run the configured passes
//! 5. write Swift through the output
//!
//! Steps 1 and 2 may run on a worker pool; everything after the merge is
//! sequential.

pub mod builder;
pub mod signature;

use crate::config::RewriterConfig;
use crate::error::RewriterError;
use o2s_intentions::IntentionCollection;
use o2s_objc::{
    Diagnostics, InputSource, InputSourcesProvider, JsonSyntaxTreeProvider, SyntaxTreeProvider,
};
use o2s_passes::{IntentionPassContext, IntentionPassPipeline};
use o2s_writer::{SwiftWriter, WriterOutput};
use rayon::prelude::*;
use tracing::{debug, info, info_span};

pub use builder::{build_file_intentions, objc_source_path, swift_target_path};
pub use signature::SignatureGenerator;

/// Outcome of a successful run.
#[derive(Debug, Clone, Default)]
pub struct RewriteSummary {
    /// Emitted paths, relative to the output root, in creation order.
    pub written_files: Vec<String>,
    pub diagnostics: Diagnostics,
}

/// Drives a rewrite with a fixed configuration.
pub struct SwiftRewriter {
    config: RewriterConfig,
    syntax: Box<dyn SyntaxTreeProvider>,
}

impl SwiftRewriter {
    pub fn new(config: RewriterConfig) -> Self {
        Self::with_syntax_provider(config, Box::new(JsonSyntaxTreeProvider::new()))
    }

    pub fn with_syntax_provider(config: RewriterConfig, syntax: Box<dyn SyntaxTreeProvider>) -> Self {
        Self { config, syntax }
    }

    pub fn config(&self) -> &RewriterConfig {
        &self.config
    }

    pub fn rewrite(
        &self,
        input: &dyn InputSourcesProvider,
        output: &mut dyn WriterOutput,
    ) -> Result<RewriteSummary, RewriterError> {
        let pipeline = IntentionPassPipeline::from_names(&self.config.passes.enabled)?;
        let (mut collection, diagnostics) = self.load_input_sources(input)?;

        {
            let _span = info_span!("passes", count = pipeline.len()).entered();
            let mut context = IntentionPassContext::new(&collection);
            context.resolve_all(&mut collection);
            pipeline.run(&mut collection, &mut context)?;
        }

        let writer = SwiftWriter::new(self.config.output.writer_config());
        let written_files = writer.write(&collection, output)?;
        info!(
            files = written_files.len(),
            diagnostics = diagnostics.len(),
            "rewrite finished"
        );
        Ok(RewriteSummary {
            written_files,
            diagnostics,
        })
    }

    /// Parses and builds every source, then merges the results in input
    /// order regardless of which worker finished first.
    pub fn load_input_sources(
        &self,
        input: &dyn InputSourcesProvider,
    ) -> Result<(IntentionCollection, Diagnostics), RewriterError> {
        let sources = input.sources();
        let parallel = self.config.parallel.sanitized();
        debug!(
            sources = sources.len(),
            workers = parallel.effective_workers(),
            "loading input sources"
        );

        let built: Vec<(IntentionCollection, Diagnostics)> = if parallel.parallel_parsing {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(parallel.effective_workers())
                .build()?;
            pool.install(|| {
                sources
                    .par_iter()
                    .map(|source| self.load_source(source.as_ref()))
                    .collect::<Result<Vec<_>, _>>()
            })?
        } else {
            sources
                .iter()
                .map(|source| self.load_source(source.as_ref()))
                .collect::<Result<Vec<_>, _>>()?
        };

        let mut collection = IntentionCollection::new();
        let mut diagnostics = Diagnostics::new();
        for (part, part_diagnostics) in built {
            collection.merge(part);
            diagnostics.merge(part_diagnostics);
        }
        Ok((collection, diagnostics))
    }

    fn load_source(
        &self,
        source: &dyn InputSource,
    ) -> Result<(IntentionCollection, Diagnostics), RewriterError> {
        let source_name = source.source_name();
        let _span = info_span!("build_file", source = source_name).entered();
        let text = source.load_source().map_err(|error| RewriterError::Load {
            source_name: source_name.to_string(),
            source: error,
        })?;

        let mut diagnostics = Diagnostics::new();
        let root = self.syntax.parse(source_name, &text, &mut diagnostics);
        let collection = build_file_intentions(source_name, &root, &mut diagnostics).map_err(
            |error| RewriterError::Build {
                source_name: source_name.to_string(),
                source: error,
            },
        )?;
        Ok((collection, diagnostics))
    }
}
