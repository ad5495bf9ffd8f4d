// o2s_cli - Objective-C to Swift rewriter driver (library interface for testing)
use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;

pub use config::{
    ConfigError, ConfigLayer, LogLevel, LoggingConfig, OutputConfig, ParallelConfig, PassesConfig,
    RewriterConfig,
};
pub use error::RewriterError;
pub use pipeline::{RewriteSummary, SwiftRewriter};

#[derive(Parser)]
#[command(name = "o2s")]
#[command(about = "Rewrites Objective-C syntax trees into Swift source")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Rewrite Objective-C syntax trees (JSON) into Swift files
    Rewrite {
        /// Input syntax tree files, named after their source (`Feed.m.json`)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Output directory for .swift files
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Configuration file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Log level for stderr output
        #[arg(long, value_enum, ignore_case = true)]
        log_level: Option<LogLevel>,
        /// Comma separated pass names, in execution order
        #[arg(long, value_delimiter = ',')]
        passes: Option<Vec<String>>,
        /// Worker threads for parsing; 1 disables parallel parsing
        #[arg(short, long)]
        jobs: Option<usize>,
    },
    /// List the default intention passes in execution order
    Passes,
    /// Show version information
    Version,
}

pub fn get_version() -> String {
    format!(
        "o2s {} - Objective-C to Swift rewriter",
        env!("CARGO_PKG_VERSION")
    )
}

/// Override layer built from `rewrite` flags.
pub fn build_cli_layer(
    output: Option<&Path>,
    log_level: Option<LogLevel>,
    passes: Option<&[String]>,
    jobs: Option<usize>,
) -> ConfigLayer {
    let mut layer = ConfigLayer {
        output_directory: output.map(Path::to_path_buf),
        log_level,
        ..ConfigLayer::default()
    };

    if let Some(names) = passes {
        let names: Vec<String> = names
            .iter()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();
        layer.passes = Some(names);
    }

    if let Some(jobs) = jobs {
        layer.worker_threads = Some(jobs);
        layer.parallel_parsing = Some(jobs > 1);
    }

    layer
}

/// Configuration file contents, or the defaults when no file is given.
pub fn load_base_config(config_path: Option<&Path>) -> Result<RewriterConfig> {
    match config_path {
        Some(path) => RewriterConfig::load(path)
            .with_context(|| format!("failed to load configuration {}", path.display())),
        None => Ok(RewriterConfig::default()),
    }
}
