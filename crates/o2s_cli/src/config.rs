// o2s_cli/config - Rewriter configuration file and override layers
//! `o2s.toml` holds four tables: `[output]`, `[passes]`, `[parallel]` and
//! `[logging]`. Every field has a default, so an empty file is valid.
//! Command line flags are applied on top as a [`ConfigLayer`].

use o2s_passes::DEFAULT_PASS_NAMES;
use o2s_writer::SwiftWriterConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Verbosity of the stderr log. Accepted case-insensitively on the command
/// line; the config file takes the lowercase names.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    #[serde(alias = "warning")]
    #[value(alias = "warning")]
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Root directory for emitted `.swift` files.
    pub directory: PathBuf,
    /// One indentation level of emitted code.
    pub indent: String,
    /// Leading comment block listing the preprocessor directives of each
    /// source file.
    pub source_comments: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("out"),
            indent: "    ".to_string(),
            source_comments: true,
        }
    }
}

impl OutputConfig {
    pub fn writer_config(&self) -> SwiftWriterConfig {
        SwiftWriterConfig {
            indent: self.indent.clone(),
            include_source_comments: self.source_comments,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PassesConfig {
    /// Pass names in execution order.
    pub enabled: Vec<String>,
}

impl Default for PassesConfig {
    fn default() -> Self {
        Self {
            enabled: DEFAULT_PASS_NAMES.iter().map(|name| name.to_string()).collect(),
        }
    }
}

/// Parallelism of the parse and build stage. Passes always run on one
/// thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallelConfig {
    pub worker_threads: usize,
    pub parallel_parsing: bool,
}

impl ParallelConfig {
    pub fn new(parallel_parsing: bool, worker_threads: usize) -> Self {
        Self {
            worker_threads,
            parallel_parsing,
        }
        .sanitized()
    }

    /// Single worker, files processed in input order on the calling thread.
    pub fn deterministic() -> Self {
        Self {
            worker_threads: 1,
            parallel_parsing: false,
        }
    }

    /// At least one worker, and exactly one when parallel parsing is off.
    pub fn sanitized(mut self) -> Self {
        if self.worker_threads == 0 {
            self.worker_threads = 1;
        }
        if !self.parallel_parsing {
            self.worker_threads = 1;
        }
        self
    }

    pub fn effective_workers(&self) -> usize {
        self.sanitized().worker_threads
    }
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self::deterministic()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: Option<LogLevel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RewriterConfig {
    pub output: OutputConfig,
    pub passes: PassesConfig,
    pub parallel: ParallelConfig,
    pub logging: LoggingConfig,
}

impl RewriterConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: RewriterConfig = toml::from_str(text)?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Applies override layers in order; later layers win.
    pub fn with_layers(mut self, layers: &[ConfigLayer]) -> Self {
        for layer in layers {
            self.apply_layer(layer);
        }
        self.parallel = self.parallel.sanitized();
        self
    }

    fn apply_layer(&mut self, layer: &ConfigLayer) {
        if let Some(directory) = &layer.output_directory {
            self.output.directory = directory.clone();
        }
        if let Some(indent) = &layer.indent {
            self.output.indent = indent.clone();
        }
        if let Some(passes) = &layer.passes {
            self.passes.enabled = passes.clone();
        }
        if let Some(worker_threads) = layer.worker_threads {
            self.parallel.worker_threads = worker_threads;
        }
        if let Some(parallel_parsing) = layer.parallel_parsing {
            self.parallel.parallel_parsing = parallel_parsing;
        }
        if let Some(level) = layer.log_level {
            self.logging.level = Some(level);
        }
    }
}

/// Overrides coming from outside the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfigLayer {
    pub output_directory: Option<PathBuf>,
    pub indent: Option<String>,
    pub passes: Option<Vec<String>>,
    pub worker_threads: Option<usize>,
    pub parallel_parsing: Option<bool>,
    pub log_level: Option<LogLevel>,
}

impl ConfigLayer {
    /// Applies this layer alone on top of `config`.
    pub fn apply(&self, config: RewriterConfig) -> RewriterConfig {
        config.with_layers(std::slice::from_ref(self))
    }

    pub fn is_empty(&self) -> bool {
        self.output_directory.is_none()
            && self.indent.is_none()
            && self.passes.is_none()
            && self.worker_threads.is_none()
            && self.parallel_parsing.is_none()
            && self.log_level.is_none()
    }
}
