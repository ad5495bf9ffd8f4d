// o2s_objc/diagnostics - Diagnostics sink for parse and build problems
use o2s_ast::Span;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: Option<String>,
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(file: Option<String>, line: usize, column: usize) -> Self {
        Self { file, line, column }
    }

    pub fn from_span(file: Option<&str>, span: &Span) -> Self {
        Self::new(file.map(str::to_string), span.start_line, span.start_column)
    }

    pub fn unknown() -> Self {
        Self::default()
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.file.as_deref().unwrap_or("<unknown>"),
            self.line,
            self.column
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub location: SourceLocation,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.location, self.severity, self.message)
    }
}

/// Receiver of user-facing problems. Recording never fails.
pub trait DiagnosticsSink {
    fn record(&mut self, severity: Severity, message: String, location: SourceLocation);

    fn error(&mut self, message: impl Into<String>, location: SourceLocation)
    where
        Self: Sized,
    {
        self.record(Severity::Error, message.into(), location);
    }

    fn warning(&mut self, message: impl Into<String>, location: SourceLocation)
    where
        Self: Sized,
    {
        self.record(Severity::Warning, message.into(), location);
    }
}

/// Accumulating sink.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items
            .iter()
            .filter(|diagnostic| diagnostic.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items
            .iter()
            .filter(|diagnostic| diagnostic.severity == Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Appends the records of another sink, keeping their order.
    pub fn merge(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

impl DiagnosticsSink for Diagnostics {
    fn record(&mut self, severity: Severity, message: String, location: SourceLocation) {
        match severity {
            Severity::Error | Severity::Warning => {
                warn!(target: "o2s::diagnostics", %severity, %location, "{}", message)
            }
            Severity::Note => debug!(target: "o2s::diagnostics", %location, "{}", message),
        }
        self.items.push(Diagnostic {
            severity,
            message,
            location,
        });
    }
}
