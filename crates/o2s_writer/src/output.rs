// o2s_writer/output - Line sinks with scoped indentation
use crate::error::WriterError;
use indexmap::IndexMap;
use std::fs;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use tracing::debug;

/// Line-oriented sink for one emitted file.
pub trait OutputTarget {
    /// Writes `line` at the current indentation. Empty lines carry no
    /// indentation.
    fn output_line(&mut self, line: &str);

    fn increase_indent(&mut self);

    fn decrease_indent(&mut self);

    /// Flushes the file to wherever the owning [`WriterOutput`] keeps it.
    fn finish(self: Box<Self>) -> Result<(), WriterError>;
}

/// Factory of per-file output targets.
pub trait WriterOutput {
    fn create_file(&mut self, path: &str) -> Result<Box<dyn OutputTarget + '_>, WriterError>;
}

/// Indents its target for as long as it lives.
pub struct IndentGuard<'a, T: OutputTarget + ?Sized> {
    target: &'a mut T,
}

impl<'a, T: OutputTarget + ?Sized> IndentGuard<'a, T> {
    pub fn new(target: &'a mut T) -> Self {
        target.increase_indent();
        Self { target }
    }
}

impl<T: OutputTarget + ?Sized> Deref for IndentGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.target
    }
}

impl<T: OutputTarget + ?Sized> DerefMut for IndentGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.target
    }
}

impl<T: OutputTarget + ?Sized> Drop for IndentGuard<'_, T> {
    fn drop(&mut self) {
        self.target.decrease_indent();
    }
}

/// Runs `body` one indentation level deeper. The level is restored when
/// `body` returns, including early returns and unwinding.
pub fn indented<T, R>(target: &mut T, body: impl FnOnce(&mut T) -> R) -> R
where
    T: OutputTarget + ?Sized,
{
    let mut guard = IndentGuard::new(target);
    body(&mut *guard)
}

/// Utility that incrementally constructs source text with indentation
/// handling.
#[derive(Debug, Default, Clone)]
pub struct StringOutputTarget {
    content: String,
    indent_level: usize,
    indent: String,
}

impl StringOutputTarget {
    pub fn new(indent: impl Into<String>) -> Self {
        Self {
            content: String::new(),
            indent_level: 0,
            indent: indent.into(),
        }
    }

    pub fn push_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.content.push_str(&self.indent);
        }
    }

    pub fn indent_level(&self) -> usize {
        self.indent_level
    }

    pub fn as_str(&self) -> &str {
        &self.content
    }

    pub fn build(self) -> String {
        self.content
    }

    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }
}

impl OutputTarget for StringOutputTarget {
    fn output_line(&mut self, line: &str) {
        if !line.is_empty() {
            self.push_indent();
            self.content.push_str(line);
        }
        self.content.push('\n');
    }

    fn increase_indent(&mut self) {
        self.indent_level += 1;
    }

    fn decrease_indent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    fn finish(self: Box<Self>) -> Result<(), WriterError> {
        Ok(())
    }
}

/// Keeps emitted files in memory, keyed by path in creation order. A file
/// created twice is replaced.
#[derive(Debug, Clone, Default)]
pub struct MemoryWriterOutput {
    indent: String,
    files: IndexMap<String, String>,
}

impl MemoryWriterOutput {
    pub fn new(indent: impl Into<String>) -> Self {
        Self {
            indent: indent.into(),
            files: IndexMap::new(),
        }
    }

    pub fn file(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    pub fn files(&self) -> &IndexMap<String, String> {
        &self.files
    }

    pub fn into_files(self) -> IndexMap<String, String> {
        self.files
    }
}

struct MemoryFileTarget<'a> {
    path: String,
    buffer: StringOutputTarget,
    files: &'a mut IndexMap<String, String>,
}

impl OutputTarget for MemoryFileTarget<'_> {
    fn output_line(&mut self, line: &str) {
        self.buffer.output_line(line);
    }

    fn increase_indent(&mut self) {
        self.buffer.increase_indent();
    }

    fn decrease_indent(&mut self) {
        self.buffer.decrease_indent();
    }

    fn finish(self: Box<Self>) -> Result<(), WriterError> {
        let MemoryFileTarget {
            path,
            buffer,
            files,
        } = *self;
        files.insert(path, buffer.build());
        Ok(())
    }
}

impl WriterOutput for MemoryWriterOutput {
    fn create_file(&mut self, path: &str) -> Result<Box<dyn OutputTarget + '_>, WriterError> {
        Ok(Box::new(MemoryFileTarget {
            path: path.to_string(),
            buffer: StringOutputTarget::new(self.indent.clone()),
            files: &mut self.files,
        }))
    }
}

/// Writes files below a root directory, creating parent directories on
/// demand. Nothing touches the disk until a target is finished.
#[derive(Debug, Clone)]
pub struct DiskWriterOutput {
    root: PathBuf,
    indent: String,
}

impl DiskWriterOutput {
    pub fn new(root: impl Into<PathBuf>, indent: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            indent: indent.into(),
        }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
}

struct DiskFileTarget {
    path: PathBuf,
    buffer: StringOutputTarget,
}

impl OutputTarget for DiskFileTarget {
    fn output_line(&mut self, line: &str) {
        self.buffer.output_line(line);
    }

    fn increase_indent(&mut self) {
        self.buffer.increase_indent();
    }

    fn decrease_indent(&mut self) {
        self.buffer.decrease_indent();
    }

    fn finish(self: Box<Self>) -> Result<(), WriterError> {
        let DiskFileTarget { path, buffer } = *self;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| WriterError::io(parent, source))?;
        }
        fs::write(&path, buffer.build()).map_err(|source| WriterError::io(&path, source))?;
        debug!(path = %path.display(), "wrote file");
        Ok(())
    }
}

impl WriterOutput for DiskWriterOutput {
    fn create_file(&mut self, path: &str) -> Result<Box<dyn OutputTarget + '_>, WriterError> {
        Ok(Box::new(DiskFileTarget {
            path: self.root.join(path),
            buffer: StringOutputTarget::new(self.indent.clone()),
        }))
    }
}
