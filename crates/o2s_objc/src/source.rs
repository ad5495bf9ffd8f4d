// o2s_objc/source - Input sources consumed by the rewriter
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// One input file.
pub trait InputSource: Send + Sync {
    fn source_name(&self) -> &str;

    fn load_source(&self) -> io::Result<String>;
}

pub trait InputSourcesProvider {
    fn sources(&self) -> Vec<Box<dyn InputSource>>;
}

#[derive(Debug, Clone)]
pub struct FileInputSource {
    path: PathBuf,
    name: String,
}

impl FileInputSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.to_string_lossy().into_owned();
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl InputSource for FileInputSource {
    fn source_name(&self) -> &str {
        &self.name
    }

    fn load_source(&self) -> io::Result<String> {
        fs::read_to_string(&self.path)
    }
}

/// In-memory source, mostly for tests and embedding.
#[derive(Debug, Clone)]
pub struct StringInputSource {
    name: String,
    contents: String,
}

impl StringInputSource {
    pub fn new(name: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }
}

impl InputSource for StringInputSource {
    fn source_name(&self) -> &str {
        &self.name
    }

    fn load_source(&self) -> io::Result<String> {
        Ok(self.contents.clone())
    }
}

/// Provides a fixed list of file paths, in the order given.
#[derive(Debug, Clone, Default)]
pub struct FileInputProvider {
    files: Vec<PathBuf>,
}

impl FileInputProvider {
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self { files }
    }
}

impl InputSourcesProvider for FileInputProvider {
    fn sources(&self) -> Vec<Box<dyn InputSource>> {
        self.files
            .iter()
            .map(|path| Box::new(FileInputSource::new(path.clone())) as Box<dyn InputSource>)
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryInputProvider {
    sources: Vec<StringInputSource>,
}

impl MemoryInputProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, name: impl Into<String>, contents: impl Into<String>) -> Self {
        self.sources.push(StringInputSource::new(name, contents));
        self
    }
}

impl InputSourcesProvider for MemoryInputProvider {
    fn sources(&self) -> Vec<Box<dyn InputSource>> {
        self.sources
            .iter()
            .map(|source| Box::new(source.clone()) as Box<dyn InputSource>)
            .collect()
    }
}
