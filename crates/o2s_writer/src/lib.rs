// o2s_writer - Swift emission for finished intention graphs
//! Output sinks ([`WriterOutput`], [`OutputTarget`]) and the
//! [`SwiftWriter`] that walks an intention graph and prints each file's
//! declarations in a fixed order.

pub mod config;
pub mod error;
pub mod output;
pub mod swift_writer;

pub use config::SwiftWriterConfig;
pub use error::WriterError;
pub use output::{
    indented, DiskWriterOutput, IndentGuard, MemoryWriterOutput, OutputTarget,
    StringOutputTarget, WriterOutput,
};
pub use swift_writer::SwiftWriter;

#[cfg(test)]
mod tests;
