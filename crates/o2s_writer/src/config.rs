// o2s_writer/config - Options that shape emitted Swift
use serde::{Deserialize, Serialize};

/// Configuration options for [`SwiftWriter`](crate::SwiftWriter).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwiftWriterConfig {
    /// Indentation unit used by the output targets.
    pub indent: String,
    /// Whether each file starts with a comment naming its Objective-C source
    /// and the preprocessor directives found in it.
    pub include_source_comments: bool,
}

impl Default for SwiftWriterConfig {
    fn default() -> Self {
        Self {
            indent: "    ".to_string(),
            include_source_comments: true,
        }
    }
}
