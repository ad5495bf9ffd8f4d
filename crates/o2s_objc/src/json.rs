// o2s_objc/json - Syntax trees serialized as JSON by the external parser
use crate::diagnostics::{DiagnosticsSink, Severity, SourceLocation};
use crate::node::{ObjcNode, ObjcNodeKind};
use o2s_ast::Span;
use tracing::debug;

/// Produces the syntax tree for one source file.
///
/// Problems are reported to `diagnostics`; the returned tree is always
/// usable, possibly containing `Unknown` nodes.
pub trait SyntaxTreeProvider: Send + Sync {
    fn parse(
        &self,
        source_name: &str,
        text: &str,
        diagnostics: &mut dyn DiagnosticsSink,
    ) -> ObjcNode;
}

/// Reads trees emitted by the parser as JSON documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSyntaxTreeProvider;

impl JsonSyntaxTreeProvider {
    pub fn new() -> Self {
        Self
    }
}

impl SyntaxTreeProvider for JsonSyntaxTreeProvider {
    fn parse(
        &self,
        source_name: &str,
        text: &str,
        diagnostics: &mut dyn DiagnosticsSink,
    ) -> ObjcNode {
        match serde_json::from_str::<ObjcNode>(text) {
            Ok(node) => {
                debug!(source = source_name, nodes = node.node_count(), "loaded syntax tree");
                node
            }
            Err(error) => {
                let span = Span::new(error.line(), error.column(), error.line(), error.column());
                diagnostics.record(
                    Severity::Error,
                    format!("malformed syntax tree: {}", error),
                    SourceLocation::from_span(Some(source_name), &span),
                );
                ObjcNode::new(ObjcNodeKind::GlobalContext).with_children(vec![ObjcNode::new(
                    ObjcNodeKind::Unknown {
                        text: text.to_string(),
                    },
                )
                .with_span(span)])
            }
        }
    }
}
