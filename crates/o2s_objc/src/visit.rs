// o2s_objc/visit - Visitor over Objective-C syntax trees
use crate::node::ObjcNode;
use o2s_ast::VisitAction;

/// Hooks called by [`traverse`]. `exit` is always paired with `enter`, even
/// when `visit` skips the children, so visitors can keep context stacks
/// balanced by pushing in `enter` and popping in `exit`.
pub trait ObjcNodeVisitor {
    fn enter(&mut self, _node: &ObjcNode) {}

    fn visit(&mut self, _node: &ObjcNode) -> VisitAction {
        VisitAction::Continue
    }

    fn exit(&mut self, _node: &ObjcNode) {}
}

pub fn traverse<V: ObjcNodeVisitor + ?Sized>(visitor: &mut V, node: &ObjcNode) {
    visitor.enter(node);
    if visitor.visit(node) == VisitAction::Continue {
        for child in &node.children {
            traverse(visitor, child);
        }
    }
    visitor.exit(node);
}
