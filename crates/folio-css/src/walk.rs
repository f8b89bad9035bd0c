//! Pre-order traversal with sibling-list paths.

use crate::ast::{AtRuleNode, CssNode, Declaration, NodePath, RuleNode, Stylesheet};

/// Callbacks invoked while walking a stylesheet. Implementations override
/// the node kinds they care about; each callback receives the node and the
/// path that addresses it, usable with [`Stylesheet::replace`] or
/// [`Stylesheet::remove`] once the walk has finished. The tree itself is
/// never handed out mutably during a walk.
pub trait Visitor {
    fn visit_rule(&mut self, _rule: &RuleNode, _path: &NodePath) {}
    fn visit_at_rule(&mut self, _at_rule: &AtRuleNode, _path: &NodePath) {}
    fn visit_declaration(&mut self, _declaration: &Declaration, _path: &NodePath) {}
}

/// Walk the tree in document order, parents before their blocks.
pub fn walk<V: Visitor + ?Sized>(sheet: &Stylesheet, visitor: &mut V) {
    walk_list(&sheet.nodes, &NodePath::new(), visitor);
}

fn walk_list<V: Visitor + ?Sized>(nodes: &[CssNode], parent: &NodePath, visitor: &mut V) {
    for (index, node) in nodes.iter().enumerate() {
        let path = parent.child(index);
        match node {
            CssNode::Rule(rule) => {
                visitor.visit_rule(rule, &path);
                walk_list(&rule.block, &path, visitor);
            }
            CssNode::AtRule(at_rule) => {
                visitor.visit_at_rule(at_rule, &path);
                if let Some(block) = &at_rule.block {
                    walk_list(block, &path, visitor);
                }
            }
            CssNode::Declaration(declaration) => visitor.visit_declaration(declaration, &path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[derive(Default)]
    struct Trace {
        events: Vec<(String, Vec<usize>)>,
    }

    impl Visitor for Trace {
        fn visit_rule(&mut self, rule: &RuleNode, path: &NodePath) {
            self.events
                .push((format!("rule {}", rule.selectors.join(",")), path.steps().to_vec()));
        }

        fn visit_at_rule(&mut self, at_rule: &AtRuleNode, path: &NodePath) {
            self.events
                .push((format!("at {}", at_rule.name), path.steps().to_vec()));
        }

        fn visit_declaration(&mut self, declaration: &Declaration, path: &NodePath) {
            self.events
                .push((format!("decl {}", declaration.property), path.steps().to_vec()));
        }
    }

    #[test]
    fn document_order_with_paths() {
        let sheet = parse("@page { @footnotes { display: block; } color: red; } p { margin: 0; }");
        let mut trace = Trace::default();
        walk(&sheet, &mut trace);
        let expected: Vec<(String, Vec<usize>)> = vec![
            ("at page".into(), vec![0]),
            ("at footnotes".into(), vec![0, 0]),
            ("decl display".into(), vec![0, 0, 0]),
            ("decl color".into(), vec![0, 1]),
            ("rule p".into(), vec![1]),
            ("decl margin".into(), vec![1, 0]),
        ];
        assert_eq!(trace.events, expected);
    }
}
