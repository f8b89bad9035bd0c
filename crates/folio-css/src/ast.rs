//! Raw CSS tree shared by the parser, the renamers and the code generator.
//!
//! The tree is deliberately untyped: at-rule preludes, selectors and
//! declaration values are stored as canonical text so unknown at-rules and
//! unknown properties survive a parse/generate round trip untouched. Every
//! node carries the source location it was parsed at; replacement nodes
//! copy the location of the node they replace.

use cssparser::SourceLocation;

/// One node in a stylesheet or inside a block.
#[derive(Debug, Clone, PartialEq)]
pub enum CssNode {
    Rule(RuleNode),
    AtRule(AtRuleNode),
    Declaration(Declaration),
}

/// An ordinary qualified rule: `selector, selector { ... }`.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleNode {
    pub selectors: Vec<String>,
    pub block: Vec<CssNode>,
    pub loc: SourceLocation,
}

/// An at-rule: `@name prelude;` or `@name prelude { ... }`.
#[derive(Debug, Clone, PartialEq)]
pub struct AtRuleNode {
    pub name: String,
    pub prelude: Option<String>,
    pub block: Option<Vec<CssNode>>,
    pub loc: SourceLocation,
}

/// A `property: value` pair inside a block.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
    pub important: bool,
    pub loc: SourceLocation,
}

impl CssNode {
    /// The node's ordered child list, if it has one.
    pub fn children(&self) -> Option<&[CssNode]> {
        match self {
            CssNode::Rule(rule) => Some(&rule.block),
            CssNode::AtRule(at_rule) => at_rule.block.as_deref(),
            CssNode::Declaration(_) => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<CssNode>> {
        match self {
            CssNode::Rule(rule) => Some(&mut rule.block),
            CssNode::AtRule(at_rule) => at_rule.block.as_mut(),
            CssNode::Declaration(_) => None,
        }
    }
}

/// Index path from the stylesheet root to one node: each step is the
/// node's position in its parent's sibling list. Paths stay valid across
/// in-place [`Stylesheet::replace`] calls, which is what lets the renamers
/// collect every match before mutating anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// The path of this node's `index`-th child.
    pub fn child(&self, index: usize) -> Self {
        let mut steps = self.0.clone();
        steps.push(index);
        Self(steps)
    }

    pub fn steps(&self) -> &[usize] {
        &self.0
    }
}

impl From<Vec<usize>> for NodePath {
    fn from(steps: Vec<usize>) -> Self {
        Self(steps)
    }
}

/// An ordered sequence of top-level nodes, the root of all traversal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stylesheet {
    pub nodes: Vec<CssNode>,
}

impl Stylesheet {
    /// Look up the node addressed by `path`.
    pub fn node(&self, path: &NodePath) -> Option<&CssNode> {
        let (&first, rest) = path.0.split_first()?;
        let mut current = self.nodes.get(first)?;
        for &step in rest {
            current = current.children()?.get(step)?;
        }
        Some(current)
    }

    fn node_mut(&mut self, path: &NodePath) -> Option<&mut CssNode> {
        let (&first, rest) = path.0.split_first()?;
        let mut current = self.nodes.get_mut(first)?;
        for &step in rest {
            current = current.children_mut()?.get_mut(step)?;
        }
        Some(current)
    }

    /// Swap the node at `path` for `replacement`, keeping its position in
    /// the sibling list. Returns false if the path no longer resolves.
    pub fn replace(&mut self, path: &NodePath, replacement: CssNode) -> bool {
        match self.node_mut(path) {
            Some(slot) => {
                *slot = replacement;
                true
            }
            None => false,
        }
    }

    /// Remove and return the node at `path`. Later siblings shift down, so
    /// batched removals must run in reverse document order.
    pub fn remove(&mut self, path: &NodePath) -> Option<CssNode> {
        let (&last, parent_steps) = path.0.split_last()?;
        let list = if parent_steps.is_empty() {
            &mut self.nodes
        } else {
            let parent = self.node_mut(&NodePath(parent_steps.to_vec()))?;
            parent.children_mut()?
        };
        if last < list.len() {
            Some(list.remove(last))
        } else {
            None
        }
    }
}
