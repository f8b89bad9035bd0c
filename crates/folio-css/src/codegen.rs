//! Tree back to CSS text.
//!
//! Output is compact: no indentation, single `;` separators, no trailing
//! semicolon before a closing brace. Blockless at-rules always keep their
//! terminating semicolon.

use crate::ast::{CssNode, Stylesheet};

/// Generate CSS source text for the whole tree.
pub fn generate(sheet: &Stylesheet) -> String {
    let mut out = String::new();
    write_nodes(&sheet.nodes, &mut out);
    out
}

impl Stylesheet {
    /// Generate CSS source text; see [`generate`].
    pub fn to_css_string(&self) -> String {
        generate(self)
    }
}

fn write_nodes(nodes: &[CssNode], out: &mut String) {
    for (index, node) in nodes.iter().enumerate() {
        let last = index + 1 == nodes.len();
        match node {
            CssNode::Declaration(declaration) => {
                out.push_str(&declaration.property);
                out.push(':');
                out.push_str(&declaration.value);
                if declaration.important {
                    out.push_str("!important");
                }
                if !last {
                    out.push(';');
                }
            }
            CssNode::Rule(rule) => {
                out.push_str(&rule.selectors.join(","));
                out.push('{');
                write_nodes(&rule.block, out);
                out.push('}');
            }
            CssNode::AtRule(at_rule) => {
                out.push('@');
                out.push_str(&at_rule.name);
                if let Some(prelude) = &at_rule.prelude {
                    out.push(' ');
                    out.push_str(prelude);
                }
                match &at_rule.block {
                    Some(block) => {
                        out.push('{');
                        write_nodes(block, out);
                        out.push('}');
                    }
                    None => out.push(';'),
                }
            }
        }
    }
}
