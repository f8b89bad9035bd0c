//! Rename primitives: at-rule to rule conversion, property renames and
//! value renames.
//!
//! Every operation follows the same two-phase protocol: a read-only walk
//! collects the paths of all matches, then the replacements are applied
//! through [`Stylesheet::replace`]. Replacements are one-for-one and keep
//! sibling positions, so the collected paths stay valid while the batch is
//! applied. Missing arguments (empty name, value or selector) are silent
//! no-ops across all operations.

use std::fmt;
use std::sync::Arc;

use crate::ast::{AtRuleNode, CssNode, Declaration, NodePath, RuleNode, Stylesheet};
use crate::error::{Result, RewriteError};
use crate::parser::{parse_selector_list, parse_value_text, rewrite_selector_ids};
use crate::walk::{Visitor, walk};

/// Read-only view of a matched declaration, handed to computed
/// replacements.
pub struct ReplacementContext<'a> {
    pub declaration: &'a Declaration,
    /// Rendered text of the declaration's value.
    pub value_text: &'a str,
}

/// A replacement: either a static string or a function deriving one from
/// the matched node. A computed replacement that returns `None` breaks the
/// contract and fails the enclosing rename call.
#[derive(Clone)]
pub enum Replacement {
    Static(String),
    Computed(Arc<dyn Fn(&ReplacementContext<'_>) -> Option<String> + Send + Sync>),
}

impl Replacement {
    /// Wrap a closure as a computed replacement.
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&ReplacementContext<'_>) -> Option<String> + Send + Sync + 'static,
    {
        Replacement::Computed(Arc::new(f))
    }

    fn resolve(&self, context: &ReplacementContext<'_>, target: &str) -> Result<String> {
        match self {
            Replacement::Static(text) => Ok(text.clone()),
            Replacement::Computed(derive) => {
                derive(context).ok_or_else(|| RewriteError::ReplacementContract {
                    target: target.to_owned(),
                })
            }
        }
    }
}

impl fmt::Debug for Replacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Replacement::Static(text) => f.debug_tuple("Static").field(text).finish(),
            Replacement::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl From<&str> for Replacement {
    fn from(text: &str) -> Self {
        Replacement::Static(text.to_owned())
    }
}

impl From<String> for Replacement {
    fn from(text: String) -> Self {
        Replacement::Static(text)
    }
}

/// Base name and pseudo qualifier extracted from an at-rule prelude.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreludeParts {
    pub name: Option<String>,
    pub pseudo: Option<String>,
}

/// Split an at-rule prelude into a named qualifier and a pseudo qualifier.
///
/// Only the first `:` separates the two; everything after it belongs to the
/// pseudo part and is not split again. A pseudo-function such as `nth(2)`
/// is normalized into the class-safe fragment `nth_2`. Empty parts are
/// absent.
pub fn decompose_prelude(prelude: Option<&str>) -> PreludeParts {
    let Some(prelude) = prelude else {
        return PreludeParts::default();
    };
    let (name, pseudo) = match prelude.split_once(':') {
        Some((name, pseudo)) => (name, Some(pseudo)),
        None => (prelude, None),
    };
    let name = name.trim();
    PreludeParts {
        name: (!name.is_empty()).then(|| name.to_owned()),
        pseudo: pseudo.and_then(|pseudo| {
            let pseudo = pseudo.trim().replace('(', "_").replace(')', "");
            (!pseudo.is_empty()).then_some(pseudo)
        }),
    }
}

fn synthesize_selector(replacement: &str, parts: &PreludeParts) -> String {
    let mut selector = replacement.to_owned();
    if let Some(name) = &parts.name {
        selector.push_str(".paged-name-");
        selector.push_str(name);
    }
    if let Some(pseudo) = &parts.pseudo {
        selector.push_str(".paged-pseudo-");
        selector.push_str(pseudo);
    }
    selector
}

struct AtRuleMatches<'a> {
    name: &'a str,
    paths: Vec<NodePath>,
}

impl Visitor for AtRuleMatches<'_> {
    fn visit_at_rule(&mut self, at_rule: &AtRuleNode, path: &NodePath) {
        if at_rule.name == self.name {
            self.paths.push(path.clone());
        }
    }
}

struct DeclarationMatches<F> {
    matches: F,
    paths: Vec<NodePath>,
}

impl<F: Fn(&Declaration) -> bool> Visitor for DeclarationMatches<F> {
    fn visit_declaration(&mut self, declaration: &Declaration, path: &NodePath) {
        if (self.matches)(declaration) {
            self.paths.push(path.clone());
        }
    }
}

/// Convert every `@<name>` at-rule in the tree into an ordinary rule.
///
/// The rule's selector is `selector` extended with `.paged-name-*` and
/// `.paged-pseudo-*` qualifiers taken from the at-rule's prelude; the
/// at-rule's block is carried over unchanged. At-rules that never match
/// are left untouched.
pub fn rename_at_rule(sheet: &mut Stylesheet, name: &str, selector: &str) {
    if name.is_empty() || selector.is_empty() {
        return;
    }
    let mut finder = AtRuleMatches {
        name,
        paths: Vec::new(),
    };
    walk(sheet, &mut finder);
    for path in finder.paths {
        let Some(CssNode::AtRule(at_rule)) = sheet.node(&path) else {
            continue;
        };
        let parts = decompose_prelude(at_rule.prelude.as_deref());
        let rule = RuleNode {
            selectors: parse_selector_list(&synthesize_selector(selector, &parts)),
            block: at_rule.block.clone().unwrap_or_default(),
            loc: at_rule.loc,
        };
        sheet.replace(&path, CssNode::Rule(rule));
    }
}

/// Rename every declaration whose property equals `property` (exact,
/// case-sensitive). The value, the `!important` flag and the source
/// location carry over. Returns the number of rewritten declarations.
pub fn rename_property(
    sheet: &mut Stylesheet,
    property: &str,
    replacement: &Replacement,
) -> Result<usize> {
    if property.is_empty() {
        return Ok(0);
    }
    let mut finder = DeclarationMatches {
        matches: |declaration: &Declaration| declaration.property == property,
        paths: Vec::new(),
    };
    walk(sheet, &mut finder);
    let mut renamed = 0;
    for path in finder.paths {
        let Some(CssNode::Declaration(declaration)) = sheet.node(&path) else {
            continue;
        };
        let context = ReplacementContext {
            declaration,
            value_text: &declaration.value,
        };
        let renamed_property = replacement.resolve(&context, property)?;
        let replacement_node = Declaration {
            property: renamed_property,
            value: declaration.value.clone(),
            important: declaration.important,
            loc: declaration.loc,
        };
        sheet.replace(&path, CssNode::Declaration(replacement_node));
        renamed += 1;
    }
    Ok(renamed)
}

/// Rename every declaration value whose rendered text equals `value`,
/// optionally restricted to declarations of one `property`. The
/// replacement text is re-tokenized in value context before it is stored.
pub fn rename_value(
    sheet: &mut Stylesheet,
    value: &str,
    replacement: &Replacement,
    property: Option<&str>,
) -> Result<usize> {
    if value.is_empty() {
        return Ok(0);
    }
    rename_matching_values(sheet, replacement, value, |declaration| {
        property.is_none_or(|scope| declaration.property == scope) && declaration.value == value
    })
}

/// Rename `content` declaration values that equal or contain `search`.
/// Computed replacements receive the full value text, which is what makes
/// partial rewrites inside quoted content strings possible.
pub fn rename_content_value(
    sheet: &mut Stylesheet,
    search: &str,
    replacement: &Replacement,
) -> Result<usize> {
    if search.is_empty() {
        return Ok(0);
    }
    rename_matching_values(sheet, replacement, search, |declaration| {
        declaration.property == "content" && declaration.value.contains(search)
    })
}

fn rename_matching_values(
    sheet: &mut Stylesheet,
    replacement: &Replacement,
    target: &str,
    matches: impl Fn(&Declaration) -> bool,
) -> Result<usize> {
    let mut finder = DeclarationMatches {
        matches,
        paths: Vec::new(),
    };
    walk(sheet, &mut finder);
    let mut renamed = 0;
    for path in finder.paths {
        let Some(CssNode::Declaration(declaration)) = sheet.node(&path) else {
            continue;
        };
        let context = ReplacementContext {
            declaration,
            value_text: &declaration.value,
        };
        let new_value = replacement.resolve(&context, target)?;
        let replacement_node = Declaration {
            property: declaration.property.clone(),
            value: parse_value_text(&new_value),
            important: declaration.important,
            loc: declaration.loc,
        };
        sheet.replace(&path, CssNode::Declaration(replacement_node));
        renamed += 1;
    }
    Ok(renamed)
}

/// Rewrite `#id` selector fragments in every rule into `[data-id="id"]`
/// attribute selectors, for documents addressed by data attribute instead
/// of id.
pub fn rewrite_id_selectors(sheet: &mut Stylesheet) {
    struct RulesWithIds {
        paths: Vec<NodePath>,
    }

    impl Visitor for RulesWithIds {
        fn visit_rule(&mut self, rule: &RuleNode, path: &NodePath) {
            if rule.selectors.iter().any(|selector| selector.contains('#')) {
                self.paths.push(path.clone());
            }
        }
    }

    let mut finder = RulesWithIds { paths: Vec::new() };
    walk(sheet, &mut finder);
    for path in finder.paths {
        let Some(CssNode::Rule(rule)) = sheet.node(&path) else {
            continue;
        };
        let rewritten = RuleNode {
            selectors: rule
                .selectors
                .iter()
                .map(|selector| rewrite_selector_ids(selector))
                .collect(),
            block: rule.block.clone(),
            loc: rule.loc,
        };
        sheet.replace(&path, CssNode::Rule(rewritten));
    }
}
