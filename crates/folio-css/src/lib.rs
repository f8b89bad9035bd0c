//! Paged-media CSS rewrite engine.
//!
//! Parses CSS into a raw tree, renames paged-media constructs according to
//! ordered dictionary tables, and generates CSS text back out. At-rules
//! such as `@page intro:right { ... }` become ordinary class rules
//! (`.paged-page.paged-name-intro.paged-pseudo-right { ... }`), print-only
//! properties become custom properties, and layout-feature values move
//! behind `var()` indirections, so a DOM-based layout engine without
//! native paged-media support can consume the result.

pub mod ast;
pub mod codegen;
pub mod dictionary;
pub mod error;
pub mod parser;
pub mod rename;
pub mod walk;

pub use ast::{AtRuleNode, CssNode, Declaration, NodePath, RuleNode, Stylesheet};
pub use codegen::generate;
pub use dictionary::{AtRuleRename, PropertyRename, RenameDictionary, ValueRename};
pub use error::{Result, RewriteError};
pub use parser::{parse, parse_selector_list, parse_value_text};
pub use rename::{
    PreludeParts, Replacement, ReplacementContext, decompose_prelude, rename_at_rule,
    rename_content_value, rename_property, rename_value, rewrite_id_selectors,
};
pub use walk::{Visitor, walk};
