//! Paged-media CSS rewrite toolkit.
//!
//! Folio turns stylesheets written against the paged-media CSS features
//! (`@page` and its margin boxes, print-only properties, layout value
//! tokens) into ordinary selector-based CSS that a DOM-driven layout
//! engine can consume. The work happens in two stages: the resolver in
//! [`folio_io`] assembles a complete CSS text by following `@import`
//! chains, and the rewrite engine in [`folio_css`] renames at-rules,
//! properties and values according to ordered dictionary tables.

pub use folio_css::{
    AtRuleNode, AtRuleRename, CssNode, Declaration, NodePath, PreludeParts, PropertyRename,
    RenameDictionary, Replacement, ReplacementContext, Result, RewriteError, RuleNode, Stylesheet,
    ValueRename, Visitor, decompose_prelude, generate, parse, rename_at_rule,
    rename_content_value, rename_property, rename_value, rewrite_id_selectors, walk,
};
pub use folio_io::{
    FetchError, FetchResult, Fetcher, FileFetcher, HttpFetcher, SchemeFetcher, StylesheetResolver,
};
