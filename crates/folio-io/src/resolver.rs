//! Recursive `@import` resolution.
//!
//! One resolution assembles a complete CSS text for a stylesheet URL:
//! imports are fetched depth-first and concatenated (in source order)
//! ahead of the importer's own rules, with the `@import` statements
//! stripped from the output. A per-resolution visited set guarantees
//! termination on cyclic graphs; fetch failures degrade to empty content
//! so one broken sheet never aborts the rest.

use std::collections::HashSet;
use std::thread;

use folio_css::{AtRuleNode, NodePath, Stylesheet, Visitor, generate, parse, walk};
use tracing::warn;
use url::Url;

use crate::fetch::Fetcher;

/// Assembles complete CSS texts by following `@import` chains.
pub struct StylesheetResolver<'a> {
    fetcher: &'a dyn Fetcher,
}

impl<'a> StylesheetResolver<'a> {
    pub fn new(fetcher: &'a dyn Fetcher) -> Self {
        Self { fetcher }
    }

    /// Resolve one stylesheet and everything it imports into a single CSS
    /// text. Each call tracks its own visited set, so repeated calls are
    /// independent.
    pub fn resolve(&self, url: &Url) -> String {
        let mut seen = HashSet::new();
        self.resolve_with_seen(url, &mut seen)
    }

    /// Resolve several independent stylesheets, one worker thread each;
    /// total latency is bounded by the slowest sheet, not the sum.
    /// Results come back in input order.
    pub fn resolve_all(&self, urls: &[Url]) -> Vec<String> {
        thread::scope(|scope| {
            let handles: Vec<_> = urls
                .iter()
                .map(|url| scope.spawn(move || self.resolve(url)))
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap_or_default())
                .collect()
        })
    }

    fn resolve_with_seen(&self, url: &Url, seen: &mut HashSet<Url>) -> String {
        if !seen.insert(url.clone()) {
            warn!(%url, "stylesheet already visited in this resolution, skipping");
            return String::new();
        }
        let text = match self.fetcher.fetch(url) {
            Ok(text) => text,
            Err(error) => {
                warn!(%url, %error, "could not fetch stylesheet");
                return String::new();
            }
        };
        let mut sheet = parse(&text);
        let imports = strip_imports(&mut sheet);
        let mut out = String::new();
        for target in imports {
            match url.join(&target) {
                Ok(child) => out.push_str(&self.resolve_with_seen(&child, seen)),
                Err(error) => {
                    warn!(%url, target, %error, "unresolvable import target");
                }
            }
        }
        out.push_str(&generate(&sheet));
        out
    }
}

struct ImportCollector {
    targets: Vec<String>,
    paths: Vec<NodePath>,
}

impl Visitor for ImportCollector {
    fn visit_at_rule(&mut self, at_rule: &AtRuleNode, path: &NodePath) {
        if at_rule.name.eq_ignore_ascii_case("import") {
            if let Some(target) = at_rule.prelude.as_deref().and_then(import_target) {
                self.targets.push(target);
            } else {
                warn!(line = at_rule.loc.line, "import without a usable target");
            }
            self.paths.push(path.clone());
        }
    }
}

/// Remove every `@import` from `sheet`, returning the import targets in
/// source order.
fn strip_imports(sheet: &mut Stylesheet) -> Vec<String> {
    let mut collector = ImportCollector {
        targets: Vec::new(),
        paths: Vec::new(),
    };
    walk(sheet, &mut collector);
    // Reverse document order keeps the remaining paths valid as siblings
    // shift down.
    for path in collector.paths.iter().rev() {
        sheet.remove(path);
    }
    collector.targets
}

/// Extract the target URL from an `@import` prelude, stripping `url(...)`
/// and quote wrapping. Media queries after the target are ignored.
fn import_target(prelude: &str) -> Option<String> {
    let mut input = cssparser::ParserInput::new(prelude);
    let mut parser = cssparser::Parser::new(&mut input);
    let token = parser.next().ok()?.clone();
    match token {
        cssparser::Token::UnquotedUrl(target) | cssparser::Token::QuotedString(target) => {
            Some(target.as_ref().to_owned())
        }
        cssparser::Token::Function(name) if name.eq_ignore_ascii_case("url") => parser
            .parse_nested_block(|arguments| {
                let target = arguments.expect_string()?.as_ref().to_owned();
                Ok::<_, cssparser::ParseError<'_, ()>>(target)
            })
            .ok(),
        _ => None,
    }
}
