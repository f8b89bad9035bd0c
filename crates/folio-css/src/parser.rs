//! CSS text to tree, built on the cssparser tokenizer.
//!
//! The grammar followed here is the CSS core grammar: a prelude runs until
//! the next top-level `{` or `;`; a block makes the prelude a rule selector
//! (or at-rule prelude), a semicolon makes it a declaration. Prelude,
//! selector and value text is canonicalized by re-serializing its tokens,
//! which drops comments and collapses whitespace runs. Chunks that fit
//! neither form are skipped with a warning instead of failing the sheet.

use cssparser::{
    Delimiter, Delimiters, ParseError, Parser, ParserInput, SourceLocation, ToCss, Token,
    serialize_string,
};

use crate::ast::{AtRuleNode, CssNode, Declaration, RuleNode, Stylesheet};

/// Parse CSS source text into a [`Stylesheet`].
pub fn parse(css: &str) -> Stylesheet {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    Stylesheet {
        nodes: parse_node_list(&mut parser),
    }
}

impl Stylesheet {
    /// Parse CSS source text; see [`parse`].
    pub fn parse(css: &str) -> Self {
        parse(css)
    }
}

/// Canonical text rendering of a token sequence in value context: comments
/// dropped, whitespace collapsed, strings re-quoted.
pub fn parse_value_text(raw: &str) -> String {
    let mut input = ParserInput::new(raw);
    let mut parser = Parser::new(&mut input);
    let mut out = String::new();
    serialize_tokens(&mut parser, &mut out);
    out.trim().to_owned()
}

/// Split selector text on top-level commas, rendering each selector in
/// canonical form. Empty selectors are dropped.
pub fn parse_selector_list(raw: &str) -> Vec<String> {
    let mut input = ParserInput::new(raw);
    let mut parser = Parser::new(&mut input);
    let mut selectors = Vec::new();
    loop {
        let piece: Result<String, ParseError<'_, ()>> =
            parser.parse_until_before(Delimiter::Comma, |part| {
                let mut text = String::new();
                serialize_tokens(part, &mut text);
                Ok(text)
            });
        let piece = piece.map(|text| text.trim().to_owned()).unwrap_or_default();
        if !piece.is_empty() {
            selectors.push(piece);
        }
        // Consume the comma; end of input ends the list.
        if parser.next().is_err() {
            break;
        }
    }
    selectors
}

/// Rewrite every `#id` token in selector text into a `[data-id="id"]`
/// attribute selector, leaving the rest of the selector untouched.
pub(crate) fn rewrite_selector_ids(raw: &str) -> String {
    let mut input = ParserInput::new(raw);
    let mut parser = Parser::new(&mut input);
    let mut out = String::new();
    serialize_tokens_with(&mut parser, &mut out, &|token, out| match token {
        Token::IDHash(name) => {
            out.push_str("[data-id=");
            let _ = serialize_string(name.as_ref(), out);
            out.push(']');
            true
        }
        _ => false,
    });
    out.trim().to_owned()
}

fn parse_node_list(input: &mut Parser<'_, '_>) -> Vec<CssNode> {
    let mut nodes = Vec::new();
    loop {
        let state = input.state();
        let token = match input.next() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };
        match token {
            Token::CDO | Token::CDC => continue,
            Token::AtKeyword(name) => {
                let name = name.as_ref().to_owned();
                nodes.push(parse_at_rule(input, name, state.source_location()));
            }
            _ => {
                input.reset(&state);
                if let Some(node) = parse_rule_or_declaration(input) {
                    nodes.push(node);
                }
            }
        }
    }
    nodes
}

fn parse_at_rule(input: &mut Parser<'_, '_>, name: String, loc: SourceLocation) -> CssNode {
    let prelude_start = input.position();
    skip_to_delimiter(input, Delimiter::CurlyBracketBlock | Delimiter::Semicolon);
    let prelude = parse_value_text(input.slice_from(prelude_start));
    let prelude = (!prelude.is_empty()).then_some(prelude);
    let has_block = matches!(input.next(), Ok(&Token::CurlyBracketBlock));
    let block = if has_block {
        let parsed: Result<Vec<CssNode>, ParseError<'_, ()>> =
            input.parse_nested_block(|block_input| Ok(parse_node_list(block_input)));
        Some(parsed.unwrap_or_default())
    } else {
        // Consumed the terminating semicolon, or hit end of input.
        None
    };
    CssNode::AtRule(AtRuleNode {
        name,
        prelude,
        block,
        loc,
    })
}

fn parse_rule_or_declaration(input: &mut Parser<'_, '_>) -> Option<CssNode> {
    let loc = input.current_source_location();
    let prelude_start = input.position();
    skip_to_delimiter(input, Delimiter::CurlyBracketBlock | Delimiter::Semicolon);
    let prelude_raw = input.slice_from(prelude_start);
    let has_block = matches!(input.next(), Ok(&Token::CurlyBracketBlock));
    if has_block {
        let parsed: Result<Vec<CssNode>, ParseError<'_, ()>> =
            input.parse_nested_block(|block_input| Ok(parse_node_list(block_input)));
        let selectors = parse_selector_list(prelude_raw);
        if selectors.is_empty() {
            tracing::warn!(line = loc.line, "skipping rule with an empty selector list");
            return None;
        }
        Some(CssNode::Rule(RuleNode {
            selectors,
            block: parsed.unwrap_or_default(),
            loc,
        }))
    } else {
        declaration_from_raw(prelude_raw, loc)
    }
}

fn declaration_from_raw(raw: &str, loc: SourceLocation) -> Option<CssNode> {
    if raw.trim().is_empty() {
        return None;
    }
    let Some((head, tail)) = split_declaration(raw) else {
        tracing::warn!(
            line = loc.line,
            column = loc.column,
            "skipping block item without a `:` separator"
        );
        return None;
    };
    let property = parse_value_text(head);
    if property.is_empty() {
        tracing::warn!(line = loc.line, "skipping declaration without a property name");
        return None;
    }
    let (value_raw, important) = split_important(tail);
    Some(CssNode::Declaration(Declaration {
        property,
        value: parse_value_text(value_raw),
        important,
        loc,
    }))
}

/// Split `property: value` text at the first top-level colon. Colons inside
/// comments, strings or nested blocks do not count.
fn split_declaration(raw: &str) -> Option<(&str, &str)> {
    let mut input = ParserInput::new(raw);
    let mut parser = Parser::new(&mut input);
    loop {
        let before = parser.position();
        let is_colon = matches!(parser.next_including_whitespace(), Ok(&Token::Colon));
        if is_colon {
            let after = parser.position();
            return Some((&raw[..before.byte_index()], &raw[after.byte_index()..]));
        }
        if parser.is_exhausted() {
            return None;
        }
    }
}

/// Detach a trailing `!important` (case-insensitive, whitespace tolerated)
/// from declaration value text.
fn split_important(raw: &str) -> (&str, bool) {
    let trimmed = raw.trim_end();
    if let Some(bang) = trimmed.rfind('!') {
        if trimmed[bang + 1..].trim().eq_ignore_ascii_case("important") {
            return (&trimmed[..bang], true);
        }
    }
    (raw, false)
}

fn skip_to_delimiter(input: &mut Parser<'_, '_>, delimiters: Delimiters) {
    let _: Result<(), ParseError<'_, ()>> = input.parse_until_before(delimiters, |inner| {
        while inner.next_including_whitespace().is_ok() {}
        Ok(())
    });
}

fn serialize_tokens(input: &mut Parser<'_, '_>, out: &mut String) {
    serialize_tokens_with(input, out, &|_, _| false);
}

/// Re-serialize a token stream into `out`, recursing into nested blocks.
/// `rewrite` may claim a token by emitting its own text and returning true.
fn serialize_tokens_with<F>(input: &mut Parser<'_, '_>, out: &mut String, rewrite: &F)
where
    F: Fn(&Token<'_>, &mut String) -> bool,
{
    loop {
        let token = match input.next_including_whitespace() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };
        if rewrite(&token, out) {
            continue;
        }
        match token {
            Token::WhiteSpace(_) => {
                // One space per run, and none at the start or just inside
                // an opening bracket.
                if !out.is_empty() && !out.ends_with([' ', '(', '[', '{']) {
                    out.push(' ');
                }
            }
            Token::Function(_)
            | Token::ParenthesisBlock
            | Token::SquareBracketBlock
            | Token::CurlyBracketBlock => {
                let _ = token.to_css(out);
                let close = match token {
                    Token::CurlyBracketBlock => '}',
                    Token::SquareBracketBlock => ']',
                    _ => ')',
                };
                let _: Result<(), ParseError<'_, ()>> = input.parse_nested_block(|nested| {
                    serialize_tokens_with(nested, out, rewrite);
                    Ok(())
                });
                if out.ends_with(' ') {
                    out.pop();
                }
                out.push(close);
            }
            other => {
                let _ = other.to_css(out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn only_rule(sheet: &Stylesheet) -> &RuleNode {
        match sheet.nodes.as_slice() {
            [CssNode::Rule(rule)] => rule,
            other => panic!("expected a single rule, got {:?}", other),
        }
    }

    #[test]
    fn parses_rule_with_declarations() {
        let sheet = parse("body { color: red; margin: 1cm; }");
        let rule = only_rule(&sheet);
        assert_eq!(rule.selectors, vec!["body".to_owned()]);
        assert_eq!(rule.block.len(), 2);
        match &rule.block[0] {
            CssNode::Declaration(declaration) => {
                assert_eq!(declaration.property, "color");
                assert_eq!(declaration.value, "red");
                assert!(!declaration.important);
            }
            other => panic!("unexpected node: {:?}", other),
        }
    }

    #[test]
    fn parses_at_rule_with_prelude_and_block() {
        let sheet = parse("@page introduction:right { color: red; }");
        match sheet.nodes.as_slice() {
            [CssNode::AtRule(at_rule)] => {
                assert_eq!(at_rule.name, "page");
                assert_eq!(at_rule.prelude.as_deref(), Some("introduction:right"));
                assert_eq!(at_rule.block.as_ref().map(Vec::len), Some(1));
            }
            other => panic!("unexpected nodes: {:?}", other),
        }
    }

    #[test]
    fn parses_blockless_at_rule() {
        let sheet = parse("@import url(\"print.css\");\nbody { margin: 0; }");
        match &sheet.nodes[0] {
            CssNode::AtRule(at_rule) => {
                assert_eq!(at_rule.name, "import");
                assert_eq!(at_rule.prelude.as_deref(), Some("url(\"print.css\")"));
                assert!(at_rule.block.is_none());
            }
            other => panic!("unexpected node: {:?}", other),
        }
        assert_eq!(sheet.nodes.len(), 2);
    }

    #[test]
    fn nested_at_rules_stay_inside_their_parent() {
        let sheet = parse("@page intro { @footnotes { display: block; } color: red; }");
        match sheet.nodes.as_slice() {
            [CssNode::AtRule(page)] => {
                let block = page.block.as_ref().unwrap();
                assert!(matches!(&block[0], CssNode::AtRule(inner) if inner.name == "footnotes"));
                assert!(matches!(&block[1], CssNode::Declaration(d) if d.property == "color"));
            }
            other => panic!("unexpected nodes: {:?}", other),
        }
    }

    #[test]
    fn important_flag_is_split_from_the_value() {
        let sheet = parse("p { color: blue !important; }");
        match &only_rule(&sheet).block[0] {
            CssNode::Declaration(declaration) => {
                assert_eq!(declaration.value, "blue");
                assert!(declaration.important);
            }
            other => panic!("unexpected node: {:?}", other),
        }
    }

    #[test]
    fn comments_and_whitespace_are_normalized() {
        let sheet = parse("p { border:  1px /* thin */  solid   red; }");
        match &only_rule(&sheet).block[0] {
            CssNode::Declaration(declaration) => {
                assert_eq!(declaration.value, "1px solid red");
            }
            other => panic!("unexpected node: {:?}", other),
        }
    }

    #[test]
    fn selector_lists_split_on_top_level_commas_only() {
        let sheet = parse("h1, h2:not(.a, .b) { margin: 0; }");
        assert_eq!(
            only_rule(&sheet).selectors,
            vec!["h1".to_owned(), "h2:not(.a, .b)".to_owned()]
        );
    }

    #[test]
    fn malformed_chunks_are_skipped_without_losing_the_rest() {
        let sheet = parse("not-a-declaration; body { margin: 0; }");
        assert_eq!(sheet.nodes.len(), 1);
        assert!(matches!(&sheet.nodes[0], CssNode::Rule(_)));
    }

    #[test]
    fn functions_in_values_survive_canonicalization() {
        assert_eq!(parse_value_text(" var( --paged-bottom ) "), "var(--paged-bottom)");
        assert_eq!(parse_value_text("counter(page)"), "counter(page)");
    }

    #[test]
    fn id_selectors_become_attribute_selectors() {
        assert_eq!(rewrite_selector_ids("#intro p"), "[data-id=\"intro\"] p");
        assert_eq!(rewrite_selector_ids("div.note"), "div.note");
        assert_eq!(
            rewrite_selector_ids(":not(#skip) em"),
            ":not([data-id=\"skip\"]) em"
        );
    }
}
