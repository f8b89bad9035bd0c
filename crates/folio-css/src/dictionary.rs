//! Ordered rename tables and the orchestrator that applies them.
//!
//! A dictionary is plain data passed by value into [`RenameDictionary::apply`];
//! there is no process-wide rename state. Entries run in table order within
//! each pass, and the pass order itself is fixed: properties, then at-rules,
//! then values (see [`RenameDictionary::apply`]).

use crate::ast::Stylesheet;
use crate::error::Result;
use crate::rename::{Replacement, rename_at_rule, rename_property, rename_value};

/// One property rename entry.
#[derive(Debug, Clone)]
pub struct PropertyRename {
    pub property: String,
    pub replacement: Replacement,
}

impl PropertyRename {
    pub fn new(property: impl Into<String>, replacement: impl Into<Replacement>) -> Self {
        Self {
            property: property.into(),
            replacement: replacement.into(),
        }
    }
}

/// One at-rule rename entry: `@<name>` becomes a rule under `selector`.
#[derive(Debug, Clone)]
pub struct AtRuleRename {
    pub name: String,
    pub selector: String,
}

impl AtRuleRename {
    pub fn new(name: impl Into<String>, selector: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            selector: selector.into(),
        }
    }
}

/// One value rename entry, optionally scoped to a single property.
#[derive(Debug, Clone)]
pub struct ValueRename {
    pub value: String,
    pub replacement: Replacement,
    pub property: Option<String>,
}

impl ValueRename {
    pub fn new(value: impl Into<String>, replacement: impl Into<Replacement>) -> Self {
        Self {
            value: value.into(),
            replacement: replacement.into(),
            property: None,
        }
    }

    pub fn scoped(
        value: impl Into<String>,
        replacement: impl Into<Replacement>,
        property: impl Into<String>,
    ) -> Self {
        Self {
            value: value.into(),
            replacement: replacement.into(),
            property: Some(property.into()),
        }
    }
}

/// The sixteen `@page` margin boxes, each rewritten into a nested class
/// selector under the page rule.
const MARGIN_BOXES: [&str; 16] = [
    "top-left-corner",
    "top-left",
    "top-center",
    "top-right",
    "top-right-corner",
    "bottom-left-corner",
    "bottom-left",
    "bottom-center",
    "bottom-right",
    "bottom-right-corner",
    "left-top",
    "left-middle",
    "left-bottom",
    "right-top",
    "right-middle",
    "right-bottom",
];

/// The three ordered mapping tables driving one rewrite.
#[derive(Debug, Clone, Default)]
pub struct RenameDictionary {
    pub properties: Vec<PropertyRename>,
    pub at_rules: Vec<AtRuleRename>,
    pub values: Vec<ValueRename>,
}

impl RenameDictionary {
    /// The built-in paged-media dictionary: print-only properties become
    /// custom properties, `@page`/`@footnotes`/margin-box at-rules become
    /// class rules, and layout-feature values move behind custom
    /// properties.
    pub fn paged_defaults() -> Self {
        let mut at_rules = vec![
            AtRuleRename::new("page", ".paged-page"),
            AtRuleRename::new("footnotes", ".paged-footnotes"),
        ];
        at_rules.extend(
            MARGIN_BOXES
                .iter()
                .map(|name| AtRuleRename::new(*name, format!("& .{name}"))),
        );
        Self {
            properties: vec![
                PropertyRename::new("bleed", "--paged-bleed"),
                PropertyRename::new("string-set", "--string-set"),
                PropertyRename::new("marks", "--paged-marks"),
            ],
            at_rules,
            values: vec![ValueRename::scoped("bottom", "var(--paged-bottom)", "float")],
        }
    }

    /// Apply all three tables to `sheet` and return it rewritten in place.
    ///
    /// Pass order is fixed and significant: properties first (so
    /// declarations inside margin-box at-rules are renamed before those
    /// at-rules change kind), then at-rules, then values last (a value
    /// entry scoped to a property must see the final property name).
    pub fn apply(&self, sheet: &mut Stylesheet) -> Result<()> {
        for entry in &self.properties {
            rename_property(sheet, &entry.property, &entry.replacement)?;
        }
        for entry in &self.at_rules {
            rename_at_rule(sheet, &entry.name, &entry.selector);
        }
        for entry in &self.values {
            rename_value(sheet, &entry.value, &entry.replacement, entry.property.as_deref())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::generate;
    use crate::parser::parse;
    use pretty_assertions::assert_eq;

    const PAGED_SOURCE: &str = "\
@page { margin: 1cm; bleed: 6pt; }\n\
@page introduction:right {\n\
  @top-center { content: \"Introduction\"; }\n\
  color: red;\n\
}\n\
aside { float: bottom; }\n";

    #[test]
    fn full_dictionary_rewrites_paged_constructs() {
        let mut sheet = parse(PAGED_SOURCE);
        RenameDictionary::paged_defaults().apply(&mut sheet).unwrap();
        assert_eq!(
            generate(&sheet),
            ".paged-page{margin:1cm;--paged-bleed:6pt}\
             .paged-page.paged-name-introduction.paged-pseudo-right\
             {& .top-center{content:\"Introduction\"}color:red}\
             aside{float:var(--paged-bottom)}"
        );
    }

    #[test]
    fn applying_the_dictionary_twice_is_a_no_op() {
        let dictionary = RenameDictionary::paged_defaults();
        let mut sheet = parse(PAGED_SOURCE);
        dictionary.apply(&mut sheet).unwrap();
        let once = generate(&sheet);
        dictionary.apply(&mut sheet).unwrap();
        assert_eq!(generate(&sheet), once);
    }

    #[test]
    fn properties_rename_before_at_rules_change_kind() {
        // bleed sits inside an at-rule that the at-rule pass will convert;
        // the property pass must already have reached it.
        let mut sheet = parse("@page { bleed: 6pt; }");
        RenameDictionary::paged_defaults().apply(&mut sheet).unwrap();
        assert_eq!(generate(&sheet), ".paged-page{--paged-bleed:6pt}");
    }

    #[test]
    fn first_listed_entry_wins_for_overlapping_matches() {
        let dictionary = RenameDictionary {
            properties: vec![
                PropertyRename::new("bleed", "--first"),
                PropertyRename::new("bleed", "--second"),
            ],
            ..Default::default()
        };
        let mut sheet = parse("p { bleed: 6pt; }");
        dictionary.apply(&mut sheet).unwrap();
        assert_eq!(generate(&sheet), "p{--first:6pt}");
    }

    #[test]
    fn empty_dictionary_changes_nothing() {
        let mut sheet = parse("@page { margin: 1cm; }");
        RenameDictionary::default().apply(&mut sheet).unwrap();
        assert_eq!(generate(&sheet), "@page{margin:1cm}");
    }
}
