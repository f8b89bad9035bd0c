use folio_css::{
    RenameDictionary, Replacement, ReplacementContext, Stylesheet, rename_content_value,
    rename_property,
};
use pretty_assertions::assert_eq;

const SAMPLE: &str = "\
@page {\n\
  margin: 1cm;\n\
  size: A4;\n\
}\n\
\n\
@page introduction {\n\
  color: red;\n\
}\n\
@page introduction:right {\n\
  @footnotes {\n\
    display: span;\n\
  }\n\
  color: red;\n\
}\n\
@page:left {\n\
  color: red;\n\
}\n\
\n\
body {\n\
  chaussette: socks;\n\
}\n";

#[test]
fn paged_dictionary_rewrites_a_whole_sheet() {
    let mut sheet = Stylesheet::parse(SAMPLE);
    RenameDictionary::paged_defaults().apply(&mut sheet).unwrap();
    assert_eq!(
        sheet.to_css_string(),
        ".paged-page{margin:1cm;size:A4}\
         .paged-page.paged-name-introduction{color:red}\
         .paged-page.paged-name-introduction.paged-pseudo-right\
         {.paged-footnotes{display:span}color:red}\
         .paged-page.paged-pseudo-left{color:red}\
         body{chaussette:socks}"
    );
}

#[test]
fn custom_tables_extend_the_rewrite() {
    let mut sheet = Stylesheet::parse("body { chaussette: socks; }");
    rename_property(&mut sheet, "chaussette", &"--paged-chaussette".into()).unwrap();
    assert_eq!(sheet.to_css_string(), "body{--paged-chaussette:socks}");
}

#[test]
fn content_strings_can_be_upcased_in_place() {
    let mut sheet = Stylesheet::parse("q { content: \"hello\"; }");
    let upcase = Replacement::computed(|context: &ReplacementContext<'_>| {
        let inner = context.value_text.trim_matches('"');
        Some(format!("\"{}\"", inner.to_uppercase()))
    });
    rename_content_value(&mut sheet, "\"hello\"", &upcase).unwrap();
    assert_eq!(sheet.to_css_string(), "q{content:\"HELLO\"}");
}
