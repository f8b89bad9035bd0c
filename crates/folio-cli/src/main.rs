use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use folio_config::{FolioConfig, RewriteConfig};
use folio_css::{
    AtRuleRename, PropertyRename, RenameDictionary, ValueRename, generate, parse,
    rewrite_id_selectors,
};
use folio_io::{Fetcher, SchemeFetcher, StylesheetResolver};
use url::Url;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let mut input: Option<String> = None;
    let mut output: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut resolve_imports = true;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--out" | "-o" => {
                output = Some(args.next().context("--out needs a path")?.into());
            }
            "--config" => {
                config_path = Some(args.next().context("--config needs a path")?.into());
            }
            "--no-imports" => resolve_imports = false,
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            _ if arg.starts_with('-') => bail!("unknown flag `{arg}` (try --help)"),
            _ => {
                if input.is_some() {
                    bail!("only one input stylesheet is supported");
                }
                input = Some(arg);
            }
        }
    }

    let Some(input) = input else {
        print_usage();
        bail!("missing input stylesheet");
    };

    let config = match &config_path {
        Some(path) => {
            let mut config = FolioConfig::load_from_file(path)
                .map_err(|message| anyhow::anyhow!(message))
                .with_context(|| format!("could not load {}", path.display()))?;
            config.merge_with_env();
            config
        }
        None => FolioConfig::load(),
    };

    let url = input_url(&input)?;
    let fetcher = SchemeFetcher::with_timeout(Duration::from_secs(config.fetch.timeout_secs))
        .context("could not build the stylesheet fetcher")?;
    let css = if resolve_imports {
        StylesheetResolver::new(&fetcher).resolve(&url)
    } else {
        fetcher
            .fetch(&url)
            .with_context(|| format!("could not fetch {url}"))?
    };

    let mut sheet = parse(&css);
    build_dictionary(&config.rewrite)
        .apply(&mut sheet)
        .context("rewrite failed")?;
    if config.rewrite.rewrite_ids {
        rewrite_id_selectors(&mut sheet);
    }

    let rewritten = generate(&sheet);
    match output {
        Some(path) => std::fs::write(&path, rewritten)
            .with_context(|| format!("could not write {}", path.display()))?,
        None => println!("{rewritten}"),
    }
    Ok(())
}

/// Accept an http(s)/file URL or a local path (turned into a `file://`
/// URL so relative imports keep working).
fn input_url(input: &str) -> Result<Url> {
    if let Ok(url) = Url::parse(input) {
        if matches!(url.scheme(), "http" | "https" | "file") {
            return Ok(url);
        }
    }
    let path = std::fs::canonicalize(input)
        .with_context(|| format!("stylesheet `{input}` not found"))?;
    Url::from_file_path(&path)
        .map_err(|_| anyhow::anyhow!("cannot express `{}` as a file URL", path.display()))
}

fn build_dictionary(config: &RewriteConfig) -> RenameDictionary {
    let mut dictionary = if config.use_defaults {
        RenameDictionary::paged_defaults()
    } else {
        RenameDictionary::default()
    };
    for (property, replacement) in &config.properties {
        dictionary
            .properties
            .push(PropertyRename::new(property.as_str(), replacement.as_str()));
    }
    for (name, selector) in &config.at_rules {
        dictionary
            .at_rules
            .push(AtRuleRename::new(name.as_str(), selector.as_str()));
    }
    for value in &config.values {
        dictionary.values.push(ValueRename {
            value: value.value.clone(),
            replacement: value.replacement.as_str().into(),
            property: value.property.clone(),
        });
    }
    dictionary
}

fn print_usage() {
    eprintln!(
        "usage: folio [options] <stylesheet>\n\
         \n\
         <stylesheet>      a local path or an http(s)/file URL\n\
         -o, --out <path>  write the rewritten CSS to a file instead of stdout\n\
         --config <path>   load settings from a specific folio.toml\n\
         --no-imports      skip @import resolution, rewrite the sheet alone\n\
         -h, --help        show this help"
    );
}
