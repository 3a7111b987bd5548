//! Weaves an extracted documentation tree into its final form.
//!
//! Each configured section provider either passes an extracted section
//! through, replaces it with one generated from metadata or the syntax tree,
//! or (for `leftovers`) flushes everything not claimed by another provider.

pub mod config;

pub use config::{load as load_config, WeaveConfig, CONFIG_FILE};

use std::path::Path;

use crate::diagnostics::{ErrorContext, WeftError};
use crate::license::License;
use crate::pod::{PodDocument, PodElement};
use crate::syntax::SyntaxTree;

/// Per-invocation metadata, built once from the command line and read-only
/// afterwards.
#[derive(Debug, Clone, Default)]
pub struct Metadata {
    pub license: Option<License>,
    pub version: Option<String>,
    pub authors: Vec<String>,
}

/// Run the configured providers over the extracted document.
///
/// `path` names the file being woven; it only feeds error reporting.
pub fn weave(
    config: &WeaveConfig,
    mut extracted: PodDocument,
    tree: &SyntaxTree,
    metadata: &Metadata,
    path: &Path,
) -> Result<PodDocument, WeftError> {
    let mut woven = Vec::new();
    for provider in &config.sections {
        match provider.as_str() {
            "name" => provide_name(&mut woven, &mut extracted, tree),
            "version" => provide_version(&mut woven, &mut extracted, metadata),
            "leftovers" => woven.append(&mut extracted.elements),
            "authors" => provide_authors(&mut woven, &mut extracted, metadata),
            "legal" => provide_legal(&mut woven, &mut extracted, metadata),
            other => {
                return Err(WeftError::Weave {
                    message: format!("unknown section provider '{}'", other),
                    path: path.to_path_buf(),
                    ctx: ErrorContext::with_help(
                        "providers are: name, version, leftovers, authors, legal",
                    ),
                    source: None,
                })
            }
        }
    }
    Ok(PodDocument { elements: woven })
}

fn section(title: &str, children: Vec<PodElement>) -> PodElement {
    PodElement::Section {
        level: 1,
        title: title.to_string(),
        children,
    }
}

/// An extracted NAME section wins; otherwise one is generated from the
/// `package` statement and the abstract comment, when present.
fn provide_name(woven: &mut Vec<PodElement>, extracted: &mut PodDocument, tree: &SyntaxTree) {
    if let Some(existing) = extracted.take_section("NAME") {
        woven.push(existing);
        return;
    }
    if let Some(package) = tree.package_name() {
        let line = match tree.abstract_comment() {
            Some(abstract_text) => format!("{} - {}", package, abstract_text),
            None => package,
        };
        woven.push(section("NAME", vec![PodElement::Ordinary(line)]));
    }
}

/// Metadata version replaces any extracted VERSION section.
fn provide_version(
    woven: &mut Vec<PodElement>,
    extracted: &mut PodDocument,
    metadata: &Metadata,
) {
    let existing = extracted.take_section("VERSION");
    match &metadata.version {
        Some(version) => woven.push(section(
            "VERSION",
            vec![PodElement::Ordinary(format!("version {}", version))],
        )),
        None => {
            if let Some(existing) = existing {
                woven.push(existing);
            }
        }
    }
}

fn provide_authors(
    woven: &mut Vec<PodElement>,
    extracted: &mut PodDocument,
    metadata: &Metadata,
) {
    let existing = extracted
        .take_section("AUTHOR")
        .or_else(|| extracted.take_section("AUTHORS"));
    if metadata.authors.is_empty() {
        if let Some(existing) = existing {
            woven.push(existing);
        }
        return;
    }
    let title = if metadata.authors.len() == 1 {
        "AUTHOR"
    } else {
        "AUTHORS"
    };
    let children = metadata
        .authors
        .iter()
        .map(|author| PodElement::Ordinary(author.clone()))
        .collect();
    woven.push(section(title, children));
}

fn provide_legal(woven: &mut Vec<PodElement>, extracted: &mut PodDocument, metadata: &Metadata) {
    let existing = extracted.take_section("COPYRIGHT AND LICENSE");
    match &metadata.license {
        Some(license) => woven.push(section(
            "COPYRIGHT AND LICENSE",
            vec![PodElement::Ordinary(license.notice().to_string())],
        )),
        None => {
            if let Some(existing) = existing {
                woven.push(existing);
            }
        }
    }
}
