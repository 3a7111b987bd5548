//! Structured documentation model: parse assembled pod text into a tree and
//! render the tree back to pod text.

pub mod parser;

pub use parser::parse_documentation;

use crate::diagnostics::WeftError;

/// One element of a documentation tree.
#[derive(Debug, Clone, PartialEq)]
pub enum PodElement {
    /// A `=headN` section with everything up to the next same-or-higher
    /// heading nested inside it.
    Section {
        level: u8,
        title: String,
        children: Vec<PodElement>,
    },
    /// Any other command paragraph (`=over`, `=item`, `=back`, ...), kept
    /// verbatim in place.
    Command { name: String, text: String },
    Ordinary(String),
    Verbatim(String),
}

/// The structured result of parsing assembled documentation fragments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PodDocument {
    pub elements: Vec<PodElement>,
}

impl PodDocument {
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Remove and return the first top-level section with the given title.
    pub fn take_section(&mut self, title: &str) -> Option<PodElement> {
        let idx = self.elements.iter().position(|el| {
            matches!(el, PodElement::Section { level: 1, title: t, .. } if t == title)
        })?;
        Some(self.elements.remove(idx))
    }

    /// Render the tree as pod text. Empty documents render as the empty
    /// string.
    pub fn to_pod_string(&self) -> String {
        if self.elements.is_empty() {
            return String::new();
        }
        let mut out = String::from("=pod\n\n");
        for element in &self.elements {
            render(element, &mut out);
        }
        out.push_str("=cut\n");
        out
    }
}

fn render(element: &PodElement, out: &mut String) {
    match element {
        PodElement::Section {
            level,
            title,
            children,
        } => {
            out.push_str(&format!("=head{} {}\n\n", level, title));
            for child in children {
                render(child, out);
            }
        }
        PodElement::Command { name, text } => {
            if text.is_empty() {
                out.push_str(&format!("={}\n\n", name));
            } else {
                out.push_str(&format!("={} {}\n\n", name, text));
            }
        }
        PodElement::Ordinary(text) | PodElement::Verbatim(text) => {
            out.push_str(text);
            out.push_str("\n\n");
        }
    }
}

/// Join documentation fragments with a line break, in order, and parse the
/// result. Succeeds (with an empty tree) when there are no fragments.
/// Fragment text is never altered.
pub fn assemble(fragments: &[String]) -> Result<PodDocument, WeftError> {
    parse_documentation(&fragments.join("\n"))
}
