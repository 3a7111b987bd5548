//! Pod paragraph parser.
//!
//! Converts an assembled documentation blob into a [`PodDocument`]. Purely
//! structural: paragraphs are classified and `=headN` sections nested, but
//! paragraph text is carried through untouched.

use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

use crate::diagnostics::{ErrorContext, WeftError};

use super::{PodDocument, PodElement};

#[derive(Parser)]
#[grammar = "pod/grammar.pest"]
struct PodParser;

/// A paragraph before structural nesting.
#[derive(Debug)]
enum Paragraph {
    Command { name: String, text: String },
    Ordinary(String),
    Verbatim(String),
}

/// Parse documentation text into a structured tree.
///
/// `=pod` and `=cut` are control markers, not content: `=pod` is dropped and
/// `=cut` closes any open section nesting. Parsing continues past `=cut`
/// because an assembled blob legitimately contains several terminated
/// regions, one per extracted fragment.
pub fn parse_documentation(text: &str) -> Result<PodDocument, WeftError> {
    if text.trim().is_empty() {
        return Ok(PodDocument::default());
    }

    let mut pairs =
        PodParser::parse(Rule::document, text).map_err(|e| convert_parse_error(&e))?;
    let document = pairs.next().expect("grammar guarantees a document");

    let mut paragraphs = Vec::new();
    for pair in document.into_inner() {
        if pair.as_rule() == Rule::EOI {
            continue;
        }
        if let Some(paragraph) = build_paragraph(pair) {
            paragraphs.push(paragraph);
        }
    }
    Ok(structure(paragraphs))
}

// ============================================================================
// PARAGRAPH BUILDING
// ============================================================================

fn build_paragraph(pair: Pair<Rule>) -> Option<Paragraph> {
    let inner = pair.into_inner().next().expect("grammar guarantees inner");
    let rule = inner.as_rule();
    let lines = paragraph_lines(inner);

    match rule {
        Rule::command_paragraph => Some(split_command(&lines)),
        Rule::verbatim_paragraph => {
            let text = lines.join("\n");
            if text.trim().is_empty() {
                None
            } else {
                Some(Paragraph::Verbatim(text))
            }
        }
        Rule::ordinary_paragraph => Some(Paragraph::Ordinary(lines.join("\n"))),
        rule => unreachable!("unexpected paragraph rule: {:?}", rule),
    }
}

fn paragraph_lines(pair: Pair<Rule>) -> Vec<String> {
    pair.into_inner()
        .map(|line| {
            line.into_inner()
                .next()
                .expect("grammar guarantees line text")
                .as_str()
                .to_string()
        })
        .collect()
}

/// Split a command paragraph into directive name and remaining text.
fn split_command(lines: &[String]) -> Paragraph {
    let first = &lines[0];
    let body = &first[1..]; // grammar guarantees the leading '='
    let name_len = body
        .bytes()
        .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
        .count();
    let name = body[..name_len].to_string();
    let mut text = body[name_len..].trim_start().to_string();
    for line in &lines[1..] {
        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str(line);
    }
    Paragraph::Command { name, text }
}

// ============================================================================
// STRUCTURAL NESTING
// ============================================================================

fn structure(paragraphs: Vec<Paragraph>) -> PodDocument {
    let mut root: Vec<PodElement> = Vec::new();
    // Open sections, outermost first.
    let mut stack: Vec<(u8, String, Vec<PodElement>)> = Vec::new();

    for paragraph in paragraphs {
        match paragraph {
            Paragraph::Command { name, text } => {
                if name == "pod" {
                    continue;
                }
                if name == "cut" {
                    while !stack.is_empty() {
                        close_one(&mut stack, &mut root);
                    }
                    continue;
                }
                if let Some(level) = head_level(&name) {
                    while stack.last().map_or(false, |(open, _, _)| *open >= level) {
                        close_one(&mut stack, &mut root);
                    }
                    stack.push((level, text, Vec::new()));
                } else {
                    push_element(&mut stack, &mut root, PodElement::Command { name, text });
                }
            }
            Paragraph::Ordinary(text) => {
                push_element(&mut stack, &mut root, PodElement::Ordinary(text));
            }
            Paragraph::Verbatim(text) => {
                push_element(&mut stack, &mut root, PodElement::Verbatim(text));
            }
        }
    }
    while !stack.is_empty() {
        close_one(&mut stack, &mut root);
    }
    PodDocument { elements: root }
}

fn head_level(name: &str) -> Option<u8> {
    let level = name.strip_prefix("head")?.parse::<u8>().ok()?;
    (1..=4).contains(&level).then_some(level)
}

fn push_element(
    stack: &mut Vec<(u8, String, Vec<PodElement>)>,
    root: &mut Vec<PodElement>,
    element: PodElement,
) {
    match stack.last_mut() {
        Some((_, _, children)) => children.push(element),
        None => root.push(element),
    }
}

fn close_one(stack: &mut Vec<(u8, String, Vec<PodElement>)>, root: &mut Vec<PodElement>) {
    let (level, title, children) = stack.pop().expect("caller checks non-empty");
    let section = PodElement::Section {
        level,
        title,
        children,
    };
    push_element(stack, root, section);
}

fn convert_parse_error(error: &pest::error::Error<Rule>) -> WeftError {
    WeftError::Parse {
        message: format!("malformed documentation block: {}", error.variant.message()),
        path: std::path::PathBuf::from("<assembled documentation>"),
        ctx: ErrorContext::none(),
    }
}
