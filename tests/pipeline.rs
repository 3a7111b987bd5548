//! End-to-end pipeline tests at the library level: tokenize, extract,
//! assemble, weave.

use std::path::Path;

use weft::diagnostics::SourceContext;
use weft::extract::{self, contamination};
use weft::pod::{self, PodElement};
use weft::syntax;
use weft::weave::{self, Metadata, WeaveConfig};

fn default_config() -> WeaveConfig {
    WeaveConfig {
        sections: vec![
            "name".into(),
            "version".into(),
            "leftovers".into(),
            "authors".into(),
            "legal".into(),
        ],
    }
}

fn tree(src: &str) -> syntax::SyntaxTree {
    syntax::parse(src, &SourceContext::from_file("pipeline.pm", src)).expect("tokenizes")
}

fn top_titles(doc: &pod::PodDocument) -> Vec<String> {
    doc.elements
        .iter()
        .filter_map(|el| match el {
            PodElement::Section { title, .. } => Some(title.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn fragments_survive_in_source_order_through_assembly() {
    let src = "\
#!/usr/bin/perl
=head1 FIRST

one

=cut
my $x = 1;

=head1 SECOND

two

=cut
$x++;
__END__

=head1 THIRD

three

=cut
";
    let tree = tree(src);
    assert!(!contamination::detect(&tree));
    let fragments = extract::documentation_fragments(&tree);
    assert_eq!(fragments.len(), 3);
    let doc = pod::assemble(&fragments).expect("assembles");
    assert_eq!(top_titles(&doc), vec!["FIRST", "SECOND", "THIRD"]);
}

#[test]
fn source_without_documentation_assembles_to_an_empty_tree() {
    let tree = tree("my $x = 1;\nprint $x * 2;\n");
    let fragments = extract::documentation_fragments(&tree);
    assert!(fragments.is_empty());
    let doc = pod::assemble(&fragments).expect("empty assembly succeeds");
    assert!(doc.is_empty());
}

#[test]
fn code_only_source_weaves_metadata_into_sections() {
    let tree = tree("package Widget;\nmy $x = 1;\n");
    let doc = pod::assemble(&[]).expect("assembles");
    let metadata = Metadata {
        version: Some("1.0".into()),
        authors: vec!["Jane Doe <jane@x.com>".into()],
        ..Metadata::default()
    };
    let woven = weave::weave(
        &default_config(),
        doc,
        &tree,
        &metadata,
        Path::new("pipeline.pm"),
    )
    .expect("weaves");
    let rendered = woven.to_pod_string();
    assert!(rendered.contains("=head1 NAME"));
    assert!(rendered.contains("Widget"));
    assert!(rendered.contains("=head1 VERSION"));
    assert!(rendered.contains("version 1.0"));
    assert!(rendered.contains("=head1 AUTHOR"));
    assert!(rendered.contains("Jane Doe <jane@x.com>"));
}

#[test]
fn heredoc_contamination_rejects_extraction_but_real_pod_does_not() {
    let clean = tree("=head1 REAL\n\ndocs\n\n=cut\nmy $x = 1;\n");
    assert!(!contamination::detect(&clean));

    let dirty = tree("my $template = <<END_OF_DOC;\n=head1 FAKE\nEND_OF_DOC\n");
    assert!(contamination::detect(&dirty));
}

#[test]
fn two_fragment_round_trip_keeps_two_sections() {
    let fragments = vec!["=head1 A".to_string(), "=head1 B".to_string()];
    let doc = pod::assemble(&fragments).expect("assembles");
    assert_eq!(top_titles(&doc), vec!["A", "B"]);
}
