//! Per-file pipeline: read, decode, tokenize, scan, extract, assemble,
//! weave.
//!
//! One run per input file, no state carried across files. The two terminal
//! states are explicit: `Woven` carries the serialized result, `Rejected`
//! marks a file skipped because a literal contained documentation-looking
//! text. Everything else is a fatal error for the whole invocation.

use std::fs;
use std::path::Path;

use crate::diagnostics::{SourceContext, WeftError};
use crate::extract::{self, contamination};
use crate::pod;
use crate::syntax;
use crate::weave::{self, Metadata, WeaveConfig};

/// Terminal state of one file's pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    /// The woven documentation, serialized to pod text.
    Woven(String),
    /// The file was skipped; the caller emits a warning and an empty line.
    Rejected,
}

/// Run the whole pipeline for one input file.
pub fn process_file(
    path: &Path,
    config: &WeaveConfig,
    metadata: &Metadata,
) -> Result<FileOutcome, WeftError> {
    let bytes = fs::read(path).map_err(|e| WeftError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let text = String::from_utf8(bytes).map_err(|e| WeftError::Decode {
        path: path.to_path_buf(),
        source: e,
    })?;

    let source = SourceContext::from_file(path.display().to_string(), text.clone());
    let tree = syntax::parse(&text, &source)?;

    if contamination::detect(&tree) {
        return Ok(FileOutcome::Rejected);
    }

    let fragments = extract::documentation_fragments(&tree);
    let document = pod::assemble(&fragments)?;
    let woven = weave::weave(config, document, &tree, metadata, path)?;
    Ok(FileOutcome::Woven(woven.to_pod_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::ErrorType;
    use std::path::PathBuf;

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

    fn scratch_file(tag: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("weft-engine-{}-{}.pm", tag, std::process::id()));
        fs::write(&path, contents).expect("scratch file");
        path
    }

    #[test]
    fn documented_file_is_woven() {
        let path = scratch_file(
            "woven",
            "package Demo;\n=head1 DESCRIPTION\n\nDoes things.\n\n=cut\n1;\n",
        );
        let outcome =
            process_file(&path, &default_config(), &Metadata::default()).expect("processes");
        match outcome {
            FileOutcome::Woven(text) => {
                assert!(text.contains("=head1 DESCRIPTION"));
                assert!(text.contains("Does things."));
            }
            FileOutcome::Rejected => panic!("clean file must not be rejected"),
        }
    }

    #[test]
    fn contaminated_file_is_rejected_not_fatal() {
        let path = scratch_file(
            "rejected",
            "my $fake = <<EOF;\n=head1 NOT DOCS\nEOF\n",
        );
        let outcome =
            process_file(&path, &default_config(), &Metadata::default()).expect("processes");
        assert_eq!(outcome, FileOutcome::Rejected);
    }

    #[test]
    fn code_only_file_weaves_metadata_sections() {
        let path = scratch_file("codeonly", "my $x = 1;\nprint $x;\n");
        let metadata = Metadata {
            version: Some("1.0".into()),
            ..Metadata::default()
        };
        let outcome = process_file(&path, &default_config(), &metadata).expect("processes");
        match outcome {
            FileOutcome::Woven(text) => {
                assert!(text.contains("=head1 VERSION"));
                assert!(text.contains("version 1.0"));
            }
            FileOutcome::Rejected => panic!("clean file must not be rejected"),
        }
    }

    #[test]
    fn invalid_utf8_is_a_decode_error() {
        let path = std::env::temp_dir().join(format!("weft-engine-utf8-{}.pm", std::process::id()));
        fs::write(&path, [0xffu8, 0xfe, 0x00]).expect("scratch file");
        let err = process_file(&path, &default_config(), &Metadata::default()).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Decode);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = process_file(
            Path::new("/nonexistent/weft-test.pm"),
            &default_config(),
            &Metadata::default(),
        )
        .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Io);
    }
}
