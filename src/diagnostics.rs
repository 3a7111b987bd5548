//! Unified, `miette`-based diagnostic system for weft.
//!
//! Every failure mode of the pipeline is a variant of [`WeftError`]. Variants
//! carry the data their message needs plus an optional [`ErrorContext`] with
//! the source text and span the error points at. Rendering for the user goes
//! through [`report_fatal`], which produces a full miette report.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceCode};
use thiserror::Error;

use crate::syntax::Span;

/// Shared handle to a named source for diagnostic rendering.
pub type SourceArc = Arc<NamedSource<String>>;

/// Source text plus the name it should be reported under.
#[derive(Debug, Clone)]
pub struct SourceContext {
    pub name: String,
    pub content: String,
}

impl SourceContext {
    pub fn from_file(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Convert to a NamedSource for use with miette error reporting.
    pub fn to_named_source(&self) -> SourceArc {
        Arc::new(NamedSource::new(self.name.clone(), self.content.clone()))
    }
}

/// Minimal, composable error context for diagnostics.
#[derive(Debug, Default)]
pub struct ErrorContext {
    /// The primary source for this error (if any).
    pub source: Option<SourceArc>,
    /// The primary span for this error (if any).
    pub span: Option<Span>,
    /// An optional help message.
    pub help: Option<String>,
}

impl ErrorContext {
    /// Returns an empty error context (no source, span, or help).
    pub fn none() -> Self {
        Self::default()
    }

    /// Creates a context with both source and span.
    pub fn with_source_and_span(source: SourceArc, span: Span) -> Self {
        Self {
            source: Some(source),
            span: Some(span),
            help: None,
        }
    }

    /// Creates a context carrying only a help message.
    pub fn with_help(help: impl Into<String>) -> Self {
        Self {
            source: None,
            span: None,
            help: Some(help.into()),
        }
    }
}

/// Unified error type for all weft failure modes.
///
/// Contaminated literals are deliberately NOT represented here: they are a
/// recoverable per-file outcome (`FileOutcome::Rejected`), not an error.
#[derive(Debug, Error)]
pub enum WeftError {
    #[error("weaving configuration '{file}' not found in {}", .directory.display())]
    ConfigMissing { file: String, directory: PathBuf },

    #[error("could not read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not decode {} as UTF-8", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("could not parse {}: {message}", .path.display())]
    Parse {
        message: String,
        path: PathBuf,
        ctx: ErrorContext,
    },

    #[error("could not resolve license '{name}'")]
    LicenseResolution { name: String, ctx: ErrorContext },

    #[error("weaving failed for {}: {message}", .path.display())]
    Weave {
        message: String,
        path: PathBuf,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
}

/// Type-safe error classification that mirrors the [`WeftError`] variants.
/// Test code matches on this instead of message strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    Config,
    Io,
    Decode,
    Parse,
    License,
    Weave,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::Config => "Config",
            ErrorType::Io => "Io",
            ErrorType::Decode => "Decode",
            ErrorType::Parse => "Parse",
            ErrorType::License => "License",
            ErrorType::Weave => "Weave",
        }
    }
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl WeftError {
    fn get_ctx(&self) -> Option<&ErrorContext> {
        match self {
            WeftError::ConfigMissing { .. } | WeftError::Io { .. } | WeftError::Decode { .. } => {
                None
            }
            WeftError::Parse { ctx, .. }
            | WeftError::LicenseResolution { ctx, .. }
            | WeftError::Weave { ctx, .. } => Some(ctx),
        }
    }

    /// Returns the type-safe classification for this error.
    pub fn error_type(&self) -> ErrorType {
        match self {
            WeftError::ConfigMissing { .. } => ErrorType::Config,
            WeftError::Io { .. } => ErrorType::Io,
            WeftError::Decode { .. } => ErrorType::Decode,
            WeftError::Parse { .. } => ErrorType::Parse,
            WeftError::LicenseResolution { .. } => ErrorType::License,
            WeftError::Weave { .. } => ErrorType::Weave,
        }
    }

    const fn code_str(&self) -> &'static str {
        match self {
            WeftError::ConfigMissing { .. } => "weft::config",
            WeftError::Io { .. } => "weft::io",
            WeftError::Decode { .. } => "weft::decode",
            WeftError::Parse { .. } => "weft::parse",
            WeftError::LicenseResolution { .. } => "weft::license",
            WeftError::Weave { .. } => "weft::weave",
        }
    }
}

impl Diagnostic for WeftError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.code_str()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.get_ctx()
            .and_then(|ctx| ctx.help.as_ref())
            .map(|h| Box::new(h) as Box<dyn fmt::Display + 'a>)
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        self.get_ctx()
            .and_then(|ctx| ctx.source.as_ref())
            .map(|s| s.as_ref() as &dyn SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let ctx = self.get_ctx()?;
        let span = ctx.span?;
        let len = if span.end > span.start {
            span.end - span.start
        } else {
            1
        };
        let label = match self {
            WeftError::Parse { message, .. } => Some(message.clone()),
            WeftError::Weave { message, .. } => Some(message.clone()),
            _ => None,
        };
        Some(Box::new(std::iter::once(LabeledSpan::new(
            label, span.start, len,
        ))))
    }
}

/// Prints a fatal error to stderr with full miette diagnostics.
pub fn report_fatal(error: WeftError) {
    let report = miette::Report::new(error);
    eprintln!("{report:?}");
}
