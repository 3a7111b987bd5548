//! weft extracts embedded pod documentation from source files, runs it
//! through the configured weaving providers, and renders the result.
//!
//! The pipeline per file: tokenize ([`syntax`]), reject files whose string
//! literals contain documentation-looking text ([`extract::contamination`]),
//! collect documentation fragments in source order ([`extract`]), assemble
//! and parse them ([`pod`]), then weave and serialize ([`weave`]). The
//! [`engine`] ties these together; [`cli`] drives it from the command line.

pub use crate::diagnostics::{ErrorType, SourceContext, WeftError};

pub mod cli;
pub mod diagnostics;
pub mod engine;
pub mod extract;
pub mod license;
pub mod pod;
pub mod syntax;
pub mod weave;
