//! Command-line arguments for the weft CLI.
//!
//! Uses the `clap` derive API. Clap's automatic `--version` flag is disabled
//! because `--version` here carries the version string to weave into the
//! output, not the tool's own version.

use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "weft",
    disable_version_flag = true,
    about = "Extract embedded pod documentation from source files and weave it into a publishable document."
)]
pub struct WeftArgs {
    /// License identifier to declare in the woven document; requires at
    /// least one --author as the holder.
    #[arg(long)]
    pub license: Option<String>,

    /// Version string for the VERSION section.
    #[arg(long)]
    pub version: Option<String>,

    /// Author of the code (repeatable; the first is the license holder).
    #[arg(long = "author")]
    pub authors: Vec<String>,

    /// Directory searched for the weaving configuration.
    #[arg(long, default_value = ".")]
    pub config_root: PathBuf,

    /// Source files to weave; output lines follow this order.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}
