//! The weft command-line interface.
//!
//! Pre-flight (configuration presence, license resolution) happens before
//! any input file is read. The driver loop then processes files strictly in
//! argument order: a rejected file contributes an empty output line and the
//! loop continues; any error stops the run.

use clap::Parser;
use std::process;

use crate::cli::args::WeftArgs;
use crate::diagnostics::{self, ErrorContext, WeftError};
use crate::engine::{self, FileOutcome};
use crate::license;
use crate::weave::{self, Metadata};

pub mod args;
pub mod output;

/// The main entry point for the CLI.
pub fn run() {
    let args = WeftArgs::parse();
    if let Err(error) = execute(&args) {
        diagnostics::report_fatal(error);
        process::exit(1);
    }
}

fn execute(args: &WeftArgs) -> Result<(), WeftError> {
    let config = weave::load_config(&args.config_root)?;
    let metadata = build_metadata(args)?;

    for path in &args.files {
        match engine::process_file(path, &config, &metadata)? {
            FileOutcome::Woven(text) => println!("{}", text.trim_end()),
            FileOutcome::Rejected => {
                output::warn_contaminated(path);
                println!();
            }
        }
    }
    Ok(())
}

fn build_metadata(args: &WeftArgs) -> Result<Metadata, WeftError> {
    let license = match &args.license {
        Some(name) => {
            let holder = args.authors.first().ok_or_else(|| {
                WeftError::LicenseResolution {
                    name: name.clone(),
                    ctx: ErrorContext::with_help(
                        "a license declaration needs a holder; pass --author",
                    ),
                }
            })?;
            Some(license::resolve(name, holder)?)
        }
        None => None,
    };
    Ok(Metadata {
        license,
        version: args.version.clone(),
        authors: args.authors.clone(),
    })
}
