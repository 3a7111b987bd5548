//! User-facing output helpers for the CLI.
//!
//! Woven documents go to stdout from the driver loop; this module owns the
//! stderr side: the per-file skip warning and fatal error reports.

use std::io::Write;
use std::path::Path;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

fn stderr_choice() -> ColorChoice {
    if atty::is(atty::Stream::Stderr) {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}

/// Warn that a file was skipped because a string literal contained
/// documentation-looking text. Exactly one line, naming the file.
pub fn warn_contaminated(path: &Path) {
    let mut stderr = StandardStream::stderr(stderr_choice());
    let _ = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true));
    let _ = write!(&mut stderr, "warning");
    let _ = stderr.reset();
    let _ = writeln!(
        &mut stderr,
        ": documentation-like text inside a string literal in {}; skipping",
        path.display()
    );
}
