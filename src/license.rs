//! Built-in license registry.
//!
//! Resolution is a closed-table lookup: first an exact identifier match,
//! then a second attempt with case and punctuation folded, so `apache-2.0`
//! finds `Apache_2_0`. Failure is fatal before any input file is touched.

use crate::diagnostics::{ErrorContext, WeftError};

struct LicenseEntry {
    id: &'static str,
    full_name: &'static str,
    notice: &'static str,
}

/// Known licenses. `{holder}` in the notice is replaced at resolution time.
const REGISTRY: &[LicenseEntry] = &[
    LicenseEntry {
        id: "Perl_5",
        full_name: "the same terms as the Perl 5 programming language system itself",
        notice: "This software is copyright (c) by {holder}.\n\nThis is free software; you can redistribute it and/or modify it under the same terms as the Perl 5 programming language system itself.",
    },
    LicenseEntry {
        id: "Artistic_2_0",
        full_name: "The Artistic License 2.0",
        notice: "This software is copyright (c) by {holder}.\n\nThis is free software, licensed under The Artistic License 2.0.",
    },
    LicenseEntry {
        id: "MIT",
        full_name: "The MIT (X11) License",
        notice: "This software is copyright (c) by {holder}.\n\nThis is free software, licensed under The MIT (X11) License.",
    },
    LicenseEntry {
        id: "BSD_3_Clause",
        full_name: "The (three-clause) BSD License",
        notice: "This software is copyright (c) by {holder}.\n\nThis is free software, licensed under The (three-clause) BSD License.",
    },
    LicenseEntry {
        id: "Apache_2_0",
        full_name: "The Apache License, Version 2.0",
        notice: "This software is copyright (c) by {holder}.\n\nThis is free software, licensed under The Apache License, Version 2.0.",
    },
    LicenseEntry {
        id: "GPL_2_0",
        full_name: "The GNU General Public License, Version 2",
        notice: "This software is copyright (c) by {holder}.\n\nThis is free software, licensed under The GNU General Public License, Version 2.",
    },
    LicenseEntry {
        id: "GPL_3_0",
        full_name: "The GNU General Public License, Version 3",
        notice: "This software is copyright (c) by {holder}.\n\nThis is free software, licensed under The GNU General Public License, Version 3.",
    },
    LicenseEntry {
        id: "LGPL_3_0",
        full_name: "The GNU Lesser General Public License, Version 3",
        notice: "This software is copyright (c) by {holder}.\n\nThis is free software, licensed under The GNU Lesser General Public License, Version 3.",
    },
    LicenseEntry {
        id: "MPL_2_0",
        full_name: "The Mozilla Public License, Version 2.0",
        notice: "This software is copyright (c) by {holder}.\n\nThis is free software, licensed under The Mozilla Public License, Version 2.0.",
    },
    LicenseEntry {
        id: "Zlib",
        full_name: "The zlib License",
        notice: "This software is copyright (c) by {holder}.\n\nThis is free software, licensed under The zlib License.",
    },
];

/// A resolved license together with its declared rights-holder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct License {
    id: &'static str,
    full_name: &'static str,
    notice: String,
    holder: String,
}

impl License {
    pub fn id(&self) -> &str {
        self.id
    }

    pub fn full_name(&self) -> &str {
        self.full_name
    }

    pub fn holder(&self) -> &str {
        &self.holder
    }

    /// The notice paragraph for the legal section of a woven document.
    pub fn notice(&self) -> &str {
        &self.notice
    }
}

/// Resolve a license identifier for the given holder.
pub fn resolve(name: &str, holder: &str) -> Result<License, WeftError> {
    let entry = REGISTRY
        .iter()
        .find(|entry| entry.id == name)
        .or_else(|| {
            let folded = fold(name);
            REGISTRY.iter().find(|entry| fold(entry.id) == folded)
        })
        .ok_or_else(|| WeftError::LicenseResolution {
            name: name.to_string(),
            ctx: ErrorContext::with_help(format!(
                "known licenses: {}",
                REGISTRY
                    .iter()
                    .map(|e| e.id)
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        })?;
    Ok(License {
        id: entry.id,
        full_name: entry.full_name,
        notice: entry.notice.replace("{holder}", holder),
        holder: holder.to_string(),
    })
}

/// Case-insensitive identifier with `-`, `.` and spaces folded to `_`.
fn fold(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '-' | '.' | ' ' => '_',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}
