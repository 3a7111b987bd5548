//! Weaving configuration.
//!
//! A `weft.yaml` must exist in the configured root before any input file is
//! touched; its `sections` list names the providers to run, in order.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::diagnostics::{ErrorContext, WeftError};

pub const CONFIG_FILE: &str = "weft.yaml";

#[derive(Debug, Clone, Deserialize)]
pub struct WeaveConfig {
    /// Section providers, applied in order.
    pub sections: Vec<String>,
}

/// Load the configuration from `root`, failing fast when it is absent.
pub fn load(root: &Path) -> Result<WeaveConfig, WeftError> {
    let path = root.join(CONFIG_FILE);
    if !path.is_file() {
        return Err(WeftError::ConfigMissing {
            file: CONFIG_FILE.to_string(),
            directory: root.to_path_buf(),
        });
    }
    let text = fs::read_to_string(&path).map_err(|e| WeftError::Io {
        path: path.clone(),
        source: e,
    })?;
    serde_yaml::from_str(&text).map_err(|e| WeftError::Weave {
        message: "invalid weaving configuration".to_string(),
        path,
        ctx: ErrorContext::none(),
        source: Some(Box::new(e)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::ErrorType;

    fn scratch_dir(tag: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("weft-config-{}-{}", tag, std::process::id()));
        fs::create_dir_all(&dir).expect("scratch dir");
        dir
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let dir = scratch_dir("missing");
        let _ = fs::remove_file(dir.join(CONFIG_FILE));
        let err = load(&dir).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Config);
        assert!(err.to_string().contains(CONFIG_FILE));
    }

    #[test]
    fn sections_are_read_in_order() {
        let dir = scratch_dir("order");
        fs::write(
            dir.join(CONFIG_FILE),
            "sections:\n  - name\n  - leftovers\n",
        )
        .expect("write config");
        let config = load(&dir).expect("loads");
        assert_eq!(config.sections, vec!["name", "leftovers"]);
    }

    #[test]
    fn malformed_yaml_is_a_weave_error() {
        let dir = scratch_dir("bad");
        fs::write(dir.join(CONFIG_FILE), "sections: {not a list").expect("write config");
        let err = load(&dir).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Weave);
    }
}
