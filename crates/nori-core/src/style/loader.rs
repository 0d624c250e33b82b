//! Configuration file discovery and loading

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::NoriError;
use crate::result::Result;

use super::FormatStyle;

/// On-disk configuration (`nori.toml`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NoriConfig {
    pub style: FormatStyle,
}

/// Auto-discover a config file by traversing upward from `start_path` until
/// one is found or the filesystem root is reached.
///
/// Candidate file names, in priority order: `.norirc.json`, `.norirc.toml`,
/// `nori.toml`.
pub fn discover_config(start_path: &Path) -> Result<Option<PathBuf>> {
    let mut current = start_path
        .canonicalize()
        .map_err(|e| NoriError::config(format!("invalid path: {e}")))?;
    loop {
        for filename in &[".norirc.json", ".norirc.toml", "nori.toml"] {
            let candidate = current.join(filename);
            if candidate.is_file() {
                tracing::debug!("found config: {}", candidate.display());
                return Ok(Some(candidate));
            }
        }
        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => break,
        }
    }
    Ok(None)
}

/// Load and deserialize a config file (JSON or TOML by extension). Unknown
/// or missing fields fall back to the documented defaults field-by-field.
pub fn load_config(path: &Path) -> Result<NoriConfig> {
    let text = std::fs::read_to_string(path).map_err(|source| NoriError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if path.extension().is_some_and(|ext| ext == "json") {
        serde_json::from_str(&text)
            .map_err(|e| NoriError::config(format!("{}: {e}", path.display())))
    } else {
        toml::from_str(&text)
            .map_err(|e| NoriError::config(format!("{}: {e}", path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discovers_upward() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join("nori.toml"), "[style.tabs_and_indents]\nindent_size = 2\n")
            .unwrap();

        let found = discover_config(&nested).unwrap().expect("config found");
        let config = load_config(&found).unwrap();
        assert_eq!(config.style.tabs_and_indents.indent_size, 2);
    }

    #[test]
    fn json_config_loads_too() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".norirc.json");
        std::fs::write(
            &path,
            r#"{ "style": { "wrapping": { "column_limit": 100 } } }"#,
        )
        .unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config.style.wrapping.column_limit, 100);
        // Untouched sections keep defaults.
        assert_eq!(config.style.tabs_and_indents.indent_size, 4);
    }

    #[test]
    fn missing_config_is_none() {
        let dir = tempfile::tempdir().unwrap();
        // The temp dir's ancestors may contain a real config; only assert
        // that discovery does not error.
        let _ = discover_config(dir.path()).unwrap();
    }

    #[test]
    fn malformed_config_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nori.toml");
        std::fs::write(&path, "not toml [").unwrap();
        let err = load_config(&path).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Config);
    }
}
