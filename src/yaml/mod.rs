//! YAML file loading with located diagnostics

pub mod diagnostics;

use miette::Diagnostic;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use diagnostics::YamlSyntaxError;

/// Errors raised while reading a YAML file
#[derive(Debug, Error, Diagnostic)]
pub enum YamlError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] YamlSyntaxError),

    #[error("Failed to read {path}: {source}")]
    #[diagnostic(code(lca::yaml::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Read and deserialize a YAML (or JSON) file
pub fn parse_yaml_file<T: DeserializeOwned>(path: &Path) -> Result<T, YamlError> {
    let content = fs::read_to_string(path).map_err(|source| YamlError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_yaml_str(&content, &path.display().to_string())
}

/// Deserialize YAML text, naming `filename` in diagnostics
pub fn parse_yaml_str<T: DeserializeOwned>(content: &str, filename: &str) -> Result<T, YamlError> {
    serde_yml::from_str(content)
        .map_err(|e| YamlSyntaxError::from_serde_error(&e, content, filename).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    #[test]
    fn test_parse_yaml_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("values.yaml");
        fs::write(&path, "a: 1\nb: 2\n").unwrap();
        let values: BTreeMap<String, u32> = parse_yaml_file(&path).unwrap();
        assert_eq!(values["b"], 2);
    }

    #[test]
    fn test_parse_error_is_located() {
        let result: Result<BTreeMap<String, u32>, _> = parse_yaml_str("a: [1\n", "bad.yaml");
        assert!(matches!(result, Err(YamlError::Syntax(_))));
    }

    #[test]
    fn test_missing_file() {
        let result: Result<BTreeMap<String, u32>, _> =
            parse_yaml_file(Path::new("/nonexistent/values.yaml"));
        assert!(matches!(result, Err(YamlError::Io { .. })));
    }
}
