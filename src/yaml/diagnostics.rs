//! YAML parse errors pointing at the offending line of the input file

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// YAML syntax or schema error with source location
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(lca::yaml::syntax))]
pub struct YamlSyntaxError {
    #[source_code]
    src: NamedSource<String>,

    #[label("here")]
    span: SourceSpan,

    #[help]
    help: Option<String>,

    message: String,
}

impl YamlSyntaxError {
    /// Build from a serde_yml error, locating it in `source`
    pub fn from_serde_error(err: &serde_yml::Error, source: &str, filename: &str) -> Self {
        let offset = err
            .location()
            .map(|loc| line_col_to_offset(source, loc.line(), loc.column()))
            .unwrap_or(0);
        let message = err.to_string();

        Self {
            src: NamedSource::new(filename, source.to_string()),
            span: SourceSpan::from(offset..offset.saturating_add(1).min(source.len().max(1))),
            help: suggest(&message),
            message,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Convert a 1-based line/column into a byte offset, clamped to the source
fn line_col_to_offset(source: &str, line: usize, column: usize) -> usize {
    let line_start = source
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum::<usize>();
    let line_text = source[line_start..].lines().next().unwrap_or("");
    let col_offset = line_text
        .char_indices()
        .nth(column.saturating_sub(1))
        .map_or(line_text.len(), |(i, _)| i);
    (line_start + col_offset).min(source.len())
}

/// Hints for the mistakes people make in product files
fn suggest(message: &str) -> Option<String> {
    let msg = message.to_lowercase();

    if msg.contains("unknown country") {
        return Some("Known countries are France, China (or Chine) and Taiwan".to_string());
    }
    if msg.contains("unknown transport mode") || msg.contains("unknown variant") {
        return Some("Transport modes are train, truck, plane and boat".to_string());
    }
    if msg.contains("conflicting entries") {
        return Some(
            "'A - B' and 'B - A' are the same route; keep a single entry per pair".to_string(),
        );
    }
    if msg.contains("missing field") {
        return Some("Run `lca init` to get a complete sample product file".to_string());
    }
    if msg.contains("tab") {
        return Some("YAML indentation must use spaces, not tabs".to_string());
    }
    None
}
