//! Tabular output in the supported formats
//!
//! Commands build a [`Grid`] of already-formatted cells and let it render
//! itself as a terminal table, Markdown or CSV. JSON and YAML serialize the
//! command's structured result directly instead.

use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tabled::{builder::Builder, settings::Style};

use crate::cli::OutputFormat;

/// Header row plus data rows of text cells
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Grid {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn builder(&self) -> Builder {
        let mut builder = Builder::default();
        builder.push_record(self.headers.iter().map(String::as_str));
        for row in &self.rows {
            builder.push_record(row.iter().map(String::as_str));
        }
        builder
    }

    /// Render for the terminal, Markdown or CSV
    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Md => Ok(self.builder().build().with(Style::markdown()).to_string() + "\n"),
            OutputFormat::Csv => self.to_csv(),
            _ => Ok(self.builder().build().with(Style::rounded()).to_string() + "\n"),
        }
    }

    fn to_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.headers).into_diagnostic()?;
        for row in &self.rows {
            writer.write_record(row).into_diagnostic()?;
        }
        let bytes = writer.into_inner().into_diagnostic()?;
        String::from_utf8(bytes).into_diagnostic()
    }
}

/// Serialize a structured result as JSON or YAML
pub fn serialize<T: Serialize>(value: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)
            .map(|s| s + "\n")
            .into_diagnostic(),
        _ => serde_yml::to_string(value).into_diagnostic(),
    }
}

/// Format a quantity for a cell
///
/// CSV keeps full precision; tables use a compact human form.
pub fn number(value: f64, format: OutputFormat) -> String {
    if format == OutputFormat::Csv {
        return value.to_string();
    }
    let magnitude = value.abs();
    if value == 0.0 {
        "0".to_string()
    } else if magnitude >= 1000.0 {
        format!("{:.1}", value)
    } else if magnitude >= 0.01 {
        format!("{:.3}", value)
    } else {
        format!("{:.3e}", value)
    }
}

/// Format a percentage for a cell
pub fn percent(value: f64, format: OutputFormat) -> String {
    if format == OutputFormat::Csv {
        value.to_string()
    } else {
        format!("{:.2} %", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Grid {
        let mut grid = Grid::new(["Phase", "kg eq. CO2"]);
        grid.push_row(["Material", "12.5"]);
        grid.push_row(["Use, phase", "3"]);
        grid
    }

    #[test]
    fn test_markdown() {
        let md = grid().render(OutputFormat::Md).unwrap();
        assert!(md.contains("| Phase"));
        assert!(md.contains("| Material"));
    }

    #[test]
    fn test_csv_quotes_commas() {
        let csv = grid().render(OutputFormat::Csv).unwrap();
        assert_eq!(csv, "Phase,kg eq. CO2\nMaterial,12.5\n\"Use, phase\",3\n");
    }

    #[test]
    fn test_table_contains_cells() {
        let table = grid().render(OutputFormat::Table).unwrap();
        assert!(table.contains("kg eq. CO2"));
        assert!(table.contains("12.5"));
    }

    #[test]
    fn test_number_formatting() {
        assert_eq!(number(0.0, OutputFormat::Table), "0");
        assert_eq!(number(1234.56, OutputFormat::Table), "1234.6");
        assert_eq!(number(2.5, OutputFormat::Table), "2.500");
        assert_eq!(number(0.000125, OutputFormat::Table), "1.250e-4");
        assert_eq!(number(0.000125, OutputFormat::Csv), "0.000125");
        assert_eq!(percent(12.346, OutputFormat::Md), "12.35 %");
    }

    #[test]
    fn test_serialize_json() {
        let json = serialize(&vec![1, 2], OutputFormat::Json).unwrap();
        assert!(json.starts_with('['));
    }
}
