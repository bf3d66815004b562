//! Reference emission-factor table
//!
//! One row per entity (material, electricity mix, transport mode), one
//! column per impact indicator. Factors are per kg, per kWh or per t·km
//! depending on the row. Missing factors are never fatal: lookups default
//! to zero and report a [`MissingEntityWarning`].

use indexmap::IndexMap;
use miette::Diagnostic;
use std::fmt;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::identity::{EntityName, Indicator};

/// Column headers carrying the unit label rather than an indicator
const UNIT_HEADERS: &[&str] = &["unit", "unité", "unite"];

/// Why a factor could not be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingKind {
    /// No row for the entity
    Entity,
    /// The row exists but the cell is blank or the column is unknown
    Indicator,
}

/// A factor missing from the reference table (defaulted to zero)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingEntityWarning {
    pub entity: EntityName,
    pub indicator: Indicator,
    pub kind: MissingKind,
}

impl fmt::Display for MissingEntityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            MissingKind::Entity => write!(
                f,
                "'{}' not found in the reference table, '{}' defaulted to 0",
                self.entity, self.indicator
            ),
            MissingKind::Indicator => write!(
                f,
                "'{}' has no '{}' factor in the reference table, defaulted to 0",
                self.entity, self.indicator
            ),
        }
    }
}

/// Errors raised while loading a reference table
#[derive(Debug, Error, Diagnostic)]
pub enum ReferenceError {
    #[error("Failed to read reference table {path}: {source}")]
    #[diagnostic(code(lca::reference::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed reference CSV: {0}")]
    #[diagnostic(code(lca::reference::csv))]
    Csv(#[from] csv::Error),

    #[error("Reference table has no indicator columns")]
    #[diagnostic(
        code(lca::reference::header),
        help("The first row must hold the row-label column followed by one column per indicator")
    )]
    MissingHeader,

    #[error("Empty row label on line {line}")]
    #[diagnostic(code(lca::reference::label))]
    EmptyLabel { line: u64 },

    #[error("Entity '{entity}' appears twice (second occurrence on line {line})")]
    #[diagnostic(
        code(lca::reference::duplicate),
        help("Check the label aliases: two raw labels may be renamed to the same entity")
    )]
    DuplicateEntity { entity: EntityName, line: u64 },

    #[error("Invalid number '{value}' for '{entity}' / '{indicator}' on line {line}")]
    #[diagnostic(
        code(lca::reference::number),
        help("Factors must be finite numbers, e.g. 0.0599 or 0,0599")
    )]
    InvalidNumber {
        entity: EntityName,
        indicator: Indicator,
        value: String,
        line: u64,
    },
}

/// Reference table keyed by validated entity names
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceTable {
    indicators: Vec<Indicator>,
    rows: IndexMap<EntityName, IndexMap<Indicator, f64>>,
}

impl ReferenceTable {
    /// Create an empty table with the given indicator columns
    pub fn new(indicators: Vec<Indicator>) -> Self {
        Self {
            indicators,
            rows: IndexMap::new(),
        }
    }

    /// Add a row. Factors for indicators outside the column set are dropped.
    pub fn insert(
        &mut self,
        entity: EntityName,
        factors: impl IntoIterator<Item = (Indicator, f64)>,
    ) -> Option<IndexMap<Indicator, f64>> {
        let row = factors
            .into_iter()
            .filter(|(indicator, _)| self.indicators.contains(indicator))
            .collect();
        self.rows.insert(entity, row)
    }

    /// Indicator columns, in header order
    pub fn indicators(&self) -> &[Indicator] {
        &self.indicators
    }

    pub fn entities(&self) -> impl Iterator<Item = &EntityName> {
        self.rows.keys()
    }

    pub fn contains(&self, entity: &EntityName) -> bool {
        self.rows.contains_key(entity)
    }

    /// Resolve a factor without logging
    pub fn lookup(
        &self,
        entity: &EntityName,
        indicator: &Indicator,
    ) -> Result<f64, MissingEntityWarning> {
        let row = self.rows.get(entity).ok_or_else(|| MissingEntityWarning {
            entity: entity.clone(),
            indicator: indicator.clone(),
            kind: MissingKind::Entity,
        })?;
        row.get(indicator).copied().ok_or_else(|| MissingEntityWarning {
            entity: entity.clone(),
            indicator: indicator.clone(),
            kind: MissingKind::Indicator,
        })
    }

    /// Resolve a factor, defaulting to 0 with a logged warning
    pub fn factor(&self, entity: &EntityName, indicator: &Indicator) -> f64 {
        self.lookup(entity, indicator).unwrap_or_else(|warning| {
            tracing::warn!(
                entity = %warning.entity,
                indicator = %warning.indicator,
                "{}",
                warning
            );
            0.0
        })
    }

    /// Load a CSV export of the reference spreadsheet
    ///
    /// `;`-separated files (the usual French locale export) are detected
    /// from the header line.
    pub fn load(
        path: &Path,
        aliases: &IndexMap<String, EntityName>,
    ) -> Result<Self, ReferenceError> {
        let content = fs::read_to_string(path).map_err(|source| ReferenceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let delimiter = detect_delimiter(&content);
        tracing::debug!(
            path = %path.display(),
            delimiter = %(delimiter as char),
            "loading reference table"
        );
        Self::from_csv_reader(content.as_bytes(), delimiter, aliases)
    }

    /// Parse a reference table from CSV
    ///
    /// The first column holds row labels. Labels are trimmed, then renamed
    /// through `aliases` (raw spreadsheet label → canonical entity name).
    /// The `Unit` column is skipped and blank cells are left out of the row.
    /// Numbers may use a decimal comma or point with space thousands
    /// separators; with both `,` and `.` in one cell the rightmost is the
    /// decimal mark. `NaN` and infinities are rejected.
    pub fn from_csv_reader<R: Read>(
        reader: R,
        delimiter: u8,
        aliases: &IndexMap<String, EntityName>,
    ) -> Result<Self, ReferenceError> {
        let mut csv = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv.headers()?.clone();
        // column index -> indicator, label column and unit column excluded
        let columns: Vec<(usize, Indicator)> = headers
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, h)| !h.is_empty() && !UNIT_HEADERS.contains(&h.to_lowercase().as_str()))
            .map(|(i, h)| (i, Indicator::new(h)))
            .collect();

        if columns.is_empty() {
            return Err(ReferenceError::MissingHeader);
        }

        let mut table = ReferenceTable::new(columns.iter().map(|(_, c)| c.clone()).collect());

        for record in csv.records() {
            let record = record?;
            let line = record.position().map_or(0, |p| p.line());

            let raw_label = record.get(0).unwrap_or("").trim();
            if raw_label.is_empty() && record.iter().all(|cell| cell.is_empty()) {
                continue;
            }
            let entity = match aliases.get(raw_label) {
                Some(alias) => alias.clone(),
                None => EntityName::parse(raw_label)
                    .map_err(|_| ReferenceError::EmptyLabel { line })?,
            };
            if table.contains(&entity) {
                return Err(ReferenceError::DuplicateEntity { entity, line });
            }

            let mut row = IndexMap::new();
            for (index, indicator) in &columns {
                let cell = record.get(*index).unwrap_or("");
                if let Some(value) = parse_factor(cell) {
                    let value = value.map_err(|_| ReferenceError::InvalidNumber {
                        entity: entity.clone(),
                        indicator: indicator.clone(),
                        value: cell.to_string(),
                        line,
                    })?;
                    row.insert(indicator.clone(), value);
                }
            }
            table.rows.insert(entity, row);
        }

        tracing::debug!(
            entities = table.rows.len(),
            indicators = table.indicators.len(),
            "reference table loaded"
        );
        Ok(table)
    }
}

fn detect_delimiter(content: &str) -> u8 {
    let header = content.lines().next().unwrap_or("");
    if header.matches(';').count() > header.matches(',').count() {
        b';'
    } else {
        b','
    }
}

/// Parse a numeric cell; `None` for blank cells
///
/// Accepts a decimal comma and space/no-break-space thousands separators.
/// When both `.` and `,` appear, the rightmost one is the decimal mark and
/// the other is dropped as a thousands separator. A lone `,` is always a
/// decimal mark, so `1,234` reads as 1.234. Non-finite values are invalid.
fn parse_factor(cell: &str) -> Option<Result<f64, ()>> {
    let cleaned: String = cell
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{202f}')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    let normalized = match (cleaned.rfind('.'), cleaned.rfind(',')) {
        (Some(dot), Some(comma)) if comma > dot => cleaned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (None, Some(_)) => cleaned.replace(',', "."),
        _ => cleaned,
    };
    Some(
        normalized
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or(()),
    )
}
