//! Tabular record ingestion: header + rows of text cells to a roster.
//!
//! [`RecordImporter::import_reader`] reads CSV text (byte-order mark, any
//! line ending, quoted fields, blank lines). [`RecordImporter::import`]
//! takes cells that are already split. Either way this module decides
//! which columns are criteria, converts cells to scores, splits names and
//! tags, and assigns identifiers.

use std::io::Read;

use thiserror::Error;

use super::criterion::{Criterion, DEFAULT_MAX};
use super::types::{Gender, Individual, Roster};

/// Failure to read a CSV table.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("malformed table: {0}")]
    Csv(#[from] csv::Error),
}

/// Columns with a fixed meaning; every other column may become a criterion.
const CORE_COLUMNS: [&str; 9] = [
    "id",
    "firstname",
    "lastname",
    "name",
    "gender",
    "tags",
    "notes",
    "previousteacher",
    "previous_teacher",
];

/// Configuration for [`RecordImporter`].
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// A column is a criterion when the share of its non-empty cells that
    /// parse as scores is strictly greater than this.
    pub numeric_majority: f64,

    /// Criterion maximum used when a column has no positive value.
    pub default_max: f64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            numeric_majority: 0.5,
            default_max: DEFAULT_MAX,
        }
    }
}

impl IngestConfig {
    pub fn with_numeric_majority(mut self, share: f64) -> Self {
        self.numeric_majority = share;
        self
    }

    pub fn with_default_max(mut self, max: f64) -> Self {
        self.default_max = max;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..1.0).contains(&self.numeric_majority) {
            return Err("numeric_majority must be in [0, 1)".into());
        }
        if !(self.default_max.is_finite() && self.default_max > 0.0) {
            return Err("default_max must be positive".into());
        }
        Ok(())
    }
}

/// Result of an import: the roster and the criteria detected in it.
#[derive(Debug, Clone, Default)]
pub struct ImportedRoster {
    pub roster: Roster,
    pub criteria: Vec<Criterion>,
}

/// Parses one score cell.
///
/// Numbers parse as-is; a single letter `A`..`Z` (any case) is a grade
/// level mapped to `1..=26`. Blank or unrecognized cells give `None`.
pub fn parse_raw_value(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    if let Ok(v) = cell.parse::<f64>() {
        return v.is_finite().then_some(v);
    }
    let mut chars = cell.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => {
            Some(f64::from(c.to_ascii_uppercase() as u8 - b'A' + 1))
        }
        _ => None,
    }
}

/// True when more than `majority` of the non-empty cells parse as scores.
pub fn is_mostly_numeric<S: AsRef<str>>(cells: &[S], majority: f64) -> bool {
    let non_empty: Vec<&str> = cells
        .iter()
        .map(|c| c.as_ref().trim())
        .filter(|c| !c.is_empty())
        .collect();
    if non_empty.is_empty() {
        return false;
    }
    let numeric = non_empty
        .iter()
        .filter(|c| parse_raw_value(c).is_some())
        .count();
    numeric as f64 / non_empty.len() as f64 > majority
}

/// Splits a combined name on whitespace: first word, then the rest.
pub fn split_name(name: &str) -> (String, String) {
    let mut parts = name.split_whitespace();
    let first = parts.next().unwrap_or_default().to_string();
    let rest = parts.collect::<Vec<_>>().join(" ");
    (first, rest)
}

/// Splits a free-text tag list on any of `, ; / |`.
pub fn split_tags(tags: &str) -> Vec<String> {
    tags.split([',', ';', '/', '|'])
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// Lowercase alphanumeric form used for header matching and derived ids.
pub fn normalize_key(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Header matching keeps the underscore of `previous_teacher`.
fn normalize_header(s: &str) -> String {
    let trimmed = s.trim().to_ascii_lowercase();
    if trimmed == "previous_teacher" {
        return trimmed;
    }
    normalize_key(&trimmed)
}

fn cell<S: AsRef<str>>(row: &[S], col: usize) -> String {
    row.get(col)
        .map(|c| c.as_ref().trim().to_string())
        .unwrap_or_default()
}

/// Converts header + rows into individuals and criteria.
#[derive(Debug, Clone, Default)]
pub struct RecordImporter {
    config: IngestConfig,
}

impl RecordImporter {
    pub fn new(config: IngestConfig) -> Self {
        Self { config }
    }

    /// Reads a CSV table whose first record is the header.
    ///
    /// A leading byte-order mark is dropped, rows may differ in length,
    /// and rows with only blank cells are skipped.
    pub fn import_reader<R: Read>(&self, reader: R) -> Result<ImportedRoster, IngestError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .enumerate()
            .map(|(i, h)| match i {
                0 => h.trim_start_matches('\u{feff}').to_string(),
                _ => h.to_string(),
            })
            .collect();

        let mut rows: Vec<Vec<String>> = Vec::new();
        for record in reader.records() {
            let record = record?;
            if record.iter().all(|c| c.trim().is_empty()) {
                continue;
            }
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(self.import(&headers, &rows))
    }

    /// Imports the rows.
    ///
    /// Rows without any name data are skipped. Short rows read missing
    /// cells as blank.
    pub fn import<S: AsRef<str>>(&self, headers: &[S], rows: &[Vec<S>]) -> ImportedRoster {
        let headers_norm: Vec<String> = headers.iter().map(|h| normalize_header(h.as_ref())).collect();
        let column_of = |key: &str| headers_norm.iter().position(|h| h == key);

        let criterion_columns: Vec<usize> = (0..headers.len())
            .filter(|&col| !CORE_COLUMNS.iter().any(|core| *core == headers_norm[col]))
            .filter(|&col| {
                let cells: Vec<String> = rows.iter().map(|r| cell(r, col)).collect();
                is_mostly_numeric(&cells, self.config.numeric_majority)
            })
            .collect();

        let criteria: Vec<Criterion> = criterion_columns
            .iter()
            .map(|&col| {
                let max = rows
                    .iter()
                    .filter_map(|r| parse_raw_value(&cell(r, col)))
                    .fold(0.0_f64, f64::max);
                let max = if max > 0.0 { max } else { self.config.default_max };
                Criterion::new(headers[col].as_ref().trim()).with_max(max)
            })
            .collect();

        let mut roster = Roster::new();
        for (r, row) in rows.iter().enumerate() {
            let field = |key: &str| column_of(key).map(|col| cell(row, col)).unwrap_or_default();

            let mut first = field("firstname");
            let mut last = field("lastname");
            let combined = field("name");
            if first.is_empty() && last.is_empty() {
                if combined.is_empty() {
                    continue;
                }
                (first, last) = split_name(&combined);
            }

            let explicit_id = field("id");
            let base = if explicit_id.is_empty() {
                normalize_key(&format!("{first}{last}"))
            } else {
                explicit_id
            };
            let id = roster.unique_id(&base, &format!("row{}", r + 1));

            let previous = match field("previousteacher") {
                p if p.is_empty() => field("previous_teacher"),
                p => p,
            };

            let mut individual = Individual::new(id, first, last);
            individual.gender = Gender::parse(&field("gender"));
            individual.tags = split_tags(&field("tags"));
            individual.notes = field("notes");
            individual.previous_group = previous;
            for (criterion, &col) in criteria.iter().zip(&criterion_columns) {
                let value = parse_raw_value(&cell(row, col)).unwrap_or(0.0);
                individual.scores.insert(criterion.label.clone(), value);
            }
            roster.insert(individual);
        }

        tracing::debug!(
            event = "roster_imported",
            individuals = roster.len(),
            criteria = criteria.len(),
        );
        ImportedRoster { roster, criteria }
    }
}
