//! Tabular metric output.
//!
//! Every extractor produces rows of its own typed struct; `TableRow` fixes
//! the column order so the writer never has to guess.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One table cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Int(i64),
    Float(f64),
    Text(String),
    Empty,
}

impl Cell {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(n) => Some(*n as f64),
            Cell::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Int(n) => write!(f, "{}", n),
            Cell::Float(v) => write!(f, "{}", v),
            Cell::Text(s) => f.write_str(s),
            Cell::Empty => Ok(()),
        }
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Int(value)
    }
}

impl From<u64> for Cell {
    fn from(value: u64) -> Self {
        Cell::Int(value as i64)
    }
}

impl From<u32> for Cell {
    fn from(value: u32) -> Self {
        Cell::Int(i64::from(value))
    }
}

impl From<u8> for Cell {
    fn from(value: u8) -> Self {
        Cell::Int(i64::from(value))
    }
}

impl From<usize> for Cell {
    fn from(value: usize) -> Self {
        Cell::Int(value as i64)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Float(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map_or(Cell::Empty, Into::into)
    }
}

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// A typed row with a fixed column layout
pub trait TableRow {
    const COLUMNS: &'static [&'static str];

    fn cells(&self) -> Vec<Cell>;
}

/// A named, ordered table of output rows
#[derive(Debug, Clone, PartialEq)]
pub struct MetricTable {
    pub columns: &'static [&'static str],
    pub rows: Vec<Vec<Cell>>,
}

impl MetricTable {
    pub fn from_rows<R: TableRow>(rows: &[R]) -> Self {
        Self {
            columns: R::COLUMNS,
            rows: rows.iter().map(R::cells).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| *c == name)
    }

    /// All cells of a named column, top to bottom
    pub fn column(&self, name: &str) -> Vec<&Cell> {
        match self.column_index(name) {
            Some(idx) => self.rows.iter().filter_map(|row| row.get(idx)).collect(),
            None => Vec::new(),
        }
    }

    pub fn cell(&self, row: usize, name: &str) -> Option<&Cell> {
        let idx = self.column_index(name)?;
        self.rows.get(row)?.get(idx)
    }

    /// Numeric values of a named column, skipping empty cells
    pub fn column_f64(&self, name: &str) -> Vec<f64> {
        self.column(name).into_iter().filter_map(Cell::as_f64).collect()
    }
}

/// What an extractor produced
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    Table(MetricTable),

    /// The question has no answer for this match (e.g. fewer than two shots)
    Undefined(String),
}

/// Extractor output plus non-fatal diagnostics
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub value: MetricValue,
    pub warnings: Vec<String>,
}

impl Extraction {
    pub fn table<R: TableRow>(rows: &[R]) -> Self {
        Self {
            value: MetricValue::Table(MetricTable::from_rows(rows)),
            warnings: Vec::new(),
        }
    }

    pub fn undefined(reason: impl Into<String>) -> Self {
        Self {
            value: MetricValue::Undefined(reason.into()),
            warnings: Vec::new(),
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }
}

/// Final state of one metric after the engine ran
#[derive(Debug, Clone, PartialEq)]
pub enum MetricStatus {
    Computed(MetricTable),
    Undefined(String),
    Failed(String),
}

impl MetricStatus {
    pub fn label(&self) -> &'static str {
        match self {
            MetricStatus::Computed(_) => "computed",
            MetricStatus::Undefined(_) => "undefined",
            MetricStatus::Failed(_) => "failed",
        }
    }
}

/// One metric's result, ready for the writer
#[derive(Debug, Clone, PartialEq)]
pub struct MetricResult {
    pub name: &'static str,
    pub section: &'static str,
    pub status: MetricStatus,
    pub warnings: Vec<String>,
}

impl MetricResult {
    /// Output naming convention `<section>_<metric_name>`
    pub fn file_stem(&self) -> String {
        format!("{}_{}", self.section, self.name)
    }

    pub fn table(&self) -> Option<&MetricTable> {
        match &self.status {
            MetricStatus::Computed(table) => Some(table),
            _ => None,
        }
    }

    /// Reason the metric has no table
    pub fn reason(&self) -> Option<&str> {
        match &self.status {
            MetricStatus::Computed(_) => None,
            MetricStatus::Undefined(reason) | MetricStatus::Failed(reason) => Some(reason.as_str()),
        }
    }
}
