use crate::domain::value_objects::report_kind::ReportKind;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// A validated request for one account report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    account_number: String,
    kind: ReportKind,
    start_date: String,
    end_date: String,
}

impl ReportRequest {
    /// Callers outside the validator go through
    /// `domain::services::request_validator::validate`.
    pub(crate) fn new(
        account_number: String,
        kind: ReportKind,
        start_date: String,
        end_date: String,
    ) -> Self {
        Self {
            account_number,
            kind,
            start_date,
            end_date,
        }
    }

    pub fn account_number(&self) -> &str {
        &self.account_number
    }

    pub fn kind(&self) -> ReportKind {
        self.kind
    }

    pub fn start_date(&self) -> &str {
        &self.start_date
    }

    pub fn end_date(&self) -> &str {
        &self.end_date
    }
}

/// A single cell returned by a reporting function.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    /// Exact decimal text as Postgres prints it, including `NaN` and
    /// `Infinity`. Serialized as a string so no precision is lost.
    Numeric(String),
    Text(String),
    Json(serde_json::Value),
}

impl Serialize for ReportValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ReportValue::Null => serializer.serialize_unit(),
            ReportValue::Bool(v) => serializer.serialize_bool(*v),
            ReportValue::Int(v) => serializer.serialize_i64(*v),
            ReportValue::Float(v) => serializer.serialize_f64(*v),
            ReportValue::Numeric(v) => serializer.serialize_str(v),
            ReportValue::Text(v) => serializer.serialize_str(v),
            ReportValue::Json(v) => v.serialize(serializer),
        }
    }
}

/// One result row: column name to value, in backend column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportRow {
    cells: Vec<(String, ReportValue)>,
}

impl ReportRow {
    /// Pair column names with a row's values. Extra values or names beyond
    /// the shorter side are ignored.
    pub fn from_columns(columns: &[String], values: Vec<ReportValue>) -> Self {
        let mut row = Self {
            cells: Vec::with_capacity(columns.len()),
        };
        for (name, value) in columns.iter().zip(values) {
            row.insert(name.clone(), value);
        }
        row
    }

    /// A repeated column name keeps its first position and takes the latest value.
    pub fn insert(&mut self, name: String, value: ReportValue) {
        match self.cells.iter_mut().find(|(existing, _)| *existing == name) {
            Some(cell) => cell.1 = value,
            None => self.cells.push((name, value)),
        }
    }

}

impl Serialize for ReportRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (name, value) in &self.cells {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// A completed report: the request it answers and the rows, in backend order.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub request: ReportRequest,
    pub rows: Vec<ReportRow>,
}
