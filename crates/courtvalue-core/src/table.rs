// Loosely-typed tabular input as handed over by the data loader.
//
// Statistics and salary sources arrive with whatever columns the upstream
// page happened to have. `RawTable` keeps them as ordered columns of
// nullable cells until the schema is pinned down and typed records are built.

use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Cells
// ---------------------------------------------------------------------------

/// A single table cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Build a cell from loader text: blank is null, numeric text is a number.
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return CellValue::Null;
        }
        match trimmed.parse::<f64>() {
            Ok(v) => CellValue::Number(v),
            Err(_) => CellValue::Text(text.to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Coerce to a number. Unparseable text, null and NaN all yield `None`.
    pub fn coerce_number(&self) -> Option<f64> {
        let v = match self {
            CellValue::Number(v) => *v,
            CellValue::Text(s) => s.trim().parse::<f64>().ok()?,
            CellValue::Null => return None,
        };
        if v.is_nan() {
            None
        } else {
            Some(v)
        }
    }

    /// True when a numeric conversion of this cell would succeed.
    ///
    /// Unlike `coerce_number`, "nan" text counts as numeric here: it converts
    /// fine, it just converts to NaN.
    pub fn looks_numeric(&self) -> bool {
        match self {
            CellValue::Number(_) => true,
            CellValue::Text(s) => s.trim().parse::<f64>().is_ok(),
            CellValue::Null => false,
        }
    }

    /// String form used for name joins. Null has no string form.
    pub fn as_name(&self) -> Option<String> {
        match self {
            CellValue::Null => None,
            CellValue::Number(v) => Some(v.to_string()),
            CellValue::Text(s) => Some(s.trim().to_string()),
        }
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Number(v)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// Ordered columns of nullable cells. Rows always have one cell per column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// The explicitly-empty table the loader hands over for a missing source.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a table from record-shaped rows (JSON objects and the like).
    ///
    /// Columns are the union of all keys in order of first appearance; keys
    /// missing from a record become null cells.
    pub fn from_records<I, R>(records: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = (String, CellValue)>,
    {
        let mut columns: Vec<String> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut keyed_rows: Vec<Vec<(usize, CellValue)>> = Vec::new();

        for record in records {
            let mut row = Vec::new();
            for (key, value) in record {
                let idx = match index.get(&key) {
                    Some(&i) => i,
                    None => {
                        columns.push(key.clone());
                        index.insert(key, columns.len() - 1);
                        columns.len() - 1
                    }
                };
                row.push((idx, value));
            }
            keyed_rows.push(row);
        }

        let width = columns.len();
        let rows = keyed_rows
            .into_iter()
            .map(|keyed| {
                let mut row = vec![CellValue::Null; width];
                for (idx, value) in keyed {
                    row[idx] = value;
                }
                row
            })
            .collect();

        Self { columns, rows }
    }

    /// Append a row, padding with nulls or truncating to the column count.
    pub fn push_row(&mut self, mut row: Vec<CellValue>) {
        row.resize(self.columns.len(), CellValue::Null);
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// A table with no rows or no columns counts as empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.columns.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[CellValue]> {
        self.rows.iter().map(|r| r.as_slice())
    }

    /// Cells of one column, top to bottom.
    pub fn column(&self, idx: usize) -> impl Iterator<Item = &CellValue> {
        self.rows.iter().map(move |r| &r[idx])
    }

    /// Cells of a named column, or `None` if the column does not exist.
    pub fn column_by_name(&self, name: &str) -> Option<impl Iterator<Item = &CellValue>> {
        self.column_index(name).map(|idx| self.column(idx))
    }

    /// Count of null cells across the whole table.
    pub fn null_count(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|r| r.iter())
            .filter(|c| c.is_null())
            .count()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
