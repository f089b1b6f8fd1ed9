//! The accumulating CSV ledger.
//!
//! Every save appends one row to `<doc>.States.csv`: the state token in the
//! reserved `ModelState` column, then one cell per widget display label. The
//! header grows additively over time as new labels appear; labels already
//! present keep their column. The whole file is rewritten on each append so
//! the header line always matches the widest row ever written.
//!
//! Cells are `|`-delimited with quoting disabled in both directions, so a
//! record is exactly the raw join of its cells. That only stays true because
//! every name and value is sanitized before it enters the table.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::error::StateError;

const DELIMITER: u8 = b'|';
const RESERVED_COLUMN: &str = "ModelState";

/// Strip the characters that would break the row format: the column
/// delimiter becomes a comma, line breaks become two-character literals.
fn sanitize(text: &str) -> String {
    text.replace(DELIMITER as char, ",")
        .replace('\r', "\\r")
        .replace('\n', "\\n")
}

/// The flat label-to-value map of one save, in first-seen label order.
///
/// Labels and values are sanitized on insertion. A label captured twice in
/// one run keeps the last value.
#[derive(Debug, Default)]
pub struct RunValues {
    order: Vec<String>,
    values: HashMap<String, String>,
}

impl RunValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: &str, value: &str) {
        let label = sanitize(label);
        if !self.values.contains_key(&label) {
            self.order.push(label.clone());
        }
        self.values.insert(label, sanitize(value));
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn labels(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    fn get(&self, label: &str) -> Option<&str> {
        self.values.get(label).map(String::as_str)
    }
}

/// The ledger file held fully in memory: one header record plus one record
/// per historical save. Rows may be shorter than the header; missing
/// trailing cells read as empty.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Ledger {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Ledger {
    /// Read the ledger, or produce an empty one when the file does not
    /// exist yet.
    pub fn load(path: &Path) -> Result<Self, StateError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(DELIMITER)
            .has_headers(false)
            .quoting(false)
            .flexible(true)
            .from_path(path)
            .map_err(|e| StateError::ledger("open", path, e))?;

        let mut ledger = Self::default();
        for (index, record) in reader.records().enumerate() {
            let record = record.map_err(|e| StateError::ledger("read", path, e))?;
            let cells: Vec<String> = record.iter().map(str::to_string).collect();
            if index == 0 {
                ledger.header = cells;
            } else {
                ledger.rows.push(cells);
            }
        }
        Ok(ledger)
    }

    /// Fold one save into the ledger file: load, reconcile the header with
    /// this run's labels, append the row, rewrite the whole file.
    pub fn append_run(
        path: &Path,
        token: Option<&str>,
        run: &RunValues,
    ) -> Result<(), StateError> {
        let mut ledger = Self::load(path)?;
        ledger.reconcile(run);
        ledger.push_row(token, run);
        ledger.write(path)
    }

    /// Bring the header up to date with this run's labels.
    ///
    /// The reserved `ModelState` column is inserted first if absent. A label
    /// already present as a non-reserved column keeps it; anything else is
    /// appended, with a numeric suffix when the plain text is taken. The
    /// suffix is only ever reachable for a widget literally labeled
    /// `ModelState`; its value then has no matching column and is dropped
    /// from the table, which mirrors how such rows have always looked.
    fn reconcile(&mut self, run: &RunValues) {
        if !self.header.iter().any(|h| h == RESERVED_COLUMN) {
            self.header.insert(0, RESERVED_COLUMN.to_string());
        }
        for label in run.labels() {
            if label != RESERVED_COLUMN && self.header.iter().any(|h| h == label) {
                continue;
            }
            let mut unique = label.to_string();
            let mut suffix = 1;
            while self.header.iter().any(|h| h == &unique) {
                unique = format!("{label}{suffix}");
                suffix += 1;
            }
            debug!(column = %unique, "adding ledger column");
            self.header.push(unique);
        }
    }

    /// Build this run's row against the reconciled header and append it.
    /// Trailing empty cells are dropped, scanning backward until the first
    /// non-empty one; the token cell is always kept, even when empty.
    fn push_row(&mut self, token: Option<&str>, run: &RunValues) {
        let mut row = vec![token.unwrap_or("").to_string()];
        for column in &self.header {
            if column == RESERVED_COLUMN {
                continue;
            }
            row.push(run.get(column).unwrap_or("").to_string());
        }
        while row.len() > 1 && row.last().is_some_and(String::is_empty) {
            row.pop();
        }
        self.rows.push(row);
    }

    fn write(&self, path: &Path) -> Result<(), StateError> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(DELIMITER)
            .quote_style(csv::QuoteStyle::Never)
            .flexible(true)
            .from_path(path)
            .map_err(|e| StateError::ledger("create", path, e))?;
        writer
            .write_record(&self.header)
            .map_err(|e| StateError::ledger("write", path, e))?;
        for row in &self.rows {
            writer
                .write_record(row)
                .map_err(|e| StateError::ledger("write", path, e))?;
        }
        writer
            .flush()
            .map_err(|e| StateError::io("flush ledger", path, e))
    }
}
