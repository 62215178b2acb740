//! Table records owned by the data owner.
//!
//! The drag engine never touches these. It emits `(from, to)` pairs and the
//! owner applies them here, then re-renders.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use crate::error::DataError;

// =============================================================================
// RowKey
// =============================================================================

/// Stable row identity, either numeric or textual.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowKey {
    Number(i64),
    Text(String),
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowKey::Number(n) => write!(f, "{}", n),
            RowKey::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RowKey {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for RowKey {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for RowKey {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

// =============================================================================
// TableRow
// =============================================================================

/// One record: a key, its cell values, and an optional inner group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub key: RowKey,

    /// Cell values, one per column.
    pub values: Vec<String>,

    /// Nested rows, reorderable among themselves.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner: Option<Vec<TableRow>>,

    /// The row's drag handle ignores pointer-downs.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
}

impl TableRow {
    /// Create a row without an inner group.
    pub fn new<I, S>(key: impl Into<RowKey>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            key: key.into(),
            values: values.into_iter().map(Into::into).collect(),
            inner: None,
            disabled: false,
        }
    }

    /// Attach an inner group.
    pub fn with_inner(mut self, inner: Vec<TableRow>) -> Self {
        self.inner = Some(inner);
        self
    }

    /// Lock the row in place.
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Number of inner rows, zero when there is no inner group.
    pub fn inner_len(&self) -> usize {
        self.inner.as_ref().map_or(0, Vec::len)
    }
}

// =============================================================================
// Move application
// =============================================================================

/// Remove the element at `from` and insert it at `to`.
///
/// Out-of-range indices and `from == to` leave the vector untouched.
/// Returns whether the order changed.
pub fn move_element<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    let len = items.len();
    if from >= len || to >= len || from == to {
        return false;
    }

    let item = items.remove(from);
    items.insert(to, item);
    true
}

// =============================================================================
// TableData
// =============================================================================

/// The full ordered list of top-level rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableData {
    rows: Vec<TableRow>,
}

impl TableData {
    pub fn new(rows: Vec<TableRow>) -> Self {
        Self { rows }
    }

    /// Parse rows from JSON and validate sibling keys are unique.
    pub fn from_json(json: &str) -> Result<Self, DataError> {
        let data: Self = serde_json::from_str(json).map_err(|e| DataError::Parse(e.to_string()))?;
        data.validate()?;
        Ok(data)
    }

    /// Read and parse a JSON file.
    pub fn load(path: &Path) -> Result<Self, DataError> {
        let json = std::fs::read_to_string(path).map_err(|e| DataError::Io(e.to_string()))?;
        Self::from_json(&json)
    }

    /// Reject duplicate keys among top-level rows and within each inner group.
    pub fn validate(&self) -> Result<(), DataError> {
        check_unique(&self.rows)?;
        for row in &self.rows {
            if let Some(inner) = &row.inner {
                check_unique(inner)?;
            }
        }
        Ok(())
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<TableRow> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Find a top-level row by key.
    pub fn get(&self, key: &RowKey) -> Option<&TableRow> {
        self.rows.iter().find(|r| &r.key == key)
    }

    /// Reorder top-level rows.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        move_element(&mut self.rows, from, to)
    }

    /// Reorder rows inside the inner group of the row keyed `base_key`.
    ///
    /// Unknown keys and rows without an inner group are a no-op.
    pub fn reorder_inner(&mut self, base_key: &RowKey, from: usize, to: usize) -> bool {
        let Some(base) = self.rows.iter_mut().find(|r| &r.key == base_key) else {
            return false;
        };

        match base.inner.as_mut() {
            Some(inner) => move_element(inner, from, to),
            None => false,
        }
    }

    /// Inner row counts, one per top-level row, in display order.
    pub fn inner_counts(&self) -> Vec<usize> {
        self.rows.iter().map(TableRow::inner_len).collect()
    }

    /// Number of cells in the widest row, inner rows included.
    pub fn column_count(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|r| std::iter::once(r).chain(r.inner.iter().flatten()))
            .map(|r| r.values.len())
            .max()
            .unwrap_or(0)
    }
}

fn check_unique(rows: &[TableRow]) -> Result<(), DataError> {
    let mut seen = HashSet::new();
    for row in rows {
        if !seen.insert(&row.key) {
            return Err(DataError::DuplicateKey(row.key.to_string()));
        }
    }
    Ok(())
}

// =============================================================================
// ExpandedRows
// =============================================================================

/// Which rows currently show their inner group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandedRows {
    keys: HashSet<RowKey>,
}

impl ExpandedRows {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, key: &RowKey) -> bool {
        self.keys.contains(key)
    }

    /// Flip a row's expansion. Returns the new state.
    pub fn toggle(&mut self, key: &RowKey) -> bool {
        if self.keys.remove(key) {
            false
        } else {
            self.keys.insert(key.clone());
            true
        }
    }

    /// Expand every row that has an inner group.
    pub fn expand_all(&mut self, data: &TableData) {
        self.keys.extend(
            data.rows()
                .iter()
                .filter(|r| r.inner.is_some())
                .map(|r| r.key.clone()),
        );
    }

    pub fn collapse_all(&mut self) {
        self.keys.clear();
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================
