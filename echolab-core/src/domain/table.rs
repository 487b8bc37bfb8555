//! PriceTable — an immutable bar series plus named indicator columns.
//!
//! Columns are aligned 1:1 with the bar series by position. The table is
//! built once (bars validated, indicator columns attached, joint NaN rows
//! dropped) and then only read; simulation code borrows it and copies what
//! it needs.

use std::collections::HashMap;

use chrono::NaiveDate;
use thiserror::Error;

use super::bar::Bar;

/// Errors raised while constructing or extending a table.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("table for '{asset}' has no bars")]
    Empty { asset: String },

    #[error("dates not strictly increasing at row {row} ({prev} >= {next})")]
    NonMonotonicDates {
        row: usize,
        prev: NaiveDate,
        next: NaiveDate,
    },

    #[error("column '{column}' has {got} values, table has {expected} rows")]
    LengthMismatch {
        column: String,
        expected: usize,
        got: usize,
    },
}

/// Bar series + named indicator columns for one asset.
#[derive(Debug, Clone)]
pub struct PriceTable {
    asset: String,
    bars: Vec<Bar>,
    columns: HashMap<String, Vec<f64>>,
}

impl PriceTable {
    /// Build a table from a bar series, validating the date invariant:
    /// strictly increasing, no duplicates.
    pub fn from_bars(asset: impl Into<String>, bars: Vec<Bar>) -> Result<Self, TableError> {
        let asset = asset.into();
        if bars.is_empty() {
            return Err(TableError::Empty { asset });
        }
        for (i, pair) in bars.windows(2).enumerate() {
            if pair[0].date >= pair[1].date {
                return Err(TableError::NonMonotonicDates {
                    row: i + 1,
                    prev: pair[0].date,
                    next: pair[1].date,
                });
            }
        }
        Ok(Self {
            asset,
            bars,
            columns: HashMap::new(),
        })
    }

    pub fn asset(&self) -> &str {
        &self.asset
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Attach a named indicator column. The column must match the bar count.
    pub fn insert_column(
        &mut self,
        name: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<(), TableError> {
        let name = name.into();
        if values.len() != self.bars.len() {
            return Err(TableError::LengthMismatch {
                column: name,
                expected: self.bars.len(),
                got: values.len(),
            });
        }
        self.columns.insert(name, values);
        Ok(())
    }

    /// Look up an indicator column by name.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(|v| v.as_slice())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Names of all attached indicator columns, sorted.
    pub fn column_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.columns.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// The adjusted-close column, copied out.
    pub fn adj_close(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.adj_close).collect()
    }

    /// A new table keeping only rows where every indicator column is finite
    /// (non-NaN). Warmup prefixes and degenerate mid-series values drop out
    /// together; surviving rows keep their original relative order.
    pub fn drop_undefined(&self) -> Self {
        let keep: Vec<usize> = (0..self.bars.len())
            .filter(|&i| self.columns.values().all(|col| !col[i].is_nan()))
            .collect();

        let bars = keep.iter().map(|&i| self.bars[i].clone()).collect();
        let columns = self
            .columns
            .iter()
            .map(|(name, col)| {
                let vals = keep.iter().map(|&i| col[i]).collect();
                (name.clone(), vals)
            })
            .collect();

        Self {
            asset: self.asset.clone(),
            bars,
            columns,
        }
    }
}
