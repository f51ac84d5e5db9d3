//! Grid tables and interpolation over sampled performance charts.
//!
//! A [`GridTable`] groups rows by a category key (thrust category, aircraft
//! configuration, ...). Each row carries one breakpoint per axis and one
//! optional value per dependent column. Lookups resolve, in order:
//!
//! 1. an exact match on every axis, returning the stored value untouched;
//! 2. a degenerate axis (a single breakpoint in the current slice), which
//!    collapses to interpolation along the remaining axes;
//! 3. linear blending between the two bracketing breakpoints of each live
//!    axis, which on a rectangular 2-D grid is exactly bilinear interpolation
//!    over the four surrounding corners.
//!
//! Queries outside an axis' sampled range are clamped to the nearest boundary
//! breakpoint before interpolating. Nothing is ever extrapolated.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// Structural failures raised by table construction and lookup.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InterpError {
    #[error("grid table has no rows")]
    EmptyTable,
    #[error("no rows for category '{0}'")]
    NotFound(String),
    #[error("table has no column '{0}'")]
    MissingColumn(String),
    #[error("column '{column}' has no value at {point:?}")]
    MissingValue { column: String, point: Vec<f64> },
    #[error("expected {expected} axis values, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("duplicate breakpoint {point:?} in category '{category}'")]
    DuplicateBreakpoint { category: String, point: Vec<f64> },
    #[error("non-finite value on axis '{0}'")]
    NonFinite(String),
}

impl InterpError {
    /// True for failures caused by the shape of the supplied data or query
    /// (missing columns or cells, wrong arity, duplicate or non-finite keys).
    pub fn is_schema(&self) -> bool {
        !self.is_not_found()
    }

    /// True when the table simply holds no rows for the requested category.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::EmptyTable | Self::NotFound(_))
    }
}

/// One sampled row: axis breakpoints plus dependent values.
#[derive(Debug, Clone, PartialEq)]
pub struct GridRow {
    pub point: Vec<f64>,
    pub values: Vec<Option<f64>>,
}

/// Immutable, category-keyed sample grid.
#[derive(Debug, Clone)]
pub struct GridTable<K> {
    axes: Vec<String>,
    columns: Vec<String>,
    rows: BTreeMap<K, Vec<GridRow>>,
}

/// Accumulates rows and validates them into a [`GridTable`].
#[derive(Debug, Clone)]
pub struct GridTableBuilder<K> {
    axes: Vec<String>,
    columns: Vec<String>,
    rows: BTreeMap<K, Vec<GridRow>>,
}

impl<K: Ord + fmt::Display> GridTableBuilder<K> {
    pub fn new<A, C>(axes: A, columns: C) -> Self
    where
        A: IntoIterator,
        A::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            axes: axes.into_iter().map(Into::into).collect(),
            columns: columns.into_iter().map(Into::into).collect(),
            rows: BTreeMap::new(),
        }
    }

    /// Add a row. Axis values must be finite and unique within the category.
    pub fn push(
        &mut self,
        category: K,
        point: Vec<f64>,
        values: Vec<Option<f64>>,
    ) -> Result<&mut Self, InterpError> {
        if point.len() != self.axes.len() {
            return Err(InterpError::DimensionMismatch {
                expected: self.axes.len(),
                actual: point.len(),
            });
        }
        if values.len() != self.columns.len() {
            return Err(InterpError::DimensionMismatch {
                expected: self.columns.len(),
                actual: values.len(),
            });
        }
        if let Some(idx) = point.iter().position(|v| !v.is_finite()) {
            return Err(InterpError::NonFinite(self.axes[idx].clone()));
        }

        let label = category.to_string();
        let category_rows = self.rows.entry(category).or_default();
        if category_rows.iter().any(|row| row.point == point) {
            return Err(InterpError::DuplicateBreakpoint {
                category: label,
                point,
            });
        }
        category_rows.push(GridRow { point, values });
        Ok(self)
    }

    /// Finish construction. A table without rows is rejected.
    pub fn build(self) -> Result<GridTable<K>, InterpError> {
        if self.rows.values().all(Vec::is_empty) {
            return Err(InterpError::EmptyTable);
        }
        Ok(GridTable {
            axes: self.axes,
            columns: self.columns,
            rows: self.rows,
        })
    }
}

impl<K: Ord + fmt::Display> GridTable<K> {
    pub fn builder<A, C>(axes: A, columns: C) -> GridTableBuilder<K>
    where
        A: IntoIterator,
        A::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        GridTableBuilder::new(axes, columns)
    }

    pub fn axes(&self) -> &[String] {
        &self.axes
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Categories present in the table, in key order.
    pub fn categories(&self) -> impl Iterator<Item = &K> {
        self.rows.keys()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Distinct breakpoints on `axis` for a category, ascending.
    pub fn breakpoints(&self, category: &K, axis: usize) -> Result<Vec<f64>, InterpError> {
        if axis >= self.axes.len() {
            return Err(InterpError::DimensionMismatch {
                expected: self.axes.len(),
                actual: axis + 1,
            });
        }
        let rows = self.category_rows(category)?;
        Ok(distinct_sorted(rows.iter().map(|row| row.point[axis])))
    }

    /// Interpolated value of `column` at `point` for `category`.
    pub fn lookup(&self, category: &K, point: &[f64], column: &str) -> Result<f64, InterpError> {
        let col = self.column_index(column)?;
        let rows = self.category_rows(category)?;
        self.check_point(point)?;

        if let Some(row) = rows.iter().find(|row| row.point.as_slice() == point) {
            return cell(row, col, &self.columns[col]);
        }

        let live: Vec<&GridRow> = rows.iter().collect();
        blend(&live, 0, point, col, &self.columns[col])
    }

    /// Look up several columns at the same point.
    pub fn lookup_many(
        &self,
        category: &K,
        point: &[f64],
        columns: &[&str],
    ) -> Result<Vec<f64>, InterpError> {
        columns
            .iter()
            .map(|column| self.lookup(category, point, column))
            .collect()
    }

    fn column_index(&self, column: &str) -> Result<usize, InterpError> {
        self.columns
            .iter()
            .position(|c| c == column)
            .ok_or_else(|| InterpError::MissingColumn(column.to_string()))
    }

    fn category_rows(&self, category: &K) -> Result<&[GridRow], InterpError> {
        if self.rows.values().all(Vec::is_empty) {
            return Err(InterpError::EmptyTable);
        }
        match self.rows.get(category) {
            Some(rows) if !rows.is_empty() => Ok(rows),
            _ => Err(InterpError::NotFound(category.to_string())),
        }
    }

    fn check_point(&self, point: &[f64]) -> Result<(), InterpError> {
        if point.len() != self.axes.len() {
            return Err(InterpError::DimensionMismatch {
                expected: self.axes.len(),
                actual: point.len(),
            });
        }
        match point.iter().position(|v| !v.is_finite()) {
            Some(idx) => Err(InterpError::NonFinite(self.axes[idx].clone())),
            None => Ok(()),
        }
    }
}

/// Free-function form of [`GridTable::lookup`].
pub fn lookup<K: Ord + fmt::Display>(
    table: &GridTable<K>,
    category: &K,
    point: &[f64],
    column: &str,
) -> Result<f64, InterpError> {
    table.lookup(category, point, column)
}

// Resolve one axis at a time: clamp into the slice's range, bracket the query,
// recurse into the bracketing sub-slices and blend linearly between them.
fn blend(
    rows: &[&GridRow],
    axis: usize,
    point: &[f64],
    col: usize,
    column: &str,
) -> Result<f64, InterpError> {
    if axis == point.len() {
        // Breakpoint uniqueness leaves exactly one row once every axis is fixed.
        return match rows.first() {
            Some(row) => cell(row, col, column),
            None => Err(InterpError::MissingValue {
                column: column.to_string(),
                point: point.to_vec(),
            }),
        };
    }

    let breaks = distinct_sorted(rows.iter().map(|row| row.point[axis]));
    let (lo, hi, t) = bracket(&breaks, point[axis]);

    let lower = blend(&slice(rows, axis, lo), axis + 1, point, col, column)?;
    if lo == hi {
        return Ok(lower);
    }
    let upper = blend(&slice(rows, axis, hi), axis + 1, point, col, column)?;
    Ok(lower + (upper - lower) * t)
}

// Returns the bracketing breakpoints and the fractional position between them,
// after clamping the query into [first, last].
fn bracket(breaks: &[f64], query: f64) -> (f64, f64, f64) {
    let first = breaks[0];
    let last = breaks[breaks.len() - 1];
    let q = query.clamp(first, last);

    let upper_idx = breaks.partition_point(|&b| b < q);
    let hi = breaks[upper_idx.min(breaks.len() - 1)];
    if hi == q || upper_idx == 0 {
        return (hi, hi, 0.0);
    }
    let lo = breaks[upper_idx - 1];
    (lo, hi, (q - lo) / (hi - lo))
}

fn slice<'a>(rows: &[&'a GridRow], axis: usize, value: f64) -> Vec<&'a GridRow> {
    rows.iter()
        .copied()
        .filter(|row| row.point[axis] == value)
        .collect()
}

fn cell(row: &GridRow, col: usize, column: &str) -> Result<f64, InterpError> {
    row.values[col].ok_or_else(|| InterpError::MissingValue {
        column: column.to_string(),
        point: row.point.clone(),
    })
}

fn distinct_sorted(values: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut out: Vec<f64> = values.collect();
    out.sort_by(f64::total_cmp);
    out.dedup();
    out
}
