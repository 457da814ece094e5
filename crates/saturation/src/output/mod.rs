//! Tabular output for theory-versus-simulation series.
//!
//! A [`Table`] lays several [`Series`] out side by side on a shared x axis:
//! one row per distinct x, one or more columns per series. A series that has
//! no point at some x, or whose value there is unattainable, leaves an empty
//! cell rather than a zero.

mod csv;
mod json;

pub use csv::{to_csv_string, write_csv};
pub use json::{to_json, to_json_pretty};

use serde::{Deserialize, Serialize};

use crate::series::{Series, TablePoint};

/// Relative distance under which two abscissae are the same row.
const X_MATCH_TOLERANCE: f64 = 1e-9;

fn same_x(a: f64, b: f64) -> bool {
    (a - b).abs() <= X_MATCH_TOLERANCE * a.abs().max(b.abs()).max(1.0)
}

/// One row of a [`Table`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Shared abscissa.
    pub x: f64,
    /// One cell per column; `None` is a gap.
    pub cells: Vec<Option<f64>>,
}

/// Series merged on a shared x axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Table name, used for file names and headings.
    pub name: String,
    /// Label of the x column.
    pub x_label: String,
    /// Labels of the value columns.
    pub columns: Vec<String>,
    /// Rows in ascending x.
    pub rows: Vec<Row>,
}

impl Table {
    /// Merge `series` into one table keyed by x.
    pub fn from_series<P: TablePoint>(
        name: impl Into<String>,
        x_label: impl Into<String>,
        series: &[Series<P>],
    ) -> Self {
        let columns = series
            .iter()
            .flat_map(|s| P::columns(s.label()))
            .collect();

        let mut xs: Vec<f64> = series
            .iter()
            .flat_map(|s| s.points().iter().map(TablePoint::x))
            .filter(|x| x.is_finite())
            .collect();
        xs.sort_by(f64::total_cmp);
        xs.dedup_by(|a, b| same_x(*a, *b));

        let rows = xs
            .into_iter()
            .map(|x| {
                let cells = series
                    .iter()
                    .flat_map(|s| {
                        let width = P::columns(s.label()).len();
                        match s.points().iter().find(|p| same_x(p.x(), x)) {
                            Some(point) => point.cells(),
                            None => vec![None; width],
                        }
                    })
                    .collect();
                Row { x, cells }
            })
            .collect();

        Self {
            name: name.into(),
            x_label: x_label.into(),
            columns,
            rows,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of the column called `label`, one per row.
    pub fn column(&self, label: &str) -> Option<Vec<Option<f64>>> {
        let index = self.columns.iter().position(|c| c == label)?;
        Some(self.rows.iter().map(|row| row.cells[index]).collect())
    }

    /// Number of gaps in the column called `label`.
    pub fn gaps(&self, label: &str) -> Option<usize> {
        self.column(label)
            .map(|cells| cells.iter().filter(|c| c.is_none()).count())
    }
}
