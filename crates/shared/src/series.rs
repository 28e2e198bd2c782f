//! Column-wise views of the abundance table, used to build chart inputs
//! without coupling charts to the raw table shape.

use crate::{domain::Abundance, error::DataError};

#[derive(Debug, Clone, PartialEq)]
pub struct NamedSeries {
    pub name: String,
    pub data: Vec<f64>,
}

impl NamedSeries {
    /// Largest finite value, or 0 for an empty or all-NaN series.
    pub fn max(&self) -> f64 {
        self.data
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v))))
            .unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Abundance {
    /// One series per requested column, in the order requested.
    pub fn series<S: AsRef<str>>(&self, columns: &[S]) -> Result<Vec<NamedSeries>, DataError> {
        columns
            .iter()
            .map(|column| {
                let column = column.as_ref();
                let index = self
                    .column_index(column)
                    .ok_or_else(|| DataError::MissingColumn {
                        column: column.to_string(),
                    })?;
                Ok(NamedSeries {
                    name: column.to_string(),
                    data: self.samples().iter().map(|s| s.values[index]).collect(),
                })
            })
            .collect()
    }

    /// Every column in header order.
    pub fn all_series(&self) -> Vec<NamedSeries> {
        self.columns()
            .iter()
            .enumerate()
            .map(|(index, name)| NamedSeries {
                name: name.clone(),
                data: self.samples().iter().map(|s| s.values[index]).collect(),
            })
            .collect()
    }
}
