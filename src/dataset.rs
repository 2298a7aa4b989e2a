//! Labeled measurement tables.
//!
//! A dataset mirrors the spreadsheet layout operators record subgroups in:
//! one row per subgroup, the first column a label (lot, timestamp, sample
//! id), every following column one measurement. The label column is kept
//! for display and excluded from the statistics.
//!
//! On disk the table is TOML:
//!
//! ```toml
//! columns = ["Lot", "x1", "x2", "x3"]
//! rows = [
//!     ["L-01", 10.0, 12.0, 11.0],
//!     ["L-02", 9.0, 13.0, 11.0],
//! ]
//! ```
//!
//! `columns` is optional.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::{LoadError, SpcError};
use crate::spc::SubgroupMatrix;

/// One cell of a dataset row.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    /// A number (TOML integers are widened to `f64`).
    Number(f64),
    /// Anything textual.
    Text(String),
}

impl Cell {
    fn label(&self) -> String {
        match self {
            Cell::Number(x) => x.to_string(),
            Cell::Text(s) => s.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDataset {
    #[serde(default)]
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

/// A validated dataset: labels plus the subgroup matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Column headers, if the source provided them.
    pub columns: Vec<String>,
    /// One label per subgroup.
    pub labels: Vec<String>,
    /// Measurements with the label column removed.
    pub matrix: SubgroupMatrix,
}

impl Dataset {
    /// Builds a dataset from raw rows, first cell being the label.
    ///
    /// # Errors
    ///
    /// - [`SpcError::NonNumeric`] if a measurement cell is text or not
    ///   finite. `position` counts measurements, not the label column.
    /// - [`SpcError::EmptyInput`] / [`SpcError::InvalidShape`] as for
    ///   [`SubgroupMatrix::new`]; a row holding only a label has width 0.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_spc::dataset::{Cell, Dataset};
    ///
    /// let ds = Dataset::from_rows(vec![
    ///     vec![Cell::Text("A".into()), Cell::Number(1.0), Cell::Number(2.0)],
    ///     vec![Cell::Text("B".into()), Cell::Number(3.0), Cell::Number(5.0)],
    /// ]).unwrap();
    /// assert_eq!(ds.labels, vec!["A", "B"]);
    /// assert_eq!(ds.matrix.subgroup_size(), 2);
    /// ```
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self, SpcError> {
        let mut labels = Vec::with_capacity(rows.len());
        let mut values = Vec::with_capacity(rows.len());

        for (i, row) in rows.iter().enumerate() {
            let (label, cells) = match row.split_first() {
                Some((label, cells)) => (label.label(), cells),
                None => (String::new(), &[][..]),
            };
            let measurements = cells
                .iter()
                .enumerate()
                .map(|(j, cell)| match cell {
                    Cell::Number(x) => Ok(*x),
                    Cell::Text(_) => Err(SpcError::NonNumeric {
                        subgroup: i,
                        position: j,
                    }),
                })
                .collect::<Result<Vec<f64>, _>>()?;
            labels.push(label);
            values.push(measurements);
        }

        let matrix = SubgroupMatrix::new(values)?;
        Ok(Self {
            columns: Vec::new(),
            labels,
            matrix,
        })
    }

    /// Parses a dataset from TOML text.
    ///
    /// # Errors
    ///
    /// [`LoadError::Parse`] for malformed TOML, [`LoadError::Engine`] for
    /// content the engine rejects.
    pub fn from_toml_str(content: &str) -> Result<Self, LoadError> {
        Self::parse(content, "<inline>")
    }

    /// Reads a dataset file.
    ///
    /// # Errors
    ///
    /// [`LoadError::Io`] if the file cannot be read, otherwise as
    /// [`Dataset::from_toml_str`].
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, &path.display().to_string())
    }

    fn parse(content: &str, origin: &str) -> Result<Self, LoadError> {
        let raw: RawDataset = toml::from_str(content).map_err(|source| LoadError::Parse {
            origin: origin.to_string(),
            source,
        })?;
        let mut dataset = Self::from_rows(raw.rows)?;
        dataset.columns = raw.columns;
        debug!(
            origin,
            subgroups = dataset.matrix.subgroup_count(),
            subgroup_size = dataset.matrix.subgroup_size(),
            "dataset loaded"
        );
        Ok(dataset)
    }
}
