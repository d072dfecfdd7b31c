//! CSV format dataset implementation
//!
//! Supports loading datasets from CSV files where:
//! - The last column is the label
//! - All other columns are features
//! - First row can be headers (automatically detected)
//!
//! A feature column holding any non-numeric field is categorical: every field
//! of that column is mapped through [`DatasetInfo`] to an integer id.

use super::info::DatasetInfo;
use crate::core::{DataMatrix, Dataset, Result, SVMError};
use log::debug;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// A data line split into feature fields and its binary label
struct RawRow {
    line_num: usize,
    fields: Vec<String>,
    label: f64,
}

/// Dataset implementation for CSV format files
#[derive(Debug, Clone)]
pub struct CSVDataset {
    matrix: DataMatrix,
    info: DatasetInfo,
}

impl CSVDataset {
    /// Load a dataset from a CSV file
    ///
    /// The last column is assumed to be the label.
    /// Headers are automatically detected if present.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path).map_err(SVMError::IoError)?;
        let reader = BufReader::new(file);
        Self::from_reader(reader)
    }

    /// Load a dataset from a reader, detecting a header line
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, true)
    }

    /// Load a dataset from a reader with explicit header option
    pub fn from_reader_with_options<R: BufRead>(
        reader: R,
        auto_detect_header: bool,
    ) -> Result<Self> {
        let mut rows: Vec<RawRow> = Vec::new();
        let mut seen_first = false;

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(SVMError::IoError)?;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if !seen_first {
                seen_first = true;
                if auto_detect_header && Self::is_header_line(line) {
                    debug!("Skipping CSV header: {}", line);
                    continue;
                }
            }

            let row = Self::parse_data_line(line, line_num + 1)?;
            if let Some(first) = rows.first() {
                if row.fields.len() != first.fields.len() {
                    return Err(SVMError::ParseError(format!(
                        "line {} has {} columns, expected {}",
                        line_num + 1,
                        row.fields.len() + 1,
                        first.fields.len() + 1
                    )));
                }
            }
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(SVMError::EmptyDataset);
        }

        let n_features = rows[0].fields.len();
        let mut info = DatasetInfo::new(n_features);

        let categorical: Vec<bool> = (0..n_features)
            .map(|col| {
                rows.iter()
                    .any(|row| row.fields[col].parse::<f64>().is_err())
            })
            .collect();

        let n_rows = n_features + 1;
        let mut data = Vec::with_capacity(n_rows * rows.len());
        for row in &rows {
            for (col, field) in row.fields.iter().enumerate() {
                let value = if categorical[col] {
                    info.map_string(field, col)
                } else {
                    field.parse::<f64>().map_err(|_| {
                        SVMError::ParseError(format!(
                            "Invalid feature value at line {}, column {}: {}",
                            row.line_num,
                            col + 1,
                            field
                        ))
                    })?
                };
                data.push(value);
            }
            data.push(row.label);
        }

        if info.has_categorical() {
            debug!(
                "Mapped {} categorical column(s)",
                categorical.iter().filter(|&&c| c).count()
            );
        }

        Ok(CSVDataset {
            matrix: DataMatrix::new(n_rows, rows.len(), data)?,
            info,
        })
    }

    /// Type and categorical mapping information of the feature columns
    pub fn info(&self) -> &DatasetInfo {
        &self.info
    }

    /// Check if a line appears to be a header
    ///
    /// Data lines always carry a numeric label, so a non-numeric last field
    /// marks a header.
    fn is_header_line(line: &str) -> bool {
        let fields: Vec<&str> = line.split(',').collect();

        if fields.len() < 2 {
            return false;
        }

        fields[fields.len() - 1].trim().parse::<f64>().is_err()
    }

    /// Split a CSV data line into feature fields and label
    fn parse_data_line(line: &str, line_num: usize) -> Result<RawRow> {
        let fields: Vec<&str> = line.split(',').map(|f| f.trim()).collect();

        if fields.len() < 2 {
            return Err(SVMError::ParseError(format!(
                "Line {} has too few fields: {}",
                line_num, line
            )));
        }

        // Last field is the label
        let label_str = fields[fields.len() - 1];
        let label = label_str
            .parse::<f64>()
            .ok()
            .filter(|label| label.is_finite())
            .ok_or_else(|| SVMError::ParseError(format!("Invalid label: {}", label_str)))?;

        // Convert to binary label if needed
        let label = if label > 0.0 { 1.0 } else { -1.0 };

        let features = &fields[..fields.len() - 1];
        if let Some(col) = features.iter().position(|f| f.is_empty()) {
            return Err(SVMError::ParseError(format!(
                "Missing value at line {}, column {}",
                line_num,
                col + 1
            )));
        }
        if let Some(col) = features
            .iter()
            .position(|f| f.parse::<f64>().map_or(false, |v| !v.is_finite()))
        {
            return Err(SVMError::ParseError(format!(
                "Non-finite value at line {}, column {}: {}",
                line_num,
                col + 1,
                features[col]
            )));
        }

        Ok(RawRow {
            line_num,
            fields: features.iter().map(|f| f.to_string()).collect(),
            label,
        })
    }
}

impl Dataset for CSVDataset {
    fn matrix(&self) -> &DataMatrix {
        &self.matrix
    }
}
