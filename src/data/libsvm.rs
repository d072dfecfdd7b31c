//! LibSVM format dataset implementation
//!
//! Supports loading datasets in the libsvm format:
//! label index:value index:value ...
//!
//! Example:
//! +1 1:0.5 3:1.2 7:0.8
//! -1 2:0.3 5:2.1
//!
//! The sparse lines are densified into a [`DataMatrix`] whose feature count is
//! the largest index seen.

use crate::core::{DataMatrix, Dataset, Result, SVMError};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Largest number of matrix cells (label row included) a load may allocate
pub const MAX_DENSE_CELLS: usize = 1 << 30;

/// One parsed line: label and 0-based (index, value) pairs
type SparseLine = (f64, Vec<(usize, f64)>);

/// Dataset implementation for LibSVM format files
#[derive(Debug, Clone)]
pub struct LibSVMDataset {
    matrix: DataMatrix,
}

impl LibSVMDataset {
    /// Load a dataset from a LibSVM format file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path).map_err(SVMError::IoError)?;
        let reader = BufReader::new(file);
        Self::from_reader(reader)
    }

    /// Load a dataset from a reader (for testing and flexibility)
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        Self::from_reader_with_dim(reader, 0)
    }

    /// Load a dataset padding every sample to at least `min_features` features
    ///
    /// Useful when a test file does not mention the highest feature index of
    /// the training file.
    pub fn from_reader_with_dim<R: BufRead>(reader: R, min_features: usize) -> Result<Self> {
        let mut lines = Vec::new();
        let mut n_features = min_features;

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(SVMError::IoError)?;
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            match Self::parse_line(line) {
                Ok((label, pairs)) => {
                    if let Some(&(max_idx, _)) = pairs.last() {
                        let width = max_idx.checked_add(1).ok_or_else(|| {
                            SVMError::ParseError(format!(
                                "Feature index too large at line {}",
                                line_num + 1
                            ))
                        })?;
                        n_features = n_features.max(width);
                    }
                    lines.push((label, pairs));
                }
                Err(e) => {
                    return Err(SVMError::ParseError(format!(
                        "Error parsing line {}: {}",
                        line_num + 1,
                        e
                    )));
                }
            }
        }

        if lines.is_empty() {
            return Err(SVMError::EmptyDataset);
        }

        let n_cells = n_features
            .checked_add(1)
            .and_then(|rows| rows.checked_mul(lines.len()))
            .filter(|&cells| cells <= MAX_DENSE_CELLS)
            .ok_or_else(|| {
                SVMError::InvalidDataset(format!(
                    "{} samples with {} features exceed the dense limit of {} cells",
                    lines.len(),
                    n_features,
                    MAX_DENSE_CELLS
                ))
            })?;
        let n_rows = n_cells / lines.len();

        let mut data = Vec::new();
        data.try_reserve_exact(n_cells).map_err(|e| {
            SVMError::InvalidDataset(format!("Cannot allocate {} cells: {}", n_cells, e))
        })?;
        data.resize(n_cells, 0.0);
        for (col, (label, pairs)) in lines.iter().enumerate() {
            let column = &mut data[col * n_rows..(col + 1) * n_rows];
            for &(idx, value) in pairs {
                column[idx] = value;
            }
            column[n_features] = *label;
        }

        Ok(LibSVMDataset {
            matrix: DataMatrix::new(n_rows, lines.len(), data)?,
        })
    }

    /// Parse a single line in libsvm format
    ///
    /// Pairs come back sorted by index.
    fn parse_line(line: &str) -> Result<SparseLine> {
        let parts: Vec<&str> = line.split_whitespace().collect();

        if parts.is_empty() {
            return Err(SVMError::ParseError("Empty line".to_string()));
        }

        // Parse label
        let label = parts[0]
            .parse::<f64>()
            .ok()
            .filter(|label| label.is_finite())
            .ok_or_else(|| SVMError::ParseError(format!("Invalid label: {}", parts[0])))?;

        // Convert +1/-1 if needed, or validate binary labels
        let label = if label > 0.0 { 1.0 } else { -1.0 };

        let mut pairs = Vec::with_capacity(parts.len() - 1);
        for feature_str in &parts[1..] {
            let (index, value) = feature_str.split_once(':').ok_or_else(|| {
                SVMError::ParseError(format!("Invalid feature format: {}", feature_str))
            })?;

            let index = index
                .parse::<usize>()
                .map_err(|_| SVMError::ParseError(format!("Invalid feature index: {}", index)))?;

            let value = value
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .ok_or_else(|| {
                    SVMError::ParseError(format!("Invalid feature value: {}", value))
                })?;

            // libsvm uses 1-based indexing, convert to 0-based
            if index == 0 {
                return Err(SVMError::ParseError(format!(
                    "Feature index must be positive: {}",
                    index
                )));
            }

            pairs.push((index - 1, value));
        }

        pairs.sort_by_key(|&(idx, _)| idx);
        Ok((label, pairs))
    }
}

impl Dataset for LibSVMDataset {
    fn matrix(&self) -> &DataMatrix {
        &self.matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_line_basic() {
        let (label, pairs) = LibSVMDataset::parse_line("+1 1:0.5 3:1.2").unwrap();

        assert_eq!(label, 1.0);
        assert_eq!(pairs, vec![(0, 0.5), (2, 1.2)]); // 1-based to 0-based
    }

    #[test]
    fn test_parse_line_unsorted_indices() {
        let (label, pairs) = LibSVMDataset::parse_line("-1 5:2.1 2:0.3").unwrap();

        assert_eq!(label, -1.0);
        assert_eq!(pairs, vec![(1, 0.3), (4, 2.1)]);
    }

    #[test]
    fn test_parse_line_binary_conversion() {
        // Positive non-unit values should become +1
        let (label, _) = LibSVMDataset::parse_line("2 1:1.0").unwrap();
        assert_eq!(label, 1.0);

        // Zero and negative values should become -1
        let (label, _) = LibSVMDataset::parse_line("-3 1:1.0").unwrap();
        assert_eq!(label, -1.0);
        let (label, _) = LibSVMDataset::parse_line("0 1:1.0").unwrap();
        assert_eq!(label, -1.0);
    }

    #[test]
    fn test_parse_line_invalid_format() {
        // Invalid feature format
        assert!(LibSVMDataset::parse_line("+1 1").is_err());

        // Invalid index
        assert!(LibSVMDataset::parse_line("+1 abc:1.0").is_err());

        // Invalid value
        assert!(LibSVMDataset::parse_line("+1 1:abc").is_err());

        // Zero index (libsvm is 1-based)
        assert!(LibSVMDataset::parse_line("+1 0:1.0").is_err());
    }

    #[test]
    fn test_parse_line_non_finite() {
        assert!(LibSVMDataset::parse_line("+1 1:nan").is_err());
        assert!(LibSVMDataset::parse_line("+1 1:inf 2:1.0").is_err());
        assert!(LibSVMDataset::parse_line("-1 1:-1e999").is_err());
        assert!(LibSVMDataset::parse_line("nan 1:1.0").is_err());
    }

    #[test]
    fn test_from_reader_size_limit() {
        let result = LibSVMDataset::from_reader_with_dim(Cursor::new("+1 1:1.0\n"), usize::MAX);
        assert!(matches!(result, Err(SVMError::InvalidDataset(_))));

        let result =
            LibSVMDataset::from_reader_with_dim(Cursor::new("+1 1:1.0\n-1 2:1.0\n"), MAX_DENSE_CELLS);
        assert!(matches!(result, Err(SVMError::InvalidDataset(_))));
    }

    #[test]
    fn test_from_reader_densifies() {
        let data = "+1 1:0.5 3:1.2\n-1 2:0.3 5:2.1\n";
        let dataset = LibSVMDataset::from_reader(Cursor::new(data)).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.dim(), 5); // max index is 4 (0-based), so dimension is 5

        let m = dataset.matrix();
        assert_eq!(m.column(0), &[0.5, 0.0, 1.2, 0.0, 0.0, 1.0]);
        assert_eq!(m.column(1), &[0.0, 0.3, 0.0, 0.0, 2.1, -1.0]);
    }

    #[test]
    fn test_from_reader_empty_lines_and_comments() {
        let data = "# Comment line\n+1 1:0.5\n\n# Another comment\n-1 2:0.3\n";
        let dataset = LibSVMDataset::from_reader(Cursor::new(data)).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.get_labels(), vec![1.0, -1.0]);
    }

    #[test]
    fn test_from_reader_empty_dataset() {
        let data = "# Only comments\n\n";
        let result = LibSVMDataset::from_reader(Cursor::new(data));
        assert!(matches!(result, Err(SVMError::EmptyDataset)));
    }

    #[test]
    fn test_from_reader_with_dim_pads() {
        let data = "+1 1:1.0\n";
        let dataset = LibSVMDataset::from_reader_with_dim(Cursor::new(data), 3).unwrap();

        assert_eq!(dataset.dim(), 3);
        assert_eq!(dataset.matrix().column(0), &[1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_label_only_line() {
        let data = "+1\n-1 1:2.0\n";
        let dataset = LibSVMDataset::from_reader(Cursor::new(data)).unwrap();

        assert_eq!(dataset.dim(), 1);
        assert_eq!(dataset.matrix().features(0), &[0.0]);
    }

    #[test]
    fn test_parse_error_reports_line() {
        let data = "+1 1:1.0\n-1 x\n";
        match LibSVMDataset::from_reader(Cursor::new(data)) {
            Err(SVMError::ParseError(msg)) => assert!(msg.contains("line 2")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_from_file() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
        writeln!(temp_file, "+1 1:0.5 3:1.2").expect("Failed to write");
        writeln!(temp_file, "-1 2:0.3 5:2.1").expect("Failed to write");
        temp_file.flush().expect("Failed to flush");

        let dataset = LibSVMDataset::from_file(temp_file.path()).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.dim(), 5);
        assert_eq!(dataset.get_labels(), vec![1.0, -1.0]);
    }

    #[test]
    fn test_from_file_io_error() {
        let result = LibSVMDataset::from_file("/non/existent/file.libsvm");
        assert!(matches!(result, Err(SVMError::IoError(_))));
    }
}
