//! Dataset format compatibility tests
//!
//! Checks that LibSVM and CSV inputs describing the same data produce the
//! same matrix and the same trained model.

use dcdsvm::api::LinearSVM;
use dcdsvm::data::MAX_DENSE_CELLS;
use dcdsvm::{CSVDataset, Dataset, LibSVMDataset, SVMError};
use std::io::{Cursor, Write};
use tempfile::NamedTempFile;

/// Test LibSVM format variations
#[test]
fn test_libsvm_format_variations() {
    let variations = [
        // Standard
        "+1 1:2.0 2:1.0\n-1 1:-2.0 2:-1.0\n",
        // Unsigned labels, extra whitespace
        "1   1:2.0    2:1.0\n-1\t1:-2.0 2:-1.0\n",
        // Unsorted indices, trailing comment lines
        "+1 2:1.0 1:2.0\n-1 2:-1.0 1:-2.0\n# done\n",
        // Non-unit labels
        "3 1:2.0 2:1.0\n0 1:-2.0 2:-1.0\n",
    ];

    for (i, data) in variations.iter().enumerate() {
        let dataset = LibSVMDataset::from_reader(Cursor::new(*data))
            .unwrap_or_else(|e| panic!("Variation {i} failed: {e}"));

        assert_eq!(dataset.len(), 2, "Variation {i}");
        assert_eq!(dataset.dim(), 2, "Variation {i}");
        assert_eq!(dataset.get_labels(), vec![1.0, -1.0], "Variation {i}");
        assert_eq!(dataset.matrix().features(0), &[2.0, 1.0], "Variation {i}");
    }
}

/// Test CSV format variations
#[test]
fn test_csv_format_variations() {
    let variations = [
        "2.0,1.0,1\n-2.0,-1.0,-1\n",
        "x1,x2,y\n2.0,1.0,1\n-2.0,-1.0,-1\n",
        "# comment\n 2.0 , 1.0 , 1 \n\n-2.0,-1.0,-1\n",
        "a,b,label\n2,1,5\n-2,-1,0\n",
    ];

    for (i, data) in variations.iter().enumerate() {
        let dataset = CSVDataset::from_reader(Cursor::new(*data))
            .unwrap_or_else(|e| panic!("Variation {i} failed: {e}"));

        assert_eq!(dataset.len(), 2, "Variation {i}");
        assert_eq!(dataset.get_labels(), vec![1.0, -1.0], "Variation {i}");
        assert_eq!(dataset.matrix().features(1), &[-2.0, -1.0], "Variation {i}");
    }
}

/// Test cross-format compatibility
#[test]
fn test_cross_format_compatibility() {
    let libsvm_data =
        "+1 1:2.0 2:1.0\n+1 1:1.8 2:1.1\n-1 1:-2.0 2:-1.0\n-1 1:-1.8 3:-1.1\n+1 1:0.4 3:0.3\n";
    let csv_data = "feature1,feature2,feature3,label\n\
                    2.0,1.0,0,1\n1.8,1.1,0,1\n-2.0,-1.0,0,-1\n-1.8,0,-1.1,-1\n0.4,0,0.3,1\n";

    let mut libsvm_file = NamedTempFile::new().expect("Failed to create LibSVM temp file");
    write!(libsvm_file, "{}", libsvm_data).expect("Failed to write LibSVM data");
    libsvm_file.flush().expect("Failed to flush LibSVM file");

    let mut csv_file = NamedTempFile::new().expect("Failed to create CSV temp file");
    write!(csv_file, "{}", csv_data).expect("Failed to write CSV data");
    csv_file.flush().expect("Failed to flush CSV file");

    let libsvm_dataset =
        LibSVMDataset::from_file(libsvm_file.path()).expect("Failed to load LibSVM dataset");
    let csv_dataset = CSVDataset::from_file(csv_file.path()).expect("Failed to load CSV dataset");

    assert_eq!(libsvm_dataset.matrix(), csv_dataset.matrix());

    // Same matrix and seed give the same model
    let libsvm_model = LinearSVM::new()
        .with_seed(3)
        .train(&libsvm_dataset)
        .expect("LibSVM training should succeed");
    let csv_model = LinearSVM::new()
        .with_seed(3)
        .train(&csv_dataset)
        .expect("CSV training should succeed");

    assert_eq!(libsvm_model.inner().weights(), csv_model.inner().weights());
    assert_eq!(libsvm_model.info().bias, csv_model.info().bias);
}

/// Test large dimension handling
#[test]
fn test_large_dimensions() {
    let data = "+1 100:1.0 1000:2.0\n-1 150:1.2 1500:-1.8\n+1 1000:1.5\n-1 1500:-1.3\n";
    let dataset = LibSVMDataset::from_reader(Cursor::new(data)).expect("Should load");

    assert_eq!(dataset.dim(), 1500);
    assert_eq!(dataset.matrix().get(999, 0), 2.0);
    assert_eq!(dataset.matrix().get(1499, 1), -1.8);
    assert_eq!(dataset.matrix().get(1500, 1), -1.0); // label row

    let model = LinearSVM::new().train(&dataset).expect("Should train");
    assert_eq!(model.info().n_features, 1500);
    assert_eq!(model.evaluate(&dataset), 1.0);
}

/// Indices too large to densify are rejected instead of aborting
#[test]
fn test_oversized_dimensions_rejected() {
    let cases = [
        "+1 18446744073709551615:1.0\n",
        "+1 8589934592:1.0\n",
        "+1 1:1.0\n-1 600000000:1.0\n",
    ];
    for data in cases {
        let result = LibSVMDataset::from_reader(Cursor::new(data));
        assert!(
            matches!(
                result,
                Err(SVMError::InvalidDataset(_)) | Err(SVMError::ParseError(_))
            ),
            "Should reject {data:?}"
        );
    }

    let padded = LibSVMDataset::from_reader_with_dim(Cursor::new("+1 1:1.0\n"), MAX_DENSE_CELLS);
    assert!(matches!(padded, Err(SVMError::InvalidDataset(_))));
}

/// Non-finite feature values are parse errors in both formats
#[test]
fn test_non_finite_values_rejected() {
    for data in ["+1 1:nan\n", "-1 1:1.0 2:inf\n"] {
        assert!(
            matches!(
                LibSVMDataset::from_reader(Cursor::new(data)),
                Err(SVMError::ParseError(_))
            ),
            "Should reject {data:?}"
        );
    }

    for data in ["1.0,nan,1\n", "x,y,label\n1.0,-inf,-1\n"] {
        assert!(
            matches!(
                CSVDataset::from_reader(Cursor::new(data)),
                Err(SVMError::ParseError(_))
            ),
            "Should reject {data:?}"
        );
    }
}

/// Test malformed data handling
#[test]
fn test_malformed_data_handling() {
    let libsvm_cases = [
        "+1 1:2.0 2\n",
        "+1 0:1.0\n",
        "abc 1:1.0\n",
        "+1 1:1.0 2:x\n",
        "+1 -1:1.0\n",
    ];
    for data in libsvm_cases {
        assert!(
            matches!(
                LibSVMDataset::from_reader(Cursor::new(data)),
                Err(SVMError::ParseError(_))
            ),
            "Should reject {data:?}"
        );
    }

    let csv_cases = ["1.0,,1\n", "1.0,2.0,1\n1.0,-1\n", "1.0\n"];
    for data in csv_cases {
        assert!(
            matches!(
                CSVDataset::from_reader(Cursor::new(data)),
                Err(SVMError::ParseError(_))
            ),
            "Should reject {data:?}"
        );
    }

    assert!(matches!(
        CSVDataset::from_reader(Cursor::new("# nothing\n")),
        Err(SVMError::EmptyDataset)
    ));
}
