//! CSV dataset loading for training and prediction.
//!
//! Datasets are plain numeric CSV files with a header row. For training,
//! every column but the last is a feature and the last column is the
//! regression target. Prediction input carries the same feature columns
//! (a trailing target column, if present, is ignored).
use std::error::Error;
use std::fmt;
use std::path::Path;

use ndarray::{Array1, Array2};

#[derive(Debug)]
pub enum DatasetError {
    Read(String),
    Parse { row: usize, column: String },
    TooFewColumns(usize),
    TooFewRows(usize),
    FeatureMismatch { got: usize, expected: usize },
    Write(String),
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DatasetError::Read(msg) => write!(f, "could not read dataset: {}", msg),
            DatasetError::Parse { row, column } => {
                write!(f, "row {} has a non-numeric value in column {}", row, column)
            }
            DatasetError::TooFewColumns(n) => write!(
                f,
                "dataset has {} column(s); need at least one feature column and a target column",
                n
            ),
            DatasetError::TooFewRows(n) => {
                write!(f, "dataset has {} data row(s); need at least 2", n)
            }
            DatasetError::FeatureMismatch { got, expected } => write!(
                f,
                "dataset has {} feature column(s) but the model was trained with {}",
                got, expected
            ),
            DatasetError::Write(msg) => write!(f, "could not write predictions: {}", msg),
        }
    }
}

impl Error for DatasetError {}

/// A fully parsed training dataset.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Header names, one per column (features then target).
    pub headers: Vec<String>,
    /// Feature matrix, one row per sample.
    pub features: Array2<f64>,
    /// Target column.
    pub target: Array1<f64>,
}

impl Dataset {
    pub fn n_rows(&self) -> usize {
        self.features.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }
}

/// Parsed prediction input: the numeric feature matrix plus the original
/// cells, echoed back into the results file next to the predictions.
#[derive(Debug, Clone)]
pub struct PredictionInput {
    pub headers: Vec<String>,
    pub features: Array2<f64>,
    pub records: Vec<Vec<String>>,
}

fn read_rows(path: &Path) -> Result<(Vec<String>, Vec<Vec<String>>), DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| DatasetError::Read(e.to_string()))?;

    let headers = reader
        .headers()
        .map_err(|e| DatasetError::Read(e.to_string()))?
        .iter()
        .map(|h| h.to_string())
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| DatasetError::Read(e.to_string()))?;
        rows.push(record.iter().map(|v| v.to_string()).collect::<Vec<_>>());
    }
    Ok((headers, rows))
}

fn parse_cell(rows: &[Vec<String>], row: usize, col: usize, header: &str) -> Result<f64, DatasetError> {
    rows[row][col].parse::<f64>().map_err(|_| DatasetError::Parse {
        row: row + 1,
        column: header.to_string(),
    })
}

/// Load a training dataset: all columns numeric, last column is the target.
pub fn load_training(path: &Path) -> Result<Dataset, DatasetError> {
    let (headers, rows) = read_rows(path)?;

    if headers.len() < 2 {
        return Err(DatasetError::TooFewColumns(headers.len()));
    }
    if rows.len() < 2 {
        return Err(DatasetError::TooFewRows(rows.len()));
    }

    let n_features = headers.len() - 1;
    let mut features = Array2::<f64>::zeros((rows.len(), n_features));
    let mut target = Array1::<f64>::zeros(rows.len());

    for (i, row) in rows.iter().enumerate() {
        if row.len() != headers.len() {
            return Err(DatasetError::Parse {
                row: i + 1,
                column: "(row width)".to_string(),
            });
        }
        for j in 0..n_features {
            features[[i, j]] = parse_cell(&rows, i, j, &headers[j])?;
        }
        target[i] = parse_cell(&rows, i, n_features, &headers[n_features])?;
    }

    Ok(Dataset {
        headers,
        features,
        target,
    })
}

/// Load prediction input for a model trained with `expected_features`
/// feature columns. A single trailing extra column (the target of a
/// training-shaped file) is tolerated and ignored.
pub fn load_prediction(path: &Path, expected_features: usize) -> Result<PredictionInput, DatasetError> {
    let (headers, rows) = read_rows(path)?;

    let width = headers.len();
    if width != expected_features && width != expected_features + 1 {
        return Err(DatasetError::FeatureMismatch {
            got: width,
            expected: expected_features,
        });
    }
    if rows.is_empty() {
        return Err(DatasetError::TooFewRows(0));
    }

    let mut features = Array2::<f64>::zeros((rows.len(), expected_features));
    for (i, row) in rows.iter().enumerate() {
        if row.len() != width {
            return Err(DatasetError::Parse {
                row: i + 1,
                column: "(row width)".to_string(),
            });
        }
        for j in 0..expected_features {
            features[[i, j]] = parse_cell(&rows, i, j, &headers[j])?;
        }
    }

    Ok(PredictionInput {
        headers,
        features,
        records: rows,
    })
}

/// Write the prediction results file: the input columns, echoed verbatim,
/// plus a trailing `prediction` column. Returns the output file name.
pub fn write_predictions(
    input: &PredictionInput,
    predictions: &[f64],
    output_dir: &Path,
    stem: &str,
) -> Result<String, DatasetError> {
    let name = format!("{}_predictions.csv", stem);
    let mut writer = csv::Writer::from_path(output_dir.join(&name))
        .map_err(|e| DatasetError::Write(e.to_string()))?;

    let mut headers = input.headers.clone();
    headers.push("prediction".to_string());
    writer
        .write_record(&headers)
        .map_err(|e| DatasetError::Write(e.to_string()))?;

    for (row, prediction) in input.records.iter().zip(predictions) {
        let mut record = row.clone();
        record.push(format!("{:.6}", prediction));
        writer
            .write_record(&record)
            .map_err(|e| DatasetError::Write(e.to_string()))?;
    }
    writer.flush().map_err(|e| DatasetError::Write(e.to_string()))?;

    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_training_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "ok.csv", "a,b,y\n1,2,3\n4,5,6\n");
        let dataset = load_training(&path).unwrap();
        assert_eq!(dataset.n_rows(), 2);
        assert_eq!(dataset.n_features(), 2);
        assert_eq!(dataset.target.to_vec(), vec![3.0, 6.0]);
        assert_eq!(dataset.headers, vec!["a", "b", "y"]);
    }

    #[test]
    fn rejects_non_numeric_cell() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "bad.csv", "a,y\n1,2\noops,4\n");
        match load_training(&path) {
            Err(DatasetError::Parse { row, column }) => {
                assert_eq!(row, 2);
                assert_eq!(column, "a");
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn rejects_single_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "one.csv", "y\n1\n2\n");
        assert!(matches!(
            load_training(&path),
            Err(DatasetError::TooFewColumns(1))
        ));
    }

    #[test]
    fn rejects_too_few_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "tiny.csv", "a,y\n1,2\n");
        assert!(matches!(
            load_training(&path),
            Err(DatasetError::TooFewRows(1))
        ));
    }

    #[test]
    fn rejects_missing_file() {
        assert!(matches!(
            load_training(Path::new("/nonexistent/data.csv")),
            Err(DatasetError::Read(_))
        ));
    }

    #[test]
    fn prediction_input_tolerates_trailing_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "pred.csv", "a,b,y\n1,2,0\n3,4,0\n");
        let input = load_prediction(&path, 2).unwrap();
        assert_eq!(input.features.ncols(), 2);
        assert_eq!(input.records.len(), 2);

        let narrower = write_csv(&dir, "narrow.csv", "a\n1\n");
        assert!(matches!(
            load_prediction(&narrower, 2),
            Err(DatasetError::FeatureMismatch { got: 1, expected: 2 })
        ));
    }

    #[test]
    fn writes_prediction_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "in.csv", "a,b\n1,2\n3,4\n");
        let input = load_prediction(&path, 2).unwrap();
        let name = write_predictions(&input, &[0.5, 1.5], dir.path(), "in").unwrap();
        assert_eq!(name, "in_predictions.csv");

        let written = std::fs::read_to_string(dir.path().join(&name)).unwrap();
        assert!(written.starts_with("a,b,prediction\n"));
        assert!(written.contains("1,2,0.500000"));
    }
}
