//! Loading connectivity matrices from disk

use std::fs::{self, File};
use std::path::Path;
use ndarray::{Array2, ArrayD};
use ndarray_npy::{ReadNpyError, ReadNpyExt, ReadableElement};
use crate::error::{ClusteringError, Result};
use crate::matrix::ConnectivityMatrix;

/// Load a 2D matrix from a `.npy` file or a delimited text file
///
/// Text files hold one row per line, values separated by commas or whitespace.
pub fn load_matrix(path: impl AsRef<Path>) -> Result<ConnectivityMatrix> {
    let path = path.as_ref();
    log::debug!("Reading matrix file: {}", path.display());

    if !path.is_file() {
        return Err(ClusteringError::io(
            path,
            std::io::Error::new(std::io::ErrorKind::NotFound, "input file does not exist"),
        ));
    }

    let is_npy = path
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("npy"));

    let matrix = if is_npy {
        load_npy(path)?
    } else {
        load_delimited(path)?
    };

    let (rows, cols) = matrix.shape();
    log::debug!("Loaded {}x{} matrix from {}", rows, cols, path.display());

    Ok(matrix)
}

/// Read a `.npy` array of any supported element type as f64
fn load_npy(path: &Path) -> Result<ConnectivityMatrix> {
    if let Some(data) = read_npy_as::<f64>(path, |v| v)? {
        return ConnectivityMatrix::from_dyn(data);
    }
    if let Some(data) = read_npy_as::<f32>(path, f64::from)? {
        return ConnectivityMatrix::from_dyn(data);
    }
    if let Some(data) = read_npy_as::<i64>(path, |v| v as f64)? {
        return ConnectivityMatrix::from_dyn(data);
    }
    if let Some(data) = read_npy_as::<i32>(path, f64::from)? {
        return ConnectivityMatrix::from_dyn(data);
    }
    if let Some(data) = read_npy_as::<u8>(path, f64::from)? {
        return ConnectivityMatrix::from_dyn(data);
    }
    if let Some(data) = read_npy_as::<bool>(path, |v| if v { 1.0 } else { 0.0 })? {
        return ConnectivityMatrix::from_dyn(data);
    }

    Err(ClusteringError::Npy {
        path: path.to_path_buf(),
        message: "unsupported element type".to_string(),
    })
}

/// Returns `None` when the file holds a different element type
fn read_npy_as<T>(path: &Path, convert: impl Fn(T) -> f64) -> Result<Option<ArrayD<f64>>>
where
    T: ReadableElement + Clone,
{
    let file = File::open(path).map_err(|e| ClusteringError::io(path, e))?;
    match ArrayD::<T>::read_npy(file) {
        Ok(data) => Ok(Some(data.mapv(convert))),
        Err(ReadNpyError::WrongDescriptor(_)) => Ok(None),
        Err(err) => Err(ClusteringError::Npy {
            path: path.to_path_buf(),
            message: err.to_string(),
        }),
    }
}

/// Read a comma or whitespace separated text matrix
fn load_delimited(path: &Path) -> Result<ConnectivityMatrix> {
    let content = fs::read_to_string(path).map_err(|e| ClusteringError::io(path, e))?;
    let parse_error = |message: String| ClusteringError::Parse {
        path: path.to_path_buf(),
        message,
    };

    let rows: Vec<Vec<f64>> = if content.contains(',') {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .trim(csv::Trim::All)
            .comment(Some(b'#'))
            .from_reader(content.as_bytes());

        reader
            .records()
            .map(|record| {
                let record = record.map_err(|e| parse_error(e.to_string()))?;
                record
                    .iter()
                    .map(|field| parse_value(field).map_err(&parse_error))
                    .collect::<Result<Vec<f64>>>()
            })
            .collect::<Result<_>>()?
    } else {
        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|line| {
                line.split_whitespace()
                    .map(|field| parse_value(field).map_err(&parse_error))
                    .collect::<Result<Vec<f64>>>()
            })
            .collect::<Result<_>>()?
    };

    let row_count = rows.len();
    let col_count = rows.first().map_or(0, Vec::len);

    if let Some((idx, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != col_count) {
        return Err(parse_error(format!(
            "row {} has {} values, expected {}",
            idx + 1,
            row.len(),
            col_count
        )));
    }

    let values: Vec<f64> = rows.into_iter().flatten().collect();
    let data = Array2::from_shape_vec((row_count, col_count), values)
        .map_err(|e| parse_error(e.to_string()))?;

    Ok(ConnectivityMatrix::new(data))
}

fn parse_value(field: &str) -> std::result::Result<f64, String> {
    field
        .parse::<f64>()
        .map_err(|_| format!("invalid number {:?}", field))
}
