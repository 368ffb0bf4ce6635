//! Results persistence module

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use serde::Serialize;
use serde_json::{json, to_string_pretty};
use crate::cluster::ClusterMap;
use crate::config::Config;
use crate::error::{ClusteringError, Result};
use crate::matrix::ConnectivityMatrix;

/// Make sure `dir` exists and is empty
///
/// A missing directory is created. A non-empty one is an error unless
/// `overwrite` is set, in which case its contents are removed.
pub fn prepare_output_dir(dir: &Path, overwrite: bool) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| ClusteringError::io(dir, e))?;

    let entries = fs::read_dir(dir)
        .map_err(|e| ClusteringError::io(dir, e))?
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(|e| ClusteringError::io(dir, e))?;

    if entries.is_empty() {
        return Ok(());
    }

    if !overwrite {
        return Err(ClusteringError::OutputExists(dir.to_path_buf()));
    }

    log::info!("Clearing {} entries from {}", entries.len(), dir.display());
    for entry in entries {
        let path = entry.path();
        let removed = if path.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        removed.map_err(|e| ClusteringError::io(&path, e))?;
    }

    Ok(())
}

/// Check that an output file can be written
///
/// Its parent directory must exist, and an existing file is only accepted
/// with `overwrite`.
pub fn check_output_file(path: &Path, overwrite: bool) -> Result<()> {
    if path.is_file() && !overwrite {
        return Err(ClusteringError::OutputExists(path.to_path_buf()));
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            return Err(ClusteringError::MissingOutputDirectory(parent.to_path_buf()));
        }
    }

    Ok(())
}

/// Serialize `value` as pretty JSON into `path`
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let mut file = File::create(path).map_err(|e| ClusteringError::io(path, e))?;
    file.write_all(to_string_pretty(value)?.as_bytes())
        .map_err(|e| ClusteringError::io(path, e))?;
    Ok(())
}

/// Read a cluster mapping previously written by [`save_results`]
pub fn load_clusters(path: &Path) -> Result<ClusterMap> {
    let content = fs::read_to_string(path).map_err(|e| ClusteringError::io(path, e))?;
    Ok(serde_json::from_str(&content)?)
}

/// Save clustering results to the specified directory
pub fn save_results(
    clusters: &ClusterMap,
    matrix: &ConnectivityMatrix,
    config: &Config,
    output_dir: &Path,
) -> Result<()> {
    log::info!("Saving {} clusters to {}", clusters.len(), output_dir.display());

    fs::create_dir_all(output_dir).map_err(|e| ClusteringError::io(output_dir, e))?;

    write_json(&output_dir.join("clusters.json"), clusters)?;
    save_summary(clusters, matrix, config, output_dir)?;

    log::info!("Results saved successfully");

    Ok(())
}

/// Save summary information
fn save_summary(
    clusters: &ClusterMap,
    matrix: &ConnectivityMatrix,
    config: &Config,
    output_dir: &Path,
) -> Result<()> {
    log::info!("Saving summary information");

    let (rows, cols) = matrix.shape();
    let sizes: Vec<usize> = clusters.iter().map(|c| c.len()).collect();

    let summary = json!({
        "matrix": {
            "rows": rows,
            "cols": cols,
            "symmetric": matrix.is_square(),
            "density": matrix.density(config.connection_value),
        },
        "config": config,
        "cluster_stats": {
            "cluster_count": clusters.len(),
            "connection_count": clusters.total_connections(),
            "largest_cluster_size": sizes.iter().copied().max().unwrap_or(0),
            "smallest_cluster_size": sizes.iter().copied().min().unwrap_or(0),
            "avg_cluster_size": clusters.total_connections() as f64 /
                                if clusters.is_empty() { 1.0 } else { clusters.len() as f64 },
        }
    });

    write_json(&output_dir.join("summary.json"), &summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_prepare_output_dir_creates_missing() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("nested").join("out");
        prepare_output_dir(&dir, false).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn test_prepare_output_dir_requires_overwrite() {
        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join("old.json"), "{}").unwrap();
        fs::create_dir(root.path().join("old_dir")).unwrap();

        assert!(matches!(
            prepare_output_dir(root.path(), false),
            Err(ClusteringError::OutputExists(_))
        ));

        prepare_output_dir(root.path(), true).unwrap();
        assert_eq!(fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_check_output_file() {
        let root = tempfile::tempdir().unwrap();
        let existing = root.path().join("out.json");
        fs::write(&existing, "[]").unwrap();

        assert!(matches!(
            check_output_file(&existing, false),
            Err(ClusteringError::OutputExists(_))
        ));
        check_output_file(&existing, true).unwrap();
        check_output_file(&root.path().join("new.json"), false).unwrap();
        assert!(matches!(
            check_output_file(&root.path().join("missing").join("new.json"), false),
            Err(ClusteringError::MissingOutputDirectory(_))
        ));
    }

    #[test]
    fn test_save_results_round_trip() {
        let root = tempfile::tempdir().unwrap();
        let matrix = ConnectivityMatrix::new(array![[0.0, 1.0, 0.0], [0.0, 0.0, 0.0], [0.0, 0.0, 1.0]]);
        let mut clusters = ClusterMap::new();
        clusters.push(vec!["1_2".into()]);
        clusters.push(vec!["3_3".into()]);

        save_results(&clusters, &matrix, &Config::default(), root.path()).unwrap();

        let back = load_clusters(&root.path().join("clusters.json")).unwrap();
        assert_eq!(back, clusters);

        let summary: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(root.path().join("summary.json")).unwrap()).unwrap();
        assert_eq!(summary["cluster_stats"]["cluster_count"], 2);
        assert_eq!(summary["matrix"]["symmetric"], true);
        assert_eq!(summary["config"]["strategy"], "union-find");
    }
}
