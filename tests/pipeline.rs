use std::fs::File;
use connectome_cluster::cluster::metrics::compute_cluster_metrics;
use connectome_cluster::data::{extraction, load_matrix};
use connectome_cluster::{cluster_connections, storage, Config, ConnectivityMatrix, Strategy};
use ndarray::{array, Array2};
use ndarray_npy::WriteNpyExt;

fn significant_connections() -> Array2<u8> {
    // Regions 1-2-5 form one cluster, 3-4 another, 6 is isolated
    let mut data = Array2::zeros((6, 6));
    for &(i, j) in &[(0, 1), (1, 4), (2, 3)] {
        data[[i, j]] = 1;
        data[[j, i]] = 1;
    }
    data
}

#[test]
fn cluster_npy_matrix_to_json() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("significant.npy");
    significant_connections()
        .write_npy(File::create(&input).unwrap())
        .unwrap();

    let matrix = load_matrix(&input).unwrap();
    let config = Config::default();
    let clusters = cluster_connections(&matrix, &config).unwrap();

    let out_dir = dir.path().join("results");
    storage::prepare_output_dir(&out_dir, false).unwrap();
    storage::save_results(&clusters, &matrix, &config, &out_dir).unwrap();

    let json = std::fs::read_to_string(out_dir.join("clusters.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "Cluster_1": ["1_2", "2_5"],
            "Cluster_2": ["3_4"],
        })
    );

    // Key order in the file follows discovery order
    assert!(json.find("Cluster_1").unwrap() < json.find("Cluster_2").unwrap());

    // A second run into the same directory needs overwrite
    assert!(storage::prepare_output_dir(&out_dir, false).is_err());
    storage::prepare_output_dir(&out_dir, true).unwrap();
}

#[test]
fn strategies_agree_on_larger_matrix() {
    // Deterministic pseudo-random sparse 40x40 matrix
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    let data = Array2::from_shape_fn((40, 40), |_| {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        if state % 23 == 0 {
            1.0
        } else {
            0.0
        }
    });
    let matrix = ConnectivityMatrix::new(data);

    let union_find = cluster_connections(&matrix, &Config::default()).unwrap();
    let fixed_point = cluster_connections(
        &matrix,
        &Config::new(1.0, 1, Strategy::FixedPoint),
    )
    .unwrap();

    assert_eq!(union_find, fixed_point);
    assert_eq!(union_find.total_connections(), matrix.edges(1.0).len());
}

#[test]
fn metrics_for_saved_clusters() {
    let dir = tempfile::tempdir().unwrap();
    let matrix = ConnectivityMatrix::new(significant_connections().mapv(f64::from));
    let clusters = cluster_connections(&matrix, &Config::default()).unwrap();
    storage::save_results(&clusters, &matrix, &Config::default(), dir.path()).unwrap();

    let reloaded = storage::load_clusters(&dir.path().join("clusters.json")).unwrap();
    let fa = ConnectivityMatrix::new(Array2::from_shape_fn((6, 6), |(i, j)| (i * 6 + j) as f64));
    let metrics = compute_cluster_metrics(&reloaded, &fa).unwrap();

    // Cluster_1 = cells (0,1) and (1,4) -> values 1 and 10
    assert_eq!(metrics[0].cluster, "Cluster_1");
    assert_eq!(metrics[0].mean, Some(5.5));
    // Cluster_2 = cell (2,3) -> value 15
    assert_eq!(metrics[1].mean, Some(15.0));
}

#[test]
fn extract_values_from_text_matrices() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("sub-01.txt");
    let second = dir.path().join("sub-02.csv");
    std::fs::write(&first, "1 2 3\n2 4 5\n3 5 6\n").unwrap();
    std::fs::write(&second, "9,8,7\n8,6,5\n7,5,4\n").unwrap();

    let subjects: Vec<(String, ConnectivityMatrix)> = [&first, &second]
        .iter()
        .map(|path| (path.display().to_string(), load_matrix(path).unwrap()))
        .collect();

    let mask = ConnectivityMatrix::new(array![[0.0, 0.0, 1.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]]);
    let table = extraction::extract_connection_values(&mask, &subjects).unwrap();

    assert_eq!(table.columns, vec!["1_3", "2_2"]);
    assert_eq!(table.rows[0].values, vec![3.0, 4.0]);
    assert_eq!(table.rows[1].values, vec![7.0, 6.0]);
}
