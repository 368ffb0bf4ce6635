use std::path::{Path, PathBuf};
use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use connectome_cluster::cluster::metrics::{compute_cluster_metrics, SubjectMetrics};
use connectome_cluster::data::{self, extraction};
use connectome_cluster::{cluster_connections_with, storage, Config, ConnectivityMatrix, LogObserver, Strategy};

#[derive(Parser, Debug)]
#[clap(
    name = "connectome-cluster",
    about = "Clustering and value extraction for brain connectivity matrices"
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,

    /// Force overwriting of existing outputs
    #[clap(short = 'f', long, global = true)]
    overwrite: bool,

    /// Number of worker threads (0 = use all available cores)
    #[clap(long, default_value = "0", global = true)]
    threads: usize,

    /// Verbose logging
    #[clap(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Group significant connections into clusters of shared regions
    Cluster {
        /// Binary matrix (.npy or text) of significant connections
        #[clap(long)]
        input: PathBuf,

        /// Output directory for clusters.json and summary.json
        #[clap(long, default_value = "cluster_results")]
        output_dir: PathBuf,

        /// Cell value marking a significant connection
        #[clap(long, default_value = "1.0")]
        connection_value: f64,

        /// Minimum number of connections per cluster
        #[clap(long, default_value = "1")]
        min_cluster_size: usize,

        /// Clustering algorithm
        #[clap(long, value_enum, default_value = "union-find")]
        strategy: Strategy,
    },

    /// Print the percentage of cells equal to the connection value
    Density {
        /// Matrix (.npy or text)
        #[clap(long)]
        input: PathBuf,

        /// Cell value counted as a connection
        #[clap(long, default_value = "1.0")]
        connection_value: f64,
    },

    /// Extract per-connection values from subject matrices
    Extract {
        /// Subject matrices, one per subject
        #[clap(long, num_args = 1.., required = true)]
        input: Vec<PathBuf>,

        /// Binary matrix selecting the connections to extract
        #[clap(long, conflicts_with = "all")]
        in_mask: Option<PathBuf>,

        /// Extract every upper-triangle connection
        #[clap(long)]
        all: bool,

        /// Output JSON file
        #[clap(long, default_value = "connections.json")]
        output: PathBuf,
    },

    /// Summarise a metric matrix over each cluster's connections
    ClusterMetrics {
        /// clusters.json produced by the cluster command
        #[clap(long)]
        cluster_json: PathBuf,

        /// Metric matrices, one per subject
        #[clap(long, num_args = 1.., required = true)]
        matrices: Vec<PathBuf>,

        /// Output JSON file
        #[clap(long, default_value = "cluster_metrics.json")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Cli::parse();

    // Configure logging
    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    // Set number of threads
    let num_threads = if args.threads > 0 {
        args.threads
    } else {
        num_cpus::get()
    };

    log::debug!("Using {} worker threads", num_threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()?;

    match args.command {
        Command::Cluster {
            input,
            output_dir,
            connection_value,
            min_cluster_size,
            strategy,
        } => {
            let config = Config::new(connection_value, min_cluster_size, strategy);
            run_cluster(&input, &output_dir, &config, args.overwrite)
        }
        Command::Density {
            input,
            connection_value,
        } => {
            let matrix = data::load_matrix(&input)?;
            let density = matrix.density(connection_value);
            log::info!("Density of {}: {:.4}%", input.display(), density);
            println!("{}", density);
            Ok(())
        }
        Command::Extract {
            input,
            in_mask,
            all,
            output,
        } => run_extract(&input, in_mask.as_deref(), all, &output, args.overwrite),
        Command::ClusterMetrics {
            cluster_json,
            matrices,
            output,
        } => run_cluster_metrics(&cluster_json, &matrices, &output, args.overwrite),
    }
}

fn run_cluster(
    input: &Path,
    output_dir: &Path,
    config: &Config,
    overwrite: bool,
) -> Result<()> {
    log::info!("Starting connection clustering");
    log::info!("Input: {}", input.display());
    log::info!("Output: {}", output_dir.display());

    storage::prepare_output_dir(output_dir, overwrite)?;

    let matrix = data::load_matrix(input)?;
    let clusters = cluster_connections_with(&matrix, config, &mut LogObserver)?;

    storage::save_results(&clusters, &matrix, config, output_dir)?;

    log::info!("Clustering complete. Results saved to {}", output_dir.display());

    Ok(())
}

fn run_extract(
    inputs: &[PathBuf],
    in_mask: Option<&Path>,
    all: bool,
    output: &Path,
    overwrite: bool,
) -> Result<()> {
    storage::check_output_file(output, overwrite)?;

    let subjects = load_subjects(inputs)?;

    let mask = match (in_mask, all) {
        (Some(path), _) => data::load_matrix(path)?,
        (None, true) => {
            let (rows, cols) = subjects[0].1.shape();
            ConnectivityMatrix::ones(rows, cols)
        }
        (None, false) => bail!("Either --in-mask or --all is required"),
    };

    let table = extraction::extract_connection_values(&mask, &subjects)?;
    storage::write_json(output, &table)?;

    log::info!(
        "Saved {} connections for {} subjects to {}",
        table.columns.len(),
        table.rows.len(),
        output.display()
    );

    Ok(())
}

fn run_cluster_metrics(
    cluster_json: &Path,
    matrices: &[PathBuf],
    output: &Path,
    overwrite: bool,
) -> Result<()> {
    storage::check_output_file(output, overwrite)?;

    let clusters = storage::load_clusters(cluster_json)?;
    log::info!("Loaded {} clusters from {}", clusters.len(), cluster_json.display());

    let subjects = load_subjects(matrices)?;

    let report = subjects
        .par_iter()
        .map(|(id, matrix)| {
            compute_cluster_metrics(&clusters, matrix).map(|metrics| SubjectMetrics {
                id: id.clone(),
                clusters: metrics,
            })
        })
        .collect::<connectome_cluster::Result<Vec<_>>>()?;

    storage::write_json(output, &report)?;

    log::info!("Cluster metrics saved to {}", output.display());

    Ok(())
}

/// Load subject matrices in parallel, keyed by their path
fn load_subjects(paths: &[PathBuf]) -> Result<Vec<(String, ConnectivityMatrix)>> {
    if paths.is_empty() {
        return Err(connectome_cluster::ClusteringError::EmptyInput.into());
    }

    let subjects = paths
        .par_iter()
        .map(|path| data::load_matrix(path).map(|matrix| (path.display().to_string(), matrix)))
        .collect::<connectome_cluster::Result<Vec<_>>>()?;

    log::info!("Loaded {} subject matrices", subjects.len());

    Ok(subjects)
}
