mod cli_main;

use clap::Parser;
use cli_main::{cluster_config, collapse_config, Cli, Commands};
use isoclust::error::Result;
use isoclust::io::{create_cluster_tab, create_output, open_gff};
use isoclust::pipeline::{run_cluster, run_collapse, run_sort};
use isoclust::stats::write_stats;
use rayon::ThreadPoolBuilder;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

fn init_thread_pool(threads: usize) -> Result<()> {
    ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .map_err(|e| isoclust::ClusterError::Config(format!("failed to build thread pool: {}", e)))
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Cluster {
            input,
            boundary_tolerance,
            end_tolerance,
            min_coverage,
            min_isoform_percent,
            clusters,
            stats,
            output,
            channel_capacity,
        } => {
            let config = cluster_config(
                boundary_tolerance,
                end_tolerance,
                min_coverage,
                min_isoform_percent,
                channel_capacity,
            );
            info!("Starting clustering: input = {}", input.as_deref().unwrap_or("-"));

            let reader = open_gff(input.as_deref())?;
            let writer = create_output(output.as_deref())?;
            let membership = clusters.as_deref().map(create_cluster_tab).transpose()?;

            let run_stats = run_cluster(reader, writer, membership, &config)?;
            if let Some(path) = stats {
                write_stats(&run_stats, &path)?;
            }
        }

        Commands::Collapse {
            input,
            internal_tolerance,
            three_prime_tolerance,
            five_prime_tolerance,
            discard_monoexonic,
            discard_unoriented,
            stats,
            output,
            threads,
            channel_capacity,
        } => {
            init_thread_pool(threads)?;
            let config = collapse_config(
                internal_tolerance,
                three_prime_tolerance,
                five_prime_tolerance,
                discard_monoexonic,
                discard_unoriented,
                channel_capacity,
            );
            info!("Starting collapse: input = {}", input.as_deref().unwrap_or("-"));

            let reader = open_gff(input.as_deref())?;
            let writer = create_output(output.as_deref())?;

            let run_stats = run_collapse(reader, writer, &config)?;
            if let Some(path) = stats {
                write_stats(&run_stats, &path)?;
            }
        }

        Commands::Sort { input, output } => {
            let reader = open_gff(input.as_deref())?;
            let writer = create_output(output.as_deref())?;
            run_sort(reader, writer)?;
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.quiet {
        Level::WARN
    } else if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    // stdout may carry GFF output
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Setting tracing default failed: {}", e);
    }

    if let Err(e) = run(cli) {
        error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
