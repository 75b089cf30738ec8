//! tree-visit - tree generation and visited-marking traversal
//!
//! Entry point for the CLI application.

use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use std::time::Instant;
use tree_visit::algs::distribute::{GatherReport, run_local};
use tree_visit::algs::traversal::VisitBuilder;
use tree_visit::config::{CliArgs, Command, RunConfig};
use tree_visit::tree::{TreeBuilder, TreeNode};

fn main() -> ExitCode {
    let args = CliArgs::parse();
    setup_logging(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn setup_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_millis()
        .init();
}

fn run(args: CliArgs) -> Result<()> {
    let config = args.run_config();
    match args.command {
        Command::Parallel { .. } => run_parallel(&config),
        Command::Local { ranks, .. } => run_local_group(ranks, &config),
        #[cfg(feature = "mpi-support")]
        Command::Mpi { .. } => run_mpi(&config),
    }
}

/// Single process: time generation and fan-out traversal separately.
fn run_parallel(config: &RunConfig) -> Result<()> {
    config.validate_local()?;

    let start = Instant::now();
    let mut tree = TreeBuilder::new()
        .root_label(config.root_label.clone())
        .generate(config.vertices)
        .context("tree generation failed")?;
    let generation = start.elapsed();

    let start = Instant::now();
    let marked = VisitBuilder::new(true)
        .fan_out_depth(config.fan_out_depth)
        .run(&mut tree);
    let traversal = start.elapsed();

    log::info!(
        "marked {marked} nodes with fan-out depth {}",
        config.fan_out_depth
    );
    println!(
        "Final. Time Generation(ms): {} | Time Parallel(ms): {}.",
        generation.as_secs_f64() * 1e3,
        traversal.as_secs_f64() * 1e3
    );
    Ok(())
}

fn print_result(rank: usize, subtree: &TreeNode) {
    println!("from {rank} : {}", subtree.detailed());
}

fn print_final(report: &GatherReport) {
    log::info!(
        "{} nodes, all visited: {}",
        report.total_nodes(),
        report.all_visited()
    );
    println!("Final. Time (ms): {} ", report.elapsed.as_secs_f64() * 1e3);
}

/// In-process ranks; bad parameters end the process with a failure code.
fn run_local_group(ranks: usize, config: &RunConfig) -> Result<()> {
    match run_local(ranks, config, print_result) {
        Ok(report) => {
            print_final(&report);
            Ok(())
        }
        Err(e) => match RunConfig::diagnostic_for(&e) {
            Some(diagnostic) => {
                println!("{diagnostic}");
                Err(e.into())
            }
            None => Err(e).context("distributed traversal failed"),
        },
    }
}

/// One MPI rank; rank 0 aborts the whole group on bad parameters.
#[cfg(feature = "mpi-support")]
fn run_mpi(config: &RunConfig) -> Result<()> {
    use tree_visit::algs::communicator::{Communicator, MpiComm};
    use tree_visit::algs::distribute::run_rank;

    let comm = MpiComm::new().context("failed to initialize MPI")?;
    match run_rank(&comm, config, print_result) {
        Ok(Some(report)) => {
            print_final(&report);
            Ok(())
        }
        Ok(None) => Ok(()),
        Err(e) => {
            let diagnostic = RunConfig::diagnostic_for(&e).filter(|_| comm.rank() == 0);
            if let Some(diagnostic) = diagnostic {
                println!("{diagnostic}");
            }
            log::error!("[rank {}] {e}", comm.rank());
            comm.abort(1)
        }
    }
}
