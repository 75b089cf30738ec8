//! Run configuration and command-line arguments.
//!
//! This module defines:
//! - [`RunConfig`], the validated parameters shared by every mode
//! - the clap derive types for the `tree-visit` binary

use crate::algs::partition::SUPPORTED_WORLD_SIZES;
use crate::tree_error::TreeError;
use clap::{Parser, Subcommand};

/// Distributed runs need strictly more vertices than this, so the tree
/// reaches the deepest partition level.
pub const MIN_VERTICES: u64 = 30;

/// Printed by rank 0 before aborting the group on bad parameters.
pub const INVALID_PARAMS_DIAGNOSTIC: &str =
    "[ERR] Valid params: {[-n] 2 | 3 | 5 | 9} {[sizeGraph] must be greater than 30} !!!";

/// Parameters of one generation + traversal run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunConfig {
    /// Target vertex count handed to the tree builder.
    pub vertices: u64,
    /// Fan-out depth for shared-memory traversal (0 = sequential).
    pub fan_out_depth: u32,
    pub root_label: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            vertices: 10_000_000,
            fan_out_depth: 1,
            root_label: "1".to_string(),
        }
    }
}

impl RunConfig {
    pub fn new(vertices: u64) -> Self {
        Self {
            vertices,
            ..Self::default()
        }
    }

    /// Shared-memory runs only need a positive vertex count.
    pub fn validate_local(&self) -> Result<(), TreeError> {
        if self.vertices == 0 {
            return Err(TreeError::InvalidVertexCount { given: 0, min: 0 });
        }
        Ok(())
    }

    /// The line rank 0 prints before aborting the group, if `err` comes from
    /// bad run parameters rather than from the run itself.
    pub fn diagnostic_for(err: &TreeError) -> Option<&'static str> {
        match err {
            TreeError::InvalidVertexCount { .. } | TreeError::UnsupportedWorldSize(_) => {
                Some(INVALID_PARAMS_DIAGNOSTIC)
            }
            _ => None,
        }
    }

    /// Distributed runs need `vertices > MIN_VERTICES` and a world size from
    /// the partition table.
    pub fn validate_distributed(&self, world_size: usize) -> Result<(), TreeError> {
        if self.vertices <= MIN_VERTICES {
            return Err(TreeError::InvalidVertexCount {
                given: self.vertices,
                min: MIN_VERTICES,
            });
        }
        if !SUPPORTED_WORLD_SIZES.contains(&world_size) {
            return Err(TreeError::UnsupportedWorldSize(world_size));
        }
        Ok(())
    }
}

/// Level-saturating tree generation with fan-out and message-passing traversal
#[derive(Parser, Debug, Clone)]
#[command(
    name = "tree-visit",
    version,
    about = "Generate a near-complete binary tree and mark every node visited",
    after_help = "EXAMPLES:\n    \
        tree-visit parallel 10000000\n    \
        tree-visit local 10000 --ranks 9\n    \
        mpirun -n 9 tree-visit mpi 10000  # with --features mpi-support"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Label of the root node
    #[arg(long, default_value = "1", global = true)]
    pub root_label: String,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Single process: generate, then traverse with rayon fan-out
    Parallel {
        /// Target vertex count
        #[arg(value_name = "VERTICES", value_parser = clap::value_parser!(u64).range(1..))]
        vertices: u64,

        /// Levels traversed with one task per child (0 = sequential)
        #[arg(long, default_value_t = 1)]
        fan_out_depth: u32,
    },
    /// Distributed protocol over in-process ranks (one thread per rank)
    Local {
        /// Target vertex count (must be greater than 30)
        #[arg(value_name = "VERTICES")]
        vertices: u64,

        /// World size including the coordinator: 2, 3, 5 or 9
        #[arg(short = 'n', long, default_value_t = 9)]
        ranks: usize,
    },
    /// Distributed protocol over MPI; run under `mpirun -n {2|3|5|9}`
    #[cfg(feature = "mpi-support")]
    Mpi {
        /// Target vertex count (must be greater than 30)
        #[arg(value_name = "VERTICES")]
        vertices: u64,
    },
}

impl CliArgs {
    /// Build the run configuration for the selected subcommand.
    pub fn run_config(&self) -> RunConfig {
        let (vertices, fan_out_depth) = match &self.command {
            Command::Parallel {
                vertices,
                fan_out_depth,
            } => (*vertices, *fan_out_depth),
            Command::Local { vertices, .. } => (*vertices, 0),
            #[cfg(feature = "mpi-support")]
            Command::Mpi { vertices } => (*vertices, 0),
        };
        RunConfig {
            vertices,
            fan_out_depth,
            root_label: self.root_label.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distributed_floor_is_exclusive() {
        assert_eq!(
            RunConfig::new(30).validate_distributed(9),
            Err(TreeError::InvalidVertexCount { given: 30, min: 30 })
        );
        assert!(RunConfig::new(31).validate_distributed(9).is_ok());
    }

    #[test]
    fn distributed_world_sizes() {
        let cfg = RunConfig::new(100);
        for ws in SUPPORTED_WORLD_SIZES {
            assert!(cfg.validate_distributed(ws).is_ok());
        }
        assert_eq!(
            cfg.validate_distributed(4),
            Err(TreeError::UnsupportedWorldSize(4))
        );
    }

    #[test]
    fn diagnostic_only_for_bad_parameters() {
        let e = RunConfig::new(30).validate_distributed(9).unwrap_err();
        assert_eq!(RunConfig::diagnostic_for(&e), Some(INVALID_PARAMS_DIAGNOSTIC));
        let e = RunConfig::new(100).validate_distributed(4).unwrap_err();
        assert_eq!(RunConfig::diagnostic_for(&e), Some(INVALID_PARAMS_DIAGNOSTIC));
        assert_eq!(RunConfig::diagnostic_for(&TreeError::Aborted), None);
        assert_eq!(
            RunConfig::diagnostic_for(&TreeError::Wire("truncated".into())),
            None
        );
    }

    #[test]
    fn parse_parallel() {
        let args =
            CliArgs::parse_from(["tree-visit", "parallel", "1000", "--fan-out-depth", "2"]);
        let cfg = args.run_config();
        assert_eq!(cfg.vertices, 1000);
        assert_eq!(cfg.fan_out_depth, 2);
        assert_eq!(cfg.root_label, "1");
    }

    #[test]
    fn parse_local_with_label() {
        let args = CliArgs::parse_from([
            "tree-visit",
            "local",
            "64",
            "-n",
            "5",
            "--root-label",
            "main",
        ]);
        assert!(matches!(args.command, Command::Local { vertices: 64, ranks: 5 }));
        assert_eq!(args.run_config().root_label, "main");
    }

    #[test]
    fn parallel_rejects_zero() {
        assert!(CliArgs::try_parse_from(["tree-visit", "parallel", "0"]).is_err());
    }
}
