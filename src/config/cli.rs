//! CLI argument parsing using clap

use crate::coordinator::Profile;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// netlogo-mpi - run one headless NetLogo experiment per parallel process
///
/// Start it under a parallel launcher (mpirun, srun, ...) with one process per
/// setup file. Each process picks the setup file matching its rank.
#[derive(Parser, Debug)]
#[command(name = "netlogo-mpi")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub layout: Layout,

    /// Rank of this process (overrides the launcher environment, requires --size)
    #[arg(long, global = true, requires = "size")]
    pub rank: Option<i64>,

    /// Number of processes in the group (requires --rank)
    #[arg(long, global = true, requires = "rank")]
    pub size: Option<i64>,

    /// TOML file with launcher settings
    #[arg(short = 'c', long, global = true, env = "NETLOGO_MPI_CONFIG")]
    pub config: Option<PathBuf>,

    /// Java launcher executable
    #[arg(long, global = true)]
    pub java: Option<String>,

    /// Resolve and print the invocation without running it
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Print the resolved plan as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Check that the engine, model and setup files exist before running
    #[arg(long, global = true)]
    pub check_paths: bool,

    /// Exit with success even if NetLogo fails
    #[arg(long, global = true)]
    pub ignore_exit_status: bool,

    /// Enable debug output
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Positional argument layout
#[derive(Subcommand, Debug)]
pub enum Layout {
    /// java_max_heap netlogo_prog experiment_name model_file output_file setup_files_directory setup_file...
    Dir(LayoutArgs),
    /// netlogo_prog experiment_name model_file output_file setup_file...
    Flat(LayoutArgs),
}

/// Positional arguments, validated against the peer count by the coordinator
///
/// Options are recognised anywhere on the line; values starting with `-`
/// go after `--`.
#[derive(Args, Debug)]
pub struct LayoutArgs {
    #[arg(value_name = "ARGS")]
    pub args: Vec<String>,
}

impl Layout {
    pub fn profile(&self) -> Profile {
        match self {
            Layout::Dir(_) => Profile::SetupDirectory,
            Layout::Flat(_) => Profile::Flat,
        }
    }

    /// Subcommand name, as typed
    pub fn name(&self) -> &'static str {
        match self {
            Layout::Dir(_) => "dir",
            Layout::Flat(_) => "flat",
        }
    }

    pub fn args(&self) -> &[String] {
        match self {
            Layout::Dir(a) | Layout::Flat(a) => &a.args,
        }
    }
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Explicit rank/size pair, if both were given
    pub fn explicit_context(&self) -> Option<(i64, i64)> {
        match (self.rank, self.size) {
            (Some(rank), Some(size)) => Some((rank, size)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dir_layout() {
        let cli = Cli::try_parse_from([
            "netlogo-mpi", "dir", "8192m", "nl.jar", "Exp", "m.nlogo", "out.csv", "/data", "a.xml",
        ])
        .unwrap();
        assert_eq!(cli.layout.profile(), Profile::SetupDirectory);
        assert_eq!(cli.layout.args().len(), 7);
        assert_eq!(cli.explicit_context(), None);
    }

    #[test]
    fn test_parse_flat_with_globals() {
        let cli = Cli::try_parse_from([
            "netlogo-mpi", "--rank", "1", "--size", "3", "--dry-run", "flat", "nl.jar", "Exp",
        ])
        .unwrap();
        assert_eq!(cli.layout.profile(), Profile::Flat);
        assert_eq!(cli.layout.args(), ["nl.jar", "Exp"]);
        assert_eq!(cli.explicit_context(), Some((1, 3)));
        assert!(cli.dry_run);
    }

    #[test]
    fn test_argument_count_left_to_coordinator() {
        // clap accepts any count; the coordinator decides
        let cli = Cli::try_parse_from(["netlogo-mpi", "flat"]).unwrap();
        assert!(cli.layout.args().is_empty());
    }

    #[test]
    fn test_options_after_positionals() {
        let cli = Cli::try_parse_from([
            "netlogo-mpi", "--rank", "1", "--size", "2", "flat", "nl.jar", "Exp", "m.nlogo", "out.csv",
            "s0.xml", "--dry-run", "--json",
        ])
        .unwrap();
        assert!(cli.dry_run);
        assert!(cli.json);
        assert_eq!(cli.layout.args(), ["nl.jar", "Exp", "m.nlogo", "out.csv", "s0.xml"]);
    }

    #[test]
    fn test_trailing_rank_and_size() {
        let cli = Cli::try_parse_from([
            "netlogo-mpi", "flat", "nl.jar", "Exp", "m.nlogo", "out.csv", "s0.xml", "--rank", "0", "--size", "1",
        ])
        .unwrap();
        assert_eq!(cli.explicit_context(), Some((0, 1)));
        assert_eq!(cli.layout.args().len(), 5);
    }

    #[test]
    fn test_hyphen_values_after_double_dash() {
        let cli = Cli::try_parse_from([
            "netlogo-mpi", "flat", "--", "nl.jar", "Exp", "m.nlogo", "out.csv", "-s0.xml",
        ])
        .unwrap();
        assert!(!cli.dry_run);
        assert_eq!(cli.layout.args()[4], "-s0.xml");
    }

    #[test]
    fn test_rank_requires_size() {
        assert!(Cli::try_parse_from(["netlogo-mpi", "--rank", "0", "flat"]).is_err());
    }
}
