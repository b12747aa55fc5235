//! netlogo-mpi CLI entry point

use anyhow::{Context, Result};
use netlogo_mpi::bootstrap::{ExplicitPeerGroup, PeerGroup};
use netlogo_mpi::config::cli::Cli;
use netlogo_mpi::config::{toml, validator};
use netlogo_mpi::invocation::SystemSpawner;
use netlogo_mpi::{RawArguments, RunOptions, Worker};
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    setup_logging(cli.debug);

    let mut group = match open_peer_group(&cli) {
        Ok(group) => group,
        Err(e) => {
            error!("{:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let code = match run(&cli, group.as_ref()) {
        Ok(code) => code,
        Err(e) => {
            error!(rank = group.context().rank(), "{:#}", e);
            1
        }
    };

    // Every rank reaches this point, whatever happened above
    group.finalize();

    ExitCode::from(code.clamp(0, 255) as u8)
}

/// Diagnostics go to stderr; stdout carries the plan summaries
fn setup_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

/// Peer group from --rank/--size, MPI (feature `mpi`) or the launcher environment
fn open_peer_group(cli: &Cli) -> Result<Box<dyn PeerGroup>> {
    if let Some((rank, size)) = cli.explicit_context() {
        debug!(rank, size, "peer group from command line");
        return Ok(Box::new(ExplicitPeerGroup::new(rank, size)?));
    }

    #[cfg(feature = "mpi")]
    {
        let group = netlogo_mpi::bootstrap::mpi::MpiPeerGroup::init()?;
        Ok(Box::new(group))
    }

    #[cfg(not(feature = "mpi"))]
    {
        let group = netlogo_mpi::bootstrap::EnvPeerGroup::from_env()?;
        debug!(source = group.source(), "peer group from environment");
        Ok(Box::new(group))
    }
}

fn run(cli: &Cli, group: &dyn PeerGroup) -> Result<i32> {
    let settings = toml::load_settings(cli)?;
    validator::validate_settings(&settings).context("Invalid launcher settings")?;

    let context = group.context();
    let options = RunOptions {
        dry_run: cli.dry_run,
        json: cli.json,
        check_paths: cli.check_paths,
    };

    let program = format!("{} {}", program_name(), cli.layout.name());
    let args = RawArguments::new(program, cli.layout.args().iter().cloned());

    let worker = Worker::new(context, cli.layout.profile(), group.processor_name(), &settings, options);
    let mut stdout = std::io::stdout().lock();
    let outcome = worker.run(&args, &mut SystemSpawner, &mut stdout)?;

    debug!(rank = context.rank(), ?outcome, "worker done");
    Ok(outcome.exit_code(cli.ignore_exit_status))
}

fn program_name() -> String {
    std::env::args()
        .next()
        .unwrap_or_else(|| "netlogo-mpi".to_string())
}
