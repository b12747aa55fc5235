//! Peer-group bootstrap
//!
//! Every worker process needs two facts before it can pick its setup file: its
//! rank and the number of peers launched alongside it. Those facts come from
//! the parallel launcher (mpirun, srun, ...), never from the coordinator itself.
//!
//! # Sources
//!
//! - **Explicit**: `--rank` / `--size` on the command line
//! - **Environment**: variables exported by Open MPI, PMI or Slurm
//! - **MPI** (feature `mpi`): `MPI_Init` through rsmpi, with a barrier at finalize
//!
//! Whatever the source, the result is an immutable [`LaunchContext`] handed to
//! the coordinator.

#[cfg(feature = "mpi")]
pub mod mpi;

use crate::error::LaunchError;
use tracing::debug;

/// This process's position within its peer group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchContext {
    rank: usize,
    peer_count: usize,
}

impl LaunchContext {
    /// Create a context, rejecting ranks outside `[0, peer_count)`
    pub fn new(rank: i64, peer_count: i64) -> Result<Self, LaunchError> {
        if peer_count <= 0 || rank < 0 || rank >= peer_count {
            return Err(LaunchError::InvalidContext { rank, size: peer_count });
        }
        Ok(Self {
            rank: rank as usize,
            peer_count: peer_count as usize,
        })
    }

    /// Context of a process started without a parallel launcher
    pub fn singleton() -> Self {
        Self { rank: 0, peer_count: 1 }
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn peer_count(&self) -> usize {
        self.peer_count
    }

    /// Whether this process speaks for the whole group (usage errors etc.)
    pub fn is_root(&self) -> bool {
        self.rank == 0
    }
}

/// Source of rank, peer count and processor name
///
/// Implementations own whatever runtime state the launcher needs and release
/// it in `finalize`, which every process reaches exactly once before exiting.
pub trait PeerGroup {
    fn context(&self) -> LaunchContext;

    /// Host name reported in the plan summary
    fn processor_name(&self) -> String;

    /// Shutdown synchronisation with the rest of the group
    fn finalize(&mut self) {}
}

/// Peer group described on the command line
#[derive(Debug, Clone)]
pub struct ExplicitPeerGroup {
    context: LaunchContext,
}

impl ExplicitPeerGroup {
    pub fn new(rank: i64, size: i64) -> Result<Self, LaunchError> {
        Ok(Self {
            context: LaunchContext::new(rank, size)?,
        })
    }
}

impl PeerGroup for ExplicitPeerGroup {
    fn context(&self) -> LaunchContext {
        self.context
    }

    fn processor_name(&self) -> String {
        local_hostname()
    }
}

/// Rank/size variable pairs exported by common launchers, checked in order
const ENV_SOURCES: &[(&str, &str, &str)] = &[
    ("Open MPI", "OMPI_COMM_WORLD_RANK", "OMPI_COMM_WORLD_SIZE"),
    ("PMI", "PMI_RANK", "PMI_SIZE"),
    ("Slurm", "SLURM_PROCID", "SLURM_NTASKS"),
];

/// Peer group discovered from the launcher's environment
#[derive(Debug, Clone)]
pub struct EnvPeerGroup {
    context: LaunchContext,
    source: &'static str,
}

impl EnvPeerGroup {
    /// Read the process environment
    pub fn from_env() -> Result<Self, LaunchError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve using an arbitrary variable lookup
    ///
    /// A source is used only when both its variables are set. If none matches
    /// the process runs as a singleton.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LaunchError>
    where
        F: Fn(&str) -> Option<String>,
    {
        for &(source, rank_var, size_var) in ENV_SOURCES {
            let (Some(rank), Some(size)) = (lookup(rank_var), lookup(size_var)) else {
                continue;
            };

            let rank = parse_env_int(rank_var, &rank)?;
            let size = parse_env_int(size_var, &size)?;
            let context = LaunchContext::new(rank, size)?;
            debug!(source, rank, size, "peer group from environment");
            return Ok(Self { context, source });
        }

        debug!("no launcher environment found, running as singleton");
        Ok(Self {
            context: LaunchContext::singleton(),
            source: "singleton",
        })
    }

    /// Name of the launcher the context was read from
    pub fn source(&self) -> &'static str {
        self.source
    }
}

impl PeerGroup for EnvPeerGroup {
    fn context(&self) -> LaunchContext {
        self.context
    }

    fn processor_name(&self) -> String {
        local_hostname()
    }
}

fn parse_env_int(var: &str, value: &str) -> Result<i64, LaunchError> {
    value
        .trim()
        .parse()
        .map_err(|_| LaunchError::Bootstrap(format!("{} is not an integer: '{}'", var, value)))
}

/// Machine hostname, or "localhost" when it cannot be read
pub fn local_hostname() -> String {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "localhost".to_string())
}
