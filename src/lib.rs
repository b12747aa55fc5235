//! netlogo-mpi - rank-based NetLogo dispatcher
//!
//! Runs one headless NetLogo experiment per process of a parallel launch. Each
//! process works out its own setup file, experiment name and output table from
//! its rank and the peer count; peers never talk to each other.
//!
//! # Architecture
//!
//! - **Bootstrap**: rank and peer count from the launcher (environment, CLI or MPI)
//! - **Coordinator**: argument validation and rank-to-setup-file mapping
//! - **Invocation**: Java command line construction and process spawning
//! - **Worker**: one process's resolve / report / run sequence
//! - **Output**: plan summaries as text or JSON

pub mod bootstrap;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod invocation;
pub mod output;
pub mod worker;

// Re-export commonly used types
pub use bootstrap::{LaunchContext, PeerGroup};
pub use config::LaunchSettings;
pub use coordinator::{Coordinator, InvocationPlan, Profile, RawArguments, Resolution};
pub use error::LaunchError;
pub use worker::{Outcome, RunOptions, Worker};

/// Result type used throughout netlogo-mpi
pub type Result<T> = anyhow::Result<T>;
