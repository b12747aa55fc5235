//! Mock spawner for testing
//!
//! Records every command it is asked to run and answers with a configured
//! status (or a spawn failure) instead of starting a process.
//!
//! # Example
//!
//! ```
//! use netlogo_mpi::invocation::{CommandLine, EngineStatus, Spawner};
//! use netlogo_mpi::invocation::mock::MockSpawner;
//!
//! let mut spawner = MockSpawner::with_status(EngineStatus::Exited(2));
//! let status = spawner.run(&CommandLine::new("java")).unwrap();
//!
//! assert_eq!(status, EngineStatus::Exited(2));
//! assert_eq!(spawner.calls().len(), 1);
//! ```

use super::{CommandLine, EngineStatus, Spawner};
use crate::error::LaunchError;

#[derive(Debug, Clone)]
enum Behavior {
    Status(EngineStatus),
    SpawnFailure,
}

/// Spawner that records commands instead of running them
#[derive(Debug, Clone)]
pub struct MockSpawner {
    behavior: Behavior,
    calls: Vec<CommandLine>,
}

impl MockSpawner {
    /// Every run exits successfully
    pub fn new() -> Self {
        Self::with_status(EngineStatus::Exited(0))
    }

    /// Every run ends with `status`
    pub fn with_status(status: EngineStatus) -> Self {
        Self {
            behavior: Behavior::Status(status),
            calls: Vec::new(),
        }
    }

    /// Every run fails to start, as if the executable were missing
    pub fn failing() -> Self {
        Self {
            behavior: Behavior::SpawnFailure,
            calls: Vec::new(),
        }
    }

    /// Commands received so far, in order
    pub fn calls(&self) -> &[CommandLine] {
        &self.calls
    }
}

impl Default for MockSpawner {
    fn default() -> Self {
        Self::new()
    }
}

impl Spawner for MockSpawner {
    fn run(&mut self, command: &CommandLine) -> Result<EngineStatus, LaunchError> {
        self.calls.push(command.clone());
        match self.behavior {
            Behavior::Status(status) => Ok(status),
            Behavior::SpawnFailure => Err(LaunchError::spawn(
                command.program().to_string_lossy(),
                std::io::Error::new(std::io::ErrorKind::NotFound, "mock spawn failure"),
            )),
        }
    }
}
