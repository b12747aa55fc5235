//! Error types for the launcher
//!
//! Configuration and wiring code uses `anyhow` with context. The failures the
//! library itself can produce are typed here so the binary can map them to
//! exit codes.

use std::path::PathBuf;
use thiserror::Error;

/// Launcher failures
#[derive(Debug, Error)]
pub enum LaunchError {
    /// The peer group could not be initialised
    #[error("failed to initialize peer group: {0}")]
    Bootstrap(String),

    /// Rank/size pair that cannot describe a peer group
    #[error("invalid launch context: rank {rank} with {size} peers")]
    InvalidContext { rank: i64, size: i64 },

    /// The max-memory argument is not a heap size the runtime accepts
    #[error("invalid max heap size '{0}' (expected e.g. 512m, 8g, 16384m)")]
    InvalidMaxMemory(String),

    /// Paths required by this rank's invocation are missing
    #[error("missing input paths:\n{}", format_missing(.0))]
    Preflight(Vec<MissingPath>),

    /// The launcher executable could not be started
    #[error("failed to start '{program}'")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// A path that failed the preflight check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingPath {
    /// What the path is used for ("model file", "setup file", ...)
    pub role: &'static str,
    pub path: PathBuf,
}

fn format_missing(missing: &[MissingPath]) -> String {
    missing
        .iter()
        .map(|m| format!("  {} does not exist: {}", m.role, m.path.display()))
        .collect::<Vec<_>>()
        .join("\n")
}

impl LaunchError {
    /// Create a spawn error for the given program
    pub fn spawn(program: impl Into<String>, source: std::io::Error) -> Self {
        Self::Spawn {
            program: program.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preflight_message_lists_every_path() {
        let err = LaunchError::Preflight(vec![
            MissingPath { role: "model file", path: PathBuf::from("/m/model.nlogo") },
            MissingPath { role: "setup file", path: PathBuf::from("/data/a.xml") },
        ]);
        let msg = err.to_string();
        assert!(msg.contains("model file does not exist: /m/model.nlogo"));
        assert!(msg.contains("setup file does not exist: /data/a.xml"));
    }

    #[test]
    fn test_spawn_error_keeps_source() {
        use std::error::Error as _;
        let err = LaunchError::spawn(
            "java",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );
        assert_eq!(err.to_string(), "failed to start 'java'");
        assert!(err.source().is_some());
    }
}
