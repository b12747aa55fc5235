//! Configuration module
//!
//! Handles CLI argument parsing, TOML launcher settings, and validation.
//!
//! Positional arguments (engine, model, setup files, ...) always come from the
//! command line. What is configurable is how the engine gets launched: the Java
//! executable, the NetLogo entry point, the file encoding and the heap size used
//! when the layout does not carry one.

pub mod cli;
pub mod cli_convert;
pub mod toml;
pub mod validator;

use serde::{Deserialize, Serialize};

/// How the NetLogo engine is started
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LaunchSettings {
    /// Java launcher executable
    #[serde(default = "default_java")]
    pub java: String,
    /// Fully qualified headless entry point
    #[serde(default = "default_entry_point")]
    pub entry_point: String,
    /// Value of `-Dfile.encoding`
    #[serde(default = "default_encoding")]
    pub encoding: String,
    /// Heap size for layouts without a max-memory argument
    #[serde(default = "default_max_memory")]
    pub default_max_memory: String,
    /// Extra JVM flags, placed before `-cp`
    #[serde(default)]
    pub extra_jvm_args: Vec<String>,
}

fn default_java() -> String {
    "java".to_string()
}

fn default_entry_point() -> String {
    "org.nlogo.headless.Main".to_string()
}

fn default_encoding() -> String {
    "UTF-8".to_string()
}

fn default_max_memory() -> String {
    "16384m".to_string()
}

impl Default for LaunchSettings {
    fn default() -> Self {
        Self {
            java: default_java(),
            entry_point: default_entry_point(),
            encoding: default_encoding(),
            default_max_memory: default_max_memory(),
            extra_jvm_args: Vec::new(),
        }
    }
}

/// Top-level layout of a settings file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub launcher: LaunchSettings,
}
