//! TOML settings file parsing

use super::*;
use crate::config::cli::Cli;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Parse TOML settings file
pub fn parse_toml_file(path: &Path) -> Result<LaunchSettings> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_toml_string(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse TOML settings from string
pub fn parse_toml_string(contents: &str) -> Result<LaunchSettings> {
    let file: ConfigFile = ::toml::from_str(contents)
        .context("Failed to parse TOML configuration")?;

    Ok(file.launcher)
}

/// Resolve settings: defaults, then the settings file, then CLI overrides
pub fn load_settings(cli: &Cli) -> Result<LaunchSettings> {
    let settings = match cli.config {
        Some(ref path) => parse_toml_file(path)?,
        None => LaunchSettings::default(),
    };

    Ok(merge_cli_with_settings(cli, settings))
}

/// Merge CLI arguments with file settings (CLI takes precedence)
pub fn merge_cli_with_settings(cli: &Cli, mut settings: LaunchSettings) -> LaunchSettings {
    if let Some(ref java) = cli.java {
        settings.java = java.clone();
    }

    settings
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_partial_settings() {
        let settings = parse_toml_string(
            r#"
[launcher]
java = "/opt/jdk/bin/java"
extra_jvm_args = ["-server", "-XX:+UseG1GC"]
"#,
        )
        .unwrap();

        assert_eq!(settings.java, "/opt/jdk/bin/java");
        assert_eq!(settings.extra_jvm_args, vec!["-server", "-XX:+UseG1GC"]);
        // Untouched fields keep their defaults
        assert_eq!(settings.entry_point, "org.nlogo.headless.Main");
        assert_eq!(settings.default_max_memory, "16384m");
    }

    #[test]
    fn test_empty_file_is_defaults() {
        assert_eq!(parse_toml_string("").unwrap(), LaunchSettings::default());
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(parse_toml_string("[launcher]\njvm = \"java\"\n").is_err());
        assert!(parse_toml_string("[engine]\njava = \"java\"\n").is_err());
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[launcher]\njava = \"/usr/lib/jvm/bin/java\"\nencoding = \"ISO-8859-1\"").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = Cli::try_parse_from(["netlogo-mpi", "--config", &path, "--java", "java17", "flat"]).unwrap();
        let settings = load_settings(&cli).unwrap();
        assert_eq!(settings.java, "java17");
        assert_eq!(settings.encoding, "ISO-8859-1");
    }

    #[test]
    fn test_missing_file_is_error() {
        let cli = Cli::try_parse_from(["netlogo-mpi", "--config", "/nonexistent/netlogo-mpi.toml", "flat"]).unwrap();
        let err = load_settings(&cli).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to read config file"));
    }
}
