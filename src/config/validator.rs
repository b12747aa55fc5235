//! Settings and input path validation

use super::*;
use crate::config::cli_convert::parse_heap_size;
use crate::coordinator::InvocationPlan;
use crate::error::{LaunchError, MissingPath};
use anyhow::Result;
use std::path::Path;

/// Validate launcher settings
pub fn validate_settings(settings: &LaunchSettings) -> Result<()> {
    if settings.java.trim().is_empty() {
        anyhow::bail!("java executable must not be empty");
    }

    if settings.entry_point.trim().is_empty() {
        anyhow::bail!("entry_point must not be empty");
    }

    if settings.encoding.trim().is_empty() {
        anyhow::bail!("encoding must not be empty");
    }

    parse_heap_size(&settings.default_max_memory).map_err(|e| {
        anyhow::anyhow!("default_max_memory '{}' is invalid: {}", settings.default_max_memory, e)
    })?;

    Ok(())
}

/// Check that every input this rank's invocation reads actually exists
///
/// Collects all missing paths rather than stopping at the first one. The
/// output file itself need not exist, but its directory must.
pub fn check_plan_paths(plan: &InvocationPlan) -> std::result::Result<(), LaunchError> {
    let mut missing = Vec::new();

    let mut require_file = |role: &'static str, path: &Path| {
        if !path.is_file() {
            missing.push(MissingPath { role, path: path.to_path_buf() });
        }
    };
    require_file("NetLogo program", &plan.engine_path);
    require_file("model file", &plan.model_file);

    let dir_ok = match plan.setup_dir {
        Some(ref dir) if !dir.is_dir() => {
            missing.push(MissingPath { role: "setup files directory", path: dir.clone() });
            false
        }
        _ => true,
    };
    // A missing directory already explains the missing setup file
    if dir_ok && !plan.setup_file.is_file() {
        missing.push(MissingPath { role: "setup file", path: plan.setup_file.clone() });
    }

    if let Some(parent) = plan.output_file.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            missing.push(MissingPath { role: "output directory", path: parent.to_path_buf() });
        }
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(LaunchError::Preflight(missing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn plan_in(dir: &Path) -> InvocationPlan {
        InvocationPlan {
            max_memory: "1g".to_string(),
            engine_path: dir.join("netlogo.jar"),
            experiment_name: "Exp-0".to_string(),
            model_file: dir.join("model.nlogo"),
            output_file: dir.join("out-0.csv"),
            setup_file: dir.join("setups").join("s0.xml"),
            setup_dir: Some(dir.join("setups")),
        }
    }

    fn create_inputs(dir: &Path) {
        fs::write(dir.join("netlogo.jar"), b"").unwrap();
        fs::write(dir.join("model.nlogo"), b"").unwrap();
        fs::create_dir(dir.join("setups")).unwrap();
        fs::write(dir.join("setups").join("s0.xml"), b"").unwrap();
    }

    #[test]
    fn test_validate_settings() {
        let mut settings = LaunchSettings::default();
        assert!(validate_settings(&settings).is_ok());

        settings.default_max_memory = "sixteen".to_string();
        assert!(validate_settings(&settings).is_err());

        settings = LaunchSettings { java: " ".to_string(), ..LaunchSettings::default() };
        assert!(validate_settings(&settings).is_err());

        settings = LaunchSettings { entry_point: String::new(), ..LaunchSettings::default() };
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_check_paths_all_present() {
        let temp_dir = TempDir::new().unwrap();
        create_inputs(temp_dir.path());
        assert!(check_plan_paths(&plan_in(temp_dir.path())).is_ok());
    }

    #[test]
    fn test_check_paths_reports_every_missing_input() {
        let temp_dir = TempDir::new().unwrap();
        let plan = plan_in(temp_dir.path());

        match check_plan_paths(&plan) {
            Err(LaunchError::Preflight(missing)) => {
                let roles: Vec<&str> = missing.iter().map(|m| m.role).collect();
                assert_eq!(roles, vec!["NetLogo program", "model file", "setup files directory"]);
            }
            other => panic!("expected preflight failure, got {:?}", other),
        }
    }

    #[test]
    fn test_check_paths_missing_setup_file() {
        let temp_dir = TempDir::new().unwrap();
        create_inputs(temp_dir.path());
        let mut plan = plan_in(temp_dir.path());
        plan.setup_file = temp_dir.path().join("setups").join("s9.xml");

        match check_plan_paths(&plan) {
            Err(LaunchError::Preflight(missing)) => {
                assert_eq!(missing.len(), 1);
                assert_eq!(missing[0].role, "setup file");
            }
            other => panic!("expected preflight failure, got {:?}", other),
        }
    }

    #[test]
    fn test_check_paths_output_directory() {
        let temp_dir = TempDir::new().unwrap();
        create_inputs(temp_dir.path());
        let mut plan = plan_in(temp_dir.path());
        plan.output_file = temp_dir.path().join("results").join("out-0.csv");
        assert!(check_plan_paths(&plan).is_err());

        // Bare file name: current directory
        plan.output_file = PathBuf::from("out-0.csv");
        assert!(check_plan_paths(&plan).is_ok());
    }
}
