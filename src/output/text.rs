//! Human-readable text output

use crate::coordinator::{InvocationPlan, Profile};
use crate::invocation::CommandLine;

/// Summary of the resolved plan, printed by every rank that runs
pub fn format_plan_summary(host: &str, rank: usize, plan: &InvocationPlan) -> String {
    format!(
        "  {} ({}):\n    Java max memory:     {}\n    NetLogo program:     {}\n    Experiment name:     {}\n    Model file:          {}\n    Setup file:          {}\n    Partial output file: {}\n",
        host,
        rank,
        plan.max_memory,
        plan.engine_path.display(),
        plan.experiment_name,
        plan.model_file.display(),
        plan.setup_file.display(),
        plan.output_file.display(),
    )
}

/// Message for ranks beyond the last setup file
pub fn format_unassigned(host: &str, rank: usize) -> String {
    format!("  {} ({}): no setup file assigned\n", host, rank)
}

/// Usage text followed by an error line
pub fn format_usage_error(program: &str, profile: Profile, error: &str) -> String {
    format!("Usage: {} {}\n\nERROR: {}\n", program, profile.usage(), error)
}

/// Command line as it would be typed in a shell (dry run)
pub fn format_command(command: &CommandLine) -> String {
    format!("    Command: {}\n", command)
}
