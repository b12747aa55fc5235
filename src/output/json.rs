//! JSON plan output

use crate::coordinator::{InvocationPlan, Profile};
use crate::invocation::CommandLine;
use crate::Result;
use serde::Serialize;

/// What one rank resolved, as printed with `--json`
#[derive(Debug, Clone, Serialize)]
pub struct PlanReport<'a> {
    pub host: &'a str,
    pub rank: usize,
    pub size: usize,
    pub profile: Profile,
    /// `assigned` or `unassigned`
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<&'a InvocationPlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<Vec<String>>,
}

impl<'a> PlanReport<'a> {
    pub fn assigned(
        host: &'a str,
        rank: usize,
        size: usize,
        profile: Profile,
        plan: &'a InvocationPlan,
        command: &CommandLine,
    ) -> Self {
        Self {
            host,
            rank,
            size,
            profile,
            status: "assigned",
            plan: Some(plan),
            command: Some(command.to_argv()),
        }
    }

    pub fn unassigned(host: &'a str, rank: usize, size: usize, profile: Profile) -> Self {
        Self {
            host,
            rank,
            size,
            profile,
            status: "unassigned",
            plan: None,
            command: None,
        }
    }

    /// Single-line JSON, so reports from many ranks interleave by line
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
