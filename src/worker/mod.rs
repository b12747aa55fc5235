//! Per-process worker
//!
//! A worker is one process of the peer group. It resolves its plan through the
//! [`Coordinator`], reports it, and runs NetLogo once through a [`Spawner`]:
//!
//! 1. Validate the argument list against the peer count (rank 0 reports errors)
//! 2. Pick this rank's setup file, or report that there is none
//! 3. Print the plan summary (text or JSON)
//! 4. Optionally check input paths, then spawn and wait
//!
//! Output goes to any `Write` so a whole peer group can be simulated in tests
//! by running one worker per rank against a shared argument list.

use crate::bootstrap::LaunchContext;
use crate::config::validator::check_plan_paths;
use crate::config::LaunchSettings;
use crate::coordinator::{Coordinator, InvocationPlan, Profile, RawArguments, Resolution};
use crate::invocation::{EngineStatus, InvocationBuilder, Spawner};
use crate::output::json::PlanReport;
use crate::output::text;
use crate::Result;
use std::io::Write;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Switches that change what a worker does with its plan
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Print the plan and command, do not spawn
    pub dry_run: bool,
    /// Report as JSON instead of text
    pub json: bool,
    /// Check input paths before spawning
    pub check_paths: bool,
}

/// Result of one worker run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    InvalidArgumentCount,
    InvalidMaxMemory(String),
    NoSetupFileAssigned,
    DryRun(InvocationPlan),
    Executed {
        plan: InvocationPlan,
        status: EngineStatus,
    },
}

impl Outcome {
    /// Process exit code for this outcome
    ///
    /// Usage errors and unassigned ranks are not failures of this process.
    /// An engine failure is passed through unless `ignore_exit_status` is set.
    pub fn exit_code(&self, ignore_exit_status: bool) -> i32 {
        match self {
            Outcome::Executed { status, .. } if !ignore_exit_status => status.exit_code(),
            _ => 0,
        }
    }
}

/// One process of the peer group
pub struct Worker<'a> {
    coordinator: Coordinator,
    settings: &'a LaunchSettings,
    host: String,
    options: RunOptions,
}

impl<'a> Worker<'a> {
    pub fn new(
        context: LaunchContext,
        profile: Profile,
        host: impl Into<String>,
        settings: &'a LaunchSettings,
        options: RunOptions,
    ) -> Self {
        Self {
            coordinator: Coordinator::new(context, profile, settings.default_max_memory.clone()),
            settings,
            host: host.into(),
            options,
        }
    }

    /// Resolve, report and (unless dry-running) execute this rank's plan
    pub fn run<S, W>(&self, args: &RawArguments, spawner: &mut S, out: &mut W) -> Result<Outcome>
    where
        S: Spawner,
        W: Write,
    {
        let context = self.coordinator.context();
        let rank = context.rank();
        let profile = self.coordinator.profile();

        let plan = match self.coordinator.resolve(args) {
            Resolution::InvalidArgumentCount => {
                debug!(rank, args = args.len(), "invalid argument count");
                if context.is_root() {
                    write!(
                        out,
                        "{}",
                        text::format_usage_error(args.program(), profile, "incorrect number of parameters")
                    )?;
                }
                return Ok(Outcome::InvalidArgumentCount);
            }
            Resolution::InvalidMaxMemory(value) => {
                debug!(rank, max_memory = %value, "invalid max heap size");
                if context.is_root() {
                    let error = format!("invalid max heap size, {}", value);
                    write!(out, "{}", text::format_usage_error(args.program(), profile, &error))?;
                }
                return Ok(Outcome::InvalidMaxMemory(value));
            }
            Resolution::NoSetupFileAssigned => {
                if self.options.json {
                    let report = PlanReport::unassigned(&self.host, rank, context.peer_count(), profile);
                    writeln!(out, "{}", report.to_json()?)?;
                } else {
                    writeln!(out, "{}", text::format_unassigned(&self.host, rank))?;
                }
                return Ok(Outcome::NoSetupFileAssigned);
            }
            Resolution::Assigned(plan) => plan,
        };

        let command = InvocationBuilder::new(self.settings).build(&plan);

        if self.options.json {
            let report = PlanReport::assigned(&self.host, rank, context.peer_count(), profile, &plan, &command);
            writeln!(out, "{}", report.to_json()?)?;
        } else {
            write!(out, "{}", text::format_plan_summary(&self.host, rank, &plan))?;
            if self.options.dry_run {
                write!(out, "{}", text::format_command(&command))?;
            }
            writeln!(out)?;
        }
        out.flush()?;

        if self.options.check_paths {
            check_plan_paths(&plan)?;
        }

        if self.options.dry_run {
            return Ok(Outcome::DryRun(plan));
        }

        info!(rank, experiment = %plan.experiment_name, "starting NetLogo");
        debug!(rank, command = %command, "spawning");

        let start = Instant::now();
        let status = spawner.run(&command)?;
        let elapsed = start.elapsed();

        if status.success() {
            info!(rank, elapsed_secs = elapsed.as_secs_f64(), "NetLogo finished");
        } else {
            warn!(rank, %status, elapsed_secs = elapsed.as_secs_f64(), "NetLogo failed");
        }

        Ok(Outcome::Executed { plan, status })
    }
}
