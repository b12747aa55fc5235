//! Launch coordinator
//!
//! Maps a process's rank onto the positional argument list. Each process runs
//! this independently; no messages are exchanged between peers, so the mapping
//! must be a pure function of `(LaunchContext, RawArguments)`.
//!
//! # Assignment
//!
//! Setup files follow the fixed arguments in rank order. Rank `r` gets the
//! setup file at position `fixed + r` when it exists. With fewer setup files
//! than peers only the lowest ranks get work and the rest report
//! [`Resolution::NoSetupFileAssigned`]. More setup files than peers is a usage
//! error, as is a list with no setup file at all.

use crate::bootstrap::LaunchContext;
use crate::config::cli_convert::parse_heap_size;
use serde::Serialize;
use std::path::PathBuf;

/// Positional argument layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Profile {
    /// `prog heap engine experiment model output setup_dir setup...`
    SetupDirectory,
    /// `prog engine experiment model output setup...` with a default heap size
    Flat,
}

impl Profile {
    /// Number of arguments before the first setup file, program name included
    pub fn fixed_arg_count(self) -> usize {
        match self {
            Profile::SetupDirectory => 7,
            Profile::Flat => 5,
        }
    }

    /// Placeholder names of the arguments after the program name
    pub fn usage(self) -> &'static str {
        match self {
            Profile::SetupDirectory => "[java_max_heap] [netlogo_prog] [experiment_name] [model_file] [output_file] [setup_files_directory] [setup_file1 setup_file2 ...]",
            Profile::Flat => "[netlogo_prog] [experiment_name] [model_file] [output_file] [setup_file1 setup_file2 ...]",
        }
    }
}

/// Command-line arguments, program name in slot 0
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawArguments(Vec<String>);

#[allow(clippy::len_without_is_empty)]
impl RawArguments {
    pub fn new(program: impl Into<String>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let mut all = vec![program.into()];
        all.extend(args.into_iter().map(Into::into));
        Self(all)
    }

    pub fn program(&self) -> &str {
        &self.0[0]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    fn get(&self, index: usize) -> &str {
        &self.0[index]
    }
}

impl From<Vec<String>> for RawArguments {
    /// An empty vector still gets a (blank) program-name slot
    fn from(mut args: Vec<String>) -> Self {
        if args.is_empty() {
            args.push(String::new());
        }
        Self(args)
    }
}

/// Everything one process needs to run its experiment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvocationPlan {
    pub max_memory: String,
    pub engine_path: PathBuf,
    pub experiment_name: String,
    pub model_file: PathBuf,
    pub output_file: PathBuf,
    pub setup_file: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub setup_dir: Option<PathBuf>,
}

/// What the coordinator decided for this process
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Assigned(InvocationPlan),
    NoSetupFileAssigned,
    InvalidArgumentCount,
    InvalidMaxMemory(String),
}

/// Per-process launch coordinator
#[derive(Debug, Clone)]
pub struct Coordinator {
    context: LaunchContext,
    profile: Profile,
    default_max_memory: String,
}

impl Coordinator {
    pub fn new(context: LaunchContext, profile: Profile, default_max_memory: impl Into<String>) -> Self {
        Self {
            context,
            profile,
            default_max_memory: default_max_memory.into(),
        }
    }

    pub fn context(&self) -> LaunchContext {
        self.context
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    /// Whether the argument count fits the group: at least one setup file,
    /// at most one per peer
    pub fn argument_count_valid(&self, args: &RawArguments) -> bool {
        let fixed = self.profile.fixed_arg_count();
        args.len() > fixed && args.len() <= fixed + self.context.peer_count()
    }

    /// Whether this rank has a setup file
    pub fn has_assignment(&self, args: &RawArguments) -> bool {
        args.len() > self.profile.fixed_arg_count() + self.context.rank()
    }

    /// Resolve this process's plan
    ///
    /// Group-wide problems (argument count, heap size) are reported the same
    /// way by every rank so that all peers agree on not running.
    pub fn resolve(&self, args: &RawArguments) -> Resolution {
        if !self.argument_count_valid(args) {
            return Resolution::InvalidArgumentCount;
        }

        let max_memory = match self.profile {
            Profile::SetupDirectory => args.get(1).to_string(),
            Profile::Flat => self.default_max_memory.clone(),
        };
        if parse_heap_size(&max_memory).is_err() {
            return Resolution::InvalidMaxMemory(max_memory);
        }

        if !self.has_assignment(args) {
            return Resolution::NoSetupFileAssigned;
        }

        Resolution::Assigned(self.build_plan(args, max_memory))
    }

    fn build_plan(&self, args: &RawArguments, max_memory: String) -> InvocationPlan {
        let rank = self.context.rank();
        // Index of the first argument after the heap size, if the layout has one
        let base = match self.profile {
            Profile::SetupDirectory => 2,
            Profile::Flat => 1,
        };
        let assigned = args.get(self.profile.fixed_arg_count() + rank);

        let (setup_file, setup_dir) = match self.profile {
            Profile::SetupDirectory => {
                let dir = args.get(6);
                (PathBuf::from(setup_path(dir, assigned)), Some(PathBuf::from(dir)))
            }
            Profile::Flat => (PathBuf::from(assigned), None),
        };

        InvocationPlan {
            max_memory,
            engine_path: PathBuf::from(args.get(base)),
            experiment_name: experiment_name(args.get(base + 1), rank),
            model_file: PathBuf::from(args.get(base + 2)),
            output_file: PathBuf::from(rank_output_file(args.get(base + 3), rank)),
            setup_file,
            setup_dir,
        }
    }
}

/// `<dir>/<name>`, joined textually
///
/// An absolute `name` stays inside `dir` and an empty `dir` means the root.
pub fn setup_path(dir: &str, name: &str) -> String {
    format!("{}/{}", dir.trim_end_matches('/'), name)
}

/// `<base>-<rank>`
pub fn experiment_name(base: &str, rank: usize) -> String {
    format!("{}-{}", base, rank)
}

/// Insert `-<rank>` before the extension of the file name
///
/// Only a dot in the last path component counts as an extension separator,
/// so `/runs.v2/out` becomes `/runs.v2/out-<rank>`. Both `/` and `\\` end a
/// component. Without a dot the suffix is appended.
pub fn rank_output_file(base: &str, rank: usize) -> String {
    let suffix = format!("-{}", rank);
    let name_start = base.rfind(['/', '\\']).map_or(0, |i| i + 1);

    match base[name_start..].rfind('.') {
        Some(dot) => {
            let at = name_start + dot;
            format!("{}{}{}", &base[..at], suffix, &base[at..])
        }
        None => format!("{}{}", base, suffix),
    }
}
