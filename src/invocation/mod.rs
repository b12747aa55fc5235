//! Invocation builder
//!
//! Turns an [`InvocationPlan`] into the Java command line that starts headless
//! NetLogo, and runs it through a [`Spawner`].
//!
//! The command is kept as a program plus a typed argument vector and handed to
//! the OS without a shell, so paths containing spaces or quotes reach NetLogo
//! unchanged. [`CommandLine`]'s `Display` renders a shell-quoted form for
//! printing only.
//!
//! # Example
//!
//! ```
//! use netlogo_mpi::config::LaunchSettings;
//! use netlogo_mpi::coordinator::InvocationPlan;
//! use netlogo_mpi::invocation::InvocationBuilder;
//! use std::path::PathBuf;
//!
//! let plan = InvocationPlan {
//!     max_memory: "8g".to_string(),
//!     engine_path: PathBuf::from("/opt/NetLogo 6/netlogo.jar"),
//!     experiment_name: "Sweep-0".to_string(),
//!     model_file: PathBuf::from("model.nlogo"),
//!     output_file: PathBuf::from("out-0.csv"),
//!     setup_file: PathBuf::from("s0.xml"),
//!     setup_dir: None,
//! };
//!
//! let settings = LaunchSettings::default();
//! let command = InvocationBuilder::new(&settings).build(&plan);
//! assert_eq!(
//!     command.to_string(),
//!     "java -Xmx8g -Dfile.encoding=UTF-8 -cp '/opt/NetLogo 6/netlogo.jar' org.nlogo.headless.Main \
//!      --experiment Sweep-0 --model model.nlogo --setup-file s0.xml --table out-0.csv"
//! );
//! ```

pub mod mock;

use crate::config::LaunchSettings;
use crate::coordinator::InvocationPlan;
use crate::error::LaunchError;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::process::{Command, Stdio};

/// A program and its arguments, never passed through a shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: OsString,
    args: Vec<OsString>,
}

impl CommandLine {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(&mut self, arg: impl Into<OsString>) -> &mut Self {
        self.args.push(arg.into());
        self
    }

    /// Flag followed by its value as a separate argument
    pub fn flag(&mut self, name: &str, value: impl Into<OsString>) -> &mut Self {
        self.arg(name).arg(value)
    }

    pub fn program(&self) -> &OsStr {
        &self.program
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Argument vector as (lossy) strings, program first
    pub fn to_argv(&self) -> Vec<String> {
        std::iter::once(&self.program)
            .chain(&self.args)
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    /// Equivalent `std::process::Command`, stdio inherited
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        cmd
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let words: Vec<String> = self.to_argv().iter().map(|w| shell_quote(w)).collect();
        f.write_str(&words.join(" "))
    }
}

/// POSIX single-quote a word if it contains anything the shell would interpret
pub fn shell_quote(word: &str) -> String {
    let safe = |c: char| c.is_ascii_alphanumeric() || "-_./=:+,@%".contains(c);
    if !word.is_empty() && word.chars().all(safe) {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}

/// Builds the NetLogo headless command line
pub struct InvocationBuilder<'a> {
    settings: &'a LaunchSettings,
}

impl<'a> InvocationBuilder<'a> {
    pub fn new(settings: &'a LaunchSettings) -> Self {
        Self { settings }
    }

    pub fn build(&self, plan: &InvocationPlan) -> CommandLine {
        let mut cmd = CommandLine::new(&self.settings.java);
        cmd.arg(format!("-Xmx{}", plan.max_memory))
            .arg(format!("-Dfile.encoding={}", self.settings.encoding));
        for extra in &self.settings.extra_jvm_args {
            cmd.arg(extra);
        }

        cmd.flag("-cp", plan.engine_path.as_os_str())
            .arg(&self.settings.entry_point)
            .flag("--experiment", &plan.experiment_name)
            .flag("--model", plan.model_file.as_os_str())
            .flag("--setup-file", plan.setup_file.as_os_str())
            .flag("--table", plan.output_file.as_os_str());
        cmd
    }
}

/// How the engine process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineStatus {
    Exited(i32),
    Signaled(i32),
}

impl EngineStatus {
    pub fn success(&self) -> bool {
        matches!(self, EngineStatus::Exited(0))
    }

    /// Shell convention: the exit code, or 128 + signal number
    pub fn exit_code(&self) -> i32 {
        match *self {
            EngineStatus::Exited(code) => code,
            EngineStatus::Signaled(signal) => 128 + signal,
        }
    }
}

impl From<std::process::ExitStatus> for EngineStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return EngineStatus::Exited(code);
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return EngineStatus::Signaled(signal);
            }
        }
        EngineStatus::Exited(1)
    }
}

impl fmt::Display for EngineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineStatus::Exited(code) => write!(f, "exit code {}", code),
            EngineStatus::Signaled(signal) => write!(f, "signal {}", signal),
        }
    }
}

/// Process-spawning capability
///
/// `run` blocks until the command terminates. There is no timeout: a hung
/// engine hangs the calling process.
pub trait Spawner {
    fn run(&mut self, command: &CommandLine) -> Result<EngineStatus, LaunchError>;
}

/// Spawns real processes with inherited stdio
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemSpawner;

impl Spawner for SystemSpawner {
    fn run(&mut self, command: &CommandLine) -> Result<EngineStatus, LaunchError> {
        let status = command
            .to_command()
            .status()
            .map_err(|e| LaunchError::spawn(command.program().to_string_lossy(), e))?;
        Ok(status.into())
    }
}
