//! Invocation candidates
//!
//! An [`InvocationCandidate`] is one structured way to reach the external
//! CLI: which program to start, which leading arguments it needs, how to
//! probe it and how to invoke it for a prompt. Candidates never carry
//! free-form shell text built at runtime; the only shell script in the
//! catalog is a fixed `<name> "$@"` line whose name is validated here.
//!
//! Once a candidate's probe succeeds it becomes a [`ResolvedCommand`],
//! which pins the concrete program path found on this host.

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Token in configured invoke arguments that is replaced by the model.
pub const MODEL_TOKEN: &str = "{model}";

/// Errors detected while constructing a candidate
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CandidateError {
    #[error("candidate `{0}` has an empty program")]
    EmptyProgram(String),

    #[error("candidate `{0}` has an empty probe marker")]
    EmptyMarker(String),

    #[error("candidate `{label}` has an argument containing a NUL byte")]
    NulByte { label: String },

    #[error("candidate `{label}` must contain exactly one model placeholder, found {count}")]
    ModelPlaceholder { label: String, count: usize },

    #[error("`{0}` is not a plain executable name")]
    UnsafeExecutableName(String),
}

/// Where the program of a candidate comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Program {
    /// Executable looked up on `PATH`.
    Named(String),
    /// The user's login shell (`$SHELL`, else `/bin/sh`), run interactively
    /// so aliases and rc-file `PATH` edits apply.
    LoginShell,
    /// Fixed filesystem path; a leading `~/` expands to the home directory.
    Path(PathBuf),
    /// `<npm prefix -g>/bin/<name>`.
    NpmGlobalBin(String),
}

impl Program {
    fn is_empty(&self) -> bool {
        match self {
            Program::Named(name) | Program::NpmGlobalBin(name) => name.trim().is_empty(),
            Program::Path(path) => path.as_os_str().is_empty(),
            Program::LoginShell => false,
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Program::Named(name) => write!(f, "{}", name),
            Program::LoginShell => f.write_str("$SHELL"),
            Program::Path(path) => write!(f, "{}", path.display()),
            Program::NpmGlobalBin(name) => write!(f, "$(npm prefix -g)/bin/{}", name),
        }
    }
}

/// One invoke argument: a literal or the model placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    Literal(String),
    Model,
}

impl Arg {
    /// Parse a configured argument; exactly [`MODEL_TOKEN`] becomes [`Arg::Model`].
    pub fn parse(raw: &str) -> Self {
        if raw == MODEL_TOKEN {
            Arg::Model
        } else {
            Arg::Literal(raw.to_string())
        }
    }

    fn render(&self, model: &str) -> String {
        match self {
            Arg::Literal(s) => s.clone(),
            Arg::Model => model.to_string(),
        }
    }
}

/// A structured, validated way of reaching the external CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationCandidate {
    label: String,
    program: Program,
    base_args: Vec<String>,
    probe_args: Vec<String>,
    invoke_args: Vec<Arg>,
    marker: String,
}

impl InvocationCandidate {
    /// Validate and build a candidate.
    ///
    /// `base_args` precede both the probe and the invoke arguments.
    pub fn new(
        label: impl Into<String>,
        program: Program,
        base_args: Vec<String>,
        probe_args: Vec<String>,
        invoke_args: Vec<Arg>,
        marker: impl Into<String>,
    ) -> Result<Self, CandidateError> {
        let label = label.into();
        let marker = marker.into();

        if program.is_empty() {
            return Err(CandidateError::EmptyProgram(label));
        }
        if marker.is_empty() {
            return Err(CandidateError::EmptyMarker(label));
        }

        let literal_args = invoke_args.iter().filter_map(|a| match a {
            Arg::Literal(s) => Some(s.as_str()),
            Arg::Model => None,
        });
        let has_nul = base_args
            .iter()
            .chain(probe_args.iter())
            .map(String::as_str)
            .chain(literal_args)
            .any(|a| a.contains('\0'));
        if has_nul {
            return Err(CandidateError::NulByte { label });
        }

        let count = invoke_args.iter().filter(|a| **a == Arg::Model).count();
        if count != 1 {
            return Err(CandidateError::ModelPlaceholder { label, count });
        }

        Ok(Self {
            label,
            program,
            base_args,
            probe_args,
            invoke_args,
            marker,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Full argument list of the probe invocation.
    pub fn probe_command_args(&self) -> Vec<String> {
        self.base_args
            .iter()
            .chain(self.probe_args.iter())
            .cloned()
            .collect()
    }
}

/// The candidate proven to work on this host, with its concrete program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCommand {
    label: String,
    program: PathBuf,
    base_args: Vec<String>,
    invoke_args: Vec<Arg>,
}

impl ResolvedCommand {
    /// Pin `candidate` to the program located on this host.
    pub fn new(candidate: &InvocationCandidate, program: impl Into<PathBuf>) -> Self {
        Self {
            label: candidate.label.clone(),
            program: program.into(),
            base_args: candidate.base_args.clone(),
            invoke_args: candidate.invoke_args.clone(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Arguments for a prompt invocation with `model` substituted.
    pub fn invoke_command_args(&self, model: &str) -> Vec<String> {
        self.base_args
            .iter()
            .cloned()
            .chain(self.invoke_args.iter().map(|a| a.render(model)))
            .collect()
    }

    /// Shell-quoted command line, for logs and error messages.
    pub fn display(&self, model: &str) -> String {
        let mut line = shell_quote(&self.program.to_string_lossy());
        for arg in self.invoke_command_args(model) {
            line.push(' ');
            line.push_str(&shell_quote(&arg));
        }
        line
    }
}

/// Build the login-shell script that forwards arguments to `executable`.
///
/// Arguments reach the CLI positionally through `"$@"`, so nothing but the
/// validated executable name is ever parsed by the shell.
pub fn alias_script(executable: &str) -> Result<String, CandidateError> {
    let plain = !executable.is_empty()
        && executable
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if !plain {
        return Err(CandidateError::UnsafeExecutableName(executable.to_string()));
    }
    Ok(format!("{} \"$@\"", executable))
}

/// Quote `s` for a POSIX shell.
///
/// Plain words are returned unchanged. Anything else is wrapped in single
/// quotes; an embedded `'` closes the quoted string, emits an escaped quote
/// and reopens it (`'\''`).
pub fn shell_quote(s: &str) -> String {
    let plain = !s.is_empty()
        && s.chars().all(|c| {
            c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/' | ':' | '=' | '@' | '%' | '+' | ',')
        });
    if plain {
        return s.to_string();
    }
    format!("'{}'", s.replace('\'', "'\\''"))
}
