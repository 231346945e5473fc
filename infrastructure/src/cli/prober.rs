//! Candidate probing
//!
//! A probe locates a candidate's program on this host, runs its version
//! command and checks the output for the product marker.

use super::candidate::{InvocationCandidate, Program, ResolvedCommand};
use super::process::guarded_command;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Default wall-clock limit of one probe
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Why a single candidate was rejected
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProbeFailure {
    #[error("not found: {0}")]
    NotLocated(String),

    #[error("failed to start: {0}")]
    Spawn(String),

    #[error("probe timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("output does not mention `{0}`")]
    MarkerMissing(String),
}

/// Checks whether one candidate works on this host
#[async_trait]
pub trait CandidateProber: Send + Sync {
    async fn probe(&self, candidate: &InvocationCandidate)
    -> Result<ResolvedCommand, ProbeFailure>;
}

/// Prober that runs real subprocesses
pub struct ProcessProber {
    timeout: Duration,
}

impl ProcessProber {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    async fn locate(&self, program: &Program) -> Result<PathBuf, ProbeFailure> {
        match program {
            Program::Named(name) => {
                which::which(name).map_err(|e| ProbeFailure::NotLocated(format!("{}: {}", name, e)))
            }
            Program::LoginShell => Ok(login_shell()),
            Program::Path(path) => {
                let path = expand_home(path);
                if path.is_file() {
                    Ok(path)
                } else {
                    Err(ProbeFailure::NotLocated(path.display().to_string()))
                }
            }
            Program::NpmGlobalBin(name) => {
                let prefix = self.npm_global_prefix().await?;
                let path = prefix.join("bin").join(name);
                if path.is_file() {
                    Ok(path)
                } else {
                    Err(ProbeFailure::NotLocated(path.display().to_string()))
                }
            }
        }
    }

    async fn npm_global_prefix(&self) -> Result<PathBuf, ProbeFailure> {
        let npm = which::which("npm").map_err(|e| ProbeFailure::NotLocated(format!("npm: {}", e)))?;
        let stdout = self.run(&npm, &["prefix".to_string(), "-g".to_string()]).await?;
        let prefix = stdout.trim();
        if prefix.is_empty() {
            return Err(ProbeFailure::NotLocated("npm prefix -g printed nothing".into()));
        }
        Ok(PathBuf::from(prefix))
    }

    /// Run `program args`, returning stdout followed by stderr.
    async fn run(&self, program: &Path, args: &[String]) -> Result<String, ProbeFailure> {
        let mut cmd = guarded_command(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let child = cmd
            .spawn()
            .map_err(|e| ProbeFailure::Spawn(format!("{}: {}", program.display(), e)))?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| ProbeFailure::Timeout(self.timeout))?
            .map_err(|e| ProbeFailure::Spawn(e.to_string()))?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(combined)
    }
}

impl Default for ProcessProber {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_TIMEOUT)
    }
}

#[async_trait]
impl CandidateProber for ProcessProber {
    async fn probe(
        &self,
        candidate: &InvocationCandidate,
    ) -> Result<ResolvedCommand, ProbeFailure> {
        let program = self.locate(candidate.program()).await?;
        debug!(
            "Probing {} via {}",
            candidate.label(),
            program.display()
        );

        let output = self.run(&program, &candidate.probe_command_args()).await?;
        if output.contains(candidate.marker()) {
            Ok(ResolvedCommand::new(candidate, program))
        } else {
            Err(ProbeFailure::MarkerMissing(candidate.marker().to_string()))
        }
    }
}

/// `$SHELL`, or `/bin/sh` when unset.
fn login_shell() -> PathBuf {
    std::env::var_os("SHELL")
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("/bin/sh"))
}

/// Expand a leading `~/` to the home directory.
fn expand_home(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    path.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::candidate::Arg;

    fn sh_candidate(script: &str, marker: &str) -> InvocationCandidate {
        InvocationCandidate::new(
            "sh",
            Program::Named("sh".into()),
            vec!["-c".into(), script.into(), "sh".into()],
            vec![],
            vec![Arg::Model],
            marker,
        )
        .unwrap()
    }

    #[test]
    fn test_expand_home() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(
            expand_home(Path::new("~/.claude/local/claude")),
            home.join(".claude/local/claude")
        );
        assert_eq!(
            expand_home(Path::new("/usr/local/bin/claude")),
            PathBuf::from("/usr/local/bin/claude")
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_probe_accepts_marker_on_stdout() {
        let prober = ProcessProber::default();
        let resolved = prober
            .probe(&sh_candidate("echo '1.0.0 (Claude Code)'", "Claude Code"))
            .await
            .unwrap();
        assert_eq!(resolved.label(), "sh");
        assert!(resolved.program().ends_with("sh"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_probe_accepts_marker_on_stderr() {
        let prober = ProcessProber::default();
        let result = prober
            .probe(&sh_candidate("echo 'Claude Code 2.0' >&2", "Claude Code"))
            .await;
        assert!(result.is_ok());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_probe_rejects_missing_marker() {
        let prober = ProcessProber::default();
        let result = prober
            .probe(&sh_candidate("echo 'some other tool 1.0'", "Claude Code"))
            .await;
        assert_eq!(
            result,
            Err(ProbeFailure::MarkerMissing("Claude Code".into()))
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_probe_times_out() {
        let prober = ProcessProber::new(Duration::from_millis(200));
        let result = prober
            .probe(&sh_candidate("sleep 5; echo 'Claude Code'", "Claude Code"))
            .await;
        assert!(matches!(result, Err(ProbeFailure::Timeout(_))));
    }

    #[tokio::test]
    async fn test_probe_missing_path() {
        let candidate = InvocationCandidate::new(
            "fixed",
            Program::Path(PathBuf::from("/nonexistent/bin/claude")),
            vec![],
            vec!["--version".into()],
            vec![Arg::Model],
            "Claude Code",
        )
        .unwrap();
        let result = ProcessProber::default().probe(&candidate).await;
        assert!(matches!(result, Err(ProbeFailure::NotLocated(_))));
    }
}
