//! Process invoker - `CliGateway` backed by a real subprocess
//!
//! Each call spawns the resolved command once, writes the prompt to its
//! stdin and collects stdout. The prompt never appears on the command line.
//! Output beyond the configured ceiling, the wall-clock timeout and caller
//! cancellation all abort the call and kill the child.

use super::candidate::ResolvedCommand;
use super::process::guarded_command;
use super::resolver::{CommandResolver, ResolveError};
use async_trait::async_trait;
use bridge_application::ports::cli_gateway::{CliGateway, GatewayError};
use std::io;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::ChildStdin;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Default wall-clock limit of one invocation
pub const DEFAULT_INVOKE_TIMEOUT: Duration = Duration::from_secs(30);

/// Default ceiling for stdout (and, separately, stderr)
pub const DEFAULT_MAX_OUTPUT_BYTES: usize = 10 * 1024 * 1024;

/// Resource limits applied to every invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvokeLimits {
    pub timeout: Duration,
    pub max_output_bytes: usize,
}

impl Default for InvokeLimits {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_INVOKE_TIMEOUT,
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
        }
    }
}

/// Gateway that resolves the CLI lazily and runs one process per prompt
pub struct ProcessCliGateway {
    resolver: Arc<CommandResolver>,
    limits: InvokeLimits,
}

impl ProcessCliGateway {
    pub fn new(resolver: Arc<CommandResolver>) -> Self {
        Self {
            resolver,
            limits: InvokeLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: InvokeLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn resolver(&self) -> &Arc<CommandResolver> {
        &self.resolver
    }
}

#[async_trait]
impl CliGateway for ProcessCliGateway {
    async fn invoke(
        &self,
        prompt: &str,
        model: &str,
        cancel: &CancellationToken,
    ) -> Result<String, GatewayError> {
        let resolved = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(GatewayError::Cancelled),
            resolved = self.resolver.resolve() => resolved,
        };
        let command = resolved.map_err(|ResolveError::NotFound { tried }| {
            GatewayError::ToolNotFound { tried }
        })?;

        run_prompt(&command, prompt, model, self.limits, cancel).await
    }
}

enum ExchangeError {
    Io(io::Error),
    LimitExceeded,
}

/// Run `command` once with `prompt` on stdin and return its trimmed stdout.
pub async fn run_prompt(
    command: &ResolvedCommand,
    prompt: &str,
    model: &str,
    limits: InvokeLimits,
    cancel: &CancellationToken,
) -> Result<String, GatewayError> {
    let command_line = command.display(model);
    debug!("Invoking {} ({} prompt bytes)", command_line, prompt.len());

    let mut cmd = guarded_command(command.program());
    cmd.args(command.invoke_command_args(model))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(|e| GatewayError::SpawnFailed {
        command: command_line.clone(),
        message: e.to_string(),
    })?;

    let (Some(stdin), Some(stdout), Some(stderr)) =
        (child.stdin.take(), child.stdout.take(), child.stderr.take())
    else {
        let _ = child.start_kill();
        return Err(GatewayError::Io {
            command: command_line,
            message: "child stdio was not captured".to_string(),
        });
    };

    let exchange = async {
        let ((), out, err) = tokio::try_join!(
            write_prompt(stdin, prompt),
            read_capped(stdout, limits.max_output_bytes),
            read_capped(stderr, limits.max_output_bytes),
        )?;
        let status = child.wait().await.map_err(ExchangeError::Io)?;
        Ok::<_, ExchangeError>((status, out, err))
    };

    let outcome = tokio::select! {
        _ = cancel.cancelled() => Err(GatewayError::Cancelled),
        result = tokio::time::timeout(limits.timeout, exchange) => match result {
            Err(_) => Err(GatewayError::Timeout {
                command: command_line.clone(),
                timeout: limits.timeout,
            }),
            Ok(Err(ExchangeError::LimitExceeded)) => Err(GatewayError::OutputLimitExceeded {
                command: command_line.clone(),
                limit: limits.max_output_bytes,
            }),
            Ok(Err(ExchangeError::Io(e))) => Err(GatewayError::Io {
                command: command_line.clone(),
                message: e.to_string(),
            }),
            Ok(Ok(captured)) => Ok(captured),
        },
    };

    let (status, out, err) = match outcome {
        Ok(captured) => captured,
        Err(e) => {
            let _ = child.start_kill();
            debug!("Invocation of {} aborted: {}", command_line, e);
            return Err(e);
        }
    };

    finish(&command_line, status, &out, &err)
}

fn finish(
    command_line: &str,
    status: ExitStatus,
    stdout: &[u8],
    stderr: &[u8],
) -> Result<String, GatewayError> {
    let stderr = String::from_utf8_lossy(stderr).trim().to_string();

    if !status.success() {
        return Err(GatewayError::NonZeroExit {
            command: command_line.to_string(),
            status: status.to_string(),
            stderr,
        });
    }

    if !stderr.is_empty() {
        warn!("{} wrote to stderr: {}", command_line, stderr);
    }

    Ok(String::from_utf8_lossy(stdout).trim().to_string())
}

async fn write_prompt(mut stdin: ChildStdin, prompt: &str) -> Result<(), ExchangeError> {
    let written = match stdin.write_all(prompt.as_bytes()).await {
        Ok(()) => stdin.shutdown().await,
        Err(e) => Err(e),
    };
    match written {
        // The child may exit without reading all of its input.
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other.map_err(ExchangeError::Io),
    }
}

async fn read_capped<R>(reader: R, limit: usize) -> Result<Vec<u8>, ExchangeError>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    reader
        .take((limit as u64).saturating_add(1))
        .read_to_end(&mut buf)
        .await
        .map_err(ExchangeError::Io)?;
    if buf.len() > limit {
        return Err(ExchangeError::LimitExceeded);
    }
    Ok(buf)
}
