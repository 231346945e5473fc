//! CLI entrypoint for cli-bridge
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow};
use bridge_application::{
    CompletionProgressNotifier, ConversationLogger, NoConversationLogger, NoProgress,
    RunCompletionInput, RunCompletionUseCase,
};
use bridge_domain::ErrorCategory;
use bridge_infrastructure::{
    CommandResolver, ConfigLoader, FileConfig, InvokeLimits, JsonlConversationLogger,
    ProcessCliGateway, ProcessProber, default_candidates,
};
use bridge_presentation::{Cli, ConsoleFormatter, OutputFormatter, ProgressReporter, read_request};
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v; logs go to stderr, stdout carries the JSON result
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(&cli)?;

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        println!("{}", config.to_toml().context("Failed to render configuration")?);
        return Ok(ExitCode::SUCCESS);
    }

    let formatter = ConsoleFormatter::new(cli.compact);

    // === Dependency Injection ===
    let candidates =
        default_candidates(&config.cli).context("Invalid CLI candidate configuration")?;
    let prober = Arc::new(ProcessProber::new(config.cli.probe_timeout()));
    let resolver = Arc::new(CommandResolver::new(candidates, prober));

    if cli.probe {
        return match resolver.resolve().await {
            Ok(command) => {
                println!(
                    "{}",
                    ConsoleFormatter::probe_line(command.label(), &command.display("<model>"))
                );
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => {
                println!(
                    "{}",
                    formatter.format_error(&e.to_string(), ErrorCategory::ToolNotFound)
                );
                Ok(ExitCode::FAILURE)
            }
        };
    }

    let request = read_request(&cli)?;

    let gateway = Arc::new(ProcessCliGateway::new(resolver).with_limits(InvokeLimits {
        timeout: config.cli.invoke_timeout(),
        max_output_bytes: config.cli.max_output_bytes,
    }));
    let use_case =
        RunCompletionUseCase::new(gateway).with_conversation_logger(conversation_logger(&cli, &config));

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling the running invocation");
            interrupt.cancel();
        }
    });

    let progress: Box<dyn CompletionProgressNotifier> = if cli.quiet {
        Box::new(NoProgress)
    } else {
        Box::new(ProgressReporter::new())
    };

    let input = RunCompletionInput::new(request).with_params(config.completion_params());
    match use_case
        .execute_with_progress(input, progress.as_ref(), &cancel)
        .await
    {
        Ok(output) => {
            info!("Completion accepted after {} attempt(s)", output.attempts);
            println!("{}", formatter.format_completion(&output.envelope));
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            println!("{}", formatter.format_error(&e.to_string(), e.category()));
            Ok(ExitCode::FAILURE)
        }
    }
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn conversation_logger(cli: &Cli, config: &FileConfig) -> Arc<dyn ConversationLogger> {
    let path = cli
        .log_conversation
        .as_ref()
        .or(config.logging.conversation_log.as_ref());

    let Some(path) = path else {
        return Arc::new(NoConversationLogger);
    };

    match JsonlConversationLogger::new(path) {
        Ok(logger) => {
            info!("Conversation log: {}", logger.path().display());
            Arc::new(logger)
        }
        Err(e) => {
            warn!("Could not open conversation log {}: {}", path.display(), e);
            Arc::new(NoConversationLogger)
        }
    }
}
