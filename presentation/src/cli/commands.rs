//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// Model used when neither the request nor `--model` names one
pub const DEFAULT_MODEL: &str = "sonnet";

/// CLI arguments for cli-bridge
#[derive(Parser, Debug)]
#[command(name = "cli-bridge")]
#[command(author, version, about = "Chat Completions front end for a command-line AI assistant")]
#[command(long_about = r#"
cli-bridge answers a chat completion request by running a locally installed
AI command-line tool and returning its reply as an OpenAI-style
`chat.completion` object.

The conversation is rendered into one prompt with a strict response-format
instruction. Replies that do not match the format are sent back to the tool
with the list of problems, up to the configured number of attempts.

Configuration files are loaded from (in priority order):
1. --config <path>                         Explicit config file
2. BRIDGE_* environment variables          e.g. BRIDGE_CLI__EXECUTABLE
3. ./cli-bridge.toml                       Project-level config
4. ~/.config/cli-bridge/config.toml        Global config

Example:
  cli-bridge "Summarise the borrow checker in one sentence"
  cli-bridge -m opus --system "Answer tersely" "What is a monad?"
  echo '{"model":"sonnet","messages":[{"role":"user","content":"Hi"}]}' | cli-bridge --request -
  cli-bridge --probe
"#)]
pub struct Cli {
    /// Prompt sent as a single user message
    pub prompt: Option<String>,

    /// Read a `{model, messages}` request from a JSON file (`-` for stdin)
    #[arg(long, value_name = "PATH", conflicts_with = "prompt")]
    pub request: Option<PathBuf>,

    /// Model identifier passed to the CLI tool
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// System message placed before the prompt
    #[arg(long, value_name = "TEXT", requires = "prompt")]
    pub system: Option<String>,

    /// Resolve the CLI tool, print the command that will be used and exit
    #[arg(long)]
    pub probe: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Print JSON on a single line
    #[arg(long)]
    pub compact: bool,

    /// Append conversation events to this JSONL file
    #[arg(long, value_name = "PATH")]
    pub log_conversation: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration sources and the effective configuration, then exit
    #[arg(long)]
    pub show_config: bool,
}
