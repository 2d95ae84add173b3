//! Command-line interface definitions using clap derive macros.
//!
//! Contains the top-level [`Cli`] parser, the [`Commands`] enum for
//! subcommands (switch, init, validate), and their associated argument
//! structs. Every `switch` flag has an environment variable equivalent
//! for CI and cron deployments.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::api::{DEFAULT_API_URL, TOKEN_ENV_VAR};
use crate::config::DEFAULT_CONFIG_FILE;
use crate::switch::routing::parse_flag;
use crate::switch::FailurePolicy;

#[derive(Parser)]
#[command(
    name = "edge-switch",
    version,
    about = "Flip the west/east routing flag stored in CDN edge dictionaries",
    propagate_version = true,
    after_help = "\x1b[1mQuick start:\x1b[0m\n  \
        edge-switch init                     Create a starter config.json\n  \
        edge-switch switch --west true       Serve every service from west\n  \
        edge-switch switch                   Serve every service from east"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write the routing flag for every configured service
    Switch(Box<SwitchArgs>),

    /// Generate a starter services file
    Init(InitArgs),

    /// Validate a services file without contacting the API
    Validate(ValidateArgs),
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        edge-switch switch --west true                     Route to west\n  \
        edge-switch switch --west false                    Route to east\n  \
        edge-switch switch -c prod.json --keep-going       Report every failure\n\n  \
        The API token is read from FASTLY_API_TOKEN_ADMIN.")]
pub struct SwitchArgs {
    /// Serve content from west ("true") or east (anything else)
    #[arg(long, action = ArgAction::Set, default_value = "false", value_parser = west_flag)]
    pub west: bool,

    /// Services file path
    #[arg(short, long, env = "CONFIG_FILE", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// API token
    #[arg(long, env = TOKEN_ENV_VAR, hide_env_values = true, hide = true)]
    pub token: Option<String>,

    /// API base URL
    #[arg(long, env = "FASTLY_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Continue with the remaining services after a failure
    #[arg(long)]
    pub keep_going: bool,

    // -- Logging --
    /// Log level
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Force pretty (human-readable) log output
    #[arg(long)]
    pub pretty: bool,

    /// Force JSON log output (overrides TTY detection)
    #[arg(long, conflicts_with = "pretty")]
    pub json: bool,

    // -- Observability --
    /// Sentry DSN (enables error tracking)
    #[cfg(feature = "sentry-integration")]
    #[arg(long, env = "SENTRY_DSN", help_heading = "Observability")]
    pub sentry_dsn: Option<String>,

    /// Sentry environment tag
    #[cfg(feature = "sentry-integration")]
    #[arg(long, env = "SENTRY_ENVIRONMENT", help_heading = "Observability")]
    pub sentry_environment: Option<String>,

    // -- Tuning --
    /// Per-request timeout in seconds
    #[arg(
        long,
        env = "REQUEST_TIMEOUT_SECS",
        default_value_t = 10,
        help_heading = "Tuning"
    )]
    pub timeout: u64,

    /// Extra attempts for failed GET and PATCH requests
    #[arg(
        long,
        env = "REQUEST_RETRIES",
        default_value_t = 2,
        help_heading = "Tuning"
    )]
    pub retries: u32,
}

impl SwitchArgs {
    #[must_use]
    pub const fn failure_policy(&self) -> FailurePolicy {
        if self.keep_going {
            FailurePolicy::KeepGoing
        } else {
            FailurePolicy::FailFast
        }
    }
}

#[derive(Args)]
pub struct InitArgs {
    /// Output file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub output: PathBuf,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Services file to validate
    #[arg(default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: ValidateFormat,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Clone, Debug, ValueEnum)]
pub enum ValidateFormat {
    Text,
    Json,
}

// Unrecognised values select east rather than failing the parse.
fn west_flag(raw: &str) -> Result<bool, std::convert::Infallible> {
    Ok(parse_flag(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> SwitchArgs {
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Some(Commands::Switch(args)) => *args,
            _ => panic!("expected switch subcommand"),
        }
    }

    #[test]
    fn west_defaults_to_false() {
        let args = parse(&["edge-switch", "switch"]);
        assert!(!args.west);
        assert_eq!(args.failure_policy(), FailurePolicy::FailFast);
    }

    #[test]
    fn west_true_selects_west() {
        assert!(parse(&["edge-switch", "switch", "--west", "true"]).west);
        assert!(parse(&["edge-switch", "switch", "--west=true"]).west);
    }

    #[test]
    fn unrecognised_west_values_select_east() {
        assert!(!parse(&["edge-switch", "switch", "--west", "yes"]).west);
        assert!(!parse(&["edge-switch", "switch", "--west", "1"]).west);
    }

    #[test]
    fn keep_going_changes_the_policy() {
        let args = parse(&["edge-switch", "switch", "--keep-going"]);
        assert_eq!(args.failure_policy(), FailurePolicy::KeepGoing);
    }

    #[test]
    fn pretty_and_json_conflict() {
        assert!(Cli::try_parse_from(["edge-switch", "switch", "--pretty", "--json"]).is_err());
    }
}
