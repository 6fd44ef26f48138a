//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use devcal_core::LogFormat;
use devcal_protocol::PermissionStatus;

/// devcal - replay device-calendar method calls against an in-memory store
#[derive(Debug, Parser)]
#[command(name = "devcal")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "DEVCAL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    /// Log line format (pretty, compact or json)
    #[arg(long, default_value = "compact")]
    pub log_format: LogFormat,

    /// Backend profile preset (content_provider, event_store), overrides the config
    #[arg(long)]
    pub profile: Option<String>,

    /// Device timezone (IANA name), overrides the config
    #[arg(long, env = "DEVCAL_TIME_ZONE")]
    pub time_zone: Option<String>,

    /// Calendar permission state reported by the host
    #[arg(long, value_enum, default_value_t = Permission::Granted)]
    pub permission: Permission,

    /// How the permission prompt is answered
    #[arg(long, value_enum, default_value_t = PromptAnswer::Grant)]
    pub prompt_answer: PromptAnswer,

    /// Report calendar permissions as not declared by the app
    #[arg(long)]
    pub undeclared: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Replay JSON-lines calls from a file, or stdin when omitted
    Replay {
        /// Input file, one call per line
        input: Option<PathBuf>,
    },

    /// List the supported method names
    Methods,

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump the effective configuration as TOML
    Dump,

    /// Validate the configuration
    Validate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Permission {
    Granted,
    WriteOnly,
    Denied,
    Restricted,
    NotDetermined,
}

impl From<Permission> for PermissionStatus {
    fn from(permission: Permission) -> Self {
        match permission {
            Permission::Granted => Self::Granted,
            Permission::WriteOnly => Self::WriteOnly,
            Permission::Denied => Self::Denied,
            Permission::Restricted => Self::Restricted,
            Permission::NotDetermined => Self::NotDetermined,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PromptAnswer {
    Grant,
    Deny,
    /// Close the prompt without answering
    Dismiss,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let cli = Cli::parse_from(["devcal"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.log_format, LogFormat::Compact);
        assert_eq!(cli.permission, Permission::Granted);
        assert_eq!(cli.prompt_answer, PromptAnswer::Grant);
    }

    #[test]
    fn replay_with_overrides() {
        let cli = Cli::parse_from([
            "devcal",
            "--profile",
            "event_store",
            "--time-zone",
            "Asia/Kolkata",
            "--permission",
            "write-only",
            "--log-format",
            "json",
            "replay",
            "calls.jsonl",
        ]);
        assert_eq!(cli.profile.as_deref(), Some("event_store"));
        assert_eq!(cli.time_zone.as_deref(), Some("Asia/Kolkata"));
        assert_eq!(PermissionStatus::from(cli.permission), PermissionStatus::WriteOnly);
        assert_eq!(cli.log_format, LogFormat::Json);
        assert!(matches!(
            cli.command,
            Some(Command::Replay { input: Some(path) }) if path == PathBuf::from("calls.jsonl")
        ));
    }
}
