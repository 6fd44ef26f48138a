//! devcal CLI entry point.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufRead, BufReader};

use devcal_backend::MemoryBackend;
use devcal_bridge::{BridgeConfig, MethodHandler, StaticPermissionHost};
use devcal_cli::cli::{Cli, Command, ConfigAction, PromptAnswer};
use devcal_cli::commands::{config, replay};
use devcal_cli::error::CliResult;
use devcal_core::{TracingConfig, init_tracing};
use devcal_protocol::{MethodCall, PermissionStatus};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let tracing = if cli.debug {
        TracingConfig::debug()
    } else {
        TracingConfig::default()
    };
    if let Err(e) = init_tracing(&tracing.with_format(cli.log_format)) {
        eprintln!("error: {e}");
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let config = config::effective(&cli)?;

    match cli.command {
        Some(Command::Methods) => {
            for name in MethodCall::METHODS {
                println!("{name}");
            }
            Ok(())
        }
        Some(Command::Config { action }) => match action {
            ConfigAction::Dump => config::dump(&config),
            ConfigAction::Validate => config::validate(&config),
        },
        Some(Command::Replay { input }) => {
            let host = permission_host(cli.undeclared, cli.permission.into());
            replay_from(&config, host, cli.prompt_answer, input).await
        }
        None => {
            let host = permission_host(cli.undeclared, cli.permission.into());
            replay_from(&config, host, cli.prompt_answer, None).await
        }
    }
}

fn permission_host(undeclared: bool, status: PermissionStatus) -> Arc<StaticPermissionHost> {
    let host = if undeclared {
        StaticPermissionHost::undeclared()
    } else {
        StaticPermissionHost::new(status)
    };
    Arc::new(host)
}

async fn replay_from(
    config: &BridgeConfig,
    host: Arc<StaticPermissionHost>,
    answer: PromptAnswer,
    input: Option<PathBuf>,
) -> CliResult<()> {
    let backend = Arc::new(MemoryBackend::new(config.profile.clone()));
    let handler = MethodHandler::from_config(config, backend, host.clone())?;

    let reader: Box<dyn AsyncBufRead + Unpin + Send> = match input {
        Some(path) => Box::new(BufReader::new(tokio::fs::File::open(path).await?)),
        None => Box::new(BufReader::new(tokio::io::stdin())),
    };
    let summary = replay::replay(&handler, &host, answer, reader, tokio::io::stdout()).await?;

    if summary.failures > 0 {
        tracing::warn!(
            failures = summary.failures,
            calls = summary.calls,
            "some calls failed"
        );
    }
    Ok(())
}
