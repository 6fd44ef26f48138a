//! Configuration commands.

use devcal_backend::BackendProfile;
use devcal_bridge::BridgeConfig;

use crate::cli::Cli;
use crate::error::{CliError, CliResult};

/// Loads the config file, if any, and applies command-line overrides.
pub fn effective(cli: &Cli) -> CliResult<BridgeConfig> {
    let mut config = match &cli.config {
        Some(path) => BridgeConfig::load_from(path)?,
        None => BridgeConfig::default(),
    };
    if let Some(name) = &cli.profile {
        config.profile =
            BackendProfile::preset(name).ok_or_else(|| CliError::UnknownProfile(name.clone()))?;
    }
    if let Some(tz) = &cli.time_zone {
        config.device_time_zone = Some(tz.clone());
    }
    Ok(config)
}

/// Prints the effective configuration.
pub fn dump(config: &BridgeConfig) -> CliResult<()> {
    let toml_str = toml::to_string_pretty(config)?;
    println!("{toml_str}");
    Ok(())
}

/// Checks that the configured timezone resolves.
pub fn validate(config: &BridgeConfig) -> CliResult<()> {
    let tz = config.time_zone()?;
    println!("Configuration is valid (profile {}, timezone {tz}).", config.profile.name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    #[test]
    fn overrides_apply_on_top_of_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "device_time_zone = \"Europe/Oslo\"").unwrap();
        let path = file.path().to_string_lossy().to_string();

        let cli = Cli::parse_from(["devcal", "--config", &path, "--profile", "ios"]);
        let config = effective(&cli).unwrap();
        assert_eq!(config.device_time_zone.as_deref(), Some("Europe/Oslo"));
        assert_eq!(config.profile, BackendProfile::event_store());
    }

    #[test]
    fn unknown_profile() {
        let cli = Cli::parse_from(["devcal", "--profile", "palm_os"]);
        assert!(matches!(effective(&cli), Err(CliError::UnknownProfile(_))));
    }

    #[test]
    fn dump_round_trips() {
        let config = BridgeConfig::new(BackendProfile::event_store()).with_device_time_zone("UTC");
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert_eq!(BridgeConfig::from_toml(&toml_str).unwrap(), config);
    }
}
