use clap::Parser;
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/minter_tui.toml";
const DEFAULT_BASE_URL: &str = "https://peppermint-api.com/api";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub username: String,
    /// Where the persisted session lives between runs.
    pub state_path: String,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            username: String::new(),
            state_path: crate::session::default_state_path().to_string(),
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "minter_tui", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override API base URL (e.g. https://peppermint-api.com/api).
    #[arg(long)]
    base_url: Option<String>,
    /// Override username (password is never read from CLI).
    #[arg(long)]
    username: Option<String>,
    /// Override session state file path.
    #[arg(long)]
    state_path: Option<String>,
}

pub fn load() -> Result<AppConfig> {
    resolve(
        Args::parse(),
        config::Environment::with_prefix("MINTER_TUI"),
    )
}

/// Merge order: defaults, then file, then environment, then CLI flags.
fn resolve(args: Args, env: config::Environment) -> Result<AppConfig> {
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(env);
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(username) = args.username {
        settings.username = username;
    }
    if let Some(state_path) = args.state_path {
        settings.state_path = state_path;
    }

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_from(pairs: &[(&str, &str)]) -> config::Environment {
        let source: config::Map<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        config::Environment::with_prefix("MINTER_TUI").source(Some(source))
    }

    #[test]
    fn cli_flag_beats_env_beats_file_beats_default() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("minter_tui.toml");
        std::fs::write(
            &file,
            concat!(
                "base_url = \"https://file.example/api\"\n",
                "username = \"from-file\"\n",
                "log_level = \"debug\"\n",
            ),
        )
        .unwrap();

        let env = env_from(&[
            ("MINTER_TUI_BASE_URL", "https://env.example/api"),
            ("MINTER_TUI_USERNAME", "from-env"),
        ]);
        let args = Args::parse_from([
            "minter_tui",
            "--config",
            file.to_str().unwrap(),
            "--base-url",
            "https://flag.example/api",
        ]);

        let settings = resolve(args, env).unwrap();

        assert_eq!(settings.base_url, "https://flag.example/api");
        assert_eq!(settings.username, "from-env");
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.state_path, crate::session::default_state_path());
    }

    #[test]
    fn missing_file_and_empty_env_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        let args = Args::parse_from(["minter_tui", "--config", missing.to_str().unwrap()]);

        let settings = resolve(args, env_from(&[])).unwrap();

        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert!(settings.username.is_empty());
        assert_eq!(settings.log_level, "info");
    }
}
