use serde::{Deserialize, Serialize};

use std::{env, fs, path::Path};

const ENV_PREFIX: &str = "NOTES_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    /// PostgreSQL DSN. Without one, notes are kept in memory.
    #[serde(default)]
    pub database_dsn: Option<String>,
    /// Serve the GraphiQL explorer on `GET /graphql`.
    #[serde(default = "default_graphiql")]
    pub graphiql: bool,
}

const fn default_port() -> u16 {
    8000
}

const fn default_graphiql() -> bool {
    true
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("config file not found and environment variables are invalid: {0}")]
    Env(#[from] envy::Error),
}

fn load_from_file(path: &Path) -> Result<Config, ConfigError> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&contents)?)
}

/// Reads `NOTES_PORT`, `NOTES_DATABASE_DSN` and `NOTES_GRAPHIQL`.
pub fn load_from_vars<I>(vars: I) -> Result<Config, ConfigError>
where
    I: IntoIterator<Item = (String, String)>,
{
    Ok(envy::prefixed(ENV_PREFIX).from_iter(vars)?)
}

pub fn load_config() -> Result<Config, ConfigError> {
    // Retrieve env variable
    let config_path =
        env::var("NOTES_SERVER_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());

    // Try env path
    if Path::new(&config_path).exists() {
        return load_from_file(Path::new(&config_path));
    }

    // Fallback to config.yaml
    if Path::new("config.yaml").exists() {
        tracing::warn!(
            "Config file '{}' not found, falling back to 'config.yaml'",
            config_path
        );
        return load_from_file(Path::new("config.yaml"));
    }

    // Fallback to config.example.yaml
    if Path::new("config.example.yaml").exists() {
        tracing::warn!(
            "Config file '{}' and 'config.yaml' not found, falling back to 'config.example.yaml'\
             \n This file should not be used and should be replaced with actual data",
            config_path
        );
        return load_from_file(Path::new("config.example.yaml"));
    }

    // Fallback to environment variables
    tracing::info!(
        "No config file found, attempting to load configuration from environment variables"
    );
    let config = load_from_vars(env::vars())?;
    tracing::info!("Successfully loaded configuration from environment variables");

    Ok(config)
}
