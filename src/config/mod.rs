use serde::{Deserialize, Serialize};

use std::{env, fs, path::Path};

pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub database_dsn: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Origins allowed to call the API from a browser; empty means any.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

const fn default_port() -> u16 {
    DEFAULT_PORT
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn load_from_env() -> Result<Config, Box<dyn std::error::Error>> {
    let database_dsn =
        env::var("PG_DSN").map_err(|_| "PG_DSN environment variable is required")?;

    let port = match env::var("PORT") {
        Ok(port) => port
            .parse::<u16>()
            .map_err(|e| format!("Failed to parse PORT: {e}"))?,
        Err(_) => DEFAULT_PORT,
    };

    let cors_origins = env::var("CORS_ORIGINS")
        .map(|raw| parse_origins(&raw))
        .unwrap_or_default();

    Ok(Config {
        database_dsn,
        port,
        cors_origins,
    })
}

fn load_from_file(path: &str) -> Result<Config, Box<dyn std::error::Error>> {
    let contents = fs::read_to_string(path)?;
    serde_yaml::from_str(&contents).map_err(Into::into)
}

pub fn load_config() -> Result<Config, Box<dyn std::error::Error>> {
    // Retrieve env variable
    let config_path = env::var("NOTES_API_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());

    // Try env path
    if Path::new(&config_path).exists() {
        return load_from_file(&config_path);
    }

    // Fallback to config.yaml
    if Path::new("config.yaml").exists() {
        tracing::warn!(
            "Config file '{}' not found, falling back to 'config.yaml'",
            config_path
        );
        return load_from_file("config.yaml");
    }

    // Fallback to config.example.yaml
    if Path::new("config.example.yaml").exists() {
        tracing::warn!(
            "Config file '{}' and 'config.yaml' not found, falling back to 'config.example.yaml'\
             \n This file should not be used and should be replaced with actual data",
            config_path
        );
        return load_from_file("config.example.yaml");
    }

    // Fallback to environment variables
    tracing::info!(
        "No config file found, attempting to load configuration from environment variables"
    );
    load_from_env().map_err(|e| {
        format!(
            "Config file not found and environment variables are incomplete. \
             Tried: '{config_path}', 'config.yaml', 'config.example.yaml', and environment variables. \
             Error: {e}"
        )
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_fills_in_defaults() {
        let config: Config = serde_yaml::from_str("database_dsn: postgres://localhost/notes").unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(config.cors_origins.is_empty());
    }

    #[test]
    fn yaml_reads_every_field() {
        let config: Config = serde_yaml::from_str(
            "database_dsn: postgres://db/notes\nport: 9000\ncors_origins:\n  - http://localhost:3000\n",
        )
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.cors_origins, vec!["http://localhost:3000"]);
    }

    #[test]
    fn origins_are_split_and_trimmed() {
        assert_eq!(
            parse_origins(" http://a.test, ,http://b.test "),
            vec!["http://a.test", "http://b.test"]
        );
    }
}
