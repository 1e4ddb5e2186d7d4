//! Layered server configuration
//!
//! Built-in defaults, then the YAML file, then `ACTIVITY_SERVER__*`
//! environment variables (`__` separates nested keys).

use anyhow::Context;
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const ENV_PREFIX: &str = "ACTIVITY_SERVER__";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub activity_service: activity_service::config::Config,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8087".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    pub url: String,
    /// Keep at 1 for `sqlite::memory:`, every connection opens its own database
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directives, overridden by `RUST_LOG`
    pub filter: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

/// Load the configuration, `path` may not exist
pub fn load(path: &Path) -> anyhow::Result<AppConfig> {
    Figment::from(Serialized::defaults(AppConfig::default()))
        .merge(Yaml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .with_context(|| format!("invalid configuration (file: {})", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use activity_service::config::TimestampPolicy;
    use figment::Jail;

    #[test]
    fn test_defaults_without_file() {
        Jail::expect_with(|_jail| {
            let cfg = load(Path::new("missing.yaml")).map_err(|e| e.to_string())?;
            assert_eq!(cfg.server.bind_addr, "127.0.0.1:8087");
            assert_eq!(cfg.database.max_connections, 1);
            assert_eq!(cfg.activity_service.feedback_page_size, 20);
            Ok(())
        });
    }

    #[test]
    fn test_file_then_env_override() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "server.yaml",
                r#"
server:
  bind_addr: "0.0.0.0:9000"
activity_service:
  timestamp_policy: client
  seed:
    technologies: ["Rust"]
"#,
            )?;
            jail.set_env("ACTIVITY_SERVER__DATABASE__URL", "postgres://db/activity");
            jail.set_env("ACTIVITY_SERVER__LOGGING__JSON", "true");

            let cfg = load(Path::new("server.yaml")).map_err(|e| e.to_string())?;
            assert_eq!(cfg.server.bind_addr, "0.0.0.0:9000");
            assert_eq!(cfg.database.url, "postgres://db/activity");
            assert!(cfg.logging.json);
            assert_eq!(cfg.activity_service.timestamp_policy, TimestampPolicy::Client);
            assert_eq!(cfg.activity_service.seed.technologies, vec!["Rust"]);
            Ok(())
        });
    }

    #[test]
    fn test_unknown_module_key_is_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("server.yaml", "activity_service:\n  page_size: 5\n")?;
            assert!(load(Path::new("server.yaml")).is_err());
            Ok(())
        });
    }
}
