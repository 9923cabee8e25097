// Configuration module entry point
// Loads layered configuration and owns the shared application state

mod state;
mod types;

use config::builder::{ConfigBuilder, DefaultState};
use std::net::{SocketAddr, ToSocketAddrs};

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, HttpConfig, LoggingConfig, PerformanceConfig, RoutesConfig, ServerConfig, StoreConfig,
};

/// Environment variable prefix, e.g. `STUDENTS_SERVER__PORT=9090`
const ENV_PREFIX: &str = "STUDENTS";

impl Config {
    /// Load configuration from `config.toml` in the working directory (optional),
    /// overlaid with `STUDENTS_*` environment variables
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from specified file path (without extension)
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let builder = Self::with_defaults(config::Config::builder())?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );
        Self::finish(builder)
    }

    /// Built-in defaults only: no config file, no environment
    pub fn defaults() -> Result<Self, config::ConfigError> {
        Self::finish(Self::with_defaults(config::Config::builder())?)
    }

    fn with_defaults(
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
        builder
            .set_default("server.host", "localhost")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.connection_timeout", 30)?
            .set_default("http.max_body_size", 1_048_576)? // 1MB
            .set_default("routes.prefix", "/users")?
            .set_default("store.seed_key", "Data")
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Self, config::ConfigError> {
        let cfg: Self = builder.build()?.try_deserialize()?;
        cfg.validate().map_err(config::ConfigError::Message)?;
        Ok(cfg)
    }

    /// Reject values that would leave the server unable to route requests
    pub fn validate(&self) -> Result<(), String> {
        if !self.routes.prefix.starts_with('/') {
            return Err(format!(
                "Invalid routes.prefix '{}': must start with '/'",
                self.routes.prefix
            ));
        }
        if self.performance.connection_timeout == 0 {
            return Err("performance.connection_timeout must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Resolve the listening address; `server.host` may be a hostname such as `localhost`
    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        (self.server.host.as_str(), self.server.port)
            .to_socket_addrs()
            .map_err(|e| format!("Invalid address {}:{}: {e}", self.server.host, self.server.port))?
            .next()
            .ok_or_else(|| {
                format!(
                    "Address {}:{} did not resolve to any socket address",
                    self.server.host, self.server.port
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::defaults().unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.routes.prefix, "/users");
        assert_eq!(cfg.store.seed_key, "Data");
        assert_eq!(cfg.http.max_body_size, 1_048_576);
        assert!(cfg.logging.access_log);
        assert_eq!(cfg.logging.access_log_format, "combined");
        assert!(cfg.server.workers.is_none());
    }

    #[test]
    fn test_resolve_localhost() {
        let cfg = Config::defaults().unwrap();
        let addr = cfg.get_socket_addr().unwrap();
        assert_eq!(addr.port(), 8080);
        assert!(addr.ip().is_loopback());
    }

    #[test]
    fn test_validate_rejects_relative_prefix() {
        let mut cfg = Config::defaults().unwrap();
        cfg.routes.prefix = "users".to_string();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut cfg = Config::defaults().unwrap();
        cfg.performance.connection_timeout = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = std::env::temp_dir().join(format!("student-registry-cfg-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "[routes]\nprefix = \"/pupils\"\n").unwrap();

        let cfg = Config::load_from(dir.join("config").to_str().unwrap()).unwrap();
        assert_eq!(cfg.routes.prefix, "/pupils");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_env_overrides_only_apply_to_load_from() {
        std::env::set_var("STUDENTS_STORE__SEED_KEY", "from-env");
        let layered = Config::load_from("does-not-exist/config");
        let defaults = Config::defaults();
        std::env::remove_var("STUDENTS_STORE__SEED_KEY");

        assert_eq!(layered.unwrap().store.seed_key, "from-env");
        assert_eq!(defaults.unwrap().store.seed_key, "Data");
    }

    #[test]
    fn test_load_from_rejects_invalid_file() {
        let dir = std::env::temp_dir().join(format!("student-registry-bad-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("config.toml"), "[performance]\nconnection_timeout = 0\n").unwrap();

        let result = Config::load_from(dir.join("config").to_str().unwrap());
        std::fs::remove_dir_all(&dir).unwrap();
        assert!(result.is_err());
    }
}
