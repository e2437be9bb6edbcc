// Configuration module entry point
// Loads layered configuration and builds the per-process serve context

mod context;
mod types;

use std::net::SocketAddr;

pub use context::ServeContext;
pub use types::{Config, HttpConfig, LoggingConfig, PerformanceConfig, ServeConfig, ServerConfig};

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Default config file is "config.toml" when no path specified
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        Self::builder()?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("WWW")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize::<Self>()?
            .validate()
    }

    /// Load configuration from an in-memory TOML document layered over the defaults
    pub fn from_toml_str(document: &str) -> Result<Self, config::ConfigError> {
        Self::builder()?
            .add_source(config::File::from_str(document, config::FileFormat::Toml))
            .build()?
            .try_deserialize::<Self>()?
            .validate()
    }

    /// Reject values that deserialize fine but leave the server unable to serve
    fn validate(self) -> Result<Self, config::ConfigError> {
        if self.serve.read_buffer_size == 0 {
            return Err(config::ConfigError::Message(
                "serve.read_buffer_size must be greater than 0".to_string(),
            ));
        }
        Ok(self)
    }

    fn builder(
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
        config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("serve.root", "www")?
            .set_default("serve.index_file", "index.html")?
            .set_default("serve.read_buffer_size", 1024)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.show_headers", false)?
            .set_default("logging.access_log_format", "common")?
            .set_default("performance.read_timeout", 0)?
            .set_default("performance.write_timeout", 0)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
