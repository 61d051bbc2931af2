//! Configuration for the messaging service
//!
//! Values are layered: built-in defaults, then an optional file, then
//! environment variables prefixed with `MESSAGING` (`__` separates sections,
//! e.g. `MESSAGING__PROXY__ENABLED=true`).

use std::path::Path;

use serde::{Deserialize, Serialize};
use testbed_messaging_core::{MessagingError, Result, ServiceIdentity};

/// Environment variable prefix
pub const ENV_PREFIX: &str = "MESSAGING";

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub service: ServiceIdentity,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub proxy: ProxyConfig,
    #[serde(default)]
    pub callback: CallbackConfig,
    #[serde(default)]
    pub logging: LogConfig,
}

/// Inbound HTTP endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
    /// Path under which all operations are published
    pub base_path: String,
}

/// Optional proxy for outbound callback calls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    pub enabled: bool,
    pub scheme: String,
    pub host: String,
    pub port: u16,
    /// Host patterns that bypass the proxy (`*` wildcard at either end)
    pub exclusions: Vec<String>,
}

/// Outbound callback calls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CallbackConfig {
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
    /// Source file and line on every event
    pub file_info: bool,
    /// Span enter/exit events
    pub spans: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            base_path: "/messaging".to_string(),
        }
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            scheme: "http".to_string(),
            host: String::new(),
            port: 8080,
            exclusions: Vec::new(),
        }
    }
}

impl Default for CallbackConfig {
    fn default() -> Self {
        Self { timeout_ms: 30_000 }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file_info: false,
            spans: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, an optional file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = config::Config::try_from(&AppConfig::default())
            .map_err(|e| MessagingError::config(format!("Invalid defaults: {}", e)))?;

        let mut builder = config::Config::builder().add_source(defaults);
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("proxy.exclusions"),
        );

        builder
            .build()
            .and_then(|settings| settings.try_deserialize::<AppConfig>())
            .map_err(|e| MessagingError::config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serial_test::serial;
    use std::io::Write;

    #[test]
    #[serial]
    fn test_defaults_without_file() {
        let config = AppConfig::load(None).unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(!config.proxy.enabled);
        assert_eq!(config.server.base_path, "/messaging");
    }

    #[test]
    #[serial]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[service]
id = "email-simulator"
version = "3.0"

[proxy]
enabled = true
host = "proxy.local"
port = 3128
exclusions = ["localhost", "*.internal"]
"#
        )
        .unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.service, ServiceIdentity::new("email-simulator", "3.0"));
        assert!(config.proxy.enabled);
        assert_eq!(config.proxy.host, "proxy.local");
        assert_eq!(config.proxy.port, 3128);
        assert_eq!(config.proxy.scheme, "http");
        assert_eq!(config.proxy.exclusions, vec!["localhost", "*.internal"]);
        assert_eq!(config.callback.timeout_ms, 30_000);
    }

    #[test]
    #[serial]
    fn test_file_without_proxy_section_keeps_proxy_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
base_path = "/sim"

[logging]
level = "debug"
"#
        )
        .unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.proxy, ProxyConfig::default());
        assert_eq!(config.server.base_path, "/sim");
        assert_eq!(config.server.bind_address, "0.0.0.0:8080");
        assert_eq!(config.logging.level, "debug");
        assert!(!config.logging.spans);
        assert_eq!(config.service, ServiceIdentity::default());
    }

    #[test]
    #[serial]
    fn test_partial_sections_fall_back_per_field() {
        let config: AppConfig = serde_json::from_str(
            r#"{ "service": { "id": "sms" }, "proxy": { "enabled": true, "host": "p" } }"#,
        )
        .unwrap();
        assert_eq!(config.service.id, "sms");
        assert_eq!(config.service.version, "1.0.0");
        assert_eq!(config.proxy.port, 8080);
        assert!(config.proxy.exclusions.is_empty());
    }

    #[test]
    #[serial]
    fn test_environment_overrides_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[service]
id = "from-file"
version = "1.0"

[callback]
timeout_ms = 500
"#
        )
        .unwrap();

        std::env::set_var("MESSAGING__SERVICE__VERSION", "9.9");
        std::env::set_var("MESSAGING__CALLBACK__TIMEOUT_MS", "1500");
        let config = AppConfig::load(Some(file.path()));
        std::env::remove_var("MESSAGING__SERVICE__VERSION");
        std::env::remove_var("MESSAGING__CALLBACK__TIMEOUT_MS");

        let config = config.unwrap();
        assert_eq!(config.service.id, "from-file");
        assert_eq!(config.service.version, "9.9");
        assert_eq!(config.callback.timeout_ms, 1500);
    }

    #[test]
    #[serial]
    fn test_missing_file_is_an_error() {
        let result = AppConfig::load(Some(Path::new("/nonexistent/messaging.toml")));
        assert!(matches!(result, Err(MessagingError::Config(_))));
    }
}
