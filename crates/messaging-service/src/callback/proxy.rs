//! Process-wide proxy for outbound callback calls

use testbed_messaging_core::{MessagingError, Result};

use crate::config::ProxyConfig;

/// Immutable proxy settings built once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxySettings {
    scheme: String,
    host: String,
    port: u16,
    exclusions: Vec<String>,
}

impl ProxySettings {
    /// Build the settings from configuration; `None` when the proxy is disabled
    pub fn from_config(config: &ProxyConfig) -> Result<Option<Self>> {
        if !config.enabled {
            return Ok(None);
        }
        if config.host.trim().is_empty() {
            return Err(MessagingError::config("Proxy is enabled but no proxy host is set"));
        }

        Ok(Some(Self {
            scheme: config.scheme.trim().to_ascii_lowercase(),
            host: config.host.trim().to_string(),
            port: config.port,
            exclusions: config
                .exclusions
                .iter()
                .map(|pattern| pattern.trim().to_ascii_lowercase())
                .filter(|pattern| !pattern.is_empty())
                .collect(),
        }))
    }

    pub fn proxy_url(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.port)
    }

    /// Whether calls to `host` go through the proxy
    pub fn applies_to(&self, host: &str) -> bool {
        let host = host.to_ascii_lowercase();
        !self
            .exclusions
            .iter()
            .any(|pattern| host_matches(pattern, &host))
    }

    /// Proxy to install on the outbound HTTP client
    pub fn to_reqwest(&self) -> Result<reqwest::Proxy> {
        let proxy_url = url::Url::parse(&self.proxy_url())
            .map_err(|e| MessagingError::config(format!("Invalid proxy address {}: {}", self.proxy_url(), e)))?;
        let settings = self.clone();

        Ok(reqwest::Proxy::custom(move |target| match target.host_str() {
            Some(host) if settings.applies_to(host) => Some(proxy_url.clone()),
            _ => None,
        }))
    }
}

fn host_matches(pattern: &str, host: &str) -> bool {
    if pattern == "*" {
        return true;
    }
    match (pattern.strip_prefix('*'), pattern.strip_suffix('*')) {
        (Some(rest), Some(_)) => host.contains(rest.trim_end_matches('*')),
        (Some(suffix), None) => host.ends_with(suffix),
        (None, Some(prefix)) => host.starts_with(prefix),
        (None, None) => host == pattern,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled(exclusions: &[&str]) -> ProxyConfig {
        ProxyConfig {
            enabled: true,
            scheme: "HTTP".to_string(),
            host: "proxy.local".to_string(),
            port: 3128,
            exclusions: exclusions.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_disabled_proxy_yields_none() {
        assert_eq!(ProxySettings::from_config(&ProxyConfig::default()).unwrap(), None);
    }

    #[test]
    fn test_enabled_proxy_requires_host() {
        let mut config = enabled(&[]);
        config.host = " ".to_string();
        assert!(matches!(
            ProxySettings::from_config(&config),
            Err(MessagingError::Config(_))
        ));
    }

    #[test]
    fn test_proxy_url() {
        let settings = ProxySettings::from_config(&enabled(&[])).unwrap().unwrap();
        assert_eq!(settings.proxy_url(), "http://proxy.local:3128");
        assert!(settings.to_reqwest().is_ok());
    }

    #[test]
    fn test_exclusions() {
        let settings = ProxySettings::from_config(&enabled(&["localhost", "*.internal", "10.0.*", "*mid*"]))
            .unwrap()
            .unwrap();

        assert!(!settings.applies_to("LOCALHOST"));
        assert!(!settings.applies_to("testbed.internal"));
        assert!(!settings.applies_to("10.0.3.7"));
        assert!(!settings.applies_to("a-mid-host.example"));
        assert!(settings.applies_to("testbed.example.org"));
        assert!(settings.applies_to("localhost.example"));
    }

    #[test]
    fn test_wildcard_excludes_everything() {
        let settings = ProxySettings::from_config(&enabled(&["*"])).unwrap().unwrap();
        assert!(!settings.applies_to("anything"));
    }
}
