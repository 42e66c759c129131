//! Controller configuration.
//!
//! Settings come from environment variables; the declared networks come from
//! a YAML (or JSON) file holding a list of network blocks:
//!
//! ```yaml
//! - name: private
//!   access_network: true
//! - port: 5f4b3e1c-8a0d-4c55-9a57-2f1f0d6c1b7e
//! ```

use crate::error::ControllerError;
use instance_networks::DeclaredNetwork;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Controller settings.
#[derive(Debug, Clone)]
pub struct Config {
    pub network_endpoint: String,
    pub compute_endpoint: String,
    pub token: String,
    pub instance_id: String,
    pub declared_networks_file: Option<PathBuf>,
    /// Deadline for a single reconcile attempt
    pub reconcile_timeout: Duration,
    /// Retry until every declared network has addresses
    pub wait_for_networks: bool,
    pub wait_max_attempts: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ControllerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ControllerError> {
        let required = |key: &str| {
            get(key).filter(|v| !v.is_empty()).ok_or_else(|| {
                ControllerError::InvalidConfig(format!("{} environment variable is required", key))
            })
        };

        let reconcile_timeout = match get("RECONCILE_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(parse_number(&raw, "RECONCILE_TIMEOUT_SECS")?),
            None => Duration::from_secs(60),
        };

        let wait_max_attempts = match get("WAIT_MAX_ATTEMPTS") {
            Some(raw) => parse_number(&raw, "WAIT_MAX_ATTEMPTS")?,
            None => 6,
        };
        if wait_max_attempts == 0 {
            return Err(ControllerError::InvalidConfig(
                "WAIT_MAX_ATTEMPTS must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            network_endpoint: required("OS_NETWORK_ENDPOINT")?,
            compute_endpoint: required("OS_COMPUTE_ENDPOINT")?,
            token: required("OS_AUTH_TOKEN")?,
            instance_id: required("INSTANCE_ID")?,
            declared_networks_file: get("DECLARED_NETWORKS_FILE")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            reconcile_timeout,
            wait_for_networks: get("WAIT_FOR_NETWORKS").is_some_and(|v| parse_bool(&v)),
            wait_max_attempts,
        })
    }
}

fn parse_number<T: std::str::FromStr>(raw: &str, key: &str) -> Result<T, ControllerError> {
    raw.trim()
        .parse()
        .map_err(|_| ControllerError::InvalidConfig(format!("{} must be a non-negative integer, got '{}'", key, raw)))
}

fn parse_bool(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

/// Parse and validate a list of declared networks.
pub fn parse_declared_networks(content: &str) -> Result<Vec<DeclaredNetwork>, ControllerError> {
    let networks: Vec<DeclaredNetwork> = serde_yaml::from_str(content)
        .map_err(|e| ControllerError::InvalidConfig(format!("malformed network list: {}", e)))?;

    for (index, network) in networks.iter().enumerate() {
        network
            .validate()
            .map_err(|e| ControllerError::InvalidConfig(format!("network #{}: {}", index, e)))?;
    }

    Ok(networks)
}

/// Read the declared networks file.
pub fn load_declared_networks(path: &Path) -> anyhow::Result<Vec<DeclaredNetwork>> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_declared_networks(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 4] = [
        ("OS_NETWORK_ENDPOINT", "http://neutron:9696"),
        ("OS_COMPUTE_ENDPOINT", "http://nova:8774/v2.1"),
        ("OS_AUTH_TOKEN", "secret"),
        ("INSTANCE_ID", "srv-1"),
    ];

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&REQUIRED)).expect("valid config");

        assert_eq!(config.instance_id, "srv-1");
        assert_eq!(config.declared_networks_file, None);
        assert_eq!(config.reconcile_timeout, Duration::from_secs(60));
        assert!(!config.wait_for_networks);
        assert_eq!(config.wait_max_attempts, 6);
    }

    #[test]
    fn test_overrides() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([
            ("DECLARED_NETWORKS_FILE", "/etc/networks.yaml"),
            ("RECONCILE_TIMEOUT_SECS", "15"),
            ("WAIT_FOR_NETWORKS", "True"),
            ("WAIT_MAX_ATTEMPTS", "3"),
        ]);
        let config = Config::from_lookup(lookup(&pairs)).expect("valid config");

        assert_eq!(config.declared_networks_file, Some(PathBuf::from("/etc/networks.yaml")));
        assert_eq!(config.reconcile_timeout, Duration::from_secs(15));
        assert!(config.wait_for_networks);
        assert_eq!(config.wait_max_attempts, 3);
    }

    #[test]
    fn test_missing_token_is_rejected() {
        let pairs: Vec<(&str, &str)> = REQUIRED.iter().copied().filter(|(k, _)| *k != "OS_AUTH_TOKEN").collect();
        let result = Config::from_lookup(lookup(&pairs));
        assert!(matches!(result, Err(ControllerError::InvalidConfig(ref m)) if m.contains("OS_AUTH_TOKEN")));
    }

    #[test]
    fn test_bad_number_is_rejected() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("RECONCILE_TIMEOUT_SECS", "soon"));
        assert!(Config::from_lookup(lookup(&pairs)).is_err());
    }

    #[test]
    fn test_parse_declared_networks() {
        let networks = parse_declared_networks(
            "- name: private\n  access_network: true\n- port: p-1\n  fixed_ip_v4: 10.0.0.4\n",
        )
        .expect("valid list");

        assert_eq!(networks.len(), 2);
        assert_eq!(networks[0].name, "private");
        assert!(networks[0].access_network);
        assert_eq!(networks[1].port, "p-1");
        assert_eq!(networks[1].fixed_ip_v4, "10.0.0.4");
    }

    #[test]
    fn test_parse_declared_networks_accepts_json() {
        let networks = parse_declared_networks(r#"[{"uuid": "u-1"}]"#).expect("valid list");
        assert_eq!(networks[0].uuid, "u-1");
    }

    #[test]
    fn test_parse_declared_networks_rejects_empty_block() {
        let result = parse_declared_networks("- name: private\n- fixed_ip_v4: 10.0.0.4\n");
        assert!(matches!(result, Err(ControllerError::InvalidConfig(ref m)) if m.contains("#1")));
    }
}
