// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::{self, in_cluster, token};
use anyhow::{bail, Context, Result};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Service configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    /// Name of the cluster entry in generated kubeconfigs
    pub cluster_name: String,
    /// API server URL written into kubeconfigs; derived from the in-cluster environment when unset
    pub cluster_server: Option<String>,
    pub cluster_ca_file: PathBuf,
    /// Reject namespaces that are not returned by the namespace listing
    pub strict_namespaces: bool,
    /// Namespaces nobody may request credentials for
    pub protected_namespaces: Vec<String>,
    pub create_service_accounts: bool,
    pub default_token_duration: i64,
    pub max_token_duration: i64,
    /// Upper bound for each call to the Kubernetes API
    pub api_timeout: Duration,
    pub static_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], constants::DEFAULT_PORT)),
            cluster_name: constants::DEFAULT_CLUSTER_NAME.to_string(),
            cluster_server: None,
            cluster_ca_file: PathBuf::from(in_cluster::CA_FILE),
            strict_namespaces: true,
            protected_namespaces: Vec::new(),
            create_service_accounts: true,
            default_token_duration: token::DEFAULT_DURATION_SECS,
            max_token_duration: token::MAX_DURATION_SECS,
            api_timeout: Duration::from_secs(constants::DEFAULT_API_TIMEOUT_SECS),
            static_dir: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let listen_addr = parse_var(&var, "LISTEN_ADDR", defaults.listen_addr)?;
        let cluster_name = var("CLUSTER_NAME").unwrap_or(defaults.cluster_name);
        let cluster_server = var("CLUSTER_SERVER");
        let cluster_ca_file = var("CLUSTER_CA_FILE")
            .map(PathBuf::from)
            .unwrap_or(defaults.cluster_ca_file);
        let strict_namespaces = parse_var(
            &var,
            "STRICT_NAMESPACE_VALIDATION",
            defaults.strict_namespaces,
        )?;
        let protected_namespaces = var("PROTECTED_NAMESPACES")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|ns| !ns.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();
        let create_service_accounts = parse_var(
            &var,
            "CREATE_SERVICE_ACCOUNTS",
            defaults.create_service_accounts,
        )?;
        let default_token_duration = parse_var(
            &var,
            "DEFAULT_TOKEN_DURATION",
            defaults.default_token_duration,
        )?;
        let max_token_duration =
            parse_var(&var, "MAX_TOKEN_DURATION", defaults.max_token_duration)?;
        let api_timeout_secs: u64 = parse_var(
            &var,
            "API_TIMEOUT_SECS",
            constants::DEFAULT_API_TIMEOUT_SECS,
        )?;
        let static_dir = var("STATIC_DIR").map(PathBuf::from);

        if max_token_duration < token::MIN_DURATION_SECS {
            bail!(
                "MAX_TOKEN_DURATION must be at least {} seconds",
                token::MIN_DURATION_SECS
            );
        }
        if !(token::MIN_DURATION_SECS..=max_token_duration).contains(&default_token_duration) {
            bail!(
                "DEFAULT_TOKEN_DURATION must be between {} and {} seconds",
                token::MIN_DURATION_SECS,
                max_token_duration
            );
        }
        if api_timeout_secs == 0 {
            bail!("API_TIMEOUT_SECS must be greater than zero");
        }

        Ok(Config {
            listen_addr,
            cluster_name,
            cluster_server,
            cluster_ca_file,
            strict_namespaces,
            protected_namespaces,
            create_service_accounts,
            default_token_duration,
            max_token_duration,
            api_timeout: Duration::from_secs(api_timeout_secs),
            static_dir,
        })
    }

    pub fn is_protected(&self, namespace: &str) -> bool {
        self.protected_namespaces.iter().any(|ns| ns == namespace)
    }
}

fn parse_var<T, F>(var: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value '{}'", key, value)),
        None => Ok(default),
    }
}
