//! Command line arguments and configuration file handling

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::error::{ExplorerError, Result};

#[derive(Parser, Debug, Default)]
#[command(name = "kaspa-testnet-explorer")]
#[command(about = "Kaspa Testnet Block Explorer - Standalone", long_about = None)]
pub struct Args {
    /// Path to configuration file (optional, uses defaults if not provided)
    #[arg(short, long)]
    pub config_path: Option<PathBuf>,

    /// Kaspad RPC server URL
    #[arg(short, long)]
    pub kaspad_url: Option<String>,

    /// Port to run the explorer on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Address to bind the HTTP server to
    #[arg(long)]
    pub bind: Option<String>,

    /// Network name reported by /api/info
    #[arg(short, long)]
    pub network: Option<String>,

    /// Seconds between snapshot refreshes
    #[arg(long)]
    pub refresh_interval_secs: Option<u64>,

    /// Timeout for a single node RPC call, in seconds
    #[arg(long)]
    pub rpc_timeout_secs: Option<u64>,

    /// How long address balances are cached, in seconds (0 disables)
    #[arg(long)]
    pub balance_cache_ttl_secs: Option<u64>,

    /// Number of recent blocks kept in each snapshot
    #[arg(long)]
    pub block_limit: Option<usize>,

    /// Directory with the static frontend
    #[arg(long)]
    pub static_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

pub fn parse_args() -> Args {
    Args::parse()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub node: NodeConfig,
    pub server: ServerConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub kaspad_url: String,
    pub network: String,
    pub rpc_timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    pub static_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub refresh_interval_secs: u64,
    pub block_limit: usize,
    pub mempool_retain: usize,
    pub balance_cache_ttl_secs: u64,
    pub balance_cache_capacity: u64,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            kaspad_url: "127.0.0.1:16110".to_string(),
            network: "testnet-12".to_string(),
            rpc_timeout_secs: 10,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 3000,
            static_dir: PathBuf::from("static"),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 10,
            block_limit: 20,
            mempool_retain: 500,
            balance_cache_ttl_secs: 5,
            balance_cache_capacity: 10_000,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            node: NodeConfig::default(),
            server: ServerConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file if it exists, otherwise use defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::warn!("Config file {} not found, using defaults", path.display());
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| ExplorerError::Config(format!("failed to parse {}: {}", path.display(), e)))
    }

    /// Override config with CLI arguments
    pub fn apply_cli_overrides(&mut self, args: &Args) {
        if let Some(url) = &args.kaspad_url {
            self.node.kaspad_url = url.clone();
        }
        if let Some(network) = &args.network {
            self.node.network = network.clone();
        }
        if let Some(secs) = args.rpc_timeout_secs {
            self.node.rpc_timeout_secs = secs;
        }
        if let Some(port) = args.port {
            self.server.port = port;
        }
        if let Some(bind) = &args.bind {
            self.server.bind = bind.clone();
        }
        if let Some(dir) = &args.static_dir {
            self.server.static_dir = dir.clone();
        }
        if let Some(secs) = args.refresh_interval_secs {
            self.cache.refresh_interval_secs = secs;
        }
        if let Some(secs) = args.balance_cache_ttl_secs {
            self.cache.balance_cache_ttl_secs = secs;
        }
        if let Some(limit) = args.block_limit {
            self.cache.block_limit = limit;
        }
    }

    pub fn from_args(args: &Args) -> Result<Self> {
        let mut config = match &args.config_path {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        config.apply_cli_overrides(args);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.node.kaspad_url.trim().is_empty() {
            return Err(ExplorerError::Config("kaspad_url must not be empty".into()));
        }
        if self.node.rpc_timeout_secs == 0 {
            return Err(ExplorerError::Config("rpc_timeout_secs must be positive".into()));
        }
        if self.cache.refresh_interval_secs == 0 {
            return Err(ExplorerError::Config("refresh_interval_secs must be positive".into()));
        }
        if !(1..=1000).contains(&self.cache.block_limit) {
            return Err(ExplorerError::Config("block_limit must be between 1 and 1000".into()));
        }
        Ok(())
    }

    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.node.rpc_timeout_secs)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.cache.refresh_interval_secs)
    }

    pub fn balance_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.balance_cache_ttl_secs)
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.bind, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_match_documented_flags() {
        let config = Config::default();
        assert_eq!(config.node.kaspad_url, "127.0.0.1:16110");
        assert_eq!(config.server.port, 3000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn cli_flags_parse() {
        let args = Args::try_parse_from(["kaspa-testnet-explorer", "--kaspad-url", "10.0.0.5:16210", "-p", "8080"]).unwrap();
        assert_eq!(args.kaspad_url.as_deref(), Some("10.0.0.5:16210"));
        assert_eq!(args.port, Some(8080));
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[node]\nkaspad_url = \"node.local:16110\"\n\n[cache]\nblock_limit = 50").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.node.kaspad_url, "node.local:16110");
        assert_eq!(config.node.rpc_timeout_secs, 10);
        assert_eq!(config.cache.block_limit, 50);
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn cli_overrides_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nport = 4000").unwrap();
        let args = Args {
            config_path: Some(file.path().to_path_buf()),
            port: Some(5000),
            refresh_interval_secs: Some(2),
            ..Args::default()
        };

        let config = Config::from_args(&args).unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.refresh_interval(), Duration::from_secs(2));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = Config::load(Path::new("/definitely/not/here.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn unparsable_file_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nport = \"not a number\"").unwrap();
        assert!(matches!(Config::load(file.path()), Err(ExplorerError::Config(_))));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut config = Config::default();
        config.cache.refresh_interval_secs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.cache.block_limit = 0;
        assert!(config.validate().is_err());
    }
}
