use crate::types::LumiConfig;
use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const DEFAULT_PORT: u16 = 8001;
pub const DEFAULT_BIND: &str = "0.0.0.0";
pub const DEFAULT_WEB_DIR: &str = "web";
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_MAX_DEPTH: usize = 3;

/// Command whose JSON output lists the scheduled jobs.
pub fn default_cron_command() -> Vec<String> {
    ["openclaw", "cron", "list", "--json"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Fully resolved settings. Each value comes from, in order of priority:
/// ENV > local config > global config > default. CLI flags are applied on
/// top by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub port: u16,
    pub bind: String,
    pub web_dir: PathBuf,
    pub data_dir: PathBuf,
    pub snapshot_path: PathBuf,
    pub workspace_root: PathBuf,
    pub max_depth: usize,
    pub cron_command: Vec<String>,
}

impl Settings {
    /// Resolve from the process environment and the config files on disk.
    pub fn resolve() -> Self {
        Self::resolve_with(
            |key| std::env::var(key).ok(),
            config_layer(Some(local_config_path())),
            config_layer(global_config_path()),
        )
    }

    pub fn resolve_with(
        env: impl Fn(&str) -> Option<String>,
        local: Option<LumiConfig>,
        global: Option<LumiConfig>,
    ) -> Self {
        let layers: Vec<LumiConfig> = [local, global].into_iter().flatten().collect();
        let from_files = |pick: &dyn Fn(&LumiConfig) -> Option<String>| layers.iter().find_map(pick);

        let port = env_parsed(&env, "LUMI_PORT")
            .or_else(|| layers.iter().find_map(|c| c.port))
            .unwrap_or(DEFAULT_PORT);
        let bind = env("LUMI_BIND")
            .or_else(|| from_files(&|c| c.bind.clone()))
            .unwrap_or_else(|| DEFAULT_BIND.to_string());
        let web_dir = PathBuf::from(
            env("LUMI_WEB_DIR")
                .or_else(|| from_files(&|c| c.web_dir.clone()))
                .unwrap_or_else(|| DEFAULT_WEB_DIR.to_string()),
        );
        let data_dir = PathBuf::from(
            env("LUMI_DATA_DIR")
                .or_else(|| from_files(&|c| c.data_dir.clone()))
                .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string()),
        );
        let snapshot_path = env("LUMI_SNAPSHOT")
            .or_else(|| from_files(&|c| c.snapshot_path.clone()))
            .map(PathBuf::from)
            .unwrap_or_else(|| web_dir.join("data.js"));
        let workspace_root = env("LUMI_WORKSPACE")
            .or_else(|| from_files(&|c| c.workspace_root.clone()))
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
        let max_depth = env_parsed(&env, "LUMI_MAX_DEPTH")
            .or_else(|| layers.iter().find_map(|c| c.max_depth))
            .unwrap_or(DEFAULT_MAX_DEPTH);
        let cron_command = layers
            .iter()
            .find_map(|c| c.cron_command.clone())
            .unwrap_or_else(default_cron_command);

        Self {
            port,
            bind,
            web_dir,
            data_dir,
            snapshot_path,
            workspace_root,
            max_depth,
            cron_command,
        }
    }

    pub fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.bind, self.port)
            .parse()
            .with_context(|| format!("Invalid bind address '{}:{}'", self.bind, self.port))
    }
}

fn env_parsed<T: std::str::FromStr>(env: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = env(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(%key, value = %raw, "Ignoring unparseable environment override");
            None
        }
    }
}

pub fn local_config_path() -> PathBuf {
    PathBuf::from(".lumi").join("config.json")
}

pub fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("lumi").join("config.json"))
}

fn read_config(path: &Path) -> Result<LumiConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config: LumiConfig = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse config {}", path.display()))?;
    Ok(config)
}

/// One config file as a settings layer. A missing file is no layer; a file
/// that exists but cannot be loaded is logged and skipped.
pub fn config_layer(path: Option<PathBuf>) -> Option<LumiConfig> {
    let path = path.filter(|p| p.exists())?;
    match read_config(&path) {
        Ok(config) => Some(config),
        Err(e) => {
            warn!(path = %path.display(), error = %format!("{e:#}"), "Ignoring unreadable config file");
            None
        }
    }
}
