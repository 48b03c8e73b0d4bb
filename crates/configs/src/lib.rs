use std::path::PathBuf;

use anyhow::{anyhow, Result};
use serde::Deserialize;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_WORKER_THREADS: usize = 4;
const DATA_FILE_NAME: &str = "data.json";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port(), worker_threads: Some(DEFAULT_WORKER_THREADS) }
    }
}

/// Where the JSON document lives on disk.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct StorageConfig {
    /// Explicit file path; wins over `mount_path`.
    #[serde(default)]
    pub data_file: Option<PathBuf>,
    /// Mounted volume directory; the file is `<mount_path>/data.json`.
    #[serde(default)]
    pub mount_path: Option<PathBuf>,
}

fn default_host() -> String { DEFAULT_HOST.to_string() }
fn default_port() -> u16 { DEFAULT_PORT }

/// Load `CONFIG_PATH` (default `config.toml`). A missing file yields defaults.
pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    // 配置文件可选：不存在时使用默认值，其余读取错误照常返回
    if !std::path::Path::new(&path).exists() {
        return Ok(AppConfig::default());
    }
    load_from_file(&path).map_err(|e| anyhow!("cannot load {path}: {e}"))
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// File config, then process environment, then normalisation.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.apply_env(|key| std::env::var(key).ok());
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Overlay environment variables read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("SERVER_HOST") {
            self.server.host = host;
        }
        // PORT is what container platforms inject; SERVER_PORT is the explicit override.
        for key in ["PORT", "SERVER_PORT"] {
            if let Some(port) = lookup(key).and_then(|p| p.trim().parse::<u16>().ok()) {
                self.server.port = port;
            }
        }
        if let Some(w) = lookup("TOKIO_WORKER_THREADS").and_then(|v| v.trim().parse::<usize>().ok()) {
            self.server.worker_threads = Some(w);
        }
        if let Some(mount) = lookup("RAILWAY_VOLUME_MOUNT_PATH").filter(|v| !v.trim().is_empty()) {
            self.storage.mount_path = Some(PathBuf::from(mount));
        }
        if let Some(file) = lookup("DATA_FILE").filter(|v| !v.trim().is_empty()) {
            self.storage.data_file = Some(PathBuf::from(file));
        }
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(DEFAULT_WORKER_THREADS),
            Some(_) => {}
        }
        Ok(())
    }
}

impl StorageConfig {
    /// Resolve the data file path: explicit file, else mount dir, else `./data.json`.
    pub fn resolve_data_file(&self) -> PathBuf {
        if let Some(file) = &self.data_file {
            return file.clone();
        }
        match &self.mount_path {
            Some(dir) => dir.join(DATA_FILE_NAME),
            None => PathBuf::from(".").join(DATA_FILE_NAME),
        }
    }
}
