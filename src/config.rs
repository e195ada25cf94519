use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://instagram-realtimeapi.p.rapidapi.com";
pub const DEFAULT_API_HOST: &str = "instagram-realtimeapi.p.rapidapi.com";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub host: String,
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            host: DEFAULT_API_HOST.to_string(),
            timeout_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(".socialscope/store.json"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatencyConfig {
    pub simulated_ms: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub fallback: FallbackConfig,
    pub latency: LatencyConfig,
}

impl AppConfig {
    pub fn load(path: Option<PathBuf>) -> Result<(Self, Option<PathBuf>), String> {
        let config_path = path.or_else(default_config_path);
        let mut config = if let Some(path) = config_path.as_ref() {
            if path.exists() {
                let contents = std::fs::read_to_string(path)
                    .map_err(|err| format!("failed to read config: {}", err))?;
                toml::from_str(&contents)
                    .map_err(|err| format!("failed to parse config: {}", err))?
            } else {
                AppConfig::default()
            }
        } else {
            AppConfig::default()
        };

        config.apply_env_overrides();
        Ok((config, config_path))
    }

    pub fn write(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|err| format!("failed to create config dir: {}", err))?;
            }
        }
        let payload = toml::to_string_pretty(self)
            .map_err(|err| format!("failed to serialize config: {}", err))?;
        std::fs::write(path, payload)
            .map_err(|err| format!("failed to write config: {}", err))?;
        Ok(())
    }

    pub fn simulated_latency(&self) -> Duration {
        Duration::from_millis(self.latency.simulated_ms)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(base) = env::var("SOCIALSCOPE_API_BASE") {
            if !base.trim().is_empty() {
                self.api.base_url = base;
            }
        }
        if let Ok(timeout) = env::var("SOCIALSCOPE_API_TIMEOUT_MS") {
            if let Ok(value) = timeout.parse::<u64>() {
                self.api.timeout_ms = value;
            }
        }
        if let Ok(path) = env::var("SOCIALSCOPE_STORE_PATH") {
            if !path.trim().is_empty() {
                self.storage.path = PathBuf::from(path);
            }
        }
        if let Ok(seed) = env::var("SOCIALSCOPE_FALLBACK_SEED") {
            if let Ok(value) = seed.parse::<u64>() {
                self.fallback.seed = Some(value);
            }
        }
        if let Ok(latency) = env::var("SOCIALSCOPE_SIMULATED_LATENCY_MS") {
            if let Ok(value) = latency.parse::<u64>() {
                self.latency.simulated_ms = value;
            }
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    env::var("SOCIALSCOPE_CONFIG_PATH")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| Some(PathBuf::from("config/socialscope.toml")))
}
