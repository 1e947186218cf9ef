use crate::errors::{AppError, AppResult};
use crate::source::openf1::DEFAULT_BASE_URL;
use crate::utils::path::app_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

pub mod migrate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_cache_database")]
    pub cache_database: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default = "default_session")]
    pub default_session: String,
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,
}

fn default_cache_database() -> String {
    Config::cache_file().to_string_lossy().to_string()
}
fn default_api_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_output_dir() -> String {
    ".".to_string()
}
fn default_top_n() -> usize {
    5
}
fn default_session() -> String {
    "Q".to_string()
}
fn default_http_timeout() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_database: default_cache_database(),
            api_base_url: default_api_base_url(),
            output_dir: default_output_dir(),
            top_n: default_top_n(),
            default_session: default_session(),
            http_timeout_secs: default_http_timeout(),
        }
    }
}

impl Config {
    /// Return the configuration directory (~/.polegap)
    pub fn config_dir() -> PathBuf {
        app_dir()
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("polegap.conf")
    }

    /// Return the full path of the SQLite cache database
    pub fn cache_file() -> PathBuf {
        Self::config_dir().join("cache.sqlite")
    }

    /// Load configuration from file, or return defaults if not found.
    /// Fields missing from the file take their default value.
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        serde_yaml::from_str(&content).map_err(|e| {
            AppError::Config(format!("failed to parse {}: {}", path.display(), e))
        })
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        serde_yaml::to_string(self)
            .map_err(|e| AppError::Config(format!("failed to serialize configuration: {e}")))
    }

    pub fn save(&self) -> AppResult<()> {
        fs::create_dir_all(Self::config_dir())?;
        fs::write(Self::config_file(), self.to_yaml()?)?;
        Ok(())
    }

    /// Create the configuration directory and file. Returns the cache
    /// database path that should be initialized.
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> AppResult<PathBuf> {
        let dir = Self::config_dir();

        // DB path: user provided (relative names live in the config dir)
        let db_path = match custom_db {
            Some(name) => {
                let p = crate::utils::path::expand_tilde(&name);
                if p.is_absolute() { p } else { dir.join(p) }
            }
            None => Self::cache_file(),
        };

        if !is_test {
            let config = Config {
                cache_database: db_path.to_string_lossy().to_string(),
                ..Config::default()
            };
            config.save()?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        Ok(db_path)
    }
}
