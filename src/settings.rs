use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TallyError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub data_dir: String,
    /// Root directory holding one statement folder per file-sourced account.
    #[serde(default)]
    pub accounts_dir: String,
}

impl Default for Settings {
    fn default() -> Self {
        let data_dir = default_data_dir();
        Self {
            accounts_dir: data_dir.join("accounts").to_string_lossy().to_string(),
            data_dir: data_dir.to_string_lossy().to_string(),
        }
    }
}

fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("TALLY_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("tally")
}

fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Documents")
        .join("tally")
}

pub fn load_settings() -> Settings {
    let path = settings_path();
    if path.exists() {
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        let mut settings: Settings = serde_json::from_str(&content).unwrap_or_default();
        if settings.accounts_dir.is_empty() {
            settings.accounts_dir = PathBuf::from(&settings.data_dir)
                .join("accounts")
                .to_string_lossy()
                .to_string();
        }
        settings
    } else {
        Settings::default()
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    let dir = config_dir();
    std::fs::create_dir_all(&dir)?;
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| TallyError::Settings(e.to_string()))?;
    std::fs::write(settings_path(), format!("{json}\n"))?;
    Ok(())
}

pub fn get_data_dir() -> PathBuf {
    PathBuf::from(&load_settings().data_dir)
}

pub fn get_accounts_dir() -> PathBuf {
    PathBuf::from(&load_settings().accounts_dir)
}

pub fn db_path() -> PathBuf {
    get_data_dir().join("tally.db")
}
