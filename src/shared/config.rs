use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub submissions: SubmissionConfig,
    pub sync: SyncConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
    pub evidence_dir: String,
    pub public_base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionConfig {
    pub max_evidence: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    pub auto_sync: bool,
    pub sync_on_reconnect: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 5,
            },
            storage: StorageConfig {
                data_dir: String::new(),
                evidence_dir: String::new(),
                public_base_url: String::new(),
            },
            submissions: SubmissionConfig { max_evidence: 10 },
            sync: SyncConfig {
                auto_sync: true,
                sync_on_reconnect: true,
            },
        }
        .with_data_dir(default_data_dir())
    }
}

impl AppConfig {
    /// Roots the database and evidence folder under `dir`.
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let evidence_dir = dir.join("uploads");
        self.database.url = format!("sqlite:{}?mode=rwc", dir.join("spsi.db").display());
        self.storage.data_dir = dir.display().to_string();
        self.storage.evidence_dir = evidence_dir.display().to_string();
        self.storage.public_base_url = format!("file://{}", evidence_dir.display());
        self
    }

    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        // Applied first so the specific overrides below still win.
        if let Ok(v) = std::env::var("SPSI_DATA_DIR") {
            if !v.trim().is_empty() {
                cfg = cfg.with_data_dir(v.trim());
            }
        }
        if let Ok(v) = std::env::var("SPSI_DATABASE_URL") {
            if !v.trim().is_empty() {
                cfg.database.url = v.trim().to_string();
            }
        }
        if let Some(value) = env_parsed::<u32>("SPSI_DB_MAX_CONNECTIONS") {
            cfg.database.max_connections = value;
        }
        if let Ok(v) = std::env::var("SPSI_EVIDENCE_DIR") {
            cfg.storage.evidence_dir = v;
        }
        if let Ok(v) = std::env::var("SPSI_PUBLIC_BASE_URL") {
            cfg.storage.public_base_url = v.trim_end_matches('/').to_string();
        }
        if let Some(value) = env_parsed::<usize>("SPSI_MAX_EVIDENCE") {
            cfg.submissions.max_evidence = value;
        }
        if let Ok(v) = std::env::var("SPSI_AUTO_SYNC") {
            cfg.sync.auto_sync = parse_bool(&v, cfg.sync.auto_sync);
        }
        if let Ok(v) = std::env::var("SPSI_SYNC_ON_RECONNECT") {
            cfg.sync.sync_on_reconnect = parse_bool(&v, cfg.sync.sync_on_reconnect);
        }

        cfg
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.database.url.trim().is_empty() {
            return Err("Database url must not be empty".to_string());
        }
        if self.database.max_connections == 0 {
            return Err("Database max_connections must be greater than 0".to_string());
        }
        if self.storage.data_dir.trim().is_empty() {
            return Err("Storage data_dir must not be empty".to_string());
        }
        if self.storage.evidence_dir.trim().is_empty() {
            return Err("Storage evidence_dir must not be empty".to_string());
        }
        if self.storage.public_base_url.trim().is_empty() {
            return Err("Storage public_base_url must not be empty".to_string());
        }
        if self.submissions.max_evidence == 0 {
            return Err("Submissions max_evidence must be greater than 0".to_string());
        }
        Ok(())
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("spsi-collect"))
        .unwrap_or_else(|| PathBuf::from("./data"))
}

fn env_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok()?.trim().parse::<T>().ok()
}

fn parse_bool(s: &str, default: bool) -> bool {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}
