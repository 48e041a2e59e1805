use std::{net::SocketAddr, path::Path, time::Duration};

use anyhow::Context;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub backup_dir: String,
    /// How often the scheduler checks whether an auto-backup is due.
    pub auto_backup_interval: Duration,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = std::env::var("PD_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8088".to_string())
            .parse()
            .context("Invalid PD_LISTEN_ADDR")?;
        let db_path = std::env::var("PD_DB_PATH").unwrap_or_else(|_| "./db/propdesk.db".into());
        let backup_dir = std::env::var("PD_BACKUP_DIR")
            .unwrap_or_else(|_| default_backup_dir(&db_path));
        let interval_secs: u64 = std::env::var("PD_AUTO_BACKUP_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(900);
        let cors_allow = std::env::var("PD_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = std::env::var("PD_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".into())
            .parse()
            .unwrap_or(30000);
        Ok(Self {
            listen_addr,
            db_path,
            backup_dir,
            auto_backup_interval: Duration::from_secs(interval_secs),
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
        })
    }

    /// Config rooted in `data_dir`, used by tests and embedded runs.
    pub fn for_data_dir(data_dir: &Path) -> Self {
        let db_path = data_dir.join("propdesk.db").to_string_lossy().to_string();
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            backup_dir: default_backup_dir(&db_path),
            db_path,
            auto_backup_interval: Duration::from_secs(900),
            cors_allow: vec!["*".to_string()],
            request_timeout: Duration::from_secs(30),
        }
    }
}

fn default_backup_dir(db_path: &str) -> String {
    Path::new(db_path)
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join("backups")
        .to_string_lossy()
        .to_string()
}
