use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// NASA API key. The public DEMO_KEY works but is heavily rate limited.
    #[serde(default = "default_api_key")]
    pub api_key: String,
    /// Ask the API for one random archive picture instead of today's.
    #[serde(default = "default_true")]
    pub random: bool,
    /// Prefer hdurl over url when the API provides one.
    #[serde(default = "default_true")]
    pub prefer_hd: bool,
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,
}

fn default_api_key() -> String {
    String::from("DEMO_KEY")
}

fn default_true() -> bool {
    true
}

fn default_download_dir() -> PathBuf {
    PathBuf::from("/tmp")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: default_api_key(),
            random: true,
            prefer_hd: true,
            download_dir: default_download_dir(),
        }
    }
}

pub fn config_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| String::from("."));

    Path::new(&home)
        .join(".config")
        .join("apodwall")
}

pub fn config_file_path() -> PathBuf {
    config_dir().join("config.json")
}

pub fn load_or_create_config() -> Config {
    let cfg_dir = config_dir();
    let _ = fs::create_dir_all(&cfg_dir);
    let cf = config_file_path();

    if cf.exists() {
        return load_config();
    }

    let cfg = Config::default();
    let _ = save_config(&cfg);
    cfg
}

pub fn load_config() -> Config {
    read_config(&config_file_path())
}

fn read_config(path: &Path) -> Config {
    if let Ok(mut f) = fs::File::open(path) {
        let mut s = String::new();

        if f.read_to_string(&mut s).is_ok() {
            if let Ok(cfg) = serde_json::from_str::<Config>(&s) {
                return cfg;
            }
        }
    }

    Config::default()
}

pub fn save_config(cfg: &Config) -> std::io::Result<()> {
    write_config(&config_file_path(), cfg)
}

fn write_config(path: &Path, cfg: &Config) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let data = serde_json::to_string_pretty(cfg).unwrap_or_else(|_| String::from("{}"));
    fs::write(path, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let cfg: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.api_key, "DEMO_KEY");
        assert!(cfg.random);
        assert!(cfg.prefer_hd);
        assert_eq!(cfg.download_dir, PathBuf::from("/tmp"));
    }

    #[test]
    fn partial_file_keeps_the_rest_default() {
        let cfg: Config = serde_json::from_str(r#"{"api_key":"abc123","random":false}"#).unwrap();
        assert_eq!(cfg.api_key, "abc123");
        assert!(!cfg.random);
        assert!(cfg.prefer_hd);
    }

    #[test]
    fn round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut cfg = Config::default();
        cfg.api_key = String::from("my-key");
        cfg.download_dir = PathBuf::from("/var/tmp");
        write_config(&path, &cfg).unwrap();

        let back = read_config(&path);
        assert_eq!(back.api_key, "my-key");
        assert_eq!(back.download_dir, PathBuf::from("/var/tmp"));
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let cfg = read_config(&path);
        assert_eq!(cfg.api_key, "DEMO_KEY");
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = read_config(&dir.path().join("nope.json"));
        assert!(cfg.random);
    }
}
