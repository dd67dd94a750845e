//! Application configuration.
//!
//! An explicit config object passed down to the components that need it
//! (the timer engine reads `default_description` for the empty-description
//! fallback), not process-wide mutable state.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

fn default_description() -> String {
    "Programming".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path of the SQLite database file.
    pub database: String,
    /// Label substituted when a session is started with an empty
    /// description and the project has no previous one to reuse.
    #[serde(default = "default_description")]
    pub default_description: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: Self::database_file().to_string_lossy().to_string(),
            default_description: default_description(),
        }
    }
}

impl Config {
    /// Standard configuration directory depending on the platform.
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("timekeep")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".timekeep")
        }
    }

    pub fn config_file() -> PathBuf {
        Self::config_dir().join("timekeep.conf")
    }

    pub fn database_file() -> PathBuf {
        Self::config_dir().join("timekeep.sqlite")
    }

    /// Load configuration from file, or return defaults if not found.
    pub fn load() -> Self {
        let path = Self::config_file();
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => serde_yaml::from_str(&content).unwrap_or_default(),
                Err(_) => Self::default(),
            }
        } else {
            Self::default()
        }
    }

    /// Initialize the configuration file and an (empty) database file.
    /// `is_test` skips writing the config file so test runs never touch
    /// the user's real configuration.
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> io::Result<Config> {
        let dir = Self::config_dir();
        if !is_test {
            fs::create_dir_all(&dir)?;
        }

        let db_path = match custom_db {
            Some(name) => {
                let p = PathBuf::from(&name);
                if p.is_absolute() { p } else { dir.join(p) }
            }
            None => Self::database_file(),
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            default_description: default_description(),
        };

        if !is_test {
            let yaml = serde_yaml::to_string(&config)
                .map_err(|e| io::Error::other(e.to_string()))?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_roundtrip() {
        let cfg = Config {
            database: "/tmp/tk.sqlite".into(),
            default_description: "Research".into(),
        };
        let yaml = serde_yaml::to_string(&cfg).unwrap();
        let back: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back.database, cfg.database);
        assert_eq!(back.default_description, "Research");
    }

    #[test]
    fn missing_default_description_falls_back() {
        let back: Config = serde_yaml::from_str("database: /tmp/tk.sqlite\n").unwrap();
        assert_eq!(back.default_description, "Programming");
    }
}
