use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub listen: ListenConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub dbdir: Option<String>,
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
    #[serde(default = "default_movies_csv")]
    pub movies_csv: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: ListenConfig::default(),
            database: DatabaseConfig::default(),
            dbdir: None,
            static_dir: default_static_dir(),
            movies_csv: default_movies_csv(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListenConfig {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default = "default_port")]
    pub port: String,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            address: None,
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub sqlite: Option<SqliteConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SqliteConfig {
    pub filename: String,
}

fn default_port() -> String {
    "8000".to_string()
}

fn default_static_dir() -> String {
    "./static".to_string()
}

fn default_movies_csv() -> String {
    "data/ml-latest-small/movies.csv".to_string()
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_string(), e))?;

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(path.to_string(), e))?;

        Ok(config)
    }

    pub fn database_path(&self) -> String {
        if let Some(ref sqlite) = self.database.sqlite {
            return sqlite.filename.clone();
        }

        if let Some(ref dbdir) = self.dbdir {
            let path = PathBuf::from(dbdir).join("watchthis.db");
            return path.to_string_lossy().to_string();
        }

        "watchthis.db".to_string()
    }

    pub fn posters_dir(&self) -> PathBuf {
        PathBuf::from(&self.static_dir).join("posters")
    }

    /// Host:port this server is reachable at, used for poster URLs when a
    /// request carries no `Host` header. Wildcard bind addresses are not
    /// addressable, so they map to `localhost`.
    pub fn local_authority(&self) -> String {
        let host = match self.listen.address.as_deref() {
            None | Some("[::]") | Some("0.0.0.0") => "localhost",
            Some(addr) => addr,
        };
        format!("{}:{}", host, self.listen.port)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    ReadError(String, std::io::Error),
    #[error("Failed to parse config file {0}: {1}")]
    ParseError(String, serde_yaml::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.listen.port, "8000");
        assert_eq!(config.database_path(), "watchthis.db");
        assert_eq!(config.movies_csv, "data/ml-latest-small/movies.csv");
        assert_eq!(config.posters_dir(), PathBuf::from("./static/posters"));
    }

    #[test]
    fn test_sqlite_filename_wins_over_dbdir() {
        let config: Config = serde_yaml::from_str(
            "database:\n  sqlite:\n    filename: /tmp/movies.db\ndbdir: /var/db\n",
        )
        .unwrap();
        assert_eq!(config.database_path(), "/tmp/movies.db");
    }

    #[test]
    fn test_default_matches_empty_config() {
        let parsed: Config = serde_yaml::from_str("{}").unwrap();
        let default = Config::default();
        assert_eq!(default.listen.port, parsed.listen.port);
        assert_eq!(default.static_dir, parsed.static_dir);
        assert_eq!(default.movies_csv, parsed.movies_csv);
        assert_eq!(default.database_path(), parsed.database_path());
    }

    #[test]
    fn test_local_authority() {
        let mut config = Config::default();
        assert_eq!(config.local_authority(), "localhost:8000");

        config.listen.address = Some("[::]".to_string());
        assert_eq!(config.local_authority(), "localhost:8000");

        config.listen.address = Some("movies.internal".to_string());
        config.listen.port = "9000".to_string();
        assert_eq!(config.local_authority(), "movies.internal:9000");
    }

    #[test]
    fn test_dbdir_fallback() {
        let config: Config = serde_yaml::from_str("dbdir: /var/db\n").unwrap();
        assert_eq!(config.database_path(), "/var/db/watchthis.db");
    }
}
