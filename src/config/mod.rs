// Configuration module entry point
// Loads startup configuration and derives the per-request serving config

mod types;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::error::StartupError;
use crate::handler::resolve::normalize;

pub use types::{Config, LoggingConfig, ServeConfig};

/// Base name of the optional configuration file (any format `config` understands)
const CONFIG_FILE: &str = "release-server";

/// Prefix for structured environment overrides, e.g. `RELEASES_SERVER__HOST`
const ENV_PREFIX: &str = "RELEASES";

impl Config {
    /// Load configuration from `release-server.*`, `RELEASES_*` variables and `PORT`
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(CONFIG_FILE, std::env::var("PORT").ok())
    }

    /// Load configuration from specified file path (without extension)
    ///
    /// `port_override` takes precedence over every other source.
    pub fn load_from(
        config_path: &str,
        port_override: Option<String>,
    ) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "transfer")?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_override_option("server.port", port_override)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, StartupError> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse()
            .map_err(|_| StartupError::InvalidAddress(addr))
    }

    /// Absolute, normalized directory to serve.
    ///
    /// Without an explicit `server.root` this is the directory holding the
    /// running executable.
    pub fn resolve_root(&self) -> Result<PathBuf, StartupError> {
        let root = match &self.server.root {
            Some(dir) => absolute(Path::new(dir))?,
            None => {
                let exe = std::env::current_exe().map_err(StartupError::Runtime)?;
                exe.parent()
                    .map(Path::to_path_buf)
                    .ok_or_else(|| StartupError::InvalidRoot(exe.display().to_string()))?
            }
        };

        let root = normalize(&root);
        if !root.is_dir() {
            return Err(StartupError::InvalidRoot(root.display().to_string()));
        }
        Ok(root)
    }

    pub fn serve_config(&self) -> Result<ServeConfig, StartupError> {
        let root = self.resolve_root()?;
        ServeConfig::new(root.clone(), &self.logging)
            .map_err(|_| StartupError::InvalidRoot(root.display().to_string()))
    }
}

fn absolute(path: &Path) -> Result<PathBuf, StartupError> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        let cwd = std::env::current_dir().map_err(StartupError::Runtime)?;
        Ok(cwd.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let cfg = Config::load_from("does-not-exist/release-server", None).unwrap();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 3000);
        assert!(cfg.server.root.is_none());
        assert!(cfg.logging.access_log);
        assert_eq!(cfg.logging.access_log_format, "transfer");
    }

    #[test]
    fn test_port_override_wins() {
        let cfg =
            Config::load_from("does-not-exist/release-server", Some("3001".to_string())).unwrap();
        assert_eq!(cfg.server.port, 3001);
    }

    #[test]
    fn test_invalid_port_override_is_rejected() {
        let result = Config::load_from("does-not-exist/release-server", Some("abc".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_file_source() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("release-server.toml");
        std::fs::write(
            &file,
            "[server]\nhost = \"127.0.0.1\"\nport = 8088\nroot = \"/srv/releases\"\n\n[logging]\naccess_log_format = \"json\"\n",
        )
        .unwrap();

        let base = dir.path().join("release-server");
        let cfg = Config::load_from(base.to_str().unwrap(), None).unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 8088);
        assert_eq!(cfg.server.root.as_deref(), Some("/srv/releases"));
        assert_eq!(cfg.logging.access_log_format, "json");
        assert!(cfg.logging.access_log);
    }

    #[test]
    fn test_socket_addr() {
        let mut cfg = Config::load_from("does-not-exist/release-server", None).unwrap();
        assert_eq!(cfg.socket_addr().unwrap().port(), 3000);

        cfg.server.host = "not an ip".to_string();
        assert!(matches!(
            cfg.socket_addr(),
            Err(StartupError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_resolve_root_explicit() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = Config::load_from("does-not-exist/release-server", None).unwrap();
        cfg.server.root = Some(format!("{}/./", dir.path().display()));

        let root = cfg.resolve_root().unwrap();
        assert_eq!(root, normalize(dir.path()));
    }

    #[test]
    fn test_resolve_root_rejects_files() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("app.apk");
        std::fs::write(&file, b"apk").unwrap();

        let mut cfg = Config::load_from("does-not-exist/release-server", None).unwrap();
        cfg.server.root = Some(file.display().to_string());
        assert!(matches!(cfg.resolve_root(), Err(StartupError::InvalidRoot(_))));
    }

    #[test]
    fn test_resolve_root_defaults_to_executable_dir() {
        let cfg = Config::load_from("does-not-exist/release-server", None).unwrap();
        let exe = std::env::current_exe().unwrap();
        assert_eq!(cfg.resolve_root().unwrap(), normalize(exe.parent().unwrap()));
    }
}
