// Configuration module entry point
// Loads layered configuration and exposes the shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

pub use state::AppState;
pub use types::{Config, SiteConfig};

use crate::site::ROOT_REDIRECT;

/// Default config file name (without extension)
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from specified file path (without extension)
    ///
    /// Sources, later ones winning: built-in defaults, the optional config file,
    /// `PORTAL_*` environment variables (`PORTAL_SERVER__PORT=9000`).
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.show_headers", false)?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.read_timeout", 30)?
            .set_default("http.server_name", "weekly-portal")?
            .set_default("http.enable_cors", false)?
            .set_default("http.max_body_size", 10_485_760)? // 10MB
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("PORTAL").separator("__"))
            .build()?;

        let cfg: Self = settings.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject settings that would leave the landing page unreachable
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        let landing_path = &self.site.landing_path;
        if !landing_path.starts_with('/') {
            return Err(config::ConfigError::Message(format!(
                "site.landing_path must start with '/': {landing_path:?}"
            )));
        }
        if ROOT_REDIRECT.applies_to(landing_path) {
            return Err(config::ConfigError::Message(format!(
                "site.landing_path {landing_path:?} is shadowed by the redirect to {}",
                ROOT_REDIRECT.destination_path
            )));
        }
        Ok(())
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let cfg = Config::load_from("definitely/not/a/config/file").unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.http.max_body_size, 10_485_760);
        assert_eq!(cfg.site.landing_path, "/landing");
        assert!(cfg.site.static_root.is_none());
        assert!(cfg.routes.health.enabled);
        assert_eq!(cfg.logging.access_log_format, "combined");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = std::env::temp_dir().join(format!("weekly-portal-cfg-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let file = dir.join("portal.toml");
        std::fs::write(
            &file,
            "[server]\nport = 9001\n\n[site]\nlanding_path = \"/home\"\nstatic_root = \"public\"\n",
        )
        .unwrap();

        let base = dir.join("portal");
        let cfg = Config::load_from(base.to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.port, 9001);
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.site.landing_path, "/home");
        assert_eq!(cfg.site.static_root.as_deref(), Some("public"));
        assert_eq!(cfg.site.title, "Welcome to the Frontend");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_landing_path_validation() {
        assert!(Config::default().validate().is_ok());

        let mut shadowed = Config::default();
        shadowed.site.landing_path = "/".to_string();
        let err = shadowed.validate().unwrap_err().to_string();
        assert!(err.contains("shadowed"));

        let mut relative = Config::default();
        relative.site.landing_path = "landing".to_string();
        assert!(relative.validate().is_err());
    }

    #[test]
    fn test_load_rejects_root_landing_path() {
        let dir = std::env::temp_dir().join(format!("weekly-portal-root-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("portal.toml"), "[site]\nlanding_path = \"/\"\n").unwrap();

        let base = dir.join("portal");
        assert!(Config::load_from(base.to_str().unwrap()).is_err());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_socket_addr() {
        let cfg = Config::default();
        assert_eq!(
            cfg.get_socket_addr().unwrap(),
            "127.0.0.1:8080".parse::<SocketAddr>().unwrap()
        );

        let mut bad = Config::default();
        bad.server.host = "not a host".to_string();
        assert!(bad.get_socket_addr().is_err());
    }
}
