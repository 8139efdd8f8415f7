use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub token_name: Option<String>,
    pub token_value: Option<String>,
    pub allow_elevated: Option<bool>,
}

impl Settings {
    pub fn new(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut s = Config::builder();

        if let Some(path) = config_path {
            if Path::new(path).exists() {
                s = s.add_source(File::with_name(path));
            } else {
                // Explicitly requested file must exist.
                s = s.add_source(File::with_name(path).required(true));
            }
        } else {
            s = s.add_source(File::with_name("config").required(false));
        }

        // PROXMOX_HOST -> host, PROXMOX_TOKEN_NAME -> token_name, etc.
        s = s.add_source(Environment::with_prefix("PROXMOX"));

        s.build()?.try_deserialize()
    }

    /// Local sanity check only. A missing token *value* is deliberately not
    /// rejected here: the backend answers 401 and that message reaches the
    /// caller like any other API error.
    pub fn validate(&self) -> Result<(), String> {
        if self.host.as_deref().map_or(true, str::is_empty) {
            return Err("Host is required".to_string());
        }
        if self.user.as_deref().map_or(true, str::is_empty) {
            return Err("User is required".to_string());
        }
        if self.token_name.as_deref().map_or(true, str::is_empty) {
            return Err("Token name is required".to_string());
        }
        Ok(())
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(8006)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_load_from_file() {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "host = '1.2.3.4'\nport = 8007\nuser = 'api@pam'\ntoken_name = 'mcp'\ntoken_value = 'secret'\nallow_elevated = true"
        )
        .unwrap();

        let path = file.path().to_str().unwrap();
        let settings = Settings::new(Some(path)).unwrap();

        assert_eq!(settings.host, Some("1.2.3.4".to_string()));
        assert_eq!(settings.port(), 8007);
        assert_eq!(settings.user, Some("api@pam".to_string()));
        assert_eq!(settings.token_name, Some("mcp".to_string()));
        assert_eq!(settings.token_value, Some("secret".to_string()));
        assert_eq!(settings.allow_elevated, Some(true));
    }

    #[test]
    fn test_default_port() {
        let s = Settings::default();
        assert_eq!(s.port(), 8006);
    }

    #[test]
    fn test_validation_requires_host() {
        let s = Settings {
            host: None,
            user: Some("u@pam".into()),
            token_name: Some("t".into()),
            ..Default::default()
        };
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_validation_accepts_missing_token_value() {
        let s = Settings {
            host: Some("pve.local".into()),
            user: Some("u@pam".into()),
            token_name: Some("t".into()),
            token_value: None,
            ..Default::default()
        };
        assert!(s.validate().is_ok());
    }
}
