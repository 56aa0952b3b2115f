//! Configuration management for enquiry.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::export::PrintCommand;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Directory name under the platform config dir.
const APP_DIR_NAME: &str = "enquiry";

/// EmailJS REST send endpoint.
pub const EMAILJS_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `ENQUIRY_`, sections split on
///    `__`, e.g. `ENQUIRY_RELAY__TIMEOUT_MS`)
/// 2. TOML config file at `~/.config/enquiry/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Message relay configuration.
    pub relay: RelayConfig,
    /// Export configuration.
    pub export: ExportConfig,
}

/// Which relay delivers messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelayKind {
    /// Log the message and report success. Needs no account.
    #[default]
    Log,
    /// Deliver through EmailJS.
    #[serde(alias = "email_js")]
    EmailJs,
}

/// Relay-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Relay implementation.
    pub kind: RelayKind,
    /// Send endpoint (EmailJS only).
    pub endpoint: String,
    /// EmailJS service id.
    pub service_id: String,
    /// EmailJS template id.
    pub template_id: String,
    /// EmailJS public key.
    pub user_id: String,
    /// Upper bound on a single dispatch in milliseconds.
    /// Set to 0 to wait indefinitely.
    pub timeout_ms: u64,
}

/// Export-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory that receives exported files.
    /// Defaults to the current directory.
    pub output_dir: Option<PathBuf>,
    /// File name of the PDF export.
    pub pdf_file_name: String,
    /// File name of the printable HTML view.
    pub print_file_name: String,
    /// Command that opens the printable view, path appended as the last
    /// argument. Empty to only write the file.
    pub print_command: Vec<String>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            kind: RelayKind::Log,
            endpoint: EMAILJS_ENDPOINT.to_string(),
            service_id: String::new(),
            template_id: String::new(),
            user_id: String::new(),
            timeout_ms: 0,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            pdf_file_name: crate::export::PDF_FILE_NAME.to_string(),
            print_file_name: crate::export::PRINT_FILE_NAME.to_string(),
            print_command: crate::export::default_print_command(),
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing, or validation
    /// fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("ENQUIRY_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(APP_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.relay.kind == RelayKind::EmailJs {
            for (name, value) in [
                ("endpoint", &self.relay.endpoint),
                ("service_id", &self.relay.service_id),
                ("template_id", &self.relay.template_id),
                ("user_id", &self.relay.user_id),
            ] {
                if value.trim().is_empty() {
                    return Err(Error::ConfigValidation {
                        message: format!("relay.{name} is required for the emailjs relay"),
                    });
                }
            }
        }

        if self.export.pdf_file_name.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "export.pdf_file_name must not be empty".to_string(),
            });
        }

        if self.export.print_file_name.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "export.print_file_name must not be empty".to_string(),
            });
        }

        if let Some(program) = self.export.print_command.first() {
            if program.trim().is_empty() {
                return Err(Error::ConfigValidation {
                    message: "export.print_command must start with a program name".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Get the relay timeout, or `None` to wait indefinitely.
    #[must_use]
    pub fn relay_timeout(&self) -> Option<Duration> {
        if self.relay.timeout_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.relay.timeout_ms))
        }
    }

    /// Get the export directory, resolving defaults if not set.
    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        self.export
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Full path of the PDF export.
    #[must_use]
    pub fn pdf_path(&self) -> PathBuf {
        self.output_dir().join(&self.export.pdf_file_name)
    }

    /// Full path of the printable HTML view.
    #[must_use]
    pub fn print_path(&self) -> PathBuf {
        self.output_dir().join(&self.export.print_file_name)
    }

    /// The configured print command, or `None` when printing only writes
    /// the file.
    #[must_use]
    pub fn print_command(&self) -> Option<PrintCommand> {
        PrintCommand::from_argv(&self.export.print_command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.relay.kind, RelayKind::Log);
        assert_eq!(config.relay.endpoint, EMAILJS_ENDPOINT);
        assert_eq!(config.relay.timeout_ms, 0);
        assert!(config.export.output_dir.is_none());
        assert_eq!(config.export.pdf_file_name, "user_data.pdf");

        let command = config.print_command().unwrap();
        assert_eq!(command.program(), "lpr");
    }

    #[test]
    fn test_print_command_can_be_disabled() {
        let mut config = Config::default();
        config.export.print_command.clear();
        assert!(config.print_command().is_none());
        assert!(config.validate().is_ok());

        config.export.print_command = vec![" ".to_string()];
        assert!(matches!(
            config.validate().unwrap_err(),
            Error::ConfigValidation { .. }
        ));
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_emailjs_requires_ids() {
        let mut config = Config::default();
        config.relay.kind = RelayKind::EmailJs;
        config.relay.service_id = "svc".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("template_id"));

        config.relay.template_id = "tpl".to_string();
        config.relay.user_id = "usr".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_file_names() {
        let mut config = Config::default();
        config.export.pdf_file_name = "  ".to_string();
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("pdf_file_name"));

        let mut config = Config::default();
        config.export.print_file_name = String::new();
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("print_file_name"));
    }

    #[test]
    fn test_relay_timeout() {
        let mut config = Config::default();
        assert!(config.relay_timeout().is_none());

        config.relay.timeout_ms = 1500;
        assert_eq!(config.relay_timeout(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn test_export_paths() {
        let mut config = Config::default();
        assert_eq!(config.pdf_path(), PathBuf::from("./user_data.pdf"));

        config.export.output_dir = Some(PathBuf::from("/tmp/out"));
        assert_eq!(config.pdf_path(), PathBuf::from("/tmp/out/user_data.pdf"));
        assert_eq!(config.print_path(), PathBuf::from("/tmp/out/print_view.html"));
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("enquiry"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[relay]
kind = "emailjs"
service_id = "service_1"
template_id = "template_1"
user_id = "key_1"
timeout_ms = 3000

[export]
output_dir = "/var/tmp/enquiry"
print_command = ["lpr", "-P", "office"]
"#
        )
        .unwrap();

        let config = Config::load_from(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.relay.kind, RelayKind::EmailJs);
        assert_eq!(config.relay.service_id, "service_1");
        assert_eq!(config.relay_timeout(), Some(Duration::from_secs(3)));
        assert_eq!(config.output_dir(), PathBuf::from("/var/tmp/enquiry"));
        assert_eq!(config.export.pdf_file_name, "user_data.pdf");

        let command = config.print_command().unwrap();
        assert_eq!(command.program(), "lpr");
    }

    #[test]
    fn test_print_command_can_be_disabled_2() {
        let mut config = Config::default();
        config.export.print_command.clear();
        assert!(config.print_command().is_none());
        assert!(config.validate().is_ok());

        config.export.print_command = vec![" ".to_string()];
        assert!(matches!(
            config.validate().unwrap_err(),
            Error::ConfigValidation { .. }
        ));
    }

    #[test]
    fn test_load_rejects_incomplete_emailjs() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[relay]\nkind = \"emailjs\"").unwrap();

        let err = Config::load_from(Some(file.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, Error::ConfigValidation { .. }));
    }

    #[test]
    fn test_relay_kind_serialize() {
        let json = serde_json::to_string(&RelayKind::EmailJs).unwrap();
        assert_eq!(json, "\"emailjs\"");
        let kind: RelayKind = serde_json::from_str("\"log\"").unwrap();
        assert_eq!(kind, RelayKind::Log);
    }

    #[test]
    fn test_config_clone() {
        let config = Config::default();
        assert_eq!(config.clone(), config);
    }
}
