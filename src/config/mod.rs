// Configuration module
// Author: kelexine (https://github.com/kelexine)

mod models;

pub use models::*;

use crate::error::{Result, TranslateError};
use config::{Config, Environment, File};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Flat environment variables understood by the service, mapped to their
/// configuration keys.
const FLAT_ENV_KEYS: &[(&str, &str)] = &[
    ("GEMINI_API_KEY", "gemini.api_key"),
    ("PROMPT_TEXT_TEMPLATE", "prompts.text_template"),
    ("PROMPT_IMAGE_TEMPLATE", "prompts.image_template"),
    ("AUTH_USER", "auth.user"),
    ("AUTH_PASS", "auth.pass"),
    ("PORT", "server.port"),
];

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Flat service variables (`GEMINI_API_KEY`, `PORT`, ...) (highest)
    /// 2. Prefixed environment variables (`DARIJA_SERVER__PORT`, ...)
    /// 3. Config file
    /// 4. Defaults (lowest)
    ///
    /// CLI flags are applied on top by the caller.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(config_path, std::env::vars().collect())
    }

    /// Same as [`AppConfig::load`] but reads variables from `env` instead of
    /// the process environment.
    pub fn load_with_env(config_path: Option<&Path>, env: HashMap<String, String>) -> Result<Self> {
        // An explicit path must exist, the default one is optional
        let file = match config_path {
            Some(path) => File::from(path.to_path_buf()).required(true),
            None => File::from(Self::default_config_path()).required(false),
        };

        let mut builder = Config::builder()
            .add_source(Config::try_from(&Self::default())?)
            .add_source(file)
            .add_source(
                Environment::with_prefix("DARIJA")
                    .prefix_separator("_")
                    .separator("__")
                    .source(Some(env.clone())),
            );

        for (var, key) in FLAT_ENV_KEYS {
            let value = env.get(*var).filter(|v| !v.trim().is_empty()).cloned();
            builder = builder.set_override_option(*key, value)?;
        }

        if let Some(node_env) = env.get("NODE_ENV") {
            let mode = if node_env.eq_ignore_ascii_case("development") {
                "development"
            } else {
                "production"
            };
            builder = builder.set_override("mode", mode)?;
        }

        let config: AppConfig = builder
            .build()
            .map_err(|e| TranslateError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| TranslateError::Config(e.to_string()))?;

        Ok(config.normalized())
    }

    /// Treat blank optional strings as unset.
    fn normalized(mut self) -> Self {
        fn blank_to_none(value: &mut Option<String>) {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                *value = None;
            }
        }

        blank_to_none(&mut self.prompts.text_template);
        blank_to_none(&mut self.prompts.image_template);
        blank_to_none(&mut self.auth.user);
        blank_to_none(&mut self.auth.pass);
        self
    }

    fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".darija-translate")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn missing_file() -> PathBuf {
        PathBuf::from("/nonexistent/darija-translate.toml")
    }

    #[test]
    fn test_defaults_without_sources() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.toml");
        std::fs::write(&path, "").unwrap();

        let config = AppConfig::load_with_env(Some(&path), HashMap::new()).unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.gemini.model, "gemini-2.5-flash");
        assert!(config.gemini.api_key.is_empty());
        assert!(config.auth.user.is_none());
        assert_eq!(config.mode, RunMode::Production);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let result = AppConfig::load_with_env(Some(&missing_file()), HashMap::new());
        assert!(result.is_err());
    }

    #[test]
    fn test_flat_env_variables() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.toml");
        std::fs::write(&path, "").unwrap();

        let config = AppConfig::load_with_env(
            Some(&path),
            env(&[
                ("GEMINI_API_KEY", "AIzaTestKey"),
                ("AUTH_USER", "admin"),
                ("AUTH_PASS", "secret"),
                ("PORT", "8081"),
                ("PROMPT_TEXT_TEMPLATE", "Translate: {TEXT}"),
                ("NODE_ENV", "development"),
            ]),
        )
        .unwrap();

        assert_eq!(config.gemini.api_key, "AIzaTestKey");
        assert_eq!(config.auth.user.as_deref(), Some("admin"));
        assert_eq!(config.auth.pass.as_deref(), Some("secret"));
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.prompts.text_template.as_deref(), Some("Translate: {TEXT}"));
        assert!(config.mode.is_development());
    }

    #[test]
    fn test_file_then_env_precedence() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[server]\nport = 7000\n\n[gemini]\nmodel = \"gemini-2.0-flash\"\n\n[auth]\nuser = \"from-file\""
        )
        .unwrap();

        let config = AppConfig::load_with_env(
            Some(file.path()),
            env(&[("AUTH_USER", "from-env"), ("DARIJA_GEMINI__MODEL", "gemini-pro")]),
        )
        .unwrap();

        assert_eq!(config.server.port, 7000);
        assert_eq!(config.gemini.model, "gemini-pro");
        assert_eq!(config.auth.user.as_deref(), Some("from-env"));
    }

    #[test]
    fn test_blank_values_are_unset() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[prompts]\ntext_template = \"   \"\n\n[auth]\npass = \"\"").unwrap();

        let config =
            AppConfig::load_with_env(Some(file.path()), env(&[("AUTH_USER", "  ")])).unwrap();
        assert!(config.prompts.text_template.is_none());
        assert!(config.auth.user.is_none());
        assert!(config.auth.pass.is_none());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let mut config = AppConfig::default();
        config.gemini.api_key = "AIzaSuperSecret".to_string();
        config.auth.pass = Some("hunter2".to_string());

        let printed = format!("{:?}", config);
        assert!(!printed.contains("AIzaSuperSecret"));
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("[REDACTED]"));
    }
}
