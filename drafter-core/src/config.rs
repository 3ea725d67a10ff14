use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::DiagramKind;

/// Environment variables read by [`DrafterConfig::apply_env_overrides`].
pub const ENV_API_URL: &str = "DRAFTER_LLM_API_URL";
pub const ENV_API_KEY: &str = "DRAFTER_LLM_API_KEY";
pub const ENV_MODEL: &str = "DRAFTER_LLM_MODEL";
pub const ENV_TIMEOUT_SECS: &str = "DRAFTER_LLM_TIMEOUT_SECS";

/// Top-level Drafter configuration, matching `drafter.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DrafterConfig {
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub generate: GenerateSection,
}

/// Remote model endpoint. No `url` means offline: the local extractor is always used.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
    pub temperature: f64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            timeout_secs: 30,
            temperature: 0.0,
        }
    }
}

impl RemoteConfig {
    /// The configured endpoint, treating a blank value as absent.
    pub fn endpoint(&self) -> Option<&str> {
        self.url.as_deref().map(str::trim).filter(|u| !u.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateSection {
    pub default_type: DiagramKind,
    pub attach_notation: bool,
}

impl Default for GenerateSection {
    fn default() -> Self {
        Self {
            default_type: DiagramKind::Class,
            attach_notation: true,
        }
    }
}

impl DrafterConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Parse(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Overlay `DRAFTER_LLM_*` values from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Overlay `DRAFTER_LLM_*` values obtained from `lookup`.
    pub fn apply_overrides_from(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(url) = lookup(ENV_API_URL) {
            self.remote.url = Some(url);
        }
        if let Some(key) = lookup(ENV_API_KEY) {
            self.remote.api_key = Some(key);
        }
        if let Some(model) = lookup(ENV_MODEL).filter(|m| !m.trim().is_empty()) {
            self.remote.model = model;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            self.remote.timeout_secs = raw.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!("{ENV_TIMEOUT_SECS} must be a whole number, got `{raw}`"))
            })?;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.remote.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "remote.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if !self.remote.temperature.is_finite() || self.remote.temperature < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "remote.temperature must be a non-negative number, got {}",
                self.remote.temperature
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn defaults_are_offline() {
        let config = DrafterConfig::default();
        assert!(config.remote.endpoint().is_none());
        assert_eq!(config.remote.model, "gpt-4o-mini");
        assert_eq!(config.remote.timeout_secs, 30);
        assert_eq!(config.generate.default_type, DiagramKind::Class);
        assert!(config.generate.attach_notation);
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let config = DrafterConfig::from_toml_str("").unwrap();
        assert!(config.remote.url.is_none());
        assert_eq!(config.remote.timeout_secs, 30);
    }

    #[test]
    fn partial_sections_fill_defaults() {
        let config = DrafterConfig::from_toml_str(
            r#"
[remote]
url = "http://localhost:9000/v1/chat/completions"

[generate]
default_type = "usecase"
"#,
        )
        .unwrap();
        assert_eq!(
            config.remote.endpoint(),
            Some("http://localhost:9000/v1/chat/completions")
        );
        assert_eq!(config.remote.model, "gpt-4o-mini");
        assert_eq!(config.generate.default_type, DiagramKind::UseCase);
        assert!(config.generate.attach_notation);
    }

    #[test]
    fn zero_timeout_is_invalid() {
        let err = DrafterConfig::from_toml_str("[remote]\ntimeout_secs = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn bad_toml_is_parse_error() {
        let err = DrafterConfig::from_toml_str("[remote\nurl = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = DrafterConfig::load(&dir.path().join("drafter.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drafter.toml");
        std::fs::write(&path, "[remote]\nmodel = \"local\"\ntimeout_secs = 5\n").unwrap();
        let config = DrafterConfig::load(&path).unwrap();
        assert_eq!(config.remote.model, "local");
        assert_eq!(config.remote.timeout_secs, 5);
    }

    #[test]
    fn overrides_replace_file_values() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_API_URL, "http://override/v1"),
            (ENV_API_KEY, "k"),
            (ENV_MODEL, "m2"),
            (ENV_TIMEOUT_SECS, "7"),
        ]);
        let mut config = DrafterConfig::default();
        config
            .apply_overrides_from(|key| env.get(key).map(ToString::to_string))
            .unwrap();
        assert_eq!(config.remote.endpoint(), Some("http://override/v1"));
        assert_eq!(config.remote.api_key.as_deref(), Some("k"));
        assert_eq!(config.remote.model, "m2");
        assert_eq!(config.remote.timeout_secs, 7);
    }

    #[test]
    fn blank_url_override_disables_remote() {
        let mut config = DrafterConfig::from_toml_str("[remote]\nurl = \"http://x\"\n").unwrap();
        config
            .apply_overrides_from(|key| (key == ENV_API_URL).then(String::new))
            .unwrap();
        assert!(config.remote.endpoint().is_none());
    }

    #[test]
    fn non_numeric_timeout_override_is_invalid() {
        let mut config = DrafterConfig::default();
        let err = config
            .apply_overrides_from(|key| (key == ENV_TIMEOUT_SECS).then(|| "soon".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
