use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;

/// Options passed to the plugin by the host, e.g.
/// `["expo_use_dom_swc_plugin", { "platform": "ios", "isDev": false }]`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PluginConfig {
    pub platform: Option<String>,
    /// Mirrors the bundler caller flag. When absent the host env name decides.
    pub is_dev: Option<bool>,
}

impl PluginConfig {
    /// Parse the raw JSON options; malformed input falls back to defaults.
    pub fn from_json(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::default();
        };
        match serde_json::from_str(raw) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(error = %err, "ignoring malformed \"use dom\" plugin options");
                Self::default()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Platform {
    Web,
    Ios,
    Android,
    Other(String),
}

impl Platform {
    pub fn parse(name: &str) -> Self {
        match name {
            "web" => Self::Web,
            "ios" => Self::Ios,
            "android" => Self::Android,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Web => f.write_str("web"),
            Self::Ios => f.write_str("ios"),
            Self::Android => f.write_str("android"),
            Self::Other(name) => f.write_str(name),
        }
    }
}

/// Read-only facts about the build the current file belongs to.
#[derive(Debug, Clone, Default)]
pub struct BuildContext {
    pub is_production: bool,
    pub platform: Option<Platform>,
    /// Base for resolving relative filenames.
    pub cwd: Option<PathBuf>,
}

impl BuildContext {
    pub fn new(is_production: bool, platform: Option<Platform>) -> Self {
        Self {
            is_production,
            platform,
            cwd: None,
        }
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Combine plugin options with the host's env name and working directory.
    pub fn resolve(config: &PluginConfig, env_name: Option<&str>, cwd: Option<&str>) -> Self {
        let is_production = match config.is_dev {
            Some(is_dev) => !is_dev,
            None => env_name == Some("production"),
        };
        Self {
            is_production,
            platform: config.platform.as_deref().map(Platform::parse),
            cwd: cwd.filter(|c| !c.is_empty()).map(PathBuf::from),
        }
    }

    pub fn is_web(&self) -> bool {
        matches!(self.platform, Some(Platform::Web))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_options() {
        let config = PluginConfig::from_json(Some(r#"{"platform":"android","isDev":false}"#));
        assert_eq!(config.platform.as_deref(), Some("android"));
        assert_eq!(config.is_dev, Some(false));
    }

    #[test]
    fn malformed_options_fall_back_to_defaults() {
        let config = PluginConfig::from_json(Some("{not json"));
        assert!(config.platform.is_none());
        assert!(config.is_dev.is_none());
        assert!(PluginConfig::from_json(None).platform.is_none());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let config = PluginConfig::from_json(Some(r#"{"platform":"ios","extra":1}"#));
        assert_eq!(config.platform.as_deref(), Some("ios"));
    }

    #[test]
    fn caller_flag_wins_over_env_name() {
        let config = PluginConfig {
            platform: Some("ios".into()),
            is_dev: Some(true),
        };
        let ctx = BuildContext::resolve(&config, Some("production"), None);
        assert!(!ctx.is_production);
        assert_eq!(ctx.platform, Some(Platform::Ios));
    }

    #[test]
    fn env_name_decides_without_caller_flag() {
        let config = PluginConfig::default();
        assert!(BuildContext::resolve(&config, Some("production"), None).is_production);
        assert!(!BuildContext::resolve(&config, Some("development"), None).is_production);
        assert!(!BuildContext::resolve(&config, None, None).is_production);
    }

    #[test]
    fn empty_cwd_is_dropped() {
        let ctx = BuildContext::resolve(&PluginConfig::default(), None, Some(""));
        assert!(ctx.cwd.is_none());
        let ctx = BuildContext::resolve(&PluginConfig::default(), None, Some("/app"));
        assert_eq!(ctx.cwd, Some(PathBuf::from("/app")));
    }

    #[test]
    fn platform_names_round_trip_through_display() {
        for name in ["web", "ios", "android", "macos"] {
            assert_eq!(Platform::parse(name).to_string(), name);
        }
        assert!(BuildContext::new(false, Some(Platform::Web)).is_web());
    }
}
