//! Process-wide reporting configuration
//!
//! [`ReportConfig`] controls what a failure captures at construction and how
//! ambiguity is reported. One instance is installed per process; until
//! [`install`] is called the defaults apply.

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Default template for help text nobody registered
pub const DEFAULT_FALLBACK_TEMPLATE: &str = "An error occurred (%(class), %(message))";

static CURRENT: Lazy<RwLock<Arc<ReportConfig>>> =
    Lazy::new(|| RwLock::new(Arc::new(ReportConfig::default())));

/// When to capture a native backtrace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BacktraceMode {
    /// Follow `RUST_BACKTRACE` / `RUST_LIB_BACKTRACE`
    #[default]
    Auto,
    /// Always capture
    Always,
    /// Never capture
    Never,
}

/// Reporting configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Native backtrace capture policy
    pub backtrace: BacktraceMode,
    /// Log a warning when a multi-cause failure is read through the single-cause view
    pub warn_on_ambiguous_cause: bool,
    /// Template for generated help text; receives `class` and `message`
    pub fallback_template: String,
}

impl ReportConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With backtrace mode
    #[inline]
    #[must_use]
    pub fn with_backtrace(mut self, mode: BacktraceMode) -> Self {
        self.backtrace = mode;
        self
    }

    /// With ambiguous-cause warnings on or off
    #[inline]
    #[must_use]
    pub fn with_ambiguity_warnings(mut self, enabled: bool) -> Self {
        self.warn_on_ambiguous_cause = enabled;
        self
    }

    /// With fallback template
    #[inline]
    #[must_use]
    pub fn with_fallback_template(mut self, template: impl Into<String>) -> Self {
        self.fallback_template = template.into();
        self
    }

    /// Parse from TOML; missing keys take their defaults
    ///
    /// # Errors
    /// Returns error if the document is not valid TOML or has wrong value types
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants
    ///
    /// # Errors
    /// Returns error if the fallback template is blank
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fallback_template.trim().is_empty() {
            return Err(ConfigError::EmptyFallbackTemplate);
        }
        Ok(())
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            backtrace: BacktraceMode::Auto,
            warn_on_ambiguous_cause: true,
            fallback_template: DEFAULT_FALLBACK_TEMPLATE.to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Document could not be parsed
    #[error("invalid report configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// Generated help text would be empty
    #[error("fallback template must not be empty")]
    EmptyFallbackTemplate,
}

/// Install the process-wide configuration
///
/// # Errors
/// Returns error if the configuration is invalid; the previous one stays active
pub fn install(config: ReportConfig) -> Result<(), ConfigError> {
    config.validate()?;
    tracing::debug!(?config, "installing report configuration");
    *CURRENT.write() = Arc::new(config);
    Ok(())
}

/// Currently active configuration
#[must_use]
pub fn current() -> Arc<ReportConfig> {
    Arc::clone(&CURRENT.read())
}
