use crate::error::{Result, RouteError};
use dashmap::DashMap;
use std::env;
use std::sync::Arc;

/// Prefix shared by every environment variable the registry reads.
pub const ENV_PREFIX: &str = "ROUTEMETA_";

pub const API_ROOT_KEY: &str = "ROUTEMETA_API_ROOT";
pub const DOC_TAG_KEY: &str = "ROUTEMETA_DOC_TAG";

/// Path segment prepended to documented routes unless configured otherwise.
pub const DEFAULT_API_ROOT: &str = "/api";

/// Configuration service
#[derive(Clone, Default)]
pub struct ConfigService {
    config: Arc<DashMap<String, String>>,
}

impl ConfigService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `ROUTEMETA_*` variable from the process environment
    pub fn from_env() -> Self {
        let service = Self::default();
        for (key, value) in env::vars().filter(|(key, _)| key.starts_with(ENV_PREFIX)) {
            service.set(&key, &value);
        }
        service
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.config.get(key).map(|v| v.clone())
    }

    pub fn set(&self, key: &str, value: &str) {
        self.config.insert(key.to_string(), value.to_string());
    }
}

/// Decides which routes receive a documentation block and the API root.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DocumentationPolicy {
    /// Any non-empty tag set marks the route as documented.
    #[default]
    AnyTag,
    /// Only routes carrying this tag are documented (e.g. `"api"`).
    Tag(String),
}

impl DocumentationPolicy {
    pub fn is_documented(&self, tags: &[String]) -> bool {
        match self {
            DocumentationPolicy::AnyTag => !tags.is_empty(),
            DocumentationPolicy::Tag(tag) => tags.iter().any(|t| t == tag),
        }
    }
}

/// Settings applied by a [`RouteRegistry`](crate::RouteRegistry)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    pub api_root: String,
    pub documentation: DocumentationPolicy,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            api_root: DEFAULT_API_ROOT.to_string(),
            documentation: DocumentationPolicy::default(),
        }
    }
}

impl RegistryConfig {
    /// Read registry settings from a [`ConfigService`], falling back to defaults.
    ///
    /// An API root must be empty or start with `/`.
    pub fn from_config(config: &ConfigService) -> Result<Self> {
        let mut settings = Self::default();

        if let Some(api_root) = config.get(API_ROOT_KEY) {
            let api_root = api_root.trim_end_matches('/').to_string();
            if !api_root.is_empty() && !api_root.starts_with('/') {
                return Err(RouteError::Config(format!(
                    "{API_ROOT_KEY} must start with '/': {api_root}"
                )));
            }
            settings.api_root = api_root;
        }

        if let Some(tag) = config.get(DOC_TAG_KEY).filter(|tag| !tag.is_empty()) {
            settings.documentation = DocumentationPolicy::Tag(tag);
        }

        tracing::debug!(
            api_root = %settings.api_root,
            documentation = ?settings.documentation,
            "Loaded route registry configuration"
        );
        Ok(settings)
    }

    pub fn api_root(mut self, api_root: impl Into<String>) -> Self {
        self.api_root = api_root.into();
        self
    }

    pub fn documentation(mut self, policy: DocumentationPolicy) -> Self {
        self.documentation = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = RegistryConfig::from_config(&ConfigService::new()).unwrap();
        assert_eq!(settings, RegistryConfig::default());
        assert_eq!(settings.api_root, "/api");
    }

    #[test]
    fn test_overrides() {
        let config = ConfigService::new();
        config.set(API_ROOT_KEY, "/public/");
        config.set(DOC_TAG_KEY, "api");

        let settings = RegistryConfig::from_config(&config).unwrap();
        assert_eq!(settings.api_root, "/public");
        assert_eq!(settings.documentation, DocumentationPolicy::Tag("api".into()));
    }

    #[test]
    fn test_empty_doc_tag_keeps_any_tag() {
        let config = ConfigService::new();
        config.set(DOC_TAG_KEY, "");
        let settings = RegistryConfig::from_config(&config).unwrap();
        assert_eq!(settings.documentation, DocumentationPolicy::AnyTag);
    }

    #[test]
    fn test_relative_api_root_rejected() {
        let config = ConfigService::new();
        config.set(API_ROOT_KEY, "api");
        assert!(matches!(
            RegistryConfig::from_config(&config),
            Err(RouteError::Config(_))
        ));
    }

    #[test]
    fn test_from_env_keeps_prefixed_keys_only() {
        // SAFETY: these variable names are used by no other test.
        unsafe {
            env::set_var("ROUTEMETA_FROM_ENV_CHECK", "/public");
            env::set_var("FROM_ENV_CHECK_ROUTEMETA", "/ignored");
        }

        let config = ConfigService::from_env();
        assert_eq!(config.get("ROUTEMETA_FROM_ENV_CHECK").as_deref(), Some("/public"));
        assert_eq!(config.get("FROM_ENV_CHECK_ROUTEMETA"), None);
        assert!(env::var("FROM_ENV_CHECK_ROUTEMETA").is_ok());
    }

    #[test]
    fn test_documentation_policy() {
        let tags = vec!["internal".to_string()];
        assert!(DocumentationPolicy::AnyTag.is_documented(&tags));
        assert!(!DocumentationPolicy::AnyTag.is_documented(&[]));
        assert!(!DocumentationPolicy::Tag("api".into()).is_documented(&tags));
        assert!(DocumentationPolicy::Tag("internal".into()).is_documented(&tags));
    }
}
