//! Configuration management for the triage pipeline.
//!
//! This module handles loading and merging configuration from multiple
//! sources:
//! - Built-in defaults
//! - Config file (triage.yaml)
//! - Environment variables (`TRIAGE_*`)
//! - Command-line flags
//!
//! The resulting `AppConfig` is constructed once at process start and passed
//! by reference to every component constructor. Components never read
//! ambient globals.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// LLM provider ("ollama" or "openai")
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// API key for the LLM provider
    pub api_key: Option<String>,

    /// Custom LLM endpoint URL
    pub endpoint: Option<String>,

    /// Base URL of the external retrieval service
    pub retrieval_endpoint: String,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// Compliance policy (blocklist, limits, category taxonomy)
    pub compliance: CompliancePolicy,
}

/// Compliance policy configuration.
///
/// The prohibited-category taxonomy is deliberately configuration rather
/// than hardcoded policy: deployments decide what counts as off-limits, the
/// engine only enforces whatever list it is given.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompliancePolicy {
    /// Case-insensitive substrings that block a query without a model call
    #[serde(default = "default_blocklist")]
    pub blocklist: Vec<String>,

    /// Queries longer than this are rejected as a denial-of-service guard
    #[serde(default = "default_max_query_chars")]
    pub max_query_chars: usize,

    /// Category taxonomy rendered into the deep-check policy prompt
    #[serde(default = "default_categories")]
    pub prohibited_categories: Vec<String>,
}

fn default_blocklist() -> Vec<String> {
    [
        "ignore previous instructions",
        "system override",
        "act as dan",
        "make a bomb",
        "child porn",
        "credit card generator",
    ]
    .iter()
    .map(|s| (*s).to_string())
    .collect()
}

fn default_max_query_chars() -> usize {
    10_000
}

fn default_categories() -> Vec<String> {
    [
        "violence",
        "illegal",
        "sexual",
        "politics",
        "religion",
        "corporate_sensitive",
        "drugs",
        "pii",
        "injection",
    ]
    .iter()
    .map(|s| (*s).to_string())
    .collect()
}

impl Default for CompliancePolicy {
    fn default() -> Self {
        Self {
            blocklist: default_blocklist(),
            max_query_chars: default_max_query_chars(),
            prohibited_categories: default_categories(),
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    llm: Option<LlmSection>,
    retrieval: Option<RetrievalSection>,
    compliance: Option<CompliancePolicy>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LlmSection {
    provider: Option<String>,
    model: Option<String>,
    endpoint: Option<String>,
    #[serde(rename = "apiKeyEnv")]
    api_key_env: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RetrievalSection {
    endpoint: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_file: None,
            provider: "ollama".to_string(), // Local-first default
            model: "llama3.2".to_string(),
            api_key: None,
            endpoint: None,
            retrieval_endpoint: "http://localhost:7400".to_string(),
            log_level: None,
            verbose: false,
            no_color: false,
            compliance: CompliancePolicy::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the config file and environment variables.
    ///
    /// `config_file` is the path from the `--config` CLI flag; it wins over
    /// the `TRIAGE_CONFIG` env var, which in turn wins over the implicit
    /// `./triage.yaml`. An explicitly named file that does not exist is an
    /// error; a missing implicit file is not.
    ///
    /// Environment variables:
    /// - `TRIAGE_CONFIG`: Path to config file (default: ./triage.yaml)
    /// - `TRIAGE_PROVIDER`: LLM provider
    /// - `TRIAGE_MODEL`: Model identifier
    /// - `TRIAGE_API_KEY`: API key
    /// - `TRIAGE_RETRIEVAL_ENDPOINT`: Retrieval service base URL
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    pub fn load(config_file: Option<&Path>) -> AppResult<Self> {
        let mut config = Self::default();

        config.config_file = config_file.map(Path::to_path_buf).or_else(|| {
            std::env::var("TRIAGE_CONFIG").ok().map(PathBuf::from)
        });

        match config.config_file.clone() {
            Some(config_path) => {
                if !config_path.exists() {
                    return Err(AppError::Config(format!(
                        "Config file {:?} not found",
                        config_path
                    )));
                }
                config = config.merge_yaml(&config_path)?;
            }
            None => {
                let config_path = PathBuf::from("triage.yaml");
                if config_path.exists() {
                    config = config.merge_yaml(&config_path)?;
                }
            }
        }

        // Environment variables override file settings
        if let Ok(provider) = std::env::var("TRIAGE_PROVIDER") {
            config.provider = provider;
        }

        if let Ok(model) = std::env::var("TRIAGE_MODEL") {
            config.model = model;
        }

        if let Ok(endpoint) = std::env::var("TRIAGE_RETRIEVAL_ENDPOINT") {
            config.retrieval_endpoint = endpoint;
        }

        if let Ok(key) = std::env::var("TRIAGE_API_KEY") {
            config.api_key = Some(key);
        }

        if config.log_level.is_none() {
            config.log_level = std::env::var("RUST_LOG").ok();
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&mut self, path: &PathBuf) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(llm) = config_file.llm {
            if let Some(provider) = llm.provider {
                result.provider = provider;
            }
            if let Some(model) = llm.model {
                result.model = model;
            }
            if let Some(endpoint) = llm.endpoint {
                result.endpoint = Some(endpoint);
            }
            if let Some(env_var) = llm.api_key_env {
                if let Ok(key) = std::env::var(&env_var) {
                    result.api_key = Some(key);
                }
            }
        }

        if let Some(retrieval) = config_file.retrieval {
            if let Some(endpoint) = retrieval.endpoint {
                result.retrieval_endpoint = endpoint;
            }
        }

        if let Some(compliance) = config_file.compliance {
            result.compliance = compliance;
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// CLI flags take precedence over both the config file and environment
    /// variables. The `--config` flag is not handled here — it selects the
    /// file that `load` merges, so it must be passed to `load` directly.
    pub fn with_overrides(
        mut self,
        provider: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(provider) = provider {
            self.provider = provider;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Validate configuration for the active provider.
    pub fn validate(&self) -> AppResult<()> {
        let known_providers = ["ollama", "openai"];

        if !known_providers.contains(&self.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.provider,
                known_providers.join(", ")
            )));
        }

        if self.provider == "openai" && self.api_key.is_none() {
            return Err(AppError::Config(
                "OpenAI provider requires an API key (TRIAGE_API_KEY or llm.apiKeyEnv)"
                    .to_string(),
            ));
        }

        if self.compliance.max_query_chars == 0 {
            return Err(AppError::Config(
                "compliance.max_query_chars must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.provider, "ollama");
        assert_eq!(config.model, "llama3.2");
        assert!(!config.verbose);
        assert!(!config.no_color);
        assert_eq!(config.compliance.max_query_chars, 10_000);
        assert!(config
            .compliance
            .blocklist
            .contains(&"ignore previous instructions".to_string()));
    }

    #[test]
    fn test_with_overrides() {
        let config = AppConfig::default();
        let overridden = config.with_overrides(
            Some("openai".to_string()),
            Some("gpt-4o".to_string()),
            None,
            true,
            false,
        );

        assert_eq!(overridden.provider, "openai");
        assert_eq!(overridden.model, "gpt-4o");
        assert!(overridden.verbose);
        assert_eq!(overridden.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_load_merges_flag_supplied_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.yaml");
        std::fs::write(
            &path,
            "llm:\n  provider: ollama\n  model: mistral\n\
             retrieval:\n  endpoint: http://retrieval:9000\n",
        )
        .unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.model, "mistral");
        assert_eq!(config.retrieval_endpoint, "http://retrieval:9000");
        assert_eq!(config.config_file.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_load_rejects_missing_explicit_config() {
        let result = AppConfig::load(Some(Path::new("/no/such/triage.yaml")));
        match result {
            Err(AppError::Config(message)) => assert!(message.contains("not found")),
            other => panic!("Expected config error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_validate_unknown_provider() {
        let mut config = AppConfig::default();
        config.provider = "unknown".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_openai_requires_key() {
        let mut config = AppConfig::default();
        config.provider = "openai".to_string();
        assert!(config.validate().is_err());

        config.api_key = Some("sk-test".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_compliance_policy_yaml_defaults() {
        // A partial compliance section keeps defaults for omitted fields.
        let policy: CompliancePolicy =
            serde_yaml::from_str("max_query_chars: 500").unwrap();
        assert_eq!(policy.max_query_chars, 500);
        assert!(!policy.blocklist.is_empty());
        assert!(policy
            .prohibited_categories
            .contains(&"injection".to_string()));
    }
}
