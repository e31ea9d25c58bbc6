use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::net::SocketAddr;
use std::path::Path;

/// Browser identity sent with page fetches. Some storefronts reject default client agents.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Top-level service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Address the HTTP server listens on
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default)]
    pub fetch: FetchConfig,

    #[serde(default)]
    pub extract: ExtractConfig,

    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Regex patterns for request URLs to refuse
    #[serde(default)]
    pub blocked_url_patterns: Vec<String>,
}

/// Configuration for the page fetcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Upper bound on a single page fetch, in seconds
    #[serde(default = "default_fetch_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Pages larger than this are refused
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

/// Selector chains for product fields, tried in order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    #[serde(default = "default_title_selectors")]
    pub title_selectors: Vec<String>,

    #[serde(default = "default_description_selectors")]
    pub description_selectors: Vec<String>,
}

/// Configuration for the zero-shot classification endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Inference endpoint accepting `{"inputs", "parameters": {"candidate_labels"}}`
    #[serde(default = "default_classifier_endpoint")]
    pub endpoint: String,

    /// Bearer token for the endpoint, if it needs one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,

    #[serde(default = "default_classifier_timeout_secs")]
    pub timeout_secs: u64,

    /// Run one classification at startup to prove the endpoint works
    #[serde(default = "default_warm_up")]
    pub warm_up: bool,
}

fn default_bind_addr() -> String {
    "127.0.0.1:8000".to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    15
}

fn default_user_agent() -> String {
    BROWSER_USER_AGENT.to_string()
}

fn default_max_body_bytes() -> usize {
    5 * 1024 * 1024
}

fn default_title_selectors() -> Vec<String> {
    vec!["#productTitle".to_string()]
}

/// Feature bullets first, then the generic description block
fn default_description_selectors() -> Vec<String> {
    vec![
        "#feature-bullets".to_string(),
        "#productDescription".to_string(),
    ]
}

fn default_classifier_endpoint() -> String {
    "https://api-inference.huggingface.co/models/facebook/bart-large-mnli".to_string()
}

fn default_classifier_timeout_secs() -> u64 {
    30
}

fn default_warm_up() -> bool {
    true
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_fetch_timeout_secs(),
            user_agent: default_user_agent(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            title_selectors: default_title_selectors(),
            description_selectors: default_description_selectors(),
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: default_classifier_endpoint(),
            api_token: None,
            timeout_secs: default_classifier_timeout_secs(),
            warm_up: default_warm_up(),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            fetch: FetchConfig::default(),
            extract: ExtractConfig::default(),
            classifier: ClassifierConfig::default(),
            blocked_url_patterns: Vec::new(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Apply `CLASSIFIER_URL` and `CLASSIFIER_API_TOKEN` if set and non-empty
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(endpoint) = lookup("CLASSIFIER_URL").filter(|v| !v.is_empty()) {
            self.classifier.endpoint = endpoint;
        }
        if let Some(token) = lookup("CLASSIFIER_API_TOKEN").filter(|v| !v.is_empty()) {
            self.classifier.api_token = Some(token);
        }
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind_addr
            .parse()
            .map_err(|_| ConfigError::BindAddr(self.bind_addr.clone()))
    }
}
