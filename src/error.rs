use thiserror::Error;

/// Detail returned for any input or acquisition failure
pub const DETAIL_SCRAPE_FAILED: &str = "Could not scrape product details from the URL.";

/// Detail returned when the classifier never came up
pub const DETAIL_MODEL_UNAVAILABLE: &str = "AI model is not available.";

/// Detail returned when classification or scoring fails
pub const DETAIL_ANALYSIS_FAILED: &str = "Failed to analyze product.";

/// Why a page could not be fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchFailure {
    Network,
    HttpStatus(u16),
    Timeout,
}

/// Errors raised by the page fetcher
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error fetching {url}: {message}")]
    Network { url: String, message: String },

    #[error("HTTP {status} fetching {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("timed out fetching {url}")]
    Timeout { url: String },
}

impl FetchError {
    /// Classify a reqwest error raised while fetching `url`
    pub fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else if err.is_redirect() {
            let reason = std::error::Error::source(&err)
                .map(ToString::to_string)
                .unwrap_or_default();
            FetchError::Network {
                url: url.to_string(),
                message: format!("redirect refused: {}", reason),
            }
        } else if let Some(status) = err.status() {
            FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            }
        } else {
            FetchError::Network {
                url: url.to_string(),
                message: err.to_string(),
            }
        }
    }

    pub fn reason(&self) -> FetchFailure {
        match self {
            FetchError::Network { .. } => FetchFailure::Network,
            FetchError::HttpStatus { status, .. } => FetchFailure::HttpStatus(*status),
            FetchError::Timeout { .. } => FetchFailure::Timeout,
        }
    }
}

/// Errors raised by the classifier adapter
#[derive(Debug, Error)]
pub enum ClassificationError {
    /// The capability could not be brought up at startup
    #[error("classifier initialization failed: {0}")]
    Init(String),

    #[error("classifier request failed: {0}")]
    Request(String),

    #[error("classifier returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed classifier response: {0}")]
    MalformedResponse(String),
}

/// A predicted label outside the fixed candidate set
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown sustainability label: {label}")]
pub struct UnknownLabelError {
    pub label: String,
}

/// Every way a single analysis request can fail
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("invalid request: {0}")]
    Input(String),

    #[error("acquisition failed: {0}")]
    Acquisition(#[from] FetchError),

    #[error("classification capability is unavailable")]
    CapabilityUnavailable,

    #[error("classification failed: {0}")]
    Classification(#[from] ClassificationError),

    #[error(transparent)]
    UnknownLabel(#[from] UnknownLabelError),
}

impl AnalysisError {
    /// HTTP status code reported to the caller
    pub fn status_code(&self) -> u16 {
        match self {
            AnalysisError::Input(_) | AnalysisError::Acquisition(_) => 400,
            AnalysisError::CapabilityUnavailable
            | AnalysisError::Classification(_)
            | AnalysisError::UnknownLabel(_) => 500,
        }
    }

    /// Fixed, caller-facing detail. Internal causes stay in the logs.
    pub fn detail(&self) -> &'static str {
        match self {
            AnalysisError::Input(_) | AnalysisError::Acquisition(_) => DETAIL_SCRAPE_FAILED,
            AnalysisError::CapabilityUnavailable => DETAIL_MODEL_UNAVAILABLE,
            AnalysisError::Classification(_) | AnalysisError::UnknownLabel(_) => {
                DETAIL_ANALYSIS_FAILED
            }
        }
    }
}

/// Errors loading or validating the service configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid CSS selector {selector:?}: {message}")]
    Selector { selector: String, message: String },

    #[error("invalid URL pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("invalid bind address {0:?}")]
    BindAddr(String),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
