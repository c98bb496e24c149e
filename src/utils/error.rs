use thiserror::Error;

pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";
pub const MISSING_FIELDS_MESSAGE: &str = "Missing required fields";
pub const QUOTA_EXCEEDED_MESSAGE: &str =
    "Daily conversion limit reached. Upgrade to Premium for unlimited conversions.";
pub const CONVERSION_FAILED_MESSAGE: &str = "Conversion failed";

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Unauthorized")]
    Unauthenticated,

    #[error("Missing required fields")]
    MissingFields,

    #[error("File size exceeds {limit_label} limit")]
    SizeExceeded { limit_label: String, size_bytes: u64 },

    #[error("Invalid output format")]
    InvalidOutputFormat { format: String },

    #[error("Daily conversion limit reached ({used}/{limit})")]
    QuotaExceeded { used: u64, limit: u64 },

    #[error("Server responded with {status}: {}", .message.as_deref().unwrap_or("<no message>"))]
    RemoteError { status: u16, message: Option<String> },

    #[error("Record store error: {message}")]
    StoreError { message: String },

    #[error("Malformed form: {message}")]
    MalformedForm { message: String },

    #[error("Multipart error: {0}")]
    MultipartError(#[from] axum::extract::multipart::MultipartError),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Authentication,
    Validation,
    Quota,
    Remote,
    Storage,
    Network,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ConvertError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ConvertError::Unauthenticated => ErrorCategory::Authentication,
            ConvertError::MissingFields
            | ConvertError::SizeExceeded { .. }
            | ConvertError::InvalidOutputFormat { .. } => ErrorCategory::Validation,
            ConvertError::QuotaExceeded { .. } => ErrorCategory::Quota,
            ConvertError::RemoteError { .. } => ErrorCategory::Remote,
            ConvertError::StoreError { .. } => ErrorCategory::Storage,
            ConvertError::HttpError(_)
            | ConvertError::MultipartError(_)
            | ConvertError::MalformedForm { .. } => ErrorCategory::Network,
            ConvertError::ConfigError { .. }
            | ConvertError::ConfigValidationError { .. }
            | ConvertError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            ConvertError::IoError(_) | ConvertError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation | ErrorCategory::Quota => ErrorSeverity::Low,
            ErrorCategory::Authentication | ErrorCategory::Remote | ErrorCategory::Network => {
                ErrorSeverity::Medium
            }
            ErrorCategory::Storage | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Authentication => "Check the access token passed with --token",
            ErrorCategory::Validation => "Pick a file within the size limit and an output format",
            ErrorCategory::Quota => "Wait until tomorrow or upgrade to Premium",
            ErrorCategory::Remote => "Inspect the server logs for the failed request",
            ErrorCategory::Storage => "Retry the request; the record store may be unavailable",
            ErrorCategory::Network => "Check that the server is reachable",
            ErrorCategory::Configuration => "Fix the configuration file and restart",
            ErrorCategory::System => "Check disk permissions and free space",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ConvertError::RemoteError {
                message: Some(message),
                ..
            } => message.clone(),
            ConvertError::RemoteError { message: None, .. } => {
                "An error occurred during conversion".to_string()
            }
            other => other.to_string(),
        }
    }

    /// HTTP status reported to the caller when the error reaches the server boundary.
    pub fn status_code(&self) -> u16 {
        match self {
            ConvertError::Unauthenticated => 401,
            ConvertError::MissingFields
            | ConvertError::SizeExceeded { .. }
            | ConvertError::InvalidOutputFormat { .. } => 400,
            ConvertError::QuotaExceeded { .. } => 429,
            _ => 500,
        }
    }

    /// Message placed in the JSON error body. Unexpected failures never leak detail.
    pub fn client_message(&self) -> String {
        match self {
            ConvertError::Unauthenticated => UNAUTHORIZED_MESSAGE.to_string(),
            ConvertError::MissingFields => MISSING_FIELDS_MESSAGE.to_string(),
            ConvertError::SizeExceeded { .. } | ConvertError::InvalidOutputFormat { .. } => {
                self.to_string()
            }
            ConvertError::QuotaExceeded { .. } => QUOTA_EXCEEDED_MESSAGE.to_string(),
            _ => CONVERSION_FAILED_MESSAGE.to_string(),
        }
    }

    pub fn store(message: impl Into<String>) -> Self {
        ConvertError::StoreError {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
