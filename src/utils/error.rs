use thiserror::Error;

#[derive(Error, Debug)]
pub enum SantaError {
    #[error("Notification request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration '{field}'")]
    MissingConfigError { field: String },

    #[error("No valid assignment exists given the current exclusion constraints")]
    InfeasibleAssignment,

    #[error("Assignment invariant violated: {message}")]
    AssignmentInvariantError { message: String },

    #[error("Failed to deliver message to {recipient}: {message}")]
    DeliveryError { recipient: String, message: String },

    #[error("Template error: {message}")]
    TemplateError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Assignment,
    Delivery,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SantaError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SantaError::ConfigError { .. }
            | SantaError::ConfigValidationError { .. }
            | SantaError::InvalidConfigValueError { .. }
            | SantaError::MissingConfigError { .. }
            | SantaError::TemplateError { .. } => ErrorCategory::Configuration,
            SantaError::InfeasibleAssignment | SantaError::AssignmentInvariantError { .. } => {
                ErrorCategory::Assignment
            }
            SantaError::HttpError(_) | SantaError::DeliveryError { .. } => ErrorCategory::Delivery,
            SantaError::IoError(_) | SantaError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Delivery => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Assignment => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 給終端使用者看的簡短訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            SantaError::InfeasibleAssignment => {
                "Nobody can be matched under the current exclusions".to_string()
            }
            SantaError::AssignmentInvariantError { .. } => {
                "The drawn assignment failed its consistency check".to_string()
            }
            SantaError::DeliveryError { recipient, .. } => {
                format!("Could not notify {}", recipient)
            }
            SantaError::HttpError(_) => "Could not reach the mail relay".to_string(),
            SantaError::IoError(e) => format!("File system error: {}", e),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            SantaError::InfeasibleAssignment => {
                "Remove some exclusions or add participants, then draw again"
            }
            SantaError::AssignmentInvariantError { .. } => {
                "This is a bug in the solver; please report it with your configuration"
            }
            SantaError::DeliveryError { .. } | SantaError::HttpError(_) => {
                "Check the transport endpoint and credentials; the whole draw must be re-run"
            }
            SantaError::TemplateError { .. } => {
                "Only {giver_name}, {recipient_name} and {recipient_email} may be used in templates"
            }
            SantaError::ConfigError { .. }
            | SantaError::ConfigValidationError { .. }
            | SantaError::InvalidConfigValueError { .. }
            | SantaError::MissingConfigError { .. } => {
                "Fix the configuration file and try again"
            }
            SantaError::IoError(_) | SantaError::SerializationError(_) => {
                "Check file permissions and available disk space"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, SantaError>;
