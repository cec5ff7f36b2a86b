use std::fmt;
use thiserror::Error;

/// 外部資源種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Ontology,
    Lexicon,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Ontology => write!(f, "Ontology file"),
            ResourceKind::Lexicon => write!(f, "Sentiment lexicon"),
        }
    }
}

/// 本體論中缺少的元素種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaElement {
    Class,
    DataProperty,
}

impl fmt::Display for SchemaElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaElement::Class => write!(f, "Class"),
            SchemaElement::DataProperty => write!(f, "Data property"),
        }
    }
}

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("{resource} missing at {path}")]
    ResourceMissing { resource: ResourceKind, path: String },

    #[error("{resource} at {path} is malformed: {reason}")]
    MalformedResource {
        resource: ResourceKind,
        path: String,
        reason: String,
    },

    #[error("{element} '{name}' not found in ontology")]
    SchemaMismatch { element: SchemaElement, name: String },

    #[error("Failed to decode input '{input}': {reason}")]
    DecodeFailure { input: String, reason: String },

    #[error("Analysis run cancelled after {processed} messages")]
    Cancelled { processed: usize },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Resource,
    Schema,
    Input,
    Configuration,
    Processing,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// 依嚴重程度決定的行程退出碼
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,      // 警告，但成功
            ErrorSeverity::Medium => 2,   // 取消或逾時，可重試
            ErrorSeverity::High => 1,     // 處理錯誤
            ErrorSeverity::Critical => 3, // 系統錯誤
        }
    }
}

impl AnalysisError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AnalysisError::ResourceMissing { .. } | AnalysisError::MalformedResource { .. } => {
                ErrorCategory::Resource
            }
            AnalysisError::SchemaMismatch { .. } => ErrorCategory::Schema,
            AnalysisError::DecodeFailure { .. }
            | AnalysisError::CsvError(_)
            | AnalysisError::ValidationError { .. } => ErrorCategory::Input,
            AnalysisError::ConfigError { .. }
            | AnalysisError::InvalidConfigValueError { .. }
            | AnalysisError::MissingConfigError { .. } => ErrorCategory::Configuration,
            AnalysisError::Cancelled { .. }
            | AnalysisError::ProcessingError { .. }
            | AnalysisError::SerializationError(_) => ErrorCategory::Processing,
            AnalysisError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AnalysisError::Cancelled { .. } => ErrorSeverity::Medium,
            AnalysisError::IoError(_) => ErrorSeverity::Critical,
            AnalysisError::ResourceMissing {
                resource: ResourceKind::Lexicon,
                ..
            } => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            AnalysisError::ResourceMissing {
                resource: ResourceKind::Ontology,
                ..
            } => "Generate the ontology with `create_ontology` or pass --ontology <path>".to_string(),
            AnalysisError::ResourceMissing {
                resource: ResourceKind::Lexicon,
                ..
            } => "Point --lexicon at a VADER-format lexicon file or omit it to use the pretrained VADER lexicon"
                .to_string(),
            AnalysisError::MalformedResource { .. } => {
                "Check the resource file syntax and regenerate it if needed".to_string()
            }
            AnalysisError::SchemaMismatch { name, .. } => format!(
                "Declare '{}' in the ontology (see `create_ontology` for the expected schema)",
                name
            ),
            AnalysisError::DecodeFailure { .. } | AnalysisError::CsvError(_) => {
                "Make sure the input is UTF-8 encoded .txt or .csv".to_string()
            }
            AnalysisError::Cancelled { .. } => {
                "Retry with a larger timeout or a smaller dataset".to_string()
            }
            AnalysisError::ConfigError { .. }
            | AnalysisError::InvalidConfigValueError { .. }
            | AnalysisError::MissingConfigError { .. } => {
                "Review the configuration values and try again".to_string()
            }
            AnalysisError::ValidationError { .. } => "Fix the input and try again".to_string(),
            AnalysisError::IoError(_) => "Check file permissions and available disk space".to_string(),
            AnalysisError::SerializationError(_) | AnalysisError::ProcessingError { .. } => {
                "Re-run with --verbose for details".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Resource => format!("A required resource is unavailable: {}", self),
            ErrorCategory::Schema => format!("The ontology does not match the analyzer: {}", self),
            ErrorCategory::Input => format!("The input could not be processed: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Processing => format!("Analysis failed: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
