use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid config value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("No source named '{name}' found in sources file")]
    SourceNotFoundError { name: String },

    #[error("Download failed: {message}")]
    DownloadError { message: String },

    #[error("Compiler exited with code {code}: {stderr}")]
    CompilerError { code: i32, stderr: String },

    #[error("Compiler reported success but output file is missing: {path}")]
    CompilerOutputMissingError { path: String },
}

/// 錯誤嚴重程度，僅用於日誌與提示，不影響退出碼
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

/// 錯誤分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    FileSystem,
    Serialization,
    Configuration,
    Compiler,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ApiError(_) | EtlError::DownloadError { .. } => ErrorCategory::Network,
            EtlError::IoError(_) | EtlError::ZipError(_) => ErrorCategory::FileSystem,
            EtlError::SerializationError(_) => ErrorCategory::Serialization,
            EtlError::InvalidConfigValueError { .. } | EtlError::SourceNotFoundError { .. } => {
                ErrorCategory::Configuration
            }
            EtlError::CompilerError { .. } | EtlError::CompilerOutputMissingError { .. } => {
                ErrorCategory::Compiler
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 網路錯誤通常是暫時性的
            EtlError::ApiError(_) | EtlError::DownloadError { .. } => ErrorSeverity::Medium,
            EtlError::ZipError(_)
            | EtlError::SerializationError(_)
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::SourceNotFoundError { .. }
            | EtlError::CompilerError { .. }
            | EtlError::CompilerOutputMissingError { .. } => ErrorSeverity::High,
            EtlError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::ApiError(_) => "Check network connectivity and retry later",
            EtlError::DownloadError { .. } => {
                "Check network connectivity, or pass --compiler with a local sing-box binary"
            }
            EtlError::ZipError(_) => {
                "The downloaded archive may be corrupted, delete the tools directory and retry"
            }
            EtlError::IoError(_) => "Check file permissions and available disk space",
            EtlError::SerializationError(_) => "Inspect the rule list content for unexpected data",
            EtlError::InvalidConfigValueError { .. } => "Fix the configuration value and run again",
            EtlError::SourceNotFoundError { .. } => {
                "Check the sources file for the exact source name"
            }
            EtlError::CompilerError { .. } => {
                "Run sing-box rule-set compile manually to inspect the failure"
            }
            EtlError::CompilerOutputMissingError { .. } => {
                "Verify the output directory is writable and sing-box is a compatible version"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::ApiError(e) => format!("Network request failed: {}", e),
            EtlError::DownloadError { message } => format!("Download failed: {}", message),
            EtlError::ZipError(_) => "The downloaded sing-box archive could not be read".to_string(),
            EtlError::IoError(e) => format!("File operation failed: {}", e),
            EtlError::SerializationError(_) => {
                "The generated rule set could not be serialized".to_string()
            }
            EtlError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration problem with '{}': {}", field, reason)
            }
            EtlError::SourceNotFoundError { name } => {
                format!("No source named '{}' in the sources file", name)
            }
            EtlError::CompilerError { code, .. } => {
                format!("sing-box failed with exit code {}", code)
            }
            EtlError::CompilerOutputMissingError { path } => {
                format!("sing-box did not produce the expected file: {}", path)
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
