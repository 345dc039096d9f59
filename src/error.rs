use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    JsonParsing(#[from] serde_json::Error),

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Configuration missing: {0}")]
    ConfigurationMissing(String),

    #[error("Malformed timestamp in {issue_key}: '{value}'")]
    MalformedTimestamp { issue_key: String, value: String },

    #[error("Incomplete author info in {issue_key}: {context}")]
    IncompleteAuthorInfo { issue_key: String, context: String },

    #[error("Missing field in {issue_key}: {field}")]
    MissingField { issue_key: String, field: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Issue単位の入力データ不備かどうか（スキップ対象になり得るエラー）
    pub fn is_issue_data_error(&self) -> bool {
        matches!(
            self,
            Error::MalformedTimestamp { .. }
                | Error::IncompleteAuthorInfo { .. }
                | Error::MissingField { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
