use thiserror::Error;

/// Longest diagnostic snippet carried inside an error message.
const SNIPPET_LIMIT: usize = 500;

#[derive(Error, Debug)]
pub enum CampaignError {
    #[error("Number of records must be between {min} and {max}, got {requested}")]
    GenerationRange {
        requested: usize,
        min: usize,
        max: usize,
    },

    #[error("Error formatting persona: field '{field}' {reason}. Customer data: {record}")]
    Formatting {
        field: String,
        reason: String,
        record: String,
    },

    #[error("Error generating prompt: {0}")]
    PromptBuild(String),

    #[error("Completion request failed: {0}")]
    ExternalCall(String),

    #[error("No valid JSON structure found in response: {response}")]
    NoJsonStructure { response: String },

    #[error("JSON decode error: {message}. Cleaned JSON content: {repaired}")]
    JsonDecode { message: String, repaired: String },

    #[error("Missing required key: {0}")]
    MissingField(String),

    #[error("Campaign field '{field}' is malformed: {details}")]
    MalformedContent { field: String, details: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Coarse classification used by whatever top-level boundary presents errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    GenerationRange,
    Formatting,
    PromptBuild,
    ExternalCall,
    Extraction,
    Validation,
    Other,
}

impl CampaignError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::GenerationRange { .. } => ErrorKind::GenerationRange,
            Self::Formatting { .. } => ErrorKind::Formatting,
            Self::PromptBuild(_) => ErrorKind::PromptBuild,
            Self::ExternalCall(_) => ErrorKind::ExternalCall,
            Self::NoJsonStructure { .. } | Self::JsonDecode { .. } => ErrorKind::Extraction,
            Self::MissingField(_) | Self::MalformedContent { .. } => ErrorKind::Validation,
            Self::Config(_) | Self::SerializationError(_) | Self::IoError(_) => ErrorKind::Other,
        }
    }
}

/// Truncates diagnostic text on a char boundary so errors stay readable.
pub(crate) fn snippet(text: &str) -> String {
    if text.len() <= SNIPPET_LIMIT {
        return text.to_string();
    }
    let mut end = SNIPPET_LIMIT;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... ({} bytes total)", &text[..end], text.len())
}

pub type Result<T> = std::result::Result<T, CampaignError>;
