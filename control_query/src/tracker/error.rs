//! Tracker loading errors

#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("Failed to read tracker data {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Tracker data {path} is {size} bytes, exceeding the {limit} byte limit")]
    FileTooLarge { path: String, size: u64, limit: u64 },

    #[error("Tracker data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl TrackerError {
    pub fn code(&self) -> crate::logging::Code {
        use crate::logging::codes::tracker;
        match self {
            TrackerError::Io { .. } | TrackerError::FileTooLarge { .. } => {
                tracker::FILE_READ_FAILED
            }
            TrackerError::Json(_) => tracker::INVALID_JSON,
        }
    }
}
