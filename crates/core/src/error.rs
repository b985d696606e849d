use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum KebiaoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Timetable is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Timetable file not found: {}", .0.display())]
    TimetableNotFound(PathBuf),

    /// Required semester metadata is absent or unparseable.
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, KebiaoError>;
