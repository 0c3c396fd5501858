use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("resolver exited with {}: {stderr}", describe_status(.status))]
    Exited { status: Option<i32>, stderr: String },

    #[error("malformed resolver output: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum SelectError {
    #[error("Invalid choice: {answer:?}")]
    InvalidChoice { answer: String },

    #[error("Selected quality '{selected}' is not available. Available options: {}", .available.join(", "))]
    QualityUnavailable {
        selected: String,
        available: Vec<String>,
    },

    #[error("no progressive mp4 stream at {quality}")]
    NoStream { quality: String },

    #[error("failed to read choice: {0}")]
    Prompt(#[from] io::Error),
}

fn describe_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("status {code}"),
        None => "signal".to_string(),
    }
}
