use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Trash error: {0}")]
    Trash(String),

    #[error("Policy '{0}' is only available in image mode")]
    ImageModeRequired(String),

    #[error("Unknown smart select policy: {0}")]
    UnknownPolicy(String),

    #[error("{0}")]
    Other(String),
}

impl From<trash::Error> for Error {
    fn from(err: trash::Error) -> Self {
        Error::Trash(err.to_string())
    }
}
