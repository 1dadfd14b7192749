use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("No adapter registered for platform '{0}'")]
    UnknownPlatform(String),

    #[error("Authentication against {0} failed: {1}")]
    Authentication(String, String),

    #[error("Fetching sales from {0} failed: {1}")]
    Fetch(String, String),
}
