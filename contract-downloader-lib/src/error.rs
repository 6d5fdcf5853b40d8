//! Errors that might be returned when using this crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unsupported network '{0}', expected one of mainnet, polygon or bsc")]
    UnsupportedNetwork(String),

    // Explorer Errors
    #[error("Invalid API key for '{0}'")]
    ExplorerInvalidToken(String),

    #[error("Failed to retrieve source for '{0}'; Contract source code not verified")]
    ExplorerContractSourceCodeNotVerified(String),

    #[error("Explorer request '{0}' failed; {1}")]
    ExplorerApi(String, String),

    #[error("Failed to get individual source files of '{0}'. Contract was probably merged to single file upon verification.")]
    SourceNotMultiFile(String),

    #[error("Source file reference '{0}' resolves outside of 'contracts/' and 'node_modules/'")]
    SourcePathOutsideTree(String),

    #[error("Failed to deserialize JSON input; {0}")]
    DeserializeError(#[from] serde_json::Error),

    // Bounty page Errors
    #[error("Invalid bounty URL '{0}'; {1}")]
    InvalidBountyUrl(String, #[source] url::ParseError),

    #[error("Failed to find the 'Assets in scope' section on '{0}'")]
    ScopeSectionNotFound(String),

    // HTTP Errors
    #[error("Failed to initialize HTTP client; {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Failed to send HTTP request; {0}")]
    HttpRequest(#[source] reqwest::Error),

    #[error("Request to '{0}' failed with status code {1}")]
    HttpStatus(String, u16),

    // Filesystem Errors
    #[error("Failed to write '{0}'; {1}")]
    FilesystemWrite(String, #[source] std::io::Error),

    // Config Errors
    #[error("Failed to read .env file; {0}")]
    ConfigRead(#[from] dotenv::Error),

    #[error("Environment variable '{0}' does not exist; {1}")]
    ConfigReadNonExistantEnvironmentVariable(&'static str, #[source] std::env::VarError),

    #[error("Environment variable '{0}' is empty")]
    ConfigReadEmptyEnvironmentVariable(&'static str),
}
