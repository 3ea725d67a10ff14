/// Top-level Drafter error type.
///
/// All fallible operations in `drafter-core` return [`Result<T, DrafterError>`](Result).
/// Each variant wraps a domain-specific error enum, allowing callers to
/// match on the error source without losing type information.
#[derive(thiserror::Error, Debug)]
pub enum DrafterError {
    /// Error from the graph engine (unsupported language, unparseable source).
    #[error("Graph engine error: {0}")]
    Graph(#[from] drafter_graphs::GraphError),

    /// Error communicating with the remote model endpoint.
    #[error("Remote model error: {0}")]
    Remote(#[from] RemoteError),

    /// Error in configuration parsing or validation.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// JSON serialization/deserialization of a diagram failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors in Drafter configuration parsing and validation.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The configuration file does not exist at the expected path.
    #[error("Config file not found: {0}")]
    NotFound(String),

    /// Configuration values are present but semantically invalid.
    #[error("Invalid config: {0}")]
    Invalid(String),

    /// Configuration file syntax could not be parsed (TOML error).
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Errors from the remote model endpoint.
///
/// These never escape diagram generation: the bridge collapses every variant
/// into "no remote result" and the local extractor takes over.
#[derive(thiserror::Error, Debug)]
pub enum RemoteError {
    /// Network-level failure (connect, TLS, timeout).
    #[error("Network error: {0}")]
    Network(String),

    /// Endpoint returned a non-success HTTP status.
    #[error("API error (HTTP {status}): {body}")]
    ApiError {
        /// HTTP status code from the endpoint.
        status: u16,
        /// Response body text.
        body: String,
    },

    /// Response body was not JSON.
    #[error("Response parse error: {0}")]
    Parse(String),

    /// Neither `choices[0].message.content` nor `output` carried any text.
    #[error("Response carried no content")]
    EmptyContent,

    /// Content did not contain a structurally valid diagram object.
    #[error("Malformed diagram: {0}")]
    Malformed(String),

    /// Client could not be built from the configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience alias for `Result<T, DrafterError>`.
pub type Result<T> = std::result::Result<T, DrafterError>;
