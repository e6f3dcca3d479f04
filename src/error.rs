use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// JSON-RPC error code for malformed params or failed argument validation.
pub const INVALID_PARAMS: i64 = -32602;
/// JSON-RPC error code for an unknown method or tool.
pub const METHOD_NOT_FOUND: i64 = -32601;
/// Server-defined code for any failure while executing a request.
pub const EXECUTION_FAILED: i64 = -32000;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    InvalidParams(String),

    #[error("method not found: {0}")]
    MethodNotFound(String),

    #[error("unknown tool: {tool_name}")]
    ToolNotFound { tool_name: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("failed to write png {}: {source}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn invalid_params(msg: impl Into<String>) -> Self {
        Self::InvalidParams(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// JSON-RPC error code this failure is reported with.
    pub fn rpc_code(&self) -> i64 {
        match self {
            Self::InvalidParams(_) => INVALID_PARAMS,
            Self::MethodNotFound(_) | Self::ToolNotFound { .. } => METHOD_NOT_FOUND,
            _ => EXECUTION_FAILED,
        }
    }

    /// Message carried in the JSON-RPC error object.
    pub fn rpc_message(&self) -> String {
        self.to_string()
    }
}
