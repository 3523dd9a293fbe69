use std::path::PathBuf;

/// Failures talking to the inference endpoint.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GatewayError {
    /// Timeout, refused connection, broken body stream.
    #[error("transport failure calling {url}: {message}")]
    Transport { url: String, message: String },

    /// The completions fallback also answered with a non-success status.
    #[error("{url} returned HTTP {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("invalid response from {url}: {message}")]
    InvalidResponse { url: String, message: String },
}

impl GatewayError {
    pub fn transport(url: &str, message: impl ToString) -> Self {
        Self::Transport {
            url: url.to_string(),
            message: message.to_string(),
        }
    }

    pub fn invalid_response(url: &str, message: impl ToString) -> Self {
        Self::InvalidResponse {
            url: url.to_string(),
            message: message.to_string(),
        }
    }
}

/// Failures producing an NPC record.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GenerationError {
    #[error("malformed NPC generation output: {reason}")]
    Malformed { reason: String, raw: String },

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Failures reading lore or NPC files.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}
