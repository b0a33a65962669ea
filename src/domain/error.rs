use thiserror::Error;

/// Failures reported by a resource client.
///
/// Carries plain strings and status codes so the error stays independent of
/// the transport that produced it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("Unable to reach {url}: {message}")]
    Network { url: String, message: String },

    #[error("{}", format_api_messages(*status, messages))]
    Api { status: u16, messages: Vec<String> },

    #[error("Unexpected response from API: {0}")]
    Decode(String),
}

impl ClientError {
    /// HTTP status of an API rejection, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

fn format_api_messages(status: u16, messages: &[String]) -> String {
    if messages.is_empty() {
        format!("API request failed with status {}", status)
    } else {
        messages.join("\n")
    }
}

/// secretsctl unified error type
#[derive(Error, Debug)]
pub enum SecretsError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("{message}")]
    ConfigResolution { message: String },

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Operation cancelled")]
    Cancelled,
}

impl SecretsError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            SecretsError::InvalidInput(_) => 2,
            SecretsError::Config { .. } | SecretsError::ConfigResolution { .. } => 3,
            SecretsError::Client(err) if err.is_unauthorized() => 4,
            SecretsError::Client(err) if err.is_not_found() => 5,
            _ => 1,
        }
    }

    pub fn missing_flags(flags: &[&str]) -> Self {
        let quoted: Vec<String> = flags.iter().map(|f| format!("\"{}\"", f)).collect();
        SecretsError::InvalidInput(format!("required flag(s) {} not set", quoted.join(", ")))
    }
}

pub type SecretsResult<T> = Result<T, SecretsError>;
