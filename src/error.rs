use std::fmt;

use thiserror::Error;

/// What was sent to the review API, kept for error reports.
///
/// Header values and URLs are stored already redacted so tokens never reach a log line.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDiagnostics {
    pub url: String,
    pub params: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
}

impl fmt::Display for RequestDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "url: {}, params: {{", self.url)?;
        for (i, (key, value)) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", key, value)?;
        }
        write!(f, "}}, headers: {{")?;
        for (i, (key, value)) in self.headers.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", key, value)?;
        }
        write!(f, "}}")
    }
}

#[derive(Debug, Error)]
pub enum PollError {
    #[error("connection error: {source}, {diagnostics}")]
    Transport {
        #[source]
        source: reqwest::Error,
        diagnostics: Box<RequestDiagnostics>,
    },

    #[error("API reported {key} = {value} (HTTP {status}), {diagnostics}")]
    Api {
        key: &'static str,
        value: String,
        status: u16,
        diagnostics: Box<RequestDiagnostics>,
    },

    #[error("HTTP {status} from server, {diagnostics}")]
    Http {
        status: u16,
        diagnostics: Box<RequestDiagnostics>,
    },

    #[error("malformed response from {url}: {source}")]
    Schema {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected homework status: {status}")]
    UnexpectedStatus { status: String },

    #[error("telegram rejected message: {description}")]
    Send { description: String },
}

impl PollError {
    /// Short stable name used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            PollError::Transport { .. } => "transport",
            PollError::Api { .. } => "api",
            PollError::Http { .. } => "http",
            PollError::Schema { .. } => "schema",
            PollError::UnexpectedStatus { .. } => "unexpected_status",
            PollError::Send { .. } => "send",
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} must be set")]
    MissingVar(&'static str),

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}
