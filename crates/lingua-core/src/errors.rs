/// Typed error hierarchy for upstream proxy calls (translation API,
/// chat-completion gateway). Nothing in the system retries: every failure
/// is terminal for its request, so the taxonomy exists for logging and for
/// choosing the caller-facing message.
#[derive(Clone, Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("missing required parameters")]
    MissingParameters,

    #[error("{0} is not configured")]
    MissingCredential(&'static str),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("upstream returned {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    /// Upstream answered 200 but signalled failure inside the payload.
    #[error("upstream rejected request: {0}")]
    Rejected(String),

    #[error("network error: {0}")]
    Network(String),
}

impl UpstreamError {
    /// Short classification string for logging/metrics.
    pub fn error_kind(&self) -> &'static str {
        match self {
            Self::MissingParameters => "missing_parameters",
            Self::MissingCredential(_) => "missing_credential",
            Self::InvalidRequest(_) => "invalid_request",
            Self::UpstreamStatus { .. } => "upstream_status",
            Self::Rejected(_) => "rejected",
            Self::Network(_) => "network",
        }
    }

    /// Classify a non-success upstream HTTP status.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            400 => Self::InvalidRequest(body),
            _ => Self::UpstreamStatus { status, body },
        }
    }
}
