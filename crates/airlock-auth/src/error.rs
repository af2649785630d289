//! Auth-specific error types.

use http::StatusCode;

/// Faults raised while resolving authentication state.
///
/// Being signed out is not a fault and never shows up here. Every variant
/// is fatal for the request that produced it.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthError {
    /// The request carries neither an absolute URI nor a `Host` header,
    /// so no origin can be pinned for verification.
    #[error("request has no host to derive an origin from")]
    MissingHost,

    /// The request body could not be read.
    #[error("failed to read request body: {0}")]
    BodyRead(String),

    /// The verifier reported a signed-in session without a subject.
    #[error("signed-in session carries no subject identifier")]
    MissingSubject,

    /// The identity provider could not be reached.
    #[error("identity provider unreachable: {0}")]
    Transport(String),

    /// The identity provider answered with a non-success status.
    #[error("identity provider returned HTTP {status}: {message}")]
    Upstream { status: u16, message: String },

    /// The identity provider answered with a body we could not decode.
    #[error("invalid identity provider response: {0}")]
    InvalidResponse(String),

    /// Failed to fetch signing keys from the identity provider.
    #[error("failed to fetch JWKS: {0}")]
    JwksFetch(String),

    /// The verifier is misconfigured (bad key material, bad URL, ...).
    #[error("verifier configuration error: {0}")]
    Config(String),
}

impl AuthError {
    /// HTTP status the host framework should answer with.
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::MissingHost | AuthError::BodyRead(_) => StatusCode::BAD_REQUEST,
            AuthError::Transport(_)
            | AuthError::Upstream { .. }
            | AuthError::InvalidResponse(_)
            | AuthError::JwksFetch(_) => StatusCode::BAD_GATEWAY,
            AuthError::MissingSubject | AuthError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short message safe to show to the end user.
    pub fn public_message(&self) -> &'static str {
        match self {
            AuthError::MissingHost | AuthError::BodyRead(_) => "malformed request",
            _ => "authentication service unavailable",
        }
    }
}

/// Errors raised while validating settings at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required value is missing or empty.
    #[error("missing required setting: {0}")]
    Missing(&'static str),

    /// A route path is not a same-origin absolute path.
    #[error("invalid route for {name}: '{value}' must start with a single '/'")]
    InvalidRoute { name: &'static str, value: String },

    /// Login and logout share a path.
    #[error("login and logout routes are both '{0}'")]
    DuplicateRoute(String),

    /// Settings could not be parsed from the environment.
    #[error("failed to load settings: {0}")]
    Load(String),
}
