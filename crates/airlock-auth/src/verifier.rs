//! The identity-provider seam.
//!
//! Implement [`IdentityVerifier`] once per provider (Clerk, ...). The
//! resolver only talks to the provider through this trait.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use crate::{AuthError, Identity, NormalizedRequest};

/// Boxed future returned by verifier methods.
pub type VerifierFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, AuthError>> + Send + 'a>>;

/// Options passed along with every verification call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyOptions {
    /// Origins allowed as the token's authorized party (`azp`).
    pub authorized_parties: Vec<String>,
}

impl VerifyOptions {
    /// Pin verification to a single origin.
    pub fn for_origin(origin: impl Into<String>) -> Self {
        Self {
            authorized_parties: vec![origin.into()],
        }
    }
}

/// Why a request was judged signed out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignedOutReason {
    /// No session token in the header or cookies.
    SessionTokenMissing,
    /// The token has expired.
    TokenExpired,
    /// The token's `azp` is not one of the authorized parties.
    UnauthorizedParty(String),
    /// The token is malformed or its signature does not verify.
    TokenInvalid(String),
}

impl fmt::Display for SignedOutReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SessionTokenMissing => write!(f, "session token missing"),
            Self::TokenExpired => write!(f, "token expired"),
            Self::UnauthorizedParty(azp) => write!(f, "unauthorized party '{azp}'"),
            Self::TokenInvalid(reason) => write!(f, "token invalid: {reason}"),
        }
    }
}

/// The verifier's verdict on a request.
#[derive(Debug, Clone, Default)]
pub struct RequestState {
    /// Whether the request carries a valid session.
    pub is_signed_in: bool,
    /// Set when `is_signed_in` is false.
    pub reason: Option<SignedOutReason>,
    /// Subject id, when the verifier surfaces it directly.
    pub user_id: Option<String>,
    /// Provider session id, when known.
    pub session_id: Option<String>,
    /// Verified token payload.
    pub payload: serde_json::Map<String, serde_json::Value>,
}

impl RequestState {
    /// A signed-out verdict.
    pub fn signed_out(reason: SignedOutReason) -> Self {
        Self {
            reason: Some(reason),
            ..Default::default()
        }
    }

    /// A signed-in verdict built from a verified payload.
    ///
    /// `user_id` and `session_id` are lifted from the `sub` and `sid` claims.
    pub fn signed_in(payload: serde_json::Map<String, serde_json::Value>) -> Self {
        let claim = |name: &str| payload.get(name).and_then(|v| v.as_str()).map(String::from);
        let user_id = claim("sub");
        let session_id = claim("sid");
        Self {
            is_signed_in: true,
            reason: None,
            user_id,
            session_id,
            payload,
        }
    }

    /// Subject id: the dedicated field first, then the `sub` claim.
    pub fn subject(&self) -> Option<&str> {
        self.user_id
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.payload.get("sub").and_then(|v| v.as_str()))
            .filter(|s| !s.is_empty())
    }
}

/// Trait for verifying requests against an identity provider.
///
/// Token problems are reported as a signed-out [`RequestState`]. `Err` is
/// reserved for faults (network, configuration) that must fail the request.
///
/// Requests from the [`RequireAuth`](crate::RequireAuth) and
/// [`OptionalUser`](crate::OptionalUser) extractors and from
/// [`RequireAuthLayer`](crate::RequireAuthLayer) carry an empty body, since
/// the body still belongs to the handler. Implementations must decide from
/// the method, URL and headers alone.
pub trait IdentityVerifier: Send + Sync + 'static {
    /// Decide whether `request` carries a valid session.
    ///
    /// `request.body()` is empty unless the caller buffered it explicitly.
    fn authenticate_request<'a>(
        &'a self,
        request: &'a NormalizedRequest,
        options: &'a VerifyOptions,
    ) -> VerifierFuture<'a, RequestState>;

    /// Fetch the full identity record for a subject.
    fn get_user<'a>(&'a self, user_id: &'a str) -> VerifierFuture<'a, Identity>;

    /// Revoke a provider session.
    fn revoke_session<'a>(&'a self, session_id: &'a str) -> VerifierFuture<'a, ()>;

    /// Provider name for logging.
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_signed_in_lifts_claims() {
        let state = RequestState::signed_in(payload(json!({"sub": "user_1", "sid": "sess_1"})));
        assert!(state.is_signed_in);
        assert_eq!(state.user_id.as_deref(), Some("user_1"));
        assert_eq!(state.session_id.as_deref(), Some("sess_1"));
    }

    #[test]
    fn test_subject_falls_back_to_payload() {
        let state = RequestState {
            is_signed_in: true,
            payload: payload(json!({"sub": "user_from_claim"})),
            ..Default::default()
        };
        assert_eq!(state.subject(), Some("user_from_claim"));
    }

    #[test]
    fn test_empty_user_id_falls_back_to_payload() {
        let state = RequestState {
            is_signed_in: true,
            user_id: Some(String::new()),
            payload: payload(json!({"sub": "user_1"})),
            ..Default::default()
        };
        assert_eq!(state.subject(), Some("user_1"));
    }

    #[test]
    fn test_subject_prefers_dedicated_field() {
        let state = RequestState {
            is_signed_in: true,
            user_id: Some("user_direct".to_string()),
            payload: payload(json!({"sub": "user_from_claim"})),
            ..Default::default()
        };
        assert_eq!(state.subject(), Some("user_direct"));
    }

    #[test]
    fn test_subject_absent_or_empty() {
        let state = RequestState {
            is_signed_in: true,
            payload: payload(json!({"sub": ""})),
            ..Default::default()
        };
        assert_eq!(state.subject(), None);
    }

    #[test]
    fn test_signed_out_reason_display() {
        let state = RequestState::signed_out(SignedOutReason::UnauthorizedParty(
            "https://evil.com".to_string(),
        ));
        assert!(!state.is_signed_in);
        assert_eq!(
            state.reason.map(|r| r.to_string()).as_deref(),
            Some("unauthorized party 'https://evil.com'")
        );
    }

    #[test]
    fn test_verify_options_for_origin() {
        let options = VerifyOptions::for_origin("http://localhost:8000");
        assert_eq!(options.authorized_parties, vec!["http://localhost:8000"]);
    }
}
