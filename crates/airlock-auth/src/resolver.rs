//! Authentication-state resolution.

use std::sync::Arc;

use crate::{AuthError, Identity, IdentityVerifier, NormalizedRequest, VerifyOptions};

/// Result of resolving a request.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome {
    /// The request carries a valid session for this identity.
    SignedIn(Identity),
    /// No valid session.
    SignedOut,
}

impl AuthOutcome {
    /// The identity, if signed in.
    pub fn into_identity(self) -> Option<Identity> {
        match self {
            AuthOutcome::SignedIn(identity) => Some(identity),
            AuthOutcome::SignedOut => None,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        matches!(self, AuthOutcome::SignedIn(_))
    }
}

/// Turns a [`NormalizedRequest`] into an [`AuthOutcome`] via a verifier.
///
/// Cheap to clone. Holds no per-request state; every call re-verifies.
#[derive(Clone)]
pub struct Resolver {
    verifier: Arc<dyn IdentityVerifier>,
}

impl Resolver {
    pub fn new(verifier: Arc<dyn IdentityVerifier>) -> Self {
        Self { verifier }
    }

    /// The underlying verifier.
    pub fn verifier(&self) -> &dyn IdentityVerifier {
        self.verifier.as_ref()
    }

    /// Resolve the authentication state of `request`.
    ///
    /// Verification is pinned to the request's own origin as the sole
    /// authorized party. Verifier faults propagate; they never degrade
    /// to [`AuthOutcome::SignedOut`].
    pub async fn resolve(&self, request: &NormalizedRequest) -> Result<AuthOutcome, AuthError> {
        let options = VerifyOptions::for_origin(request.origin());
        let state = self
            .verifier
            .authenticate_request(request, &options)
            .await
            .inspect_err(|e| {
                log::warn!("{} verification failed for {}: {e}", self.verifier.name(), request.url())
            })?;

        if !state.is_signed_in {
            if let Some(reason) = &state.reason {
                log::debug!("Signed out at {}: {reason}", request.path_and_query());
            }
            return Ok(AuthOutcome::SignedOut);
        }

        let subject = state.subject().ok_or(AuthError::MissingSubject)?;
        let mut identity = self.verifier.get_user(subject).await.inspect_err(|e| {
            log::warn!("{} user lookup failed for {subject}: {e}", self.verifier.name())
        })?;

        if identity.session_id.is_none() {
            identity.session_id = state.session_id.clone();
        }

        Ok(AuthOutcome::SignedIn(identity))
    }
}
