//! In-memory verifier for tests.
//!
//! Enabled with the `test-util` feature so downstream crates can drive
//! guards and routes without a real identity provider.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::widget::escape_html;
use crate::{
    AuthError, Identity, IdentityVerifier, NormalizedRequest, RedirectTarget, RequestState,
    SignInWidget, SignedOutReason, VerifierFuture, VerifyOptions,
};

/// Session id reported for signed-in requests.
pub const TEST_SESSION_ID: &str = "sess_test";

enum Mode {
    /// Same verdict for every request.
    Fixed(RequestState),
    /// Signed in only when the bearer token or `__session` cookie matches.
    Token(String),
    Failing(AuthError),
}

/// A scripted [`IdentityVerifier`] that records how it was called.
pub struct StaticVerifier {
    mode: Mode,
    identity: Identity,
    lookups: AtomicUsize,
    looked_up: Mutex<Option<String>>,
    last_options: Mutex<Option<VerifyOptions>>,
    last_body_len: Mutex<Option<usize>>,
    revoked: Mutex<Vec<String>>,
}

impl StaticVerifier {
    fn with_mode(mode: Mode, identity: Identity) -> Self {
        Self {
            mode,
            identity,
            lookups: AtomicUsize::new(0),
            looked_up: Mutex::new(None),
            last_options: Mutex::new(None),
            last_body_len: Mutex::new(None),
            revoked: Mutex::new(Vec::new()),
        }
    }

    fn signed_in_state(identity: &Identity) -> RequestState {
        RequestState {
            is_signed_in: true,
            user_id: Some(identity.id.clone()),
            session_id: Some(TEST_SESSION_ID.to_string()),
            ..Default::default()
        }
    }

    /// Every request is signed out.
    pub fn signed_out() -> Self {
        Self::with_mode(
            Mode::Fixed(RequestState::signed_out(SignedOutReason::SessionTokenMissing)),
            Identity::default(),
        )
    }

    /// Every request is signed in as `identity`.
    pub fn signed_in(identity: Identity) -> Self {
        let state = Self::signed_in_state(&identity);
        Self::with_mode(Mode::Fixed(state), identity)
    }

    /// Requests presenting `token` are signed in as `identity`.
    pub fn accepting_token(token: impl Into<String>, identity: Identity) -> Self {
        Self::with_mode(Mode::Token(token.into()), identity)
    }

    /// Every request gets `state`; lookups return `identity`.
    pub fn with_state(state: RequestState, identity: Identity) -> Self {
        Self::with_mode(Mode::Fixed(state), identity)
    }

    /// Every verification fails with `error`.
    pub fn failing(error: AuthError) -> Self {
        Self::with_mode(Mode::Failing(error), Identity::default())
    }

    /// Number of user lookups performed.
    pub fn user_lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// Subject of the last user lookup.
    pub fn looked_up(&self) -> Option<String> {
        self.looked_up.lock().ok().and_then(|g| g.clone())
    }

    /// Options passed to the last verification.
    pub fn last_options(&self) -> Option<VerifyOptions> {
        self.last_options.lock().ok().and_then(|g| g.clone())
    }

    /// Body length of the last verified request.
    pub fn last_body_len(&self) -> Option<usize> {
        self.last_body_len.lock().ok().and_then(|g| *g)
    }

    /// Sessions revoked so far.
    pub fn revoked(&self) -> Vec<String> {
        self.revoked.lock().map(|g| g.clone()).unwrap_or_default()
    }
}

impl IdentityVerifier for StaticVerifier {
    fn authenticate_request<'a>(
        &'a self,
        request: &'a NormalizedRequest,
        options: &'a VerifyOptions,
    ) -> VerifierFuture<'a, RequestState> {
        Box::pin(async move {
            if let Ok(mut last) = self.last_options.lock() {
                *last = Some(options.clone());
            }
            if let Ok(mut len) = self.last_body_len.lock() {
                *len = Some(request.body().len());
            }
            match &self.mode {
                Mode::Fixed(state) => Ok(state.clone()),
                Mode::Failing(error) => Err(error.clone()),
                Mode::Token(expected) => {
                    let presented = request
                        .bearer_token()
                        .or_else(|| request.cookie("__session"));
                    match presented {
                        Some(token) if token == expected => {
                            Ok(Self::signed_in_state(&self.identity))
                        }
                        Some(_) => Ok(RequestState::signed_out(SignedOutReason::TokenInvalid(
                            "unknown token".to_string(),
                        ))),
                        None => Ok(RequestState::signed_out(
                            SignedOutReason::SessionTokenMissing,
                        )),
                    }
                }
            }
        })
    }

    fn get_user<'a>(&'a self, user_id: &'a str) -> VerifierFuture<'a, Identity> {
        Box::pin(async move {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            if let Ok(mut last) = self.looked_up.lock() {
                *last = Some(user_id.to_string());
            }
            Ok(self.identity.clone())
        })
    }

    fn revoke_session<'a>(&'a self, session_id: &'a str) -> VerifierFuture<'a, ()> {
        Box::pin(async move {
            if let Ok(mut revoked) = self.revoked.lock() {
                revoked.push(session_id.to_string());
            }
            Ok(())
        })
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

/// Minimal [`SignInWidget`] whose output is easy to assert on.
pub struct TestWidget;

impl SignInWidget for TestWidget {
    fn sign_in(&self, redirect_to: &RedirectTarget) -> String {
        format!(
            r#"<div id="sign-in" data-redirect="{}"></div>"#,
            escape_html(redirect_to.as_str())
        )
    }

    fn session_sync(&self, signed_in: bool) -> String {
        format!(r#"<script data-signed-in="{signed_in}"></script>"#)
    }
}
