//! Resolved user identity and extraction helpers.

use serde::{Deserialize, Serialize};

/// An email address attached to an identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddress {
    /// Provider-side identifier of this address.
    pub id: String,
    /// The address itself.
    pub email_address: String,
}

/// A user identity resolved from the identity provider.
///
/// Owned by the provider; this crate only reads it. Stored in request
/// extensions by [`RequireAuthLayer`](crate::RequireAuthLayer).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    /// Unique subject identifier.
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Id of the entry in `email_addresses` the user marked as primary.
    #[serde(default)]
    pub primary_email_address_id: Option<String>,
    #[serde(default)]
    pub email_addresses: Vec<EmailAddress>,
    /// Milliseconds since the Unix epoch.
    #[serde(default)]
    pub last_sign_in_at: Option<i64>,
    /// Milliseconds since the Unix epoch.
    #[serde(default)]
    pub created_at: Option<i64>,
    /// Provider session the request was authenticated with, when known.
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub public_metadata: serde_json::Map<String, serde_json::Value>,
}

impl Identity {
    /// Create an identity with only a subject id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// The primary email address.
    ///
    /// Prefers the entry whose id matches `primary_email_address_id`, then
    /// the first entry, then nothing.
    pub fn primary_email(&self) -> Option<&str> {
        self.primary_email_address_id
            .as_deref()
            .and_then(|primary| self.email_addresses.iter().find(|e| e.id == primary))
            .or_else(|| self.email_addresses.first())
            .map(|e| e.email_address.as_str())
    }

    /// Best human-readable label for the user.
    pub fn display_name(&self) -> String {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(first), None) => first.to_string(),
            (None, Some(last)) => last.to_string(),
            (None, None) => self
                .username
                .as_deref()
                .or_else(|| self.primary_email())
                .unwrap_or(&self.id)
                .to_string(),
        }
    }
}

/// Extract the [`Identity`] placed in request extensions, if present.
pub fn identity_from_parts(parts: &http::request::Parts) -> Option<&Identity> {
    parts.extensions.get::<Identity>()
}
