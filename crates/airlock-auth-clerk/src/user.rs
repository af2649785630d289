//! Clerk Backend API user records.

use airlock_auth::{EmailAddress, Identity};
use serde::Deserialize;

/// An email address entry of a Clerk user.
#[derive(Debug, Deserialize)]
struct ClerkEmailAddress {
    id: String,
    email_address: String,
}

/// The subset of Clerk's `User` object that maps onto [`Identity`].
#[derive(Debug, Deserialize)]
pub(crate) struct ClerkUser {
    id: String,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    primary_email_address_id: Option<String>,
    #[serde(default)]
    email_addresses: Vec<ClerkEmailAddress>,
    #[serde(default)]
    last_sign_in_at: Option<i64>,
    #[serde(default)]
    created_at: Option<i64>,
    #[serde(default)]
    public_metadata: serde_json::Map<String, serde_json::Value>,
}

impl From<ClerkUser> for Identity {
    fn from(user: ClerkUser) -> Self {
        Identity {
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            image_url: user.image_url,
            primary_email_address_id: user.primary_email_address_id,
            email_addresses: user
                .email_addresses
                .into_iter()
                .map(|e| EmailAddress {
                    id: e.id,
                    email_address: e.email_address,
                })
                .collect(),
            last_sign_in_at: user.last_sign_in_at,
            created_at: user.created_at,
            session_id: None,
            public_metadata: user.public_metadata,
        }
    }
}

/// Error envelope returned by the Backend API.
#[derive(Debug, Deserialize)]
pub(crate) struct ClerkErrors {
    #[serde(default)]
    errors: Vec<ClerkErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct ClerkErrorEntry {
    message: String,
    #[serde(default)]
    long_message: Option<String>,
}

impl ClerkErrors {
    /// First error message, preferring the long form.
    pub(crate) fn summary(&self) -> Option<String> {
        self.errors
            .first()
            .map(|e| e.long_message.clone().unwrap_or_else(|| e.message.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_maps_to_identity() {
        let user: ClerkUser = serde_json::from_value(json!({
            "id": "user_2abc",
            "object": "user",
            "username": null,
            "first_name": "Alice",
            "last_name": "Liddell",
            "image_url": "https://img.clerk.com/alice",
            "primary_email_address_id": "idn_2",
            "email_addresses": [
                {"id": "idn_1", "email_address": "old@example.com", "verification": null},
                {"id": "idn_2", "email_address": "alice@example.com", "verification": null}
            ],
            "last_sign_in_at": 1700000000000i64,
            "created_at": 1600000000000i64,
            "public_metadata": {"plan": "pro"},
            "private_metadata": {"internal": true}
        }))
        .unwrap();

        let identity = Identity::from(user);
        assert_eq!(identity.id, "user_2abc");
        assert_eq!(identity.display_name(), "Alice Liddell");
        assert_eq!(identity.primary_email(), Some("alice@example.com"));
        assert_eq!(identity.last_sign_in_at, Some(1_700_000_000_000));
        assert_eq!(identity.public_metadata["plan"], "pro");
        assert!(identity.session_id.is_none());
    }

    #[test]
    fn test_minimal_user() {
        let user: ClerkUser = serde_json::from_value(json!({"id": "user_min"})).unwrap();
        let identity = Identity::from(user);
        assert_eq!(identity.id, "user_min");
        assert!(identity.email_addresses.is_empty());
    }

    #[test]
    fn test_error_summary_prefers_long_message() {
        let errors: ClerkErrors = serde_json::from_value(json!({
            "errors": [{"message": "not found", "long_message": "User not found", "code": "resource_not_found"}]
        }))
        .unwrap();
        assert_eq!(errors.summary().as_deref(), Some("User not found"));
    }
}
