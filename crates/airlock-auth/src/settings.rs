//! Route configuration for the login/logout flow.

use serde::{Deserialize, Serialize};

use crate::{ConfigError, SchemeSource};

/// Paths for the login and logout routes and where they send users.
///
/// Built once at startup and shared through [`Airlock`](crate::Airlock).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteSettings {
    /// Path of the login route.
    pub login_route: String,
    /// Where to go after login when no `next` is given.
    pub login_redirect_route: String,
    /// Path of the logout route.
    pub logout_route: String,
    /// Where to go after logout.
    pub logout_redirect_route: String,
    /// How the request origin's scheme is determined.
    pub scheme: SchemeSource,
}

impl Default for RouteSettings {
    fn default() -> Self {
        Self {
            login_route: "/login".to_string(),
            login_redirect_route: "/".to_string(),
            logout_route: "/logout".to_string(),
            logout_redirect_route: "/".to_string(),
            scheme: SchemeSource::Direct,
        }
    }
}

impl RouteSettings {
    /// Check that every route is a same-origin absolute path.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let routes = [
            ("login_route", &self.login_route),
            ("login_redirect_route", &self.login_redirect_route),
            ("logout_route", &self.logout_route),
            ("logout_redirect_route", &self.logout_redirect_route),
        ];
        for (name, value) in routes {
            if !value.starts_with('/') || value.starts_with("//") {
                return Err(ConfigError::InvalidRoute {
                    name,
                    value: value.clone(),
                });
            }
        }
        if self.login_route == self.logout_route {
            return Err(ConfigError::DuplicateRoute(self.login_route.clone()));
        }
        Ok(())
    }
}
