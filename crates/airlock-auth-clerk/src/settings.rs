//! Clerk settings, read from flags or `CLERK_*` environment variables.

use std::ffi::OsString;
use std::fmt;

use airlock_auth::{ConfigError, RouteSettings, SchemeSource};
use clap::{Args, Parser};

/// ClerkJS browser bundle served from jsDelivr.
pub const DEFAULT_JS_SRC: &str =
    "https://cdn.jsdelivr.net/npm/@clerk/clerk-js@5/dist/clerk.browser.js";

/// Clerk Backend API base URL.
pub const DEFAULT_API_URL: &str = "https://api.clerk.com";

/// Everything the Clerk adapter needs at startup.
///
/// Flatten into a binary's CLI with `#[command(flatten)]`, or load on its
/// own with [`ClerkSettings::from_env`].
#[derive(Clone, Args)]
pub struct ClerkSettings {
    /// Clerk publishable key (pk_...), embedded in pages that load ClerkJS.
    #[arg(long, env = "CLERK_PUBLISHABLE_KEY")]
    pub publishable_key: String,

    /// Clerk secret key (sk_...), used against the Backend API.
    #[arg(long, env = "CLERK_SECRET_KEY", hide_env_values = true)]
    pub secret_key: String,

    /// Where browsers load ClerkJS from.
    #[arg(long, env = "CLERK_JS_SRC", default_value = DEFAULT_JS_SRC)]
    pub js_src: String,

    /// Clerk Backend API base URL.
    #[arg(long, env = "CLERK_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// PEM public key for networkless session verification.
    /// When unset, signing keys are fetched from the JWKS endpoint.
    #[arg(long, env = "CLERK_JWT_KEY", hide_env_values = true)]
    pub jwt_key: Option<String>,

    #[arg(long, env = "CLERK_LOGIN_ROUTE", default_value = "/login")]
    pub login_route: String,

    #[arg(long, env = "CLERK_LOGIN_REDIRECT_ROUTE", default_value = "/")]
    pub login_redirect_route: String,

    #[arg(long, env = "CLERK_LOGOUT_ROUTE", default_value = "/logout")]
    pub logout_route: String,

    #[arg(long, env = "CLERK_LOGOUT_REDIRECT_ROUTE", default_value = "/")]
    pub logout_redirect_route: String,

    /// Take the origin scheme from `X-Forwarded-Proto`.
    /// Set when a TLS-terminating proxy sits in front of the app.
    #[arg(long, env = "CLERK_TRUST_FORWARDED_PROTO")]
    pub trust_forwarded_proto: bool,
}

#[derive(Parser)]
#[command(no_binary_name = true)]
struct SettingsOnly {
    #[command(flatten)]
    settings: ClerkSettings,
}

impl ClerkSettings {
    /// Load from the environment alone and validate.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::try_from_args(std::iter::empty::<OsString>())
    }

    /// Load from flags (environment as fallback) and validate.
    ///
    /// `args` does not include a binary name.
    pub fn try_from_args<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let parsed =
            SettingsOnly::try_parse_from(args).map_err(|e| ConfigError::Load(e.to_string()))?;
        parsed.settings.validate()?;
        Ok(parsed.settings)
    }

    /// Check keys and routes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.publishable_key.trim().is_empty() {
            return Err(ConfigError::Missing("CLERK_PUBLISHABLE_KEY"));
        }
        if self.secret_key.trim().is_empty() {
            return Err(ConfigError::Missing("CLERK_SECRET_KEY"));
        }
        if self.api_url.trim().is_empty() {
            return Err(ConfigError::Missing("CLERK_API_URL"));
        }
        self.route_settings().validate()
    }

    /// The route part of the settings, as the guards and routes consume it.
    pub fn route_settings(&self) -> RouteSettings {
        RouteSettings {
            login_route: self.login_route.clone(),
            login_redirect_route: self.login_redirect_route.clone(),
            logout_route: self.logout_route.clone(),
            logout_redirect_route: self.logout_redirect_route.clone(),
            scheme: if self.trust_forwarded_proto {
                SchemeSource::ForwardedProto
            } else {
                SchemeSource::Direct
            },
        }
    }
}

impl fmt::Debug for ClerkSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClerkSettings")
            .field("publishable_key", &self.publishable_key)
            .field("secret_key", &"[redacted]")
            .field("js_src", &self.js_src)
            .field("api_url", &self.api_url)
            .field("jwt_key", &self.jwt_key.as_ref().map(|_| "[redacted]"))
            .field("login_route", &self.login_route)
            .field("login_redirect_route", &self.login_redirect_route)
            .field("logout_route", &self.logout_route)
            .field("logout_redirect_route", &self.logout_redirect_route)
            .field("trust_forwarded_proto", &self.trust_forwarded_proto)
            .finish()
    }
}
