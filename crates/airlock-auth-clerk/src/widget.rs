//! ClerkJS browser fragments.

use airlock_auth::widget::{escape_html, js_string};
use airlock_auth::{RedirectTarget, SignInWidget};

use crate::ClerkSettings;

/// [`SignInWidget`] backed by the ClerkJS browser bundle.
#[derive(Debug, Clone)]
pub struct ClerkJs {
    js_src: String,
    publishable_key: String,
}

impl ClerkJs {
    pub fn new(js_src: impl Into<String>, publishable_key: impl Into<String>) -> Self {
        Self {
            js_src: js_src.into(),
            publishable_key: publishable_key.into(),
        }
    }

    pub fn from_settings(settings: &ClerkSettings) -> Self {
        Self::new(&settings.js_src, &settings.publishable_key)
    }

    /// The `<script>` tag that loads ClerkJS without sending credentials.
    fn loader(&self) -> String {
        format!(
            r#"<script async crossorigin="anonymous" data-clerk-publishable-key="{}" src="{}" type="text/javascript"></script>"#,
            escape_html(&self.publishable_key),
            escape_html(&self.js_src),
        )
    }
}

impl SignInWidget for ClerkJs {
    fn sign_in(&self, redirect_to: &RedirectTarget) -> String {
        let target = js_string(redirect_to.as_str());
        format!(
            r#"<div id="sign-in"></div>
{loader}
<script>
window.addEventListener("load", async () => {{
  if (!window.Clerk) return;
  await window.Clerk.load();
  if (window.Clerk.user) {{
    window.location.assign({target});
    return;
  }}
  window.Clerk.mountSignIn(document.getElementById("sign-in"), {{
    forceRedirectUrl: {target},
    signUpForceRedirectUrl: {target},
  }});
}});
</script>"#,
            loader = self.loader(),
        )
    }

    fn session_sync(&self, signed_in: bool) -> String {
        format!(
            r#"{loader}
<script>
window.addEventListener("load", async () => {{
  if (!window.Clerk) return;
  await window.Clerk.load();
  if ({signed_in} !== !!window.Clerk.user) {{
    window.location.reload();
  }}
}});
</script>"#,
            loader = self.loader(),
        )
    }
}
