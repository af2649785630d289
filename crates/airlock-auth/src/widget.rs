//! Front-end sign-in widget interface.
//!
//! The browser half of sign-in belongs to the provider's JS bundle. The
//! routes only need HTML fragments from it, produced by a [`SignInWidget`].

use crate::RedirectTarget;

/// Renders the provider's browser-side sign-in pieces.
pub trait SignInWidget: Send + Sync + 'static {
    /// Mount point plus bootstrap that signs the user in and then navigates
    /// to `redirect_to`.
    fn sign_in(&self, redirect_to: &RedirectTarget) -> String;

    /// Script that reloads the page once when the browser's session state
    /// disagrees with `signed_in`, the state the server rendered with.
    fn session_sync(&self, signed_in: bool) -> String;
}

/// Escape text for use in HTML content or a double-quoted attribute.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Encode a string as a JS literal that is safe inside a `<script>` block.
pub fn js_string(raw: &str) -> String {
    serde_json::Value::String(raw.to_string())
        .to_string()
        .replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#x27;&amp;&#x27;&lt;/a&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_js_string_quotes_and_escapes() {
        assert_eq!(js_string("/a/b?x=1"), r#""/a/b?x=1""#);
        assert_eq!(js_string(r#"/x"';"#), r#""/x\"';""#);
    }

    #[test]
    fn test_js_string_cannot_close_script() {
        let literal = js_string("/</script><script>alert(1)</script>");
        assert!(!literal.contains("</script>"));
    }
}
