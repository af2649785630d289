//! HTML pages for the demo.

use airlock_auth::widget::escape_html;
use airlock_auth::{Airlock, Identity, OptionalUser, RequireAuth};
use axum::extract::State;
use axum::response::Html;
use chrono::DateTime;
use serde_json::Value;

fn layout(title: &str, head: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<link rel="stylesheet" href="https://unpkg.com/mvp.css">
{head}
</head>
<body>
<main>
{body}
</main>
</body>
</html>
"#,
        title = escape_html(title),
    )
}

/// Public page; content depends on whether someone is signed in.
pub(crate) async fn index(
    State(airlock): State<Airlock>,
    OptionalUser(user): OptionalUser,
) -> Html<String> {
    let routes = airlock.routes();
    let links = match &user {
        Some(user) => {
            let who = user.primary_email().unwrap_or(user.id.as_str());
            format!(
                r#"<li>Logged in as {}</li>
<li><a href="/protected">protected</a></li>
<li><form method="post" action="{}"><button type="submit">logout</button></form></li>"#,
                escape_html(who),
                escape_html(&routes.logout_route),
            )
        }
        None => format!(
            r#"<li><a href="{}">login</a></li>
<li><a href="/protected">protected</a></li>"#,
            escape_html(&routes.login_route),
        ),
    };

    let body = format!(
        "<h1>Airlock demo</h1>\n<ul>\n{links}\n</ul>\n<p>Authentication is handled by Clerk via session tokens in cookies.</p>"
    );
    Html(layout(
        "Airlock demo",
        &airlock.widget().session_sync(user.is_some()),
        &body,
    ))
}

/// Signed-in only; shows the identity record.
pub(crate) async fn protected(RequireAuth(user): RequireAuth) -> Html<String> {
    let body = format!(
        r#"<h1>Protected view</h1>
<p><a href="/">home</a></p>
<h2>User record</h2>
<p><strong>Last sign in at: </strong>{}</p>
{}"#,
        last_sign_in(&user),
        dump(&user),
    );
    Html(layout("Protected view", "", &body))
}

fn last_sign_in(user: &Identity) -> String {
    user.last_sign_in_at
        .and_then(DateTime::from_timestamp_millis)
        .map(|at| at.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "never".to_string())
}

fn dump(user: &Identity) -> String {
    let Ok(Value::Object(fields)) = serde_json::to_value(user) else {
        return String::new();
    };
    let rows: Vec<String> = fields
        .iter()
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            format!(
                "<li><strong>{}</strong>: {}</li>",
                escape_html(key),
                escape_html(&value)
            )
        })
        .collect();
    format!("<ul>\n{}\n</ul>", rows.join("\n"))
}
