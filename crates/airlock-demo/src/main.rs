//! Demo app: a public page, a protected page, and Clerk login/logout.
//!
//! ```text
//! CLERK_PUBLISHABLE_KEY=pk_... CLERK_SECRET_KEY=sk_... RUST_LOG=debug airlock-demo
//! ```

use std::net::SocketAddr;

use airlock_auth::Airlock;
use airlock_auth_clerk::ClerkSettings;
use anyhow::Context;
use axum::Router;
use axum::extract::FromRef;
use axum::routing::get;
use clap::Parser;

mod pages;

#[derive(Debug, Parser)]
#[command(name = "airlock-demo", version, about = "Clerk-guarded axum demo")]
struct Cli {
    /// Address to listen on.
    #[arg(long, env = "AIRLOCK_BIND", default_value = "127.0.0.1:8000")]
    bind: SocketAddr,

    #[command(flatten)]
    clerk: ClerkSettings,
}

#[derive(Clone)]
struct AppState {
    airlock: Airlock,
}

impl FromRef<AppState> for Airlock {
    fn from_ref(state: &AppState) -> Self {
        state.airlock.clone()
    }
}

fn app(airlock: Airlock) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/protected", get(pages::protected))
        .merge(airlock_auth_routes::router(airlock.clone()))
        .with_state(AppState { airlock })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,airlock=debug".into()),
        )
        .init();

    let cli = Cli::parse();
    tracing::debug!(settings = ?cli.clerk, "Loaded Clerk settings");

    let airlock = airlock_auth_clerk::airlock(&cli.clerk).context("invalid Clerk settings")?;

    let listener = tokio::net::TcpListener::bind(cli.bind)
        .await
        .with_context(|| format!("failed to bind {}", cli.bind))?;
    tracing::info!("Listening on http://{}", cli.bind);

    axum::serve(listener, app(airlock))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use airlock_auth::RouteSettings;
    use airlock_auth::testing::{StaticVerifier, TestWidget};
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use std::sync::Arc;
    use tower::ServiceExt;

    #[test]
    fn test_cli_parses_bind_and_clerk_flags() {
        let cli = Cli::try_parse_from([
            "airlock-demo",
            "--bind",
            "0.0.0.0:9000",
            "--publishable-key",
            "pk_test_x",
            "--secret-key",
            "sk_test_x",
        ])
        .unwrap();
        assert_eq!(cli.bind.port(), 9000);
        assert_eq!(cli.clerk.login_route, "/login");
    }

    #[tokio::test]
    async fn test_app_wires_pages_and_auth_routes() {
        let airlock = Airlock::new(
            Arc::new(StaticVerifier::signed_out()),
            Arc::new(TestWidget),
            RouteSettings::default(),
        )
        .unwrap();
        let app = app(airlock);

        for (uri, status) in [
            ("/", StatusCode::OK),
            ("/protected", StatusCode::SEE_OTHER),
            ("/login", StatusCode::OK),
            ("/logout", StatusCode::METHOD_NOT_ALLOWED),
        ] {
            let req = Request::builder()
                .uri(uri)
                .header(header::HOST, "localhost:8000")
                .body(Body::empty())
                .unwrap();
            let resp = app.clone().oneshot(req).await.unwrap();
            assert_eq!(resp.status(), status, "{uri}");
        }
    }
}
