//! Login and logout routes for airlock-auth.
//!
//! Mount into the host app with `merge`:
//!
//! ```ignore
//! let app = Router::new()
//!     .route("/", get(index))
//!     .merge(airlock_auth_routes::router(airlock.clone()))
//!     .with_state(state);
//! ```
//!
//! Paths come from the [`RouteSettings`](airlock_auth::RouteSettings) held
//! by the [`Airlock`].

use airlock_auth::Airlock;
use axum::Router;
use axum::routing::{get, post};

mod login;
mod logout;

pub use login::login_target;
pub use logout::SESSION_COOKIES;

/// Router serving the login route (GET) and the logout route (POST).
///
/// Logout revokes server-side state, so a cross-site `GET` (an `<img>`
/// tag, a prefetch) cannot trigger it.
///
/// Carries its own state, so it merges into a router with any state type.
pub fn router<S>(airlock: Airlock) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let routes = airlock.routes().clone();
    log::debug!(
        "Mounting auth routes: login={}, logout={}",
        routes.login_route,
        routes.logout_route
    );

    Router::new()
        .route(&routes.login_route, get(login::login))
        .route(&routes.logout_route, post(logout::logout))
        .with_state(airlock)
}
