//! Provider-neutral request representation handed to the verifier.

use axum::body::{Body, Bytes};
use axum::extract::OriginalUri;
use axum_extra::extract::cookie::CookieJar;
use http::{HeaderMap, Method, Request, Uri};
use serde::{Deserialize, Serialize};

use crate::AuthError;

/// Default cap when buffering a request body for verification (2 MiB).
pub const DEFAULT_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Where the scheme half of the request origin comes from.
///
/// Axum only sees an absolute URI for HTTP/2 and proxy-style requests, so
/// an app served over TLS by a reverse proxy looks like plain `http` unless
/// the proxy's `X-Forwarded-Proto` header is trusted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemeSource {
    /// The request URI's scheme, else `http`.
    #[default]
    Direct,
    /// The first `X-Forwarded-Proto` value when it is `http` or `https`.
    /// Only enable behind a proxy that overwrites the header.
    ForwardedProto,
}

impl SchemeSource {
    fn scheme<'a>(self, uri: &'a Uri, headers: &'a HeaderMap) -> &'a str {
        let forwarded = match self {
            SchemeSource::Direct => None,
            SchemeSource::ForwardedProto => headers
                .get(X_FORWARDED_PROTO)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(',').next())
                .map(str::trim)
                .and_then(|proto| {
                    ["https", "http"]
                        .into_iter()
                        .find(|known| proto.eq_ignore_ascii_case(known))
                }),
        };
        forwarded
            .or_else(|| uri.scheme_str())
            .unwrap_or("http")
    }
}

const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// An inbound request reduced to what an identity verifier needs.
///
/// Built once per authentication check and dropped after the verifier
/// returns. URL components are taken byte-for-byte from the transport.
#[derive(Debug, Clone)]
pub struct NormalizedRequest {
    method: Method,
    url: String,
    origin: String,
    path_and_query: String,
    headers: HeaderMap,
    cookies: CookieJar,
    body: Bytes,
}

impl NormalizedRequest {
    /// Build from request parts and an already-buffered body.
    ///
    /// Inside nested routers the pre-nesting URI is used, so the path
    /// reflects what the client actually requested.
    pub fn from_parts(parts: &http::request::Parts, body: Bytes) -> Result<Self, AuthError> {
        Self::from_parts_with(parts, body, SchemeSource::Direct)
    }

    /// [`from_parts`](Self::from_parts), taking the scheme from `scheme`.
    pub fn from_parts_with(
        parts: &http::request::Parts,
        body: Bytes,
        scheme: SchemeSource,
    ) -> Result<Self, AuthError> {
        let uri = parts
            .extensions
            .get::<OriginalUri>()
            .map(|original| &original.0)
            .unwrap_or(&parts.uri);
        Self::build(&parts.method, uri, &parts.headers, body, scheme)
    }

    /// Consume a full request, reading its body once.
    pub async fn from_request(request: Request<Body>, body_limit: usize) -> Result<Self, AuthError> {
        Self::from_request_with(request, body_limit, SchemeSource::Direct).await
    }

    /// [`from_request`](Self::from_request), taking the scheme from `scheme`.
    pub async fn from_request_with(
        request: Request<Body>,
        body_limit: usize,
        scheme: SchemeSource,
    ) -> Result<Self, AuthError> {
        let (parts, body) = request.into_parts();
        let body = axum::body::to_bytes(body, body_limit)
            .await
            .map_err(|e| AuthError::BodyRead(e.to_string()))?;
        Self::from_parts_with(&parts, body, scheme)
    }

    fn build(
        method: &Method,
        uri: &Uri,
        headers: &HeaderMap,
        body: Bytes,
        scheme: SchemeSource,
    ) -> Result<Self, AuthError> {
        let scheme = scheme.scheme(uri, headers);
        let host = match uri.authority() {
            Some(authority) => authority.as_str(),
            None => headers
                .get(http::header::HOST)
                .and_then(|v| v.to_str().ok())
                .filter(|h| !h.is_empty())
                .ok_or(AuthError::MissingHost)?,
        };

        let origin = format!("{scheme}://{host}");
        let path_and_query = uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/")
            .to_string();

        Ok(Self {
            method: method.clone(),
            url: format!("{origin}{path_and_query}"),
            origin,
            path_and_query,
            headers: headers.clone(),
            cookies: CookieJar::from_headers(headers),
            body,
        })
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Absolute URL of the request.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// `scheme://host[:port]` of the request.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Path plus query string, e.g. `/a/b?x=1`.
    pub fn path_and_query(&self) -> &str {
        &self.path_and_query
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Cookies sent with the request.
    pub fn cookies(&self) -> &CookieJar {
        &self.cookies
    }

    /// Value of the named cookie from the `Cookie` headers.
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(|cookie| cookie.value())
    }

    /// Bearer token from the `Authorization` header.
    pub fn bearer_token(&self) -> Option<&str> {
        self.headers
            .get(http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}
