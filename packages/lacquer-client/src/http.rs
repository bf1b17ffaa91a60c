//! The authenticated HTTP request path.
//!
//! One function, [`ApiClient::request`], performs a round trip against the
//! backend: it resolves the URL, attaches the bearer token when the session
//! holds one, and normalizes the result. A 401 response invalidates the
//! session as a side effect — the one place outside explicit login/logout
//! where session state is mutated by an unrelated data call.

use std::sync::Arc;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::error::{ApiError, Result};
use crate::session::SessionStore;
use crate::types::ApiResponse;

/// Where the host application should send the user after a session event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redirect {
    /// Ordinary logout: plain login screen.
    Login,
    /// Forced invalidation on 401: login screen with a "session expired"
    /// notice, distinct from a credential-rejection error.
    LoginSessionExpired,
}

/// Injected navigation callback, so the client stays testable without any
/// router or browser dependency.
pub type RedirectHook = Arc<dyn Fn(Redirect) + Send + Sync>;

pub(crate) fn noop_redirect() -> RedirectHook {
    Arc::new(|_| {})
}

enum RequestBody {
    Json(serde_json::Value),
    Multipart(reqwest::multipart::Form),
}

/// A request to a backend route: method, optional query, optional body.
///
/// JSON bodies get a `Content-Type: application/json` header; multipart
/// bodies must not, so the boundary header survives.
pub struct ApiRequest {
    method: Method,
    query: Vec<(&'static str, String)>,
    body: Option<RequestBody>,
}

impl ApiRequest {
    fn new(method: Method) -> Self {
        Self {
            method,
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn delete() -> Self {
        Self::new(Method::DELETE)
    }

    /// PUT with no body (e.g. toggling deck completion).
    pub fn put() -> Self {
        Self::new(Method::PUT)
    }

    pub fn post_json(body: &impl Serialize) -> Result<Self> {
        let mut request = Self::new(Method::POST);
        request.body = Some(RequestBody::Json(serde_json::to_value(body)?));
        Ok(request)
    }

    pub fn put_json(body: &impl Serialize) -> Result<Self> {
        let mut request = Self::new(Method::PUT);
        request.body = Some(RequestBody::Json(serde_json::to_value(body)?));
        Ok(request)
    }

    pub fn post_multipart(form: reqwest::multipart::Form) -> Self {
        let mut request = Self::new(Method::POST);
        request.body = Some(RequestBody::Multipart(form));
        request
    }

    pub fn put_multipart(form: reqwest::multipart::Form) -> Self {
        let mut request = Self::new(Method::PUT);
        request.body = Some(RequestBody::Multipart(form));
        request
    }

    /// Append a query parameter.
    pub fn query(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.query.push((key, value.into()));
        self
    }
}

/// Body shape of a non-envelope error response.
#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Performs authenticated round trips against the backend.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ApiConfig,
    session: SessionStore,
    on_redirect: RedirectHook,
}

impl ApiClient {
    pub(crate) fn new(
        http: reqwest::Client,
        config: ApiConfig,
        session: SessionStore,
        on_redirect: RedirectHook,
    ) -> Self {
        Self {
            http,
            config,
            session,
            on_redirect,
        }
    }

    pub(crate) fn fire_redirect(&self, target: Redirect) {
        (self.on_redirect)(target);
    }

    /// Perform one round trip and decode the response envelope.
    ///
    /// Response handling, in order of precedence:
    /// 1. 401 — clear the session (same path logout uses), fire the
    ///    redirect hook with [`Redirect::LoginSessionExpired`], and fail
    ///    with [`ApiError::Unauthorized`], regardless of the body.
    /// 2. Other non-2xx — surface the body's `message` field, or synthesize
    ///    `HTTP error: <status>` when the body is not parseable.
    /// 3. 2xx — return the envelope verbatim; the envelope's own `success`
    ///    flag is the caller's to check.
    pub async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        request: ApiRequest,
    ) -> Result<ApiResponse<T>> {
        let url = format!("{}{}", self.config.base_url, path);
        debug!(method = %request.method, %url, "api request");

        let mut builder = self.http.request(request.method, &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        builder = match request.body {
            Some(RequestBody::Json(value)) => builder
                .header(CONTENT_TYPE, "application/json")
                .json(&value),
            Some(RequestBody::Multipart(form)) => builder.multipart(form),
            None => builder.header(CONTENT_TYPE, "application/json"),
        };

        // Attach the bearer token when present. When it is absent the call
        // is still attempted; the backend answers 401 and the standard
        // invalidation path below handles it.
        if let Some(token) = self.session.token() {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(|e| {
            warn!(error = %e, %url, "api request failed");
            ApiError::Network(e.to_string())
        })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            warn!(%url, "session rejected by backend, clearing credentials");
            self.session.clear();
            (self.on_redirect)(Redirect::LoginSessionExpired);
            return Err(ApiError::Unauthorized);
        }

        if !status.is_success() {
            let message = match response.json::<ErrorBody>().await {
                Ok(body) => body.message,
                Err(_) => format!("HTTP error: {}", status.as_u16()),
            };
            return Err(ApiError::Http {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<ApiResponse<T>>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }
}
