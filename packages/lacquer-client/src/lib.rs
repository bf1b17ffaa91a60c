//! Client library for the LacQuer Vietnamese-culture learning platform.
//!
//! Two pieces form the core: the [`SessionStore`], which owns the
//! token/user-id/username triple and its durable persistence, and the
//! [`ApiClient`], which performs one authenticated round trip and reacts to
//! a 401 by clearing the session. [`LacquerClient`] ties them together and
//! adds typed bindings for every backend surface the application consumes:
//! auth and profile, tags, decks, badges, and the bilingual dictionary.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use lacquer_client::{ApiConfig, FileStorage, LacquerClient, StaticCaptcha};
//!
//! let client = LacquerClient::new(
//!     ApiConfig::from_env(),
//!     Arc::new(FileStorage::new("session.json")),
//!     Arc::new(StaticCaptcha::new("dev")),
//! )?;
//!
//! client.bootstrap();
//! if client.login("demo@example.com", "password123").await {
//!     let tags = client.list_tags().await?;
//!     println!("{} tags", tags.count);
//! }
//! ```

pub mod auth;
pub mod badges;
pub mod captcha;
pub mod config;
pub mod decks;
pub mod dictionary;
pub mod error;
pub mod http;
pub mod session;
pub mod storage;
pub mod tags;
pub mod types;

pub use captcha::{CaptchaAction, CaptchaProvider, StaticCaptcha};
pub use config::{endpoints, ApiConfig};
pub use dictionary::Language;
pub use error::{ApiError, Result};
pub use http::{ApiClient, ApiRequest, Redirect, RedirectHook};
pub use session::{AuthState, SessionStore};
pub use storage::{FileStorage, MemoryStorage, SessionStorage};
pub use types::*;

use std::sync::Arc;

/// The LacQuer client: session store, API client, and typed endpoints.
///
/// Cloning is cheap and all clones share the same session.
#[derive(Clone)]
pub struct LacquerClient {
    api: ApiClient,
    session: SessionStore,
    captcha: Arc<dyn CaptchaProvider>,
    config: ApiConfig,
    http: reqwest::Client,
}

impl LacquerClient {
    /// Create a client over the given storage and captcha provider.
    pub fn new(
        config: ApiConfig,
        storage: Arc<dyn SessionStorage>,
        captcha: Arc<dyn CaptchaProvider>,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Config(e.to_string()))?;

        let session = SessionStore::new(storage);
        let api = ApiClient::new(
            http.clone(),
            config.clone(),
            session.clone(),
            http::noop_redirect(),
        );

        Ok(Self {
            api,
            session,
            captcha,
            config,
            http,
        })
    }

    /// Install the navigation callback invoked on logout and on forced
    /// session invalidation.
    pub fn with_redirect_hook(mut self, hook: RedirectHook) -> Self {
        self.api = ApiClient::new(
            self.http.clone(),
            self.config.clone(),
            self.session.clone(),
            hook,
        );
        self
    }

    /// Hydrate the session from durable storage. Run once at startup.
    pub fn bootstrap(&self) {
        self.session.bootstrap();
    }

    /// The shared session store.
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Snapshot of the current auth state.
    pub fn state(&self) -> AuthState {
        self.session.state()
    }

    /// The low-level API client.
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// The endpoint configuration.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn captcha(&self) -> &dyn CaptchaProvider {
        self.captcha.as_ref()
    }
}
