//! Authentication and profile operations.
//!
//! Login, signup, and resend-verification talk to the backend directly,
//! without the bearer header and without the 401-invalidation side effect —
//! a credential rejection on the login route must not clear an unrelated
//! stored session. Profile reads and writes go through the authenticated
//! request path.
//!
//! These operations never propagate an error to the caller; failures land
//! in the session's `error` field and show up as a `false`/`None`/failure
//! outcome, which is what the auth forms render inline.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::captcha::CaptchaAction;
use crate::config::endpoints;
use crate::error::{ApiError, Result};
use crate::http::{ApiRequest, Redirect};
use crate::types::{
    ApiResponse, AuthOutcome, LoginData, LoginRequest, ProfileUpdate, ResendVerificationRequest,
    SignupRequest, UserProfile,
};
use crate::LacquerClient;

impl LacquerClient {
    /// Sign in with email and password.
    ///
    /// On success the token/user-id/username triple is persisted and
    /// committed to the session, and `true` is returned. On failure the
    /// session is left untouched apart from `error`, and `false` is
    /// returned. Never retries.
    pub async fn login(&self, email: &str, password: &str) -> bool {
        self.session().start_loading();

        let recaptcha_token = match self.captcha_token(CaptchaAction::Login).await {
            Ok(token) => token,
            Err(error) => {
                self.session().finish(Some(error.to_string()));
                return false;
            }
        };

        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
            recaptcha_token,
        };

        let envelope: ApiResponse<LoginData> =
            match self.auth_post(endpoints::LOGIN, &body).await {
                Ok(envelope) => envelope,
                Err(error) => {
                    self.session().finish(Some(error.to_string()));
                    return false;
                }
            };

        let data = match envelope.into_data() {
            Ok(data) => data,
            Err(error) => {
                self.session().finish(Some(error.to_string()));
                return false;
            }
        };

        if let Err(error) = self
            .session()
            .commit(&data.token, &data.user_id, &data.username)
        {
            self.session()
                .finish(Some(format!("Failed to persist session: {error}")));
            return false;
        }

        true
    }

    /// Register a new account.
    ///
    /// Does not sign the caller in; the account must complete email
    /// verification before login succeeds.
    pub async fn signup(&self, username: &str, email: &str, password: &str) -> AuthOutcome {
        self.session().start_loading();

        let recaptcha_token = match self.captcha_token(CaptchaAction::Signup).await {
            Ok(token) => token,
            Err(error) => return self.auth_failure(error),
        };

        let body = SignupRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            recaptcha_token,
        };

        match self
            .auth_post::<serde_json::Value>(endpoints::SIGNUP, &body)
            .await
        {
            Ok(envelope) => {
                self.session().finish(None);
                AuthOutcome {
                    success: envelope.success,
                    message: envelope.message,
                }
            }
            Err(error) => self.auth_failure(error),
        }
    }

    /// Re-trigger the verification email for an unverified account.
    pub async fn resend_verification(&self, email: &str) -> AuthOutcome {
        self.session().start_loading();

        let recaptcha_token = match self.captcha_token(CaptchaAction::ResendVerification).await {
            Ok(token) => token,
            Err(error) => return self.auth_failure(error),
        };

        let body = ResendVerificationRequest {
            email: email.to_string(),
            recaptcha_token,
        };

        match self
            .auth_post::<serde_json::Value>(endpoints::RESEND_VERIFICATION, &body)
            .await
        {
            Ok(envelope) => {
                self.session().finish(None);
                AuthOutcome {
                    success: envelope.success,
                    message: envelope.message,
                }
            }
            Err(error) => self.auth_failure(error),
        }
    }

    /// Fetch the signed-in user's full profile.
    ///
    /// `None` means "could not load" (unauthenticated, or the call failed
    /// and was logged) — not "no profile exists".
    pub async fn get_profile(&self) -> Option<UserProfile> {
        if !self.session().is_authenticated() {
            return None;
        }

        match self
            .api()
            .request::<UserProfile>(endpoints::PROFILE, ApiRequest::get())
            .await
        {
            Ok(envelope) => match envelope.into_data() {
                Ok(profile) => Some(profile),
                Err(error) => {
                    warn!(%error, "profile fetch rejected");
                    None
                }
            },
            Err(error) => {
                warn!(%error, "failed to fetch profile");
                None
            }
        }
    }

    /// Partially update the signed-in user's profile.
    ///
    /// When the update carried a new username, the session (storage and
    /// memory) picks it up immediately, no re-login needed.
    pub async fn update_profile(&self, update: ProfileUpdate) -> Option<UserProfile> {
        if !self.session().is_authenticated() {
            return None;
        }

        let new_username = update.username.clone();
        let request = match ApiRequest::put_json(&update) {
            Ok(request) => request,
            Err(error) => {
                warn!(%error, "failed to encode profile update");
                return None;
            }
        };

        match self
            .api()
            .request::<UserProfile>(endpoints::PROFILE, request)
            .await
        {
            Ok(envelope) => match envelope.into_data() {
                Ok(profile) => {
                    if let Some(username) = new_username {
                        if self.session().username().as_deref() != Some(username.as_str()) {
                            if let Err(error) = self.session().update_username(&username) {
                                warn!(%error, "failed to persist updated username");
                            }
                        }
                    }
                    Some(profile)
                }
                Err(error) => {
                    warn!(%error, "profile update rejected");
                    None
                }
            },
            Err(error) => {
                warn!(%error, "failed to update profile");
                None
            }
        }
    }

    /// Sign out: clear storage and memory, then send the user to the login
    /// screen. Safe to call when already logged out.
    pub fn logout(&self) {
        self.session().clear();
        self.redirect(Redirect::Login);
    }

    /// Dismiss the displayed auth error.
    pub fn clear_error(&self) {
        self.session().clear_error();
    }

    fn redirect(&self, target: Redirect) {
        self.api().fire_redirect(target);
    }

    fn auth_failure(&self, error: ApiError) -> AuthOutcome {
        let message = error.to_string();
        self.session().finish(Some(message.clone()));
        AuthOutcome {
            success: false,
            message,
        }
    }

    /// Obtain a fresh action-scoped verification token, rejecting the
    /// submission locally when the provider yields nothing.
    async fn captcha_token(&self, action: CaptchaAction) -> Result<String> {
        let token = self.captcha().token(action).await?;
        if token.trim().is_empty() {
            return Err(ApiError::Validation(format!(
                "Missing bot-verification token for {}",
                action.as_str()
            )));
        }
        Ok(token)
    }

    /// Unauthenticated POST used by the auth routes. Parses the envelope on
    /// any status; a non-2xx becomes an error carrying the server's message
    /// (or a synthesized one when the body was not parseable).
    async fn auth_post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<ApiResponse<T>> {
        let url = format!("{}{}", self.config().base_url, path);
        let response = self
            .http()
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, %url, "auth request failed");
                ApiError::Network(e.to_string())
            })?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<ApiResponse<T>>()
                .await
                .map_err(|e| ApiError::Parse(e.to_string()));
        }

        let message = match response.json::<ApiResponse<T>>().await {
            Ok(envelope) => envelope.message,
            Err(_) => format!("HTTP error: {}", status.as_u16()),
        };
        Err(ApiError::Http {
            status: status.as_u16(),
            message,
        })
    }
}
