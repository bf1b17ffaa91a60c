//! Bot-verification tokens.
//!
//! Login, signup, and resend-verification each require a freshly generated,
//! action-scoped token from the challenge service. The provider is injected
//! so tests and trusted environments can substitute a fixed token.

use async_trait::async_trait;

use crate::error::ApiError;

/// The action a verification token is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptchaAction {
    Login,
    Signup,
    ResendVerification,
}

impl CaptchaAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaptchaAction::Login => "login",
            CaptchaAction::Signup => "signup",
            CaptchaAction::ResendVerification => "resend_verification",
        }
    }
}

/// Source of bot-verification tokens.
///
/// An empty or missing token rejects the submission client-side before any
/// network call is made.
#[async_trait]
pub trait CaptchaProvider: Send + Sync {
    async fn token(&self, action: CaptchaAction) -> Result<String, ApiError>;
}

/// A provider returning a fixed token. Useful in tests and against backends
/// that skip challenge verification.
pub struct StaticCaptcha {
    token: String,
}

impl StaticCaptcha {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl CaptchaProvider for StaticCaptcha {
    async fn token(&self, _action: CaptchaAction) -> Result<String, ApiError> {
        Ok(self.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_provider_returns_its_token() {
        let provider = StaticCaptcha::new("valid");
        let token = provider.token(CaptchaAction::Login).await.unwrap();
        assert_eq!(token, "valid");
    }

    #[test]
    fn action_names() {
        assert_eq!(CaptchaAction::Signup.as_str(), "signup");
        assert_eq!(
            CaptchaAction::ResendVerification.as_str(),
            "resend_verification"
        );
    }
}
