//! Bilingual dictionary endpoints.
//!
//! Search and suggestions go through the main backend; random-word lookups
//! are served from a separate host and need no authentication.

use tracing::warn;

use crate::config::endpoints;
use crate::error::{ApiError, Result};
use crate::http::ApiRequest;
use crate::types::{ApiResponse, Word};
use crate::LacquerClient;

/// Dictionary language selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    English,
    Vietnamese,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Vietnamese => "vn",
        }
    }

    /// The other language, for the UI's language toggle.
    pub fn toggled(&self) -> Self {
        match self {
            Language::English => Language::Vietnamese,
            Language::Vietnamese => Language::English,
        }
    }

    fn search_endpoint(&self) -> &'static str {
        match self {
            Language::English => endpoints::DICTIONARY_SEARCH_EN,
            Language::Vietnamese => endpoints::DICTIONARY_SEARCH_VN,
        }
    }

    fn random_endpoint(&self) -> &'static str {
        match self {
            Language::English => endpoints::RANDOM_WORD_EN,
            Language::Vietnamese => endpoints::RANDOM_WORD_VN,
        }
    }

    /// Whether a decoded entry has the shape this language promises.
    fn matches(&self, word: &Word) -> bool {
        matches!(
            (self, word),
            (Language::English, Word::English(_))
                | (Language::Vietnamese, Word::Vietnamese(_))
        )
    }
}

impl LacquerClient {
    /// Prefix suggestions for the search box.
    pub async fn search_suggestions(&self, language: Language, prefix: &str) -> Result<Vec<String>> {
        let request = ApiRequest::get().query("prefix", prefix);
        self.api()
            .request::<Vec<String>>(language.search_endpoint(), request)
            .await?
            .into_data()
    }

    /// Full dictionary lookup of one word.
    pub async fn lookup_word(&self, language: Language, word: &str) -> Result<Word> {
        let request = ApiRequest::get().query("word", word);
        let entry = self
            .api()
            .request::<Word>(language.search_endpoint(), request)
            .await?
            .into_data()?;

        if !language.matches(&entry) {
            return Err(ApiError::Parse(format!(
                "unexpected {} word structure",
                language.code()
            )));
        }
        Ok(entry)
    }

    /// Fetch a random word. Unauthenticated; uses the dictionary host.
    ///
    /// The backend answers with a one-element array in the envelope.
    pub async fn random_word(&self, language: Language) -> Result<Word> {
        let url = format!(
            "{}{}",
            self.config().dictionary_url,
            language.random_endpoint()
        );

        let response = self.http().get(&url).send().await.map_err(|e| {
            warn!(error = %e, %url, "random word request failed");
            ApiError::Network(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Http {
                status: status.as_u16(),
                message: format!("HTTP error: {}", status.as_u16()),
            });
        }

        let envelope: ApiResponse<Vec<Word>> = response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;

        let entry = envelope
            .into_data()?
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::Api("No random word found".into()))?;

        if !language.matches(&entry) {
            return Err(ApiError::Parse(format!(
                "unexpected {} word structure",
                language.code()
            )));
        }
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_codes() {
        assert_eq!(Language::English.code(), "en");
        assert_eq!(Language::Vietnamese.code(), "vn");
    }

    #[test]
    fn toggle_flips_language() {
        assert_eq!(Language::English.toggled(), Language::Vietnamese);
        assert_eq!(Language::Vietnamese.toggled(), Language::English);
    }

    #[test]
    fn shape_check_rejects_cross_language_entries() {
        let english: Word = serde_json::from_str(
            r#"{"word": "tea", "wordTypes": [{"type": "noun", "definitions": [], "examples": []}]}"#,
        )
        .unwrap();
        assert!(Language::English.matches(&english));
        assert!(!Language::Vietnamese.matches(&english));
    }
}
