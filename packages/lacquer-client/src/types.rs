//! Wire types for the LacQuer backend.
//!
//! Every response, success or failure, arrives in the same
//! `{success, message, data}` envelope; non-2xx responses may omit `data`.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

// =============================================================================
// Envelope
// =============================================================================

/// The uniform response envelope.
///
/// `data` is only meaningful when `success` is true. The API client returns
/// the envelope verbatim and never re-interprets the `success` flag; the
/// typed endpoint bindings use [`ApiResponse::into_data`] to turn a
/// `success: false` envelope into an [`ApiError::Api`].
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    // A missing data field decodes as None; no serde(default) here, since
    // that would put a T: Default bound on the Deserialize impl.
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Extract the payload, mapping a failure envelope to an error.
    pub fn into_data(self) -> Result<T, ApiError> {
        if !self.success {
            return Err(ApiError::Api(self.message));
        }
        self.data
            .ok_or_else(|| ApiError::Parse("response is missing the data field".into()))
    }

    /// Extract the message, mapping a failure envelope to an error.
    pub fn into_message(self) -> Result<String, ApiError> {
        if !self.success {
            return Err(ApiError::Api(self.message));
        }
        Ok(self.message)
    }
}

// =============================================================================
// Auth
// =============================================================================

/// Login request body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub recaptcha_token: String,
}

/// Signup request body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub recaptcha_token: String,
}

/// Resend-verification request body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResendVerificationRequest {
    pub email: String,
    pub recaptcha_token: String,
}

/// Payload of a successful login.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    pub token: String,
    pub user_id: String,
    pub username: String,
}

/// Outcome of signup / resend-verification, surfaced to the UI as-is.
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    pub success: bool,
    pub message: String,
}

/// Partial profile update. Omitted fields are left untouched server-side.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
}

/// How the account authenticates with the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    Local,
    Google,
}

/// Full user profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub about: String,
    pub auth_provider: AuthProvider,
    #[serde(default)]
    pub google_id: Option<String>,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub badges: Vec<serde_json::Value>,
    #[serde(default)]
    pub friendships: Vec<serde_json::Value>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

// =============================================================================
// Tags
// =============================================================================

/// A vocabulary tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Payload of `GET /tag`.
#[derive(Debug, Clone, Deserialize)]
pub struct TagList {
    pub count: usize,
    pub data: Vec<Tag>,
}

/// Fields for creating or editing a tag.
#[derive(Debug, Clone, Serialize)]
pub struct TagForm {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// =============================================================================
// Decks
// =============================================================================

/// A vocabulary deck. `owner` is `None` for universal decks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub img: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub cards: Vec<String>,
    #[serde(default)]
    pub is_finished: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Payload of the deck listing endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct DeckList {
    #[serde(default)]
    pub count: usize,
    pub data: Vec<Deck>,
}

/// One group in the decks-by-tag view.
#[derive(Debug, Clone, Deserialize)]
pub struct TaggedDecks {
    pub tag: Tag,
    pub decks: Vec<Deck>,
}

/// Fields for creating or editing a deck.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeckForm {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cards: Vec<String>,
}

/// An image attached to a deck or badge, submitted as multipart form data.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}

// =============================================================================
// Badges
// =============================================================================

/// An achievement badge.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon_url: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

// =============================================================================
// Dictionary
// =============================================================================

/// A dictionary entry, English or Vietnamese.
///
/// The two languages have different shapes on the wire; English entries
/// always carry `wordTypes` and Vietnamese entries always carry `meanings`,
/// which is what disambiguates the untagged enum.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Word {
    English(EnglishWord),
    Vietnamese(VietnameseWord),
}

impl Word {
    pub fn word(&self) -> &str {
        match self {
            Word::English(w) => &w.word,
            Word::Vietnamese(w) => &w.word,
        }
    }
}

/// An English dictionary entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnglishWord {
    pub word: String,
    #[serde(default)]
    pub pronunciation: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    pub word_types: Vec<WordType>,
}

/// One part-of-speech block of an English entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordType {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub definitions: Vec<String>,
    #[serde(default)]
    pub examples: Vec<String>,
}

/// A Vietnamese dictionary entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VietnameseWord {
    pub word: String,
    #[serde(default)]
    pub pronunciations: Vec<String>,
    #[serde(default)]
    pub difficulty_level: Option<String>,
    pub meanings: Vec<Meaning>,
}

/// One meaning block of a Vietnamese entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meaning {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    pub part_of_speech: PartOfSpeech,
    #[serde(default)]
    pub definitions: Vec<VietnameseDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartOfSpeech {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VietnameseDefinition {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    pub text: String,
    #[serde(default)]
    pub examples: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_envelope_without_data_decodes() {
        let envelope: ApiResponse<Tag> =
            serde_json::from_str(r#"{"success":false,"message":"Tag not found"}"#).unwrap();
        assert!(!envelope.success);
        assert!(envelope.data.is_none());
        let err = envelope.into_data().unwrap_err();
        assert!(matches!(err, ApiError::Api(m) if m == "Tag not found"));
    }

    #[test]
    fn success_envelope_yields_data() {
        let envelope: ApiResponse<TagList> = serde_json::from_str(
            r#"{
                "success": true,
                "message": "Tags retrieved successfully",
                "data": {
                    "count": 1,
                    "data": [{
                        "_id": "6827065e1c85d7e7a4b3cb5e",
                        "name": "cities",
                        "createdAt": "2025-05-16T09:33:18.263Z",
                        "updatedAt": "2025-05-16T09:33:18.263Z"
                    }]
                }
            }"#,
        )
        .unwrap();
        let tags = envelope.into_data().unwrap();
        assert_eq!(tags.count, 1);
        assert_eq!(tags.data[0].name, "cities");
        assert_eq!(tags.data[0].description, None);
    }

    #[test]
    fn profile_update_omits_unset_fields() {
        let update = ProfileUpdate {
            about: Some("Learning Vietnamese".into()),
            ..Default::default()
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({"about": "Learning Vietnamese"}));
    }

    #[test]
    fn english_word_disambiguates() {
        let word: Word = serde_json::from_str(
            r#"{
                "word": "lacquer",
                "pronunciation": "/ˈlakə/",
                "difficulty": "B2",
                "wordTypes": [{
                    "type": "noun",
                    "definitions": ["a varnish made from resin"],
                    "examples": ["a lacquer box"]
                }]
            }"#,
        )
        .unwrap();
        assert!(matches!(word, Word::English(_)));
        assert_eq!(word.word(), "lacquer");
    }

    #[test]
    fn vietnamese_word_disambiguates() {
        let word: Word = serde_json::from_str(
            r#"{
                "word": "sơn mài",
                "pronunciations": ["sən maj"],
                "difficulty_level": "intermediate",
                "meanings": [{
                    "part_of_speech": {"type": "danh từ"},
                    "definitions": [{"text": "nghệ thuật sơn truyền thống", "examples": []}]
                }]
            }"#,
        )
        .unwrap();
        assert!(matches!(word, Word::Vietnamese(_)));
    }
}
