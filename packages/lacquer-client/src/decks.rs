//! Deck endpoints.
//!
//! Deck creation and editing accept an optional cover image. With an image
//! the request goes out as multipart form data (no JSON content-type, the
//! boundary header must win); without one it is a plain JSON body.

use reqwest::multipart::{Form, Part};
use serde_json::json;

use crate::config::endpoints;
use crate::error::Result;
use crate::http::ApiRequest;
use crate::types::{Deck, DeckForm, DeckList, TaggedDecks, UploadFile};
use crate::LacquerClient;

fn deck_form_to_multipart(form: &DeckForm, image: UploadFile) -> Form {
    let mut multipart = Form::new().text("title", form.title.clone());
    if let Some(description) = &form.description {
        multipart = multipart.text("description", description.clone());
    }
    for tag in &form.tags {
        multipart = multipart.text("tags", tag.clone());
    }
    for card in &form.cards {
        multipart = multipart.text("cards", card.clone());
    }
    multipart.part(
        "image",
        Part::bytes(image.bytes).file_name(image.file_name),
    )
}

impl LacquerClient {
    /// List the user's decks plus the universal ones.
    pub async fn list_decks(&self) -> Result<DeckList> {
        self.api()
            .request::<DeckList>(endpoints::DECKS, ApiRequest::get())
            .await?
            .into_data()
    }

    /// List universal and other users' decks.
    pub async fn list_universal_decks(&self) -> Result<DeckList> {
        let path = format!("{}/uni", endpoints::DECKS);
        self.api()
            .request::<DeckList>(&path, ApiRequest::get())
            .await?
            .into_data()
    }

    /// List decks carrying a given tag.
    pub async fn decks_by_tag(&self, tag_id: &str) -> Result<DeckList> {
        let path = format!("{}/tag/{}", endpoints::DECKS, tag_id);
        self.api()
            .request::<DeckList>(&path, ApiRequest::get())
            .await?
            .into_data()
    }

    /// List all decks grouped by their tags.
    pub async fn decks_grouped_by_tag(&self) -> Result<Vec<TaggedDecks>> {
        let path = format!("{}/tag", endpoints::DECKS);
        self.api()
            .request::<Vec<TaggedDecks>>(&path, ApiRequest::get())
            .await?
            .into_data()
    }

    /// List decks with no tags at all.
    pub async fn decks_without_tags(&self) -> Result<DeckList> {
        let path = format!("{}/notag", endpoints::DECKS);
        self.api()
            .request::<DeckList>(&path, ApiRequest::get())
            .await?
            .into_data()
    }

    /// Fetch a single deck.
    pub async fn get_deck(&self, deck_id: &str) -> Result<Deck> {
        let path = format!("{}/{}", endpoints::DECKS, deck_id);
        self.api()
            .request::<Deck>(&path, ApiRequest::get())
            .await?
            .into_data()
    }

    /// Create a deck, optionally with a cover image.
    pub async fn create_deck(&self, form: &DeckForm, image: Option<UploadFile>) -> Result<Deck> {
        let request = match image {
            Some(image) => ApiRequest::post_multipart(deck_form_to_multipart(form, image)),
            None => ApiRequest::post_json(form)?,
        };
        self.api()
            .request::<Deck>(endpoints::DECKS, request)
            .await?
            .into_data()
    }

    /// Update a deck, optionally replacing its cover image.
    pub async fn update_deck(
        &self,
        deck_id: &str,
        form: &DeckForm,
        image: Option<UploadFile>,
    ) -> Result<Deck> {
        let path = format!("{}/{}", endpoints::DECKS, deck_id);
        let request = match image {
            Some(image) => ApiRequest::put_multipart(deck_form_to_multipart(form, image)),
            None => ApiRequest::put_json(form)?,
        };
        self.api()
            .request::<Deck>(&path, request)
            .await?
            .into_data()
    }

    /// Delete a deck. Returns the server's confirmation message.
    pub async fn delete_deck(&self, deck_id: &str) -> Result<String> {
        let path = format!("{}/{}", endpoints::DECKS, deck_id);
        self.api()
            .request::<serde_json::Value>(&path, ApiRequest::delete())
            .await?
            .into_message()
    }

    /// Add a card to a deck. Returns the updated deck.
    pub async fn add_card_to_deck(&self, deck_id: &str, card_id: &str) -> Result<Deck> {
        let path = format!("{}/{}/cards", endpoints::DECKS, deck_id);
        let body = json!({ "cardId": card_id });
        self.api()
            .request::<Deck>(&path, ApiRequest::post_json(&body)?)
            .await?
            .into_data()
    }

    /// Remove a card from a deck. Returns the updated deck.
    pub async fn remove_card_from_deck(&self, deck_id: &str, card_id: &str) -> Result<Deck> {
        let path = format!("{}/{}/cards/{}", endpoints::DECKS, deck_id, card_id);
        self.api()
            .request::<Deck>(&path, ApiRequest::delete())
            .await?
            .into_data()
    }

    /// Toggle a deck's completion state. Returns the updated deck.
    pub async fn toggle_deck_completion(&self, deck_id: &str) -> Result<Deck> {
        let path = format!("{}/{}/finish", endpoints::DECKS, deck_id);
        self.api()
            .request::<Deck>(&path, ApiRequest::put())
            .await?
            .into_data()
    }
}
