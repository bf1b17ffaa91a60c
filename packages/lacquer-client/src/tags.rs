//! Tag endpoints.

use crate::config::endpoints;
use crate::error::Result;
use crate::http::ApiRequest;
use crate::types::{Tag, TagForm, TagList};
use crate::LacquerClient;

impl LacquerClient {
    /// List the user's tags.
    pub async fn list_tags(&self) -> Result<TagList> {
        self.api()
            .request::<TagList>(endpoints::TAGS, ApiRequest::get())
            .await?
            .into_data()
    }

    /// Create a tag.
    pub async fn create_tag(&self, form: &TagForm) -> Result<Tag> {
        self.api()
            .request::<Tag>(endpoints::TAGS, ApiRequest::post_json(form)?)
            .await?
            .into_data()
    }

    /// Update a tag.
    pub async fn update_tag(&self, tag_id: &str, form: &TagForm) -> Result<Tag> {
        let path = format!("{}/{}", endpoints::TAGS, tag_id);
        self.api()
            .request::<Tag>(&path, ApiRequest::put_json(form)?)
            .await?
            .into_data()
    }

    /// Delete a tag. Returns the server's confirmation message.
    pub async fn delete_tag(&self, tag_id: &str) -> Result<String> {
        let path = format!("{}/{}", endpoints::TAGS, tag_id);
        self.api()
            .request::<serde_json::Value>(&path, ApiRequest::delete())
            .await?
            .into_message()
    }
}
