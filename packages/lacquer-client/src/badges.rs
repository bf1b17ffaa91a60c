//! Badge endpoints.
//!
//! Badge create/update always go out as multipart form data because the
//! icon rides along as a file part; on update the icon is optional.

use reqwest::multipart::{Form, Part};

use crate::config::endpoints;
use crate::error::Result;
use crate::http::ApiRequest;
use crate::types::{Badge, UploadFile};
use crate::LacquerClient;

fn badge_multipart(name: &str, icon: Option<UploadFile>) -> Form {
    let mut form = Form::new().text("name", name.to_string());
    if let Some(icon) = icon {
        form = form.part("icon", Part::bytes(icon.bytes).file_name(icon.file_name));
    }
    form
}

impl LacquerClient {
    /// List all badges.
    pub async fn list_badges(&self) -> Result<Vec<Badge>> {
        self.api()
            .request::<Vec<Badge>>(endpoints::BADGES, ApiRequest::get())
            .await?
            .into_data()
    }

    /// Fetch a single badge.
    pub async fn get_badge(&self, badge_id: &str) -> Result<Badge> {
        let path = format!("{}/{}", endpoints::BADGES, badge_id);
        self.api()
            .request::<Badge>(&path, ApiRequest::get())
            .await?
            .into_data()
    }

    /// Create a badge with its icon.
    pub async fn create_badge(&self, name: &str, icon: UploadFile) -> Result<Badge> {
        let request = ApiRequest::post_multipart(badge_multipart(name, Some(icon)));
        self.api()
            .request::<Badge>(endpoints::BADGES, request)
            .await?
            .into_data()
    }

    /// Update a badge; the icon is only replaced when one is provided.
    pub async fn update_badge(
        &self,
        badge_id: &str,
        name: &str,
        icon: Option<UploadFile>,
    ) -> Result<Badge> {
        let path = format!("{}/{}", endpoints::BADGES, badge_id);
        let request = ApiRequest::put_multipart(badge_multipart(name, icon));
        self.api()
            .request::<Badge>(&path, request)
            .await?
            .into_data()
    }

    /// Delete a badge. Returns the server's confirmation message.
    pub async fn delete_badge(&self, badge_id: &str) -> Result<String> {
        let path = format!("{}/{}", endpoints::BADGES, badge_id);
        self.api()
            .request::<serde_json::Value>(&path, ApiRequest::delete())
            .await?
            .into_message()
    }

    /// Award a badge to the signed-in user.
    pub async fn award_badge(&self, badge_id: &str) -> Result<String> {
        let path = format!("{}/{}/award", endpoints::BADGES, badge_id);
        let body = serde_json::json!({});
        self.api()
            .request::<serde_json::Value>(&path, ApiRequest::post_json(&body)?)
            .await?
            .into_message()
    }
}
