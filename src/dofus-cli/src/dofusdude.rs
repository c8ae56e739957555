//! HTTP client for the DofusDude item API.

use std::time::Duration;

use dofus::search::{ItemCategory, SearchError, SearchHit, SearchProvider};
use serde::Deserialize;

const TIMEOUT: Duration = Duration::from_secs(10);

/// Blocking client; one agent is shared by every request, including the
/// concurrent search variants
pub struct DofusDudeClient {
    agent: ureq::Agent,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ApiItem {
    ankama_id: u64,
    name: String,
    #[serde(default)]
    level: Option<u32>,
    #[serde(default)]
    item_subtype: Option<NameId>,
    #[serde(default)]
    image_urls: Option<ImageUrls>,
}

#[derive(Debug, Deserialize)]
struct NameId {
    #[serde(default)]
    name_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ImageUrls {
    #[serde(default)]
    icon: Option<String>,
    #[serde(default)]
    sd: Option<String>,
}

impl ApiItem {
    fn into_hit(self, category: Option<ItemCategory>) -> SearchHit {
        let subtype = self
            .item_subtype
            .and_then(|s| s.name_id)
            .or_else(|| category.map(|c| c.endpoint().to_string()));
        let images = self.image_urls.unwrap_or_default();

        SearchHit {
            ankama_id: self.ankama_id,
            name: self.name,
            subtype,
            level: self.level,
            icon_url: images.icon,
            image_url: images.sd,
        }
    }
}

impl DofusDudeClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(TIMEOUT).build();
        Self {
            agent,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn get_items(&self, url: &str, query: &[(&str, &str)]) -> Result<Vec<SearchHit>, SearchError> {
        let mut request = self.agent.get(url);
        for (key, value) in query {
            request = request.query(key, value);
        }

        tracing::debug!(url, ?query, "search request");
        let resp = request.call().map_err(|e| request_error(url, e))?;
        let items: Vec<ApiItem> = resp
            .into_json()
            .map_err(|e| SearchError::Decode(e.to_string()))?;
        Ok(items.into_iter().map(|item| item.into_hit(None)).collect())
    }
}

fn request_error(url: &str, error: ureq::Error) -> SearchError {
    match error {
        ureq::Error::Status(status, _) => SearchError::Status {
            status,
            url: url.to_string(),
        },
        ureq::Error::Transport(t) => SearchError::Transport(t.to_string()),
    }
}

impl SearchProvider for DofusDudeClient {
    fn search_items(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, SearchError> {
        let url = format!("{}/items/search", self.base_url);
        let limit = limit.to_string();
        self.get_items(&url, &[("query", query), ("limit", limit.as_str())])
    }

    fn search_pets(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, SearchError> {
        let url = format!("{}/items/equipment/search", self.base_url);
        let limit = limit.to_string();
        self.get_items(
            &url,
            &[
                ("query", query),
                ("limit", limit.as_str()),
                ("filter[type.name_id]", "Pet"),
            ],
        )
    }

    fn item_by_id(&self, id: u64, category: ItemCategory) -> Result<Option<SearchHit>, SearchError> {
        let url = format!("{}/items/{}/{}", self.base_url, category.endpoint(), id);
        tracing::debug!(url = %url, "item request");

        match self.agent.get(&url).call() {
            Ok(resp) => {
                let item: ApiItem = resp
                    .into_json()
                    .map_err(|e| SearchError::Decode(e.to_string()))?;
                Ok(Some(item.into_hit(Some(category))))
            }
            Err(ureq::Error::Status(404, _)) => Ok(None),
            Err(e) => Err(request_error(&url, e)),
        }
    }
}
