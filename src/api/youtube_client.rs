use anyhow::{Context, Result};
use reqwest::Client;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::CategorySource;
use crate::models::{CategoryListResponse, CategoryMap};

const YOUTUBE_API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// Client for the YouTube Data API `videoCategories.list` endpoint
pub struct YouTubeClient {
    client: Client,
    api_key: String,
    region_code: String,
}

impl YouTubeClient {
    pub fn new(api_key: String, region_code: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            region_code,
        }
    }

    fn categories_url(&self) -> String {
        format!(
            "{}/videoCategories?part=snippet&regionCode={}&key={}",
            YOUTUBE_API_BASE, self.region_code, self.api_key
        )
    }
}

#[async_trait::async_trait]
impl CategorySource for YouTubeClient {
    async fn fetch_categories(&self) -> Result<CategoryMap> {
        debug!(region = %self.region_code, "Requesting video categories");
        let response = self
            .client
            .get(self.categories_url())
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        let text = response.text().await.context("Failed to get response text")?;

        if !status.is_success() {
            anyhow::bail!("YouTube API request failed ({}): {}", status, text);
        }

        let body: CategoryListResponse =
            serde_json::from_str(&text).context("Failed to parse YouTube category response")?;
        CategoryMap::from_response(body)
    }
}

/// A saved `videoCategories.list` response on disk
pub struct CategoryFile {
    path: PathBuf,
}

impl CategoryFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait::async_trait]
impl CategorySource for CategoryFile {
    async fn fetch_categories(&self) -> Result<CategoryMap> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read category file {}", self.path.display()))?;
        let body: CategoryListResponse = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse category file {}", self.path.display()))?;
        CategoryMap::from_response(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_categories_url() {
        let client = YouTubeClient::new("secret".to_string(), "GB".to_string());
        assert_eq!(
            client.categories_url(),
            "https://www.googleapis.com/youtube/v3/videoCategories?part=snippet&regionCode=GB&key=secret"
        );
    }

    #[tokio::test]
    async fn test_category_file() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(
            file,
            r#"{{"items": [
                {{"id": "10", "snippet": {{"title": "Music"}}}},
                {{"id": "20", "snippet": {{"title": "Gaming"}}}}
            ]}}"#
        )?;

        let categories = CategoryFile::new(file.path()).fetch_categories().await?;
        assert_eq!(categories.len(), 2);
        assert_eq!(categories.get(20), Some("Gaming"));
        Ok(())
    }

    #[tokio::test]
    async fn test_category_file_errors() -> Result<()> {
        let missing = CategoryFile::new("no/such/categories.json");
        assert!(missing.fetch_categories().await.is_err());

        let mut file = NamedTempFile::new()?;
        write!(file, "not json")?;
        assert!(CategoryFile::new(file.path()).fetch_categories().await.is_err());
        Ok(())
    }
}
