pub mod youtube_client;

pub use youtube_client::{CategoryFile, YouTubeClient};

use anyhow::Result;
use tracing::{info, warn};

use crate::models::CategoryMap;

/// Anything that can produce the category id to name map
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CategorySource {
    async fn fetch_categories(&self) -> Result<CategoryMap>;
}

/// Fetch the category map once for the run
pub async fn load_categories<S: CategorySource + ?Sized>(source: &S) -> Result<CategoryMap> {
    let categories = source.fetch_categories().await?;
    if categories.is_empty() {
        warn!("Category lookup returned no categories");
    } else {
        info!(count = categories.len(), "Fetched video categories");
    }
    Ok(categories)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_categories_uses_source() -> Result<()> {
        let mut source = MockCategorySource::new();
        source
            .expect_fetch_categories()
            .times(1)
            .returning(|| Ok([(10, "Music"), (24, "Entertainment")].into_iter().collect()));

        let categories = load_categories(&source).await?;
        assert_eq!(categories.len(), 2);
        assert_eq!(categories.get(10), Some("Music"));
        Ok(())
    }

    #[tokio::test]
    async fn test_load_categories_propagates_failure() {
        let mut source = MockCategorySource::new();
        source
            .expect_fetch_categories()
            .returning(|| Err(anyhow::anyhow!("quota exceeded")));

        let err = load_categories(&source).await.unwrap_err();
        assert!(err.to_string().contains("quota exceeded"));
    }
}
