use std::sync::Arc;
use std::time::Duration;
use crate::core::Matcher;
use crate::models::{CacheStats, IdeaRecord, ResultSet, UserProfile};
use crate::services::cache::{CacheError, CacheKey, CacheManager};
use crate::services::catalog::{CatalogError, IdeaCatalog};

/// Idea generation entry point: catalog fetch, caching and matching
pub struct IdeaService {
    catalog: Arc<dyn IdeaCatalog>,
    cache: Option<Arc<CacheManager>>,
    matcher: Matcher,
    fetch_timeout: Duration,
}

impl IdeaService {
    pub fn new(
        catalog: Arc<dyn IdeaCatalog>,
        cache: Option<Arc<CacheManager>>,
        matcher: Matcher,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            catalog,
            cache,
            matcher,
            fetch_timeout,
        }
    }

    pub fn catalog_name(&self) -> &'static str {
        self.catalog.name()
    }

    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(|cache| cache.stats())
    }

    /// Active catalog snapshot, from cache when possible
    ///
    /// The cache read and the backend fetch share the configured timeout.
    pub async fn load_catalog(&self) -> Result<Vec<IdeaRecord>, CatalogError> {
        let (ideas, from_cache) = tokio::time::timeout(self.fetch_timeout, self.read_or_fetch())
            .await
            .map_err(|_| CatalogError::Timeout(self.fetch_timeout))??;

        if !from_cache {
            if let Some(cache) = &self.cache {
                if let Err(e) = cache.set(&CacheKey::active_catalog(), &ideas).await {
                    tracing::warn!("Failed to cache catalog: {}", e);
                }
            }
        }

        Ok(ideas)
    }

    async fn read_or_fetch(&self) -> Result<(Vec<IdeaRecord>, bool), CatalogError> {
        if let Some(cache) = &self.cache {
            match cache.get::<Vec<IdeaRecord>>(&CacheKey::active_catalog()).await {
                Ok(ideas) => return Ok((ideas, true)),
                Err(CacheError::CacheMiss(_)) => {}
                Err(e) => tracing::warn!("Catalog cache read failed, fetching from source: {}", e),
            }
        }

        let ideas = self.catalog.fetch_active().await?;
        tracing::info!("Fetched {} active ideas from {} catalog", ideas.len(), self.catalog.name());

        Ok((ideas, false))
    }

    /// Drop the cached catalog so the next request refetches it
    pub async fn invalidate_catalog(&self) {
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.delete(&CacheKey::active_catalog()).await {
                tracing::warn!("Failed to invalidate catalog cache: {}", e);
            }
        }
    }

    /// Rank the catalog for a profile
    ///
    /// A failed or timed-out catalog fetch yields an empty, unavailable
    /// result set; the matcher never sees a partial catalog.
    pub async fn generate_ideas(&self, profile: &UserProfile) -> ResultSet {
        let ideas = match self.load_catalog().await {
            Ok(ideas) => ideas,
            Err(e) => {
                tracing::warn!("Idea catalog unavailable: {}", e);
                return ResultSet::unavailable();
            }
        };

        if ideas.is_empty() {
            tracing::warn!("No startup ideas found in catalog");
            return ResultSet {
                ideas: Vec::new(),
                catalog_size: 0,
                data_available: true,
            };
        }

        let result = self.matcher.find_matches(&ideas, profile);

        tracing::info!(
            "Returning {} matched ideas (from {} candidates)",
            result.ideas.len(),
            result.total_candidates
        );

        ResultSet {
            ideas: result.ideas,
            catalog_size: result.total_candidates,
            data_available: true,
        }
    }

    /// Title search over the active catalog; failures yield no results
    pub async fn search(&self, term: &str) -> Vec<IdeaRecord> {
        match tokio::time::timeout(self.fetch_timeout, self.catalog.search(term)).await {
            Ok(Ok(ideas)) => ideas,
            Ok(Err(e)) => {
                tracing::error!("Error searching startup ideas: {}", e);
                Vec::new()
            }
            Err(_) => {
                tracing::error!("Idea search timed out after {:?}", self.fetch_timeout);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Difficulty, ExperienceLevel};
    use crate::services::cache::RemoteCache;
    use crate::services::catalog::StaticCatalog;
    use async_trait::async_trait;

    struct UnresponsiveRedis;

    #[async_trait]
    impl RemoteCache for UnresponsiveRedis {
        async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
            std::future::pending().await
        }

        async fn set_ex(&self, _key: &str, _value: String, _ttl_secs: u64) -> Result<(), CacheError> {
            std::future::pending().await
        }

        async fn delete(&self, _key: &str) -> Result<(), CacheError> {
            std::future::pending().await
        }
    }

    struct SlowCatalog;

    #[async_trait]
    impl IdeaCatalog for SlowCatalog {
        async fn fetch_active(&self) -> Result<Vec<IdeaRecord>, CatalogError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(Vec::new())
        }

        async fn search(&self, _term: &str) -> Result<Vec<IdeaRecord>, CatalogError> {
            Ok(Vec::new())
        }

        fn name(&self) -> &'static str {
            "slow"
        }
    }

    fn create_idea(id: &str) -> IdeaRecord {
        IdeaRecord {
            id: id.to_string(),
            title: format!("Idea {}", id),
            description: "Description".to_string(),
            market_size: "$1B".to_string(),
            difficulty: Difficulty::Easy,
            time_to_market: "3 months".to_string(),
            revenue_model: "Ads".to_string(),
            target_audience: "Everyone".to_string(),
            key_features: vec![],
            competitive_advantage: "None".to_string(),
            required_skills: vec!["Design".to_string()],
            target_interests: vec![],
            keywords: vec![],
            is_active: true,
            created_at: None,
        }
    }

    #[tokio::test]
    async fn test_timeout_yields_unavailable() {
        let service = IdeaService::new(
            Arc::new(SlowCatalog),
            None,
            Matcher::default(),
            Duration::from_millis(20),
        );
        let profile = UserProfile::new(["Design"], ["Art"], ExperienceLevel::Beginner);

        let result = service.generate_ideas(&profile).await;

        assert!(!result.data_available);
        assert!(result.ideas.is_empty());
    }

    #[tokio::test]
    async fn test_generate_from_cached_catalog() {
        let cache = Arc::new(CacheManager::in_memory(10, 60));
        let catalog = StaticCatalog::new((0..5).map(|i| create_idea(&i.to_string())).collect());
        let service = IdeaService::new(Arc::new(catalog), Some(cache.clone()), Matcher::default(), Duration::from_secs(1));
        let profile = UserProfile::new(["Design"], ["Art"], ExperienceLevel::Beginner);

        let result = service.generate_ideas(&profile).await;
        assert!(result.data_available);
        assert_eq!(result.catalog_size, 5);
        assert_eq!(result.ideas.len(), 5);

        let cached: Vec<IdeaRecord> = cache.get(&CacheKey::active_catalog()).await.unwrap();
        assert_eq!(cached.len(), 5);

        service.invalidate_catalog().await;
        assert!(cache.get::<Vec<IdeaRecord>>(&CacheKey::active_catalog()).await.is_err());
    }

    #[tokio::test]
    async fn test_empty_catalog_is_available_but_empty() {
        let service = IdeaService::new(
            Arc::new(StaticCatalog::default()),
            None,
            Matcher::default(),
            Duration::from_secs(1),
        );
        let profile = UserProfile::new(["Design"], ["Art"], ExperienceLevel::Beginner);

        let result = service.generate_ideas(&profile).await;
        assert!(result.data_available);
        assert!(result.ideas.is_empty());
    }

    #[tokio::test]
    async fn test_unresponsive_redis_falls_back_to_source() {
        let cache = CacheManager::with_remote(Arc::new(UnresponsiveRedis), 10, 60)
            .with_remote_timeout(Duration::from_millis(20));
        let catalog = StaticCatalog::new((0..5).map(|i| create_idea(&i.to_string())).collect());
        let service = IdeaService::new(Arc::new(catalog), Some(Arc::new(cache)), Matcher::default(), Duration::from_secs(1));
        let profile = UserProfile::new(["Design"], ["Art"], ExperienceLevel::Beginner);

        let result = tokio::time::timeout(Duration::from_secs(2), service.generate_ideas(&profile))
            .await
            .expect("generate_ideas should not wait on Redis");

        assert!(result.data_available);
        assert_eq!(result.ideas.len(), 5);
    }

    #[tokio::test]
    async fn test_cache_read_counts_against_fetch_timeout() {
        let cache = CacheManager::with_remote(Arc::new(UnresponsiveRedis), 10, 60)
            .with_remote_timeout(Duration::from_secs(30));
        let catalog = StaticCatalog::new(vec![create_idea("1")]);
        let service = IdeaService::new(Arc::new(catalog), Some(Arc::new(cache)), Matcher::default(), Duration::from_millis(50));
        let profile = UserProfile::new(["Design"], ["Art"], ExperienceLevel::Beginner);

        let result = tokio::time::timeout(Duration::from_secs(2), service.generate_ideas(&profile))
            .await
            .expect("catalog load should be bounded by the fetch timeout");

        assert!(!result.data_available);
        assert!(result.ideas.is_empty());
    }
}
