use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use crate::models::IdeaRecord;
use crate::services::supabase::{SupabaseClient, SupabaseError};

/// Errors raised while loading the idea catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog fetch timed out after {0:?}")]
    Timeout(Duration),

    #[error("Catalog backend error: {0}")]
    Backend(#[from] SupabaseError),

    #[error("Failed to read seed catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid seed catalog: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Source of the active idea catalog
#[async_trait]
pub trait IdeaCatalog: Send + Sync {
    /// All active ideas, newest first
    async fn fetch_active(&self) -> Result<Vec<IdeaRecord>, CatalogError>;

    /// Active ideas whose title matches a search term
    async fn search(&self, term: &str) -> Result<Vec<IdeaRecord>, CatalogError>;

    fn name(&self) -> &'static str;
}

#[async_trait]
impl IdeaCatalog for SupabaseClient {
    async fn fetch_active(&self) -> Result<Vec<IdeaRecord>, CatalogError> {
        Ok(self.fetch_active_ideas().await?)
    }

    async fn search(&self, term: &str) -> Result<Vec<IdeaRecord>, CatalogError> {
        Ok(self.search_ideas(term).await?)
    }

    fn name(&self) -> &'static str {
        "supabase"
    }
}

#[derive(Debug, Deserialize)]
struct SeedFile {
    #[serde(default)]
    ideas: Vec<IdeaRecord>,
}

/// In-memory catalog, loaded from a TOML seed file or built directly
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    ideas: Vec<IdeaRecord>,
}

impl StaticCatalog {
    pub fn new(ideas: Vec<IdeaRecord>) -> Self {
        Self { ideas }
    }

    /// Parse a seed catalog made of `[[ideas]]` tables
    pub fn from_toml_str(source: &str) -> Result<Self, CatalogError> {
        let seed: SeedFile = toml::from_str(source)?;
        Ok(Self::new(seed.ideas))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let source = std::fs::read_to_string(path.as_ref())?;
        let catalog = Self::from_toml_str(&source)?;
        tracing::info!(
            "Loaded {} seed ideas from {}",
            catalog.ideas.len(),
            path.as_ref().display()
        );
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.ideas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ideas.is_empty()
    }
}

#[async_trait]
impl IdeaCatalog for StaticCatalog {
    async fn fetch_active(&self) -> Result<Vec<IdeaRecord>, CatalogError> {
        let mut active: Vec<IdeaRecord> = self.ideas.iter().filter(|i| i.is_active).cloned().collect();
        // Ideas without a timestamp sort last
        active.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(active)
    }

    async fn search(&self, term: &str) -> Result<Vec<IdeaRecord>, CatalogError> {
        let words: Vec<String> = term.split_whitespace().map(str::to_lowercase).collect();
        if words.is_empty() {
            return Ok(Vec::new());
        }

        let active = self.fetch_active().await?;
        Ok(active
            .into_iter()
            .filter(|idea| {
                let title = idea.title.to_lowercase();
                words.iter().all(|word| title.contains(word.as_str()))
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "static"
    }
}
