use crate::models::{IdeaPatch, IdeaRecord, NewIdea, StartupIdea};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with Supabase
#[derive(Debug, Error)]
pub enum SupabaseError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: invalid service key")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Table names in the Supabase database
#[derive(Debug, Clone)]
pub struct SupabaseTables {
    pub startup_ideas: String,
    pub favorites: String,
    pub idea_progress: String,
}

impl Default for SupabaseTables {
    fn default() -> Self {
        Self {
            startup_ideas: "startup_ideas".to_string(),
            favorites: "favorites".to_string(),
            idea_progress: "idea_progress".to_string(),
        }
    }
}

/// Supabase REST (PostgREST) client
///
/// Handles all communication with the Supabase backend including:
/// - Reading and maintaining the idea catalog
/// - Per-user favorites
/// - Per-user roadmap progress
pub struct SupabaseClient {
    base_url: String,
    service_key: String,
    client: Client,
    tables: SupabaseTables,
}

#[derive(Deserialize)]
struct FavoriteRow {
    idea_data: StartupIdea,
}

#[derive(Deserialize)]
struct ProgressRow {
    completed_steps: Vec<bool>,
}

#[derive(Deserialize)]
struct ProgressIdeaRow {
    idea_id: String,
}

impl SupabaseClient {
    /// Create a new Supabase client
    pub fn new(
        base_url: String,
        service_key: String,
        tables: SupabaseTables,
        request_timeout: Duration,
    ) -> Result<Self, SupabaseError> {
        let client = Client::builder().timeout(request_timeout).build()?;

        Ok(Self {
            base_url,
            service_key,
            client,
            tables,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a table URL with PostgREST filters, values URL-encoded
    fn table_url(&self, table: &str, params: &[(&str, String)]) -> String {
        let mut url = format!("{}/rest/v1/{}", self.base_url.trim_end_matches('/'), table);
        if !params.is_empty() {
            let query = params
                .iter()
                .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
                .collect::<Vec<_>>()
                .join("&");
            url.push('?');
            url.push_str(&query);
        }
        url
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.service_key)
            .header("Authorization", format!("Bearer {}", self.service_key))
    }

    async fn ensure_success(response: Response, context: &str) -> Result<Response, SupabaseError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(SupabaseError::Unauthorized);
        }

        let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
        tracing::error!("Supabase {} failed: {} - {}", context, status, body);
        Err(SupabaseError::ApiError(format!("Failed to {}: {}", context, status)))
    }

    /// Parse idea rows, skipping rows that do not decode
    fn parse_ideas(rows: Vec<Value>) -> Vec<IdeaRecord> {
        let total = rows.len();
        let ideas: Vec<IdeaRecord> = rows
            .into_iter()
            .filter_map(|row| match serde_json::from_value(row) {
                Ok(idea) => Some(idea),
                Err(e) => {
                    tracing::warn!("Skipping malformed idea row: {}", e);
                    None
                }
            })
            .collect();

        tracing::debug!("Parsed {} of {} idea rows", ideas.len(), total);
        ideas
    }

    /// Fetch every active idea, newest first
    pub async fn fetch_active_ideas(&self) -> Result<Vec<IdeaRecord>, SupabaseError> {
        let url = self.table_url(
            &self.tables.startup_ideas,
            &[
                ("select", "*".to_string()),
                ("is_active", "eq.true".to_string()),
                ("order", "created_at.desc".to_string()),
            ],
        );

        tracing::debug!("Fetching active ideas from: {}", url);

        let response = self.request(Method::GET, &url).send().await?;
        let response = Self::ensure_success(response, "fetch startup ideas").await?;
        let rows: Vec<Value> = response.json().await?;

        Ok(Self::parse_ideas(rows))
    }

    /// Full-text search on idea titles (active ideas only, newest first)
    pub async fn search_ideas(&self, term: &str) -> Result<Vec<IdeaRecord>, SupabaseError> {
        let url = self.table_url(
            &self.tables.startup_ideas,
            &[
                ("select", "*".to_string()),
                ("is_active", "eq.true".to_string()),
                ("title", format!("fts.{}", term)),
                ("order", "created_at.desc".to_string()),
            ],
        );

        let response = self.request(Method::GET, &url).send().await?;
        let response = Self::ensure_success(response, "search startup ideas").await?;
        let rows: Vec<Value> = response.json().await?;

        Ok(Self::parse_ideas(rows))
    }

    /// Insert a catalog idea and return the stored row
    pub async fn add_idea(&self, idea: &NewIdea) -> Result<IdeaRecord, SupabaseError> {
        let url = self.table_url(&self.tables.startup_ideas, &[]);

        let response = self
            .request(Method::POST, &url)
            .header("Prefer", "return=representation")
            .json(&[idea])
            .send()
            .await?;
        let response = Self::ensure_success(response, "add startup idea").await?;

        let mut rows: Vec<IdeaRecord> = response.json().await?;
        if rows.is_empty() {
            return Err(SupabaseError::InvalidResponse("Insert returned no rows".into()));
        }

        let stored = rows.swap_remove(0);
        tracing::info!("Added startup idea {} ({})", stored.id, stored.title);
        Ok(stored)
    }

    /// Apply a partial update to a catalog idea
    pub async fn update_idea(&self, id: &str, patch: &IdeaPatch) -> Result<IdeaRecord, SupabaseError> {
        let url = self.table_url(&self.tables.startup_ideas, &[("id", format!("eq.{}", id))]);

        let response = self
            .request(Method::PATCH, &url)
            .header("Prefer", "return=representation")
            .json(patch)
            .send()
            .await?;
        let response = Self::ensure_success(response, "update startup idea").await?;

        let mut rows: Vec<IdeaRecord> = response.json().await?;
        if rows.is_empty() {
            return Err(SupabaseError::NotFound(format!("Startup idea {}", id)));
        }

        tracing::info!("Updated startup idea {}", id);
        Ok(rows.swap_remove(0))
    }

    /// Fetch ideas by id regardless of their active flag
    pub async fn ideas_by_ids(&self, ids: &[String]) -> Result<Vec<IdeaRecord>, SupabaseError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.table_url(
            &self.tables.startup_ideas,
            &[
                ("select", "*".to_string()),
                ("id", format!("in.({})", ids.join(","))),
            ],
        );

        let response = self.request(Method::GET, &url).send().await?;
        let response = Self::ensure_success(response, "fetch ideas by id").await?;
        let rows: Vec<Value> = response.json().await?;

        Ok(Self::parse_ideas(rows))
    }

    /// Favorites of a user, most recently added first
    pub async fn list_favorites(&self, user_id: &str) -> Result<Vec<StartupIdea>, SupabaseError> {
        let url = self.table_url(
            &self.tables.favorites,
            &[
                ("select", "idea_data".to_string()),
                ("user_id", format!("eq.{}", user_id)),
                ("order", "created_at.desc".to_string()),
            ],
        );

        let response = self.request(Method::GET, &url).send().await?;
        let response = Self::ensure_success(response, "load favorites").await?;
        let rows: Vec<FavoriteRow> = response.json().await?;

        Ok(rows.into_iter().map(|row| row.idea_data).collect())
    }

    pub async fn is_favorite(&self, user_id: &str, idea_id: &str) -> Result<bool, SupabaseError> {
        let url = self.table_url(
            &self.tables.favorites,
            &[
                ("select", "id".to_string()),
                ("user_id", format!("eq.{}", user_id)),
                ("idea_data->>id", format!("eq.{}", idea_id)),
                ("limit", "1".to_string()),
            ],
        );

        let response = self.request(Method::GET, &url).send().await?;
        let response = Self::ensure_success(response, "check favorite").await?;
        let rows: Vec<Value> = response.json().await?;

        Ok(!rows.is_empty())
    }

    /// Store an idea snapshot as a favorite
    ///
    /// Returns `false` when the idea was already a favorite; nothing is inserted then.
    pub async fn add_favorite(&self, user_id: &str, idea: &StartupIdea) -> Result<bool, SupabaseError> {
        if self.is_favorite(user_id, &idea.id).await? {
            tracing::debug!("Idea {} already in favorites of {}", idea.id, user_id);
            return Ok(false);
        }

        let url = self.table_url(&self.tables.favorites, &[]);
        let response = self
            .request(Method::POST, &url)
            .json(&json!({
                "user_id": user_id,
                "idea_data": idea,
            }))
            .send()
            .await?;
        Self::ensure_success(response, "save favorite").await?;

        tracing::debug!("Added idea {} to favorites of {}", idea.id, user_id);
        Ok(true)
    }

    pub async fn remove_favorite(&self, user_id: &str, idea_id: &str) -> Result<(), SupabaseError> {
        let url = self.table_url(
            &self.tables.favorites,
            &[
                ("user_id", format!("eq.{}", user_id)),
                ("idea_data->>id", format!("eq.{}", idea_id)),
            ],
        );

        let response = self.request(Method::DELETE, &url).send().await?;
        Self::ensure_success(response, "remove favorite").await?;

        tracing::debug!("Removed idea {} from favorites of {}", idea_id, user_id);
        Ok(())
    }

    /// Upsert the roadmap completion flags of one idea
    pub async fn save_progress(
        &self,
        user_id: &str,
        idea_id: &str,
        completed_steps: &[bool],
    ) -> Result<(), SupabaseError> {
        let url = self.table_url(
            &self.tables.idea_progress,
            &[("on_conflict", "user_id,idea_id".to_string())],
        );

        let response = self
            .request(Method::POST, &url)
            .header("Prefer", "resolution=merge-duplicates")
            .json(&[json!({
                "user_id": user_id,
                "idea_id": idea_id,
                "completed_steps": completed_steps,
                "updated_at": chrono::Utc::now().to_rfc3339(),
            })])
            .send()
            .await?;
        Self::ensure_success(response, "save idea progress").await?;

        Ok(())
    }

    /// Stored completion flags, `None` when the user never started this idea
    pub async fn load_progress(
        &self,
        user_id: &str,
        idea_id: &str,
    ) -> Result<Option<Vec<bool>>, SupabaseError> {
        let url = self.table_url(
            &self.tables.idea_progress,
            &[
                ("select", "completed_steps".to_string()),
                ("user_id", format!("eq.{}", user_id)),
                ("idea_id", format!("eq.{}", idea_id)),
                ("limit", "1".to_string()),
            ],
        );

        let response = self.request(Method::GET, &url).send().await?;
        let response = Self::ensure_success(response, "load idea progress").await?;
        let rows: Vec<ProgressRow> = response.json().await?;

        Ok(rows.into_iter().next().map(|row| row.completed_steps))
    }

    /// Ideas the user has started working on, without match annotations
    pub async fn proceeded_ideas(&self, user_id: &str) -> Result<Vec<StartupIdea>, SupabaseError> {
        let url = self.table_url(
            &self.tables.idea_progress,
            &[
                ("select", "idea_id".to_string()),
                ("user_id", format!("eq.{}", user_id)),
            ],
        );

        let response = self.request(Method::GET, &url).send().await?;
        let response = Self::ensure_success(response, "fetch proceeded idea ids").await?;
        let rows: Vec<ProgressIdeaRow> = response.json().await?;

        let ids: Vec<String> = rows.into_iter().map(|row| row.idea_id).collect();
        let ideas = self.ideas_by_ids(&ids).await?;

        Ok(ideas.iter().map(StartupIdea::unannotated).collect())
    }

    /// Cheap reachability probe
    pub async fn health_check(&self) -> Result<bool, SupabaseError> {
        let url = self.table_url(
            &self.tables.startup_ideas,
            &[("select", "id".to_string()), ("limit", "1".to_string())],
        );

        let response = self.request(Method::GET, &url).send().await?;
        Ok(response.status().is_success())
    }
}
