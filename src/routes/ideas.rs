use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse, Responder};
use validator::Validate;
use crate::models::{GenerateIdeasRequest, GenerateIdeasResponse, HealthResponse, IdeaPatch, NewIdea, SearchQuery};
use crate::routes::{error_response, AppState};
use crate::services::SupabaseClient;
use std::sync::Arc;

const NO_MATCHES_MESSAGE: &str = "No matching ideas found. Try adjusting your skills or interests.";

/// Configure idea and catalog routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/ideas/generate", web::post().to(generate_ideas))
        .route("/ideas/search", web::get().to(search_ideas))
        .route("/admin/ideas", web::post().to(add_idea))
        .route("/admin/ideas/{id}", web::patch().to(update_idea));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let backend_healthy = match &state.supabase {
        Some(supabase) => supabase.health_check().await.unwrap_or(false),
        None => true,
    };

    let status = if backend_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        catalog: state.ideas.catalog_name().to_string(),
        cache: state.ideas.cache_stats(),
        active_narrations: state.playback.active_sessions(),
        timestamp: chrono::Utc::now(),
    })
}

/// Generate ideas endpoint
///
/// POST /api/v1/ideas/generate
///
/// Request body:
/// ```json
/// {
///   "skills": ["Web Development"],
///   "interests": ["Education"],
///   "experienceLevel": "Beginner|Intermediate|Advanced"
/// }
/// ```
async fn generate_ideas(
    state: web::Data<AppState>,
    req: web::Json<GenerateIdeasRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for generate request: {:?}", errors);
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors.to_string());
    }

    let profile = req.to_profile();
    if profile.skills.is_empty() || profile.interests.is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Validation failed",
            "At least one non-blank skill and one non-blank interest are required",
        );
    }

    tracing::info!(
        "Generating ideas for {} skills, {} interests ({})",
        profile.skills.len(),
        profile.interests.len(),
        profile.experience_level
    );

    let result = state.ideas.generate_ideas(&profile).await;

    let message = if result.ideas.is_empty() {
        Some(NO_MATCHES_MESSAGE.to_string())
    } else {
        None
    };

    HttpResponse::Ok().json(GenerateIdeasResponse {
        ideas: result.ideas,
        total_candidates: result.catalog_size,
        data_available: result.data_available,
        message,
    })
}

/// Search ideas by title
///
/// GET /api/v1/ideas/search?q={term}
async fn search_ideas(
    state: web::Data<AppState>,
    query: web::Query<SearchQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors.to_string());
    }

    let ideas = state.ideas.search(&query.q).await;
    tracing::debug!("Search '{}' returned {} ideas", query.q, ideas.len());

    HttpResponse::Ok().json(ideas)
}

fn admin_backend(state: &AppState, req: &HttpRequest) -> Result<Arc<SupabaseClient>, HttpResponse> {
    let expected = match &state.admin_key {
        Some(key) if !key.is_empty() => key,
        _ => {
            return Err(error_response(
                StatusCode::FORBIDDEN,
                "Admin disabled",
                "Catalog administration is not enabled",
            ));
        }
    };

    let provided = req
        .headers()
        .get("x-admin-key")
        .and_then(|value| value.to_str().ok());

    if provided != Some(expected.as_str()) {
        return Err(error_response(StatusCode::UNAUTHORIZED, "Unauthorized", "Invalid admin key"));
    }

    state.supabase.clone().ok_or_else(|| {
        error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "Catalog is read-only",
            "No database backend is configured",
        )
    })
}

/// Add a catalog idea
///
/// POST /api/v1/admin/ideas
async fn add_idea(
    state: web::Data<AppState>,
    body: web::Json<NewIdea>,
    http_req: HttpRequest,
) -> impl Responder {
    let supabase = match admin_backend(&state, &http_req) {
        Ok(client) => client,
        Err(response) => return response,
    };

    match supabase.add_idea(&body).await {
        Ok(idea) => {
            state.ideas.invalidate_catalog().await;
            HttpResponse::Created().json(idea)
        }
        Err(e) => {
            tracing::error!("Error adding startup idea: {}", e);
            error_response(StatusCode::BAD_GATEWAY, "Failed to add idea", e.to_string())
        }
    }
}

/// Update a catalog idea
///
/// PATCH /api/v1/admin/ideas/{id}
async fn update_idea(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<IdeaPatch>,
    http_req: HttpRequest,
) -> impl Responder {
    let supabase = match admin_backend(&state, &http_req) {
        Ok(client) => client,
        Err(response) => return response,
    };

    let id = path.into_inner();
    match supabase.update_idea(&id, &body).await {
        Ok(idea) => {
            state.ideas.invalidate_catalog().await;
            HttpResponse::Ok().json(idea)
        }
        Err(crate::services::SupabaseError::NotFound(message)) => {
            error_response(StatusCode::NOT_FOUND, "Idea not found", message)
        }
        Err(e) => {
            tracing::error!("Error updating startup idea {}: {}", id, e);
            error_response(StatusCode::BAD_GATEWAY, "Failed to update idea", e.to_string())
        }
    }
}
