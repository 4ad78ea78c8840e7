use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse, Responder};
use validator::Validate;
use crate::core::progress::{normalize_completion, roadmap_steps, toggle_step, ProgressError};
use crate::models::{ProgressResponse, SaveProgressRequest, ToggleStepRequest};
use crate::routes::{error_response, user_context, AppState};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/progress", web::get().to(proceeded_ideas))
        .route("/progress/{idea_id}", web::get().to(get_progress))
        .route("/progress/{idea_id}", web::put().to(save_progress))
        .route("/progress/{idea_id}/toggle", web::post().to(toggle_progress_step));
}

fn progress_response(idea_id: String, completed: &[bool]) -> ProgressResponse {
    let steps = roadmap_steps(completed);
    ProgressResponse {
        idea_id,
        completed: steps.iter().filter(|step| step.completed).count(),
        total: steps.len(),
        steps,
    }
}

/// Ideas the caller has started
///
/// GET /api/v1/progress
async fn proceeded_ideas(state: web::Data<AppState>, http_req: HttpRequest) -> impl Responder {
    let (supabase, user) = match user_context(&state, &http_req) {
        Ok(context) => context,
        Err(response) => return response,
    };

    match supabase.proceeded_ideas(&user.id).await {
        Ok(ideas) => HttpResponse::Ok().json(ideas),
        Err(e) => {
            tracing::error!("Error getting proceeded ideas for {}: {}", user.id, e);
            error_response(StatusCode::BAD_GATEWAY, "Failed to load proceeded ideas", e.to_string())
        }
    }
}

/// GET /api/v1/progress/{idea_id}
async fn get_progress(
    state: web::Data<AppState>,
    path: web::Path<String>,
    http_req: HttpRequest,
) -> impl Responder {
    let (supabase, user) = match user_context(&state, &http_req) {
        Ok(context) => context,
        Err(response) => return response,
    };

    let idea_id = path.into_inner();
    match supabase.load_progress(&user.id, &idea_id).await {
        Ok(stored) => {
            let completed = stored.unwrap_or_default();
            HttpResponse::Ok().json(progress_response(idea_id, &completed))
        }
        Err(e) => {
            tracing::error!("Error loading progress of {} for {}: {}", idea_id, user.id, e);
            error_response(StatusCode::BAD_GATEWAY, "Failed to load progress", e.to_string())
        }
    }
}

/// PUT /api/v1/progress/{idea_id}
async fn save_progress(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<SaveProgressRequest>,
    http_req: HttpRequest,
) -> impl Responder {
    let (supabase, user) = match user_context(&state, &http_req) {
        Ok(context) => context,
        Err(response) => return response,
    };

    let idea_id = path.into_inner();
    let completed = normalize_completion(&body.completed_steps);

    match supabase.save_progress(&user.id, &idea_id, &completed).await {
        Ok(()) => HttpResponse::Ok().json(progress_response(idea_id, &completed)),
        Err(e) => {
            tracing::error!("Error saving progress of {} for {}: {}", idea_id, user.id, e);
            error_response(StatusCode::BAD_GATEWAY, "Failed to save progress", e.to_string())
        }
    }
}

/// POST /api/v1/progress/{idea_id}/toggle
async fn toggle_progress_step(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<ToggleStepRequest>,
    http_req: HttpRequest,
) -> impl Responder {
    if let Err(errors) = body.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors.to_string());
    }

    let (supabase, user) = match user_context(&state, &http_req) {
        Ok(context) => context,
        Err(response) => return response,
    };

    let idea_id = path.into_inner();
    let stored = match supabase.load_progress(&user.id, &idea_id).await {
        Ok(stored) => stored.unwrap_or_default(),
        Err(e) => {
            tracing::error!("Error loading progress of {} for {}: {}", idea_id, user.id, e);
            return error_response(StatusCode::BAD_GATEWAY, "Failed to load progress", e.to_string());
        }
    };

    let completed = match toggle_step(&stored, &body.step_id) {
        Ok(flags) => flags,
        Err(e @ ProgressError::UnknownStep(_)) => {
            return error_response(StatusCode::BAD_REQUEST, "Unknown step", e.to_string());
        }
        Err(e @ ProgressError::Locked(_)) => {
            return error_response(StatusCode::CONFLICT, "Step locked", e.to_string());
        }
    };

    match supabase.save_progress(&user.id, &idea_id, &completed).await {
        Ok(()) => HttpResponse::Ok().json(progress_response(idea_id, &completed)),
        Err(e) => {
            tracing::error!("Error saving progress of {} for {}: {}", idea_id, user.id, e);
            error_response(StatusCode::BAD_GATEWAY, "Failed to save progress", e.to_string())
        }
    }
}
