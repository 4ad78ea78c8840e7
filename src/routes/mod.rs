// Route exports
pub mod favorites;
pub mod ideas;
pub mod narration;
pub mod progress;

use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse};
use std::sync::Arc;
use crate::core::PlaybackContext;
use crate::models::ErrorResponse;
use crate::services::{AuthUser, IdeaService, SpeechClient, SupabaseClient, TokenVerifier};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub ideas: Arc<IdeaService>,
    /// Absent when running on the seed catalog without a backend
    pub supabase: Option<Arc<SupabaseClient>>,
    pub auth: Option<Arc<TokenVerifier>>,
    pub speech: Arc<SpeechClient>,
    pub playback: PlaybackContext,
    pub admin_key: Option<String>,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(ideas::configure)
            .configure(favorites::configure)
            .configure(progress::configure)
            .configure(narration::configure),
    );
}

pub(crate) fn error_response(status: StatusCode, error: &str, message: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message: message.into(),
        status_code: status.as_u16(),
    })
}

/// Resolve the backend client and the authenticated caller for user-scoped routes
pub(crate) fn user_context(
    state: &AppState,
    req: &HttpRequest,
) -> Result<(Arc<SupabaseClient>, AuthUser), HttpResponse> {
    let (supabase, verifier) = match (&state.supabase, &state.auth) {
        (Some(supabase), Some(verifier)) => (supabase, verifier),
        _ => {
            return Err(error_response(
                StatusCode::SERVICE_UNAVAILABLE,
                "User features unavailable",
                "No identity/database backend is configured",
            ));
        }
    };

    match verifier.authenticate(req) {
        Ok(user) => Ok((Arc::clone(supabase), user)),
        Err(e) => {
            tracing::info!("Rejected request to {}: {}", req.path(), e);
            Err(error_response(StatusCode::UNAUTHORIZED, "Unauthorized", e.to_string()))
        }
    }
}
