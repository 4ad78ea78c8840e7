use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use validator::Validate;
use crate::models::{NarrationRequest, NarrationStatusResponse};
use crate::routes::{error_response, AppState};
use crate::services::narration_text;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/narration", web::post().to(narrate))
        .route("/narration/{session_id}", web::get().to(narration_status))
        .route("/narration/{session_id}", web::delete().to(stop_narration));
}

/// Narrate an idea card
///
/// POST /api/v1/narration
///
/// Each session plays one clip at a time: starting a new clip stops the
/// previous one, and a request overtaken while its audio is being
/// synthesized answers 409.
async fn narrate(
    state: web::Data<AppState>,
    req: web::Json<NarrationRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors.to_string());
    }

    if !state.speech.is_configured() {
        return error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "Narration unavailable",
            "Speech API key not configured",
        );
    }

    let text = narration_text(&req.idea, req.expanded);
    let mut handle = state.playback.acquire(&req.session_id, &req.idea.id);

    let synthesized = tokio::select! {
        result = state.speech.synthesize(&text) => Some(result),
        _ = handle.stopped() => None,
    };

    let audio = match synthesized {
        Some(Ok(audio)) => audio,
        Some(Err(e)) => {
            tracing::error!("Speech synthesis failed for idea {}: {}", req.idea.id, e);
            return error_response(StatusCode::BAD_GATEWAY, "Narration failed", e.to_string());
        }
        None => return superseded(&req),
    };

    if !handle.keep() {
        return superseded(&req);
    }

    tracing::debug!("Narrating idea {} for session {}", req.idea.id, req.session_id);
    HttpResponse::Ok().content_type("audio/mpeg").body(audio)
}

fn superseded(req: &NarrationRequest) -> HttpResponse {
    tracing::debug!("Narration of {} superseded in session {}", req.idea.id, req.session_id);
    error_response(
        StatusCode::CONFLICT,
        "Narration superseded",
        "Another clip was started for this session",
    )
}

/// GET /api/v1/narration/{session_id}
async fn narration_status(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let session_id = path.into_inner();
    let idea_id = state.playback.current(&session_id);

    HttpResponse::Ok().json(NarrationStatusResponse { session_id, idea_id })
}

/// DELETE /api/v1/narration/{session_id}
async fn stop_narration(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let session_id = path.into_inner();

    match state.playback.stop(&session_id) {
        Some(idea_id) => HttpResponse::Ok().json(NarrationStatusResponse {
            session_id,
            idea_id: Some(idea_id),
        }),
        None => error_response(StatusCode::NOT_FOUND, "No active narration", "Nothing is playing for this session"),
    }
}
