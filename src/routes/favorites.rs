use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse, Responder};
use crate::models::{AddFavoriteRequest, FavoriteStatusResponse};
use crate::routes::{error_response, user_context, AppState};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/favorites", web::get().to(list_favorites))
        .route("/favorites", web::post().to(add_favorite))
        .route("/favorites/{idea_id}", web::get().to(favorite_status))
        .route("/favorites/{idea_id}", web::delete().to(remove_favorite));
}

/// GET /api/v1/favorites
async fn list_favorites(state: web::Data<AppState>, http_req: HttpRequest) -> impl Responder {
    let (supabase, user) = match user_context(&state, &http_req) {
        Ok(context) => context,
        Err(response) => return response,
    };

    match supabase.list_favorites(&user.id).await {
        Ok(ideas) => HttpResponse::Ok().json(ideas),
        Err(e) => {
            tracing::error!("Error loading favorites for {}: {}", user.id, e);
            error_response(StatusCode::BAD_GATEWAY, "Failed to load favorites", e.to_string())
        }
    }
}

/// POST /api/v1/favorites
///
/// Adding an idea that is already a favorite succeeds without a duplicate.
async fn add_favorite(
    state: web::Data<AppState>,
    body: web::Json<AddFavoriteRequest>,
    http_req: HttpRequest,
) -> impl Responder {
    let (supabase, user) = match user_context(&state, &http_req) {
        Ok(context) => context,
        Err(response) => return response,
    };

    let status = FavoriteStatusResponse {
        idea_id: body.idea.id.clone(),
        favorited: true,
    };

    match supabase.add_favorite(&user.id, &body.idea).await {
        Ok(true) => HttpResponse::Created().json(status),
        Ok(false) => HttpResponse::Ok().json(status),
        Err(e) => {
            tracing::error!("Error saving favorite for {}: {}", user.id, e);
            error_response(StatusCode::BAD_GATEWAY, "Failed to save favorite", e.to_string())
        }
    }
}

/// GET /api/v1/favorites/{idea_id}
async fn favorite_status(
    state: web::Data<AppState>,
    path: web::Path<String>,
    http_req: HttpRequest,
) -> impl Responder {
    let (supabase, user) = match user_context(&state, &http_req) {
        Ok(context) => context,
        Err(response) => return response,
    };

    let idea_id = path.into_inner();
    match supabase.is_favorite(&user.id, &idea_id).await {
        Ok(favorited) => HttpResponse::Ok().json(FavoriteStatusResponse { idea_id, favorited }),
        Err(e) => {
            tracing::error!("Error checking favorite {} for {}: {}", idea_id, user.id, e);
            error_response(StatusCode::BAD_GATEWAY, "Failed to check favorite", e.to_string())
        }
    }
}

/// DELETE /api/v1/favorites/{idea_id}
async fn remove_favorite(
    state: web::Data<AppState>,
    path: web::Path<String>,
    http_req: HttpRequest,
) -> impl Responder {
    let (supabase, user) = match user_context(&state, &http_req) {
        Ok(context) => context,
        Err(response) => return response,
    };

    let idea_id = path.into_inner();
    match supabase.remove_favorite(&user.id, &idea_id).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => {
            tracing::error!("Error removing favorite {} for {}: {}", idea_id, user.id, e);
            error_response(StatusCode::BAD_GATEWAY, "Failed to remove favorite", e.to_string())
        }
    }
}
