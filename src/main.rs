use actix_cors::Cors;
use actix_web::{web, App, HttpServer, HttpResponse, middleware, error, http::StatusCode};
use idea_matcher::config::Settings;
use idea_matcher::core::{Matcher, PlaybackContext};
use idea_matcher::routes::{self, AppState};
use idea_matcher::services::{
    CacheManager, IdeaCatalog, IdeaService, SpeechClient, StaticCatalog, SupabaseClient,
    SupabaseTables, TokenVerifier, VoiceSettings,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn, error};
use tracing_subscriber::EnvFilter;

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

fn startup_error(context: &str, err: impl std::fmt::Display) -> std::io::Error {
    error!("{}: {}", context, err);
    std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", context, err))
}

fn init_logging(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match settings.logging.format.as_str() {
        "pretty" => subscriber.pretty().init(),
        "json" => subscriber.json().init(),
        _ => subscriber.init(),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    init_logging(&settings);

    info!("Starting Idea Matcher service...");

    // Initialize Supabase client (optional - the seed catalog covers local runs)
    let supabase = match settings.supabase.url.as_deref().filter(|url| !url.is_empty()) {
        Some(url) => {
            let tables = SupabaseTables {
                startup_ideas: settings.supabase.tables.startup_ideas.clone(),
                favorites: settings.supabase.tables.favorites.clone(),
                idea_progress: settings.supabase.tables.idea_progress.clone(),
            };
            let timeout = Duration::from_secs(settings.supabase.request_timeout_secs.unwrap_or(7));

            let client = SupabaseClient::new(
                url.to_string(),
                settings.supabase.service_key.clone(),
                tables,
                timeout,
            )
            .map_err(|e| startup_error("Failed to build Supabase client", e))?;

            info!("Supabase client initialized for {}", client.base_url());
            Some(Arc::new(client))
        }
        None => {
            warn!("No Supabase URL configured; user features are disabled");
            None
        }
    };

    // Pick the catalog source
    let catalog: Arc<dyn IdeaCatalog> = match (&supabase, &settings.catalog.seed_file) {
        (Some(client), _) => client.clone(),
        (None, Some(path)) => {
            let seed = StaticCatalog::load(path)
                .map_err(|e| startup_error("Failed to load seed catalog", e))?;
            if seed.is_empty() {
                warn!("Seed catalog {} contains no ideas", path);
            }
            Arc::new(seed)
        }
        (None, None) => {
            warn!("No catalog source configured; every request will see an empty catalog");
            Arc::new(StaticCatalog::default())
        }
    };

    // Initialize cache manager (Redis is optional, L1 is always on)
    let cache_ttl = settings.cache.ttl_secs.unwrap_or(300);
    let l1_cache_size = settings.cache.l1_cache_size.unwrap_or(100);
    let redis_timeout = Duration::from_millis(settings.cache.redis_timeout_ms.unwrap_or(500));

    let cache = match settings.cache.redis_url.as_deref().filter(|url| !url.is_empty()) {
        Some(redis_url) => match CacheManager::new(redis_url, l1_cache_size, cache_ttl).await {
            Ok(c) => {
                info!("Cache manager initialized with Redis (L1: {} entries, TTL: {}s)", l1_cache_size, cache_ttl);
                c.with_remote_timeout(redis_timeout)
            }
            Err(e) => {
                error!("Failed to connect to Redis ({}), falling back to in-process cache", e);
                CacheManager::in_memory(l1_cache_size, cache_ttl)
            }
        },
        None => {
            info!("Cache manager initialized in-process (L1: {} entries, TTL: {}s)", l1_cache_size, cache_ttl);
            CacheManager::in_memory(l1_cache_size, cache_ttl)
        }
    };

    // Initialize matcher with configured weights
    let weights = settings.scoring_weights();
    let policy = settings.matching.policy();
    let matcher = Matcher::new(weights, policy);

    info!("Matcher initialized with weights: {:?}", weights);

    let ideas = Arc::new(IdeaService::new(
        catalog,
        Some(Arc::new(cache)),
        matcher,
        Duration::from_secs(settings.catalog.fetch_timeout_secs),
    ));

    // Token verification needs both a backend and its JWT secret
    let auth = match (&supabase, settings.supabase.jwt_secret.is_empty()) {
        (Some(_), false) => Some(Arc::new(TokenVerifier::new(
            &settings.supabase.jwt_secret,
            &settings.supabase.jwt_audience,
        ))),
        (Some(_), true) => {
            warn!("Supabase JWT secret not configured; user features are disabled");
            None
        }
        (None, _) => None,
    };

    let voice = VoiceSettings {
        voice_id: settings.speech.voice_id.clone(),
        model_id: settings.speech.model_id.clone(),
        stability: settings.speech.stability,
        similarity_boost: settings.speech.similarity_boost,
    };

    let speech = SpeechClient::new(
        settings.speech.endpoint.clone(),
        settings.speech.api_key.clone(),
        voice,
        Duration::from_secs(settings.speech.timeout_secs),
    )
    .map_err(|e| startup_error("Failed to build speech client", e))?;

    if !speech.is_configured() {
        warn!("Speech API key not configured; narration is disabled");
    }

    // Build application state
    let app_state = AppState {
        ideas,
        supabase,
        auth,
        speech: Arc::new(speech),
        playback: PlaybackContext::with_clip_ttl(Duration::from_secs(settings.speech.clip_ttl_secs)),
        admin_key: settings.admin.api_key.clone(),
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
