// Service exports
pub mod auth;
pub mod cache;
pub mod catalog;
pub mod ideas;
pub mod speech;
pub mod supabase;

pub use auth::{AuthError, AuthUser, TokenVerifier};
pub use cache::{CacheError, CacheKey, CacheManager, RedisCache, RemoteCache};
pub use catalog::{CatalogError, IdeaCatalog, StaticCatalog};
pub use ideas::IdeaService;
pub use speech::{narration_text, SpeechClient, SpeechError, VoiceSettings};
pub use supabase::{SupabaseClient, SupabaseError, SupabaseTables};
