use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use crate::models::{ScoringWeights, SelectionPolicy};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub supabase: SupabaseSettings,
    #[serde(default)]
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub speech: SpeechSettings,
    #[serde(default)]
    pub admin: AdminSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SupabaseSettings {
    /// Project URL; when absent the seed catalog is used and user features are disabled
    pub url: Option<String>,
    #[serde(default)]
    pub service_key: String,
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_jwt_audience")]
    pub jwt_audience: String,
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub tables: TableSettings,
}

impl Default for SupabaseSettings {
    fn default() -> Self {
        Self {
            url: None,
            service_key: String::new(),
            jwt_secret: String::new(),
            jwt_audience: default_jwt_audience(),
            request_timeout_secs: None,
            tables: TableSettings::default(),
        }
    }
}

fn default_jwt_audience() -> String { "authenticated".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct TableSettings {
    #[serde(default = "default_ideas_table")]
    pub startup_ideas: String,
    #[serde(default = "default_favorites_table")]
    pub favorites: String,
    #[serde(default = "default_progress_table")]
    pub idea_progress: String,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            startup_ideas: default_ideas_table(),
            favorites: default_favorites_table(),
            idea_progress: default_progress_table(),
        }
    }
}

fn default_ideas_table() -> String { "startup_ideas".to_string() }
fn default_favorites_table() -> String { "favorites".to_string() }
fn default_progress_table() -> String { "idea_progress".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSettings {
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
    pub seed_file: Option<String>,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: default_fetch_timeout(),
            seed_file: None,
        }
    }
}

fn default_fetch_timeout() -> u64 { 8 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheSettings {
    pub redis_url: Option<String>,
    pub ttl_secs: Option<u64>,
    pub l1_cache_size: Option<u64>,
    pub redis_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_high_quality_threshold")]
    pub high_quality_threshold: f64,
    #[serde(default = "default_results")]
    pub default_results: usize,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            high_quality_threshold: default_high_quality_threshold(),
            default_results: default_results(),
            max_results: default_max_results(),
        }
    }
}

fn default_high_quality_threshold() -> f64 { 20.0 }
fn default_results() -> usize { 4 }
fn default_max_results() -> usize { 8 }

impl MatchingSettings {
    pub fn policy(&self) -> SelectionPolicy {
        SelectionPolicy {
            high_quality_threshold: self.high_quality_threshold,
            default_results: self.default_results,
            max_results: self.max_results,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_required_skill_weight")]
    pub required_skill: f64,
    #[serde(default = "default_skill_mention_weight")]
    pub skill_mention: f64,
    #[serde(default = "default_target_interest_weight")]
    pub target_interest: f64,
    #[serde(default = "default_keyword_interest_weight")]
    pub keyword_interest: f64,
    #[serde(default = "default_interest_mention_weight")]
    pub interest_mention: f64,
    #[serde(default = "default_student_bonus")]
    pub student_bonus: f64,
    #[serde(default = "default_fast_to_market_bonus")]
    pub fast_to_market_bonus: f64,
    #[serde(default = "default_no_match_factor")]
    pub no_match_factor: f64,
    #[serde(default = "default_jitter")]
    pub jitter: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            required_skill: default_required_skill_weight(),
            skill_mention: default_skill_mention_weight(),
            target_interest: default_target_interest_weight(),
            keyword_interest: default_keyword_interest_weight(),
            interest_mention: default_interest_mention_weight(),
            student_bonus: default_student_bonus(),
            fast_to_market_bonus: default_fast_to_market_bonus(),
            no_match_factor: default_no_match_factor(),
            jitter: default_jitter(),
        }
    }
}

fn default_required_skill_weight() -> f64 { 15.0 }
fn default_skill_mention_weight() -> f64 { 5.0 }
fn default_target_interest_weight() -> f64 { 12.0 }
fn default_keyword_interest_weight() -> f64 { 6.0 }
fn default_interest_mention_weight() -> f64 { 3.0 }
fn default_student_bonus() -> f64 { 8.0 }
fn default_fast_to_market_bonus() -> f64 { 5.0 }
fn default_no_match_factor() -> f64 { 0.3 }
fn default_jitter() -> f64 { 4.0 }

impl From<&WeightsConfig> for ScoringWeights {
    fn from(config: &WeightsConfig) -> Self {
        Self {
            required_skill: config.required_skill,
            skill_mention: config.skill_mention,
            target_interest: config.target_interest,
            keyword_interest: config.keyword_interest,
            interest_mention: config.interest_mention,
            student_bonus: config.student_bonus,
            fast_to_market_bonus: config.fast_to_market_bonus,
            no_match_factor: config.no_match_factor,
            jitter: config.jitter,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpeechSettings {
    #[serde(default = "default_speech_endpoint")]
    pub endpoint: String,
    pub api_key: Option<String>,
    #[serde(default = "default_voice_id")]
    pub voice_id: String,
    #[serde(default = "default_model_id")]
    pub model_id: String,
    #[serde(default = "default_stability")]
    pub stability: f64,
    #[serde(default = "default_similarity_boost")]
    pub similarity_boost: f64,
    #[serde(default = "default_speech_timeout")]
    pub timeout_secs: u64,
    /// How long a finished clip stays registered as playing
    #[serde(default = "default_clip_ttl")]
    pub clip_ttl_secs: u64,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            endpoint: default_speech_endpoint(),
            api_key: None,
            voice_id: default_voice_id(),
            model_id: default_model_id(),
            stability: default_stability(),
            similarity_boost: default_similarity_boost(),
            timeout_secs: default_speech_timeout(),
            clip_ttl_secs: default_clip_ttl(),
        }
    }
}

fn default_speech_endpoint() -> String { "https://api.elevenlabs.io".to_string() }
fn default_voice_id() -> String { "EXAVITQu4vr4xnSDxMaL".to_string() }
fn default_model_id() -> String { "eleven_monolingual_v1".to_string() }
fn default_stability() -> f64 { 0.7 }
fn default_similarity_boost() -> f64 { 0.8 }
fn default_speech_timeout() -> u64 { 30 }
fn default_clip_ttl() -> u64 { 180 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminSettings {
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with IDEAS_)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., IDEAS__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("IDEAS")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings = apply_well_known_env(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("IDEAS")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    pub fn scoring_weights(&self) -> ScoringWeights {
        ScoringWeights::from(&self.scoring.weights)
    }
}

/// Honour the variable names the hosted services document
/// (SUPABASE_URL, SUPABASE_SERVICE_ROLE_KEY, SUPABASE_JWT_SECRET,
/// ELEVENLABS_API_KEY, REDIS_URL) when the prefixed ones are not set
fn apply_well_known_env(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let overrides = [
        ("supabase.url", "SUPABASE_URL"),
        ("supabase.service_key", "SUPABASE_SERVICE_ROLE_KEY"),
        ("supabase.jwt_secret", "SUPABASE_JWT_SECRET"),
        ("speech.api_key", "ELEVENLABS_API_KEY"),
        ("cache.redis_url", "REDIS_URL"),
    ];

    let mut builder = Config::builder().add_source(settings.clone());

    for (key, var) in overrides {
        if settings.get_string(key).is_ok() {
            continue;
        }
        if let Ok(value) = env::var(var) {
            builder = builder.set_override(key, value)?;
        }
    }

    builder.build()
}
