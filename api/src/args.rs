use clap::{ArgAction, Parser};
use mealtally_core::domain::{
    common::{ClassifierKind, LLMConfig, MealTallyConfig, NutritionConfig},
    nutrition::value_objects::{NutrientProfile, NutrientSet, StateEncoding},
};

#[derive(Debug, Clone, Parser)]
#[command(
    name = "mealtally-api",
    version,
    about = "Daily nutrition tally over rendered meal cards"
)]
pub struct Args {
    #[command(flatten)]
    pub server: ServerArgs,

    #[command(flatten)]
    pub log: LogArgs,

    #[command(flatten)]
    pub llm: LlmArgs,

    #[command(flatten)]
    pub nutrition: NutritionArgs,
}

#[derive(Debug, Clone, clap::Args)]
pub struct ServerArgs {
    #[arg(long = "server-host", env = "SERVER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long = "server-port", env = "SERVER_PORT", default_value_t = 3333)]
    pub port: u16,

    /// Prefix for every route, e.g. `/api`
    #[arg(long = "server-root-path", env = "SERVER_ROOT_PATH", default_value = "")]
    pub root_path: String,

    #[arg(
        long = "allowed-origins",
        env = "ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_value = "http://localhost:3333,http://localhost:5173"
    )]
    pub allowed_origins: Vec<String>,

    #[arg(
        long = "metrics-enabled",
        env = "METRICS_ENABLED",
        default_value_t = true,
        action = ArgAction::Set
    )]
    pub metrics_enabled: bool,
}

#[derive(Debug, Clone, clap::Args)]
pub struct LogArgs {
    /// tracing filter directives, e.g. `info,mealtally_core=debug`
    #[arg(long = "log-filter", env = "LOG_FILTER", default_value = "info")]
    pub filter: String,

    #[arg(long = "log-json", env = "LOG_JSON", default_value_t = false)]
    pub json: bool,
}

#[derive(Debug, Clone, clap::Args)]
pub struct LlmArgs {
    #[arg(long = "classifier", env = "CLASSIFIER", default_value = "fixture")]
    pub classifier: ClassifierKind,

    #[arg(
        long = "gemini-api-key",
        env = "GEMINI_API_KEY",
        default_value = "",
        hide_env_values = true
    )]
    pub gemini_api_key: String,

    #[arg(long = "gemini-model", env = "GEMINI_MODEL", default_value = "gemini-2.0-flash")]
    pub gemini_model: String,
}

#[derive(Debug, Clone, clap::Args)]
pub struct NutritionArgs {
    #[arg(long = "profile", env = "NUTRIENT_PROFILE", default_value = "water-sugar")]
    pub profile: NutrientProfile,

    #[arg(long = "state-encoding", env = "STATE_ENCODING", default_value = "state-block")]
    pub state_encoding: StateEncoding,

    /// Overrides for recommended daily values, e.g. `sugar=40;sodium=2000`
    #[arg(long = "recommended", env = "RECOMMENDED_DAILY_VALUES")]
    pub recommended: Option<NutrientSet>,
}

impl From<Args> for MealTallyConfig {
    fn from(args: Args) -> Self {
        Self {
            llm: LLMConfig {
                classifier: args.llm.classifier,
                gemini_api_key: args.llm.gemini_api_key,
                gemini_model: args.llm.gemini_model,
            },
            nutrition: NutritionConfig {
                profile: args.nutrition.profile,
                state_encoding: args.nutrition.state_encoding,
                recommended_overrides: args.nutrition.recommended.unwrap_or_default(),
            },
        }
    }
}
