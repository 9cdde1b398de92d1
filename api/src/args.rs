use std::{path::PathBuf, time::Duration};

use clap::{Parser, ValueEnum};
use pantry_chef_core::domain::common::{
    DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL, DEFAULT_SESSION_TTL, ImageStorageConfig, LLMConfig,
    PantryChefConfig,
};

#[derive(Debug, Clone, Parser)]
#[command(name = "pantry-chef-api", version, about = "Turns kitchen photos into recipe ideas")]
pub struct Args {
    #[command(flatten)]
    pub server: ServerArgs,

    #[command(flatten)]
    pub llm: LlmArgs,

    #[command(flatten)]
    pub storage: StorageArgs,

    #[command(flatten)]
    pub log: LogArgs,
}

#[derive(Debug, Clone, clap::Args)]
pub struct ServerArgs {
    #[arg(long = "server-host", env = "SERVER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long = "server-port", env = "SERVER_PORT", default_value_t = 3333)]
    pub port: u16,

    #[arg(long = "server-root-path", env = "SERVER_ROOT_PATH", default_value = "")]
    pub root_path: String,

    #[arg(
        long = "allowed-origins",
        env = "ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_value = "http://localhost:5173"
    )]
    pub allowed_origins: Vec<String>,

    #[arg(long = "disable-metrics", env = "DISABLE_METRICS")]
    pub disable_metrics: bool,
}

#[derive(Debug, Clone, clap::Args)]
pub struct LlmArgs {
    #[arg(long = "gemini-api-key", env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: String,

    #[arg(long = "gemini-model", env = "GEMINI_MODEL", default_value = DEFAULT_GEMINI_MODEL)]
    pub gemini_model: String,

    #[arg(long = "gemini-base-url", env = "GEMINI_BASE_URL", default_value = DEFAULT_GEMINI_BASE_URL)]
    pub gemini_base_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ImageStoreKind {
    Local,
    Memory,
}

#[derive(Debug, Clone, clap::Args)]
pub struct StorageArgs {
    #[arg(long = "image-store", env = "IMAGE_STORE", value_enum, default_value_t = ImageStoreKind::Local)]
    pub image_store: ImageStoreKind,

    #[arg(long = "upload-dir", env = "UPLOAD_DIR", default_value = "./uploads")]
    pub upload_dir: PathBuf,

    /// Largest accepted image, in bytes
    #[arg(long = "max-image-size", env = "MAX_IMAGE_SIZE", default_value_t = 10 * 1024 * 1024)]
    pub max_image_size: usize,

    /// Seconds a session may sit untouched before it is dropped
    #[arg(long = "session-ttl", env = "SESSION_TTL", default_value_t = DEFAULT_SESSION_TTL.as_secs())]
    pub session_ttl: u64,
}

#[derive(Debug, Clone, clap::Args)]
pub struct LogArgs {
    #[arg(long = "log-filter", env = "RUST_LOG", default_value = "info")]
    pub filter: String,

    #[arg(long = "log-json", env = "LOG_JSON")]
    pub json: bool,
}

impl From<Args> for PantryChefConfig {
    fn from(args: Args) -> Self {
        let image_storage = match args.storage.image_store {
            ImageStoreKind::Local => ImageStorageConfig::Local {
                upload_dir: args.storage.upload_dir,
            },
            ImageStoreKind::Memory => ImageStorageConfig::Memory,
        };

        Self {
            llm: LLMConfig {
                gemini_api_key: args.llm.gemini_api_key,
                gemini_model: args.llm.gemini_model,
                gemini_base_url: args.llm.gemini_base_url,
            },
            image_storage,
            session_ttl: Duration::from_secs(args.storage.session_ttl),
        }
    }
}
