use clap::{ArgAction, Parser, Subcommand};
use std::{net::SocketAddr, path::PathBuf};
use url::Url;

use crate::{llm::ProviderKind, locale::Language, prompt::PromptTemplate};

const OPENAI_DEFAULT_BASE: &str = "https://openrouter.ai/api/v1";
const OPENAI_DEFAULT_MODEL: &str = "google/gemini-2.5-flash";
const GEMINI_DEFAULT_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const GEMINI_DEFAULT_MODEL: &str = "gemini-2.5-flash";

#[derive(Parser, Debug)]
#[command(
    name = "leftover-chef",
    version,
    about = "Turns a photo of leftovers into a recipe"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub config: Config,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Generate a recipe for an image file and print it
    Generate {
        /// Path to a photo of the ingredients
        path: PathBuf,
    },
}

/// Leftover Chef configuration
#[derive(Parser, Debug, Clone)]
pub struct Config {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Decrease verbosity (-q, -qq, -qqq)
    #[arg(short = 'q', action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Address to bind the HTTP server to
    #[arg(long, env = "LEFTOVER_CHEF_BIND_ADDR", default_value = "0.0.0.0:8080")]
    pub bind: SocketAddr,

    /// Log file path (logs are written to stdout + this file)
    #[arg(
        long,
        env = "LEFTOVER_CHEF_LOG_FILE",
        default_value = "leftover-chef.logs"
    )]
    pub log_file: PathBuf,

    /// CORS allowed origin (e.g., <https://chef.yourdomain.com>)
    /// If not set, allows all origins
    #[arg(long, env = "LEFTOVER_CHEF_CORS_ORIGIN")]
    pub cors_origin: Option<String>,

    /// Largest accepted request body, in bytes
    #[arg(
        long,
        env = "LEFTOVER_CHEF_MAX_UPLOAD_BYTES",
        default_value_t = 10 * 1024 * 1024
    )]
    pub max_upload_bytes: usize,

    /// Which model backend to call
    #[arg(long, env = "LEFTOVER_CHEF_LLM_PROVIDER", value_enum, default_value_t)]
    pub llm_provider: ProviderKind,

    /// LLM API key (required unless the provider is `fake`)
    #[arg(long, env = "LEFTOVER_CHEF_LLM_API_KEY", hide_env_values = true)]
    pub llm_api_key: Option<String>,

    /// LLM model to use (defaults depend on the provider)
    #[arg(long = "llm-model", env = "LEFTOVER_CHEF_LLM_MODEL")]
    pub llm_model_override: Option<String>,

    /// LLM API base URL (defaults depend on the provider)
    #[arg(long, env = "LEFTOVER_CHEF_LLM_API_URL")]
    pub llm_api_url: Option<Url>,

    /// Timeout for one model call, in seconds
    #[arg(long, env = "LEFTOVER_CHEF_LLM_TIMEOUT_SECS", default_value_t = 120)]
    pub llm_timeout_secs: u64,

    /// Language of the recipes and the pages
    #[arg(long, env = "LEFTOVER_CHEF_LANGUAGE", value_enum, default_value_t)]
    pub language: Language,

    /// Replaces the built-in prompt. `{schema}` is substituted with the
    /// expected JSON schema.
    #[arg(long, env = "LEFTOVER_CHEF_SYSTEM_PROMPT")]
    pub system_prompt: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            verbose: 0,
            quiet: 0,
            bind: SocketAddr::from(([0, 0, 0, 0], 8080)),
            log_file: PathBuf::from("leftover-chef.logs"),
            cors_origin: None,
            max_upload_bytes: 10 * 1024 * 1024,
            llm_provider: ProviderKind::default(),
            llm_api_key: None,
            llm_model_override: None,
            llm_api_url: None,
            llm_timeout_secs: 120,
            language: Language::default(),
            system_prompt: None,
        }
    }
}

impl Config {
    #[must_use]
    pub fn verbosity_delta(&self) -> i16 {
        i16::from(self.verbose) - i16::from(self.quiet)
    }

    #[must_use]
    pub fn log_filter(&self) -> &'static str {
        match self.verbosity_delta() {
            d if d <= -2 => "error",
            -1 => "warn",
            0 => "info,leftover_chef=info,axum=info,tower_http=info",
            1 => "debug,leftover_chef=debug,axum=info,tower_http=info,reqwest=info,hyper=info",
            2 => "trace,leftover_chef=trace,axum=debug,tower_http=trace,reqwest=debug,hyper=info",
            _ => "trace,leftover_chef=trace,axum=trace,tower_http=trace,reqwest=trace,hyper=debug",
        }
    }

    /// Base URL without a trailing slash.
    #[must_use]
    pub fn llm_api_base(&self) -> String {
        let base = self.llm_api_url.as_ref().map_or_else(
            || match self.llm_provider {
                ProviderKind::Gemini => GEMINI_DEFAULT_BASE.to_string(),
                ProviderKind::Openai | ProviderKind::Fake => OPENAI_DEFAULT_BASE.to_string(),
            },
            ToString::to_string,
        );
        base.trim_end_matches('/').to_string()
    }

    #[must_use]
    pub fn llm_model(&self) -> String {
        match (&self.llm_model_override, self.llm_provider) {
            (Some(m), _) if !m.trim().is_empty() => m.trim().to_string(),
            (_, ProviderKind::Gemini) => GEMINI_DEFAULT_MODEL.to_string(),
            (_, ProviderKind::Fake) => "fake".to_string(),
            (_, ProviderKind::Openai) => OPENAI_DEFAULT_MODEL.to_string(),
        }
    }

    #[must_use]
    pub fn prompt_template(&self) -> PromptTemplate {
        match self.system_prompt.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => PromptTemplate::new(text),
            _ => PromptTemplate::for_language(self.language),
        }
    }

    /// API key safe for logs: the last 4 characters at most.
    #[must_use]
    pub fn llm_api_key_masked(&self) -> String {
        mask_key(self.llm_api_key.as_deref())
    }
}

fn mask_key(k: Option<&str>) -> String {
    match k.map(str::trim) {
        None | Some("") => "<not set>".to_string(),
        Some(s) => {
            let len = s.chars().count();
            if len <= 6 {
                return "***".to_string();
            }
            let tail: String = s.chars().skip(len - 4).collect();
            format!("***{tail}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_provider() {
        let mut c = Config::default();
        assert_eq!(c.llm_api_base(), OPENAI_DEFAULT_BASE);
        assert_eq!(c.llm_model(), OPENAI_DEFAULT_MODEL);

        c.llm_provider = ProviderKind::Gemini;
        assert_eq!(c.llm_api_base(), GEMINI_DEFAULT_BASE);
        assert_eq!(c.llm_model(), GEMINI_DEFAULT_MODEL);

        c.llm_model_override = Some(" gemini-2.5-pro ".into());
        c.llm_api_url = Some(Url::parse("http://127.0.0.1:9000/v1/").unwrap());
        assert_eq!(c.llm_model(), "gemini-2.5-pro");
        assert_eq!(c.llm_api_base(), "http://127.0.0.1:9000/v1");
    }

    #[test]
    fn parses_cli_flags() {
        let cli = Cli::try_parse_from([
            "leftover-chef",
            "-vv",
            "--llm-provider",
            "gemini",
            "--language",
            "en",
            "--llm-model",
            "m",
            "generate",
            "fridge.jpg",
        ])
        .unwrap();
        assert_eq!(cli.config.verbosity_delta(), 2);
        assert_eq!(cli.config.llm_provider, ProviderKind::Gemini);
        assert_eq!(cli.config.language, Language::En);
        assert_eq!(cli.config.llm_model(), "m");
        assert!(matches!(cli.command, Some(Commands::Generate { path }) if path == PathBuf::from("fridge.jpg")));
    }

    #[test]
    fn verbosity_maps_to_filter() {
        let mut c = Config::default();
        assert!(c.log_filter().starts_with("info"));
        c.quiet = 2;
        assert_eq!(c.log_filter(), "error");
    }

    #[test]
    fn prompt_override_wins_when_not_blank() {
        let mut c = Config::default();
        assert!(c.prompt_template().render().contains("MAGYAR"));
        c.system_prompt = Some("   ".into());
        assert!(c.prompt_template().render().contains("MAGYAR"));
        c.system_prompt = Some("Cook anything.".into());
        assert_eq!(c.prompt_template().render(), "Cook anything.");
    }

    #[test]
    fn key_is_masked() {
        assert_eq!(mask_key(None), "<not set>");
        assert_eq!(mask_key(Some("abc")), "***");
        assert_eq!(mask_key(Some("sk-or-123456789")), "***6789");
    }
}
