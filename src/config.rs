use crate::error::SearchError;
use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use url::Url;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1/";

/// Settings taken verbatim from the environment. figment's `Env` parses values,
/// so a password like `123456` or `true` would not reach a `String` field.
const TEXT_SETTINGS: [&str; 9] = [
    "DB_USER",
    "DB_PASSWORD",
    "DB_CONNECT",
    "OPENAI_API_KEY",
    "LLM_MODEL",
    "SCHEMA_PATH",
    "PAGE_TITLE",
    "LISTEN_ADDR",
    "LOGLEVEL",
];

/// Process configuration, read once at startup from the environment.
///
/// Every field maps to the upper-cased environment variable of the same name
/// (`db_user` <- `DB_USER`). Secrets are redacted from `Debug` output.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    pub db_user: String,
    pub db_password: String,
    /// Database URL without credentials, e.g. `postgres://db:5432/ratecard`.
    pub db_connect: String,

    pub openai_api_key: String,
    pub openai_base_url: Url,
    pub llm_model: String,
    pub llm_temperature: f32,
    pub llm_max_tokens: Option<u32>,
    pub llm_timeout_secs: Option<u64>,
    pub proxy: Option<Url>,

    pub agent_max_steps: usize,
    pub sql_top_k: usize,
    pub sample_rows: usize,
    pub max_in_flight: usize,
    pub schema_path: Option<PathBuf>,

    pub page_title: String,
    pub listen_addr: String,
    pub loglevel: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_user: String::new(),
            db_password: String::new(),
            db_connect: String::new(),
            openai_api_key: String::new(),
            openai_base_url: Url::parse(DEFAULT_OPENAI_BASE_URL)
                .expect("default OpenAI base url is valid"),
            llm_model: "gpt-3.5-turbo".to_string(),
            llm_temperature: 0.0,
            llm_max_tokens: None,
            llm_timeout_secs: None,
            proxy: None,
            agent_max_steps: 25,
            sql_top_k: 5,
            sample_rows: 3,
            max_in_flight: 1,
            schema_path: None,
            page_title: "AI Search for rate card".to_string(),
            listen_addr: "0.0.0.0:8000".to_string(),
            loglevel: "info".to_string(),
        }
    }
}

impl Config {
    /// Defaults overlaid with the process environment. Numeric knobs go
    /// through `Env`; free-text settings are merged as unparsed strings.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Env::raw().ignore(&TEXT_SETTINGS));
        for name in TEXT_SETTINGS {
            if let Ok(value) = dotenvy::var(name) {
                figment = figment.merge(Serialized::default(&name.to_ascii_lowercase(), value));
            }
        }
        figment
    }

    pub fn load() -> Result<Self, SearchError> {
        Self::from_figment(Self::figment())
    }

    pub fn from_figment(figment: Figment) -> Result<Self, SearchError> {
        let mut cfg: Config = figment.extract()?;
        cfg.validate()?;
        cfg.max_in_flight = cfg.max_in_flight.max(1);
        cfg.agent_max_steps = cfg.agent_max_steps.max(1);
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), SearchError> {
        let required = [
            ("DB_USER", &self.db_user),
            ("DB_PASSWORD", &self.db_password),
            ("DB_CONNECT", &self.db_connect),
            ("OPENAI_API_KEY", &self.openai_api_key),
        ];
        match required.iter().find(|(_, v)| v.trim().is_empty()) {
            Some((name, _)) => Err(SearchError::MissingSetting(*name)),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("db_user", &self.db_user)
            .field("db_password", &"<redacted>")
            .field("db_connect", &self.db_connect)
            .field("openai_api_key", &"<redacted>")
            .field("openai_base_url", &self.openai_base_url.as_str())
            .field("llm_model", &self.llm_model)
            .field("llm_temperature", &self.llm_temperature)
            .field("llm_max_tokens", &self.llm_max_tokens)
            .field("llm_timeout_secs", &self.llm_timeout_secs)
            .field("proxy", &self.proxy.as_ref().map(|u| u.as_str()))
            .field("agent_max_steps", &self.agent_max_steps)
            .field("sql_top_k", &self.sql_top_k)
            .field("sample_rows", &self.sample_rows)
            .field("max_in_flight", &self.max_in_flight)
            .field("schema_path", &self.schema_path)
            .field("page_title", &self.page_title)
            .field("listen_addr", &self.listen_addr)
            .field("loglevel", &self.loglevel)
            .finish()
    }
}
