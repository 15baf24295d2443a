use std::env;

use anyhow::{Context, Result, bail};

use crate::query::QueryStrategy;

/// Runtime configuration, loaded from the environment (a `.env` file is
/// honored via `dotenv` in `main`).
#[derive(Debug, Clone)]
pub struct Config {
    /// API key for the chat-completions endpoint (`OPENAI_API_KEY`)
    pub api_key: String,
    /// Base URL of the chat-completions endpoint (`OPENAI_BASE_URL`)
    pub base_url: String,
    /// Model name (`OPENAI_MODEL`)
    pub model: String,
    /// Request timeout in seconds, applied to both the LLM call and the
    /// store connection (`REQUEST_TIMEOUT_SECS`)
    pub timeout: u64,
    /// Completion token cap (`MAX_TOKENS`)
    pub max_tokens: u32,
    /// Sampling temperature (`TEMPERATURE`)
    pub temperature: f32,
    /// Postgres connection string for the deals store (`DATABASE_URL`)
    pub database_url: String,
    /// How the deal query text is produced (`QUERY_STRATEGY`)
    pub query_strategy: QueryStrategy,
}

impl Config {
    pub fn load() -> Result<Self> {
        let api_key = env::var("OPENAI_API_KEY").context("OPENAI_API_KEY is not set")?;
        let base_url = env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());
        let model = env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o".to_string());
        let timeout = parse_env("REQUEST_TIMEOUT_SECS")?.unwrap_or(30);
        let max_tokens = parse_env("MAX_TOKENS")?.unwrap_or(1024);
        let temperature = parse_env("TEMPERATURE")?.unwrap_or(0.2);
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let query_strategy = match env::var("QUERY_STRATEGY") {
            Ok(value) => value.parse().context("QUERY_STRATEGY is invalid")?,
            Err(_) => QueryStrategy::Static,
        };

        let config = Self {
            api_key,
            base_url,
            model,
            timeout,
            max_tokens,
            temperature,
            database_url,
            query_strategy,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            bail!("API key must not be empty");
        }
        if self.base_url.trim().is_empty() {
            bail!("base URL must not be empty");
        }
        if self.database_url.trim().is_empty() {
            bail!("database URL must not be empty");
        }
        if self.timeout == 0 {
            bail!("timeout must be at least 1 second");
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            bail!("temperature must be within [0.0, 2.0]");
        }
        Ok(())
    }
}

fn parse_env<T>(key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(value) => {
            let parsed = value
                .parse()
                .with_context(|| format!("{key} is not a valid value"))?;
            Ok(Some(parsed))
        }
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
impl Config {
    /// Minimal config pointing at a test endpoint; used by wiremock tests.
    pub(crate) fn for_tests(base_url: String) -> Self {
        Self {
            api_key: "test-key".to_string(),
            base_url,
            model: "gpt-4o".to_string(),
            timeout: 5,
            max_tokens: 256,
            temperature: 0.2,
            database_url: "postgres://localhost/deals".to_string(),
            query_strategy: QueryStrategy::Static,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_empty_api_key() {
        let mut config = Config::for_tests("http://localhost".to_string());
        config.api_key = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_out_of_range_temperature() {
        let mut config = Config::for_tests("http://localhost".to_string());
        config.temperature = 3.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_accepts_defaults() {
        let config = Config::for_tests("http://localhost".to_string());
        assert!(config.validate().is_ok());
    }
}
