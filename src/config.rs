use anyhow::{anyhow, Context, Result};

use crate::{generator::DEFAULT_MODEL, groq::DEFAULT_API_BASE};

pub const DEFAULT_PORT: u16 = 8001;

#[derive(Debug, Clone, PartialEq)]
pub struct MongoSettings {
    pub url: String,
    pub database: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub port: u16,
    /// `None` keeps status checks in process memory.
    pub mongo: Option<MongoSettings>,
    pub groq_api_key: String,
    pub groq_api_base: String,
    pub groq_model: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = match lookup("PORT") {
            Some(v) => v.parse().with_context(|| format!("PORT is not a valid port: {v:?}"))?,
            None => DEFAULT_PORT,
        };

        let mongo = match lookup("MONGO_URL").filter(|u| !u.is_empty()) {
            Some(url) => {
                let database = lookup("DB_NAME").ok_or_else(|| anyhow!("DB_NAME must be set when MONGO_URL is set"))?;
                Some(MongoSettings { url, database })
            }
            None => None,
        };

        let groq_api_key = lookup("GROQ_API_KEY")
            .filter(|k| !k.is_empty())
            .ok_or_else(|| anyhow!("GROQ_API_KEY is required"))?;

        Ok(Self {
            port,
            mongo,
            groq_api_key,
            groq_api_base: lookup("GROQ_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            groq_model: lookup("GROQ_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        })
    }

    pub fn masked_api_key(&self) -> String {
        let shown: String = self.groq_api_key.chars().take(6).collect();
        format!("{shown}***")
    }
}
