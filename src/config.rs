//! Runtime configuration
//!
//! Settings live in the `app_settings` table and can be overridden by
//! environment variables. Environment variables take precedence.

use anyhow::{anyhow, Result};
use std::env;

use crate::db::Database;
use crate::identity::{Role, StaticIdentity};

// Settings keys for database storage
pub const SETTING_API_URL: &str = "api_url";
pub const SETTING_API_TOKEN: &str = "api_token";
pub const SETTING_TENANT_ID: &str = "tenant_id";
pub const SETTING_ROLE: &str = "role";
pub const SETTING_USER: &str = "user";

// Environment variable names
const ENV_API_URL: &str = "ROSTER_API_URL";
const ENV_API_TOKEN: &str = "ROSTER_API_TOKEN";
const ENV_TENANT_ID: &str = "ROSTER_TENANT";
const ENV_ROLE: &str = "ROSTER_ROLE";
const ENV_USER: &str = "ROSTER_USER";

pub const DEFAULT_TENANT_ID: &str = "test-001";

/// Keys accepted by `config set`
pub const SETTING_KEYS: &[&str] = &[
    SETTING_API_URL,
    SETTING_API_TOKEN,
    SETTING_TENANT_ID,
    SETTING_ROLE,
    SETTING_USER,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the timetable API. No remote persistence when unset.
    pub api_url: Option<String>,
    pub api_token: Option<String>,
    pub tenant_id: String,
    pub role: Role,
    pub user: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: None,
            api_token: None,
            tenant_id: DEFAULT_TENANT_ID.to_string(),
            role: Role::Viewer,
            user: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables and database settings.
    pub fn load(db: &Database) -> Result<Self> {
        Self::load_with(db, |name| env::var(name).ok())
    }

    /// Same as [`load`](Self::load) with a custom environment lookup
    pub fn load_with<F>(db: &Database, env_var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |env_name: &str, key: &str| -> Result<Option<String>> {
            match env_var(env_name).filter(|v| !v.trim().is_empty()) {
                Some(v) => Ok(Some(v)),
                None => db.get_setting(key),
            }
        };

        let api_url = lookup(ENV_API_URL, SETTING_API_URL)?
            .map(|url| url.trim_end_matches('/').to_string());
        let api_token = lookup(ENV_API_TOKEN, SETTING_API_TOKEN)?;
        let tenant_id = lookup(ENV_TENANT_ID, SETTING_TENANT_ID)?
            .unwrap_or_else(|| DEFAULT_TENANT_ID.to_string());
        let role = lookup(ENV_ROLE, SETTING_ROLE)?
            .map(|r| Role::parse(&r))
            .unwrap_or_default();
        let user = lookup(ENV_USER, SETTING_USER)?;

        Ok(Self {
            api_url,
            api_token,
            tenant_id,
            role,
            user,
        })
    }

    pub fn identity(&self) -> StaticIdentity {
        StaticIdentity::new(self.role, self.tenant_id.clone()).with_user(self.user.clone())
    }

    /// Store one setting after checking the key and value
    pub fn set(db: &Database, key: &str, value: &str) -> Result<()> {
        if !SETTING_KEYS.contains(&key) {
            return Err(anyhow!(
                "Unknown setting: {} (expected one of: {})",
                key,
                SETTING_KEYS.join(", ")
            ));
        }
        let value = value.trim();
        if value.is_empty() {
            return Err(anyhow!("Value for {} cannot be empty.", key));
        }
        if key == SETTING_ROLE && !matches!(value, "admin" | "viewer") {
            return Err(anyhow!("Role must be admin or viewer."));
        }
        if key == SETTING_API_URL && !(value.starts_with("http://") || value.starts_with("https://")) {
            return Err(anyhow!("API URL must start with http:// or https://"));
        }
        db.set_setting(key, value)
    }

    pub fn unset(db: &Database, key: &str) -> Result<bool> {
        db.delete_setting(key)
    }
}
