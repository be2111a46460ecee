//! Configuration file.

use crate::cli::{Finder, Pick};
use crate::finders::page;
use crate::providers::cloudflare;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

/// Environment variables read when the secrets aren't in the file.
const ENV_CF_API: &str = "CF_API";
const ENV_TG_BOT_TOKEN: &str = "TG_BOT_TOKEN";
const ENV_TG_CHAT_ID: &str = "TG_CHAT_ID";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub cloudflare: CloudflareConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    #[serde(default)]
    pub state: StateConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CloudflareConfig {
    pub zone_id: String,
    pub domain: String,
    /// Falls back to the `CF_API` environment variable.
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default = "default_ttl")]
    pub ttl: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TelegramConfig {
    #[serde(default)]
    pub bot_token: Option<String>,
    #[serde(default)]
    pub chat_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiscoveryConfig {
    #[serde(default = "default_page_url")]
    pub page_url: String,
    #[serde(default = "default_finders")]
    pub finders: Vec<Finder>,
    #[serde(default = "default_pick")]
    pub pick: Pick,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StateConfig {
    #[serde(default = "default_state_dir")]
    pub dir: PathBuf,
}

fn default_ttl() -> u32 {
    cloudflare::DEFAULT_TTL
}

fn default_page_url() -> String {
    String::from(page::DEFAULT_URL)
}

fn default_finders() -> Vec<Finder> {
    vec![Finder::Page, Finder::Ipify]
}

fn default_pick() -> Pick {
    Pick::Random
}

fn default_state_dir() -> PathBuf {
    PathBuf::from("/var/lib/cloudflare-ddns")
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            page_url: default_page_url(),
            finders: default_finders(),
            pick: default_pick(),
        }
    }
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            dir: default_state_dir(),
        }
    }
}

impl TelegramConfig {
    /// The bot token and the chat; `None` when any of them is missing, which
    /// disables the notifications.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.bot_token.as_deref(), self.chat_id.as_deref()) {
            (Some(t), Some(c)) if !t.is_empty() && !c.is_empty() => Some((t, c)),
            _ => None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file, filling the missing secrets from
    /// the environment.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents, |name| std::env::var(name).ok())
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Parses `contents`; `env` resolves the environment variables.
    fn from_toml(contents: &str, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config: Config = toml::from_str(contents).context("Failed to parse TOML")?;

        if config.cloudflare.api_token.is_none() {
            config.cloudflare.api_token = env(ENV_CF_API);
        }
        if config.telegram.bot_token.is_none() {
            config.telegram.bot_token = env(ENV_TG_BOT_TOKEN);
        }
        if config.telegram.chat_id.is_none() {
            config.telegram.chat_id = env(ENV_TG_CHAT_ID);
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.cloudflare.zone_id.is_empty() {
            bail!("cloudflare.zone_id cannot be empty");
        }
        if self.cloudflare.domain.is_empty() {
            bail!("cloudflare.domain cannot be empty");
        }
        match self.cloudflare.api_token.as_deref() {
            None | Some("") => bail!(
                "cloudflare.api_token is required, set it in the file or in the {} environment variable",
                ENV_CF_API
            ),
            Some(_) => {}
        }
        if self.discovery.finders.is_empty() {
            bail!("discovery.finders must contain at least one finder");
        }

        Ok(())
    }

    /// The API token; it's always present after a successful load.
    pub fn api_token(&self) -> &str {
        self.cloudflare.api_token.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_minimal_config() {
        let config = Config::from_toml(
            r#"
            [cloudflare]
            zone_id = "zone-123"
            domain = "home.example.com"
            api_token = "secret"
            "#,
            no_env,
        )
        .expect("valid config");

        assert_eq!(config.api_token(), "secret");
        assert_eq!(config.cloudflare.ttl, 120);
        assert_eq!(config.discovery.page_url, "https://ip.164746.xyz/ipTop.html");
        assert_eq!(config.discovery.finders, vec![Finder::Page, Finder::Ipify]);
        assert_eq!(config.discovery.pick, Pick::Random);
        assert_eq!(config.state.dir, PathBuf::from("/var/lib/cloudflare-ddns"));
        assert_eq!(config.telegram.credentials(), None);
    }

    #[test]
    fn test_full_config() {
        let config = Config::from_toml(
            r#"
            [cloudflare]
            zone_id = "zone-123"
            domain = "home.example.com"
            api_token = "secret"
            ttl = 300

            [telegram]
            bot_token = "123:abc"
            chat_id = "42"

            [discovery]
            page_url = "https://example.com/ip"
            finders = ["ipify"]
            pick = "first"

            [state]
            dir = "/tmp/ddns"
            "#,
            no_env,
        )
        .expect("valid config");

        assert_eq!(config.cloudflare.ttl, 300);
        assert_eq!(config.telegram.credentials(), Some(("123:abc", "42")));
        assert_eq!(config.discovery.finders, vec![Finder::Ipify]);
        assert_eq!(config.discovery.pick, Pick::First);
        assert_eq!(config.state.dir, PathBuf::from("/tmp/ddns"));
    }

    #[test]
    fn test_secrets_from_env() {
        let env = |name: &str| match name {
            "CF_API" => Some(String::from("env-secret")),
            "TG_BOT_TOKEN" => Some(String::from("123:abc")),
            "TG_CHAT_ID" => Some(String::from("42")),
            _ => None,
        };

        let config = Config::from_toml(
            r#"
            [cloudflare]
            zone_id = "zone-123"
            domain = "home.example.com"
            "#,
            env,
        )
        .expect("valid config");

        assert_eq!(config.api_token(), "env-secret");
        assert_eq!(config.telegram.credentials(), Some(("123:abc", "42")));
    }

    #[test]
    fn test_invalid_config() {
        let tests = [
            (
                "[cloudflare]\nzone_id = \"z\"\ndomain = \"d.com\"\n",
                "cloudflare.api_token is required",
            ),
            (
                "[cloudflare]\nzone_id = \"\"\ndomain = \"d.com\"\napi_token = \"s\"\n",
                "cloudflare.zone_id cannot be empty",
            ),
            (
                "[cloudflare]\nzone_id = \"z\"\ndomain = \"d.com\"\napi_token = \"s\"\n[discovery]\nfinders = []\n",
                "discovery.finders must contain at least one finder",
            ),
            ("[cloudflare]\nzone_id = \"z\"\n", "Failed to parse TOML"),
        ];

        for (contents, msg) in tests {
            let err = Config::from_toml(contents, no_env).expect_err("invalid config");
            assert!(err.to_string().starts_with(msg), "got: {}", err);
        }
    }

    #[test]
    fn test_empty_telegram_credentials() {
        let telegram = TelegramConfig {
            bot_token: Some(String::from("123:abc")),
            chat_id: Some(String::new()),
        };
        assert_eq!(telegram.credentials(), None);
    }
}
