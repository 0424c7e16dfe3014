//! Configuration types, built from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use regex::Regex;
use secrecy::SecretString;

use crate::error::ConfigError;

/// Individual contacts on the messaging network: 12 digits + `@c.us`.
pub const DEFAULT_ADDRESS_PATTERN: &str = r"^\d{12}@c\.us$";

/// Default header carrying the lead webhook secret.
pub const DEFAULT_WEBHOOK_AUTH_HEADER: &str = "x-make-apikey";

/// Responder configuration.
#[derive(Debug, Clone)]
pub struct ResponderConfig {
    pub semantic: SemanticConfig,
    pub lead_webhook: Option<LeadWebhookConfig>,
    pub gateway: GatewayConfig,
    pub bridge: BridgeConfig,
    pub filter: FilterConfig,
    /// Delay before the first send of a reply.
    pub pacing: Duration,
    /// Directory holding the poster and product grid images.
    pub media_dir: PathBuf,
    /// Directory for the rolling log file (stderr only when unset).
    pub log_dir: Option<PathBuf>,
}

/// Semantic answer service.
#[derive(Debug, Clone)]
pub struct SemanticConfig {
    pub host: String,
    pub port: u16,
    pub timeout: Duration,
}

impl SemanticConfig {
    pub fn base_url(&self) -> String {
        format!("http://{}:{}/", self.host, self.port)
    }
}

/// Downstream automation webhook receiving one record per exchange.
#[derive(Debug, Clone)]
pub struct LeadWebhookConfig {
    pub url: String,
    pub api_key: Option<SecretString>,
    pub auth_header: String,
}

/// Control endpoint bind address and shared secret.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    /// When unset, `POST /send` accepts any token.
    pub secret: Option<SecretString>,
}

impl GatewayConfig {
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::invalid("WHATSAPP_API_HOST", format!("{e}")))
    }
}

/// Messaging session bridge.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub url: String,
    pub token: Option<SecretString>,
    /// Appended to bare numbers given to `POST /send`.
    pub contact_suffix: String,
}

/// Sender eligibility rules.
#[derive(Debug, Clone)]
pub struct FilterConfig {
    pub denylist: Vec<String>,
    pub address_pattern: Regex,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            denylist: Vec::new(),
            address_pattern: default_address_regex(),
        }
    }
}

fn default_address_regex() -> Regex {
    Regex::new(DEFAULT_ADDRESS_PATTERN).expect("default address pattern is valid")
}

impl ResponderConfig {
    /// Build config from the process environment (after loading `.env`).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let semantic = SemanticConfig {
            host: get("SEMANTIC_SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or(&get, "SEMANTIC_SERVER_PORT", 8000)?,
            timeout: Duration::from_millis(parse_or(&get, "SEMANTIC_TIMEOUT_MS", 2000)?),
        };

        let lead_webhook = get("MAKE_WEBHOOK_URL").map(|url| LeadWebhookConfig {
            url,
            api_key: get("MAKE_API_KEY").map(SecretString::from),
            auth_header: get("LEAD_WEBHOOK_AUTH_HEADER")
                .unwrap_or_else(|| DEFAULT_WEBHOOK_AUTH_HEADER.to_string()),
        });

        let gateway = GatewayConfig {
            host: get("WHATSAPP_API_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or(&get, "WHATSAPP_API_PORT", 1520)?,
            secret: get("WHATSAPP_SECRET").map(SecretString::from),
        };

        let bridge = BridgeConfig {
            url: get("WHATSAPP_BRIDGE_URL")
                .unwrap_or_else(|| "http://127.0.0.1:3000".to_string())
                .trim_end_matches('/')
                .to_string(),
            token: get("WHATSAPP_BRIDGE_TOKEN").map(SecretString::from),
            contact_suffix: get("WHATSAPP_CONTACT_SUFFIX").unwrap_or_else(|| "@c.us".to_string()),
        };

        let denylist: Vec<String> = get("EXCLUDED_SENDERS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let address_pattern = match get("SENDER_ADDRESS_PATTERN") {
            Some(pattern) => Regex::new(&pattern)
                .map_err(|e| ConfigError::invalid("SENDER_ADDRESS_PATTERN", e.to_string()))?,
            None => default_address_regex(),
        };

        Ok(Self {
            semantic,
            lead_webhook,
            gateway,
            bridge,
            filter: FilterConfig {
                denylist,
                address_pattern,
            },
            pacing: Duration::from_millis(parse_or(&get, "RESPONDER_PACING_MS", 3000)?),
            media_dir: get("RESPONDER_MEDIA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("images")),
            log_dir: get("RESPONDER_LOG_DIR").map(PathBuf::from),
        })
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::invalid(key, format!("{raw:?}: {e}"))),
        None => Ok(default),
    }
}
