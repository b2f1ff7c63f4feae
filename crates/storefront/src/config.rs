//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CARDFOLIO_BASE_URL` - Public URL for the storefront
//! - `BACKEND_API_URL` - Base URL of the profile/cart backend REST API
//!
//! ## Optional
//! - `CARDFOLIO_HOST` - Bind address (default: 127.0.0.1)
//! - `CARDFOLIO_PORT` - Listen port (default: 3000)
//! - `BACKEND_TIMEOUT_SECS` - Per-request backend timeout (default: none)
//! - `EMAILJS_SERVICE_ID`, `EMAILJS_TEMPLATE_ID`, `EMAILJS_PUBLIC_KEY` - Email
//!   relay for the contact form (all three or none)
//! - `EMAILJS_API_URL` - Relay endpoint (default: EmailJS send endpoint)
//! - `WHATSAPP_NUMBER` - Number for the chat widget (widget hidden if unset)
//! - `WHATSAPP_MESSAGE` - Prefilled chat message
//! - `STORE_CURRENCY` - Currency label for cart amounts (default: AED)
//! - `CHECKOUT_URL` - Where `/checkout` sends the visitor
//! - `SHOP_URL` - Where `/shop` sends the visitor
//! - `LOGIN_URL` - Where visitors without a session are sent
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use cardfolio_core::DEFAULT_CURRENCY;

use crate::navigation::Route;

/// Default EmailJS REST endpoint.
pub const DEFAULT_EMAILJS_API_URL: &str = "https://api.emailjs.com/api/v1.0/email/send";

const DEFAULT_WHATSAPP_MESSAGE: &str = "Hello! I would like to know more about your digital business cards.";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Backend REST API configuration
    pub backend: BackendConfig,
    /// Email relay used by the contact form
    pub email_relay: Option<EmailRelayConfig>,
    /// WhatsApp chat widget
    pub whatsapp: Option<WhatsappConfig>,
    /// Store links and currency
    pub store: StoreConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Backend REST API configuration.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL without a trailing slash, e.g. `https://api.example.com/api`
    pub api_url: String,
    /// Optional per-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

/// Email relay (EmailJS) configuration.
///
/// Implements `Debug` manually to redact the public key.
#[derive(Clone)]
pub struct EmailRelayConfig {
    pub api_url: String,
    pub service_id: String,
    pub template_id: String,
    pub public_key: SecretString,
}

impl std::fmt::Debug for EmailRelayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailRelayConfig")
            .field("api_url", &self.api_url)
            .field("service_id", &self.service_id)
            .field("template_id", &self.template_id)
            .field("public_key", &"[REDACTED]")
            .finish()
    }
}

/// WhatsApp chat widget configuration.
#[derive(Debug, Clone)]
pub struct WhatsappConfig {
    /// Phone number in international format; non-digits are stripped.
    pub number: String,
    /// Prefilled message text.
    pub message: String,
}

/// Store links and currency.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub currency: String,
    pub checkout_url: String,
    pub shop_url: String,
    pub login_url: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            currency: DEFAULT_CURRENCY.to_string(),
            checkout_url: Route::Cart.path(),
            shop_url: "/".to_string(),
            login_url: "/".to_string(),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);

        let host = env
            .or_default("CARDFOLIO_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("CARDFOLIO_HOST".to_string(), e.to_string()))?;
        let port = env
            .or_default("CARDFOLIO_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("CARDFOLIO_PORT".to_string(), e.to_string()))?;
        let base_url = env.required("CARDFOLIO_BASE_URL")?;

        Ok(Self {
            host,
            port,
            base_url,
            backend: BackendConfig::from_env(&env)?,
            email_relay: EmailRelayConfig::from_env(&env)?,
            whatsapp: WhatsappConfig::from_env(&env),
            store: StoreConfig::from_env(&env),
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl BackendConfig {
    /// Load only the backend settings (used by the CLI).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `BACKEND_API_URL` is missing or invalid.
    pub fn from_process_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        let lookup = |key: &str| std::env::var(key).ok();
        Self::from_env(&Env(&lookup))
    }

    fn from_env(env: &Env<'_>) -> Result<Self, ConfigError> {
        let raw = env.required("BACKEND_API_URL")?;
        let parsed = Url::parse(&raw)
            .map_err(|e| ConfigError::InvalidEnvVar("BACKEND_API_URL".to_string(), e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEnvVar(
                "BACKEND_API_URL".to_string(),
                format!("unsupported scheme '{}'", parsed.scheme()),
            ));
        }

        let timeout = env
            .optional("BACKEND_TIMEOUT_SECS")
            .map(|secs| {
                secs.parse::<u64>().map(Duration::from_secs).map_err(|e| {
                    ConfigError::InvalidEnvVar("BACKEND_TIMEOUT_SECS".to_string(), e.to_string())
                })
            })
            .transpose()?;

        Ok(Self {
            api_url: raw.trim_end_matches('/').to_string(),
            timeout,
        })
    }
}

impl EmailRelayConfig {
    fn from_env(env: &Env<'_>) -> Result<Option<Self>, ConfigError> {
        let Some(service_id) = env.optional("EMAILJS_SERVICE_ID") else {
            return Ok(None);
        };

        Ok(Some(Self {
            api_url: env.or_default("EMAILJS_API_URL", DEFAULT_EMAILJS_API_URL),
            service_id,
            template_id: env.required("EMAILJS_TEMPLATE_ID")?,
            public_key: SecretString::from(env.required("EMAILJS_PUBLIC_KEY")?),
        }))
    }
}

impl WhatsappConfig {
    fn from_env(env: &Env<'_>) -> Option<Self> {
        let number = env.optional("WHATSAPP_NUMBER")?;
        Some(Self {
            number,
            message: env.or_default("WHATSAPP_MESSAGE", DEFAULT_WHATSAPP_MESSAGE),
        })
    }
}

impl StoreConfig {
    fn from_env(env: &Env<'_>) -> Self {
        let defaults = Self::default();
        Self {
            currency: env.or_default("STORE_CURRENCY", &defaults.currency),
            checkout_url: env.or_default("CHECKOUT_URL", &defaults.checkout_url),
            shop_url: env.or_default("SHOP_URL", &defaults.shop_url),
            login_url: env.or_default("LOGIN_URL", &defaults.login_url),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable lookup with the usual required/optional/default accessors.
struct Env<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Env<'_> {
    /// Get an optional variable; blank values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| map.get(key).cloned())
    }

    const MINIMAL: &[(&str, &str)] = &[
        ("CARDFOLIO_BASE_URL", "http://localhost:3000"),
        ("BACKEND_API_URL", "https://api.example.test/api/"),
    ];

    #[test]
    fn test_minimal_config_defaults() {
        let config = load(MINIMAL).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.backend.api_url, "https://api.example.test/api");
        assert!(config.backend.timeout.is_none());
        assert!(config.email_relay.is_none());
        assert!(config.whatsapp.is_none());
        assert_eq!(config.store.currency, "AED");
    }

    #[test]
    fn test_socket_addr() {
        let config = load(MINIMAL).unwrap();
        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_missing_backend_url() {
        let err = load(&[("CARDFOLIO_BASE_URL", "http://localhost:3000")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(key) if key == "BACKEND_API_URL"));
    }

    #[test]
    fn test_invalid_backend_scheme() {
        let err = load(&[
            ("CARDFOLIO_BASE_URL", "http://localhost:3000"),
            ("BACKEND_API_URL", "ftp://api.example.test"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_backend_timeout() {
        let mut vars = MINIMAL.to_vec();
        vars.push(("BACKEND_TIMEOUT_SECS", "15"));
        let config = load(&vars).unwrap();
        assert_eq!(config.backend.timeout, Some(Duration::from_secs(15)));

        let mut vars = MINIMAL.to_vec();
        vars.push(("BACKEND_TIMEOUT_SECS", "soon"));
        assert!(load(&vars).is_err());
    }

    #[test]
    fn test_partial_email_relay_is_an_error() {
        let mut vars = MINIMAL.to_vec();
        vars.push(("EMAILJS_SERVICE_ID", "service_x"));
        let err = load(&vars).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(key) if key == "EMAILJS_TEMPLATE_ID"));
    }

    #[test]
    fn test_email_relay_debug_redacts_key() {
        let mut vars = MINIMAL.to_vec();
        vars.extend([
            ("EMAILJS_SERVICE_ID", "service_x"),
            ("EMAILJS_TEMPLATE_ID", "template_y"),
            ("EMAILJS_PUBLIC_KEY", "super_secret_public_key"),
        ]);
        let relay = load(&vars).unwrap().email_relay.unwrap();
        assert_eq!(relay.api_url, DEFAULT_EMAILJS_API_URL);
        assert_eq!(relay.public_key.expose_secret(), "super_secret_public_key");

        let debug_output = format!("{relay:?}");
        assert!(debug_output.contains("service_x"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_public_key"));
    }

    #[test]
    fn test_whatsapp_default_message() {
        let mut vars = MINIMAL.to_vec();
        vars.push(("WHATSAPP_NUMBER", "+971 50 123 4567"));
        let whatsapp = load(&vars).unwrap().whatsapp.unwrap();
        assert_eq!(whatsapp.message, DEFAULT_WHATSAPP_MESSAGE);
    }
}
