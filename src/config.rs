//! Connection parameters for the conversion service.
//!
//! This module provides [`ClientConfig`] and [`ClientConfigBuilder`] for
//! configuring credentials, endpoint, transport security and timeouts.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use html2pdf_client::ClientConfigBuilder;
//!
//! let config = ClientConfigBuilder::new()
//!     .credentials("demo", "ce544b6ea52a5621fb9d55f8b542d14d")
//!     .use_ssl(true)
//!     .timeout(Duration::from_secs(30))
//!     .build()
//!     .expect("Invalid configuration");
//!
//! assert_eq!(config.port(), 443);
//! assert_eq!(config.base_url(), "https://pdfcrowd.com:443");
//! ```
//!
//! # Environment Configuration
//!
//! When the `env-config` feature is enabled, you can load configuration
//! from environment variables and an optional `app.env` file:
//!
//! ```rust,ignore
//! use html2pdf_client::config::env::from_env;
//!
//! let config = from_env()?;
//! ```
//!
//! See [`mod@env`] module for available environment variables.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::options::OutputFormat;

/// Default service host.
pub const DEFAULT_HOST: &str = "pdfcrowd.com";

/// Default plain-HTTP port.
pub const DEFAULT_HTTP_PORT: u16 = 80;

/// Default HTTPS port.
pub const DEFAULT_HTTPS_PORT: u16 = 443;

/// Default connect/read timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// PEM files presented to the service for mutual TLS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientCertificate {
    /// Certificate chain, leaf first.
    pub cert_path: PathBuf,
    /// Private key matching the leaf certificate.
    pub key_path: PathBuf,
}

/// Connection parameters used for every request a client sends.
///
/// Use [`ClientConfigBuilder`] for validation and convenience.
///
/// # Fields Overview
///
/// | Field | Default | Description |
/// |-------|---------|-------------|
/// | `username` | required | Account name |
/// | `api_key` | required | Account API key |
/// | `host` | `pdfcrowd.com` | Service host name |
/// | `http_port` | 80 | Port used when SSL is off |
/// | `https_port` | 443 | Port used when SSL is on |
/// | `use_ssl` | false | Send requests over HTTPS |
/// | `output_format` | PDF | Endpoint family |
/// | `timeout` | 60s | Connect and read timeout |
/// | `fallback_port` | none | Port tried once when connecting fails |
/// | `insecure` | false | Skip certificate verification |
/// | `proxy` | none | Proxy URL, e.g. `http://proxy:3128` |
/// | `client_cert` | none | Client certificate for mutual TLS |
/// | `fail_on_non200` | none | Sent as a form field when set |
/// | `user_agent` | `html2pdf-client/<version>` | `User-Agent` header |
///
/// The `Debug` output never shows the API key.
#[derive(Clone, PartialEq)]
pub struct ClientConfig {
    /// Account name sent as the `username` field.
    pub username: String,

    /// API key sent as the `key` field.
    pub api_key: String,

    /// Service host name, without scheme or port.
    pub host: String,

    /// Port used when [`use_ssl`](Self::use_ssl) is off.
    pub http_port: u16,

    /// Port used when [`use_ssl`](Self::use_ssl) is on.
    pub https_port: u16,

    /// Send requests over HTTPS.
    pub use_ssl: bool,

    /// Document type requested from the service.
    pub output_format: OutputFormat,

    /// Applies separately to connecting, waiting for the response and
    /// reading the body.
    pub timeout: Duration,

    /// Port the request is re-sent to, once, when connecting to the primary
    /// port fails. Ignored when equal to the primary port.
    pub fallback_port: Option<u16>,

    /// Accept any server certificate. Only meaningful with SSL.
    pub insecure: bool,

    /// Proxy URL.
    pub proxy: Option<String>,

    /// Client certificate for mutual TLS.
    pub client_cert: Option<ClientCertificate>,

    /// Ask the service to fail when the source URI answers non-200.
    pub fail_on_non200: Option<bool>,

    /// `User-Agent` header value.
    pub user_agent: String,
}

impl ClientConfig {
    /// Port requests are sent to, according to [`use_ssl`](Self::use_ssl).
    pub fn port(&self) -> u16 {
        if self.use_ssl {
            self.https_port
        } else {
            self.http_port
        }
    }

    /// URL scheme according to [`use_ssl`](Self::use_ssl).
    pub fn scheme(&self) -> &'static str {
        if self.use_ssl { "https" } else { "http" }
    }

    /// `scheme://host:port` for the primary port.
    pub fn base_url(&self) -> String {
        self.base_url_with_port(self.port())
    }

    /// `scheme://host:port` for an explicit port.
    pub fn base_url_with_port(&self, port: u16) -> String {
        format!("{}://{}:{}", self.scheme(), self.host, port)
    }

    /// Fallback port worth trying, i.e. configured and different from the primary.
    pub fn effective_fallback_port(&self) -> Option<u16> {
        self.fallback_port.filter(|p| *p != self.port())
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("username", &self.username)
            .field("api_key", &"<redacted>")
            .field("host", &self.host)
            .field("http_port", &self.http_port)
            .field("https_port", &self.https_port)
            .field("use_ssl", &self.use_ssl)
            .field("output_format", &self.output_format)
            .field("timeout", &self.timeout)
            .field("fallback_port", &self.fallback_port)
            .field("insecure", &self.insecure)
            .field("proxy", &self.proxy)
            .field("client_cert", &self.client_cert)
            .field("fail_on_non200", &self.fail_on_non200)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Builder for [`ClientConfig`] with validation.
///
/// Provides a fluent API for constructing validated configurations.
/// All setter methods can be chained together.
///
/// # Validation
///
/// The [`build()`](Self::build) method validates:
/// - username and API key are not empty
/// - host is not empty
/// - ports and timeout are not zero
/// - the fallback port differs from the port in use
/// - the proxy, if any, parses as a URL
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Create a new builder with default values and no credentials.
    pub fn new() -> Self {
        Self {
            config: ClientConfig {
                username: String::new(),
                api_key: String::new(),
                host: DEFAULT_HOST.to_string(),
                http_port: DEFAULT_HTTP_PORT,
                https_port: DEFAULT_HTTPS_PORT,
                use_ssl: false,
                output_format: OutputFormat::Pdf,
                timeout: DEFAULT_TIMEOUT,
                fallback_port: None,
                insecure: false,
                proxy: None,
                client_cert: None,
                fail_on_non200: None,
                user_agent: concat!("html2pdf-client/", env!("CARGO_PKG_VERSION")).to_string(),
            },
        }
    }

    /// Set username and API key.
    pub fn credentials<U: Into<String>, K: Into<String>>(mut self, username: U, api_key: K) -> Self {
        self.config.username = username.into();
        self.config.api_key = api_key.into();
        self
    }

    /// Set the service host name.
    ///
    /// # Example
    ///
    /// ```rust
    /// use html2pdf_client::ClientConfigBuilder;
    ///
    /// let config = ClientConfigBuilder::new()
    ///     .credentials("user", "key")
    ///     .host("localhost")
    ///     .http_port(8080)
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(config.base_url(), "http://localhost:8080");
    /// ```
    pub fn host<S: Into<String>>(mut self, host: S) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the plain-HTTP port.
    pub fn http_port(mut self, port: u16) -> Self {
        self.config.http_port = port;
        self
    }

    /// Set the HTTPS port.
    pub fn https_port(mut self, port: u16) -> Self {
        self.config.https_port = port;
        self
    }

    /// Send requests over HTTPS.
    pub fn use_ssl(mut self, enabled: bool) -> Self {
        self.config.use_ssl = enabled;
        self
    }

    /// Select PDF or image output.
    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.config.output_format = format;
        self
    }

    /// Set the connect/read timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Port tried once when connecting to the primary port fails.
    pub fn fallback_port(mut self, port: u16) -> Self {
        self.config.fallback_port = Some(port);
        self
    }

    /// Skip server certificate verification.
    pub fn insecure(mut self, enabled: bool) -> Self {
        self.config.insecure = enabled;
        self
    }

    /// Route requests through a proxy.
    pub fn proxy<S: Into<String>>(mut self, url: S) -> Self {
        self.config.proxy = Some(url.into());
        self
    }

    /// Present a client certificate (PEM files).
    pub fn client_cert<C: Into<PathBuf>, K: Into<PathBuf>>(mut self, cert_path: C, key_path: K) -> Self {
        self.config.client_cert = Some(ClientCertificate {
            cert_path: cert_path.into(),
            key_path: key_path.into(),
        });
        self
    }

    /// Send `fail_on_non200` with every conversion.
    pub fn fail_on_non200(mut self, enabled: bool) -> Self {
        self.config.fail_on_non200 = Some(enabled);
        self
    }

    /// Override the `User-Agent` header.
    pub fn user_agent<S: Into<String>>(mut self, agent: S) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid setting.
    ///
    /// # Example
    ///
    /// ```rust
    /// use html2pdf_client::ClientConfigBuilder;
    ///
    /// // Missing credentials
    /// assert!(ClientConfigBuilder::new().build().is_err());
    ///
    /// // Fallback port equal to the port in use
    /// let config = ClientConfigBuilder::new()
    ///     .credentials("user", "key")
    ///     .fallback_port(80)
    ///     .build();
    /// assert!(config.is_err());
    /// ```
    pub fn build(self) -> std::result::Result<ClientConfig, String> {
        let config = self.config;

        if config.username.trim().is_empty() {
            return Err("username is required".to_string());
        }

        if config.api_key.trim().is_empty() {
            return Err("API key is required".to_string());
        }

        if config.host.trim().is_empty() {
            return Err("host must not be empty".to_string());
        }

        if config.http_port == 0 || config.https_port == 0 {
            return Err("ports must be greater than 0".to_string());
        }

        if config.timeout.is_zero() {
            return Err("timeout must be greater than 0".to_string());
        }

        if let Some(port) = config.fallback_port {
            if port == 0 {
                return Err("fallback_port must be greater than 0".to_string());
            }
            if port == config.port() {
                return Err(format!(
                    "fallback_port {} is the same as the port in use",
                    port
                ));
            }
        }

        if let Some(proxy) = &config.proxy {
            url::Url::parse(proxy).map_err(|e| format!("invalid proxy URL '{}': {}", proxy, e))?;
        }

        Ok(config)
    }
}

impl Default for ClientConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Environment Configuration (feature-gated)
// ============================================================================

/// Environment-based configuration loading.
///
/// This module is only available when the `env-config` feature is enabled.
///
/// # Environment File
///
/// This module uses `dotenvy` to load environment variables from an `app.env`
/// file in the current directory. The file is optional - if not found,
/// environment variables and defaults are used.
///
/// # Environment Variables
///
/// | Variable | Type | Default | Description |
/// |----------|------|---------|-------------|
/// | `HTML2PDF_USERNAME` | String | required | Account name |
/// | `HTML2PDF_API_KEY` | String | required | API key |
/// | `HTML2PDF_HOST` | String | `pdfcrowd.com` | Service host |
/// | `HTML2PDF_HTTP_PORT` | u16 | 80 | Plain-HTTP port |
/// | `HTML2PDF_HTTPS_PORT` | u16 | 443 | HTTPS port |
/// | `HTML2PDF_USE_SSL` | bool | false | Use HTTPS |
/// | `HTML2PDF_TIMEOUT_SECONDS` | u64 | 60 | Connect/read timeout |
/// | `HTML2PDF_FALLBACK_PORT` | u16 | none | Fallback port |
/// | `HTML2PDF_PROXY` | String | none | Proxy URL |
/// | `HTML2PDF_INSECURE` | bool | false | Skip certificate checks |
///
/// # Example `app.env` File
///
/// ```text
/// HTML2PDF_USERNAME=demo
/// HTML2PDF_API_KEY=ce544b6ea52a5621fb9d55f8b542d14d
/// HTML2PDF_USE_SSL=true
///
/// # Local test server (optional)
/// # HTML2PDF_HOST=localhost
/// # HTML2PDF_HTTP_PORT=8080
/// ```
#[cfg(feature = "env-config")]
pub mod env {
    use super::*;
    use crate::error::ConversionError;

    /// Default environment file name.
    pub const ENV_FILE_NAME: &str = "app.env";

    /// Load environment variables from `app.env` file.
    ///
    /// This function is automatically called by [`from_env`], but you can
    /// call it explicitly if you need to load the file earlier or check
    /// for errors.
    pub fn load_env_file() -> Result<std::path::PathBuf, dotenvy::Error> {
        dotenvy::from_filename(ENV_FILE_NAME)
    }

    /// Load configuration from environment variables.
    ///
    /// Also loads `app.env` file if present (via `dotenvy`). Values that fail
    /// to parse are logged and replaced by their defaults.
    ///
    /// # Errors
    ///
    /// Returns a usage error if credentials are missing or the resulting
    /// configuration is invalid.
    pub fn from_env() -> Result<ClientConfig, ConversionError> {
        match load_env_file() {
            Ok(path) => {
                log::info!("📁 Loaded configuration from: {:?}", path);
            }
            Err(e) => {
                log::debug!(
                    "📁 No {} file found or failed to load: {} (using environment variables and defaults)",
                    ENV_FILE_NAME,
                    e
                );
            }
        }

        let username = std::env::var("HTML2PDF_USERNAME").unwrap_or_default();
        let api_key = std::env::var("HTML2PDF_API_KEY").unwrap_or_default();
        let host = std::env::var("HTML2PDF_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let http_port = parsed_var("HTML2PDF_HTTP_PORT").unwrap_or(DEFAULT_HTTP_PORT);
        let https_port = parsed_var("HTML2PDF_HTTPS_PORT").unwrap_or(DEFAULT_HTTPS_PORT);
        let use_ssl = bool_var("HTML2PDF_USE_SSL").unwrap_or(false);
        let timeout_seconds = parsed_var("HTML2PDF_TIMEOUT_SECONDS").unwrap_or(DEFAULT_TIMEOUT.as_secs());
        let fallback_port: Option<u16> = parsed_var("HTML2PDF_FALLBACK_PORT");
        let proxy = std::env::var("HTML2PDF_PROXY").ok().filter(|p| !p.is_empty());
        let insecure = bool_var("HTML2PDF_INSECURE").unwrap_or(false);

        log::info!("🔧 Loading client configuration from environment:");
        log::info!("   - Host: {}", host);
        log::info!("   - Ports: http={} https={}", http_port, https_port);
        log::info!("   - SSL: {}", use_ssl);
        log::info!("   - Timeout: {}s", timeout_seconds);
        if let Some(port) = fallback_port {
            log::info!("   - Fallback port: {}", port);
        }

        let mut builder = ClientConfigBuilder::new()
            .credentials(username, api_key)
            .host(host)
            .http_port(http_port)
            .https_port(https_port)
            .use_ssl(use_ssl)
            .timeout(Duration::from_secs(timeout_seconds))
            .insecure(insecure);

        if let Some(port) = fallback_port {
            builder = builder.fallback_port(port);
        }
        if let Some(proxy) = proxy {
            builder = builder.proxy(proxy);
        }

        builder.build().map_err(ConversionError::from)
    }

    fn parsed_var<T: std::str::FromStr>(name: &str) -> Option<T> {
        let raw = std::env::var(name).ok()?;
        match raw.trim().parse() {
            Ok(value) => Some(value),
            Err(_) => {
                log::warn!("Ignoring {}={:?}: not a valid value", name, raw);
                None
            }
        }
    }

    fn bool_var(name: &str) -> Option<bool> {
        let raw = std::env::var(name).ok()?;
        let parsed = parse_bool(&raw);
        if parsed.is_none() {
            log::warn!("Ignoring {}={:?}: expected true or false", name, raw);
        }
        parsed
    }

    /// Accepts `true/false`, `1/0`, `yes/no` and `on/off`, case-insensitively.
    pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
