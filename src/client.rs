//! The conversion client.
//!
//! [`Client`] turns the accumulated [`ConversionOptions`] plus one
//! [`ContentSource`] into a single multipart POST, sends it and either
//! streams the document to a sink or returns a [`ConversionError`].
//!
//! # Request Layout
//!
//! | Order | Field | Notes |
//! |-------|-------|-------|
//! | 1 | option fields | One text part per option, in [`OptionKey`](crate::OptionKey) order |
//! | 2 | `fail_on_non200` | Only when configured |
//! | 3 | `username`, `key` | Credentials |
//! | 4 | `src` | Text for HTML/URI, file part for uploads |
//!
//! # Response Handling
//!
//! | Outcome | Result |
//! |---------|--------|
//! | 2xx | Body copied to the sink verbatim |
//! | Other status | Body parsed by [`ConversionError::from_response`] |
//! | No response | [`ErrorKind::Transport`](crate::ErrorKind::Transport), after at most one fallback attempt |
//!
//! # Example
//!
//! ```rust,no_run
//! use html2pdf_client::Client;
//!
//! let mut client = Client::new("username", "api-key")?;
//! client.use_ssl(true);
//! client.options_mut().set_page_width("210mm")?.set_footer_text("Page %p");
//!
//! let written = client.convert_uri_to_file("https://example.com", "example.pdf")?;
//! println!("wrote {} bytes", written);
//! # Ok::<(), html2pdf_client::ConversionError>(())
//! ```

use std::fmt;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use crate::config::{ClientConfig, ClientConfigBuilder};
use crate::error::{ConversionError, Result};
use crate::multipart::MultipartForm;
use crate::options::ConversionOptions;
use crate::source::ContentSource;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, Transport};

const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Client for the conversion service.
///
/// Holds the connection parameters, the option mapping applied to every
/// conversion and the transport. Each call sends exactly one request (two
/// when the fallback port is used) and keeps no connection afterwards.
///
/// # Thread Safety
///
/// `Client` is `Send + Sync`. Conversions take `&self`; changing options or
/// configuration takes `&mut self`.
pub struct Client {
    config: ClientConfig,
    options: ConversionOptions,
    transport: Option<Box<dyn Transport>>,
}

impl Client {
    /// Create a client with default connection parameters.
    ///
    /// # Errors
    ///
    /// Returns a usage error if `username` or `api_key` is empty.
    pub fn new<U: Into<String>, K: Into<String>>(username: U, api_key: K) -> Result<Self> {
        let config = ClientConfigBuilder::new()
            .credentials(username, api_key)
            .build()?;
        Ok(Self::with_config(config))
    }

    /// Create a client from validated connection parameters.
    pub fn with_config(config: ClientConfig) -> Self {
        log::debug!("Client configured for {}", config.base_url());
        Self {
            config,
            options: ConversionOptions::new(),
            transport: None,
        }
    }

    /// Create a builder for a client with a custom transport or options.
    ///
    /// # Example
    ///
    /// ```rust
    /// use html2pdf_client::{Client, ClientConfigBuilder};
    /// use html2pdf_client::transport::HttpTransport;
    ///
    /// let config = ClientConfigBuilder::new()
    ///     .credentials("user", "key")
    ///     .build()?;
    ///
    /// let client = Client::builder()
    ///     .transport(Box::new(HttpTransport::new(&config)))
    ///     .config(config)
    ///     .build()?;
    /// # Ok::<(), html2pdf_client::ConversionError>(())
    /// ```
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a client from `HTML2PDF_*` environment variables.
    ///
    /// See [`config::env`](crate::config::env) for the variables read.
    #[cfg(feature = "env-config")]
    pub fn from_env() -> Result<Self> {
        Ok(Self::with_config(crate::config::env::from_env()?))
    }

    // ------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------

    /// Switch between HTTPS (on the HTTPS port) and plain HTTP.
    pub fn use_ssl(&mut self, enabled: bool) -> &mut Self {
        self.config.use_ssl = enabled;
        self
    }

    /// Connection parameters.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Mutable connection parameters. Changes apply to the next call.
    pub fn config_mut(&mut self) -> &mut ClientConfig {
        &mut self.config
    }

    /// Options applied to every conversion.
    pub fn options(&self) -> &ConversionOptions {
        &self.options
    }

    /// Mutable options, for the typed setters.
    pub fn options_mut(&mut self) -> &mut ConversionOptions {
        &mut self.options
    }

    /// Replace all options at once.
    pub fn set_options(&mut self, options: ConversionOptions) -> &mut Self {
        self.options = options;
        self
    }

    // ------------------------------------------------------------------
    // HTML
    // ------------------------------------------------------------------

    /// Convert raw HTML and return the document bytes.
    pub fn convert_html(&self, html: &str) -> Result<Vec<u8>> {
        self.convert_to_vec(&ContentSource::html(html)?)
    }

    /// Convert raw HTML into `sink`, returning the number of bytes written.
    pub fn convert_html_to<W: Write + ?Sized>(&self, html: &str, sink: &mut W) -> Result<u64> {
        self.convert(&ContentSource::html(html)?, sink)
    }

    /// Convert raw HTML into the file at `path`. See [`Client::convert_to_path`].
    pub fn convert_html_to_file<P: AsRef<Path>>(&self, html: &str, path: P) -> Result<u64> {
        self.convert_to_path(&ContentSource::html(html)?, path)
    }

    // ------------------------------------------------------------------
    // URI
    // ------------------------------------------------------------------

    /// Convert the page at `uri` and return the document bytes.
    pub fn convert_uri(&self, uri: &str) -> Result<Vec<u8>> {
        self.convert_to_vec(&ContentSource::uri(uri)?)
    }

    /// Convert the page at `uri` into `sink`.
    pub fn convert_uri_to<W: Write + ?Sized>(&self, uri: &str, sink: &mut W) -> Result<u64> {
        self.convert(&ContentSource::uri(uri)?, sink)
    }

    /// Convert the page at `uri` into the file at `path`.
    pub fn convert_uri_to_file<P: AsRef<Path>>(&self, uri: &str, path: P) -> Result<u64> {
        self.convert_to_path(&ContentSource::uri(uri)?, path)
    }

    // ------------------------------------------------------------------
    // Local file
    // ------------------------------------------------------------------

    /// Upload and convert a local file, returning the document bytes.
    ///
    /// # Errors
    ///
    /// Returns a usage error, without contacting the service, if `file` is
    /// missing or unreadable.
    pub fn convert_file<P: AsRef<Path>>(&self, file: P) -> Result<Vec<u8>> {
        self.convert_to_vec(&ContentSource::file(file)?)
    }

    /// Upload and convert a local file into `sink`.
    pub fn convert_file_to<P: AsRef<Path>, W: Write + ?Sized>(&self, file: P, sink: &mut W) -> Result<u64> {
        self.convert(&ContentSource::file(file)?, sink)
    }

    /// Upload and convert a local file into the file at `path`.
    pub fn convert_file_to_file<P: AsRef<Path>, Q: AsRef<Path>>(&self, file: P, path: Q) -> Result<u64> {
        self.convert_to_path(&ContentSource::file(file)?, path)
    }

    // ------------------------------------------------------------------
    // Core
    // ------------------------------------------------------------------

    /// Convert `source` with the current options and stream the result into
    /// `sink`.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::Service`](crate::ErrorKind::Service) /
    ///   [`ErrorKind::Unstructured`](crate::ErrorKind::Unstructured) - non-2xx response
    /// - [`ErrorKind::Transport`](crate::ErrorKind::Transport) - no response, or the body
    ///   could not be read
    /// - [`ErrorKind::Io`](crate::ErrorKind::Io) - `sink` rejected the output
    pub fn convert<W: Write + ?Sized>(&self, source: &ContentSource, sink: &mut W) -> Result<u64> {
        let path = format!(
            "/api/{}/convert/{}",
            self.config.output_format.path_segment(),
            source.endpoint_suffix()
        );

        let mut form = self.conversion_form();
        source.write_to(&mut form);

        let response = self.post(&path, form)?;
        let status = response.status;
        let written = deliver(response, sink)?;

        log::info!(
            "✅ Converted {} ({} bytes, status {})",
            source.describe(),
            written,
            status
        );
        Ok(written)
    }

    /// Remaining conversion credits of the account.
    pub fn num_tokens(&self) -> Result<i64> {
        let path = format!(
            "/api/user/{}/tokens/",
            urlencoding::encode(&self.config.username)
        );

        let mut form = MultipartForm::new();
        self.write_credentials(&mut form);

        let response = self.post(&path, form)?;
        let status = response.status;

        let mut body = Vec::new();
        deliver(response, &mut body)?;
        let text = String::from_utf8_lossy(&body);

        text.trim().parse::<i64>().map_err(|_| {
            log::error!("❌ Unexpected token balance response: {:?}", text);
            ConversionError::from_response(
                &format!("unexpected token balance response: {}", text.trim()),
                Some(status),
            )
        })
    }

    fn convert_to_vec(&self, source: &ContentSource) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        self.convert(source, &mut output)?;
        Ok(output)
    }

    /// Convert `source` into the file at `path`, returning the number of
    /// bytes written.
    ///
    /// The document is staged in a temporary file next to `path` and renamed
    /// over it only once the conversion succeeded, so on any error an
    /// existing file at `path` is left untouched.
    pub fn convert_to_path<P: AsRef<Path>>(&self, source: &ContentSource, path: P) -> Result<u64> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let staged = tempfile::Builder::new()
            .prefix(".html2pdf-")
            .suffix(".part")
            .tempfile_in(dir)
            .map_err(|e| {
                ConversionError::io(format!("cannot create {}: {}", path.display(), e))
            })?;
        log::debug!("Staging output in {}", staged.path().display());

        let mut writer = BufWriter::new(staged);
        let written = self.convert(source, &mut writer)?;

        let staged = writer.into_inner().map_err(|e| {
            ConversionError::io(format!("cannot write {}: {}", path.display(), e.error()))
        })?;
        staged.persist(path).map_err(|e| {
            ConversionError::io(format!("cannot replace {}: {}", path.display(), e.error))
        })?;

        Ok(written)
    }

    /// Option fields followed by `fail_on_non200` and the credentials.
    fn conversion_form(&self) -> MultipartForm {
        let mut form = MultipartForm::new();

        for (name, value) in self.options.form_fields() {
            form.text(name, &value);
        }

        if let Some(fail) = self.config.fail_on_non200 {
            form.text("fail_on_non200", if fail { "true" } else { "false" });
        }

        self.write_credentials(&mut form);
        form
    }

    fn write_credentials(&self, form: &mut MultipartForm) {
        form.text("username", &self.config.username)
            .text("key", &self.config.api_key);
    }

    /// Send the form to `path`, retrying once on the fallback port when the
    /// primary port can't be reached.
    fn post(&self, path: &str, form: MultipartForm) -> Result<HttpResponse> {
        let default_transport;
        let transport: &dyn Transport = match &self.transport {
            Some(transport) => transport.as_ref(),
            None => {
                default_transport = HttpTransport::new(&self.config);
                &default_transport
            }
        };

        let fields = form.part_count();
        let request = HttpRequest {
            content_type: form.content_type(),
            url: format!("{}{}", self.config.base_url(), path),
            body: form.finish(),
        };

        log::debug!(
            "POST {} ({} fields, {} bytes)",
            request.url,
            fields,
            request.body.len()
        );

        let failure = match transport.send(&request) {
            Ok(response) => return Ok(response),
            Err(failure) => failure,
        };

        match self.config.effective_fallback_port() {
            Some(port) if failure.is_connect_failure() => {
                let retry = HttpRequest {
                    url: format!("{}{}", self.config.base_url_with_port(port), path),
                    ..request
                };
                log::warn!(
                    "⚠️ {} unreachable ({}), retrying on port {}",
                    self.config.base_url(),
                    failure,
                    port
                );
                transport.send(&retry).map_err(ConversionError::from)
            }
            _ => Err(failure.into()),
        }
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .field("options", &self.options.len())
            .field("custom_transport", &self.transport.is_some())
            .finish()
    }
}

/// Stream a 2xx body into `sink`, or turn any other response into an error.
fn deliver<W: Write + ?Sized>(response: HttpResponse, sink: &mut W) -> Result<u64> {
    let status = response.status;
    let success = response.is_success();
    let mut body = response.body;

    if !success {
        let mut raw = Vec::new();
        body.read_to_end(&mut raw).map_err(|e| {
            ConversionError::transport(format!(
                "failed to read error response (status {}): {}",
                status, e
            ))
        })?;

        let text = String::from_utf8_lossy(&raw);
        let error =
            ConversionError::from_response(text.trim_end_matches(['\r', '\n']), Some(status));
        log::error!("❌ Conversion failed: {}", error);
        return Err(error);
    }

    let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
    let mut written: u64 = 0;

    loop {
        let n = match body.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(ConversionError::transport(format!(
                    "failed to read response body after {} bytes: {}",
                    written, e
                )));
            }
        };

        sink.write_all(&buffer[..n])
            .map_err(|e| ConversionError::io(format!("failed to write output: {}", e)))?;
        written += n as u64;
    }

    sink.flush()
        .map_err(|e| ConversionError::io(format!("failed to flush output: {}", e)))?;

    Ok(written)
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`Client`].
///
/// The configuration is required; transport and options are optional.
pub struct ClientBuilder {
    config: Option<ClientConfig>,
    options: ConversionOptions,
    transport: Option<Box<dyn Transport>>,
}

impl ClientBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self {
            config: None,
            options: ConversionOptions::new(),
            transport: None,
        }
    }

    /// Set the connection parameters (required).
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the initial options.
    pub fn options(mut self, options: ConversionOptions) -> Self {
        self.options = options;
        self
    }

    /// Use a custom transport instead of [`HttpTransport`].
    pub fn transport(mut self, transport: Box<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns a usage error if no configuration was provided.
    pub fn build(self) -> Result<Client> {
        let config = self
            .config
            .ok_or_else(|| ConversionError::usage("No client configuration provided"))?;

        log::debug!(
            "Building client for {} (custom transport: {})",
            config.base_url(),
            self.transport.is_some()
        );

        Ok(Client {
            config,
            options: self.options,
            transport: self.transport,
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
