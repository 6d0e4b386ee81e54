//! # html2pdf-client
//!
//! Blocking client for a remote HTML/URI/file to PDF and image conversion
//! service.
//!
//! The crate accumulates rendering options (page size, margins, headers and
//! footers, watermark, PDF security, viewer preferences), sends them with one
//! content source as a single multipart request, and either streams the
//! converted document to a sink or returns a structured error.
//!
//! ## Features
//!
//! - **Typed Options**: One validated setter per service option; invalid values
//!   are rejected before any request is sent
//! - **Streaming Output**: Write into any [`std::io::Write`], a file, or a `Vec<u8>`
//! - **Structured Errors**: Service error bodies decomposed into status, reason
//!   code, message and documentation link
//! - **Fallback Port**: One retry on a second port when the first can't be reached
//! - **Pluggable Transport**: [`HttpTransport`] by default, a mock for tests
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              Your Application               │
//! └─────────────────┬───────────────────────────┘
//!                   │ convert_html / convert_uri / convert_file
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │                  Client                     │
//! │ ┌─────────────────────────────────────────┐ │
//! │ │   ConversionOptions (option mapping)    │ │
//! │ └─────────────────────────────────────────┘ │
//! │ ┌─────────────────────────────────────────┐ │
//! │ │   ContentSource → multipart form        │ │
//! │ └─────────────────────────────────────────┘ │
//! │ ┌─────────────────────────────────────────┐ │
//! │ │   Transport (primary port, fallback)    │ │
//! │ └─────────────────────────────────────────┘ │
//! └─────────────────┬───────────────────────────┘
//!                   │ HTTP(S) POST
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │            Conversion Service               │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use html2pdf_client::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let mut client = Client::new("username", "api-key")?;
//!     client.use_ssl(true);
//!
//!     client
//!         .options_mut()
//!         .set_page_margins("1in", "0.75in", "1in", "0.75in")?
//!         .set_footer_text("Page %p of %n")
//!         .set_page_layout(PageLayout::Continuous);
//!
//!     client.convert_html_to_file("<h1>Invoice</h1>", "invoice.pdf")?;
//!     client.convert_uri_to_file("https://example.com", "example.pdf")?;
//!
//!     println!("{} tokens left", client.num_tokens()?);
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Configuration
//!
//! When the `env-config` feature is enabled, a client can be created from
//! environment variables (loaded from an `app.env` file or the system
//! environment):
//!
//! ```rust,no_run
//! use html2pdf_client::Client;
//!
//! let client = Client::from_env()?;
//! # Ok::<(), html2pdf_client::ConversionError>(())
//! ```
//!
//! ### Environment Variables
//!
//! | Variable | Type | Default | Description |
//! |----------|------|---------|-------------|
//! | `HTML2PDF_USERNAME` | String | required | Account name |
//! | `HTML2PDF_API_KEY` | String | required | API key |
//! | `HTML2PDF_HOST` | String | `pdfcrowd.com` | Service host |
//! | `HTML2PDF_HTTP_PORT` | u16 | 80 | Plain-HTTP port |
//! | `HTML2PDF_HTTPS_PORT` | u16 | 443 | HTTPS port |
//! | `HTML2PDF_USE_SSL` | bool | false | Use HTTPS |
//! | `HTML2PDF_TIMEOUT_SECONDS` | u64 | 60 | Connect/read timeout |
//! | `HTML2PDF_FALLBACK_PORT` | u16 | none | Port tried when the primary is unreachable |
//! | `HTML2PDF_PROXY` | String | none | Proxy URL |
//! | `HTML2PDF_INSECURE` | bool | false | Skip certificate verification |
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `env-config` | Environment-based configuration (default) |
//! | `cli` | The `html2pdf` command-line tool (default) |
//! | `test-utils` | Enable mock transport for testing |
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T, ConversionError>`](Result).
//! [`ErrorKind`] tells where a failure came from:
//!
//! ```rust,ignore
//! use html2pdf_client::{Client, ErrorKind};
//!
//! match client.convert_uri("https://example.com") {
//!     Ok(pdf) => std::fs::write("out.pdf", pdf)?,
//!     Err(e) if e.kind() == ErrorKind::Service => {
//!         eprintln!("{} (reason {}): {}", e.status_code().unwrap_or(0), e.reason_code(), e.message());
//!         eprintln!("see {}", e.documentation_link());
//!     }
//!     Err(e) => eprintln!("conversion failed: {}", e),
//! }
//! ```
//!
//! ## Testing
//!
//! For testing without a server, enable the `test-utils` feature and use
//! [`MockTransport`](transport::mock::MockTransport):
//!
//! ```rust,ignore
//! use html2pdf_client::transport::mock::MockTransport;
//!
//! let client = Client::builder()
//!     .config(config)
//!     .transport(Box::new(MockTransport::responding(200, b"%PDF-1.4".to_vec())))
//!     .build()?;
//! ```

#![doc(html_root_url = "https://docs.rs/html2pdf-client/0.1.0")]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// Modules
// ============================================================================

pub mod client;
pub mod config;
pub mod error;
pub mod options;
pub mod prelude;
pub mod source;
pub mod transport;

// Internal modules (not publicly exposed)
pub(crate) mod multipart;

// ============================================================================
// Re-exports (Public API)
// ============================================================================

pub use client::{Client, ClientBuilder};
pub use config::{ClientCertificate, ClientConfig, ClientConfigBuilder};
pub use error::{ConversionError, ErrorKind, Result};
pub use options::{
    ConversionOptions, OptionKey, OptionValue, OutputFormat, PageLayout, PageMode, PdfZoomType,
};
pub use source::ContentSource;
pub use transport::{HttpTransport, Transport};
