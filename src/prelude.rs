//! Convenient imports for common usage patterns.
//!
//! This module re-exports the most commonly used types from `html2pdf-client`,
//! allowing you to quickly get started with a single import.
//!
//! # Usage
//!
//! ```rust
//! use html2pdf_client::prelude::*;
//!
//! let mut options = ConversionOptions::new();
//! options.set_page_layout(PageLayout::SinglePage);
//! ```
//!
//! This imports:
//!
//! - [`Client`] - The conversion client
//! - [`ClientConfig`] / [`ClientConfigBuilder`] - Connection parameters
//! - [`ConversionOptions`] - Option mapping with typed setters
//! - [`PageLayout`], [`PageMode`], [`PdfZoomType`], [`OutputFormat`] - Option enums
//! - [`ConversionError`] / [`ErrorKind`] - Error type and classification
//! - [`Result`] - Result type alias

pub use crate::client::Client;
pub use crate::config::{ClientConfig, ClientConfigBuilder};
pub use crate::error::{ConversionError, ErrorKind, Result};
pub use crate::options::{ConversionOptions, OutputFormat, PageLayout, PageMode, PdfZoomType};
