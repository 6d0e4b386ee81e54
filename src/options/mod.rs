//! Rendering options sent with every conversion.
//!
//! [`ConversionOptions`] is the option mapping: a set of
//! [`OptionKey`] → [`OptionValue`] entries that the client serializes into
//! multipart form fields at send time. Entries are only added through the
//! typed setters on [`ConversionOptions`], which validate their input when
//! called, so every stored value is known to be sendable.
//!
//! # Example
//!
//! ```rust
//! use html2pdf_client::{ConversionOptions, OptionKey, PageLayout};
//!
//! let mut options = ConversionOptions::new();
//! options
//!     .set_page_width("8.5in")?
//!     .set_page_layout(PageLayout::Continuous)
//!     .enable_backgrounds(false);
//!
//! assert_eq!(options.len(), 3);
//! assert_eq!(options.get(OptionKey::NoBackgrounds).unwrap().to_string(), "true");
//! # Ok::<(), html2pdf_client::ConversionError>(())
//! ```

mod enums;
mod setters;

use std::collections::BTreeMap;
use std::fmt;

pub use enums::{EXACT_ZOOM_CODE, OutputFormat, PageLayout, PageMode, PdfZoomType};
pub(crate) use setters::validate_http_url;

/// Identifier of a recognized conversion option.
///
/// The set is closed: the service ignores unknown fields, so typos are
/// caught at compile time instead. Variant names follow the setters that
/// store them; [`as_str()`](Self::as_str) gives the wire name.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OptionKey {
    PageWidth,
    PageHeight,
    HorizontalMargin,
    VerticalMargin,
    MarginTop,
    MarginRight,
    MarginBottom,
    MarginLeft,
    Encrypted,
    UserPassword,
    OwnerPassword,
    NoPrint,
    NoModify,
    NoCopy,
    PageLayout,
    PageMode,
    FooterText,
    FooterHtml,
    FooterUrl,
    HeaderHtml,
    HeaderUrl,
    NoImages,
    NoBackgrounds,
    HtmlZoom,
    NoJavascript,
    NoHyperlinks,
    TextEncoding,
    UsePrintMedia,
    MaxPages,
    ServiceLogo,
    InitialPdfZoomType,
    InitialPdfZoom,
    PdfScalingFactor,
    Author,
    PageBackgroundColor,
    TransparentBackground,
    PageNumberingOffset,
    HeaderFooterPageExcludeList,
    WatermarkUrl,
    WatermarkOffsetX,
    WatermarkOffsetY,
    WatermarkRotation,
    WatermarkInBackground,
}

impl OptionKey {
    /// Form field name used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PageWidth => "width",
            Self::PageHeight => "height",
            Self::HorizontalMargin => "hmargin",
            Self::VerticalMargin => "vmargin",
            Self::MarginTop => "margin_top",
            Self::MarginRight => "margin_right",
            Self::MarginBottom => "margin_bottom",
            Self::MarginLeft => "margin_left",
            Self::Encrypted => "encrypted",
            Self::UserPassword => "user_pwd",
            Self::OwnerPassword => "owner_pwd",
            Self::NoPrint => "no_print",
            Self::NoModify => "no_modify",
            Self::NoCopy => "no_copy",
            Self::PageLayout => "page_layout",
            Self::PageMode => "page_mode",
            Self::FooterText => "footer_text",
            Self::FooterHtml => "footer_html",
            Self::FooterUrl => "footer_url",
            Self::HeaderHtml => "header_html",
            Self::HeaderUrl => "header_url",
            Self::NoImages => "no_images",
            Self::NoBackgrounds => "no_backgrounds",
            Self::HtmlZoom => "html_zoom",
            Self::NoJavascript => "no_javascript",
            Self::NoHyperlinks => "no_hyperlinks",
            Self::TextEncoding => "text_encoding",
            Self::UsePrintMedia => "use_print_media",
            Self::MaxPages => "max_pages",
            Self::ServiceLogo => "pdfcrowd_logo",
            Self::InitialPdfZoomType => "initial_pdf_zoom_type",
            Self::InitialPdfZoom => "initial_pdf_zoom",
            Self::PdfScalingFactor => "pdf_scaling_factor",
            Self::Author => "author",
            Self::PageBackgroundColor => "page_background_color",
            Self::TransparentBackground => "transparent_background",
            Self::PageNumberingOffset => "page_numbering_offset",
            Self::HeaderFooterPageExcludeList => "header_footer_page_exclude_list",
            Self::WatermarkUrl => "watermark_url",
            Self::WatermarkOffsetX => "watermark_offset_x",
            Self::WatermarkOffsetY => "watermark_offset_y",
            Self::WatermarkRotation => "watermark_rotation",
            Self::WatermarkInBackground => "watermark_in_background",
        }
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value stored for an option.
///
/// Every variant has a string form (see [`Display`](fmt::Display)), which
/// is what ends up in the form field.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    /// Free text, lengths, URLs and colors.
    Text(String),
    /// Sent as `true` / `false`.
    Bool(bool),
    /// Sent in decimal.
    Int(i64),
    /// Sent in shortest round-trip form.
    Float(f64),
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{}", x),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for OptionValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// The option mapping applied to each conversion call.
///
/// Keys are unique and the last write wins. Iteration order is stable
/// (declaration order of [`OptionKey`]), so the same options always produce
/// the same sequence of form fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversionOptions {
    entries: BTreeMap<OptionKey, OptionValue>,
}

impl ConversionOptions {
    /// Create an empty option mapping.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert<V: Into<OptionValue>>(&mut self, key: OptionKey, value: V) -> &mut Self {
        log::trace!("Setting option {}", key);
        self.entries.insert(key, value.into());
        self
    }

    /// Value currently stored for `key`.
    pub fn get(&self, key: OptionKey) -> Option<&OptionValue> {
        self.entries.get(&key)
    }

    /// Returns `true` if `key` has a value.
    pub fn contains(&self, key: OptionKey) -> bool {
        self.entries.contains_key(&key)
    }

    /// Remove `key`, returning its previous value.
    pub fn remove(&mut self, key: OptionKey) -> Option<OptionValue> {
        self.entries.remove(&key)
    }

    /// Remove every option.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of options set.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no option is set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the options in wire order.
    pub fn iter(&self) -> impl Iterator<Item = (OptionKey, &OptionValue)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    /// The options as `(field name, field value)` pairs, ready for encoding.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        self.iter()
            .map(|(key, value)| (key.as_str(), value.to_string()))
            .collect()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_serialization() {
        assert_eq!(OptionValue::from(true).to_string(), "true");
        assert_eq!(OptionValue::from(false).to_string(), "false");
        assert_eq!(OptionValue::from(-3i64).to_string(), "-3");
        assert_eq!(OptionValue::from(1.5f64).to_string(), "1.5");
        assert_eq!(OptionValue::from(2.0f64).to_string(), "2");
        assert_eq!(OptionValue::from("6in").to_string(), "6in");
    }

    #[test]
    fn test_last_write_wins() {
        let mut options = ConversionOptions::new();
        options.insert(OptionKey::Author, "first");
        options.insert(OptionKey::Author, "second");

        assert_eq!(options.len(), 1);
        assert_eq!(
            options.get(OptionKey::Author),
            Some(&OptionValue::Text("second".to_string()))
        );
    }

    #[test]
    fn test_form_fields_follow_key_order() {
        let mut options = ConversionOptions::new();
        options.insert(OptionKey::Author, "me");
        options.insert(OptionKey::PageWidth, "8in");
        options.insert(OptionKey::NoCopy, true);

        let fields = options.form_fields();
        assert_eq!(
            fields,
            vec![
                ("width", "8in".to_string()),
                ("no_copy", "true".to_string()),
                ("author", "me".to_string()),
            ]
        );
    }

    #[test]
    fn test_remove_and_clear() {
        let mut options = ConversionOptions::new();
        options.insert(OptionKey::MaxPages, 3i64);
        options.insert(OptionKey::HtmlZoom, 200i64);

        assert_eq!(options.remove(OptionKey::MaxPages), Some(OptionValue::Int(3)));
        assert!(!options.contains(OptionKey::MaxPages));
        assert_eq!(options.len(), 1);

        options.clear();
        assert!(options.is_empty());
    }

    #[test]
    fn test_service_logo_wire_name() {
        assert_eq!(OptionKey::ServiceLogo.as_str(), "pdfcrowd_logo");
        assert_eq!(OptionKey::UserPassword.to_string(), "user_pwd");
    }
}
