//! Typed setters for [`ConversionOptions`].
//!
//! Setters that can't fail return `&mut Self`; setters that validate their
//! input return [`Result<&mut Self>`](crate::Result) so both kinds chain with `?`:
//!
//! ```rust
//! use html2pdf_client::ConversionOptions;
//!
//! let mut options = ConversionOptions::new();
//! options
//!     .set_page_margins("1in", "0.5in", "1in", "0.5in")?
//!     .set_encrypted(true)
//!     .set_footer_text("Page %p of %n");
//! # Ok::<(), html2pdf_client::ConversionError>(())
//! ```

use std::sync::LazyLock;

use regex::Regex;

use super::{ConversionOptions, EXACT_ZOOM_CODE, OptionKey, PageLayout, PageMode, PdfZoomType};
use crate::error::{ConversionError, Result};

/// A number with an optional `in`, `mm`, `cm` or `pt` unit. Bare numbers are points.
static LENGTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+(\.\d+)?(in|mm|cm|pt)?$").expect("length pattern is valid")
});

static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-fA-F]{6}$").expect("color pattern is valid"));

/// Page height value meaning "as tall as the content".
const AUTO_HEIGHT: &str = "-1";

impl ConversionOptions {
    // ------------------------------------------------------------------
    // Page geometry
    // ------------------------------------------------------------------

    /// Set the page width, e.g. `"210mm"` or `"8.5in"`.
    ///
    /// # Errors
    ///
    /// Returns a usage error unless `value` is a non-negative number with an
    /// optional `in`, `mm`, `cm` or `pt` unit.
    pub fn set_page_width(&mut self, value: &str) -> Result<&mut Self> {
        validate_length("page width", value)?;
        Ok(self.insert(OptionKey::PageWidth, value))
    }

    /// Set the page height. `"-1"` produces a single page as tall as the content.
    pub fn set_page_height(&mut self, value: &str) -> Result<&mut Self> {
        if value != AUTO_HEIGHT {
            validate_length("page height", value)?;
        }
        Ok(self.insert(OptionKey::PageHeight, value))
    }

    /// Set the left and right margins.
    pub fn set_horizontal_margin(&mut self, value: &str) -> Result<&mut Self> {
        validate_length("horizontal margin", value)?;
        Ok(self.insert(OptionKey::HorizontalMargin, value))
    }

    /// Set the top and bottom margins.
    pub fn set_vertical_margin(&mut self, value: &str) -> Result<&mut Self> {
        validate_length("vertical margin", value)?;
        Ok(self.insert(OptionKey::VerticalMargin, value))
    }

    /// Set all four page margins at once.
    ///
    /// Nothing is stored unless all four values are valid.
    pub fn set_page_margins(
        &mut self,
        top: &str,
        right: &str,
        bottom: &str,
        left: &str,
    ) -> Result<&mut Self> {
        validate_length("top margin", top)?;
        validate_length("right margin", right)?;
        validate_length("bottom margin", bottom)?;
        validate_length("left margin", left)?;

        self.insert(OptionKey::MarginTop, top)
            .insert(OptionKey::MarginRight, right)
            .insert(OptionKey::MarginBottom, bottom)
            .insert(OptionKey::MarginLeft, left);
        Ok(self)
    }

    // ------------------------------------------------------------------
    // Security
    // ------------------------------------------------------------------

    /// Encrypt the output PDF.
    pub fn set_encrypted(&mut self, value: bool) -> &mut Self {
        self.insert(OptionKey::Encrypted, value)
    }

    /// Password required to open the PDF.
    pub fn set_user_password(&mut self, password: &str) -> Result<&mut Self> {
        validate_not_empty("user password", password)?;
        Ok(self.insert(OptionKey::UserPassword, password))
    }

    /// Password required to change the PDF's permissions.
    pub fn set_owner_password(&mut self, password: &str) -> Result<&mut Self> {
        validate_not_empty("owner password", password)?;
        Ok(self.insert(OptionKey::OwnerPassword, password))
    }

    /// Forbid printing.
    pub fn set_no_print(&mut self, value: bool) -> &mut Self {
        self.insert(OptionKey::NoPrint, value)
    }

    /// Forbid modification.
    pub fn set_no_modify(&mut self, value: bool) -> &mut Self {
        self.insert(OptionKey::NoModify, value)
    }

    /// Forbid text and graphics extraction.
    pub fn set_no_copy(&mut self, value: bool) -> &mut Self {
        self.insert(OptionKey::NoCopy, value)
    }

    // ------------------------------------------------------------------
    // Viewer preferences
    // ------------------------------------------------------------------

    /// Page layout used when the PDF is opened.
    pub fn set_page_layout(&mut self, layout: PageLayout) -> &mut Self {
        self.insert(OptionKey::PageLayout, layout.code())
    }

    /// Viewer panel shown when the PDF is opened.
    pub fn set_page_mode(&mut self, mode: PageMode) -> &mut Self {
        self.insert(OptionKey::PageMode, mode.code())
    }

    /// Initial zoom as a fit mode. Clears any exact zoom set before.
    pub fn set_initial_pdf_zoom_type(&mut self, zoom: PdfZoomType) -> &mut Self {
        self.remove(OptionKey::InitialPdfZoom);
        self.insert(OptionKey::InitialPdfZoomType, zoom.code())
    }

    /// Initial zoom as an exact percentage, e.g. `125.0`.
    pub fn set_initial_pdf_exact_zoom(&mut self, percent: f64) -> Result<&mut Self> {
        validate_positive("initial PDF zoom", percent)?;
        self.insert(OptionKey::InitialPdfZoomType, EXACT_ZOOM_CODE)
            .insert(OptionKey::InitialPdfZoom, percent);
        Ok(self)
    }

    // ------------------------------------------------------------------
    // Headers, footers and watermark
    // ------------------------------------------------------------------

    /// Plain-text footer. `%p` (page), `%n` (page count) and `%u` (source URL)
    /// are expanded by the service.
    pub fn set_footer_text<S: Into<String>>(&mut self, text: S) -> &mut Self {
        self.insert(OptionKey::FooterText, text.into())
    }

    /// HTML footer, with the same placeholders as [`set_footer_text`](Self::set_footer_text).
    pub fn set_footer_html<S: Into<String>>(&mut self, html: S) -> &mut Self {
        self.insert(OptionKey::FooterHtml, html.into())
    }

    /// Load the footer from a URL.
    pub fn set_footer_url(&mut self, url: &str) -> Result<&mut Self> {
        validate_http_url("footer URL", url)?;
        Ok(self.insert(OptionKey::FooterUrl, url))
    }

    /// HTML header, with the same placeholders as [`set_footer_text`](Self::set_footer_text).
    pub fn set_header_html<S: Into<String>>(&mut self, html: S) -> &mut Self {
        self.insert(OptionKey::HeaderHtml, html.into())
    }

    /// Load the header from a URL.
    pub fn set_header_url(&mut self, url: &str) -> Result<&mut Self> {
        validate_http_url("header URL", url)?;
        Ok(self.insert(OptionKey::HeaderUrl, url))
    }

    /// Pages that get no header or footer. Negative numbers count from the
    /// end, so `&[1, -1]` skips the first and last page.
    pub fn set_header_footer_page_exclude_list(&mut self, pages: &[i64]) -> Result<&mut Self> {
        if pages.is_empty() {
            return Err(ConversionError::usage(
                "header/footer exclude list must contain at least one page",
            ));
        }
        if pages.contains(&0) {
            return Err(ConversionError::usage(
                "header/footer exclude list: page numbers start at 1 (or -1 from the end)",
            ));
        }

        let list = pages
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(",");
        Ok(self.insert(OptionKey::HeaderFooterPageExcludeList, list))
    }

    /// Number added to page numbers shown through `%p`.
    pub fn set_page_numbering_offset(&mut self, offset: i64) -> &mut Self {
        self.insert(OptionKey::PageNumberingOffset, offset)
    }

    /// Stamp an image on every page. Offsets are lengths from the top-left corner.
    pub fn set_watermark(&mut self, url: &str, offset_x: &str, offset_y: &str) -> Result<&mut Self> {
        validate_http_url("watermark URL", url)?;
        validate_length("watermark horizontal offset", offset_x)?;
        validate_length("watermark vertical offset", offset_y)?;

        self.insert(OptionKey::WatermarkUrl, url)
            .insert(OptionKey::WatermarkOffsetX, offset_x)
            .insert(OptionKey::WatermarkOffsetY, offset_y);
        Ok(self)
    }

    /// Watermark rotation in degrees.
    pub fn set_watermark_rotation(&mut self, degrees: i64) -> &mut Self {
        self.insert(OptionKey::WatermarkRotation, degrees)
    }

    /// Draw the watermark behind the page content.
    pub fn set_watermark_in_background(&mut self, value: bool) -> &mut Self {
        self.insert(OptionKey::WatermarkInBackground, value)
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    /// Render images. Sent inverted as `no_images`.
    pub fn enable_images(&mut self, value: bool) -> &mut Self {
        self.insert(OptionKey::NoImages, !value)
    }

    /// Render CSS backgrounds. Sent inverted as `no_backgrounds`.
    pub fn enable_backgrounds(&mut self, value: bool) -> &mut Self {
        self.insert(OptionKey::NoBackgrounds, !value)
    }

    /// Run JavaScript. Sent inverted as `no_javascript`.
    pub fn enable_javascript(&mut self, value: bool) -> &mut Self {
        self.insert(OptionKey::NoJavascript, !value)
    }

    /// Keep hyperlinks clickable. Sent inverted as `no_hyperlinks`.
    pub fn enable_hyperlinks(&mut self, value: bool) -> &mut Self {
        self.insert(OptionKey::NoHyperlinks, !value)
    }

    /// HTML zoom in percent.
    pub fn set_html_zoom(&mut self, percent: u32) -> Result<&mut Self> {
        if percent == 0 {
            return Err(ConversionError::usage("HTML zoom must be greater than 0"));
        }
        Ok(self.insert(OptionKey::HtmlZoom, i64::from(percent)))
    }

    /// Encoding assumed for sources that don't declare one, e.g. `"utf-8"`.
    pub fn set_default_text_encoding(&mut self, encoding: &str) -> Result<&mut Self> {
        validate_not_empty("text encoding", encoding)?;
        Ok(self.insert(OptionKey::TextEncoding, encoding))
    }

    /// Use the `print` CSS media type instead of `screen`.
    pub fn use_print_media(&mut self, value: bool) -> &mut Self {
        self.insert(OptionKey::UsePrintMedia, value)
    }

    /// Stop after this many pages.
    pub fn set_max_pages(&mut self, pages: u32) -> Result<&mut Self> {
        if pages == 0 {
            return Err(ConversionError::usage("max pages must be at least 1"));
        }
        Ok(self.insert(OptionKey::MaxPages, i64::from(pages)))
    }

    /// Show the service's logo in the output.
    pub fn enable_service_logo(&mut self, value: bool) -> &mut Self {
        self.insert(OptionKey::ServiceLogo, value)
    }

    /// Scale factor applied to the rendered content.
    pub fn set_pdf_scaling_factor(&mut self, factor: f64) -> Result<&mut Self> {
        validate_positive("PDF scaling factor", factor)?;
        Ok(self.insert(OptionKey::PdfScalingFactor, factor))
    }

    /// Document author metadata.
    pub fn set_author<S: Into<String>>(&mut self, author: S) -> &mut Self {
        self.insert(OptionKey::Author, author.into())
    }

    /// Page background as six hex digits, e.g. `"ff0000"`.
    pub fn set_page_background_color(&mut self, color: &str) -> Result<&mut Self> {
        if !HEX_COLOR.is_match(color) {
            log::warn!("Rejected page background color '{}'", color);
            return Err(ConversionError::usage(format!(
                "invalid page background color '{}': expected six hex digits (RRGGBB)",
                color
            )));
        }
        Ok(self.insert(OptionKey::PageBackgroundColor, color))
    }

    /// Leave the page background transparent (image output).
    pub fn set_transparent_background(&mut self, value: bool) -> &mut Self {
        self.insert(OptionKey::TransparentBackground, value)
    }
}

// ============================================================================
// Validation helpers
// ============================================================================

fn validate_length(what: &str, value: &str) -> Result<()> {
    if LENGTH.is_match(value) {
        return Ok(());
    }
    log::warn!("Rejected {} '{}'", what, value);
    Err(ConversionError::usage(format!(
        "invalid {} '{}': expected a number with an optional in, mm, cm or pt unit",
        what, value
    )))
}

fn validate_not_empty(what: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ConversionError::usage(format!("{} must not be empty", what)));
    }
    Ok(())
}

fn validate_positive(what: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        return Ok(());
    }
    Err(ConversionError::usage(format!(
        "{} must be a positive number, got {}",
        what, value
    )))
}

pub(crate) fn validate_http_url(what: &str, value: &str) -> Result<url::Url> {
    if value.trim().is_empty() {
        return Err(ConversionError::usage(format!("{} is required", what)));
    }

    let parsed = url::Url::parse(value).map_err(|e| {
        log::debug!("{} validation failed for '{}': {}", what, value, e);
        ConversionError::usage(format!("invalid {} '{}': {}", what, value, e))
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(ConversionError::usage(format!(
            "invalid {} '{}': unsupported scheme '{}'",
            what, value, other
        ))),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::options::OptionValue;

    fn text(options: &ConversionOptions, key: OptionKey) -> String {
        options.get(key).map(|v| v.to_string()).unwrap_or_default()
    }

    #[test]
    fn test_lengths_accept_units() {
        let mut options = ConversionOptions::new();
        options
            .set_page_width("210mm")
            .unwrap()
            .set_page_height("11in")
            .unwrap()
            .set_horizontal_margin("2.5cm")
            .unwrap()
            .set_vertical_margin("36")
            .unwrap();

        assert_eq!(text(&options, OptionKey::PageWidth), "210mm");
        assert_eq!(text(&options, OptionKey::PageHeight), "11in");
        assert_eq!(text(&options, OptionKey::HorizontalMargin), "2.5cm");
        assert_eq!(text(&options, OptionKey::VerticalMargin), "36");
    }

    #[test]
    fn test_lengths_reject_garbage() {
        let mut options = ConversionOptions::new();

        for bad in ["", "6 in", "6px", "-2in", "in", "1.in"] {
            let err = options.set_page_width(bad).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Usage, "{:?} should be rejected", bad);
        }
        assert!(options.is_empty());
    }

    #[test]
    fn test_auto_page_height() {
        let mut options = ConversionOptions::new();
        options.set_page_height("-1").unwrap();
        assert_eq!(text(&options, OptionKey::PageHeight), "-1");

        assert!(options.set_page_width("-1").is_err());
    }

    #[test]
    fn test_page_margins_all_or_nothing() {
        let mut options = ConversionOptions::new();
        assert!(options.set_page_margins("1in", "1in", "oops", "1in").is_err());
        assert!(options.is_empty());

        options.set_page_margins("1in", "2in", "3in", "4in").unwrap();
        assert_eq!(options.len(), 4);
        assert_eq!(text(&options, OptionKey::MarginLeft), "4in");
    }

    #[test]
    fn test_inverted_flags() {
        let mut options = ConversionOptions::new();
        options
            .enable_images(false)
            .enable_backgrounds(true)
            .enable_javascript(false)
            .enable_hyperlinks(true);

        assert_eq!(options.get(OptionKey::NoImages), Some(&OptionValue::Bool(true)));
        assert_eq!(options.get(OptionKey::NoBackgrounds), Some(&OptionValue::Bool(false)));
        assert_eq!(options.get(OptionKey::NoJavascript), Some(&OptionValue::Bool(true)));
        assert_eq!(options.get(OptionKey::NoHyperlinks), Some(&OptionValue::Bool(false)));
    }

    #[test]
    fn test_zoom_types() {
        let mut options = ConversionOptions::new();
        options.set_initial_pdf_exact_zoom(125.0).unwrap();
        assert_eq!(text(&options, OptionKey::InitialPdfZoomType), "4");
        assert_eq!(text(&options, OptionKey::InitialPdfZoom), "125");

        options.set_initial_pdf_zoom_type(PdfZoomType::FitHeight);
        assert_eq!(text(&options, OptionKey::InitialPdfZoomType), "2");
        assert!(!options.contains(OptionKey::InitialPdfZoom));

        assert!(options.set_initial_pdf_exact_zoom(0.0).is_err());
        assert!(options.set_initial_pdf_exact_zoom(f64::NAN).is_err());
    }

    #[test]
    fn test_enums_store_codes() {
        let mut options = ConversionOptions::new();
        options
            .set_page_layout(PageLayout::ContinuousFacing)
            .set_page_mode(PageMode::ThumbnailsVisible);

        assert_eq!(options.get(OptionKey::PageLayout), Some(&OptionValue::Int(3)));
        assert_eq!(options.get(OptionKey::PageMode), Some(&OptionValue::Int(2)));
    }

    #[test]
    fn test_urls_require_http_scheme() {
        let mut options = ConversionOptions::new();
        assert!(options.set_header_url("https://example.com/header.html").is_ok());
        assert!(options.set_footer_url("ftp://example.com/footer.html").is_err());
        assert!(options.set_footer_url("footer.html").is_err());
        assert!(options.set_footer_url("").is_err());
    }

    #[test]
    fn test_watermark() {
        let mut options = ConversionOptions::new();
        options
            .set_watermark("http://example.com/logo.png", "10mm", "0")
            .unwrap()
            .set_watermark_rotation(-45)
            .set_watermark_in_background(true);

        assert_eq!(text(&options, OptionKey::WatermarkUrl), "http://example.com/logo.png");
        assert_eq!(text(&options, OptionKey::WatermarkOffsetX), "10mm");
        assert_eq!(text(&options, OptionKey::WatermarkOffsetY), "0");
        assert_eq!(text(&options, OptionKey::WatermarkRotation), "-45");

        assert!(options.set_watermark("http://example.com/logo.png", "left", "0").is_err());
    }

    #[test]
    fn test_numeric_ranges() {
        let mut options = ConversionOptions::new();
        assert!(options.set_html_zoom(0).is_err());
        assert!(options.set_max_pages(0).is_err());
        assert!(options.set_pdf_scaling_factor(-1.0).is_err());

        options
            .set_html_zoom(200)
            .unwrap()
            .set_max_pages(5)
            .unwrap()
            .set_pdf_scaling_factor(1.5)
            .unwrap();
        assert_eq!(text(&options, OptionKey::HtmlZoom), "200");
        assert_eq!(text(&options, OptionKey::MaxPages), "5");
        assert_eq!(text(&options, OptionKey::PdfScalingFactor), "1.5");
    }

    #[test]
    fn test_background_color() {
        let mut options = ConversionOptions::new();
        assert!(options.set_page_background_color("FF00aa").is_ok());
        assert!(options.set_page_background_color("#ff00aa").is_err());
        assert!(options.set_page_background_color("fff").is_err());
    }

    #[test]
    fn test_exclude_list() {
        let mut options = ConversionOptions::new();
        options.set_header_footer_page_exclude_list(&[1, -1]).unwrap();
        assert_eq!(text(&options, OptionKey::HeaderFooterPageExcludeList), "1,-1");

        assert!(options.set_header_footer_page_exclude_list(&[]).is_err());
        assert!(options.set_header_footer_page_exclude_list(&[2, 0]).is_err());
    }

    #[test]
    fn test_passwords_must_not_be_empty() {
        let mut options = ConversionOptions::new();
        assert!(options.set_user_password("  ").is_err());
        options.set_user_password("s3cret").unwrap().set_encrypted(true);
        assert_eq!(text(&options, OptionKey::UserPassword), "s3cret");
        assert_eq!(text(&options, OptionKey::Encrypted), "true");
    }
}
