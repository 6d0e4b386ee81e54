//! Enumerated option values.
//!
//! Each enum serializes to the small integer the service expects on the wire.

use std::fmt;

/// How pages are arranged when the PDF is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageLayout {
    /// One page at a time.
    SinglePage,
    /// Pages in one continuous column.
    Continuous,
    /// Pages in two continuous columns.
    ContinuousFacing,
}

impl PageLayout {
    /// Wire value of the layout.
    pub fn code(&self) -> i64 {
        match self {
            Self::SinglePage => 1,
            Self::Continuous => 2,
            Self::ContinuousFacing => 3,
        }
    }
}

/// Which side panel (if any) the PDF viewer shows when opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageMode {
    /// Neither outline nor thumbnails.
    NoneVisible,
    /// Thumbnail panel open.
    ThumbnailsVisible,
    /// Full-screen presentation.
    Fullscreen,
}

impl PageMode {
    /// Wire value of the mode.
    pub fn code(&self) -> i64 {
        match self {
            Self::NoneVisible => 1,
            Self::ThumbnailsVisible => 2,
            Self::Fullscreen => 3,
        }
    }
}

/// Initial zoom applied by the PDF viewer.
///
/// An exact percentage is set with
/// [`ConversionOptions::set_initial_pdf_exact_zoom`](crate::ConversionOptions::set_initial_pdf_exact_zoom)
/// instead, which sends [`EXACT_ZOOM_CODE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PdfZoomType {
    /// Page width fills the window.
    FitWidth,
    /// Page height fills the window.
    FitHeight,
    /// Whole page visible.
    FitPage,
}

/// Zoom type code that tells the service to read `initial_pdf_zoom`.
pub const EXACT_ZOOM_CODE: i64 = 4;

impl PdfZoomType {
    /// Wire value of the zoom type.
    pub fn code(&self) -> i64 {
        match self {
            Self::FitWidth => 1,
            Self::FitHeight => 2,
            Self::FitPage => 3,
        }
    }
}

/// Kind of document the service renders.
///
/// Selects the endpoint family: `/api/pdf/convert/...` or
/// `/api/image/convert/...`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    /// PDF document.
    #[default]
    Pdf,
    /// Raster image.
    Image,
}

impl OutputFormat {
    /// Path segment used in the conversion endpoints.
    pub fn path_segment(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Image => "image",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}
