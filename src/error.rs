//! Error types for card generation.
//!
//! Each stage of the run has its own error type; [`Error`] wraps them and
//! attaches the card that failed where there is one.

use std::path::PathBuf;

use crate::deck::{CardSpec, Mark};

/// Result type alias for a generation run.
pub type Result<T> = std::result::Result<T, Error>;

/// Invalid settings or missing static resources. Raised before any card is generated.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("API key is required unless test mode is enabled (set OPENAI_API_KEY)")]
    MissingCredential,

    #[error("Upscale factor must be between 1 and 8, got {0}")]
    InvalidUpscaleFactor(u32),

    #[error("Invalid border color '{0}': expected #rgb, #rrggbb or r,g,b")]
    InvalidBorderColor(String),

    #[error("Invalid card width {0} mm")]
    InvalidCardSize(f32),

    #[error("Missing asset {path}: {reason}")]
    MissingAsset { path: PathBuf, reason: String },

    #[error("Font {path} could not be parsed")]
    InvalidFont { path: PathBuf },
}

/// The image provider could not produce art for a card.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Image API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Image API response contained no image data")]
    EmptyResponse,

    #[error("Invalid base64 image payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Image decoding error: {0}")]
    Image(#[from] image::ImageError),
}

/// Compositing a card failed.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Base image is empty ({width}x{height})")]
    EmptyArt { width: u32, height: u32 },

    #[error("No corner mark loaded for {0:?}")]
    MissingMark(Mark),
}

/// The page grid cannot be built from the configured geometry.
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error(
        "A {card_w}x{card_h} mm card does not fit on a {page_w}x{page_h} mm page \
         with {margin} mm margins"
    )]
    CardDoesNotFit {
        card_w: f32,
        card_h: f32,
        page_w: f32,
        page_h: f32,
        margin: f32,
    },

    #[error("Invalid layout geometry: {0}")]
    InvalidGeometry(String),
}

/// Writing the PDF failed.
#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    #[error("Could not load card image {path}: {source}")]
    CardImage {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF serialization error: {0}")]
    Lopdf(#[from] lopdf::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Could not set up the image API client: {0}")]
    Client(ProviderError),

    #[error("Image provider failed for {card}: {source}")]
    Provider {
        card: CardSpec,
        source: ProviderError,
    },

    #[error("Rendering failed for {card}: {source}")]
    Render { card: CardSpec, source: RenderError },

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    #[error("Could not write {path}: {source}")]
    Output {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Card image {path} could not be saved: {source}")]
    SaveCard {
        path: PathBuf,
        source: image::ImageError,
    },
}
