use std::path::PathBuf;

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser, ValueEnum};

use crate::error::ConfigError;
use crate::layout::{SheetGeometry, Size};
use crate::render::{CARD_H, CARD_W, MAX_UPSCALE_FACTOR, RenderOptions};

pub const PDF_FILE_NAME: &str = "uno-cards.pdf";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Paper {
    A4,
    Letter,
}

impl Paper {
    pub fn size(self) -> Size {
        match self {
            Paper::A4 => Size::A4,
            Paper::Letter => Size::LETTER,
        }
    }
}

/// UNO deck generator: AI artwork, print-ready PDF
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Image API key (not needed in test mode)
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Image generation model
    #[arg(long, env = "OPENAI_IMAGE_MODEL", default_value = "gpt-image-1")]
    pub model: String,

    /// Requested image size, WIDTHxHEIGHT
    #[arg(long, env = "OPENAI_IMAGE_SIZE", default_value = "1024x1536")]
    pub image_size: String,

    /// Image API base URL
    #[arg(long, env = "OPENAI_BASE_URL", default_value = "https://api.openai.com")]
    pub api_base: String,

    /// Use the placeholder background instead of calling the API
    #[arg(
        long,
        env = "UNO_TEST_MODE",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value = "false",
        default_missing_value = "true",
        value_parser = BoolishValueParser::new()
    )]
    pub test_mode: bool,

    /// Stop after the first card
    #[arg(
        long,
        env = "UNO_GENERATE_FIRST_ONLY",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value = "false",
        default_missing_value = "true",
        value_parser = BoolishValueParser::new()
    )]
    pub first_only: bool,

    /// Directory for card PNGs and the PDF
    #[arg(short, long, env = "UNO_OUTPUT_DIR", default_value = "uno-cards-out")]
    pub output_dir: PathBuf,

    /// Directory holding fonts/ and images/
    #[arg(long, env = "UNO_ASSETS_DIR", default_value = "extras")]
    pub assets_dir: PathBuf,

    /// Resolution multiplier for the 825x1275 base card (1-8)
    #[arg(long, env = "UNO_UPSCALE_FACTOR", default_value_t = 3)]
    pub upscale_factor: u32,

    /// Clockwise rotation of the art ellipse in degrees
    #[arg(long, env = "UNO_ELLIPSE_ROTATION", default_value_t = 30.0, allow_negative_numbers = true)]
    pub ellipse_rotation: f32,

    /// Border color: #rgb, #rrggbb or r,g,b
    #[arg(long, env = "UNO_BORDER_COLOR", default_value = "#000000")]
    pub border_color: String,

    /// Paper size of the PDF
    #[arg(long, env = "UNO_PAPER", value_enum, default_value_t = Paper::A4)]
    pub paper: Paper,

    /// Printed card width in mm (height keeps the card ratio)
    #[arg(long, env = "UNO_CARD_WIDTH_MM", default_value_t = 60.0)]
    pub card_width_mm: f32,

    /// Page margin in mm
    #[arg(long, env = "UNO_MARGIN_MM", default_value_t = 4.0)]
    pub margin_mm: f32,

    /// Gap between cards in mm
    #[arg(long, env = "UNO_SPACING_MM", default_value_t = 3.0)]
    pub spacing_mm: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiSettings {
    pub key: String,
    pub model: String,
    pub size: String,
    pub base_url: String,
}

/// Validated settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// `None` in test mode.
    pub api: Option<ApiSettings>,
    pub first_only: bool,
    pub output_dir: PathBuf,
    pub assets_dir: PathBuf,
    pub render: RenderOptions,
    pub card_size: Size,
    pub sheet: SheetGeometry,
}

impl Config {
    pub fn from_args(args: Args) -> Result<Self, ConfigError> {
        let api = if args.test_mode {
            None
        } else {
            let key = args
                .api_key
                .filter(|k| !k.trim().is_empty())
                .ok_or(ConfigError::MissingCredential)?;
            Some(ApiSettings {
                key,
                model: args.model,
                size: args.image_size,
                base_url: args.api_base,
            })
        };

        if !(1..=MAX_UPSCALE_FACTOR).contains(&args.upscale_factor) {
            return Err(ConfigError::InvalidUpscaleFactor(args.upscale_factor));
        }
        if !args.card_width_mm.is_finite() || args.card_width_mm <= 0.0 {
            return Err(ConfigError::InvalidCardSize(args.card_width_mm));
        }

        let render = RenderOptions {
            border_color: parse_color(&args.border_color)?,
            upscale_factor: args.upscale_factor,
            ellipse_rotation: args.ellipse_rotation,
        };

        let card_size = Size::new(
            args.card_width_mm,
            args.card_width_mm * CARD_H as f32 / CARD_W as f32,
        );

        Ok(Config {
            api,
            first_only: args.first_only,
            output_dir: args.output_dir,
            assets_dir: args.assets_dir,
            render,
            card_size,
            sheet: SheetGeometry {
                page: args.paper.size(),
                margin: args.margin_mm,
                spacing: args.spacing_mm,
            },
        })
    }

    pub fn is_test_mode(&self) -> bool {
        self.api.is_none()
    }

    pub fn pdf_path(&self) -> PathBuf {
        self.output_dir.join(PDF_FILE_NAME)
    }
}

/// Parses `#rgb`, `#rrggbb` or `r,g,b`.
pub fn parse_color(input: &str) -> Result<[u8; 3], ConfigError> {
    let invalid = || ConfigError::InvalidBorderColor(input.to_string());
    let s = input.trim();

    if let Some(hex) = s.strip_prefix('#') {
        let expanded: String = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 => hex.to_string(),
            _ => return Err(invalid()),
        };
        let channel = |i: usize| {
            expanded
                .get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(invalid)
        };
        return Ok([channel(0)?, channel(2)?, channel(4)?]);
    }

    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(invalid());
    }
    let mut rgb = [0u8; 3];
    for (slot, part) in rgb.iter_mut().zip(&parts) {
        *slot = part.parse().map_err(|_| invalid())?;
    }
    Ok(rgb)
}
