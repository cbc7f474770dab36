//! Static resources: the corner font and the action symbol images.
//!
//! Everything is loaded and rasterized once at startup so a missing file
//! stops the run before the first API call.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use ab_glyph::{FontVec, PxScale};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use log::debug;

use crate::deck::Mark;
use crate::error::ConfigError;

pub const TEXT_FONT: &str = "fonts/Cabin-Bold.ttf";
pub const TEST_BACKGROUND: &str = "images/test-bg.png";

const DIGIT_SIZE_PX: f32 = 200.0;
const DIGIT_CANVAS_PX: u32 = 400;
const SYMBOL_SIZE_PX: u32 = 120;

const SYMBOLS: [(Mark, &str); 5] = [
    (Mark::Skip, "images/symbol-skip.png"),
    (Mark::Reverse, "images/symbol-reverse.png"),
    (Mark::Star, "images/symbol-star.png"),
    (Mark::PlusTwo, "images/symbol-plus2.png"),
    (Mark::PlusFour, "images/symbol-plus4.png"),
];

/// Pre-rasterized corner marks, one per digit and action symbol.
#[derive(Debug, Clone)]
pub struct Assets {
    marks: HashMap<Mark, RgbaImage>,
}

impl Assets {
    /// Loads the font and symbol images below `dir`.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let font_path = dir.join(TEXT_FONT);
        let font_data = fs::read(&font_path).map_err(|e| ConfigError::MissingAsset {
            path: font_path.clone(),
            reason: e.to_string(),
        })?;
        let font = FontVec::try_from_vec(font_data)
            .map_err(|_| ConfigError::InvalidFont { path: font_path })?;

        let mut marks = HashMap::new();
        for digit in 0..=9u8 {
            marks.insert(Mark::Digit(digit), rasterize_digit(&font, digit));
        }

        for (mark, relative) in SYMBOLS {
            let path = dir.join(relative);
            let symbol = load_image(&path)?;
            let symbol = imageops::resize(&symbol, SYMBOL_SIZE_PX, SYMBOL_SIZE_PX, FilterType::Lanczos3);
            marks.insert(mark, symbol);
        }

        debug!("Loaded {} corner marks from {}", marks.len(), dir.display());
        Ok(Assets { marks })
    }

    /// Builds an asset set from already rasterized marks.
    pub fn from_marks(marks: HashMap<Mark, RgbaImage>) -> Self {
        Assets { marks }
    }

    pub fn mark(&self, mark: Mark) -> Option<&RgbaImage> {
        self.marks.get(&mark)
    }
}

/// Opens an image asset as RGBA, mapping failures to a configuration error.
pub fn load_image(path: &Path) -> Result<RgbaImage, ConfigError> {
    image::open(path)
        .map(|img| img.to_rgba8())
        .map_err(|e| ConfigError::MissingAsset {
            path: PathBuf::from(path),
            reason: e.to_string(),
        })
}

fn rasterize_digit(font: &FontVec, digit: u8) -> RgbaImage {
    let mut canvas = RgbaImage::new(DIGIT_CANVAS_PX, DIGIT_CANVAS_PX);
    draw_text_mut(
        &mut canvas,
        Rgba([255, 255, 255, 255]),
        0,
        0,
        PxScale::from(DIGIT_SIZE_PX),
        font,
        &digit.to_string(),
    );
    trim_transparent(&canvas)
}

/// Crops an image to the bounding box of its non-transparent pixels.
pub fn trim_transparent(img: &RgbaImage) -> RgbaImage {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, px) in img.enumerate_pixels() {
        if px[3] == 0 {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }

    match bounds {
        Some((x0, y0, x1, y1)) => imageops::crop_imm(img, x0, y0, x1 - x0 + 1, y1 - y0 + 1).to_image(),
        None => img.clone(),
    }
}
