//! Card compositing: rounded border, coloured face, elliptical art window and
//! corner marks, upscaled for print.

use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{GrayImage, Luma, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_ellipse_mut, draw_filled_rect_mut};
use imageproc::geometric_transformations::{Interpolation, rotate_about_center};
use imageproc::rect::Rect;

use crate::assets::Assets;
use crate::deck::CardSpec;
use crate::error::RenderError;

// Base card geometry in pixels, before upscaling.
pub const CARD_W: u32 = 825;
pub const CARD_H: u32 = 1275;
const RADIUS: u32 = 64;
const BORDER: u32 = 8;
const MARGIN: u32 = 28;
const ELLIPSE_MARGIN: u32 = 8;

/// Largest accepted upscale factor (8 gives a 6600x10200 card).
pub const MAX_UPSCALE_FACTOR: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    pub border_color: [u8; 3],
    pub upscale_factor: u32,
    /// Clockwise rotation of the art window, in degrees.
    pub ellipse_rotation: f32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            border_color: [0, 0, 0],
            upscale_factor: 3,
            ellipse_rotation: 30.0,
        }
    }
}

impl RenderOptions {
    /// Output size in pixels for every card rendered with these options.
    ///
    /// The factor is clamped to `1..=MAX_UPSCALE_FACTOR`.
    pub fn card_size_px(&self) -> (u32, u32) {
        let factor = self.upscale_factor.clamp(1, MAX_UPSCALE_FACTOR);
        (CARD_W * factor, CARD_H * factor)
    }
}

#[derive(Debug, Clone)]
pub struct RenderedCard {
    pub spec: CardSpec,
    pub image: RgbaImage,
}

impl RenderedCard {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Writes the card as PNG into `dir` under its deck file name.
    pub fn save(&self, dir: &Path) -> Result<CardFile, image::ImageError> {
        let path = dir.join(self.spec.file_name());
        self.image.save(&path)?;
        Ok(CardFile {
            spec: self.spec,
            path,
            width: self.width(),
            height: self.height(),
        })
    }
}

/// A rendered card that has been written to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct CardFile {
    pub spec: CardSpec,
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// Composites `art` into a finished card face for `spec`.
pub fn render(
    spec: &CardSpec,
    art: &RgbaImage,
    assets: &Assets,
    options: &RenderOptions,
) -> Result<RenderedCard, RenderError> {
    if art.width() == 0 || art.height() == 0 {
        return Err(RenderError::EmptyArt {
            width: art.width(),
            height: art.height(),
        });
    }
    let mark = assets
        .mark(spec.mark())
        .ok_or(RenderError::MissingMark(spec.mark()))?;

    let [r, g, b] = options.border_color;
    let [fr, fg, fb] = spec.color.rgb();

    let mut card = RgbaImage::new(CARD_W, CARD_H);
    rounded_rect(
        &mut card,
        (0, 0, CARD_W, CARD_H),
        RADIUS + BORDER,
        Rgba([r, g, b, 255]),
    );
    rounded_rect(
        &mut card,
        (BORDER, BORDER, CARD_W - 2 * BORDER, CARD_H - 2 * BORDER),
        RADIUS,
        Rgba([fr, fg, fb, 255]),
    );

    paste_into_ellipse(&mut card, art, options.ellipse_rotation);
    draw_corners(&mut card, mark);

    if options.upscale_factor > 1 {
        let (w, h) = options.card_size_px();
        card = imageops::resize(&card, w, h, FilterType::Lanczos3);
    }

    Ok(RenderedCard {
        spec: *spec,
        image: card,
    })
}

/// Fills a rectangle given as (x, y, width, height) with rounded corners.
fn rounded_rect(img: &mut RgbaImage, (x, y, w, h): (u32, u32, u32, u32), radius: u32, color: Rgba<u8>) {
    let r = radius.min(w / 2).min(h / 2);
    let (xi, yi, wi, hi, ri) = (x as i32, y as i32, w as i32, h as i32, r as i32);

    if w > 2 * r {
        draw_filled_rect_mut(img, Rect::at(xi + ri, yi).of_size(w - 2 * r, h), color);
    }
    if h > 2 * r {
        draw_filled_rect_mut(img, Rect::at(xi, yi + ri).of_size(w, h - 2 * r), color);
    }
    if r > 0 {
        for (cx, cy) in [
            (xi + ri, yi + ri),
            (xi + wi - 1 - ri, yi + ri),
            (xi + ri, yi + hi - 1 - ri),
            (xi + wi - 1 - ri, yi + hi - 1 - ri),
        ] {
            draw_filled_circle_mut(img, (cx, cy), ri, color);
        }
    }
}

/// Crops the centre of `art` to the `w`:`h` aspect ratio, then scales it to exactly `w`x`h`.
fn cover(art: &RgbaImage, w: u32, h: u32) -> RgbaImage {
    let (src_w, src_h) = art.dimensions();
    // Compare src_w/src_h with w/h without dividing.
    let (crop_w, crop_h) = if src_w as u64 * h as u64 > w as u64 * src_h as u64 {
        let crop_w = (src_h as u64 * w as u64 / h as u64).clamp(1, src_w as u64) as u32;
        (crop_w, src_h)
    } else {
        let crop_h = (src_w as u64 * h as u64 / w as u64).clamp(1, src_h as u64) as u32;
        (src_w, crop_h)
    };
    let cropped =
        imageops::crop_imm(art, (src_w - crop_w) / 2, (src_h - crop_h) / 2, crop_w, crop_h).to_image();
    imageops::resize(&cropped, w, h, FilterType::Lanczos3)
}

fn ellipse_mask(w: u32, h: u32, rotation_deg: f32) -> GrayImage {
    let mut mask = GrayImage::new(w, h);
    draw_filled_ellipse_mut(
        &mut mask,
        ((w / 2) as i32, (h / 2) as i32),
        (w / 2) as i32,
        (h / 2) as i32,
        Luma([255]),
    );

    // The art stays upright; only the window turns.
    if rotation_deg.abs() > 0.1 {
        mask = rotate_about_center(
            &mask,
            rotation_deg.to_radians(),
            Interpolation::Bilinear,
            Luma([0]),
        );
    }
    mask
}

fn paste_into_ellipse(card: &mut RgbaImage, art: &RgbaImage, rotation_deg: f32) {
    let w = CARD_W - 2 * ELLIPSE_MARGIN;
    let h = CARD_H - 2 * ELLIPSE_MARGIN;
    let crop = cover(art, w, h);
    let mask = ellipse_mask(w, h, rotation_deg);

    for (x, y, m) in mask.enumerate_pixels() {
        let m = m[0] as u32;
        if m == 0 {
            continue;
        }
        let src = crop.get_pixel(x, y);
        let dst = card.get_pixel_mut(x + ELLIPSE_MARGIN, y + ELLIPSE_MARGIN);
        for c in 0..4 {
            dst[c] = ((src[c] as u32 * m + dst[c] as u32 * (255 - m) + 127) / 255) as u8;
        }
    }
}

fn draw_corners(card: &mut RgbaImage, mark: &RgbaImage) {
    imageops::overlay(card, mark, MARGIN as i64, MARGIN as i64);

    let flipped = imageops::rotate180(mark);
    let x = CARD_W as i64 - MARGIN as i64 - flipped.width() as i64;
    let y = CARD_H as i64 - MARGIN as i64 - flipped.height() as i64;
    imageops::overlay(card, &flipped, x, y);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::{CardKind, Color, Mark, build_deck};
    use std::collections::HashMap;

    fn solid_marks() -> Assets {
        let mut marks = HashMap::new();
        for digit in 0..=9 {
            marks.insert(Mark::Digit(digit), RgbaImage::from_pixel(40, 60, Rgba([255, 255, 255, 255])));
        }
        for mark in [Mark::Skip, Mark::Reverse, Mark::Star, Mark::PlusTwo, Mark::PlusFour] {
            marks.insert(mark, RgbaImage::from_pixel(120, 120, Rgba([250, 250, 250, 255])));
        }
        Assets::from_marks(marks)
    }

    fn art() -> RgbaImage {
        RgbaImage::from_pixel(32, 48, Rgba([10, 200, 30, 255]))
    }

    fn flat(upscale_factor: u32) -> RenderOptions {
        RenderOptions {
            upscale_factor,
            ellipse_rotation: 0.0,
            ..RenderOptions::default()
        }
    }

    #[test]
    fn test_size_independent_of_card() {
        let assets = solid_marks();
        let options = flat(1);
        let mut seen = std::collections::HashSet::new();
        for spec in build_deck() {
            // one card per kind keeps the test quick
            if !seen.insert(std::mem::discriminant(&spec.kind)) {
                continue;
            }
            let card = render(&spec, &art(), &assets, &options).unwrap();
            assert_eq!((card.width(), card.height()), (CARD_W, CARD_H));
            assert_eq!(card.spec, spec);
        }
    }

    #[test]
    fn test_upscaled_size() {
        let spec = CardSpec::new(Color::Blue, CardKind::Reverse, 1);
        let options = flat(2);
        let card = render(&spec, &art(), &solid_marks(), &options).unwrap();
        assert_eq!((card.width(), card.height()), options.card_size_px());
        assert_eq!(options.card_size_px(), (1650, 2550));
    }

    #[test]
    fn test_upscale_factor_clamped() {
        assert_eq!(flat(0).card_size_px(), (CARD_W, CARD_H));
        assert_eq!(
            flat(4_000_000).card_size_px(),
            (CARD_W * MAX_UPSCALE_FACTOR, CARD_H * MAX_UPSCALE_FACTOR)
        );
    }

    #[test]
    fn test_cover_extreme_aspect() {
        let wide = RgbaImage::from_pixel(4000, 1, Rgba([200, 0, 0, 255]));
        let out = cover(&wide, 809, 1259);
        assert_eq!(out.dimensions(), (809, 1259));
        assert_eq!(*out.get_pixel(404, 629), Rgba([200, 0, 0, 255]));

        let tall = RgbaImage::from_pixel(1, 4000, Rgba([0, 0, 200, 255]));
        let out = cover(&tall, 809, 1259);
        assert_eq!(out.dimensions(), (809, 1259));
        assert_eq!(*out.get_pixel(0, 0), Rgba([0, 0, 200, 255]));
    }

    #[test]
    fn test_cover_keeps_centre() {
        // left and right thirds red, middle third green
        let mut art = RgbaImage::from_pixel(300, 100, Rgba([255, 0, 0, 255]));
        for x in 100..200 {
            for y in 0..100 {
                art.put_pixel(x, y, Rgba([0, 255, 0, 255]));
            }
        }
        let out = cover(&art, 50, 100);
        assert_eq!(out.dimensions(), (50, 100));
        assert_eq!(*out.get_pixel(25, 50), Rgba([0, 255, 0, 255]));
    }

    #[test]
    fn test_layers() {
        let spec = CardSpec::new(Color::Red, CardKind::Number(7), 1);
        let options = RenderOptions {
            border_color: [1, 2, 3],
            ..flat(1)
        };
        let card = render(&spec, &art(), &solid_marks(), &options).unwrap().image;

        // rounded corners stay transparent
        assert_eq!(card.get_pixel(0, 0)[3], 0);
        // border band on the left edge, mid height
        assert_eq!(*card.get_pixel(2, CARD_H / 2), Rgba([1, 2, 3, 255]));
        // art fills the centre
        assert_eq!(*card.get_pixel(CARD_W / 2, CARD_H / 2), Rgba([10, 200, 30, 255]));
        // face colour shows between the ellipse and the border near a corner
        assert_eq!(*card.get_pixel(BORDER + 60, BORDER + 200), Rgba([228, 39, 43, 255]));
        // top-left mark
        assert_eq!(*card.get_pixel(MARGIN + 5, MARGIN + 5), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_save_uses_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let spec = CardSpec::new(Color::Green, CardKind::Number(9), 2);
        let card = RenderedCard {
            spec,
            image: RgbaImage::from_pixel(5, 8, Rgba([0, 0, 0, 255])),
        };
        let file = card.save(dir.path()).unwrap();
        assert_eq!(file.path, dir.path().join("green_number_9-x2.png"));
        assert_eq!((file.width, file.height), (5, 8));
        assert_eq!(image::open(&file.path).unwrap().to_rgba8(), card.image);
    }

    #[test]
    fn test_empty_art() {
        let spec = CardSpec::new(Color::Green, CardKind::Skip, 1);
        let err = render(&spec, &RgbaImage::new(0, 0), &solid_marks(), &flat(1)).unwrap_err();
        assert!(matches!(err, RenderError::EmptyArt { .. }));
    }

    #[test]
    fn test_missing_mark() {
        let spec = CardSpec::new(Color::Wild, CardKind::Wild, 1);
        let assets = Assets::from_marks(HashMap::new());
        let err = render(&spec, &art(), &assets, &flat(1)).unwrap_err();
        assert!(matches!(err, RenderError::MissingMark(Mark::Star)));
    }

    #[test]
    fn test_rotated_window_keeps_size() {
        let spec = CardSpec::new(Color::Yellow, CardKind::DrawTwo, 2);
        let options = RenderOptions {
            ellipse_rotation: 30.0,
            ..flat(1)
        };
        let card = render(&spec, &art(), &solid_marks(), &options).unwrap();
        assert_eq!((card.width(), card.height()), (CARD_W, CARD_H));
        assert_eq!(*card.image.get_pixel(CARD_W / 2, CARD_H / 2), Rgba([10, 200, 30, 255]));
    }
}
