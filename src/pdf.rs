//! PDF output: one page per layout, one image XObject per placed card.

use std::borrow::Cow;
use std::io::Write;
use std::path::Path;

use flate2::Compression;
use flate2::write::ZlibEncoder;
use image::RgbaImage;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use log::{debug, info};

use crate::error::PdfError;
use crate::layout::{PT_PER_MM, PageLayout, Size};
use crate::render::{CardFile, RenderedCard};

/// Something that can hand over the pixels of a placed card.
pub trait CardRaster {
    fn raster(&self) -> Result<Cow<'_, RgbaImage>, PdfError>;
}

impl CardRaster for RenderedCard {
    fn raster(&self) -> Result<Cow<'_, RgbaImage>, PdfError> {
        Ok(Cow::Borrowed(&self.image))
    }
}

impl CardRaster for CardFile {
    fn raster(&self) -> Result<Cow<'_, RgbaImage>, PdfError> {
        let img = image::open(&self.path).map_err(|source| PdfError::CardImage {
            path: self.path.clone(),
            source,
        })?;
        Ok(Cow::Owned(img.to_rgba8()))
    }
}

fn compress(data: &[u8]) -> Result<Vec<u8>, PdfError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Adds `img` as a DeviceRGB image with its alpha channel as soft mask.
fn add_image(doc: &mut Document, img: &RgbaImage) -> Result<ObjectId, PdfError> {
    let pixels = img.as_raw();
    let mut rgb = Vec::with_capacity(pixels.len() / 4 * 3);
    let mut alpha = Vec::with_capacity(pixels.len() / 4);
    for px in pixels.chunks_exact(4) {
        rgb.extend_from_slice(&px[..3]);
        alpha.push(px[3]);
    }

    let width = img.width() as i64;
    let height = img.height() as i64;

    let smask = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width,
            "Height" => height,
            "ColorSpace" => "DeviceGray",
            "BitsPerComponent" => 8,
            "Filter" => "FlateDecode",
        },
        compress(&alpha)?,
    );
    let smask_id = doc.add_object(smask);

    let image = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width,
            "Height" => height,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "FlateDecode",
            "SMask" => smask_id,
        },
        compress(&rgb)?,
    );
    Ok(doc.add_object(image))
}

/// Writes `pages` to `path`. `card` and `paper` are in millimetres.
///
/// Returns the number of pages written.
pub fn write_pdf<T: CardRaster>(
    pages: &[PageLayout<T>],
    card: Size,
    paper: Size,
    path: &Path,
) -> Result<usize, PdfError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let page_w = paper.width * PT_PER_MM;
    let page_h = paper.height * PT_PER_MM;
    let card_w = card.width * PT_PER_MM;
    let card_h = card.height * PT_PER_MM;

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());

    for page in pages {
        let mut operations = Vec::new();
        let mut xobjects = Dictionary::new();

        for (slot, placement) in page.placements.iter().enumerate() {
            let raster = placement.item.raster()?;
            let image_id = add_image(&mut doc, &raster)?;
            let name = format!("Card{}", slot);
            xobjects.set(name.as_bytes().to_vec(), image_id);

            // PDF space has its origin at the bottom-left corner
            let x = placement.x_mm * PT_PER_MM;
            let y = page_h - (placement.y_mm * PT_PER_MM) - card_h;

            operations.push(Operation::new("q", vec![]));
            operations.push(Operation::new(
                "cm",
                vec![
                    card_w.into(),
                    0.into(),
                    0.into(),
                    card_h.into(),
                    x.into(),
                    y.into(),
                ],
            ));
            operations.push(Operation::new("Do", vec![Object::Name(name.into_bytes())]));
            operations.push(Operation::new("Q", vec![]));
        }

        let content = Content { operations }.encode()?;
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), page_w.into(), page_h.into()],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => xobjects,
            },
        });
        kids.push(page_id.into());

        debug!(
            "Page {}: {} cards",
            page.page_index + 1,
            page.placements.len()
        );
    }

    let count = kids.len();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count as i64,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal("UNO cards"),
        "Producer" => Object::string_literal(concat!("uno-card-generator ", env!("CARGO_PKG_VERSION"))),
    });
    doc.trailer.set("Info", info_id);

    doc.save(path)?;

    info!("Wrote {} page(s) to {}", count, path.display());
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::{CardKind, CardSpec, Color};
    use crate::layout::{SheetGeometry, pack};
    use image::Rgba;

    fn cards(n: usize) -> Vec<RenderedCard> {
        (0..n)
            .map(|i| RenderedCard {
                spec: CardSpec::new(Color::Red, CardKind::Number((i % 10) as u8), 1),
                image: RgbaImage::from_pixel(6, 9, Rgba([200, 10, 10, 255])),
            })
            .collect()
    }

    const CARD: Size = Size {
        width: 60.0,
        height: 92.7,
    };

    fn sheet() -> SheetGeometry {
        SheetGeometry {
            page: Size::A4,
            margin: 4.0,
            spacing: 3.0,
        }
    }

    #[test]
    fn test_page_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.pdf");
        let pages = pack(cards(11), CARD, &sheet()).unwrap();

        let written = write_pdf(&pages, CARD, Size::A4, &path).unwrap();
        assert_eq!(written, 2);

        let doc = Document::load(&path).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn test_page_content_places_every_card() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.pdf");
        let pages = pack(cards(4), CARD, &sheet()).unwrap();
        write_pdf(&pages, CARD, Size::A4, &path).unwrap();

        let doc = Document::load(&path).unwrap();
        let (_, page_id) = doc.get_pages().into_iter().next().unwrap();
        let content = doc.get_and_decode_page_content(page_id).unwrap();
        let draws = content
            .operations
            .iter()
            .filter(|op| op.operator == "Do")
            .count();
        assert_eq!(draws, 4);
    }

    #[test]
    fn test_transparent_card_gets_soft_mask() {
        let mut doc = Document::with_version("1.5");
        let img = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 0]));
        let id = add_image(&mut doc, &img).unwrap();
        let stream = doc.get_object(id).unwrap().as_stream().unwrap();
        assert!(stream.dict.get(b"SMask").is_ok());
        assert_eq!(stream.dict.get(b"Width").unwrap().as_i64().unwrap(), 2);
    }

    #[test]
    fn test_missing_card_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = CardFile {
            spec: CardSpec::new(Color::Blue, CardKind::Skip, 1),
            path: dir.path().join("missing.png"),
            width: 1,
            height: 1,
        };
        let pages = pack(vec![file], CARD, &sheet()).unwrap();
        let err = write_pdf(&pages, CARD, Size::A4, &dir.path().join("out.pdf")).unwrap_err();
        assert!(matches!(err, PdfError::CardImage { .. }));
    }

    #[test]
    fn test_save_failure_keeps_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("deck.pdf");
        let pages = pack(cards(1), CARD, &sheet()).unwrap();

        let err = write_pdf(&pages, CARD, Size::A4, &path).unwrap_err();
        assert!(matches!(err, PdfError::Io(_) | PdfError::Lopdf(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
