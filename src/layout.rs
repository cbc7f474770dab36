//! Packing fixed-size cards onto printable pages.
//!
//! All lengths are millimetres measured from the top-left corner of the page.
//! Cards fill a fixed grid row by row; nothing is rotated or reordered.

use log::debug;

use crate::error::LayoutError;

/// Points per millimetre (1 pt = 1/72 in).
pub const PT_PER_MM: f32 = 72.0 / 25.4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const A4: Size = Size {
        width: 210.0,
        height: 297.0,
    };
    pub const LETTER: Size = Size {
        width: 215.9,
        height: 279.4,
    };

    pub fn new(width: f32, height: f32) -> Self {
        Size { width, height }
    }
}

/// Paper size plus the fixed margins and gaps of the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetGeometry {
    pub page: Size,
    pub margin: f32,
    pub spacing: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    pub columns: usize,
    pub rows: usize,
}

impl Grid {
    pub fn capacity(&self) -> usize {
        self.columns * self.rows
    }

    /// Fraction of the page area covered by a full grid, gaps included.
    pub fn coverage(&self, card: Size, sheet: &SheetGeometry) -> f32 {
        let span = |n: usize, len: f32| {
            if n == 0 { 0.0 } else { n as f32 * len + (n - 1) as f32 * sheet.spacing }
        };
        let used = span(self.columns, card.width) * span(self.rows, card.height);
        used / (sheet.page.width * sheet.page.height)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Placement<T> {
    pub item: T,
    pub row: usize,
    pub column: usize,
    pub x_mm: f32,
    pub y_mm: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout<T> {
    pub page_index: usize,
    pub placements: Vec<Placement<T>>,
}

fn fit(available: f32, margin: f32, spacing: f32, card: f32) -> usize {
    let n = ((available - 2.0 * margin + spacing) / (card + spacing)).floor();
    if n.is_finite() && n > 0.0 { n as usize } else { 0 }
}

/// Computes how many cards fit across and down one page.
pub fn grid(card: Size, sheet: &SheetGeometry) -> Result<Grid, LayoutError> {
    if card.width <= 0.0 || card.height <= 0.0 {
        return Err(LayoutError::InvalidGeometry(format!(
            "card size must be positive, got {}x{} mm",
            card.width, card.height
        )));
    }
    if sheet.margin < 0.0 || sheet.spacing < 0.0 {
        return Err(LayoutError::InvalidGeometry(format!(
            "margin and spacing must not be negative, got {} and {} mm",
            sheet.margin, sheet.spacing
        )));
    }

    let grid = Grid {
        columns: fit(sheet.page.width, sheet.margin, sheet.spacing, card.width),
        rows: fit(sheet.page.height, sheet.margin, sheet.spacing, card.height),
    };

    if grid.capacity() == 0 {
        return Err(LayoutError::CardDoesNotFit {
            card_w: card.width,
            card_h: card.height,
            page_w: sheet.page.width,
            page_h: sheet.page.height,
            margin: sheet.margin,
        });
    }

    debug!(
        "Grid: {} columns x {} rows ({} cards per page)",
        grid.columns,
        grid.rows,
        grid.capacity()
    );
    Ok(grid)
}

/// Assigns every item, in order, to a page and grid cell.
///
/// Every page but the last holds exactly `grid.capacity()` items.
pub fn pack<T>(
    items: Vec<T>,
    card: Size,
    sheet: &SheetGeometry,
) -> Result<Vec<PageLayout<T>>, LayoutError> {
    let grid = grid(card, sheet)?;
    let capacity = grid.capacity();
    let mut pages: Vec<PageLayout<T>> = Vec::with_capacity(items.len().div_ceil(capacity));

    for (i, item) in items.into_iter().enumerate() {
        let page_index = i / capacity;
        let slot = i % capacity;
        let row = slot / grid.columns;
        let column = slot % grid.columns;

        if slot == 0 {
            pages.push(PageLayout {
                page_index,
                placements: Vec::with_capacity(capacity),
            });
        }

        let placement = Placement {
            item,
            row,
            column,
            x_mm: sheet.margin + column as f32 * (card.width + sheet.spacing),
            y_mm: sheet.margin + row as f32 * (card.height + sheet.spacing),
        };
        // slot 0 always pushed a page above
        if let Some(page) = pages.last_mut() {
            page.placements.push(placement);
        }
    }

    Ok(pages)
}
