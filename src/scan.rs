// Boundary-scanning diagnostics for locating sprites in a sheet by eye.
//
// Nothing here feeds back into the croppers; the findings are printed for a human who
// then updates the frame tables by hand.
use anyhow::{ensure, Context, Result};
use itertools::iproduct;

use crate::{
    common::{ColorRGB, ColorRGBA, Image, PixelCoord, Rect},
    crop::{crop, paste, upscale},
    helpers::{is_black, rgb},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpriteSpan {
    pub bounds: Rect,  // Tight box around the non-black pixels of this span
    pub pixels: usize, // Non-black pixel count, a rough confidence score
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BandReport {
    pub band: Rect,
    pub bounds: Option<Rect>, // None if the band is entirely background
    pub spans: Vec<SpriteSpan>,
}

fn is_content(image: &Image, x: PixelCoord, y: PixelCoord) -> bool {
    image.get(x, y).is_some_and(|p| !is_black(p))
}

fn content_bounds(image: &Image, area: Rect) -> Option<(Rect, usize)> {
    let mut found: Option<(PixelCoord, PixelCoord, PixelCoord, PixelCoord)> = None;
    let mut count = 0;
    for (y, x) in iproduct!(area.y..area.bottom(), area.x..area.right()) {
        if !is_content(image, x, y) {
            continue;
        }
        count += 1;
        found = Some(match found {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }
    found.map(|(x0, y0, x1, y1)| (Rect::new(x0, y0, x1 - x0 + 1, y1 - y0 + 1), count))
}

/// Split `region` into horizontal bands and find the sprites in each: columns holding any
/// non-black pixel are grouped into contiguous spans separated by all-black columns.
pub fn band_spans(image: &Image, region: Rect, band_height: PixelCoord) -> Vec<BandReport> {
    let band_height = band_height.max(1);
    let mut reports = vec![];
    for y0 in (region.y..region.bottom()).step_by(band_height as usize) {
        let band = Rect::new(region.x, y0, region.width, band_height.min(region.bottom() - y0));
        let column_has_content =
            |x: PixelCoord| (band.y..band.bottom()).any(|y| is_content(image, x, y));

        let mut spans = vec![];
        let mut start: Option<PixelCoord> = None;
        for x in band.x..=band.right() {
            let has = x < band.right() && column_has_content(x);
            match (start, has) {
                (None, true) => start = Some(x),
                (Some(s), false) => {
                    let columns = Rect::new(s, band.y, x - s, band.height);
                    if let Some((bounds, pixels)) = content_bounds(image, columns) {
                        spans.push(SpriteSpan { bounds, pixels });
                    }
                    start = None;
                }
                _ => {}
            }
        }

        reports.push(BandReport {
            band,
            bounds: content_bounds(image, band).map(|(r, _)| r),
            spans,
        });
    }
    reports
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnRun {
    pub x: PixelCoord,
    pub y: PixelCoord, // First row of the run
    pub len: u32,
    pub color: ColorRGB,
}

/// Vertical runs of a single non-black color at least `min_len` pixels long.
pub fn vertical_runs(image: &Image, region: Rect, min_len: u32) -> Vec<ColumnRun> {
    let mut runs = vec![];
    for x in region.x..region.right() {
        let column: Vec<ColorRGBA> = (region.y..region.bottom())
            .filter_map(|y| image.get(x, y))
            .collect();
        let mut y = 0;
        for group in column.chunk_by(|a, b| rgb(*a) == rgb(*b)) {
            let len = group.len() as u32;
            if len >= min_len && !is_black(group[0]) {
                runs.push(ColumnRun {
                    x,
                    y: region.y + y,
                    len,
                    color: rgb(group[0]),
                });
            }
            y += len;
        }
    }
    runs
}

/// Upscale `region` and rule grid lines over it, one set per (cell size, color) pair,
/// drawn in order so later grids sit on top.
pub fn grid_overlay(
    image: &Image,
    region: Rect,
    scale: u32,
    grids: &[(PixelCoord, ColorRGBA)],
) -> Result<Image> {
    let mut big = upscale(&crop(image, region)?, scale)?;
    for &(cell, color) in grids {
        let step = cell.max(1).saturating_mul(scale) as usize;
        for x in (0..=big.width).step_by(step) {
            for y in 0..big.height {
                big.set(x, y, color);
            }
        }
        for y in (0..=big.height).step_by(step) {
            for x in 0..big.width {
                big.set(x, y, color);
            }
        }
    }
    Ok(big)
}

const CELL_SHEET_BACKGROUND: ColorRGBA = [40, 40, 40, 255];
const CELL_FRAME: ColorRGBA = [128, 128, 128, 255];
const CELL_BORDER: PixelCoord = 2;
const CELL_SHEET_MARGIN: PixelCoord = 2;

/// A block of equally sized cells on a sprite sheet, in cell units.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CellRange {
    pub first_col: u32,
    pub first_row: u32,
    pub cols: u32,
    pub rows: u32,
    pub cell: PixelCoord, // Cell edge in source pixels
}

#[derive(Clone, Debug)]
pub struct SheetCell {
    pub col: u32, // Absolute cell column on the sprite sheet
    pub row: u32,
    pub image: Image, // Unscaled source pixels
}

#[derive(Clone, Debug)]
pub struct CellSheet {
    pub sheet: Image,
    pub cells: Vec<SheetCell>,
}

fn coord(value: u64, what: &str) -> Result<PixelCoord> {
    PixelCoord::try_from(value).ok().with_context(|| format!("{} {} is too large", what, value))
}

/// Lay the cells of `range` out as a contact sheet: each cell upscaled by `scale` and
/// framed, on a dark background, in the same row/column arrangement as the source.
pub fn cell_sheet(image: &Image, range: &CellRange, scale: u32) -> Result<CellSheet> {
    ensure!(
        range.cols > 0 && range.rows > 0 && range.cell > 0,
        "cell range {}x{} of {}px cells is empty",
        range.cols,
        range.rows,
        range.cell
    );
    ensure!(scale > 0, "scale factor must be positive");
    let big = coord(range.cell as u64 * scale as u64, "scaled cell size")?;
    let slot = big as u64 + 2 * CELL_BORDER as u64;
    let width = coord(range.cols as u64 * slot + 2 * CELL_SHEET_MARGIN as u64, "sheet width")?;
    let height = coord(range.rows as u64 * slot + 2 * CELL_SHEET_MARGIN as u64, "sheet height")?;

    let mut sheet = Image::new(width, height, CELL_SHEET_BACKGROUND);
    let mut cells = vec![];
    for (r, c) in iproduct!(0..range.rows, 0..range.cols) {
        let col = coord(range.first_col as u64 + c as u64, "cell column")?;
        let row = coord(range.first_row as u64 + r as u64, "cell row")?;
        let source = Rect::checked(
            coord(col as u64 * range.cell as u64, "cell x")?,
            coord(row as u64 * range.cell as u64, "cell y")?,
            range.cell,
            range.cell,
        )?;
        let cell = crop(image, source)?;

        // Slot positions fit: they lie inside the sheet size checked above.
        let frame_x = CELL_SHEET_MARGIN + c * slot as PixelCoord;
        let frame_y = CELL_SHEET_MARGIN + r * slot as PixelCoord;
        sheet.outline_rect(
            Rect::new(frame_x, frame_y, slot as PixelCoord, slot as PixelCoord),
            CELL_FRAME,
        );
        paste(
            &mut sheet,
            &upscale(&cell, scale)?,
            frame_x + CELL_BORDER,
            frame_y + CELL_BORDER,
        );
        cells.push(SheetCell {
            col,
            row,
            image: cell,
        });
    }
    Ok(CellSheet { sheet, cells })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::BLACK;

    const BAR: ColorRGBA = [0, 200, 0, 255];

    fn sheet() -> Image {
        let mut img = Image::new(64, 48, BLACK);
        // Band 0: two sprites, x 4..8 and x 20..30
        img.fill_rect(Rect::new(4, 3, 4, 10), BAR);
        img.fill_rect(Rect::new(20, 5, 10, 2), [200, 0, 0, 255]);
        // Band 1 (y 24..48): one sprite touching the right edge of the region
        img.fill_rect(Rect::new(60, 30, 4, 4), BAR);
        img
    }

    #[test]
    fn spans_are_split_on_black_columns() {
        let reports = band_spans(&sheet(), Rect::new(0, 0, 64, 48), 24);
        assert_eq!(reports.len(), 2);

        let band0 = &reports[0];
        assert_eq!(band0.bounds, Some(Rect::new(4, 3, 26, 10)));
        assert_eq!(
            band0.spans,
            vec![
                SpriteSpan {
                    bounds: Rect::new(4, 3, 4, 10),
                    pixels: 40
                },
                SpriteSpan {
                    bounds: Rect::new(20, 5, 10, 2),
                    pixels: 20
                },
            ]
        );

        let band1 = &reports[1];
        assert_eq!(band1.band, Rect::new(0, 24, 64, 24));
        assert_eq!(band1.spans.len(), 1);
        assert_eq!(band1.spans[0].bounds, Rect::new(60, 30, 4, 4));
    }

    #[test]
    fn empty_band_has_no_bounds() {
        let img = Image::new(10, 10, BLACK);
        let reports = band_spans(&img, Rect::new(0, 0, 10, 10), 4);
        assert_eq!(reports.len(), 3);
        assert_eq!(reports[2].band.height, 2);
        assert!(reports.iter().all(|r| r.bounds.is_none() && r.spans.is_empty()));
    }

    #[test]
    fn region_at_the_coordinate_limit_is_empty() {
        let img = Image::new(8, 8, BLACK);
        let region = Rect::new(u32::MAX - 4, 0, 10, 8);
        let reports = band_spans(&img, region, 4);
        assert_eq!(reports.len(), 2);
        assert!(reports.iter().all(|r| r.bounds.is_none() && r.spans.is_empty()));
        assert!(vertical_runs(&img, region, 1).is_empty());
    }

    #[test]
    fn long_colored_runs_are_reported() {
        let runs = vertical_runs(&sheet(), Rect::new(0, 0, 32, 24), 8);
        assert_eq!(runs.len(), 4);
        assert!(runs.iter().all(|r| r.len == 10 && r.y == 3 && r.color == [0, 200, 0]));
        assert_eq!(runs.iter().map(|r| r.x).collect::<Vec<_>>(), vec![4, 5, 6, 7]);
    }

    #[test]
    fn cell_sheet_frames_each_scaled_cell() {
        let range = CellRange {
            first_col: 0,
            first_row: 0,
            cols: 2,
            rows: 2,
            cell: 8,
        };
        let out = cell_sheet(&sheet(), &range, 2).unwrap();
        // Slots are 16 + 2 * 2 = 20 pixels, plus a 2 pixel margin on each side.
        assert_eq!((out.sheet.width, out.sheet.height), (44, 44));
        assert_eq!(out.cells.len(), 4);
        assert_eq!((out.cells[1].col, out.cells[1].row), (1, 0));
        assert_eq!((out.cells[2].col, out.cells[2].row), (0, 1));
        assert_eq!(out.cells[0].image.get(4, 3), Some(BAR));

        assert_eq!(out.sheet.get(0, 0), Some(CELL_SHEET_BACKGROUND));
        assert_eq!(out.sheet.get(2, 2), Some(CELL_FRAME));
        assert_eq!(out.sheet.get(21, 10), Some(CELL_FRAME));
        assert_eq!(out.sheet.get(3, 3), Some(CELL_SHEET_BACKGROUND));
        // Source pixel (4, 3) lands at the inner corner (4, 4) plus 2 * (4, 3).
        assert_eq!(out.sheet.get(12, 10), Some(BAR));
        assert_eq!(out.sheet.get(12, 9), Some(BLACK));
    }

    #[test]
    fn cell_sheet_rejects_empty_and_oversized_ranges() {
        let img = sheet();
        let range = CellRange {
            first_col: 0,
            first_row: 0,
            cols: 1,
            rows: 1,
            cell: 24,
        };
        assert!(cell_sheet(&img, &CellRange { cols: 0, ..range }, 2).is_err());
        assert!(cell_sheet(&img, &range, 0).is_err());
        assert!(cell_sheet(&img, &range, u32::MAX).is_err());
        let far = CellRange {
            first_col: u32::MAX,
            ..range
        };
        assert!(cell_sheet(&img, &far, 1).is_err());
    }

    #[test]
    fn grid_overlay_rules_lines_at_scaled_cells() {
        let img = Image::new(8, 8, BLACK);
        let red = [255, 0, 0, 255];
        let out = grid_overlay(&img, Rect::new(0, 0, 8, 8), 2, &[(4, red)]).unwrap();
        assert_eq!((out.width, out.height), (16, 16));
        assert_eq!(out.get(8, 3), Some(red));
        assert_eq!(out.get(3, 0), Some(red));
        assert_eq!(out.get(3, 3), Some(BLACK));
    }
}
