// Collision grids derived from room backgrounds: one cell per 8x8 block, solid if any
// pixel in the block is brighter than the threshold on some channel.
use std::path::Path;

use itertools::{iproduct, Itertools};
use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::{
    common::{ColorRGBA, Image, PixelCoord, Rect, TRANSPARENT},
    helpers::alpha_blend,
    screenshot::ROOM_BG_PREFIX,
};

pub const GRID_COLS: u32 = 40;
pub const GRID_ROWS: u32 = 18;
pub const CELL_SIZE: u32 = 8;
pub const ROOM_WIDTH: PixelCoord = GRID_COLS * CELL_SIZE;
pub const ROOM_HEIGHT: PixelCoord = GRID_ROWS * CELL_SIZE;
pub const DEFAULT_THRESHOLD: u8 = 10;

#[derive(Serialize_repr, Deserialize_repr, Copy, Clone, Debug, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Collision {
    #[default]
    Empty = 0,
    Solid = 1,
}

impl Collision {
    pub fn is_solid(self) -> bool {
        self == Collision::Solid
    }
}

#[derive(Clone, Debug)]
pub struct GridSettings {
    pub cols: u32,
    pub rows: u32,
    pub cell_size: u32,
    pub threshold: u8,
}

impl Default for GridSettings {
    fn default() -> Self {
        GridSettings {
            cols: GRID_COLS,
            rows: GRID_ROWS,
            cell_size: CELL_SIZE,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl GridSettings {
    pub fn expected_size(&self) -> (PixelCoord, PixelCoord) {
        (self.cols * self.cell_size, self.rows * self.cell_size)
    }

    pub fn cell_rect(&self, col: u32, row: u32) -> Rect {
        Rect::new(
            col * self.cell_size,
            row * self.cell_size,
            self.cell_size,
            self.cell_size,
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollisionGrid {
    pub cols: u32,
    pub rows: u32,
    pub cells: Vec<Vec<Collision>>, // Indexed [row][col]
}

impl CollisionGrid {
    pub fn get(&self, col: u32, row: u32) -> Collision {
        self.cells[row as usize][col as usize]
    }

    pub fn solid_count(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_solid()).count()
    }

    pub fn cell_count(&self) -> usize {
        (self.cols * self.rows) as usize
    }

    /// One line per row, `#` for solid and `.` for empty.
    pub fn ascii(&self) -> String {
        self.cells
            .iter()
            .map(|row| {
                row.iter()
                    .map(|c| if c.is_solid() { '#' } else { '.' })
                    .collect::<String>()
            })
            .join("\n")
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SizeMismatch {
    pub expected: (PixelCoord, PixelCoord),
    pub actual: (PixelCoord, PixelCoord),
}

#[derive(Debug)]
pub struct Extraction {
    pub grid: CollisionGrid,
    pub size_mismatch: Option<SizeMismatch>,
}

/// A cell is empty only if every channel of every pixel is below the threshold.
/// Pixels outside the image (undersized input) count as black and never make a cell solid.
fn classify(image: &Image, rect: Rect, threshold: u8) -> Collision {
    let bright = iproduct!(rect.y..rect.bottom(), rect.x..rect.right())
        .filter_map(|(y, x)| image.get(x, y))
        .any(|p| p[..3].iter().any(|&c| c >= threshold));
    if bright {
        Collision::Solid
    } else {
        Collision::Empty
    }
}

pub fn extract_grid(image: &Image, settings: &GridSettings) -> Extraction {
    let expected = settings.expected_size();
    let actual = (image.width, image.height);
    let size_mismatch = (expected != actual).then_some(SizeMismatch { expected, actual });

    let cells = (0..settings.rows)
        .map(|row| {
            (0..settings.cols)
                .map(|col| classify(image, settings.cell_rect(col, row), settings.threshold))
                .collect()
        })
        .collect();

    Extraction {
        grid: CollisionGrid {
            cols: settings.cols,
            rows: settings.rows,
            cells,
        },
        size_mismatch,
    }
}

/// Derive a room id from a background file name: `RoomBG_Stonehenge.png` -> `stonehenge`.
pub fn room_id_from_path(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    stem.replace(ROOM_BG_PREFIX, "").to_lowercase()
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Legend {
    #[serde(rename = "0")]
    pub empty: String,
    #[serde(rename = "1")]
    pub solid: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CollisionRecord {
    pub room_id: String,
    pub width: u32,
    pub height: u32,
    pub tile_size: u32,
    pub collision: Vec<Vec<Collision>>,
    #[serde(rename = "_legend")]
    pub legend: Legend,
    #[serde(rename = "_note")]
    pub note: String,
}

impl CollisionRecord {
    pub fn new(room_id: &str, grid: &CollisionGrid, cell_size: u32) -> Self {
        CollisionRecord {
            room_id: room_id.to_string(),
            width: grid.cols,
            height: grid.rows,
            tile_size: cell_size,
            collision: grid.cells.clone(),
            legend: Legend {
                empty: "empty (air/passthrough)".to_string(),
                solid: "solid (blocks movement)".to_string(),
            },
            note: "Auto-generated from room background. Edit manually to fix incorrect detections."
                .to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct OverlayStyle {
    pub solid_tint: ColorRGBA,
    pub grid_line: ColorRGBA,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        OverlayStyle {
            solid_tint: [255, 0, 0, 80],
            grid_line: [255, 255, 255, 40],
        }
    }
}

/// Red-tint every solid cell and rule the cell grid over the background.
pub fn render_overlay(
    background: &Image,
    grid: &CollisionGrid,
    settings: &GridSettings,
    style: &OverlayStyle,
) -> Image {
    let mut layer = Image::new(background.width, background.height, TRANSPARENT);
    for (row, col) in iproduct!(0..grid.rows, 0..grid.cols) {
        if grid.get(col, row).is_solid() {
            layer.fill_rect(settings.cell_rect(col, row), style.solid_tint);
        }
    }

    // Lines replace the tint beneath them rather than blending with it.
    let (grid_w, grid_h) = settings.expected_size();
    for row in 0..=grid.rows {
        let y = row * settings.cell_size;
        for x in 0..=grid_w {
            layer.set(x, y, style.grid_line);
        }
    }
    for col in 0..=grid.cols {
        let x = col * settings.cell_size;
        for y in 0..=grid_h {
            layer.set(x, y, style.grid_line);
        }
    }

    let pixels = background
        .pixels
        .iter()
        .zip(&layer.pixels)
        .map(|(&bg, &fg)| alpha_blend(bg, fg))
        .collect();
    Image {
        width: background.width,
        height: background.height,
        pixels,
    }
}
