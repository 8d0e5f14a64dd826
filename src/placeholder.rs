// Placeholder tileset: 64 flat-colored 8x8 tiles on an 8x8 grid, one tile kind per row.
use crate::{
    common::{ColorRGB, Image, PixelCoord, Rect, BLACK},
    helpers::{darken, opaque},
};

pub const TILE_SIZE: PixelCoord = 8;
pub const TILES_PER_ROW: u32 = 8;
pub const TILES_PER_COL: u32 = 8;
pub const TILE_COUNT: usize = (TILES_PER_ROW * TILES_PER_COL) as usize;
pub const EMPTY_TILE: usize = 24;

const OUTLINE_DARKEN: u8 = 20;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TileKind {
    SolidWall,
    Floor,
    Platform,
    Background,
    LadderOrHazard,
    PatternDecoration,
    ColoredDecoration,
    Special,
}

impl TileKind {
    pub fn description(self) -> &'static str {
        match self {
            TileKind::SolidWall => "Solid walls (gray, brown, various)",
            TileKind::Floor => "Floor tiles (tan, brown, stone)",
            TileKind::Platform => "Platforms (light, various colors)",
            TileKind::Background => "Background/air (black = empty)",
            TileKind::LadderOrHazard => "Ladders and hazards",
            TileKind::PatternDecoration => "Decorative (brick, stone patterns)",
            TileKind::ColoredDecoration => "Colored decorations",
            TileKind::Special => "Special/reserved",
        }
    }
}

pub const ROW_KINDS: [TileKind; TILES_PER_COL as usize] = [
    TileKind::SolidWall,
    TileKind::Floor,
    TileKind::Platform,
    TileKind::Background,
    TileKind::LadderOrHazard,
    TileKind::PatternDecoration,
    TileKind::ColoredDecoration,
    TileKind::Special,
];

#[rustfmt::skip]
pub const TILE_COLORS: [ColorRGB; TILE_COUNT] = [
    // Solid walls
    [64, 64, 64], [80, 80, 80], [96, 96, 96], [70, 50, 30],
    [90, 70, 50], [60, 60, 80], [80, 60, 60], [50, 70, 50],
    // Floors
    [100, 80, 60], [90, 70, 50], [110, 90, 70], [80, 60, 40],
    [70, 70, 70], [85, 85, 85], [60, 50, 40], [95, 75, 55],
    // Platforms
    [120, 100, 80], [100, 80, 60], [80, 60, 40], [90, 90, 70],
    [70, 90, 70], [90, 70, 90], [90, 80, 70], [80, 80, 60],
    // Background; tile 24 is empty air
    [0, 0, 0], [20, 20, 20], [30, 30, 40], [40, 30, 30],
    [30, 40, 30], [40, 40, 30], [50, 40, 50], [40, 50, 50],
    // Ladders and hazards
    [100, 90, 50], [110, 100, 60], [0, 80, 0], [80, 0, 0],
    [0, 0, 80], [100, 0, 100], [128, 128, 0], [0, 128, 128],
    // Brick and stone
    [70, 60, 50], [85, 75, 65], [60, 55, 45], [80, 80, 60],
    [65, 65, 55], [75, 70, 60], [90, 85, 75], [70, 75, 70],
    // Colored decorations
    [100, 50, 50], [50, 100, 50], [50, 50, 100], [100, 100, 50],
    [100, 50, 100], [50, 100, 100], [128, 64, 0], [64, 128, 64],
    // Special; 56 is the magenta transparency marker
    [255, 0, 255], [128, 128, 128], [160, 160, 160], [192, 192, 192],
    [32, 32, 32], [255, 255, 255], [200, 200, 200], [150, 150, 150],
];

pub fn tile_kind(tile: usize) -> TileKind {
    ROW_KINDS[tile / TILES_PER_ROW as usize]
}

pub fn tile_rect(tile: usize) -> Rect {
    let col = (tile % TILES_PER_ROW as usize) as PixelCoord;
    let row = (tile / TILES_PER_ROW as usize) as PixelCoord;
    Rect::new(col * TILE_SIZE, row * TILE_SIZE, TILE_SIZE, TILE_SIZE)
}

pub fn paint_placeholder_tileset() -> Image {
    let mut image = Image::new(TILES_PER_ROW * TILE_SIZE, TILES_PER_COL * TILE_SIZE, BLACK);
    for (tile, &color) in TILE_COLORS.iter().enumerate() {
        let rect = tile_rect(tile);
        image.fill_rect(rect, opaque(color));
        if tile != EMPTY_TILE {
            image.outline_rect(rect, opaque(darken(color, OUTLINE_DARKEN)));
        }
    }
    image
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiles_are_filled_and_outlined() {
        let img = paint_placeholder_tileset();
        assert_eq!((img.width, img.height), (64, 64));
        // Tile 9 sits at (8, 8): brown floor with a darker outline.
        assert_eq!(img.get(8, 8), Some([70, 50, 30, 255]));
        assert_eq!(img.get(15, 12), Some([70, 50, 30, 255]));
        assert_eq!(img.get(11, 11), Some([90, 70, 50, 255]));
    }

    #[test]
    fn empty_tile_has_no_outline() {
        let img = paint_placeholder_tileset();
        let rect = tile_rect(EMPTY_TILE);
        assert_eq!((rect.x, rect.y), (0, 24));
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                assert_eq!(img.get(x, y), Some(BLACK));
            }
        }
    }

    #[test]
    fn outline_saturates_dark_channels() {
        let img = paint_placeholder_tileset();
        // Tile 34 is green ladder (0, 80, 0).
        let rect = tile_rect(34);
        assert_eq!(img.get(rect.x, rect.y), Some([0, 60, 0, 255]));
    }

    #[test]
    fn kinds_follow_rows() {
        assert_eq!(tile_kind(0), TileKind::SolidWall);
        assert_eq!(tile_kind(EMPTY_TILE), TileKind::Background);
        assert_eq!(tile_kind(44), TileKind::PatternDecoration);
        assert_eq!(tile_kind(50), TileKind::ColoredDecoration);
        assert_ne!(
            TileKind::PatternDecoration.description(),
            TileKind::ColoredDecoration.description()
        );
        assert_eq!(tile_kind(63), TileKind::Special);
    }
}
