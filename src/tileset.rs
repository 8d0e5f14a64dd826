// Reassembly of Mode 0 character sets into a contact sheet.
use anyhow::{bail, ensure, Result};

use crate::{
    common::{Image, PixelCoord},
    mode0::DecodeSettings,
};

#[derive(Clone, Debug)]
pub struct TileLayout {
    pub tile_width: PixelCoord,
    pub tile_height: PixelCoord,
    pub tiles_per_row: u32, // Tiles per row of the output sheet
}

impl Default for TileLayout {
    fn default() -> Self {
        TileLayout {
            tile_width: 8,
            tile_height: 8,
            tiles_per_row: 16,
        }
    }
}

impl TileLayout {
    pub fn bytes_per_line(&self) -> usize {
        self.tile_width as usize / 2
    }

    pub fn bytes_per_tile(&self) -> usize {
        self.bytes_per_line() * self.tile_height as usize
    }

    /// Top-left corner of tile `idx` on the sheet.
    pub fn tile_origin(&self, idx: usize) -> (PixelCoord, PixelCoord) {
        let per_row = self.tiles_per_row as usize;
        (
            (idx % per_row) as PixelCoord * self.tile_width,
            (idx / per_row) as PixelCoord * self.tile_height,
        )
    }

    fn validate(&self) -> Result<()> {
        ensure!(
            self.tile_width > 0 && self.tile_width % 2 == 0,
            "tile width must be positive and even, got {}",
            self.tile_width
        );
        ensure!(self.tile_height > 0, "tile height must be positive");
        ensure!(self.tiles_per_row > 0, "tiles per row must be positive");
        Ok(())
    }

    /// Pixel size of a sheet holding `tile_count` tiles.
    pub fn sheet_size(&self, tile_count: usize) -> Result<(PixelCoord, PixelCoord)> {
        let sheet_rows = tile_count.div_ceil(self.tiles_per_row as usize);
        let width = self.tiles_per_row.checked_mul(self.tile_width);
        let height = PixelCoord::try_from(sheet_rows)
            .ok()
            .and_then(|rows| rows.checked_mul(self.tile_height));
        let (Some(width), Some(height)) = (width, height) else {
            bail!(
                "{} tiles of {}x{} at {} per row do not fit in a sheet",
                tile_count,
                self.tile_width,
                self.tile_height,
                self.tiles_per_row
            );
        };
        Ok((width, height))
    }
}

#[derive(Debug)]
pub struct TileSheet {
    pub image: Image,
    pub tile_count: usize,
    pub trailing_bytes: usize, // Leftover bytes of an incomplete final tile
    pub skipped_pixels: usize,
}

pub fn build_tile_sheet(data: &[u8], layout: &TileLayout, settings: &DecodeSettings) -> Result<TileSheet> {
    layout.validate()?;
    let bytes_per_tile = layout.bytes_per_tile();
    let bytes_per_line = layout.bytes_per_line();
    let tile_count = data.len() / bytes_per_tile;
    let (width, height) = layout.sheet_size(tile_count)?;

    let mut image = Image::new(width, height, settings.fill);
    let mut skipped_pixels = 0;
    for (idx, tile) in data.chunks_exact(bytes_per_tile).enumerate() {
        let (tile_x, tile_y) = layout.tile_origin(idx);
        for (y, line) in tile.chunks_exact(bytes_per_line).enumerate() {
            for (i, &byte) in line.iter().enumerate() {
                let x = tile_x + 2 * i as PixelCoord;
                let landed = settings.put_byte(&mut image, x, tile_y + y as PixelCoord, byte);
                skipped_pixels += 2 - landed;
            }
        }
    }

    Ok(TileSheet {
        image,
        tile_count,
        trailing_bytes: data.len() % bytes_per_tile,
        skipped_pixels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{common::BLACK, mode0::encode_byte};

    fn tile_bytes(color: u8, layout: &TileLayout) -> Vec<u8> {
        vec![encode_byte(color, color); layout.bytes_per_tile()]
    }

    #[test]
    fn tiles_are_placed_row_major() {
        let layout = TileLayout {
            tiles_per_row: 3,
            ..Default::default()
        };
        let settings = DecodeSettings::default();
        let data: Vec<u8> = (1..=5).flat_map(|c| tile_bytes(c, &layout)).collect();

        let sheet = build_tile_sheet(&data, &layout, &settings).unwrap();
        assert_eq!(sheet.tile_count, 5);
        assert_eq!(sheet.trailing_bytes, 0);
        assert_eq!(sheet.skipped_pixels, 0);
        assert_eq!((sheet.image.width, sheet.image.height), (24, 16));

        for idx in 0..5 {
            let (x0, y0) = layout.tile_origin(idx);
            let expected = settings.palette.rgba(idx as u8 + 1);
            for y in y0..y0 + 8 {
                for x in x0..x0 + 8 {
                    assert_eq!(sheet.image.get(x, y), Some(expected));
                }
            }
        }
        // The sixth slot has no tile and keeps the fill.
        assert_eq!(sheet.image.get(16, 8), Some(BLACK));
        assert_eq!(sheet.image.get(23, 15), Some(BLACK));
    }

    #[test]
    fn trailing_partial_tile_is_dropped() {
        let layout = TileLayout::default();
        let mut data: Vec<u8> = (0..2).flat_map(|_| tile_bytes(6, &layout)).collect();
        data.extend([0xFF; 31]);

        let sheet = build_tile_sheet(&data, &layout, &DecodeSettings::default()).unwrap();
        assert_eq!(sheet.tile_count, 2);
        assert_eq!(sheet.trailing_bytes, 31);
        assert_eq!((sheet.image.width, sheet.image.height), (128, 8));
        assert_eq!(sheet.image.get(16, 0), Some(BLACK));
    }

    #[test]
    fn tile_rows_use_their_own_stride() {
        // One 4x2 tile: row 0 is color 1, row 1 is color 2.
        let layout = TileLayout {
            tile_width: 4,
            tile_height: 2,
            tiles_per_row: 1,
        };
        let data = [encode_byte(1, 1), encode_byte(1, 1), encode_byte(2, 3), encode_byte(2, 3)];
        let settings = DecodeSettings::default();
        let sheet = build_tile_sheet(&data, &layout, &settings).unwrap();
        let pal = &settings.palette;
        assert_eq!(sheet.image.pixels[..4], [pal.rgba(1); 4]);
        assert_eq!(
            sheet.image.pixels[4..],
            [pal.rgba(2), pal.rgba(3), pal.rgba(2), pal.rgba(3)]
        );
    }

    #[test]
    fn bad_layouts_are_rejected() {
        let settings = DecodeSettings::default();
        for layout in [
            TileLayout {
                tile_width: 7,
                ..Default::default()
            },
            TileLayout {
                tile_height: 0,
                ..Default::default()
            },
            TileLayout {
                tiles_per_row: 0,
                ..Default::default()
            },
        ] {
            assert!(build_tile_sheet(&[0; 64], &layout, &settings).is_err());
        }
    }

    #[test]
    fn oversized_sheets_are_rejected() {
        let wide = TileLayout {
            tile_width: 1 << 16,
            tile_height: 1,
            tiles_per_row: 1 << 16,
        };
        let data = vec![0; 1 << 15];
        assert!(build_tile_sheet(&data, &wide, &DecodeSettings::default()).is_err());

        let tall = TileLayout {
            tile_width: 2,
            tile_height: 1 << 20,
            tiles_per_row: 1,
        };
        assert!(tall.sheet_size(1 << 13).is_err());
        assert_eq!(tall.sheet_size(3).unwrap(), (2, 3 << 20));
        assert_eq!(TileLayout::default().sheet_size(17).unwrap(), (128, 16));
    }
}
