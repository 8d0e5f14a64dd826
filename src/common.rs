use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

pub type ColorValue = u8; // Color channel value (0-255)
pub type ColorIdx = u8; // Index into 16-color palette (0-15)
pub type PixelCoord = u32;
pub type ColorRGB = [ColorValue; 3];
pub type ColorRGBA = [ColorValue; 4];

pub const BLACK: ColorRGBA = [0, 0, 0, 255];
pub const TRANSPARENT: ColorRGBA = [0, 0, 0, 0];

pub const PALETTE_SIZE: usize = 16;

// Amstrad CPC hardware colors as captured by the emulator, in firmware order.
const CPC_COLORS: [ColorRGB; PALETTE_SIZE] = [
    [0, 0, 0],       // Black
    [0, 0, 128],     // Blue
    [0, 0, 255],     // Bright Blue
    [128, 0, 0],     // Red
    [128, 0, 128],   // Magenta
    [128, 0, 255],   // Mauve
    [255, 0, 0],     // Bright Red
    [255, 0, 128],   // Purple
    [255, 0, 255],   // Bright Magenta
    [0, 128, 0],     // Green
    [0, 128, 128],   // Cyan
    [0, 128, 255],   // Sky Blue
    [128, 128, 0],   // Yellow
    [128, 128, 128], // White (gray)
    [128, 128, 255], // Pastel Blue
    [255, 128, 0],   // Orange
];

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    pub name: String,
    pub colors: [ColorRGB; PALETTE_SIZE],
}

impl Palette {
    pub fn cpc_mode0() -> Self {
        Palette {
            name: "CPC Mode 0".to_string(),
            colors: CPC_COLORS,
        }
    }

    /// Look up a color, wrapping indices outside 0-15 back into range.
    pub fn color(&self, idx: ColorIdx) -> ColorRGB {
        self.colors[idx as usize % PALETTE_SIZE]
    }

    pub fn rgba(&self, idx: ColorIdx) -> ColorRGBA {
        let [r, g, b] = self.color(idx);
        [r, g, b, 255]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::cpc_mode0()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: PixelCoord,
    pub y: PixelCoord,
    pub width: PixelCoord,
    pub height: PixelCoord,
}

impl Rect {
    pub const fn new(x: PixelCoord, y: PixelCoord, width: PixelCoord, height: PixelCoord) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Like `new`, but rejects rectangles whose far edge does not fit in a `PixelCoord`.
    pub fn checked(x: PixelCoord, y: PixelCoord, width: PixelCoord, height: PixelCoord) -> Result<Self> {
        ensure!(
            x.checked_add(width).is_some() && y.checked_add(height).is_some(),
            "rectangle ({},{}) {}x{} extends past the coordinate range",
            x,
            y,
            width,
            height
        );
        Ok(Rect::new(x, y, width, height))
    }

    // Edges saturate, so a rectangle running off the coordinate range is clipped at u32::MAX.
    pub fn right(&self) -> PixelCoord {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> PixelCoord {
        self.y.saturating_add(self.height)
    }
}

/// An 8-bit RGBA raster, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    pub width: PixelCoord,
    pub height: PixelCoord,
    pub pixels: Vec<ColorRGBA>,
}

impl Image {
    pub fn new(width: PixelCoord, height: PixelCoord, fill: ColorRGBA) -> Self {
        Image {
            width,
            height,
            pixels: vec![fill; width as usize * height as usize],
        }
    }

    pub fn from_pixels(width: PixelCoord, height: PixelCoord, pixels: Vec<ColorRGBA>) -> Result<Self> {
        ensure!(
            pixels.len() == width as usize * height as usize,
            "pixel count {} does not match {}x{}",
            pixels.len(),
            width,
            height
        );
        Ok(Image {
            width,
            height,
            pixels,
        })
    }

    fn index(&self, x: PixelCoord, y: PixelCoord) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    pub fn get(&self, x: PixelCoord, y: PixelCoord) -> Option<ColorRGBA> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Write a pixel. Writes outside the canvas are dropped; returns whether it landed.
    pub fn set(&mut self, x: PixelCoord, y: PixelCoord, color: ColorRGBA) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.pixels[i] = color;
                true
            }
            None => false,
        }
    }

    pub fn is_opaque(&self) -> bool {
        self.pixels.iter().all(|p| p[3] == 255)
    }

    /// Draw a 1-pixel frame along the inside edge of `rect`, clipped to the canvas.
    pub fn outline_rect(&mut self, rect: Rect, color: ColorRGBA) {
        if rect.width == 0 || rect.height == 0 {
            return;
        }
        let (right, bottom) = (rect.right() - 1, rect.bottom() - 1);
        for x in rect.x..=right {
            self.set(x, rect.y, color);
            self.set(x, bottom, color);
        }
        for y in rect.y..=bottom {
            self.set(rect.x, y, color);
            self.set(right, y, color);
        }
    }

    pub fn fill_rect(&mut self, rect: Rect, color: ColorRGBA) {
        for y in rect.y..rect.bottom().min(self.height) {
            for x in rect.x..rect.right().min(self.width) {
                self.set(x, y, color);
            }
        }
    }
}
