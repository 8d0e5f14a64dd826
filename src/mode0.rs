// Amstrad CPC Mode 0 bitmap decoding.
//
// Each byte packs two horizontally adjacent 4-bit pixels with the bits interleaved:
//
//   bit:     7  6  5  4  3  2  1  0
//   pixel:   A  B  A  B  A  B  A  B
//
// Pixel A takes bits 7,5,3,1 (most to least significant), pixel B takes 6,4,2,0.
use anyhow::{bail, ensure, Result};
use log::debug;

use crate::common::{ColorIdx, ColorRGBA, Image, Palette, PixelCoord, BLACK};

pub const SCREEN_WIDTH: PixelCoord = 160;
pub const SCREEN_HEIGHT: PixelCoord = 200;

pub fn decode_byte(byte: u8) -> (ColorIdx, ColorIdx) {
    let a = (byte & 0x80) >> 4 | (byte & 0x20) >> 3 | (byte & 0x08) >> 2 | (byte & 0x02) >> 1;
    let b = (byte & 0x40) >> 3 | (byte & 0x10) >> 2 | (byte & 0x04) >> 1 | (byte & 0x01);
    (a, b)
}

pub fn encode_byte(a: ColorIdx, b: ColorIdx) -> u8 {
    (a & 8) << 4 | (a & 4) << 3 | (a & 2) << 2 | (a & 1) << 1 | (b & 8) << 3 | (b & 4) << 2
        | (b & 2) << 1
        | (b & 1)
}

/// Settings shared by every decode: the palette, the canvas fill left behind where
/// the data runs out, and the height used when none can be derived from the data.
#[derive(Clone, Debug)]
pub struct DecodeSettings {
    pub palette: Palette,
    pub fill: ColorRGBA,
    pub default_height: PixelCoord,
}

impl Default for DecodeSettings {
    fn default() -> Self {
        DecodeSettings {
            palette: Palette::cpc_mode0(),
            fill: BLACK,
            default_height: SCREEN_HEIGHT,
        }
    }
}

impl DecodeSettings {
    /// Paint the two pixels packed in `byte` at (x, y) and (x + 1, y).
    /// Returns how many of them landed on the canvas.
    pub fn put_byte(&self, image: &mut Image, x: PixelCoord, y: PixelCoord, byte: u8) -> usize {
        let (a, b) = decode_byte(byte);
        image.set(x, y, self.palette.rgba(a)) as usize
            + image.set(x + 1, y, self.palette.rgba(b)) as usize
    }
}

#[derive(Clone, Debug)]
pub struct ScreenLayout {
    pub width: PixelCoord,
    pub height: Option<PixelCoord>,
    pub offset: usize, // Bytes to skip (e.g. a file header)
}

impl Default for ScreenLayout {
    fn default() -> Self {
        ScreenLayout {
            width: SCREEN_WIDTH,
            height: None,
            offset: 0,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HeightSource {
    Given,
    FromLength,
    Default,
}

#[derive(Debug)]
pub struct DecodedScreen {
    pub image: Image,
    pub data_len: usize, // Bytes available after the offset
    pub bytes_per_line: usize,
    pub bytes_decoded: usize,
    pub height_source: HeightSource,
}

impl DecodedScreen {
    /// Rows that received no data at all and hold only the canvas fill. A partially
    /// decoded last row does not count.
    pub fn fill_rows(&self) -> PixelCoord {
        let touched_rows = self.bytes_decoded.div_ceil(self.bytes_per_line) as PixelCoord;
        self.image.height.saturating_sub(touched_rows)
    }
}

pub fn decode_screen(
    data: &[u8],
    layout: &ScreenLayout,
    settings: &DecodeSettings,
) -> Result<DecodedScreen> {
    ensure!(layout.width > 0, "width must be positive");
    if layout.width % 2 != 0 {
        bail!("width {} is odd; Mode 0 packs two pixels per byte", layout.width);
    }
    ensure!(
        layout.offset <= data.len(),
        "offset {} is beyond the end of the data ({} bytes)",
        layout.offset,
        data.len()
    );

    let data = &data[layout.offset..];
    let bytes_per_line = layout.width as usize / 2;
    let (height, height_source) = match layout.height {
        Some(h) => (h, HeightSource::Given),
        None => match (data.len() / bytes_per_line) as PixelCoord {
            0 => (settings.default_height, HeightSource::Default),
            h => (h, HeightSource::FromLength),
        },
    };

    let mut image = Image::new(layout.width, height, settings.fill);
    let mut bytes = data.iter();
    let mut bytes_decoded = 0;
    'rows: for y in 0..height {
        for x in (0..layout.width).step_by(2) {
            let Some(&byte) = bytes.next() else {
                debug!("data exhausted at row {y}");
                break 'rows;
            };
            settings.put_byte(&mut image, x, y, byte);
            bytes_decoded += 1;
        }
    }

    Ok(DecodedScreen {
        image,
        data_len: data.len(),
        bytes_per_line,
        bytes_decoded,
        height_source,
    })
}
