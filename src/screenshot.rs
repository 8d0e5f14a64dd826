// Room background extraction from WinAPE emulator screenshots.
//
// A standard 1152x816 capture shows the 320x200 CPC screen at 3x scale at (96,123),
// surrounded by the border. The top 144 native rows are the game area, the rest is the HUD.
use anyhow::{bail, Result};
use log::{info, warn};

use crate::{
    collision::{ROOM_HEIGHT, ROOM_WIDTH},
    common::{Image, PixelCoord, Rect},
    crop::{crop, resize_nearest},
    helpers::differs,
};

pub const SCREENSHOT_WIDTH: PixelCoord = 1152;
pub const SCREENSHOT_HEIGHT: PixelCoord = 816;
pub const GAME_AREA: Rect = Rect::new(96, 123, 960, 432);

const NATIVE_SCREEN_HEIGHT: u32 = 200;
const BORDER_SAMPLE: (PixelCoord, PixelCoord) = (5, 5);
const BORDER_TOLERANCE: u8 = 30;

pub const ROOM_BG_PREFIX: &str = "RoomBG_";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CropMethod {
    StandardLayout,
    Detected { content: Rect },
}

#[derive(Debug)]
pub struct RoomBackground {
    pub image: Image,
    pub method: CropMethod,
}

/// Bounding box of every pixel that differs from the border color sampled near the corner.
pub fn detect_content(image: &Image) -> Option<Rect> {
    let border = image.get(BORDER_SAMPLE.0, BORDER_SAMPLE.1)?;
    let is_content = |x, y| {
        image
            .get(x, y)
            .is_some_and(|p| differs(p, border, BORDER_TOLERANCE))
    };
    let row_has_content = |y| (0..image.width).any(|x| is_content(x, y));
    let col_has_content = |x| (0..image.height).any(|y| is_content(x, y));

    let top = (0..image.height).find(|&y| row_has_content(y))?;
    let bottom = (0..image.height).rev().find(|&y| row_has_content(y))? + 1;
    let left = (0..image.width).find(|&x| col_has_content(x))?;
    let right = (0..image.width).rev().find(|&x| col_has_content(x))? + 1;
    Some(Rect::new(left, top, right - left, bottom - top))
}

pub fn crop_game_area(screenshot: &Image) -> Result<RoomBackground> {
    let (game_area, method) =
        if (screenshot.width, screenshot.height) == (SCREENSHOT_WIDTH, SCREENSHOT_HEIGHT) {
            (GAME_AREA, CropMethod::StandardLayout)
        } else {
            warn!(
                "Expected {}x{} screenshot, got {}x{}; detecting content area",
                SCREENSHOT_WIDTH, SCREENSHOT_HEIGHT, screenshot.width, screenshot.height
            );
            let Some(content) = detect_content(screenshot) else {
                bail!("no content found inside the screenshot border");
            };
            info!(
                "Detected content area: ({},{}) to ({},{}) = {}x{}",
                content.x,
                content.y,
                content.right(),
                content.bottom(),
                content.width,
                content.height
            );
            let game_height = content.height * ROOM_HEIGHT / NATIVE_SCREEN_HEIGHT;
            if game_height == 0 {
                bail!("detected content area is too short ({} rows)", content.height);
            }
            (
                Rect::new(content.x, content.y, content.width, game_height),
                CropMethod::Detected { content },
            )
        };

    let area = crop(screenshot, game_area)?;
    Ok(RoomBackground {
        image: resize_nearest(&area, ROOM_WIDTH, ROOM_HEIGHT),
        method,
    })
}

/// Make a room name safe for use in a file name.
pub fn sanitize_name(name: &str) -> String {
    name.chars().filter(|c| !matches!(c, ' ' | '\'' | '.')).collect()
}

pub fn background_file_name(name: &str) -> String {
    format!("{}{}.png", ROOM_BG_PREFIX, name)
}
