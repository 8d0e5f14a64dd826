// Door animation sheets cut from the game's sprite sheet.
//
// Each frame is a 48x48 block (2x2 cells of 24x24). The right-hand door is the left-hand
// door with every frame mirrored in place, so frame order is the same on both sheets.
use anyhow::Result;

use crate::{
    common::{Image, PixelCoord, Rect, TRANSPARENT},
    crop::{strip, CropSpec},
};

pub const SPRITE_CELL: PixelCoord = 24;
pub const FRAME_SIZE: PixelCoord = 48;

pub struct DoorFrame {
    pub name: &'static str,
    pub x: PixelCoord,
    pub y: PixelCoord,
}

impl DoorFrame {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, FRAME_SIZE, FRAME_SIZE)
    }
}

// Closed to fully open.
pub const DOOR_FRAMES: [DoorFrame; 4] = [
    DoorFrame {
        name: "closed",
        x: 576,
        y: 48,
    },
    DoorFrame {
        name: "opening1",
        x: 576,
        y: 0,
    },
    DoorFrame {
        name: "opening2",
        x: 528,
        y: 144,
    },
    DoorFrame {
        name: "open",
        x: 528,
        y: 96,
    },
];

pub struct DoorSheets {
    pub left: Image,
    pub right: Image,
}

pub fn extract_frames(spritesheet: &Image, mirror: bool, scale: u32) -> Result<Vec<Image>> {
    DOOR_FRAMES
        .iter()
        .map(|frame| {
            let mut spec = CropSpec::new(frame.rect()).scaled(scale);
            spec.mirror = mirror;
            spec.apply(spritesheet)
        })
        .collect()
}

pub fn build_door_sheets(spritesheet: &Image) -> Result<DoorSheets> {
    Ok(DoorSheets {
        left: strip(&extract_frames(spritesheet, false, 1)?, TRANSPARENT),
        right: strip(&extract_frames(spritesheet, true, 1)?, TRANSPARENT),
    })
}
