// End-to-end runs through the library: raw dumps to PNG, screenshots to collision data.
use std::{fs, path::PathBuf};

use cpc_gfx_tools::{
    collision::{extract_grid, render_overlay, room_id_from_path, GridSettings, OverlayStyle},
    common::{Image, Palette, BLACK},
    crop::{paste, upscale},
    doors::{build_door_sheets, DOOR_FRAMES},
    mode0::{decode_screen, encode_byte, DecodeSettings, HeightSource, ScreenLayout},
    persist,
    screenshot::{background_file_name, crop_game_area, sanitize_name, CropMethod},
    tileset::{build_tile_sheet, TileLayout},
};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("cpc_gfx_tools_{}_{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn screen_dump_converts_to_png() {
    let dir = scratch_dir("screen_dump");
    let raw = dir.join("raw/SCREEN.BIN");
    fs::create_dir_all(raw.parent().unwrap()).unwrap();
    // Two rows of 80 bytes: the first all red/blue pairs, the second all zero.
    let mut data = vec![encode_byte(6, 2); 80];
    data.extend(vec![0; 80]);
    fs::write(&raw, &data).unwrap();

    let bytes = persist::read_bytes(&raw).unwrap();
    let screen = decode_screen(&bytes, &ScreenLayout::default(), &DecodeSettings::default()).unwrap();
    assert_eq!(screen.height_source, HeightSource::FromLength);
    assert_eq!((screen.image.width, screen.image.height), (160, 2));

    let png = dir.join("png/screen.png");
    persist::save_png(&png, &screen.image).unwrap();
    let loaded = persist::load_png(&png).unwrap();
    let palette = Palette::cpc_mode0();
    assert_eq!(loaded.get(0, 0), Some(palette.rgba(6)));
    assert_eq!(loaded.get(1, 0), Some(palette.rgba(2)));
    assert_eq!(loaded.get(159, 1), Some(palette.rgba(0)));
}

#[test]
fn character_set_converts_to_tile_sheet() {
    let dir = scratch_dir("charset");
    let layout = TileLayout::default();
    // Three full tiles and a partial fourth.
    let mut data = vec![];
    for color in [1u8, 2, 3] {
        data.extend(vec![encode_byte(color, color); layout.bytes_per_tile()]);
    }
    data.extend([0xFF; 5]);

    let sheet = build_tile_sheet(&data, &layout, &DecodeSettings::default()).unwrap();
    assert_eq!(sheet.tile_count, 3);
    assert_eq!(sheet.trailing_bytes, 5);

    let png = dir.join("conset1_tiles.png");
    persist::save_png(&png, &sheet.image).unwrap();
    let loaded = persist::load_png(&png).unwrap();
    assert_eq!((loaded.width, loaded.height), (128, 8));
    let palette = Palette::cpc_mode0();
    assert_eq!(loaded.get(16, 7), Some(palette.rgba(3)));
    assert_eq!(loaded.get(24, 0), Some(BLACK));
}

#[test]
fn screenshot_to_collision_data() {
    let dir = scratch_dir("screenshot");
    // Native 320x200 screen: one solid block at cell (2,1), HUD rows below 144 are white.
    let mut native = Image::new(320, 200, [255, 255, 255, 255]);
    native.fill_rect(cpc_gfx_tools::common::Rect::new(0, 0, 320, 144), BLACK);
    native.fill_rect(cpc_gfx_tools::common::Rect::new(16, 8, 8, 8), [0, 200, 0, 255]);
    let mut shot = Image::new(1152, 816, [60, 60, 60, 255]);
    paste(&mut shot, &upscale(&native, 3).unwrap(), 96, 123);
    let shot_path = dir.join("assets/images/sorcery-uk-0001.png");
    persist::save_png(&shot_path, &shot).unwrap();

    let room = crop_game_area(&persist::load_png(&shot_path).unwrap()).unwrap();
    assert_eq!(room.method, CropMethod::StandardLayout);
    let bg_path = dir
        .join("Content")
        .join(background_file_name(&sanitize_name("Wizard's Lair")));
    persist::save_png(&bg_path, &room.image).unwrap();
    assert!(bg_path.ends_with("RoomBG_WizardsLair.png"));

    let background = persist::load_png(&bg_path).unwrap();
    let settings = GridSettings::default();
    let extraction = extract_grid(&background, &settings);
    assert!(extraction.size_mismatch.is_none());
    let grid = extraction.grid;
    assert_eq!(grid.solid_count(), 1);
    assert!(grid.get(2, 1).is_solid());
    assert_eq!(room_id_from_path(&bg_path), "wizardslair");

    let overlay = render_overlay(&background, &grid, &settings, &OverlayStyle::default());
    assert_eq!((overlay.width, overlay.height), (320, 144));
    // Inside the solid cell, away from grid lines, the red tint shows.
    let tinted = overlay.get(19, 11).unwrap();
    assert!(tinted[0] > tinted[2]);
}

#[test]
fn door_sheets_from_spritesheet_file() {
    let dir = scratch_dir("doors");
    let mut sheet = Image::new(640, 240, BLACK);
    for (i, frame) in DOOR_FRAMES.iter().enumerate() {
        // Left column of each frame carries the frame number.
        let marker = [10 * (i as u8 + 1), 0, 0, 255];
        for y in 0..48 {
            sheet.set(frame.x, frame.y + y, marker);
        }
    }
    let path = dir.join("Spritesheet2.png");
    persist::save_png(&path, &sheet).unwrap();

    let sheets = build_door_sheets(&persist::load_png(&path).unwrap()).unwrap();
    assert_eq!((sheets.left.width, sheets.left.height), (192, 48));
    assert_eq!((sheets.right.width, sheets.right.height), (192, 48));
    for i in 0..4u32 {
        let marker = Some([10 * (i as u8 + 1), 0, 0, 255]);
        assert_eq!(sheets.left.get(i * 48, 20), marker);
        assert_eq!(sheets.right.get(i * 48 + 47, 20), marker);
    }
}
