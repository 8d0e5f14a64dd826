use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use cpc_gfx_tools::{
    cli::{self, ProjectArgs},
    doors::{build_door_sheets, extract_frames, DOOR_FRAMES},
    persist,
};

/// Build left and right door animation sheets from the sprite sheet.
#[derive(Parser, Debug)]
struct Args {
    #[command(flatten)]
    project: ProjectArgs,

    /// Sprite sheet to cut frames from (defaults to Content/Spritesheet2.png)
    #[arg(long)]
    spritesheet: Option<PathBuf>,

    /// Output directory (defaults to Content/)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Also write each left door frame upscaled by this factor for inspection
    #[arg(long)]
    inspect: Option<u32>,
}

pub fn main() -> Result<()> {
    cli::init_logging();
    let args = Args::parse();
    let dirs = args.project.dirs()?;
    let spritesheet_path = args
        .spritesheet
        .clone()
        .unwrap_or_else(|| dirs.content().join("Spritesheet2.png"));
    let output_dir = args.output_dir.clone().unwrap_or_else(|| dirs.content());

    let spritesheet = persist::load_png(&spritesheet_path)?;
    println!(
        "Sprite sheet: {} ({}x{})",
        spritesheet_path.display(),
        spritesheet.width,
        spritesheet.height
    );
    let sheets = build_door_sheets(&spritesheet)?;

    let left_path = output_dir.join("LeftDoorFrames.png");
    persist::save_png(&left_path, &sheets.left)?;
    println!(
        "Left door spritesheet: {} ({}x{})",
        left_path.display(),
        sheets.left.width,
        sheets.left.height
    );

    let right_path = output_dir.join("RightDoorFrames.png");
    persist::save_png(&right_path, &sheets.right)?;
    println!(
        "Right door spritesheet: {} ({}x{})",
        right_path.display(),
        sheets.right.width,
        sheets.right.height
    );

    if let Some(scale) = args.inspect {
        let inspect_dir = dirs.images().join("door_frames");
        let frames = extract_frames(&spritesheet, false, scale)?;
        for (i, (frame, image)) in DOOR_FRAMES.iter().zip(&frames).enumerate() {
            let path = inspect_dir.join(format!("frame{}_{}_{}x.png", i, frame.name, scale));
            persist::save_png(&path, image)?;
            println!("  Frame {} ({}) from ({},{}): {}", i, frame.name, frame.x, frame.y, path.display());
        }
    }
    Ok(())
}
