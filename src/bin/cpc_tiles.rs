use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use log::warn;

use cpc_gfx_tools::{
    cli::{self, BatchSummary, PaletteArgs, ProjectArgs},
    mode0::DecodeSettings,
    persist,
    tileset::{build_tile_sheet, TileLayout},
};

/// Convert Amstrad CPC character sets into tile contact sheets.
#[derive(Parser, Debug)]
struct Args {
    #[command(flatten)]
    project: ProjectArgs,

    #[command(flatten)]
    palette: PaletteArgs,

    /// Convert a single character set instead of the known set under raw/
    #[arg(long)]
    input: Option<PathBuf>,

    /// Output PNG for --input (defaults to png/<stem>_tiles.png)
    #[arg(long, requires = "input")]
    output: Option<PathBuf>,

    #[arg(long, default_value_t = 8)]
    tile_width: u32,

    #[arg(long, default_value_t = 8)]
    tile_height: u32,

    /// Tiles per row of the contact sheet
    #[arg(long, default_value_t = 16)]
    tiles_per_row: u32,
}

const CHARACTER_SETS: [&str; 3] = ["CONSET1.BIN", "CONSET2.BIN", "CONALP.BIN"];

fn sheet_name(input: &Path) -> String {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    format!("{}_tiles.png", stem)
}

fn convert(input: &Path, output: &Path, layout: &TileLayout, settings: &DecodeSettings) -> Result<usize> {
    let data = persist::read_bytes(input)?;
    let sheet = build_tile_sheet(&data, layout, settings)?;
    println!("Converting {}", input.display());
    println!("  File size: {} bytes", data.len());
    println!("  Tile size: {}x{}", layout.tile_width, layout.tile_height);
    println!("  Bytes per tile: {}", layout.bytes_per_tile());
    println!("  Number of tiles: {}", sheet.tile_count);
    if sheet.trailing_bytes > 0 {
        println!("  Ignored {} trailing bytes (partial tile)", sheet.trailing_bytes);
    }
    if sheet.skipped_pixels > 0 {
        warn!("{} pixels fell outside the sheet", sheet.skipped_pixels);
    }
    if sheet.tile_count == 0 {
        println!("  No complete tiles; nothing written");
        println!();
        return Ok(0);
    }
    println!(
        "  Output dimensions: {}x{} ({} tiles per row)",
        sheet.image.width, sheet.image.height, layout.tiles_per_row
    );
    persist::save_png(output, &sheet.image)?;
    println!("  Saved to: {}", output.display());
    println!();
    Ok(sheet.tile_count)
}

pub fn main() -> Result<()> {
    cli::init_logging();
    let args = Args::parse();
    let settings = args.palette.decode_settings()?;
    let dirs = args.project.dirs()?;
    let layout = TileLayout {
        tile_width: args.tile_width,
        tile_height: args.tile_height,
        tiles_per_row: args.tiles_per_row,
    };

    if let Some(input) = &args.input {
        let output = match &args.output {
            Some(path) => path.clone(),
            None => dirs.png().join(sheet_name(input)),
        };
        convert(input, &output, &layout, &settings)?;
        return Ok(());
    }

    cli::banner("CPC Character Set / Tile Converter");
    let mut summary = BatchSummary::default();
    let mut total_tiles = 0;
    for file_name in CHARACTER_SETS {
        let input = dirs.raw().join(file_name);
        if !summary.check_exists(&input) {
            continue;
        }
        let output = dirs.png().join(sheet_name(&input));
        if let Some(count) = summary.record(&input, convert(&input, &output, &layout, &settings)) {
            total_tiles += count;
        }
    }
    println!("Total tiles: {}", total_tiles);
    summary.report("character sets");
    Ok(())
}
