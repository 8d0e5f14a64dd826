use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use cpc_gfx_tools::{
    cli::{self, ProjectArgs},
    persist,
    placeholder::{paint_placeholder_tileset, EMPTY_TILE, ROW_KINDS, TILES_PER_ROW, TILE_COUNT, TILE_SIZE},
};

/// Paint a flat-colored placeholder tileset for level prototyping.
#[derive(Parser, Debug)]
struct Args {
    #[command(flatten)]
    project: ProjectArgs,

    /// Output PNG (defaults to Content/Tiles_Placeholder.png)
    #[arg(long)]
    output: Option<PathBuf>,
}

pub fn main() -> Result<()> {
    cli::init_logging();
    let args = Args::parse();
    let output = match args.output {
        Some(path) => path,
        None => args.project.dirs()?.content().join("Tiles_Placeholder.png"),
    };

    let tileset = paint_placeholder_tileset();
    persist::save_png(&output, &tileset)?;
    println!(
        "Created placeholder tileset: {} ({}x{})",
        output.display(),
        tileset.width,
        tileset.height
    );
    println!("  {} tiles of {}x{} pixels", TILE_COUNT, TILE_SIZE, TILE_SIZE);
    println!("  Tile {} is empty (black, no outline)", EMPTY_TILE);
    for (row, kind) in ROW_KINDS.iter().enumerate() {
        let first = row as u32 * TILES_PER_ROW;
        println!(
            "  Tiles {}-{}: {}",
            first,
            first + TILES_PER_ROW - 1,
            kind.description()
        );
    }
    Ok(())
}
