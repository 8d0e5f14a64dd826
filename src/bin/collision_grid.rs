use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use log::warn;

use cpc_gfx_tools::{
    cli::{self, BatchSummary, ProjectArgs},
    collision::{
        extract_grid, render_overlay, room_id_from_path, CollisionGrid, CollisionRecord,
        GridSettings, OverlayStyle, DEFAULT_THRESHOLD,
    },
    persist,
};

/// Generate collision grids from 320x144 room background images.
#[derive(Parser, Debug)]
struct Args {
    #[command(flatten)]
    project: ProjectArgs,

    /// Single room background image to process
    #[arg(long, conflicts_with = "all")]
    input: Option<PathBuf>,

    /// Process every RoomBG_*.png in Content/
    #[arg(long)]
    all: bool,

    /// Output directory for collision data (defaults to assets/data/)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Pixels with every channel below this count as empty
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: u8,

    /// Room id for --input (defaults to the file name without RoomBG_, lower-cased)
    #[arg(long, requires = "input")]
    room_id: Option<String>,

    /// Opacity of the grid lines in the debug overlay (0 disables them)
    #[arg(long, default_value_t = 40)]
    grid_alpha: u8,
}

fn print_stats(grid: &CollisionGrid) {
    let total = grid.cell_count();
    let solid = grid.solid_count();
    let empty = total - solid;
    let pct = |n: usize| 100.0 * n as f64 / total as f64;
    println!("  Grid: {}x{} = {} cells", grid.cols, grid.rows, total);
    println!("  Solid: {} ({:.1}%)", solid, pct(solid));
    println!("  Empty: {} ({:.1}%)", empty, pct(empty));
    println!("  Collision map:");
    for line in grid.ascii().lines() {
        println!("  {}", line);
    }
}

fn process_room(
    image_path: &Path,
    output_dir: &Path,
    room_id: Option<&str>,
    settings: &GridSettings,
    style: &OverlayStyle,
) -> Result<()> {
    let room_id = match room_id {
        Some(id) => id.to_string(),
        None => room_id_from_path(image_path),
    };
    let name = image_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    println!();
    println!("Processing: {} (room: {})", name, room_id);

    let background = persist::load_png(image_path)?;
    let extraction = extract_grid(&background, settings);
    if let Some(mismatch) = extraction.size_mismatch {
        warn!(
            "{}: expected {}x{}, got {}x{}",
            name, mismatch.expected.0, mismatch.expected.1, mismatch.actual.0, mismatch.actual.1
        );
    }
    let grid = extraction.grid;
    print_stats(&grid);

    let json_path = output_dir.join(format!("collision_{}.json", room_id));
    persist::save_json(&json_path, &CollisionRecord::new(&room_id, &grid, settings.cell_size))?;
    println!("  JSON: {}", json_path.display());

    let debug_path = output_dir.join(format!("collision_{}_debug.png", room_id));
    persist::save_png(&debug_path, &render_overlay(&background, &grid, settings, style))?;
    println!("  Debug: {}", debug_path.display());
    Ok(())
}

pub fn main() -> Result<()> {
    cli::init_logging();
    let args = Args::parse();
    let dirs = args.project.dirs()?;
    let output_dir = args.output_dir.clone().unwrap_or_else(|| dirs.data());
    let settings = GridSettings {
        threshold: args.threshold,
        ..Default::default()
    };
    let style = OverlayStyle {
        grid_line: [255, 255, 255, args.grid_alpha],
        ..Default::default()
    };

    let backgrounds = if let Some(input) = &args.input {
        vec![input.clone()]
    } else if args.all {
        let content_dir = dirs.content();
        let found = persist::list_files(&content_dir, "RoomBG_*.png")?;
        if found.is_empty() {
            println!("No RoomBG_*.png files found in {}", content_dir.display());
            return Ok(());
        }
        println!("Found {} room backgrounds", found.len());
        found
    } else {
        println!("Use --all to process all room backgrounds, or --input for a single file.");
        return Ok(());
    };

    let mut summary = BatchSummary::default();
    for path in &backgrounds {
        if !summary.check_exists(path) {
            continue;
        }
        let result = process_room(path, &output_dir, args.room_id.as_deref(), &settings, &style);
        summary.record(path, result);
    }
    println!();
    summary.report("rooms");
    Ok(())
}
