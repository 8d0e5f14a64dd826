use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;

use cpc_gfx_tools::{
    cli::{self, BatchSummary, ProjectArgs},
    persist,
    screenshot::{background_file_name, crop_game_area, sanitize_name, CropMethod},
};

/// Crop 320x144 room backgrounds out of WinAPE emulator screenshots.
#[derive(Parser, Debug)]
struct Args {
    #[command(flatten)]
    project: ProjectArgs,

    /// Directory containing screenshots (defaults to assets/images/)
    #[arg(long)]
    input_dir: Option<PathBuf>,

    /// Output directory for cropped backgrounds (defaults to Content/)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Process a single screenshot file
    #[arg(long)]
    file: Option<PathBuf>,

    /// Room name for --file
    #[arg(long, requires = "file")]
    name: Option<String>,
}

const SCREENSHOT_PATTERN: &str = "sorcery-uk-*.png";

fn process_screenshot(path: &Path, output_dir: &Path, room_name: Option<&str>) -> Result<PathBuf> {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    println!("Processing: {}", stem);

    let screenshot = persist::load_png(path)?;
    let room = crop_game_area(&screenshot)?;
    if let CropMethod::Detected { content } = room.method {
        println!(
            "  Content area detected at ({},{}) {}x{}",
            content.x, content.y, content.width, content.height
        );
    }

    let name = match room_name {
        Some(name) => sanitize_name(name),
        None => stem,
    };
    let output = output_dir.join(background_file_name(&name));
    persist::save_png(&output, &room.image)?;
    println!(
        "  Saved: {} ({}x{})",
        output.display(),
        room.image.width,
        room.image.height
    );
    Ok(output)
}

pub fn main() -> Result<()> {
    cli::init_logging();
    let args = Args::parse();
    let dirs = args.project.dirs()?;
    let input_dir = args.input_dir.clone().unwrap_or_else(|| dirs.images());
    let output_dir = args.output_dir.clone().unwrap_or_else(|| dirs.content());

    if let Some(file) = &args.file {
        process_screenshot(file, &output_dir, args.name.as_deref())?;
        return Ok(());
    }

    let screenshots = persist::list_files(&input_dir, SCREENSHOT_PATTERN)?;
    if screenshots.is_empty() {
        println!("No screenshots found in {}", input_dir.display());
        println!("Looking for files matching: {}", SCREENSHOT_PATTERN);
        return Ok(());
    }
    println!("Found {} screenshots in {}", screenshots.len(), input_dir.display());
    println!("Output directory: {}", output_dir.display());
    println!();

    let mut summary = BatchSummary::default();
    for path in &screenshots {
        summary.record(path, process_screenshot(path, &output_dir, None));
    }
    println!();
    summary.report("screenshots");
    println!("NOTE: Rename output files to RoomBG_<RoomName>.png for the content pipeline.");
    Ok(())
}
