use std::path::PathBuf;

use anyhow::{ensure, Result};
use clap::Parser;

use cpc_gfx_tools::{
    cli::{self, ProjectArgs},
    common::Rect,
    doors::SPRITE_CELL,
    persist,
    scan::{band_spans, cell_sheet, grid_overlay, vertical_runs, CellRange},
};

/// Scan a sprite sheet region for sprite boundaries and write grid overlays.
#[derive(Parser, Debug)]
struct Args {
    #[command(flatten)]
    project: ProjectArgs,

    /// Sprite sheet to scan (defaults to Content/Spritesheet2.png)
    #[arg(long)]
    spritesheet: Option<PathBuf>,

    /// Region as x,y,width,height (defaults to the door area)
    #[arg(long, value_delimiter = ',', default_values_t = [520, 0, 180, 192])]
    region: Vec<u32>,

    /// Height of each scanned band
    #[arg(long, default_value_t = SPRITE_CELL)]
    band: u32,

    /// Report single-color vertical runs at least this long
    #[arg(long, default_value_t = 12)]
    min_run: u32,

    /// Upscale factor for the grid overlay image
    #[arg(long, default_value_t = 6)]
    scale: u32,

    /// Also write a contact sheet of sprite cells, plus each cell as its own PNG
    #[arg(long)]
    cells: bool,

    /// Cells for --cells as first_col,first_row,cols,rows (defaults to the door area)
    #[arg(long, value_delimiter = ',', default_values_t = [22, 0, 8, 8])]
    cell_range: Vec<u32>,

    /// Directory for the overlay image (defaults to assets/images/door_frames/)
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

pub fn main() -> Result<()> {
    cli::init_logging();
    let args = Args::parse();
    ensure!(args.region.len() == 4, "--region takes x,y,width,height");
    let region = Rect::checked(args.region[0], args.region[1], args.region[2], args.region[3])?;
    let dirs = args.project.dirs()?;
    let spritesheet_path = args
        .spritesheet
        .clone()
        .unwrap_or_else(|| dirs.content().join("Spritesheet2.png"));
    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| dirs.images().join("door_frames"));

    let image = persist::load_png(&spritesheet_path)?;
    println!("Spritesheet size: {}x{}", image.width, image.height);
    println!(
        "Scanning X={}-{}, Y={}-{} in {}px bands",
        region.x,
        region.right(),
        region.y,
        region.bottom(),
        args.band
    );

    for (i, report) in band_spans(&image, region, args.band).iter().enumerate() {
        println!();
        println!(
            "--- Band {} (Y={}-{}) ---",
            i + 1,
            report.band.y,
            report.band.bottom() - 1
        );
        match report.bounds {
            Some(b) => println!(
                "  Overall non-black bounds: X=[{}, {}] Y=[{}, {}] ({}x{})",
                b.x,
                b.right() - 1,
                b.y,
                b.bottom() - 1,
                b.width,
                b.height
            ),
            None => println!("  Empty"),
        }
        for span in &report.spans {
            let b = span.bounds;
            println!(
                "  Sprite span: X=[{}, {}] width={}px, Y=[{}, {}] height={}px, {} pixels",
                b.x,
                b.right() - 1,
                b.width,
                b.y,
                b.bottom() - 1,
                b.height,
                span.pixels
            );
        }
    }

    println!();
    println!("=== Vertical runs of at least {}px ===", args.min_run);
    for run in vertical_runs(&image, region, args.min_run) {
        println!(
            "  X={}: {}px run of {:?} starting at Y={}",
            run.x, run.len, run.color, run.y
        );
    }

    let overlay = grid_overlay(
        &image,
        region,
        args.scale,
        &[(16, [0, 0, 255, 255]), (SPRITE_CELL, [255, 0, 0, 255])],
    )?;
    let overlay_path = output_dir.join(format!("scan_grid_{}x.png", args.scale));
    persist::save_png(&overlay_path, &overlay)?;
    println!();
    println!("Saved grid overlay (red={}px, blue=16px): {}", SPRITE_CELL, overlay_path.display());

    if args.cells {
        ensure!(args.cell_range.len() == 4, "--cell-range takes first_col,first_row,cols,rows");
        let range = CellRange {
            first_col: args.cell_range[0],
            first_row: args.cell_range[1],
            cols: args.cell_range[2],
            rows: args.cell_range[3],
            cell: SPRITE_CELL,
        };
        let contact = cell_sheet(&image, &range, args.scale)?;
        for cell in &contact.cells {
            let path = output_dir.join(format!("cell_r{}_c{}.png", cell.row + 1, cell.col + 1));
            persist::save_png(&path, &cell.image)?;
        }
        let sheet_path = output_dir.join("door_cells.png");
        persist::save_png(&sheet_path, &contact.sheet)?;
        println!("Saved cell sheet: {}", sheet_path.display());
        println!(
            "  Columns {}-{}, rows {}-{} (1-indexed), {}x{} cells scaled {}x",
            range.first_col + 1,
            range.first_col + range.cols,
            range.first_row + 1,
            range.first_row + range.rows,
            SPRITE_CELL,
            SPRITE_CELL,
            args.scale
        );
    }
    Ok(())
}
