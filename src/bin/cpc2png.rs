use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use log::info;

use cpc_gfx_tools::{
    cli::{self, BatchSummary, PaletteArgs, ProjectArgs},
    common::PixelCoord,
    mode0::{self, DecodeSettings, HeightSource, ScreenLayout},
    persist,
};

/// Convert Amstrad CPC Mode 0 screen dumps to PNG.
#[derive(Parser, Debug)]
struct Args {
    #[command(flatten)]
    project: ProjectArgs,

    #[command(flatten)]
    palette: PaletteArgs,

    /// Convert a single dump instead of the known set under raw/
    #[arg(long)]
    input: Option<PathBuf>,

    /// Output PNG for --input (defaults to png/<stem>.png)
    #[arg(long, requires = "input")]
    output: Option<PathBuf>,

    /// Image width in pixels; must be even
    #[arg(long, default_value_t = mode0::SCREEN_WIDTH)]
    width: PixelCoord,

    /// Image height in pixels (derived from the file size if omitted)
    #[arg(long)]
    height: Option<PixelCoord>,

    /// Bytes to skip at the start of the file
    #[arg(long, default_value_t = 0)]
    offset: usize,

    /// Height used when the data is shorter than one line
    #[arg(long, default_value_t = mode0::SCREEN_HEIGHT)]
    default_height: PixelCoord,
}

// Dumps from the game disk with the layouts worth trying for each:
// (width, offset, output suffix).
const KNOWN_DUMPS: &[(&str, &[(PixelCoord, usize, &str)])] = &[
    (
        "CONSET1.BIN",
        &[
            (160, 0, ""),
            (160, 128, "_off128"),
            (128, 0, "_w128"),
            (80, 0, "_w80"),
            (256, 0, "_w256"),
        ],
    ),
    (
        "CONSET2.BIN",
        &[(160, 0, ""), (160, 128, "_off128"), (128, 0, "_w128"), (80, 0, "_w80")],
    ),
    ("CONALP.BIN", &[(160, 0, ""), (128, 0, "_w128")]),
    ("TITLEP.BIN", &[(160, 0, ""), (160, 128, "_off128")]),
    ("SPRITES1.BIN", &[(160, 0, ""), (160, 128, "_off128")]),
    ("SPRITES2.BIN", &[(160, 0, "")]),
];

fn convert(input: &Path, output: &Path, layout: &ScreenLayout, settings: &DecodeSettings) -> Result<()> {
    let data = persist::read_bytes(input)?;
    let screen = mode0::decode_screen(&data, layout, settings)?;
    println!("Converting {}", input.display());
    println!(
        "  File size: {} bytes (offset: {}, {} bytes of pixel data)",
        data.len(),
        layout.offset,
        screen.data_len
    );
    println!("  Dimensions: {}x{}", screen.image.width, screen.image.height);
    println!("  Bytes per line: {}", screen.bytes_per_line);
    match screen.height_source {
        HeightSource::Default => println!("  Height: default (data shorter than one line)"),
        HeightSource::FromLength => println!("  Height: derived from file size"),
        HeightSource::Given => {}
    }
    if screen.bytes_decoded < screen.data_len {
        println!("  Ignored {} bytes past the last row", screen.data_len - screen.bytes_decoded);
    }
    if screen.fill_rows() > 0 {
        println!("  Data ran out: {} rows left blank", screen.fill_rows());
    }
    persist::save_png(output, &screen.image)?;
    println!("  Saved to: {}", output.display());
    println!();
    Ok(())
}

fn output_name(input: &str, suffix: &str) -> String {
    let stem = Path::new(input)
        .file_stem()
        .map(|s| s.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    format!("{}{}.png", stem, suffix)
}

pub fn main() -> Result<()> {
    cli::init_logging();
    let args = Args::parse();
    let settings = DecodeSettings {
        default_height: args.default_height,
        ..args.palette.decode_settings()?
    };
    let dirs = args.project.dirs()?;

    if let Some(input) = &args.input {
        let output = match &args.output {
            Some(path) => path.clone(),
            None => dirs.png().join(output_name(&input.to_string_lossy(), "")),
        };
        let layout = ScreenLayout {
            width: args.width,
            height: args.height,
            offset: args.offset,
        };
        return convert(input, &output, &layout, &settings);
    }

    cli::banner("CPC Mode 0 Graphics Converter");
    let raw_dir = dirs.raw();
    let png_dir = dirs.png();
    info!("Reading dumps from {}", raw_dir.display());
    let mut summary = BatchSummary::default();
    for (file_name, layouts) in KNOWN_DUMPS {
        let input = raw_dir.join(file_name);
        if !summary.check_exists(&input) {
            continue;
        }
        for &(width, offset, suffix) in layouts.iter() {
            let layout = ScreenLayout {
                width,
                height: args.height,
                offset,
            };
            let output = png_dir.join(output_name(file_name, suffix));
            summary.record(&input, convert(&input, &output, &layout, &settings));
        }
    }
    summary.report("conversions");
    Ok(())
}
