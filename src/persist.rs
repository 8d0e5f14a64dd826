use std::{
    fs,
    io::BufWriter,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use json_pretty_compact::PrettyCompactFormatter;
use log::{debug, info};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Serializer;

use crate::common::{ColorRGBA, Image, Palette};

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }
    Ok(())
}

pub fn save_json<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    info!("Saving {}", path.display());
    let formatter = PrettyCompactFormatter::new();
    let mut data_bytes = vec![];
    let mut ser = Serializer::with_formatter(&mut data_bytes, formatter);
    data.serialize(&mut ser)?;
    ensure_parent_dir(path)?;
    fs::write(path, &data_bytes).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    info!("Loading {}", path.display());
    let data_bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let data: T = serde_json::from_slice(&data_bytes)
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(data)
}

pub fn load_palette(path: &Path) -> Result<Palette> {
    load_json(path)
}

pub fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("reading {}", path.display()))
}

pub fn load_png(path: &Path) -> Result<Image> {
    debug!("Loading {}", path.display());
    let file = fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut decoder = png::Decoder::new(file);
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder
        .read_info()
        .with_context(|| format!("decoding {}", path.display()))?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let frame = reader
        .next_frame(&mut buf)
        .with_context(|| format!("decoding {}", path.display()))?;
    let buf = &buf[..frame.buffer_size()];

    let pixels: Vec<ColorRGBA> = match frame.color_type {
        png::ColorType::Rgba => buf.chunks_exact(4).map(|p| [p[0], p[1], p[2], p[3]]).collect(),
        png::ColorType::Rgb => buf.chunks_exact(3).map(|p| [p[0], p[1], p[2], 255]).collect(),
        png::ColorType::GrayscaleAlpha => {
            buf.chunks_exact(2).map(|p| [p[0], p[0], p[0], p[1]]).collect()
        }
        png::ColorType::Grayscale => buf.iter().map(|&v| [v, v, v, 255]).collect(),
        png::ColorType::Indexed => bail!("{}: palette was not expanded", path.display()),
    };
    Image::from_pixels(frame.width, frame.height, pixels)
}

/// Write an image as PNG: RGB if fully opaque, RGBA otherwise.
pub fn save_png(path: &Path, image: &Image) -> Result<()> {
    if image.width == 0 || image.height == 0 {
        bail!("refusing to write empty {}x{} image", image.width, image.height);
    }
    ensure_parent_dir(path)?;
    let file = fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), image.width, image.height);
    encoder.set_depth(png::BitDepth::Eight);
    let data: Vec<u8> = if image.is_opaque() {
        encoder.set_color(png::ColorType::Rgb);
        image.pixels.iter().flat_map(|p| [p[0], p[1], p[2]]).collect()
    } else {
        encoder.set_color(png::ColorType::Rgba);
        image.pixels.iter().flatten().copied().collect()
    };
    let mut writer = encoder
        .write_header()
        .with_context(|| format!("writing {}", path.display()))?;
    writer
        .write_image_data(&data)
        .with_context(|| format!("writing {}", path.display()))?;
    writer.finish()?;
    Ok(())
}

/// Files matching `pattern` inside `dir`, sorted by path.
pub fn list_files(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let pattern = format!("{}/{}", dir.display(), pattern);
    let mut paths = vec![];
    for entry in glob::glob(&pattern)? {
        paths.push(entry?);
    }
    paths.sort();
    Ok(paths)
}
