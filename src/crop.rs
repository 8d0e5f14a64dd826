// Rectangle extraction and pixel-art friendly transforms.
use anyhow::{bail, ensure, Result};
use log::warn;

use crate::common::{ColorRGBA, Image, PixelCoord, Rect, TRANSPARENT};

/// Copy `rect` out of `image`. Parts of the rectangle outside the source come out transparent.
pub fn crop(image: &Image, rect: Rect) -> Result<Image> {
    ensure!(
        rect.width > 0 && rect.height > 0,
        "crop rectangle {}x{} has no area",
        rect.width,
        rect.height
    );
    if rect.right() > image.width || rect.bottom() > image.height {
        warn!(
            "crop ({},{})-({},{}) extends past the {}x{} source",
            rect.x,
            rect.y,
            rect.right(),
            rect.bottom(),
            image.width,
            image.height
        );
    }
    let mut out = Image::new(rect.width, rect.height, TRANSPARENT);
    for y in 0..rect.height {
        for x in 0..rect.width {
            let src = rect.x.checked_add(x).zip(rect.y.checked_add(y));
            if let Some(p) = src.and_then(|(sx, sy)| image.get(sx, sy)) {
                out.set(x, y, p);
            }
        }
    }
    Ok(out)
}

pub fn mirror_horizontal(image: &Image) -> Image {
    let pixels = image
        .pixels
        .chunks_exact(image.width.max(1) as usize)
        .flat_map(|row| row.iter().rev().copied())
        .collect();
    Image {
        width: image.width,
        height: image.height,
        pixels,
    }
}

/// Nearest-neighbour resize sampling the source pixel under each target pixel's center.
pub fn resize_nearest(image: &Image, width: PixelCoord, height: PixelCoord) -> Image {
    let mut out = Image::new(width, height, TRANSPARENT);
    if image.width == 0 || image.height == 0 {
        return out;
    }
    for y in 0..height {
        let sy = ((2 * y as u64 + 1) * image.height as u64 / (2 * height as u64)) as PixelCoord;
        for x in 0..width {
            let sx = ((2 * x as u64 + 1) * image.width as u64 / (2 * width as u64)) as PixelCoord;
            if let Some(p) = image.get(sx, sy) {
                out.set(x, y, p);
            }
        }
    }
    out
}

/// Blow up each pixel into a `factor` x `factor` block.
pub fn upscale(image: &Image, factor: u32) -> Result<Image> {
    ensure!(factor > 0, "scale factor must be positive");
    let (Some(width), Some(height)) =
        (image.width.checked_mul(factor), image.height.checked_mul(factor))
    else {
        bail!("{}x{} scaled by {} is too large", image.width, image.height, factor);
    };
    Ok(resize_nearest(image, width, height))
}

/// Copy `src` onto `dst` with its top-left corner at (x, y), replacing pixels. Clipped to `dst`.
pub fn paste(dst: &mut Image, src: &Image, x: PixelCoord, y: PixelCoord) {
    for sy in 0..src.height {
        for sx in 0..src.width {
            let (Some(dx), Some(dy)) = (x.checked_add(sx), y.checked_add(sy)) else {
                continue;
            };
            if let Some(p) = src.get(sx, sy) {
                dst.set(dx, dy, p);
            }
        }
    }
}

/// Lay equally sized frames out left to right.
pub fn strip(frames: &[Image], fill: ColorRGBA) -> Image {
    let width: PixelCoord = frames.iter().map(|f| f.width).sum();
    let height = frames.iter().map(|f| f.height).max().unwrap_or(0);
    let mut out = Image::new(width, height, fill);
    let mut x = 0;
    for frame in frames {
        paste(&mut out, frame, x, 0);
        x += frame.width;
    }
    out
}

#[derive(Clone, Debug)]
pub struct CropSpec {
    pub rect: Rect,
    pub mirror: bool,
    pub scale: u32,
}

impl CropSpec {
    pub fn new(rect: Rect) -> Self {
        CropSpec {
            rect,
            mirror: false,
            scale: 1,
        }
    }

    pub fn mirrored(mut self) -> Self {
        self.mirror = true;
        self
    }

    pub fn scaled(mut self, scale: u32) -> Self {
        self.scale = scale;
        self
    }

    pub fn apply(&self, image: &Image) -> Result<Image> {
        let mut out = crop(image, self.rect)?;
        if self.mirror {
            out = mirror_horizontal(&out);
        }
        if self.scale != 1 {
            out = upscale(&out, self.scale)?;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: PixelCoord, height: PixelCoord) -> Image {
        let pixels = (0..height)
            .flat_map(|y| (0..width).map(move |x| [x as u8, y as u8, 7, 255]))
            .collect();
        Image::from_pixels(width, height, pixels).unwrap()
    }

    #[test]
    fn crop_copies_the_rectangle() {
        let img = gradient(10, 6);
        let out = crop(&img, Rect::new(3, 2, 4, 2)).unwrap();
        assert_eq!((out.width, out.height), (4, 2));
        assert_eq!(out.get(0, 0), Some([3, 2, 7, 255]));
        assert_eq!(out.get(3, 1), Some([6, 3, 7, 255]));
    }

    #[test]
    fn crop_past_the_edge_is_transparent() {
        let img = gradient(4, 4);
        let out = crop(&img, Rect::new(2, 2, 4, 4)).unwrap();
        assert_eq!(out.get(1, 1), Some([3, 3, 7, 255]));
        assert_eq!(out.get(2, 2), Some(TRANSPARENT));
        assert!(crop(&img, Rect::new(0, 0, 0, 3)).is_err());
    }

    #[test]
    fn mirroring_twice_is_identity() {
        let img = gradient(9, 5);
        let rect = Rect::new(1, 1, 5, 3);
        let once = CropSpec::new(rect).mirrored().apply(&img).unwrap();
        assert_eq!(once.get(0, 0), Some([5, 1, 7, 255]));
        assert_eq!(mirror_horizontal(&once), crop(&img, rect).unwrap());
    }

    #[test]
    fn upscale_replicates_pixels() {
        let img = gradient(2, 2);
        let big = upscale(&img, 3).unwrap();
        assert_eq!((big.width, big.height), (6, 6));
        assert_eq!(big.get(2, 2), Some([0, 0, 7, 255]));
        assert_eq!(big.get(3, 2), Some([1, 0, 7, 255]));
        assert_eq!(big.get(5, 5), Some([1, 1, 7, 255]));
        assert!(upscale(&img, 0).is_err());
        assert!(upscale(&img, u32::MAX).is_err());
    }

    #[test]
    fn crop_and_paste_near_the_coordinate_limit() {
        let img = gradient(4, 4);
        let out = crop(&img, Rect::new(u32::MAX - 1, 0, 4, 2)).unwrap();
        assert!(out.pixels.iter().all(|&p| p == TRANSPARENT));

        let mut dst = Image::new(2, 2, TRANSPARENT);
        paste(&mut dst, &img, u32::MAX - 1, 0);
        assert!(dst.pixels.iter().all(|&p| p == TRANSPARENT));
    }

    #[test]
    fn downscale_by_three_samples_block_centers() {
        let img = gradient(9, 6);
        let small = resize_nearest(&img, 3, 2);
        assert_eq!(small.get(0, 0), Some([1, 1, 7, 255]));
        assert_eq!(small.get(1, 1), Some([4, 4, 7, 255]));
        assert_eq!(small.get(2, 0), Some([7, 1, 7, 255]));
    }

    #[test]
    fn strip_places_frames_side_by_side() {
        let a = Image::new(2, 2, [1, 0, 0, 255]);
        let b = Image::new(2, 2, [2, 0, 0, 255]);
        let out = strip(&[a, b], TRANSPARENT);
        assert_eq!((out.width, out.height), (4, 2));
        assert_eq!(out.get(1, 1), Some([1, 0, 0, 255]));
        assert_eq!(out.get(2, 0), Some([2, 0, 0, 255]));
    }
}
