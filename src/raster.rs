//! Pixel helpers shared by the augmentation transforms and the preprocessing
//! step.
//!
//! Transforms normalize their input to a single-channel or three-channel
//! 8-bit image. [`Raster`] is the interleaved form of that image for the
//! per-value transforms; filtering and rotation go through `imageproc`.

use image::{DynamicImage, GrayImage, Pixel, RgbImage, imageops};
use imageproc::definitions::Image;
use imageproc::filter::Kernel;
use imageproc::geometric_transformations::{Interpolation, rotate};

use crate::error::{Error, Result};

/// Interleaved 8-bit pixel buffer with one or three channels
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Raster {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    pub data: Vec<u8>,
}

impl Raster {
    /// Grayscale images keep a single channel, everything else becomes RGB
    pub fn from_image(img: &DynamicImage) -> Result<Self> {
        ensure_valid(img)?;
        let width = img.width() as usize;
        let height = img.height() as usize;
        let (channels, data) = match img {
            DynamicImage::ImageLuma8(gray) => (1, gray.as_raw().clone()),
            other => (3, other.to_rgb8().into_raw()),
        };
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    pub fn into_image(self) -> Result<DynamicImage> {
        let (w, h) = (self.width as u32, self.height as u32);
        let image = match self.channels {
            1 => GrayImage::from_raw(w, h, self.data).map(DynamicImage::ImageLuma8),
            3 => RgbImage::from_raw(w, h, self.data).map(DynamicImage::ImageRgb8),
            n => {
                return Err(Error::InvalidImage(format!(
                    "unsupported channel count {}",
                    n
                )));
            }
        };
        image.ok_or_else(|| Error::InvalidImage("pixel buffer does not match dimensions".into()))
    }

    pub fn with_data(&self, data: Vec<u8>) -> Self {
        Self {
            width: self.width,
            height: self.height,
            channels: self.channels,
            data,
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> &[u8] {
        let start = (y * self.width + x) * self.channels;
        &self.data[start..start + self.channels]
    }

    pub fn pixel_mut(&mut self, x: usize, y: usize) -> &mut [u8] {
        let start = (y * self.width + x) * self.channels;
        &mut self.data[start..start + self.channels]
    }
}

/// Reject images with no pixels
pub(crate) fn ensure_valid(img: &DynamicImage) -> Result<()> {
    if img.width() == 0 || img.height() == 0 {
        return Err(Error::InvalidImage(format!(
            "image has zero size ({}x{})",
            img.width(),
            img.height()
        )));
    }
    Ok(())
}

/// Same color normalization as [`Raster::from_image`], kept as a `DynamicImage`
pub(crate) fn normalize(img: &DynamicImage) -> Result<DynamicImage> {
    ensure_valid(img)?;
    Ok(match img {
        DynamicImage::ImageLuma8(_) => img.clone(),
        other => DynamicImage::ImageRgb8(other.to_rgb8()),
    })
}

pub(crate) fn saturate(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Correlate with a `kw`×`kh` kernel anchored at `(kw/2, kh/2)`.
///
/// Borders repeat the nearest edge pixel and results are rounded and
/// saturated back to 8 bits.
pub(crate) fn convolve<P>(img: &Image<P>, kernel: &[f32], kw: u32, kh: u32) -> Image<P>
where
    P: Pixel<Subpixel = u8>,
{
    Kernel::new(kernel, kw, kh).filter(img, |channel: &mut u8, acc: f32| *channel = saturate(acc))
}

/// Counter-clockwise rotation by `degrees` about the pixel-grid center, same canvas.
///
/// Half and quarter turns that map the grid onto itself are exact; other
/// angles are sampled bilinearly and uncovered pixels are set to `fill`.
pub(crate) fn rotate_centered<P>(img: &Image<P>, degrees: f32, fill: P) -> Image<P>
where
    P: Pixel<Subpixel = f32> + Send + Sync + 'static,
{
    let (w, h) = img.dimensions();
    let turn = degrees.rem_euclid(360.0);
    if turn == 0.0 {
        return img.clone();
    }
    if turn == 180.0 {
        return imageops::rotate180(img);
    }
    // imageops quarter turns are clockwise and swap the sides
    if w == h && turn == 90.0 {
        return imageops::rotate270(img);
    }
    if w == h && turn == 270.0 {
        return imageops::rotate90(img);
    }

    let center = ((w - 1) as f32 / 2.0, (h - 1) as f32 / 2.0);
    // imageproc turns clockwise for positive angles in image coordinates
    rotate(img, center, -degrees.to_radians(), Interpolation::Bilinear, fill)
}

/// Grow `src` to `width`×`height` by repeating its edge pixels.
///
/// `left` and `top` give the offset of the source inside the new canvas.
pub(crate) fn pad_replicate(src: &Raster, width: usize, height: usize, left: usize, top: usize) -> Raster {
    let mut out = Raster {
        width,
        height,
        channels: src.channels,
        data: vec![0u8; width * height * src.channels],
    };
    for y in 0..height {
        let sy = y.saturating_sub(top).min(src.height - 1);
        for x in 0..width {
            let sx = x.saturating_sub(left).min(src.width - 1);
            out.pixel_mut(x, y).copy_from_slice(src.pixel(sx, sy));
        }
    }
    out
}
