use image::imageops::FilterType;
use image::{DynamicImage, ImageBuffer, Luma, Rgb};
use imageproc::map::map_subpixels;
use rand::{Rng, RngCore};
use rand_distr::{Distribution, Normal};

use crate::augment::Transform;
use crate::error::{Error, Result};
use crate::raster::{self, Raster};

pub const MOTION_BLUR: &str = "motion_blur";
pub const GAUSSIAN_NOISE: &str = "gaussian_noise";
pub const SALT_PEPPER_NOISE: &str = "salt_pepper_noise";
pub const CONTRAST: &str = "contrast";
pub const SCALE: &str = "scale";
pub const ROTATE: &str = "rotate";
pub const FLIP: &str = "flip";

/// Directional blur simulating camera shake
#[derive(Debug, Clone)]
pub struct MotionBlur {
    /// Side length of the square kernel
    pub size: usize,
    /// Direction of the shake in degrees
    pub angle: f32,
}

impl Default for MotionBlur {
    fn default() -> Self {
        Self {
            size: 30,
            angle: 45.0,
        }
    }
}

impl MotionBlur {
    /// Line kernel through the center row, rotated by `angle` and divided by `size`
    pub fn kernel(&self) -> Result<Vec<f32>> {
        let k = self.size;
        if k == 0 {
            return Err(Error::InvalidParameter("motion blur size must be positive".into()));
        }
        let side = k as u32;
        let line = ImageBuffer::from_fn(side, side, |_, y| {
            Luma([if y == side / 2 { 1.0f32 } else { 0.0 }])
        });

        let rotated = raster::rotate_centered(&line, self.angle, Luma([0.0]));
        Ok(rotated.into_raw().into_iter().map(|w| w / k as f32).collect())
    }
}

impl Transform for MotionBlur {
    fn apply(&self, image: &DynamicImage, _rng: &mut dyn RngCore) -> Result<Vec<DynamicImage>> {
        raster::ensure_valid(image)?;
        let kernel = self.kernel()?;
        let side = self.size as u32;
        let blurred = match image {
            DynamicImage::ImageLuma8(gray) => {
                DynamicImage::ImageLuma8(raster::convolve(gray, &kernel, side, side))
            }
            other => DynamicImage::ImageRgb8(raster::convolve(&other.to_rgb8(), &kernel, side, side)),
        };
        Ok(vec![blurred])
    }

    fn name(&self) -> &str {
        MOTION_BLUR
    }
}

/// Additive per-channel Gaussian noise for a grainy look
#[derive(Debug, Clone)]
pub struct GaussianNoise {
    pub mean: f32,
    pub std: f32,
}

impl Default for GaussianNoise {
    fn default() -> Self {
        Self {
            mean: 0.0,
            std: 35.0,
        }
    }
}

impl Transform for GaussianNoise {
    fn apply(&self, image: &DynamicImage, rng: &mut dyn RngCore) -> Result<Vec<DynamicImage>> {
        let src = Raster::from_image(image)?;
        let normal = Normal::new(self.mean, self.std)
            .map_err(|e| Error::InvalidParameter(format!("gaussian noise: {}", e)))?;

        // Clip before truncating back to 8 bits
        let data = src
            .data
            .iter()
            .map(|v| (*v as f32 + normal.sample(&mut *rng)).clamp(0.0, 255.0) as u8)
            .collect();
        Ok(vec![src.with_data(data).into_image()?])
    }

    fn name(&self) -> &str {
        GAUSSIAN_NOISE
    }
}

/// Impulse noise: random pixels forced to white, then others to black
#[derive(Debug, Clone)]
pub struct SaltPepperNoise {
    /// Fraction of the image's values to corrupt, split evenly between salt and pepper
    pub amount: f64,
}

impl Default for SaltPepperNoise {
    fn default() -> Self {
        Self { amount: 0.02 }
    }
}

impl SaltPepperNoise {
    /// Number of salt (and, separately, pepper) coordinates for an image
    pub fn count_for(&self, width: u32, height: u32, channels: u8) -> usize {
        let size = width as f64 * height as f64 * channels as f64;
        (self.amount * size * 0.5).ceil() as usize
    }
}

impl Transform for SaltPepperNoise {
    fn apply(&self, image: &DynamicImage, rng: &mut dyn RngCore) -> Result<Vec<DynamicImage>> {
        if !(0.0..=1.0).contains(&self.amount) {
            return Err(Error::InvalidParameter(format!(
                "salt and pepper amount {} outside [0, 1]",
                self.amount
            )));
        }
        let mut noisy = Raster::from_image(image)?;
        let count = self.count_for(image.width(), image.height(), noisy.channels as u8);

        for value in [u8::MAX, u8::MIN] {
            for _ in 0..count {
                let x = rng.gen_range(0..noisy.width);
                let y = rng.gen_range(0..noisy.height);
                noisy.pixel_mut(x, y).fill(value);
            }
        }
        Ok(vec![noisy.into_image()?])
    }

    fn name(&self) -> &str {
        SALT_PEPPER_NOISE
    }
}

/// Linear intensity remaps `alpha * v + beta`
#[derive(Debug, Clone)]
pub struct Contrast {
    /// `(alpha, beta)` pairs, one output image each
    pub variants: Vec<(f32, f32)>,
}

impl Default for Contrast {
    fn default() -> Self {
        Self {
            // high contrast, low contrast, brighter, darker
            variants: vec![(1.5, 0.0), (0.5, 0.0), (1.0, 50.0), (1.0, -50.0)],
        }
    }
}

impl Transform for Contrast {
    fn apply(&self, image: &DynamicImage, _rng: &mut dyn RngCore) -> Result<Vec<DynamicImage>> {
        if self.variants.is_empty() {
            return Err(Error::InvalidParameter("contrast needs at least one variant".into()));
        }
        let src = Raster::from_image(image)?;
        self.variants
            .iter()
            .map(|(alpha, beta)| {
                let data = src
                    .data
                    .iter()
                    .map(|v| raster::saturate(alpha * *v as f32 + beta))
                    .collect();
                src.with_data(data).into_image()
            })
            .collect()
    }

    fn name(&self) -> &str {
        CONTRAST
    }
}

/// Zoom in and zoom out by an integer factor, keeping the input canvas size
#[derive(Debug, Clone)]
pub struct Scale {
    pub factor: u32,
}

impl Default for Scale {
    fn default() -> Self {
        Self { factor: 2 }
    }
}

impl Scale {
    fn zoom_in(&self, img: &DynamicImage) -> DynamicImage {
        let (w, h) = (img.width(), img.height());
        let enlarged = img.resize_exact(w * self.factor, h * self.factor, FilterType::Triangle);
        let x = (self.factor - 1) * w / 2;
        let y = (self.factor - 1) * h / 2;
        enlarged.crop_imm(x, y, w, h)
    }

    fn zoom_out(&self, img: &DynamicImage) -> Result<DynamicImage> {
        let (w, h) = (img.width(), img.height());
        let (sw, sh) = (w / self.factor, h / self.factor);
        if sw == 0 || sh == 0 {
            return Err(Error::InvalidImage(format!(
                "{}x{} image is too small to zoom out by {}",
                w, h, self.factor
            )));
        }
        let shrunk = Raster::from_image(&img.resize_exact(sw, sh, FilterType::Triangle))?;
        let left = (w - sw) / 2;
        let top = (h - sh) / 2;
        raster::pad_replicate(&shrunk, w as usize, h as usize, left as usize, top as usize)
            .into_image()
    }
}

impl Transform for Scale {
    fn apply(&self, image: &DynamicImage, _rng: &mut dyn RngCore) -> Result<Vec<DynamicImage>> {
        if self.factor == 0 {
            return Err(Error::InvalidParameter("scale factor must be positive".into()));
        }
        let img = raster::normalize(image)?;
        Ok(vec![self.zoom_in(&img), self.zoom_out(&img)?])
    }

    fn name(&self) -> &str {
        SCALE
    }
}

/// Rotations about the image center on an unchanged canvas
#[derive(Debug, Clone)]
pub struct Rotate {
    /// Counter-clockwise angles in degrees, one output image each
    pub angles: Vec<f32>,
}

impl Default for Rotate {
    fn default() -> Self {
        Self {
            angles: vec![45.0, 90.0, 135.0, 180.0, 225.0, 270.0, 315.0],
        }
    }
}

impl Rotate {
    /// Rotate counter-clockwise by `angle` degrees, filling uncovered pixels with black
    pub fn rotate(image: &DynamicImage, angle: f32) -> Result<DynamicImage> {
        raster::ensure_valid(image)?;
        // Interpolate in f32 so values are rounded, not truncated, on the way back
        Ok(match image {
            DynamicImage::ImageLuma8(gray) => {
                let plane = map_subpixels(gray, |v| v as f32);
                let rotated = raster::rotate_centered(&plane, angle, Luma([0.0]));
                DynamicImage::ImageLuma8(map_subpixels(&rotated, raster::saturate))
            }
            other => {
                let plane = map_subpixels(&other.to_rgb8(), |v| v as f32);
                let rotated = raster::rotate_centered(&plane, angle, Rgb([0.0; 3]));
                DynamicImage::ImageRgb8(map_subpixels(&rotated, raster::saturate))
            }
        })
    }
}

impl Transform for Rotate {
    fn apply(&self, image: &DynamicImage, _rng: &mut dyn RngCore) -> Result<Vec<DynamicImage>> {
        if self.angles.is_empty() {
            return Err(Error::InvalidParameter("rotate needs at least one angle".into()));
        }
        self.angles.iter().map(|a| Self::rotate(image, *a)).collect()
    }

    fn name(&self) -> &str {
        ROTATE
    }
}

/// Mirror an image, `code` picks the axis
#[derive(Debug, Clone)]
pub struct Flip {
    /// Positive: horizontal, zero: vertical, negative: both axes
    pub code: i32,
}

impl Default for Flip {
    fn default() -> Self {
        Self { code: 1 }
    }
}

impl Transform for Flip {
    fn apply(&self, image: &DynamicImage, _rng: &mut dyn RngCore) -> Result<Vec<DynamicImage>> {
        let img = raster::normalize(image)?;
        let flipped = match self.code {
            c if c > 0 => img.fliph(),
            0 => img.flipv(),
            _ => img.fliph().flipv(),
        };
        Ok(vec![flipped])
    }

    fn name(&self) -> &str {
        FLIP
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn motion_blur_kernel_is_a_normalized_line_when_unrotated() {
        let blur = MotionBlur {
            size: 5,
            angle: 0.0,
        };
        let kernel = blur.kernel().unwrap();
        for (i, w) in kernel.iter().enumerate() {
            let expected = if i / 5 == 2 { 0.2 } else { 0.0 };
            assert!((w - expected).abs() < 1e-5, "tap {} = {}", i, w);
        }
    }

    #[test]
    fn motion_blur_quarter_turn_is_a_vertical_line() {
        let blur = MotionBlur {
            size: 5,
            angle: 90.0,
        };
        let kernel = blur.kernel().unwrap();
        for (i, w) in kernel.iter().enumerate() {
            let expected = if i % 5 == 2 { 0.2 } else { 0.0 };
            assert!((w - expected).abs() < 1e-5, "tap {} = {}", i, w);
        }
    }

    #[test]
    fn zero_size_motion_blur_is_rejected() {
        let blur = MotionBlur {
            size: 0,
            angle: 45.0,
        };
        assert!(matches!(blur.kernel(), Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn salt_pepper_count_rounds_up() {
        let noise = SaltPepperNoise::default();
        // 0.02 * 10*10*3 * 0.5 = 3
        assert_eq!(noise.count_for(10, 10, 3), 3);
        // 0.02 * 7*7*1 * 0.5 = 0.49
        assert_eq!(noise.count_for(7, 7, 1), 1);
    }
}
