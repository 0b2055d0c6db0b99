use image::{DynamicImage, GrayImage, ImageBuffer, Luma, Rgb, RgbImage};
use imgprep::{Dataset, Sample};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::Path;

/// Deterministic generator for tests that exercise the noise transforms
pub fn test_rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(7)
}

/// Creates a uniform RGB image
pub fn solid_rgb(width: u32, height: u32, value: [u8; 3]) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(value)))
}

/// Creates a uniform grayscale image
pub fn solid_gray(width: u32, height: u32, value: u8) -> DynamicImage {
    DynamicImage::ImageLuma8(GrayImage::from_pixel(width, height, Luma([value])))
}

/// Creates an RGB gradient so transforms have structure to work with
pub fn gradient(width: u32, height: u32) -> DynamicImage {
    let img = ImageBuffer::from_fn(width, height, |x, y| {
        let r = (x * 255 / width.max(1)) as u8;
        let g = (y * 255 / height.max(1)) as u8;
        Rgb([r, g, 128u8])
    });
    DynamicImage::ImageRgb8(img)
}

/// Three labeled samples of different sizes
pub fn three_sample_dataset() -> Dataset {
    Dataset::new(vec![
        Sample::new(gradient(32, 24), "cat"),
        Sample::new(solid_rgb(20, 20, [200, 10, 10]), "dog"),
        Sample::new(gradient(17, 31), "cat"),
    ])
}

/// Mean and variance over every channel value
pub fn mean_and_variance(img: &DynamicImage) -> (f64, f64) {
    let bytes = img.as_bytes();
    let n = bytes.len() as f64;
    let mean = bytes.iter().map(|v| *v as f64).sum::<f64>() / n;
    let var = bytes.iter().map(|v| (*v as f64 - mean).powi(2)).sum::<f64>() / n;
    (mean, var)
}

/// Writes `count` PNG images for each label into `root/{label}/`
pub fn write_dataset_tree(root: &Path, labels: &[&str], count: usize) {
    for label in labels {
        let dir = root.join(label);
        std::fs::create_dir_all(&dir).expect("Failed to create label directory");
        for i in 0..count {
            gradient(16 + i as u32, 16)
                .save_with_format(dir.join(format!("{:02}.png", i)), image::ImageFormat::Png)
                .expect("Failed to save test image");
        }
    }
}
