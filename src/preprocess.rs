use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, Luma};
use imageproc::contrast::equalize_histogram;
use imageproc::filter::{filter3x3, separable_filter_equal};
use imageproc::map::map_subpixels;

use crate::error::{Error, Result};
use crate::models::{AugmentedRecord, Dataset, NormalizedImage, NormalizedSample};
use crate::raster;

/// Default output size (width, height)
pub const DEFAULT_TARGET_SIZE: (u32, u32) = (128, 128);

/// Taps of the denoising kernel along each axis
const GAUSSIAN_SIZE: usize = 5;

/// Edge-restoring kernel applied after denoising
const SHARPEN_KERNEL: [i32; 9] = [-1, -1, -1, -1, 9, -1, -1, -1, -1];

/// Sigma implied by a kernel size when none is given
fn sigma_for(size: usize) -> f32 {
    0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Normalized 1D Gaussian taps for a `size`-wide kernel
fn gaussian_taps(size: usize) -> Vec<f32> {
    let sigma = sigma_for(size);
    let center = (size - 1) as f32 / 2.0;
    let taps: Vec<f32> = (0..size)
        .map(|i| {
            let d = i as f32 - center;
            (-(d * d) / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum: f32 = taps.iter().sum();
    taps.into_iter().map(|w| w / sum).collect()
}

/// Resize to `size` and drop to a single luminance channel
pub fn resize_grayscale(img: &DynamicImage, size: (u32, u32)) -> GrayImage {
    img.resize_exact(size.0, size.1, FilterType::Triangle).to_luma8()
}

/// 5x5 Gaussian smoothing
pub fn denoise(img: &GrayImage) -> GrayImage {
    // Both passes run in f32 so the result is rounded once
    let plane = map_subpixels(img, |v| v as f32);
    let smoothed = separable_filter_equal(&plane, &gaussian_taps(GAUSSIAN_SIZE));
    map_subpixels(&smoothed, raster::saturate)
}

/// 3x3 sharpening to recover edges lost to smoothing
pub fn sharpen(img: &GrayImage) -> GrayImage {
    filter3x3::<_, i32, u8>(img, &SHARPEN_KERNEL)
}

/// Normalize a color image into a [0, 1] grayscale image of `size`.
///
/// Steps: resize, grayscale, denoise, sharpen, equalize histogram, scale by 1/255.
pub fn preprocess(img: &DynamicImage, size: (u32, u32)) -> Result<NormalizedImage> {
    raster::ensure_valid(img)?;
    if size.0 == 0 || size.1 == 0 {
        return Err(Error::InvalidImage(format!(
            "target size {}x{} has no pixels",
            size.0, size.1
        )));
    }

    let gray = resize_grayscale(img, size);
    let smoothed = denoise(&gray);
    let sharpened = sharpen(&smoothed);
    let equalized = equalize_histogram(&sharpened);

    Ok(NormalizedImage::from_fn(size.0, size.1, |x, y| {
        Luma([equalized.get_pixel(x, y)[0] as f32 / 255.0])
    }))
}

/// Preprocess every sample, skipping the ones that are not valid images
pub fn preprocess_dataset(dataset: &Dataset, size: (u32, u32)) -> Vec<NormalizedSample> {
    dataset
        .iter()
        .enumerate()
        .filter_map(|(index, sample)| match preprocess(&sample.image, size) {
            Ok(image) => Some(NormalizedSample {
                image,
                label: sample.label.clone(),
            }),
            Err(e) => {
                log::warn!("Skipping sample {} ({}): {}", index, sample.label, e);
                None
            }
        })
        .collect()
}

/// Preprocess augmented records for saving or display.
///
/// Each output keeps its label and transform name; the normalized image is
/// quantized back to 8-bit grayscale. Invalid images are skipped.
pub fn preprocess_records(records: &[AugmentedRecord], size: (u32, u32)) -> Vec<AugmentedRecord> {
    records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| match preprocess(&record.image, size) {
            Ok(image) => Some(AugmentedRecord {
                image: DynamicImage::ImageLuma8(to_gray8(&image)),
                label: record.label.clone(),
                transform: record.transform.clone(),
            }),
            Err(e) => {
                log::warn!("Skipping record {} ({}, {}): {}", index, record.label, record.transform, e);
                None
            }
        })
        .collect()
}

/// Quantize a normalized image back to 8 bits for saving or display
pub fn to_gray8(img: &NormalizedImage) -> GrayImage {
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        Luma([raster::saturate(img.get_pixel(x, y)[0] * 255.0)])
    })
}
