//! Directory-tree loading and saving.
//!
//! A dataset root holds one subdirectory per class:
//!
//! ```text
//! root/
//! ├── cat/
//! │   ├── 0001.jpg
//! │   └── 0002.png
//! └── dog/
//!     └── ...
//! ```
//!
//! Saved records land at `{root}/{label}/{transform}_{index}.jpg`.

use image::{DynamicImage, ImageReader};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::models::{AugmentedRecord, Dataset, Label, NormalizedSample, Sample};
use crate::preprocess::to_gray8;

/// How class directory names become labels
#[derive(Debug, Clone, Default)]
pub enum LabelMapping {
    /// The directory name is the label
    #[default]
    DirectoryName,
    /// Only listed directories are loaded, under the mapped label
    Explicit(HashMap<String, String>),
}

impl LabelMapping {
    pub fn resolve(&self, directory: &str) -> Option<Label> {
        match self {
            LabelMapping::DirectoryName => Some(Label::new(directory)),
            LabelMapping::Explicit(map) => map.get(directory).map(|l| Label::new(l.as_str())),
        }
    }
}

/// Sorted entries of a directory
fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = std::fs::read_dir(dir)
        .map_err(|e| Error::io(dir, e))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(|e| Error::io(dir, e))?;
    paths.sort();
    Ok(paths)
}

/// Decode one image file
pub fn read_image(path: &Path) -> Result<DynamicImage> {
    let unreadable = |reason: String| Error::UnreadableImage {
        path: path.to_path_buf(),
        reason,
    };
    ImageReader::open(path)
        .map_err(|e| unreadable(e.to_string()))?
        .with_guessed_format()
        .map_err(|e| unreadable(e.to_string()))?
        .decode()
        .map_err(|e| unreadable(e.to_string()))
}

/// Load every image under `root`, labeled by its class directory.
///
/// Files that fail to decode are logged and left out. Failure to list the
/// root or a class directory is returned as an error.
pub fn load_dataset(root: &Path, mapping: &LabelMapping) -> Result<Dataset> {
    log::info!("Reading images from {}", root.display());
    let mut samples = Vec::new();

    for class_dir in sorted_entries(root)? {
        if !class_dir.is_dir() {
            continue;
        }
        let Some(dir_name) = class_dir.file_name().and_then(|n| n.to_str()) else {
            log::warn!("Skipping directory with non UTF-8 name: {}", class_dir.display());
            continue;
        };
        let Some(label) = mapping.resolve(dir_name) else {
            log::debug!("No label mapped for {}, skipping", dir_name);
            continue;
        };

        for path in sorted_entries(&class_dir)? {
            if !path.is_file() {
                continue;
            }
            match read_image(&path) {
                Ok(image) => samples.push(Sample::new(image, label.clone())),
                Err(e) => log::warn!("{}", e),
            }
        }
    }

    log::info!("Read {} images", samples.len());
    Ok(Dataset::new(samples))
}

/// Path of the `index`-th saved image for a label
pub fn record_path(root: &Path, label: &Label, prefix: &str, index: usize) -> PathBuf {
    root.join(label.as_str()).join(format!("{}_{}.jpg", prefix, index))
}

fn save_image(root: &Path, label: &Label, prefix: &str, index: usize, image: &DynamicImage) -> Result<PathBuf> {
    let dir = root.join(label.as_str());
    std::fs::create_dir_all(&dir).map_err(|e| Error::io(&dir, e))?;

    let path = record_path(root, label, prefix, index);
    // JPEG has no alpha or 16-bit support
    let encodable = match image {
        DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => image.clone(),
        other => DynamicImage::ImageRgb8(other.to_rgb8()),
    };
    encodable.save(&path).map_err(|source| Error::Encode {
        path: path.clone(),
        source,
    })?;
    log::debug!("Saved image to {}", path.display());
    Ok(path)
}

/// Save augmented records as `{root}/{label}/{transform}_{index}.jpg`
pub fn save_records(records: &[AugmentedRecord], root: &Path) -> Result<Vec<PathBuf>> {
    records
        .iter()
        .enumerate()
        .map(|(i, r)| save_image(root, &r.label, &r.transform, i, &r.image))
        .collect()
}

/// Save plain samples as `{root}/{label}/_{index}.jpg`
pub fn save_dataset(dataset: &Dataset, root: &Path) -> Result<Vec<PathBuf>> {
    dataset
        .iter()
        .enumerate()
        .map(|(i, s)| save_image(root, &s.label, "", i, &s.image))
        .collect()
}

/// Save preprocessed samples as `{root}/{label}/preprocessed_{index}.jpg`
pub fn save_preprocessed(samples: &[NormalizedSample], root: &Path) -> Result<Vec<PathBuf>> {
    samples
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let gray = DynamicImage::ImageLuma8(to_gray8(&s.image));
            save_image(root, &s.label, "preprocessed", i, &gray)
        })
        .collect()
}
