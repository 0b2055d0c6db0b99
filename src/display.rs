use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use rand::SeedableRng;
use rand::seq::index;
use rand_chacha::ChaCha8Rng;
use std::path::Path;

use crate::error::{Error, Result};
use crate::models::{AugmentedRecord, Sample};

/// Field used to split items into grid rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    Label,
    Transform,
}

/// Anything that can be placed on a display grid
pub trait GridItem {
    fn image(&self) -> &DynamicImage;

    /// Row key, `None` when the item has no value for this grouping
    fn group_key(&self, by: GroupBy) -> Option<&str>;
}

impl GridItem for Sample {
    fn image(&self) -> &DynamicImage {
        &self.image
    }

    fn group_key(&self, by: GroupBy) -> Option<&str> {
        match by {
            GroupBy::Label => Some(self.label.as_str()),
            GroupBy::Transform => None,
        }
    }
}

impl GridItem for AugmentedRecord {
    fn image(&self) -> &DynamicImage {
        &self.image
    }

    fn group_key(&self, by: GroupBy) -> Option<&str> {
        match by {
            GroupBy::Label => Some(self.label.as_str()),
            GroupBy::Transform => Some(self.transform.as_str()),
        }
    }
}

/// Layout of a display grid
#[derive(Debug, Clone)]
pub struct GridOptions {
    /// Images sampled per group (one row per group)
    pub per_row: usize,
    /// Side length of each square cell
    pub cell_size: u32,
    /// Gap around each cell
    pub padding: u32,
    /// Seed for picking which images of a group are shown
    pub seed: u64,
    /// Groups to show, in order; `None` shows every group in first-seen order
    pub categories: Option<Vec<String>>,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            per_row: 5,
            cell_size: 128,
            padding: 4,
            seed: 42,
            categories: None,
        }
    }
}

/// Group keys in first-seen order
fn group_keys<T: GridItem>(items: &[T], by: GroupBy) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for key in items.iter().filter_map(|i| i.group_key(by)) {
        if !keys.iter().any(|k| k == key) {
            keys.push(key.to_string());
        }
    }
    keys
}

/// Render a sample of each group into one image, a row per group.
///
/// Requested categories without images are logged and skipped. Fails with
/// [`Error::MissingCategory`] when no row can be drawn.
pub fn render_grid<T: GridItem>(items: &[T], by: GroupBy, options: &GridOptions) -> Result<RgbImage> {
    if options.per_row == 0 || options.cell_size == 0 {
        return Err(Error::InvalidParameter("grid needs at least one non-empty cell per row".into()));
    }

    let keys = options
        .categories
        .clone()
        .unwrap_or_else(|| group_keys(items, by));

    let mut rng = ChaCha8Rng::seed_from_u64(options.seed);
    let mut rows: Vec<(String, Vec<&DynamicImage>)> = Vec::new();
    for key in keys {
        let members: Vec<&DynamicImage> = items
            .iter()
            .filter(|i| i.group_key(by) == Some(key.as_str()))
            .map(|i| i.image())
            .collect();
        if members.is_empty() {
            log::warn!("{}", Error::MissingCategory(key));
            continue;
        }
        let picked: Vec<&DynamicImage> = index::sample(&mut rng, members.len(), options.per_row.min(members.len()))
            .into_iter()
            .map(|i| members[i])
            .collect();
        rows.push((key, picked));
    }

    if rows.is_empty() {
        let wanted = match by {
            GroupBy::Label => "any label",
            GroupBy::Transform => "any transform",
        };
        return Err(Error::MissingCategory(wanted.to_string()));
    }

    let step = options.cell_size + options.padding;
    let width = options.per_row as u32 * step + options.padding;
    let height = rows.len() as u32 * step + options.padding;
    let mut canvas = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));

    for (row, (key, images)) in rows.iter().enumerate() {
        log::debug!("Grid row {}: {} ({} images)", row, key, images.len());
        for (col, img) in images.iter().enumerate() {
            let x = col as u32 * step + options.padding;
            let y = row as u32 * step + options.padding;
            let cell = imageops::resize(&img.to_rgb8(), options.cell_size, options.cell_size, FilterType::Triangle);
            imageops::overlay(&mut canvas, &cell, x.into(), y.into());
            draw_hollow_rect_mut(
                &mut canvas,
                Rect::at(x as i32 - 1, y as i32 - 1).of_size(options.cell_size + 2, options.cell_size + 2),
                Rgb([0, 0, 0]),
            );
        }
    }

    Ok(canvas)
}

/// Write a rendered grid to disk, format chosen by extension
pub fn save_grid(grid: &RgbImage, path: &Path) -> Result<()> {
    grid.save(path).map_err(|source| Error::Encode {
        path: path.to_path_buf(),
        source,
    })
}
