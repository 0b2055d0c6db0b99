mod common;

use common::*;
use imgprep::display::{GridOptions, GroupBy, render_grid, save_grid};
use imgprep::{Error, augment};

fn grid_size(rows: u32, options: &GridOptions) -> (u32, u32) {
    let step = options.cell_size + options.padding;
    (options.per_row as u32 * step + options.padding, rows * step + options.padding)
}

#[test]
fn one_row_per_label() {
    let options = GridOptions::default();
    let grid = render_grid(three_sample_dataset().samples(), GroupBy::Label, &options).unwrap();
    assert_eq!(grid.dimensions(), grid_size(2, &options));
}

#[test]
fn records_group_by_transform() {
    let data = Dataset::new(vec![Sample::new(gradient(20, 20), "cat")]);
    let records = augment(&data, &Catalogue::standard(), &mut test_rng()).unwrap();
    let options = GridOptions {
        cell_size: 32,
        ..Default::default()
    };

    let grid = render_grid(&records, GroupBy::Transform, &options).unwrap();
    assert_eq!(grid.dimensions(), grid_size(7, &options));
}

#[test]
fn missing_categories_are_skipped() {
    let options = GridOptions {
        cell_size: 16,
        categories: Some(vec!["dog".into(), "horse".into()]),
        ..Default::default()
    };
    let grid = render_grid(three_sample_dataset().samples(), GroupBy::Label, &options).unwrap();
    assert_eq!(grid.dimensions(), grid_size(1, &options));
}

#[test]
fn no_drawable_group_is_an_error() {
    let options = GridOptions {
        categories: Some(vec!["horse".into()]),
        ..Default::default()
    };
    let result = render_grid(three_sample_dataset().samples(), GroupBy::Label, &options);
    assert!(matches!(result, Err(Error::MissingCategory(_))));

    // Plain samples carry no transform name
    let result = render_grid(three_sample_dataset().samples(), GroupBy::Transform, &GridOptions::default());
    assert!(matches!(result, Err(Error::MissingCategory(_))));
}

#[test]
fn sampling_is_seeded() {
    let data = Dataset::new((0..12).map(|i| Sample::new(gradient(8 + i, 8), "cat")).collect());
    let options = GridOptions {
        cell_size: 8,
        ..Default::default()
    };
    let a = render_grid(data.samples(), GroupBy::Label, &options).unwrap();
    let b = render_grid(data.samples(), GroupBy::Label, &options).unwrap();
    assert_eq!(a, b);
}

#[test]
fn grid_is_written_as_png() -> anyhow::Result<()> {
    let dir = tempfile::TempDir::new()?;
    let path = dir.path().join("grid.png");
    let grid = render_grid(three_sample_dataset().samples(), GroupBy::Label, &GridOptions::default())?;
    save_grid(&grid, &path)?;

    let reloaded = image::open(&path)?.to_rgb8();
    assert_eq!(reloaded, grid);
    Ok(())
}
