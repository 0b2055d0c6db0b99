mod common;

use common::*;
use image::{DynamicImage, RgbImage};
use imgprep::augment::transforms::{Flip, Rotate};
use imgprep::{Augmenter, Error, Result, Transform, augment};
use rand::RngCore;
use std::sync::Arc;

/// Rejects images wider than a limit, mirrors everything else
struct NarrowOnly {
    max_width: u32,
}

impl Transform for NarrowOnly {
    fn apply(&self, image: &DynamicImage, _rng: &mut dyn RngCore) -> Result<Vec<DynamicImage>> {
        if image.width() > self.max_width {
            return Err(Error::InvalidImage(format!("{} wider than {}", image.width(), self.max_width)));
        }
        Ok(vec![image.fliph()])
    }

    fn name(&self) -> &str {
        "narrow_only"
    }
}

#[test]
fn three_images_produce_51_records() {
    let data = three_sample_dataset();
    let records = augment(&data, &Catalogue::standard(), &mut test_rng()).unwrap();
    assert_eq!(records.len(), 51);
}

#[test]
fn records_are_transform_major_and_keep_labels() {
    let data = three_sample_dataset();
    let catalogue = Catalogue::standard();
    let records = augment(&data, &catalogue, &mut test_rng()).unwrap();

    let counts = [1, 1, 1, 4, 2, 7, 1];
    let mut expected: Vec<(&str, &str)> = Vec::new();
    for (name, count) in catalogue.names().into_iter().zip(counts) {
        for sample in data.iter() {
            for _ in 0..count {
                expected.push((name, sample.label.as_str()));
            }
        }
    }

    let actual: Vec<(&str, &str)> = records
        .iter()
        .map(|r| (r.transform.as_str(), r.label.as_str()))
        .collect();
    assert_eq!(actual, expected);
}

#[test]
fn outputs_keep_the_transform_return_order() {
    let data = Dataset::new(vec![Sample::new(gradient(12, 12), "cat")]);
    let rotate = Rotate::default();
    let records = Augmenter::new()
        .add_transform(Arc::new(rotate.clone()))
        .augment(&data, &mut test_rng())
        .unwrap();

    let direct = rotate.apply(&data.samples()[0].image, &mut test_rng()).unwrap();
    let images: Vec<DynamicImage> = records.into_iter().map(|r| r.image).collect();
    assert_eq!(images, direct);
}

#[test]
fn invalid_images_are_skipped_not_fatal() {
    let data = Dataset::new(vec![
        Sample::new(gradient(10, 10), "cat"),
        Sample::new(gradient(40, 10), "dog"),
        Sample::new(gradient(8, 8), "cat"),
    ]);
    let augmenter = Augmenter::new()
        .add_transform_boxed(Box::new(NarrowOnly { max_width: 20 }))
        .add_transform_boxed(Box::new(Flip::default()));

    let (records, report) = augmenter.run(&data, &mut test_rng()).unwrap();

    assert_eq!(records.len(), 5);
    assert_eq!(report.sources, 3);
    assert_eq!(report.records, 5);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].sample_index, 1);
    assert_eq!(report.skipped[0].transform, "narrow_only");
    assert!(records.iter().filter(|r| r.transform == "narrow_only").all(|r| r.label.as_str() == "cat"));
}

#[test]
fn zero_size_sample_is_skipped_for_every_transform() {
    let data = Dataset::new(vec![
        Sample::new(gradient(16, 16), "cat"),
        Sample::new(DynamicImage::ImageRgb8(RgbImage::new(0, 0)), "broken"),
    ]);
    let (records, report) = Augmenter::new()
        .with_catalogue(Catalogue::standard())
        .run(&data, &mut test_rng())
        .unwrap();

    assert_eq!(records.len(), 17);
    assert_eq!(report.skipped.len(), 7);
    assert!(records.iter().all(|r| r.label.as_str() == "cat"));
}

#[test]
fn builder_exposes_its_transforms_in_order() {
    let augmenter = Augmenter::new()
        .with_verbose(true)
        .with_catalogue(Catalogue::from_names(&["scale", "flip"]).unwrap())
        .add_transform(Arc::new(Rotate::default()));
    assert_eq!(augmenter.catalogue().names(), vec!["scale", "flip", "rotate"]);

    let records = augmenter.augment(&three_sample_dataset(), &mut test_rng()).unwrap();
    assert_eq!(records.len(), 3 * (2 + 1 + 7));
}

#[test]
fn misconfigured_transform_aborts_the_run() {
    let data = three_sample_dataset();
    let result = Augmenter::new()
        .add_transform(Arc::new(Flip::default()))
        .add_transform(Arc::new(Rotate { angles: vec![] }))
        .augment(&data, &mut test_rng());
    assert!(matches!(result, Err(Error::InvalidParameter(_))));
}

#[test]
fn empty_inputs_produce_no_records() {
    let records = augment(&Dataset::default(), &Catalogue::standard(), &mut test_rng()).unwrap();
    assert!(records.is_empty());

    let records = Augmenter::new()
        .augment(&three_sample_dataset(), &mut test_rng())
        .unwrap();
    assert!(records.is_empty());
}

#[test]
fn source_dataset_is_left_unchanged() {
    let data = three_sample_dataset();
    let before: Vec<DynamicImage> = data.iter().map(|s| s.image.clone()).collect();
    augment(&data, &Catalogue::standard(), &mut test_rng()).unwrap();
    let after: Vec<DynamicImage> = data.iter().map(|s| s.image.clone()).collect();
    assert_eq!(before, after);
}

#[test]
fn seeded_runs_are_reproducible() {
    let data = three_sample_dataset();
    let a = augment(&data, &Catalogue::standard(), &mut test_rng()).unwrap();
    let b = augment(&data, &Catalogue::standard(), &mut test_rng()).unwrap();
    for (x, y) in a.iter().zip(&b) {
        assert_eq!(x.image, y.image);
    }
}
