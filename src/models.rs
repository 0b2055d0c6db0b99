use image::{DynamicImage, ImageBuffer, Luma};
use std::fmt;

/// Grayscale image with intensities scaled into [0, 1]
pub type NormalizedImage = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Class name attached to an image when it is loaded
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label(String);

impl Label {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Label {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Label {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// A source image and its label
#[derive(Debug, Clone)]
pub struct Sample {
    pub image: DynamicImage,
    pub label: Label,
}

impl Sample {
    pub fn new(image: DynamicImage, label: impl Into<Label>) -> Self {
        Self {
            image,
            label: label.into(),
        }
    }
}

/// One output image of one transform applied to one source sample
#[derive(Debug, Clone)]
pub struct AugmentedRecord {
    pub image: DynamicImage,
    pub label: Label,
    /// Catalogue identifier of the transform that produced `image`
    pub transform: String,
}

/// A preprocessed image and the label of the sample it came from
#[derive(Debug, Clone)]
pub struct NormalizedSample {
    pub image: NormalizedImage,
    pub label: Label,
}

/// Ordered collection of labeled samples
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    samples: Vec<Sample>,
}

impl Dataset {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Distinct labels in first-seen order
    pub fn labels(&self) -> Vec<&Label> {
        let mut seen: Vec<&Label> = Vec::new();
        for sample in &self.samples {
            if !seen.contains(&&sample.label) {
                seen.push(&sample.label);
            }
        }
        seen
    }
}

impl FromIterator<Sample> for Dataset {
    fn from_iter<I: IntoIterator<Item = Sample>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
