pub mod transforms;

use image::DynamicImage;
use rand::RngCore;
use std::sync::Arc;

use crate::error::{Error, Result};
pub use transforms::{Contrast, Flip, GaussianNoise, MotionBlur, Rotate, SaltPepperNoise, Scale};

/// Trait that every augmentation transform implements
pub trait Transform: Send + Sync {
    /// Produce one or more augmented variants of `image`.
    /// The input is never modified. Randomized transforms draw from `rng`.
    fn apply(&self, image: &DynamicImage, rng: &mut dyn RngCore) -> Result<Vec<DynamicImage>>;

    /// Catalogue identifier, used verbatim in record names and filenames
    fn name(&self) -> &str;
}

/// Ordered, named set of transforms applied uniformly to a dataset
#[derive(Clone, Default)]
pub struct Catalogue {
    transforms: Vec<Arc<dyn Transform>>,
}

impl Catalogue {
    /// Create an empty catalogue
    pub fn new() -> Self {
        Self::default()
    }

    /// All seven transforms with default parameters
    pub fn standard() -> Self {
        STANDARD_NAMES
            .iter()
            .filter_map(|name| standard_transform(name))
            .fold(Self::new(), Self::with)
    }

    /// Subset of the standard catalogue, in the order given
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        let mut catalogue = Self::new();
        for name in names {
            let name = name.as_ref();
            let transform =
                standard_transform(name).ok_or_else(|| Error::UnknownTransform(name.to_string()))?;
            catalogue = catalogue.with(transform);
        }
        Ok(catalogue)
    }

    /// Append a transform
    pub fn with(mut self, transform: Arc<dyn Transform>) -> Self {
        self.transforms.push(transform);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Transform>> {
        self.transforms.iter().find(|t| t.name() == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.transforms.iter().map(|t| t.name()).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Arc<dyn Transform>> {
        self.transforms.iter()
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Look up a transform by identifier and apply it
    pub fn apply_transform(
        &self,
        name: &str,
        image: &DynamicImage,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<DynamicImage>> {
        self.get(name)
            .ok_or_else(|| Error::UnknownTransform(name.to_string()))?
            .apply(image, rng)
    }
}

impl std::fmt::Debug for Catalogue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// Identifiers of the standard catalogue in application order
pub const STANDARD_NAMES: [&str; 7] = [
    transforms::MOTION_BLUR,
    transforms::GAUSSIAN_NOISE,
    transforms::SALT_PEPPER_NOISE,
    transforms::CONTRAST,
    transforms::SCALE,
    transforms::ROTATE,
    transforms::FLIP,
];

/// Default-parameter instance of a standard transform
pub fn standard_transform(name: &str) -> Option<Arc<dyn Transform>> {
    let transform: Arc<dyn Transform> = match name {
        transforms::MOTION_BLUR => Arc::new(MotionBlur::default()),
        transforms::GAUSSIAN_NOISE => Arc::new(GaussianNoise::default()),
        transforms::SALT_PEPPER_NOISE => Arc::new(SaltPepperNoise::default()),
        transforms::CONTRAST => Arc::new(Contrast::default()),
        transforms::SCALE => Arc::new(Scale::default()),
        transforms::ROTATE => Arc::new(Rotate::default()),
        transforms::FLIP => Arc::new(Flip::default()),
        _ => return None,
    };
    Some(transform)
}

/// Apply a standard transform, with default parameters, by identifier
pub fn apply_transform(
    name: &str,
    image: &DynamicImage,
    rng: &mut dyn RngCore,
) -> Result<Vec<DynamicImage>> {
    standard_transform(name)
        .ok_or_else(|| Error::UnknownTransform(name.to_string()))?
        .apply(image, rng)
}
