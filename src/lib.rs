pub mod augment;
pub mod dataset;
pub mod display;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod preprocess;
mod raster;

pub use augment::{Catalogue, Transform, apply_transform};
pub use error::{Error, Result};
pub use models::{AugmentedRecord, Dataset, Label, NormalizedImage, NormalizedSample, Sample};
pub use pipeline::{AugmentReport, Augmenter, SkippedPair, augment};
pub use preprocess::{DEFAULT_TARGET_SIZE, preprocess};
