mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from imgprep for tests
pub use imgprep::{AugmentedRecord, Catalogue, Dataset, Label, Sample};
