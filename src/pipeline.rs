use rand::RngCore;
use std::sync::Arc;

use crate::augment::{Catalogue, Transform};
use crate::error::{Error, Result};
use crate::models::{AugmentedRecord, Dataset};

/// An (image, transform) pair the driver left out of its output
#[derive(Debug, Clone)]
pub struct SkippedPair {
    /// Position of the source sample in the input dataset
    pub sample_index: usize,
    pub transform: String,
    pub reason: String,
}

/// Summary of one augmentation run
#[derive(Debug, Clone, Default)]
pub struct AugmentReport {
    pub sources: usize,
    pub records: usize,
    pub skipped: Vec<SkippedPair>,
}

/// Applies every transform of a catalogue to every sample of a dataset.
///
/// Output order is transform-major: all samples through the first transform,
/// then all samples through the second, and so on. Within one transform,
/// samples keep their dataset order and each transform's outputs keep the
/// order the transform returned them in.
pub struct Augmenter {
    catalogue: Catalogue,
    verbose: bool,
}

impl Augmenter {
    /// Create an augmenter with no transforms
    pub fn new() -> Self {
        Self {
            catalogue: Catalogue::new(),
            verbose: false,
        }
    }

    /// Log every (sample, transform) application, not just per-transform progress
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Replace the transform list
    pub fn with_catalogue(mut self, catalogue: Catalogue) -> Self {
        self.catalogue = catalogue;
        self
    }

    /// Add a transform after the existing ones
    pub fn add_transform(mut self, transform: Arc<dyn Transform>) -> Self {
        self.catalogue = self.catalogue.with(transform);
        self
    }

    /// Helper method to add a transform from a Box
    pub fn add_transform_boxed(self, transform: Box<dyn Transform>) -> Self {
        self.add_transform(Arc::from(transform))
    }

    /// Transforms this augmenter applies, in order
    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    /// Run the augmentation and return the records with a run summary.
    ///
    /// A transform rejecting a sample as an invalid image only drops that
    /// pair; any other error aborts the run.
    pub fn run(
        &self,
        dataset: &Dataset,
        rng: &mut dyn RngCore,
    ) -> Result<(Vec<AugmentedRecord>, AugmentReport)> {
        let mut records = Vec::new();
        let mut report = AugmentReport {
            sources: dataset.len(),
            ..Default::default()
        };

        for transform in self.catalogue.iter() {
            let name = transform.name();
            log::info!("Applying {} to images", name);

            for (index, sample) in dataset.iter().enumerate() {
                let outputs = match transform.apply(&sample.image, rng) {
                    Ok(outputs) => outputs,
                    Err(Error::InvalidImage(reason)) => {
                        log::warn!(
                            "Skipping {} on sample {} ({}): {}",
                            name,
                            index,
                            sample.label,
                            reason
                        );
                        report.skipped.push(SkippedPair {
                            sample_index: index,
                            transform: name.to_string(),
                            reason,
                        });
                        continue;
                    }
                    Err(e) => return Err(e),
                };

                if self.verbose {
                    log::debug!(
                        "  {} on sample {} ({}) produced {} images",
                        name,
                        index,
                        sample.label,
                        outputs.len()
                    );
                }

                records.extend(outputs.into_iter().map(|image| AugmentedRecord {
                    image,
                    label: sample.label.clone(),
                    transform: name.to_string(),
                }));
            }

            log::info!("Done applying {} to images", name);
        }

        report.records = records.len();
        Ok((records, report))
    }

    /// Run the augmentation and return only the records
    pub fn augment(&self, dataset: &Dataset, rng: &mut dyn RngCore) -> Result<Vec<AugmentedRecord>> {
        self.run(dataset, rng).map(|(records, _)| records)
    }
}

impl Default for Augmenter {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply every transform of `catalogue` to every sample of `dataset`
pub fn augment(
    dataset: &Dataset,
    catalogue: &Catalogue,
    rng: &mut dyn RngCore,
) -> Result<Vec<AugmentedRecord>> {
    Augmenter::new()
        .with_catalogue(catalogue.clone())
        .augment(dataset, rng)
}
