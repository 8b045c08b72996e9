pub mod breed_assets;
pub mod classifier;
pub mod gate;
pub mod labels;
pub mod preprocess;
pub mod rank;
pub mod worker;

use crate::{
    config::ViewerConfig,
    types::{CaptureOutcome, ClassificationResult, LabeledCandidate, Photo},
};

use self::classifier::{Classifier, InferenceModel, OrtModel};

// Re-exports for convenience
pub use worker::{ClassificationWorker, ClassifiedCapture, start_classification_worker};

/// Photo → animal gate → breed → asset.
pub struct BreedPipeline<A, B> {
    animal: Classifier<A>,
    breed: Classifier<B>,
}

impl<A: InferenceModel, B: InferenceModel> BreedPipeline<A, B> {
    pub fn new(animal: Classifier<A>, breed: Classifier<B>) -> Self {
        Self { animal, breed }
    }

    /// Runs the generic-animal model. Any failure is reported as "no detection".
    pub fn detect_animals(&mut self, square: &image::RgbaImage) -> ClassificationResult {
        let candidates = match self.animal.classify_image(square) {
            Ok(candidates) => candidates,
            Err(err) => {
                log::warn!("animal detection failed: {err}");
                return ClassificationResult::empty();
            }
        };

        let (has_dog, dog_confidence) = gate::is_dog_present(&candidates);
        log::debug!("dog detected: {has_dog} with confidence {dog_confidence}");

        ClassificationResult {
            has_dog,
            dog_confidence,
            candidates,
        }
    }

    /// Runs the breed model; failures yield an empty list.
    pub fn recognize_breed(&mut self, square: &image::RgbaImage) -> Vec<LabeledCandidate> {
        self.breed.classify_image(square).unwrap_or_else(|err| {
            log::warn!("breed classification failed: {err}");
            Vec::new()
        })
    }

    pub fn run(&mut self, photo: &Photo) -> CaptureOutcome {
        log::debug!("classifying photo {}x{}", photo.width(), photo.height());
        let square = preprocess::square_crop(&photo.image);

        let animals = self.detect_animals(&square);
        if !animals.has_dog {
            return CaptureOutcome::NotADog {
                top_animal: animals.top().cloned(),
            };
        }

        let candidates = self.recognize_breed(&square);
        let Some(breed) = candidates.first().cloned() else {
            log::warn!("no breed classification results");
            return CaptureOutcome::NoBreed;
        };

        let asset = breed_assets::resolve(&breed.label).map(str::to_string);
        match &asset {
            Some(name) => log::info!("3D model available for {}: {name}", breed.label),
            None => log::warn!("no 3D model available for {}", breed.label),
        }

        CaptureOutcome::Breed {
            breed,
            candidates,
            asset,
        }
    }
}

impl BreedPipeline<OrtModel, OrtModel> {
    /// Loads both label tables; the ONNX sessions are created on first use.
    pub fn from_config(config: &ViewerConfig) -> anyhow::Result<Self> {
        Ok(Self::new(
            Classifier::from_source(&config.animal_model)?,
            Classifier::from_source(&config.breed_model)?,
        ))
    }
}
