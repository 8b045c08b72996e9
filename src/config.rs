use std::{env, path::PathBuf, time::Duration};

use crate::pipeline::preprocess::NormalizationPolicy;

/// Both models are trained on square 224x224 inputs.
pub const IMAGE_SIZE: u32 = 224;
/// A "Dog" candidate must score strictly above this to open the gate.
pub const CONFIDENCE_THRESHOLD: f32 = 0.001;
/// One tick per target display frame.
pub const UPDATE_INTERVAL: Duration = Duration::from_millis(16);
pub const ANIMAL_TOP_K: usize = 5;
pub const BREED_TOP_K: usize = 3;
/// Camera sensitivity factor at slider position zero.
pub const SENSITIVITY_BASE: f32 = 0.25;

const ANIMAL_MODEL_FILENAME: &str = "animal_detector.onnx";
const ANIMAL_LABELS_FILENAME: &str = "animal_labels.txt";
const BREED_MODEL_FILENAME: &str = "dog_breed_classifier.onnx";
const BREED_LABELS_FILENAME: &str = "dog_breed_labels.txt";

const ENV_MODEL_DIR: &str = "BREED_VIEWER_MODEL_DIR";
const ENV_ANIMAL_MODEL_URL: &str = "BREED_VIEWER_ANIMAL_MODEL_URL";
const ENV_BREED_MODEL_URL: &str = "BREED_VIEWER_BREED_MODEL_URL";
const ENV_SYNC_INTERVAL_MS: &str = "BREED_VIEWER_SYNC_INTERVAL_MS";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelKind {
    AnimalDetector,
    BreedClassifier,
}

impl ModelKind {
    pub fn label(&self) -> &'static str {
        match self {
            ModelKind::AnimalDetector => "animal detector",
            ModelKind::BreedClassifier => "dog breed classifier",
        }
    }
}

/// Where one model and its label table live, and how its input is normalized.
#[derive(Clone, Debug)]
pub struct ModelSource {
    pub kind: ModelKind,
    pub model_path: PathBuf,
    pub labels_path: PathBuf,
    pub download_url: Option<String>,
    pub policy: NormalizationPolicy,
    pub top_k: usize,
}

#[derive(Clone, Debug)]
pub struct ViewerConfig {
    pub animal_model: ModelSource,
    pub breed_model: ModelSource,
    pub sync_interval: Duration,
}

impl ViewerConfig {
    pub fn with_model_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            animal_model: ModelSource {
                kind: ModelKind::AnimalDetector,
                model_path: dir.join(ANIMAL_MODEL_FILENAME),
                labels_path: dir.join(ANIMAL_LABELS_FILENAME),
                download_url: None,
                policy: NormalizationPolicy::ImageNet,
                top_k: ANIMAL_TOP_K,
            },
            breed_model: ModelSource {
                kind: ModelKind::BreedClassifier,
                model_path: dir.join(BREED_MODEL_FILENAME),
                labels_path: dir.join(BREED_LABELS_FILENAME),
                download_url: None,
                policy: NormalizationPolicy::Plain,
                top_k: BREED_TOP_K,
            },
            sync_interval: UPDATE_INTERVAL,
        }
    }

    /// Defaults overridden by `BREED_VIEWER_*` environment variables.
    pub fn from_env() -> Self {
        let mut config = match env::var_os(ENV_MODEL_DIR) {
            Some(dir) => Self::with_model_dir(PathBuf::from(dir)),
            None => Self::default(),
        };

        config.animal_model.download_url = non_empty_var(ENV_ANIMAL_MODEL_URL);
        config.breed_model.download_url = non_empty_var(ENV_BREED_MODEL_URL);

        if let Some(raw) = non_empty_var(ENV_SYNC_INTERVAL_MS) {
            match raw.parse::<u64>() {
                Ok(ms) if ms > 0 => config.sync_interval = Duration::from_millis(ms),
                _ => log::warn!("ignoring invalid {ENV_SYNC_INTERVAL_MS}={raw}"),
            }
        }

        config
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self::with_model_dir("models")
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Maps a 0..=100 slider position onto the renderer's sensitivity factor.
pub fn sensitivity_factor(slider_percent: u8) -> f32 {
    SENSITIVITY_BASE + f32::from(slider_percent.min(100)) / 100.0
}
