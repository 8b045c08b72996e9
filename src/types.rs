use std::time::Instant;

use image::RgbaImage;

/// A captured still, already decoded to RGBA.
#[derive(Clone, Debug)]
pub struct Photo {
    pub image: RgbaImage,
    pub captured_at: Instant,
}

impl Photo {
    pub fn new(image: RgbaImage) -> Self {
        Self {
            image,
            captured_at: Instant::now(),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// One ranked label produced by the rank selector.
#[derive(Clone, Debug, PartialEq)]
pub struct LabeledCandidate {
    /// Positional rank as a string ("0" is the best match).
    pub id: String,
    pub label: String,
    pub confidence: f32,
}

impl LabeledCandidate {
    pub fn percent(&self) -> i32 {
        (self.confidence * 100.0) as i32
    }

    pub fn display_text(&self) -> String {
        format!("{}: {}%", self.label, self.percent())
    }
}

/// Output of the generic-animal stage.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClassificationResult {
    pub has_dog: bool,
    pub dog_confidence: f32,
    /// Sorted by descending confidence, ties in original index order.
    pub candidates: Vec<LabeledCandidate>,
}

impl ClassificationResult {
    /// Neutral result used when detection fails or finds nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn top(&self) -> Option<&LabeledCandidate> {
        self.candidates.first()
    }
}

/// What a single capture produced once it went through the whole pipeline.
#[derive(Clone, Debug, PartialEq)]
pub enum CaptureOutcome {
    NotADog {
        top_animal: Option<LabeledCandidate>,
    },
    NoBreed,
    Breed {
        breed: LabeledCandidate,
        candidates: Vec<LabeledCandidate>,
        asset: Option<String>,
    },
}

impl CaptureOutcome {
    pub fn notification(&self) -> String {
        match self {
            CaptureOutcome::NotADog {
                top_animal: Some(animal),
            } => format!("Detected: {} (not a dog)", animal.label),
            CaptureOutcome::NotADog { top_animal: None } => {
                "No animals detected in the image".to_string()
            }
            CaptureOutcome::NoBreed => "No breed detected".to_string(),
            CaptureOutcome::Breed {
                breed,
                asset: Some(_),
                ..
            } => format!("{} - Model available!", breed.display_text()),
            CaptureOutcome::Breed {
                breed, asset: None, ..
            } => format!("{} - No 3D model available", breed.display_text()),
        }
    }

    pub fn asset(&self) -> Option<&str> {
        match self {
            CaptureOutcome::Breed { asset, .. } => asset.as_deref(),
            _ => None,
        }
    }
}
