mod ort;

use ndarray::Array4;
use thiserror::Error;

use crate::{
    config::{IMAGE_SIZE, ModelKind, ModelSource},
    types::LabeledCandidate,
};

use super::{
    labels::LabelTable,
    preprocess::{self, NormalizationPolicy, PreprocessError},
    rank,
};

pub use self::ort::OrtModel;

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("model expects input shape {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: [usize; 4],
        actual: Vec<usize>,
    },
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),
    #[error("inference runtime error: {0}")]
    Runtime(#[from] ::ort::Error),
    #[error("model returned no outputs")]
    NoOutputs,
}

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error(transparent)]
    Preprocess(#[from] PreprocessError),
    #[error(transparent)]
    Inference(#[from] InferenceError),
}

/// An opaque inference model: NHWC image tensor in, flat score vector out.
///
/// Implementations keep no state between calls apart from lazily loaded weights.
pub trait InferenceModel: Send + 'static {
    fn infer(&mut self, input: Array4<f32>) -> Result<Vec<f32>, InferenceError>;
}

impl<F> InferenceModel for F
where
    F: FnMut(Array4<f32>) -> Result<Vec<f32>, InferenceError> + Send + 'static,
{
    fn infer(&mut self, input: Array4<f32>) -> Result<Vec<f32>, InferenceError> {
        self(input)
    }
}

pub fn expected_input_shape(size: u32) -> [usize; 4] {
    [1, size as usize, size as usize, 3]
}

pub fn check_input_shape(input: &Array4<f32>, size: u32) -> Result<(), InferenceError> {
    let expected = expected_input_shape(size);
    if input.shape() != expected {
        return Err(InferenceError::ShapeMismatch {
            expected,
            actual: input.shape().to_vec(),
        });
    }
    Ok(())
}

/// One model together with its label table, input policy and top-k cut.
pub struct Classifier<M> {
    kind: ModelKind,
    model: M,
    labels: LabelTable,
    policy: NormalizationPolicy,
    top_k: usize,
}

impl<M: InferenceModel> Classifier<M> {
    pub fn new(
        kind: ModelKind,
        model: M,
        labels: LabelTable,
        policy: NormalizationPolicy,
        top_k: usize,
    ) -> Self {
        Self {
            kind,
            model,
            labels,
            policy,
            top_k,
        }
    }

    /// Raw scores for an already prepared tensor.
    pub fn probabilities(&mut self, tensor: Array4<f32>) -> Result<Vec<f32>, InferenceError> {
        check_input_shape(&tensor, IMAGE_SIZE)?;
        let scores = self.model.infer(tensor)?;

        log::debug!(
            "{} output size {}, label table size {}",
            self.kind.label(),
            scores.len(),
            self.labels.len()
        );
        if scores.len() != self.labels.len() {
            log::warn!(
                "{} output size {} differs from label table size {}",
                self.kind.label(),
                scores.len(),
                self.labels.len()
            );
        }
        Ok(scores)
    }

    /// Preprocess, infer and rank a square image.
    pub fn classify_image(
        &mut self,
        image: &image::RgbaImage,
    ) -> Result<Vec<LabeledCandidate>, ClassifyError> {
        let tensor = preprocess::preprocess(image, IMAGE_SIZE, self.policy)?;
        let scores = self.probabilities(tensor)?;
        let ranked = rank::rank(&scores, &self.labels, self.top_k);

        for candidate in &ranked {
            log::debug!(
                "{} result {}: {} ({:.3})",
                self.kind.label(),
                candidate.id,
                candidate.label,
                candidate.confidence
            );
        }
        Ok(ranked)
    }
}

impl Classifier<OrtModel> {
    /// ONNX-backed classifier for `source`; weights load on first use.
    pub fn from_source(source: &ModelSource) -> anyhow::Result<Self> {
        let labels = LabelTable::load(&source.labels_path)?;
        Ok(Self::new(
            source.kind,
            OrtModel::new(source.clone()),
            labels,
            source.policy,
            source.top_k,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn fixed_scores(scores: Vec<f32>) -> impl InferenceModel {
        move |_input: Array4<f32>| -> Result<Vec<f32>, InferenceError> { Ok(scores.clone()) }
    }

    #[test]
    fn rejects_tensors_of_the_wrong_shape() {
        let mut classifier = Classifier::new(
            ModelKind::AnimalDetector,
            fixed_scores(vec![1.0]),
            LabelTable::from_labels(["Dog"]),
            NormalizationPolicy::Plain,
            5,
        );

        let err = classifier
            .probabilities(Array4::zeros((1, 3, 224, 224)))
            .unwrap_err();
        assert!(matches!(
            err,
            InferenceError::ShapeMismatch {
                expected: [1, 224, 224, 3],
                ..
            }
        ));
    }

    #[test]
    fn classify_image_ranks_model_output() {
        let mut classifier = Classifier::new(
            ModelKind::BreedClassifier,
            fixed_scores(vec![0.2, 0.7, 0.05, 0.05]),
            LabelTable::from_labels(["pug", "beagle", "boxer", "dalmatian"]),
            NormalizationPolicy::Plain,
            3,
        );
        let image = RgbaImage::from_pixel(300, 300, Rgba([120, 80, 40, 255]));

        let ranked = classifier.classify_image(&image).unwrap();
        let labels: Vec<&str> = ranked.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["beagle", "pug", "boxer"]);
    }

    #[test]
    fn model_receives_normalized_nhwc_tensor() {
        let model = |input: Array4<f32>| -> Result<Vec<f32>, InferenceError> {
            assert_eq!(input.shape(), &[1, 224, 224, 3]);
            let expected = (1.0 - 0.485) / 0.229;
            assert!((input[[0, 0, 0, 0]] - expected).abs() < 1e-4);
            Ok(vec![1.0])
        };
        let mut classifier = Classifier::new(
            ModelKind::AnimalDetector,
            model,
            LabelTable::from_labels(["Dog"]),
            NormalizationPolicy::ImageNet,
            5,
        );
        let image = RgbaImage::from_pixel(224, 224, Rgba([255, 255, 255, 255]));

        assert_eq!(classifier.classify_image(&image).unwrap().len(), 1);
    }

    #[test]
    fn empty_image_fails_in_preprocessing() {
        let mut classifier = Classifier::new(
            ModelKind::AnimalDetector,
            fixed_scores(vec![1.0]),
            LabelTable::from_labels(["Dog"]),
            NormalizationPolicy::Plain,
            5,
        );
        assert!(matches!(
            classifier.classify_image(&RgbaImage::new(0, 0)),
            Err(ClassifyError::Preprocess(PreprocessError::EmptyImage { .. }))
        ));
    }
}
