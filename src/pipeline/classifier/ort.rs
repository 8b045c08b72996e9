use ndarray::Array4;
use ort::session::{Session, builder::GraphOptimizationLevel};
use ort::value::Tensor;

use super::{InferenceError, InferenceModel, check_input_shape};
use crate::{
    config::{IMAGE_SIZE, ModelSource},
    model_download::ensure_model_ready,
};

/// ONNX Runtime model whose session is created on the first inference.
pub struct OrtModel {
    source: ModelSource,
    session: Option<Session>,
}

impl OrtModel {
    pub fn new(source: ModelSource) -> Self {
        Self {
            source,
            session: None,
        }
    }

    fn session(&mut self) -> Result<&mut Session, InferenceError> {
        if self.session.is_none() {
            let kind = self.source.kind;
            ensure_model_ready(&self.source, |_evt| {})
                .map_err(|err| InferenceError::ModelUnavailable(format!("{err:#}")))?;

            let model_path = &self.source.model_path;
            let session = Session::builder()?
                .with_optimization_level(GraphOptimizationLevel::Level3)?
                .with_intra_threads(2)?
                .commit_from_file(model_path)?;
            log::info!(
                "{} ORT session ready using {}",
                kind.label(),
                model_path.display()
            );
            self.session = Some(session);
        }

        self.session
            .as_mut()
            .ok_or_else(|| InferenceError::ModelUnavailable(self.source.kind.label().to_string()))
    }
}

impl InferenceModel for OrtModel {
    fn infer(&mut self, input: Array4<f32>) -> Result<Vec<f32>, InferenceError> {
        check_input_shape(&input, IMAGE_SIZE)?;

        let tensor = Tensor::from_array(input)?;
        let session = self.session()?;
        let outputs = session.run(ort::inputs![tensor])?;

        if outputs.len() < 1 {
            return Err(InferenceError::NoOutputs);
        }

        let scores = outputs[0].try_extract_array::<f32>()?;
        Ok(scores.iter().copied().collect())
    }
}
