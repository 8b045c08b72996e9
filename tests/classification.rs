use std::{fs, time::Duration};

use breed_viewer::{
    config::{ANIMAL_TOP_K, BREED_TOP_K, ModelKind, ViewerConfig},
    pipeline::{
        BreedPipeline, breed_assets,
        classifier::{Classifier, InferenceError},
        gate,
        labels::LabelTable,
        preprocess::{self, NormalizationPolicy},
        rank::rank,
        start_classification_worker,
    },
    types::{CaptureOutcome, Photo},
};
use crossbeam_channel::unbounded;
use image::{Rgba, RgbaImage};
use ndarray::Array4;

#[test]
fn ranked_animals_open_the_gate() {
    let labels = LabelTable::from_labels(["Cat", "Dog", "Bird"]);
    let candidates = rank(&[0.1, 0.9, 0.3], &labels, 3);

    let ranked: Vec<(&str, f32)> = candidates
        .iter()
        .map(|c| (c.label.as_str(), c.confidence))
        .collect();
    assert_eq!(ranked, vec![("Dog", 0.9), ("Bird", 0.3), ("Cat", 0.1)]);
    assert_eq!(gate::is_dog_present(&candidates), (true, 0.9));
}

#[test]
fn faint_dog_keeps_gate_closed() {
    let labels = LabelTable::from_labels(["Dog", "Cat"]);
    let candidates = rank(&[0.0005, 0.999], &labels, 2);
    assert!(!gate::is_dog_present(&candidates).0);
}

#[test]
fn breed_labels_resolve_to_assets() {
    assert_eq!(breed_assets::resolve("Beagle"), Some("Beagle"));
    assert_eq!(breed_assets::resolve("PITBULL"), Some("Boxer"));
    assert_eq!(breed_assets::resolve("unknown_breed"), None);
}

fn write_labels(dir: &std::path::Path, name: &str, labels: &[&str]) {
    fs::write(dir.join(name), labels.join("\n")).unwrap();
}

#[test]
fn pipeline_from_label_files() {
    let dir = tempfile::tempdir().unwrap();
    let config = ViewerConfig::with_model_dir(dir.path());
    write_labels(
        dir.path(),
        config.animal_model.labels_path.file_name().unwrap().to_str().unwrap(),
        &["Cat", "Dog", "Horse"],
    );
    write_labels(
        dir.path(),
        config.breed_model.labels_path.file_name().unwrap().to_str().unwrap(),
        &["pug", "", "golden_retriever", "beagle"],
    );

    let animal_labels = LabelTable::load(&config.animal_model.labels_path).unwrap();
    let breed_labels = LabelTable::load(&config.breed_model.labels_path).unwrap();
    assert_eq!(breed_labels.len(), 3);

    let mut pipeline = BreedPipeline::new(
        Classifier::new(
            ModelKind::AnimalDetector,
            |input: Array4<f32>| -> Result<Vec<f32>, InferenceError> {
                assert_eq!(input.shape(), &[1, 224, 224, 3]);
                Ok(vec![0.05, 0.9, 0.05])
            },
            animal_labels,
            config.animal_model.policy,
            ANIMAL_TOP_K,
        ),
        Classifier::new(
            ModelKind::BreedClassifier,
            |_: Array4<f32>| -> Result<Vec<f32>, InferenceError> { Ok(vec![0.1, 0.7, 0.2]) },
            breed_labels,
            config.breed_model.policy,
            BREED_TOP_K,
        ),
    );

    let photo = Photo::new(RgbaImage::from_pixel(640, 480, Rgba([120, 90, 60, 255])));
    match pipeline.run(&photo) {
        CaptureOutcome::Breed {
            breed,
            candidates,
            asset,
        } => {
            assert_eq!(breed.label, "golden_retriever");
            assert_eq!(asset.as_deref(), Some("Golden Retriever"));
            let order: Vec<&str> = candidates.iter().map(|c| c.label.as_str()).collect();
            assert_eq!(order, vec!["golden_retriever", "beagle", "pug"]);
        }
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[test]
fn missing_models_without_url_fail_to_build() {
    let dir = tempfile::tempdir().unwrap();
    let config = ViewerConfig::with_model_dir(dir.path());
    assert!(BreedPipeline::from_config(&config).is_err());
}

#[test]
fn worker_reports_unavailable_models_as_no_breed() {
    let dir = tempfile::tempdir().unwrap();
    let config = ViewerConfig::with_model_dir(dir.path());
    let (result_tx, result_rx) = unbounded();
    let mut worker = start_classification_worker(move || BreedPipeline::from_config(&config), result_tx);

    worker.submit(Photo::new(RgbaImage::from_pixel(32, 32, Rgba([0, 0, 0, 255]))));
    let result = result_rx.recv_timeout(Duration::from_secs(10)).unwrap();
    let outcome = worker.accept(result).unwrap();
    assert_eq!(outcome, CaptureOutcome::NoBreed);
    assert_eq!(outcome.notification(), "No breed detected");
}

#[test]
fn preprocessing_policies_differ_per_model() {
    let config = ViewerConfig::default();
    assert_eq!(config.animal_model.policy, NormalizationPolicy::ImageNet);
    assert_eq!(config.breed_model.policy, NormalizationPolicy::Plain);

    let image = RgbaImage::from_pixel(300, 200, Rgba([128, 128, 128, 255]));
    let square = preprocess::square_crop(&image);
    let plain = preprocess::preprocess(&square, 224, NormalizationPolicy::Plain).unwrap();
    let imagenet = preprocess::preprocess(&square, 224, NormalizationPolicy::ImageNet).unwrap();
    assert!((plain[[0, 100, 100, 0]] - 128.0 / 255.0).abs() < 1e-5);
    assert!(imagenet[[0, 100, 100, 0]] < plain[[0, 100, 100, 0]]);
}
