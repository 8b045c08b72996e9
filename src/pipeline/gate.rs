use crate::{config::CONFIDENCE_THRESHOLD, types::LabeledCandidate};

const DOG_LABEL: &str = "Dog";

/// Decides whether a generic-animal result is worth running the breed model on.
///
/// Returns the gate decision together with the "Dog" candidate's confidence,
/// or `0.0` when no such candidate was ranked.
pub fn is_dog_present(candidates: &[LabeledCandidate]) -> (bool, f32) {
    match candidates
        .iter()
        .find(|c| c.label.eq_ignore_ascii_case(DOG_LABEL))
    {
        Some(dog) => (dog.confidence > CONFIDENCE_THRESHOLD, dog.confidence),
        None => (false, 0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates(entries: &[(&str, f32)]) -> Vec<LabeledCandidate> {
        entries
            .iter()
            .enumerate()
            .map(|(i, (label, confidence))| LabeledCandidate {
                id: i.to_string(),
                label: label.to_string(),
                confidence: *confidence,
            })
            .collect()
    }

    #[test]
    fn dog_above_threshold_opens_gate() {
        let ranked = candidates(&[("Dog", 0.9), ("Bird", 0.3), ("Cat", 0.1)]);
        assert_eq!(is_dog_present(&ranked), (true, 0.9));
    }

    #[test]
    fn dog_below_threshold_keeps_gate_closed() {
        let ranked = candidates(&[("Cat", 0.999), ("Dog", 0.0005)]);
        assert_eq!(is_dog_present(&ranked), (false, 0.0005));
    }

    #[test]
    fn threshold_itself_is_not_enough() {
        let ranked = candidates(&[("Dog", CONFIDENCE_THRESHOLD)]);
        assert!(!is_dog_present(&ranked).0);
        let ranked = candidates(&[("Dog", 0.0011)]);
        assert!(is_dog_present(&ranked).0);
    }

    #[test]
    fn label_match_ignores_case() {
        assert!(is_dog_present(&candidates(&[("DOG", 0.4)])).0);
        assert!(is_dog_present(&candidates(&[("dog", 0.4)])).0);
    }

    #[test]
    fn missing_dog_reports_zero() {
        assert_eq!(is_dog_present(&candidates(&[("Cat", 0.8)])), (false, 0.0));
        assert_eq!(is_dog_present(&[]), (false, 0.0));
    }
}
