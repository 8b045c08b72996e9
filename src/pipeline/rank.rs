use crate::types::LabeledCandidate;

use super::labels::LabelTable;

/// Top-`k` labelled candidates from a raw probability vector.
///
/// Entries are sorted by descending probability under `f32::total_cmp`, so a
/// NaN score sorts ahead of every finite one; ties keep the earlier index.
/// Indices past the end of `labels` are clamped to the last label, which hides
/// a model/label-table mismatch, so every clamp is logged.
pub fn rank(probabilities: &[f32], labels: &LabelTable, k: usize) -> Vec<LabeledCandidate> {
    if probabilities.is_empty() || labels.is_empty() {
        if !probabilities.is_empty() {
            log::warn!(
                "cannot rank {} probabilities against an empty label table",
                probabilities.len()
            );
        }
        return Vec::new();
    }

    let mut indexed: Vec<(usize, f32)> = probabilities.iter().copied().enumerate().collect();
    // `sort_by` is stable, so equal probabilities stay in index order.
    indexed.sort_by(|a, b| b.1.total_cmp(&a.1));

    let last_label = labels.len() - 1;
    indexed
        .into_iter()
        .take(k.min(probabilities.len()))
        .enumerate()
        .map(|(position, (index, confidence))| {
            let safe_index = if index > last_label {
                log::warn!(
                    "model output index {index} exceeds label table (max {last_label}), clamping"
                );
                last_label
            } else {
                index
            };
            LabeledCandidate {
                id: position.to_string(),
                label: labels.get(safe_index).unwrap_or_default().to_string(),
                confidence,
            }
        })
        .collect()
}
