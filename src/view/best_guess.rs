use crate::image_classifier::interface::PredictionSet;

const SENTINEL: f32 = -1.0;

/// Index of the first entry with the strictly greatest probability, or
/// `None` if nothing beats the sentinel.
pub fn best_index(predictions: &PredictionSet) -> Option<usize> {
    let mut best = SENTINEL;
    let mut best_index = None;
    for (index, classification) in predictions.iter().enumerate() {
        if classification.probability > best {
            best = classification.probability;
            best_index = Some(index);
        }
    }
    best_index
}

/// The glyph shown by the best-guess display.
///
/// The winning label is upper-cased. When no entry beats the sentinel (only
/// possible with NaN probabilities) the last label is shown as-is.
pub fn best_guess(predictions: &PredictionSet) -> Option<String> {
    let last = predictions.as_slice().last()?;
    match best_index(predictions) {
        Some(index) => Some(predictions.as_slice()[index].label.to_uppercase()),
        None => Some(last.label.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn predictions(values: &[(&str, f32)]) -> PredictionSet {
        let labels: Vec<String> = values.iter().map(|(label, _)| label.to_string()).collect();
        let probabilities: Vec<f32> = values.iter().map(|(_, p)| *p).collect();
        PredictionSet::from_probabilities(&labels, &probabilities).unwrap()
    }

    #[test]
    fn first_maximum_wins_ties() {
        let set = predictions(&[("w", 0.10), ("x", 0.73), ("y", 0.73), ("z", 0.40)]);

        assert_eq!(best_index(&set), Some(1));
        assert_eq!(best_guess(&set), Some("X".to_string()));
    }

    #[test]
    fn picks_highest_probability() {
        let set = predictions(&[("A", 0.10), ("B", 0.85), ("C", 0.05)]);

        assert_eq!(best_guess(&set), Some("B".to_string()));
    }

    #[test]
    fn label_is_upper_cased() {
        let set = predictions(&[("a", 0.9), ("b", 0.1)]);

        assert_eq!(best_guess(&set), Some("A".to_string()));
    }

    #[test]
    fn falls_back_to_last_label_unchanged() {
        let set = predictions(&[("a", f32::NAN), ("b", f32::NAN)]);

        assert_eq!(best_index(&set), None);
        assert_eq!(best_guess(&set), Some("b".to_string()));
    }

    #[test]
    fn empty_set_shows_nothing() {
        assert_eq!(best_guess(&PredictionSet::default()), None);
    }
}
