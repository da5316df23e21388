use crate::config::Color;
use crate::image_classifier::interface::PredictionSet;

const FALLBACK_COLOR: Color = Color::rgb(0x9c, 0xa3, 0xaf);

#[derive(Debug, Clone, PartialEq)]
pub struct RankedRow {
    pub label: String,
    pub probability: f32,
    /// Filled share of the bar, 0 to 100.
    pub percent: f32,
    pub color: Color,
}

/// One row per class in model order; colors cycle through `palette`.
pub fn ranked_rows(predictions: &PredictionSet, palette: &[Color]) -> Vec<RankedRow> {
    predictions
        .iter()
        .enumerate()
        .map(|(index, classification)| RankedRow {
            label: classification.label.clone(),
            probability: classification.probability,
            percent: bar_percent(classification.probability),
            color: row_color(index, palette),
        })
        .collect()
}

pub fn row_color(index: usize, palette: &[Color]) -> Color {
    if palette.is_empty() {
        return FALLBACK_COLOR;
    }
    palette[index % palette.len()]
}

pub fn bar_percent(probability: f32) -> f32 {
    if probability.is_nan() {
        return 0.0;
    }
    (probability * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_palette;

    fn predictions(values: &[(&str, f32)]) -> PredictionSet {
        let labels: Vec<String> = values.iter().map(|(label, _)| label.to_string()).collect();
        let probabilities: Vec<f32> = values.iter().map(|(_, p)| *p).collect();
        PredictionSet::from_probabilities(&labels, &probabilities).unwrap()
    }

    #[test]
    fn bars_follow_class_order_and_probability() {
        let set = predictions(&[("A", 0.10), ("B", 0.85), ("C", 0.05)]);

        let rows = ranked_rows(&set, &default_palette());

        let labels: Vec<&str> = rows.iter().map(|row| row.label.as_str()).collect();
        assert_eq!(labels, vec!["A", "B", "C"]);
        assert!((rows[0].percent - 10.0).abs() < 1e-4);
        assert!((rows[1].percent - 85.0).abs() < 1e-4);
        assert!((rows[2].percent - 5.0).abs() < 1e-4);
    }

    #[test]
    fn colors_cycle_by_index_modulo_palette() {
        let set = predictions(&[
            ("a", 0.1),
            ("b", 0.1),
            ("c", 0.1),
            ("d", 0.1),
            ("e", 0.1),
            ("f", 0.1),
            ("g", 0.4),
        ]);
        let palette = default_palette();
        assert_eq!(palette.len(), 6);

        let rows = ranked_rows(&set, &palette);

        assert_eq!(rows.len(), 7);
        assert_eq!(rows[6].color, rows[0].color);
        assert_ne!(rows[5].color, rows[0].color);
    }

    #[test]
    fn bar_width_is_clamped() {
        assert_eq!(bar_percent(1.5), 100.0);
        assert_eq!(bar_percent(-0.2), 0.0);
        assert_eq!(bar_percent(f32::NAN), 0.0);
    }

    #[test]
    fn empty_palette_uses_fallback_color() {
        assert_eq!(row_color(3, &[]), FALLBACK_COLOR);
    }
}
