// THEORY:
// Background detection is the first stage of segmentation. A sprite sheet is a
// flat canvas with sprites drawn on top, so the color covering the most pixels
// is taken to be the canvas.
//
// Frequency ties are resolved by first appearance in a row-major scan. A
// `HashMap` has no stable iteration order, so each histogram entry records the
// index of its first pixel alongside its count.

use std::collections::HashMap;

use crate::core_modules::pixel::pixel::Color;

#[derive(Clone, Copy)]
struct HistogramEntry {
    count: usize,
    first_seen: usize,
}

/// Returns the most frequent color, or `None` for an empty sequence.
pub fn dominant_color<I>(colors: I) -> Option<Color>
where
    I: IntoIterator<Item = Color>,
{
    let mut histogram: HashMap<Color, HistogramEntry> = HashMap::new();
    for (index, color) in colors.into_iter().enumerate() {
        histogram
            .entry(color)
            .and_modify(|entry| entry.count += 1)
            .or_insert(HistogramEntry {
                count: 1,
                first_seen: index,
            });
    }

    histogram
        .into_iter()
        .max_by(|(_, a), (_, b)| {
            a.count
                .cmp(&b.count)
                // Earlier first occurrence wins, so it must compare as greater.
                .then_with(|| b.first_seen.cmp(&a.first_seen))
        })
        .map(|(color, _)| color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn most_frequent_color_wins() {
        let colors = [
            Color::new(1, 1, 1),
            Color::new(2, 2, 2),
            Color::new(2, 2, 2),
            Color::new(1, 1, 1),
            Color::new(2, 2, 2),
        ];
        assert_eq!(dominant_color(colors), Some(Color::new(2, 2, 2)));
    }

    #[test]
    fn ties_go_to_first_occurrence() {
        let colors = [
            Color::new(9, 0, 0),
            Color::new(0, 9, 0),
            Color::new(0, 9, 0),
            Color::new(9, 0, 0),
            Color::new(0, 0, 9),
        ];
        assert_eq!(dominant_color(colors), Some(Color::new(9, 0, 0)));

        let swapped = [
            Color::new(0, 9, 0),
            Color::new(9, 0, 0),
            Color::new(0, 9, 0),
            Color::new(9, 0, 0),
        ];
        assert_eq!(dominant_color(swapped), Some(Color::new(0, 9, 0)));
    }

    #[test]
    fn empty_input_has_no_background() {
        assert_eq!(dominant_color(std::iter::empty()), None);
    }
}
