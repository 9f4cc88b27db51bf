use chart_mosaic::core::MosaicLayout;
use proptest::prelude::*;

const LABELS: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

/// Builds a mosaic of `heights.len() x widths.len()` blocks, one label each.
fn block_mosaic(widths: &[usize], heights: &[usize], separator: Option<char>) -> String {
    let mut lines = Vec::new();
    for (r, height) in heights.iter().enumerate() {
        for _ in 0..*height {
            let mut line = String::new();
            for (c, width) in widths.iter().enumerate() {
                if c > 0 {
                    if let Some(separator) = separator {
                        line.push(separator);
                    }
                }
                let label = char::from(LABELS[r * widths.len() + c]);
                line.extend(std::iter::repeat_n(label, *width));
            }
            lines.push(line);
        }
    }
    lines.join("\n")
}

proptest! {
    #[test]
    fn resolve_is_deterministic_and_areas_match_cell_counts(
        widths in prop::collection::vec(1usize..4, 1..5),
        heights in prop::collection::vec(1usize..4, 1..5)
    ) {
        let text = block_mosaic(&widths, &heights, None);
        let first = MosaicLayout::parse(&text).expect("block mosaic");
        let second = MosaicLayout::parse(&text).expect("block mosaic");
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(
            serde_json::to_string(&first).expect("json"),
            serde_json::to_string(&second).expect("json")
        );

        prop_assert_eq!(first.rows(), heights.iter().sum::<usize>());
        prop_assert_eq!(first.cols(), widths.iter().sum::<usize>());
        prop_assert_eq!(first.len(), widths.len() * heights.len());

        let mut covered = 0;
        for slot in first.slots() {
            let cells = text.chars().filter(|ch| *ch == slot.label).count();
            prop_assert_eq!(slot.rect.area(), cells);
            covered += slot.rect.area();
        }
        prop_assert_eq!(covered, first.rows() * first.cols());
    }

    #[test]
    fn full_height_separator_columns_do_not_change_the_layout(
        widths in prop::collection::vec(1usize..4, 1..5),
        heights in prop::collection::vec(1usize..4, 1..4),
        tab in any::<bool>()
    ) {
        let separator = if tab { '\t' } else { ' ' };
        let plain = MosaicLayout::parse(&block_mosaic(&widths, &heights, None)).expect("plain");
        let spaced = MosaicLayout::parse(&block_mosaic(&widths, &heights, Some(separator)))
            .expect("separated");
        prop_assert_eq!(plain, spaced);
    }
}
