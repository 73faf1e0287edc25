//! Property-based tests for the crop and classification rules the API
//! exposes, using proptest.

use labelcut_core::{classify, Classification, CropRect, KeywordTable, TargetSize};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // ============================================================
    // Crop Rectangle Validation
    // ============================================================

    #[test]
    fn validation_succeeds_iff_bounds_invariant_holds(
        x in -100.0f64..1000.0,
        y in -100.0f64..1000.0,
        width in -50.0f64..800.0,
        height in -50.0f64..800.0,
        page_w in 100.0f64..1000.0,
        page_h in 100.0f64..1000.0,
    ) {
        let rect = CropRect { x, y, width, height };
        let holds = x >= 0.0
            && y >= 0.0
            && width > 0.0
            && height > 0.0
            && x + width <= page_w
            && y + height <= page_h;
        prop_assert_eq!(rect.validate(page_w, page_h).is_ok(), holds);
    }

    #[test]
    fn full_page_rect_is_always_valid(
        page_w in 1.0f64..2000.0,
        page_h in 1.0f64..2000.0,
    ) {
        let rect = CropRect { x: 0.0, y: 0.0, width: page_w, height: page_h };
        prop_assert!(rect.validate(page_w, page_h).is_ok());
    }

    // ============================================================
    // Uniform Scaling
    // ============================================================

    #[test]
    fn fit_scale_preserves_aspect_ratio_and_fits(
        width in 1.0f64..800.0,
        height in 1.0f64..800.0,
        target_w in 1.0f64..800.0,
        target_h in 1.0f64..800.0,
    ) {
        let rect = CropRect { x: 0.0, y: 0.0, width, height };
        let target = TargetSize { width: target_w, height: target_h };
        let scale = rect.fit_scale(target);

        prop_assert!((scale - (target_w / width).min(target_h / height)).abs() < 1e-9);
        // The scaled rect fits the target box...
        prop_assert!(width * scale <= target_w + 1e-6);
        prop_assert!(height * scale <= target_h + 1e-6);
        // ...and the limiting axis touches it.
        prop_assert!(
            (width * scale - target_w).abs() < 1e-6
                || (height * scale - target_h).abs() < 1e-6
        );
    }

    // ============================================================
    // Classification
    // ============================================================

    #[test]
    fn classification_ignores_keyword_order(text in ".{0,200}") {
        let table = KeywordTable::default();
        let mut reversed = table.clone();
        reversed.label.reverse();
        reversed.invoice.reverse();
        prop_assert_eq!(
            classify(&text, &table, 20),
            classify(&text, &reversed, 20)
        );
    }

    #[test]
    fn short_text_is_always_neither(text in ".{0,10}") {
        // Threshold far above any 10-char string's byte length
        prop_assert_eq!(
            classify(&text, &KeywordTable::default(), 1000),
            Classification::Neither
        );
    }

    #[test]
    fn invoice_keyword_in_long_text_classifies_invoice(pad in "[xyz]{20,80}") {
        // The padding alphabet cannot form any label keyword
        let text = format!("{} tax invoice", pad);
        prop_assert_eq!(
            classify(&text, &KeywordTable::default(), 20),
            Classification::Invoice
        );
    }

    #[test]
    fn classification_is_case_insensitive(upper in proptest::bool::ANY) {
        let text = if upper {
            "ORDERED THROUGH MARKETPLACE, SHIP TODAY".to_string()
        } else {
            "ordered through marketplace, ship today".to_string()
        };
        prop_assert_eq!(
            classify(&text, &KeywordTable::default(), 20),
            Classification::Label
        );
    }
}
