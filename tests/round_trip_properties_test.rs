//! Property tests for anonymize/decode round trips over mixed business text

use hitoku::anonymization::{AnonymizationConfig, AnonymizationEngine, LexiconAnnotator};
use proptest::prelude::*;

fn engine() -> AnonymizationEngine {
    let annotator = LexiconAnnotator::new([
        ("東京都渋谷区1-2", "GPE"),
        ("技術社長", "PERSON"),
        ("Go (CEO)", "PERSON"),
    ]);
    AnonymizationEngine::new(AnonymizationConfig::default(), Box::new(annotator))
        .expect("Failed to create engine")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn test_decode_restores_anonymized_text(
        text in "[0-9,.¥円万約第号東京都渋谷区部長社長開発技術営業 aAzZPjectRGo<>（）()「」:時分年月日@-]{0,40}"
    ) {
        let mut engine = engine();
        let anonymized = engine.anonymize(&text).unwrap();
        prop_assert_eq!(engine.decode(&anonymized), text);
    }
}
