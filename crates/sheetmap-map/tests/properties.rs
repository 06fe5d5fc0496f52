use std::sync::Arc;

use proptest::prelude::*;
use sheetmap_map::MatchingEngine;
use sheetmap_model::{
    ExtractedHeader, MappingAction, MatchType, MatchingConfig, OverallSummary, SchemaColumn,
    SheetSummary,
};
use sheetmap_schema::{AliasPolicy, SchemaRegistry};

fn engine() -> MatchingEngine {
    let registry = SchemaRegistry::from_columns(
        vec![
            SchemaColumn::new("date_time", "DateTime")
                .with_description("Date and time of the measurement")
                .with_required(true)
                .with_aliases(["Timestamp"]),
            SchemaColumn::new("gas_volume", "GasVolume")
                .with_description("Daily biogas volume produced")
                .with_aliases(["Biogas"]),
            SchemaColumn::new("tank_temp", "TankTemperature").with_aliases(["Temp"]),
        ],
        AliasPolicy::FirstWins,
    )
    .expect("registry");
    MatchingEngine::new(Arc::new(registry), MatchingConfig::default())
}

fn label() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("DateTime".to_string()),
        Just("Timestamp".to_string()),
        Just("Date Time".to_string()),
        Just("gas volume (m3)".to_string()),
        Just(String::new()),
        "[A-Za-z _()-]{0,24}",
    ]
}

proptest! {
    #[test]
    fn confidence_stays_in_range(label in label()) {
        let result = engine().resolve(&label);
        prop_assert!((0.0..=1.0).contains(&result.confidence));
        if result.match_type == MatchType::None {
            prop_assert!(result.canonical_column.is_none());
            prop_assert_eq!(result.confidence, 0.0);
            prop_assert_eq!(result.recommended_action, MappingAction::Manual);
        } else {
            prop_assert!(result.canonical_column.is_some());
        }
    }

    #[test]
    fn summary_counts_add_up(labels in prop::collection::vec(label(), 0..12)) {
        let engine = engine();
        let headers: Vec<ExtractedHeader> = labels
            .iter()
            .enumerate()
            .map(|(idx, label)| ExtractedHeader::new(idx, label.clone()))
            .collect();
        let results = engine.resolve_all(&headers);
        prop_assert_eq!(results.len(), headers.len());

        let summary = SheetSummary::from_results(&results);
        prop_assert_eq!(
            summary.auto_mapped + summary.needs_review + summary.needs_manual,
            summary.total_headers
        );
        let total_pct = summary.auto_mapped_percentage
            + summary.needs_review_percentage
            + summary.needs_manual_percentage;
        if summary.total_headers > 0 {
            prop_assert!((total_pct - 100.0).abs() <= 0.2, "sum {}", total_pct);
        } else {
            prop_assert_eq!(total_pct, 0.0);
        }

        let overall = OverallSummary::from_sheets(&[summary, summary]);
        prop_assert_eq!(overall.total_headers, summary.total_headers * 2);
        prop_assert_eq!(overall.auto_mapped_percentage, summary.auto_mapped_percentage);
    }
}
