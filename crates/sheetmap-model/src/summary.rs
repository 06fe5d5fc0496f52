//! Per-sheet and per-file tallies of recommended actions.

use serde::{Deserialize, Serialize};

use crate::mapping::{MappingAction, MappingResult};

/// Action tallies for a single sheet.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SheetSummary {
    pub total_headers: usize,
    pub auto_mapped: usize,
    pub needs_review: usize,
    pub needs_manual: usize,
    pub auto_mapped_percentage: f64,
    pub needs_review_percentage: f64,
    pub needs_manual_percentage: f64,
}

impl SheetSummary {
    /// Count the recommended actions of one sheet's results.
    pub fn from_results(results: &[MappingResult]) -> Self {
        let mut summary = Self {
            total_headers: results.len(),
            ..Self::default()
        };
        for result in results {
            match result.recommended_action {
                MappingAction::AutoMap => summary.auto_mapped += 1,
                MappingAction::Review => summary.needs_review += 1,
                MappingAction::Manual => summary.needs_manual += 1,
            }
        }
        summary.auto_mapped_percentage = percentage(summary.auto_mapped, summary.total_headers);
        summary.needs_review_percentage = percentage(summary.needs_review, summary.total_headers);
        summary.needs_manual_percentage = percentage(summary.needs_manual, summary.total_headers);
        summary
    }
}

/// Action tallies across every sheet of a file.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OverallSummary {
    pub total_sheets: usize,
    pub total_headers: usize,
    pub total_auto_mapped: usize,
    pub total_needs_review: usize,
    pub total_needs_manual: usize,
    pub auto_mapped_percentage: f64,
    pub needs_review_percentage: f64,
    pub needs_manual_percentage: f64,
}

impl OverallSummary {
    pub fn from_sheets(sheets: &[SheetSummary]) -> Self {
        let mut overall = Self {
            total_sheets: sheets.len(),
            ..Self::default()
        };
        for sheet in sheets {
            overall.total_headers += sheet.total_headers;
            overall.total_auto_mapped += sheet.auto_mapped;
            overall.total_needs_review += sheet.needs_review;
            overall.total_needs_manual += sheet.needs_manual;
        }
        overall.auto_mapped_percentage =
            percentage(overall.total_auto_mapped, overall.total_headers);
        overall.needs_review_percentage =
            percentage(overall.total_needs_review, overall.total_headers);
        overall.needs_manual_percentage =
            percentage(overall.total_needs_manual, overall.total_headers);
        overall
    }
}

/// Share of `count` in `total` as a percentage with one decimal.
fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 * 1000.0 / total as f64).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(action: MappingAction) -> MappingResult {
        MappingResult {
            recommended_action: action,
            ..MappingResult::no_match("h", "")
        }
    }

    #[test]
    fn counts_and_rounds() {
        let results = vec![
            result(MappingAction::AutoMap),
            result(MappingAction::AutoMap),
            result(MappingAction::Review),
        ];
        let summary = SheetSummary::from_results(&results);
        assert_eq!(summary.total_headers, 3);
        assert_eq!(summary.auto_mapped, 2);
        assert_eq!(summary.needs_review, 1);
        assert_eq!(summary.needs_manual, 0);
        assert_eq!(summary.auto_mapped_percentage, 66.7);
        assert_eq!(summary.needs_review_percentage, 33.3);
        assert_eq!(summary.needs_manual_percentage, 0.0);
    }

    #[test]
    fn empty_inputs_yield_zeros() {
        assert_eq!(SheetSummary::from_results(&[]), SheetSummary::default());
        assert_eq!(OverallSummary::from_sheets(&[]), OverallSummary::default());
    }

    #[test]
    fn overall_adds_sheets() {
        let first = SheetSummary::from_results(&[result(MappingAction::AutoMap)]);
        let second = SheetSummary::from_results(&[
            result(MappingAction::Manual),
            result(MappingAction::Review),
            result(MappingAction::AutoMap),
        ]);
        let overall = OverallSummary::from_sheets(&[first, second, SheetSummary::default()]);
        assert_eq!(overall.total_sheets, 3);
        assert_eq!(overall.total_headers, 4);
        assert_eq!(overall.total_auto_mapped, 2);
        assert_eq!(overall.total_needs_review, 1);
        assert_eq!(overall.total_needs_manual, 1);
        assert_eq!(overall.auto_mapped_percentage, 50.0);
        assert_eq!(overall.needs_manual_percentage, 25.0);
    }
}
