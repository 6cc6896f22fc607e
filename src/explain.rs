//! Human-readable score breakdowns for reporting/UI layers.

use crate::ranking::{Criterion, RankingResult};
use std::collections::BTreeMap;

/// One line per base criterion, e.g. `"quality" -> "Quality score: 0.73"`.
/// Criteria missing from the breakdown read as 0.00.
pub fn explain(result: &RankingResult) -> BTreeMap<&'static str, String> {
    Criterion::BASE
        .iter()
        .map(|&c| (c.as_str(), format_line(c, result.score(c).unwrap_or(0.0))))
        .collect()
}

fn format_line(criterion: Criterion, score: f64) -> String {
    format!("{} score: {:.2}", criterion.label(), score)
}
