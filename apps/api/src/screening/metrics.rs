//! Headline numbers for the analysis dashboard.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::screening::models::{CumulativeReport, ScreeningResult};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisMetrics {
    /// Length of the model's ranking.
    pub total_candidates: usize,
    /// Mean over ranking entries that carry a score.
    pub average_match_score: Option<f64>,
    /// Recommendation label → number of screenings with that label.
    pub recommendation_distribution: BTreeMap<String, usize>,
}

pub fn compute_metrics(report: &CumulativeReport, screenings: &[ScreeningResult]) -> AnalysisMetrics {
    let scores: Vec<f64> = report
        .ranking()
        .iter()
        .filter_map(|entry| entry.match_score)
        .collect();

    let average_match_score = if scores.is_empty() {
        None
    } else {
        Some(scores.iter().sum::<f64>() / scores.len() as f64)
    };

    let mut recommendation_distribution = BTreeMap::new();
    for recommendation in screenings
        .iter()
        .filter_map(|s| s.final_recommendation.as_ref())
    {
        *recommendation_distribution
            .entry(recommendation.as_str().to_string())
            .or_insert(0) += 1;
    }

    AnalysisMetrics {
        total_candidates: report.ranking().len(),
        average_match_score,
        recommendation_distribution,
    }
}
