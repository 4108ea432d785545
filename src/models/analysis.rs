//! Structured analysis produced from the oracle's free-text response.

use serde::{Deserialize, Serialize};

/// Key clauses grouped by category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClauseBuckets {
    /// Potential issues or liabilities.
    pub risk: Vec<String>,
    /// Potential benefits or advantages.
    pub opportunity: Vec<String>,
    /// Standard or informational clauses.
    pub neutral: Vec<String>,
}

/// One document batch's classified analysis.
///
/// Scores are `None` when the oracle's response never contained a matching
/// score line; the HTTP layer renders a missing score as `0` so the wire
/// format always carries integers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Summary bullet points, in response order.
    pub summary: Vec<String>,
    /// Categorized clauses.
    pub clauses: ClauseBuckets,
    /// Inconsistencies or anomalies flagged by the oracle.
    pub anomalies: Vec<String>,
    /// Risk score on a 1-10 scale, if the response carried one.
    pub risk_score: Option<i32>,
    /// Opportunity score on a 1-10 scale, if the response carried one.
    pub opportunity_score: Option<i32>,
}

impl AnalysisResult {
    /// Risk score as rendered on the wire (missing reads as 0).
    pub fn risk_score_or_zero(&self) -> i32 {
        self.risk_score.unwrap_or(0)
    }

    /// Opportunity score as rendered on the wire (missing reads as 0).
    pub fn opportunity_score_or_zero(&self) -> i32 {
        self.opportunity_score.unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_scores_render_as_zero() {
        let result = AnalysisResult::default();
        assert_eq!(result.risk_score, None);
        assert_eq!(result.risk_score_or_zero(), 0);
        assert_eq!(result.opportunity_score_or_zero(), 0);
    }

    #[test]
    fn test_serialization_round_trip_keeps_option() {
        let result = AnalysisResult {
            risk_score: Some(7),
            ..Default::default()
        };
        let json = serde_json::to_string(&result).unwrap();
        let back: AnalysisResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.risk_score, Some(7));
        assert_eq!(back.opportunity_score, None);
    }
}
