//! Line-prefix classifier for oracle responses.
//!
//! The oracle is instructed to open each point with one of five labels and
//! to finish with `R_score:` / `O_score:` lines. This module is the other
//! half of that free-text contract: it routes lines into buckets by
//! case-insensitive prefix and pulls the two integer scores out. Lines that
//! match nothing are dropped.

use tracing::warn;

use crate::models::{AnalysisResult, ClauseBuckets};

/// Bucket labels tested in fixed priority order; first match wins.
const PREFIXES: [&str; 5] = ["summary:", "risk:", "opportunity:", "neutral:", "anomaly:"];

/// Classify a raw completion into buckets and scores.
pub fn classify(raw: &str) -> AnalysisResult {
    let mut summary = Vec::new();
    let mut clauses = ClauseBuckets::default();
    let mut anomalies = Vec::new();
    let mut risk_score = None;
    let mut opportunity_score = None;

    for line in raw.lines() {
        if let Some((label, content)) = match_prefix(line) {
            match label {
                "summary:" => summary.push(content),
                "risk:" => clauses.risk.push(content),
                "opportunity:" => clauses.opportunity.push(content),
                "neutral:" => clauses.neutral.push(content),
                "anomaly:" => anomalies.push(content),
                _ => unreachable!(),
            }
        } else if line.contains("R_score") {
            risk_score = parse_score(line, "R_score");
        } else if line.contains("O_score") {
            opportunity_score = parse_score(line, "O_score");
        }
        // Anything else is dropped.
    }

    AnalysisResult {
        summary,
        clauses,
        anomalies,
        risk_score,
        opportunity_score,
    }
}

/// Test a line against the bucket prefixes, case-insensitively.
///
/// Strips the matched prefix by its own length and trims the remainder.
fn match_prefix(line: &str) -> Option<(&'static str, String)> {
    for prefix in PREFIXES {
        let matched = line
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix));
        if matched {
            return Some((prefix, line[prefix.len()..].trim().to_string()));
        }
    }
    None
}

/// Extract the integer following a score marker.
///
/// A score line with no parseable integer yields `None` rather than an
/// error; the caller treats a missing score the same as an absent line.
fn parse_score(line: &str, marker: &str) -> Option<i32> {
    let start = line.find(marker)? + marker.len();
    let rest = &line[start..];

    let digits: String = rest
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();

    match digits.parse() {
        Ok(score) => Some(score),
        Err(_) => {
            warn!("Score line had no parseable integer: {:?}", line);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_completion() {
        let raw = "summary: A\nrisk: B\nR_score: 7\nO_score: 4";
        let result = classify(raw);

        assert_eq!(result.summary, vec!["A"]);
        assert_eq!(result.clauses.risk, vec!["B"]);
        assert_eq!(result.risk_score, Some(7));
        assert_eq!(result.opportunity_score, Some(4));
        assert!(result.clauses.opportunity.is_empty());
        assert!(result.clauses.neutral.is_empty());
        assert!(result.anomalies.is_empty());
    }

    #[test]
    fn test_prefix_match_is_case_insensitive() {
        let result = classify("Summary: first point\nRISK: exposure\nAnomaly: odd date");
        assert_eq!(result.summary, vec!["first point"]);
        assert_eq!(result.clauses.risk, vec!["exposure"]);
        assert_eq!(result.anomalies, vec!["odd date"]);
    }

    #[test]
    fn test_stripping_uses_matched_prefix_length() {
        // "opportunity:" is the longest label; content must come through
        // intact for every label length.
        let result = classify("opportunity: upside\nneutral: boilerplate");
        assert_eq!(result.clauses.opportunity, vec!["upside"]);
        assert_eq!(result.clauses.neutral, vec!["boilerplate"]);
    }

    #[test]
    fn test_unrecognized_lines_are_dropped() {
        let raw = "Here is the analysis you asked for:\nsummary: A\n- bullet noise\n\nrisk: B";
        let result = classify(raw);
        assert_eq!(result.summary, vec!["A"]);
        assert_eq!(result.clauses.risk, vec!["B"]);
        assert!(result.anomalies.is_empty());
    }

    #[test]
    fn test_missing_score_lines_leave_scores_none() {
        let result = classify("summary: only a summary");
        assert_eq!(result.risk_score, None);
        assert_eq!(result.opportunity_score, None);
        assert_eq!(result.risk_score_or_zero(), 0);
    }

    #[test]
    fn test_malformed_score_line_degrades_to_missing() {
        let result = classify("summary: A\nR_score: high\nO_score: 4");
        assert_eq!(result.risk_score, None);
        assert_eq!(result.opportunity_score, Some(4));
    }

    #[test]
    fn test_score_markers_match_anywhere_in_line() {
        let result = classify("The R_score is 8 overall\nfinal O_score = 3");
        assert_eq!(result.risk_score, Some(8));
        assert_eq!(result.opportunity_score, Some(3));
    }

    #[test]
    fn test_later_score_line_wins() {
        let result = classify("R_score: 2\nR_score: 9");
        assert_eq!(result.risk_score, Some(9));
    }

    #[test]
    fn test_multiple_bucket_lines_preserve_order() {
        let raw = "summary: one\nsummary: two\nrisk: r1\nrisk: r2";
        let result = classify(raw);
        assert_eq!(result.summary, vec!["one", "two"]);
        assert_eq!(result.clauses.risk, vec!["r1", "r2"]);
    }

    #[test]
    fn test_attribution_stays_in_bucket_text() {
        // Inline file attribution is not split out; it rides along in the
        // bucket string.
        let result = classify("risk: unlimited liability clause (contract.pdf)");
        assert_eq!(
            result.clauses.risk,
            vec!["unlimited liability clause (contract.pdf)"]
        );
    }
}
