//! Score aggregation over a session's recorded responses.
//!
//! Pure functions, no I/O. The lifecycle orchestrator calls [`aggregate`]
//! once at session end; its output is authoritative and overwrites whatever
//! running values earlier submissions left on the session row.

use crate::models::response::CandidateResponse;
use crate::store::SessionScores;

/// Round to one decimal, half away from zero for the non-negative values
/// scores live on.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Average the per-response scores into the five session-level dimensions.
/// A session with no responses aggregates to all zeros, never an error.
pub fn aggregate(responses: &[CandidateResponse]) -> SessionScores {
    if responses.is_empty() {
        return SessionScores::default();
    }
    let n = responses.len() as f64;

    let mut overall = 0.0;
    let mut communication = 0.0;
    let mut technical = 0.0;
    let mut problem_solving = 0.0;
    let mut confidence = 0.0;
    for r in responses {
        overall += r.score;
        communication += r.analysis.communication_score;
        technical += r.analysis.technical_score;
        problem_solving += r.analysis.problem_solving_score;
        confidence += r.analysis.confidence_score;
    }

    SessionScores {
        overall: round1(overall / n),
        communication: round1(communication / n),
        technical: round1(technical / n),
        problem_solving: round1(problem_solving / n),
        confidence: round1(confidence / n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::response::ResponseAnalysis;
    use sqlx::types::Json;
    use uuid::Uuid;

    fn response(score: f64, comm: f64, tech: f64, ps: f64, conf: f64) -> CandidateResponse {
        CandidateResponse {
            id: Uuid::new_v4(),
            session_id: Uuid::new_v4(),
            question: "Q".into(),
            answer: "A".into(),
            score,
            feedback: String::new(),
            strengths: vec![],
            improvements: vec![],
            analysis: Json(ResponseAnalysis {
                communication_score: comm,
                technical_score: tech,
                problem_solving_score: ps,
                confidence_score: conf,
            }),
            created_at: None,
        }
    }

    #[test]
    fn averages_each_dimension_independently() {
        let responses = vec![
            response(8.0, 8.0, 7.0, 8.0, 7.0),
            response(6.0, 6.0, 5.0, 7.0, 6.0),
        ];
        let scores = aggregate(&responses);
        assert_eq!(scores.overall, 7.0);
        assert_eq!(scores.communication, 7.0);
        assert_eq!(scores.technical, 6.0);
        assert_eq!(scores.problem_solving, 7.5);
        assert_eq!(scores.confidence, 6.5);
    }

    #[test]
    fn no_responses_aggregates_to_zeros() {
        let scores = aggregate(&[]);
        assert_eq!(scores, SessionScores::default());
    }

    #[test]
    fn single_response_passes_through_rounded() {
        let scores = aggregate(&[response(7.25, 6.66, 5.0, 9.99, 3.14)]);
        assert_eq!(scores.overall, 7.3);
        assert_eq!(scores.communication, 6.7);
        assert_eq!(scores.technical, 5.0);
        assert_eq!(scores.problem_solving, 10.0);
        assert_eq!(scores.confidence, 3.1);
    }

    #[test]
    fn round1_rounds_half_up_for_non_negative() {
        assert_eq!(round1(7.45), 7.5);
        assert_eq!(round1(7.44), 7.4);
        assert_eq!(round1(0.0), 0.0);
    }
}
