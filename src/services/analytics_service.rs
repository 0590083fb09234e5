use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::Result;
use crate::services::aggregator::round1;
use crate::store::Store;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsData {
    pub total_interviews: i64,
    pub total_sessions: usize,
    pub completed_sessions: usize,
    pub average_score: f64,
    pub completion_rate: f64,
    pub skill_breakdown: SkillBreakdown,
    pub average_duration: i64,
    pub recent_sessions: Vec<RecentSession>,
    pub performance_trend: Vec<TrendPoint>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillBreakdown {
    pub communication: f64,
    pub technical: f64,
    pub problem_solving: f64,
    pub confidence: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentSession {
    pub id: Uuid,
    pub interview_name: String,
    pub status: String,
    pub score: Option<f64>,
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub date: Option<DateTime<Utc>>,
    pub score: f64,
}

#[derive(Clone)]
pub struct AnalyticsService {
    store: Arc<dyn Store>,
}

impl AnalyticsService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Dashboard rollup over the user's sessions. Averages divide by
    /// `max(completed, 1)`, so zero completed sessions yields zeros rather
    /// than an error.
    pub async fn dashboard(&self, user_id: &str, org_id: Option<&str>) -> Result<AnalyticsData> {
        let sessions = self.store.list_sessions_by_user(user_id).await?;
        let total_interviews = self.store.count_interviews(user_id, org_id).await?;

        let completed: Vec<_> = sessions
            .iter()
            .filter(|s| s.status == "COMPLETED")
            .collect();
        let total = sessions.len();
        let divisor = completed.len().max(1) as f64;

        let sum = |f: fn(&&crate::models::session::Session) -> f64| {
            completed.iter().map(f).sum::<f64>()
        };
        let avg_overall = sum(|s| s.overall_score.unwrap_or(0.0)) / divisor;
        let avg_comm = sum(|s| s.communication_score.unwrap_or(0.0)) / divisor;
        let avg_tech = sum(|s| s.technical_score.unwrap_or(0.0)) / divisor;
        let avg_problem = sum(|s| s.problem_solving_score.unwrap_or(0.0)) / divisor;
        let avg_conf = sum(|s| s.confidence_score.unwrap_or(0.0)) / divisor;
        let avg_duration = completed
            .iter()
            .map(|s| s.duration_seconds.unwrap_or(0) as f64)
            .sum::<f64>()
            / divisor;

        let interviews = self.store.list_interviews(user_id, org_id).await?;
        let names: HashMap<Uuid, &str> = interviews
            .iter()
            .map(|i| (i.id, i.name.as_str()))
            .collect();

        // `sessions` is already newest-first.
        let recent_sessions = sessions
            .iter()
            .take(10)
            .map(|s| RecentSession {
                id: s.id,
                interview_name: names
                    .get(&s.interview_id)
                    .map(|n| n.to_string())
                    .unwrap_or_default(),
                status: s.status.clone(),
                score: s.overall_score,
                date: s.created_at,
            })
            .collect();

        // Oldest-to-newest for the last seven completed sessions.
        let mut trend: Vec<TrendPoint> = completed
            .iter()
            .take(7)
            .map(|s| TrendPoint {
                date: s.created_at,
                score: s.overall_score.unwrap_or(0.0),
            })
            .collect();
        trend.reverse();

        Ok(AnalyticsData {
            total_interviews,
            total_sessions: total,
            completed_sessions: completed.len(),
            average_score: round1(avg_overall),
            completion_rate: if total > 0 {
                (completed.len() as f64 / total as f64) * 100.0
            } else {
                0.0
            },
            skill_breakdown: SkillBreakdown {
                communication: round1(avg_comm),
                technical: round1(avg_tech),
                problem_solving: round1(avg_problem),
                confidence: round1(avg_conf),
            },
            average_duration: avg_duration.round() as i64,
            recent_sessions,
            performance_trend: trend,
        })
    }
}
