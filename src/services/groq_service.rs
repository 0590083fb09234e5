use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::time::Duration;

use crate::error::Result;
use crate::models::response::{CandidateResponse, ResponseAnalysis};

/// Full analyzer verdict for one answer.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseScoring {
    pub score: f64,
    pub feedback: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub analysis: ResponseAnalysis,
}

/// Narrative session-level insights, distilled from all of a session's
/// answers rather than one response at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInsights {
    pub summary: String,
    pub key_strengths: Vec<String>,
    pub areas_to_improve: Vec<String>,
    pub recommendations: Vec<String>,
}

/// LLM-backed response analysis and question generation. Provider failures
/// surface as errors; each call site decides whether to degrade or fail.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResponseAnalyzer: Send + Sync {
    async fn analyze<'a>(
        &self,
        question: &str,
        answer: &str,
        context: Option<&'a str>,
    ) -> Result<ResponseScoring>;

    async fn generate_questions<'a>(
        &self,
        role: &str,
        objective: &str,
        count: usize,
        context: Option<&'a str>,
        skills: &[String],
    ) -> Result<Vec<String>>;

    async fn generate_insights(
        &self,
        responses: &[CandidateResponse],
        overall_score: f64,
    ) -> Result<SessionInsights>;

    /// Free-form communication analysis over a full transcript. The shape is
    /// model-defined JSON, passed through to the client as-is.
    async fn analyze_communication(&self, transcript: &str) -> Result<JsonValue>;
}

#[derive(Clone)]
pub struct GroqAnalyzer {
    client: Client,
    api_key: String,
    model: String,
}

impl GroqAnalyzer {
    pub fn new(api_key: String, model: String, client: Client) -> Self {
        Self {
            client,
            api_key,
            model,
        }
    }

    async fn chat_completion(&self, payload: JsonValue) -> Result<JsonValue> {
        let res = self
            .client
            .post("https://api.groq.com/openai/v1/chat/completions")
            .bearer_auth(&self.api_key)
            .json(&payload)
            .timeout(Duration::from_secs(60))
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Groq API error {}: {}", status, text).into());
        }

        let body: JsonValue = res.json().await?;

        body.get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .and_then(|s| serde_json::from_str(s).ok())
            .ok_or_else(|| anyhow::anyhow!("Invalid Groq response format").into())
    }
}

#[async_trait]
impl ResponseAnalyzer for GroqAnalyzer {
    async fn analyze<'a>(
        &self,
        question: &str,
        answer: &str,
        context: Option<&'a str>,
    ) -> Result<ResponseScoring> {
        let context_line = context
            .map(|c| format!("Context: {}\n", c))
            .unwrap_or_default();
        let prompt = format!(
            r#"You are an expert interview evaluator. Analyze the following interview response:

Question: {question}
Answer: {answer}
{context_line}
Provide a comprehensive analysis including:
1. Overall score (0-10)
2. Communication score (0-10) - clarity, structure, articulation
3. Technical score (0-10) - depth of knowledge, accuracy
4. Problem-solving score (0-10) - analytical thinking, approach
5. Confidence score (0-10) - assertiveness, conviction
6. Detailed feedback paragraph
7. 2-4 key strengths
8. 2-3 areas for improvement

Return response as JSON with this exact structure:
{{
  "score": number,
  "communicationScore": number,
  "technicalScore": number,
  "problemSolvingScore": number,
  "confidenceScore": number,
  "feedback": string,
  "strengths": string[],
  "improvements": string[]
}}"#
        );

        let payload = serde_json::json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
            "response_format": { "type": "json_object" },
            "temperature": 0.5,
            "max_tokens": 1500
        });

        let raw = self.chat_completion(payload).await?;
        Ok(coerce_scoring(&raw))
    }

    async fn generate_questions<'a>(
        &self,
        role: &str,
        objective: &str,
        count: usize,
        context: Option<&'a str>,
        skills: &[String],
    ) -> Result<Vec<String>> {
        let skills_line = if skills.is_empty() {
            String::new()
        } else {
            format!("Key Skills: {}\n", skills.join(", "))
        };
        let context_line = context
            .map(|c| format!("Additional Context: {}\n", c))
            .unwrap_or_default();
        let prompt = format!(
            r#"You are an expert interview question generator. Generate {count} high-quality interview questions for the following:

Role: {role}
Objective: {objective}
{skills_line}{context_line}
Requirements:
- Generate diverse questions covering technical, behavioral, and problem-solving aspects
- Make questions specific and relevant to the role
- Include a mix of difficulty levels
- Questions should be open-ended and encourage detailed responses
- If skills are provided, include questions that probe those specific skills

Return ONLY a JSON array of question strings, no other text."#
        );

        let payload = serde_json::json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
            "response_format": { "type": "json_object" },
            "temperature": 0.7,
            "max_tokens": 2048
        });

        let raw = self.chat_completion(payload).await?;
        Ok(coerce_questions(&raw, count))
    }

    async fn generate_insights(
        &self,
        responses: &[CandidateResponse],
        overall_score: f64,
    ) -> Result<SessionInsights> {
        let transcript: String = responses
            .iter()
            .enumerate()
            .map(|(i, r)| {
                format!("Q{}: {}\nA: {}\nScore: {}/10", i + 1, r.question, r.answer, r.score)
            })
            .collect::<Vec<_>>()
            .join("\n\n");
        let prompt = format!(
            r#"Analyze this interview session and provide insights:

Overall Score: {overall_score}/10

Responses:
{transcript}

Provide:
1. A summary of overall performance
2. 3-5 key strengths demonstrated
3. 3-5 areas that need improvement
4. 3-5 actionable recommendations

Return as JSON:
{{
  "summary": string,
  "keyStrengths": string[],
  "areasToImprove": string[],
  "recommendations": string[]
}}"#
        );

        let payload = serde_json::json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
            "response_format": { "type": "json_object" },
            "temperature": 0.6,
            "max_tokens": 2000
        });

        let raw = self.chat_completion(payload).await?;
        Ok(coerce_insights(&raw))
    }

    async fn analyze_communication(&self, transcript: &str) -> Result<JsonValue> {
        let system = "You are an expert communication coach. You analyze interview \
                      transcripts and assess clarity, structure, vocabulary, filler-word \
                      usage and overall delivery. Always respond with a single JSON object.";
        let prompt = format!(
            r#"Analyze the communication skills demonstrated in this interview transcript:

{transcript}

Return a JSON object covering clarity, structure, vocabulary, pacing, filler words,
notable strengths and concrete suggestions for improvement."#
        );

        let payload = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": prompt}
            ],
            "response_format": { "type": "json_object" },
            "temperature": 0.7,
            "max_tokens": 4096
        });

        self.chat_completion(payload).await
    }
}

/// Field-by-field defaulting: the model occasionally drops keys, a missing
/// number becomes 5 and missing text gets a generic placeholder.
fn coerce_scoring(raw: &JsonValue) -> ResponseScoring {
    let num = |key: &str| raw.get(key).and_then(|v| v.as_f64()).unwrap_or(5.0);
    let list = |key: &str, fallback: &str| {
        raw.get(key)
            .and_then(|v| v.as_array())
            .map(|a| {
                a.iter()
                    .filter_map(|v| v.as_str().map(String::from))
                    .collect::<Vec<_>>()
            })
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| vec![fallback.to_string()])
    };

    ResponseScoring {
        score: num("score"),
        feedback: raw
            .get("feedback")
            .and_then(|v| v.as_str())
            .unwrap_or("Good response. Consider providing more specific examples.")
            .to_string(),
        strengths: list("strengths", "Clear communication"),
        improvements: list("improvements", "Add more detail"),
        analysis: ResponseAnalysis {
            communication_score: num("communicationScore"),
            technical_score: num("technicalScore"),
            problem_solving_score: num("problemSolvingScore"),
            confidence_score: num("confidenceScore"),
        },
    }
}

fn coerce_questions(raw: &JsonValue, count: usize) -> Vec<String> {
    let collect = |arr: &[JsonValue]| {
        arr.iter()
            .filter_map(|v| v.as_str().map(String::from))
            .take(count)
            .collect::<Vec<_>>()
    };

    if let Some(arr) = raw.as_array() {
        return collect(arr);
    }
    if let Some(arr) = raw.get("questions").and_then(|v| v.as_array()) {
        return collect(arr);
    }
    // Last resort: any string values in the object.
    raw.as_object()
        .map(|obj| {
            obj.values()
                .filter_map(|v| v.as_str().map(String::from))
                .take(count)
                .collect()
        })
        .unwrap_or_default()
}

/// Deterministic heuristic used when the provider is unavailable, derived
/// from answer length and the presence of examples and measurable results.
pub fn fallback_analysis(answer: &str) -> ResponseScoring {
    let word_count = answer.split_whitespace().count();
    let lower = answer.to_lowercase();
    let has_examples = ["for example", "for instance", "such as", "in my experience"]
        .iter()
        .any(|m| lower.contains(m));
    let has_metrics = lower.contains('%')
        || lower.contains(" percent")
        || lower.contains('$')
        || lower.contains("increased")
        || lower.contains("decreased")
        || lower.contains("improved");

    let base = f64::min(
        10.0,
        4.0 + if word_count > 50 { 2.0 } else { 0.0 }
            + if has_examples { 2.0 } else { 0.0 }
            + if has_metrics { 2.0 } else { 0.0 },
    );

    let mut strengths = vec!["Clear communication".to_string()];
    if has_examples {
        strengths.push("Used specific examples".to_string());
    }
    if has_metrics {
        strengths.push("Included measurable results".to_string());
    }

    let mut improvements = Vec::new();
    if !has_examples {
        improvements.push("Add concrete examples from your experience".to_string());
    }
    if !has_metrics {
        improvements.push("Include quantifiable achievements".to_string());
    }
    if word_count < 50 {
        improvements.push("Provide more detailed responses".to_string());
    }

    ResponseScoring {
        score: base,
        feedback: "Good response. Consider adding more specific examples and quantifiable \
                   results to strengthen your answer."
            .to_string(),
        strengths,
        improvements,
        analysis: ResponseAnalysis {
            communication_score: f64::min(10.0, base + 1.0),
            technical_score: f64::min(10.0, base - 1.0),
            problem_solving_score: base,
            confidence_score: base,
        },
    }
}

fn coerce_insights(raw: &JsonValue) -> SessionInsights {
    let list = |key: &str| {
        raw.get(key)
            .and_then(|v| v.as_array())
            .map(|a| {
                a.iter()
                    .filter_map(|v| v.as_str().map(String::from))
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default()
    };
    SessionInsights {
        summary: raw
            .get("summary")
            .and_then(|v| v.as_str())
            .unwrap_or("Session completed successfully.")
            .to_string(),
        key_strengths: list("keyStrengths"),
        areas_to_improve: list("areasToImprove"),
        recommendations: list("recommendations"),
    }
}

/// Canned insights served when generation fails.
pub fn fallback_insights() -> SessionInsights {
    SessionInsights {
        summary: "Session completed.".to_string(),
        key_strengths: vec!["Completed all questions".to_string()],
        areas_to_improve: vec!["Continue practicing".to_string()],
        recommendations: vec!["Schedule regular practice sessions".to_string()],
    }
}

/// Generic questions served when generation fails.
pub fn fallback_questions(count: usize) -> Vec<String> {
    [
        "Tell me about your background and experience in this field.",
        "What interests you most about this role?",
        "Describe a challenging project you've worked on recently.",
        "How do you approach problem-solving in your work?",
        "What are your key strengths and how do they apply to this role?",
        "Tell me about a time you had to learn something new quickly.",
        "How do you handle feedback and criticism?",
        "Where do you see yourself in the next few years?",
        "What motivates you in your professional life?",
        "Do you have any questions for us?",
    ]
    .iter()
    .take(count)
    .map(|s| s.to_string())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fallback_scores_short_plain_answer_at_base() {
        let scoring = fallback_analysis("I would just try my best.");
        assert_eq!(scoring.score, 4.0);
        assert_eq!(scoring.analysis.communication_score, 5.0);
        assert_eq!(scoring.analysis.technical_score, 3.0);
        assert_eq!(scoring.analysis.problem_solving_score, 4.0);
        assert!(scoring
            .improvements
            .contains(&"Provide more detailed responses".to_string()));
    }

    #[test]
    fn fallback_rewards_examples_and_metrics() {
        let answer = "In my experience leading migrations, for example at my last job, \
                      we improved throughput by 40%.";
        let scoring = fallback_analysis(answer);
        assert_eq!(scoring.score, 8.0);
        assert!(scoring
            .strengths
            .contains(&"Used specific examples".to_string()));
        assert!(scoring
            .strengths
            .contains(&"Included measurable results".to_string()));
    }

    #[test]
    fn fallback_caps_communication_at_ten() {
        let answer = format!(
            "for example such as improved 10% {}",
            "word ".repeat(60)
        );
        let scoring = fallback_analysis(&answer);
        assert_eq!(scoring.score, 10.0);
        assert_eq!(scoring.analysis.communication_score, 10.0);
    }

    #[test]
    fn coerce_scoring_defaults_missing_fields_to_five() {
        let raw = json!({"score": 8, "feedback": "Solid."});
        let scoring = coerce_scoring(&raw);
        assert_eq!(scoring.score, 8.0);
        assert_eq!(scoring.analysis.communication_score, 5.0);
        assert_eq!(scoring.strengths, vec!["Clear communication".to_string()]);
    }

    #[test]
    fn coerce_insights_defaults_missing_fields() {
        let raw = json!({"keyStrengths": ["Structured answers"]});
        let insights = coerce_insights(&raw);
        assert_eq!(insights.summary, "Session completed successfully.");
        assert_eq!(insights.key_strengths, vec!["Structured answers".to_string()]);
        assert!(insights.recommendations.is_empty());
    }

    #[test]
    fn coerce_questions_handles_bare_array_and_wrapper() {
        let bare = json!(["q1", "q2", "q3"]);
        assert_eq!(coerce_questions(&bare, 2), vec!["q1", "q2"]);

        let wrapped = json!({"questions": ["q1", "q2"]});
        assert_eq!(coerce_questions(&wrapped, 5), vec!["q1", "q2"]);
    }
}
