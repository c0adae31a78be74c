//! Resume Rater — formats the rating prompt, invokes the LLM once, and
//! coerces the response into the fixed rating schema. A response that fails
//! validation gets exactly one repair-oriented LLM call before the request
//! fails.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::analysis::prompts::{
    RATING_FIX_PROMPT_TEMPLATE, RATING_FORMAT_INSTRUCTIONS, RATING_PROMPT_TEMPLATE, RATING_SYSTEM,
};
use crate::errors::AppError;
use crate::llm_client::{strip_json_fences, LlmClient};

/// The structured scoring of a resume against a job description.
/// Typed deserialization requires all four match maps to be present as
/// mappings; `validate` additionally bounds the scores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingResult {
    pub overall_score: f64,
    pub score_description: String,
    pub skills_match: BTreeMap<String, f64>,
    pub experience_match: BTreeMap<String, f64>,
    pub education_match: BTreeMap<String, f64>,
    pub job_compliance: BTreeMap<String, f64>,
    pub additional_points: Vec<String>,
    pub improvements: Vec<String>,
}

impl RatingResult {
    /// Schema checks beyond what deserialization enforces: the overall score
    /// must land in [0, 100] and every sub-score must be a finite number.
    pub fn validate(&self) -> Result<(), String> {
        if !self.overall_score.is_finite() || !(0.0..=100.0).contains(&self.overall_score) {
            return Err(format!(
                "overall_score {} is outside [0, 100]",
                self.overall_score
            ));
        }
        for (category, map) in [
            ("skills_match", &self.skills_match),
            ("experience_match", &self.experience_match),
            ("education_match", &self.education_match),
            ("job_compliance", &self.job_compliance),
        ] {
            if let Some((criterion, score)) = map.iter().find(|(_, s)| !s.is_finite()) {
                return Err(format!(
                    "{category}.{criterion} score {score} is not a finite number"
                ));
            }
        }
        Ok(())
    }
}

/// Rates `resume_text` against `job_description`. One LLM call, plus at most
/// one self-fixing call when the first response fails schema validation.
/// No caching: identical inputs re-invoke the LLM.
pub async fn rate_resume(
    llm: &LlmClient,
    resume_text: &str,
    job_description: &str,
) -> Result<RatingResult, AppError> {
    let prompt = render_rating_prompt(job_description, resume_text);

    info!(
        resume_chars = resume_text.len(),
        job_description_chars = job_description.len(),
        model = llm.model(),
        "Starting resume rating"
    );

    let raw = llm.call(&prompt, RATING_SYSTEM).await?;

    match parse_rating(&raw) {
        Ok(result) => {
            info!(overall_score = result.overall_score, "Resume rating succeeded");
            Ok(result)
        }
        Err(first_error) => {
            warn!("Rating response failed validation ({first_error}), attempting repair pass");
            repair_rating(llm, &raw).await.map_err(|second_error| {
                AppError::Rating(format!(
                    "LLM response failed validation twice: {first_error}; repair pass: {second_error}"
                ))
            })
        }
    }
}

/// The self-fixing pass: hand the malformed output and the schema back to
/// the LLM and ask for a corrected object. Called at most once per request.
async fn repair_rating(llm: &LlmClient, malformed: &str) -> Result<RatingResult, String> {
    let prompt = RATING_FIX_PROMPT_TEMPLATE
        .replace("{format_instructions}", RATING_FORMAT_INSTRUCTIONS)
        .replace("{completion}", malformed);

    let raw = llm
        .call(&prompt, RATING_SYSTEM)
        .await
        .map_err(|e| e.to_string())?;

    let result = parse_rating(&raw)?;
    info!(overall_score = result.overall_score, "Repair pass produced a valid rating");
    Ok(result)
}

fn render_rating_prompt(job_description: &str, resume_text: &str) -> String {
    RATING_PROMPT_TEMPLATE
        .replace("{format_instructions}", RATING_FORMAT_INSTRUCTIONS)
        .replace("{job_description}", job_description)
        .replace("{resume_text}", resume_text)
}

fn parse_rating(raw: &str) -> Result<RatingResult, String> {
    let result: RatingResult =
        serde_json::from_str(strip_json_fences(raw)).map_err(|e| e.to_string())?;
    result.validate()?;
    Ok(result)
}
