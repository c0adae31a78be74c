//! Job Resolver — detects a job-posting URL in free-text input, scrapes the
//! page, and coerces the scraped text into a structured job record via the
//! LLM. When the input carries no URL it is passed through verbatim.

use regex::Regex;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::info;

use crate::analysis::prompts::{JOB_EXTRACT_PROMPT_TEMPLATE, JOB_EXTRACT_SYSTEM};
use crate::errors::AppError;
use crate::llm_client::LlmClient;

const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Structured fields derived from a scraped job posting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDescriptionRecord {
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: Vec<String>,
    pub requirements: Vec<String>,
}

/// Returns the first HTTP(S) URL-looking substring in `text`, or `None`.
/// Pattern-only; never touches the network.
pub fn find_url(text: &str) -> Option<&str> {
    static URL_RE: OnceLock<Regex> = OnceLock::new();
    let re = URL_RE.get_or_init(|| Regex::new(r"https?://\S+").expect("valid URL pattern"));
    re.find(text).map(|m| m.as_str())
}

/// Fetches the job posting page with a browser-like user agent and strips
/// the HTML down to whitespace-joined plain text.
pub async fn fetch_job_page(url: &str) -> Result<String, AppError> {
    let client = reqwest::Client::builder()
        .user_agent(BROWSER_USER_AGENT)
        .build()
        .map_err(|e| AppError::Fetch(format!("Failed to build HTTP client: {e}")))?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| AppError::Fetch(format!("Failed to load job description: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(AppError::Fetch(format!(
            "Failed to load job description: HTTP {status} from {url}"
        )));
    }

    let html = response
        .text()
        .await
        .map_err(|e| AppError::Fetch(format!("Failed to read job page body: {e}")))?;

    let text = html_to_text(&html);
    info!(url = %url, chars = text.len(), "Job url loaded successfully");
    Ok(text)
}

/// Sends scraped posting text to the LLM and parses the response into a
/// `JobDescriptionRecord`. No repair pass on this path.
pub async fn structure_job(
    llm: &LlmClient,
    job_text: &str,
) -> Result<JobDescriptionRecord, AppError> {
    let prompt = JOB_EXTRACT_PROMPT_TEMPLATE.replace("{job_text}", job_text);
    let record = llm
        .call_json::<JobDescriptionRecord>(&prompt, JOB_EXTRACT_SYSTEM)
        .await
        .map_err(|e| AppError::Structuring(format!("Failed to extract job details: {e}")))?;

    info!(title = %record.title, company = %record.company, "Job details extracted successfully");
    Ok(record)
}

/// The rating path's entry point: input without a URL is used verbatim as
/// the job description; input with a URL is fetched, structured, and
/// substituted as the JSON-serialized record.
pub async fn resolve_job_description(llm: &LlmClient, input: &str) -> Result<String, AppError> {
    let Some(url) = find_url(input) else {
        info!("No URL found in job description input, using text verbatim");
        return Ok(input.to_string());
    };

    info!(url = %url, "URL extracted from job description input");
    let job_text = fetch_job_page(url).await?;
    let record = structure_job(llm, &job_text).await?;

    serde_json::to_string(&record)
        .map_err(|e| AppError::Structuring(format!("Failed to serialize job record: {e}")))
}

fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let body = Selector::parse("body").expect("valid selector");

    let mut parts: Vec<String> = document
        .select(&body)
        .map(|element| {
            element
                .text()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|s| !s.is_empty())
        .collect();

    // Fallback for fragments without a body element.
    if parts.is_empty() {
        let all_text = document
            .root_element()
            .text()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if !all_text.is_empty() {
            parts.push(all_text);
        }
    }

    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_url_returns_first_match() {
        let input = "See posting at https://example.com/job/123 thanks";
        assert_eq!(find_url(input), Some("https://example.com/job/123"));
    }

    #[test]
    fn test_find_url_prefers_earliest_url() {
        let input = "http://first.example.com and https://second.example.com";
        assert_eq!(find_url(input), Some("http://first.example.com"));
    }

    #[test]
    fn test_find_url_none_without_url() {
        assert_eq!(find_url("Senior Engineer at Acme"), None);
        assert_eq!(find_url(""), None);
    }

    #[test]
    fn test_find_url_requires_protocol() {
        assert_eq!(find_url("visit example.com/jobs for details"), None);
    }

    #[tokio::test]
    async fn test_resolve_without_url_is_verbatim_and_offline() {
        // A client that would fail on any call; resolution must never touch it.
        let config = crate::config::Config {
            llm_provider: crate::llm_client::ProviderKind::Google,
            google_api_key: Some("test-key".into()),
            groq_api_key: None,
            data_storage_path: std::path::PathBuf::from("/tmp"),
            llm: crate::config::LlmSettings::default(),
            session_retention_hours: None,
            port: 8080,
            rust_log: "info".into(),
        };
        let llm = LlmClient::from_config(&config).unwrap();

        let input = "Senior Rust Engineer at Acme. 5+ years required.";
        let resolved = resolve_job_description(&llm, input).await.unwrap();
        assert_eq!(resolved, input);
    }

    #[test]
    fn test_html_to_text_strips_markup() {
        let html = "<html><body><h1>Rust Engineer</h1><p>Remote,\n  worldwide</p></body></html>";
        let text = html_to_text(html);
        assert!(text.contains("Rust Engineer"));
        assert!(text.contains("Remote"));
        assert!(!text.contains('<'));
    }

    #[test]
    fn test_html_to_text_handles_fragment_without_body() {
        let text = html_to_text("plain text only");
        assert!(text.contains("plain text only"));
    }

    #[test]
    fn test_job_record_deserializes_from_llm_shape() {
        let json = r#"{
            "title": "Senior Rust Engineer",
            "company": "Acme",
            "location": "Remote",
            "description": ["Build core services", "Own reliability"],
            "requirements": ["5+ years Rust", "Distributed systems"]
        }"#;
        let record: JobDescriptionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.title, "Senior Rust Engineer");
        assert_eq!(record.requirements.len(), 2);
    }
}
