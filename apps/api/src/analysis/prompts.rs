// All LLM prompt constants for the Analysis module.

/// System prompt for resume rating — enforces JSON-only output.
pub const RATING_SYSTEM: &str = "You are an expert career coach and hiring analyst. \
    Evaluate how well a resume matches a specific job description. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Textual description of the rating schema, embedded into the rating prompt
/// and into the repair prompt.
pub const RATING_FORMAT_INSTRUCTIONS: &str = r#"Return a JSON object with this EXACT schema (no extra fields):
{
  "overall_score": <number 0-100>,
  "score_description": "<one-sentence summary of the match>",
  "skills_match": {"<sub-criterion>": <number 0-100>, ...},
  "experience_match": {"<sub-criterion>": <number 0-100>, ...},
  "education_match": {"<sub-criterion>": <number 0-100>, ...},
  "job_compliance": {"<sub-criterion>": <number 0-100>, ...},
  "additional_points": ["<strength>", ...],
  "improvements": ["<area for improvement>", ...]
}
All four match fields MUST be present and MUST be objects, even if empty."#;

/// Rating prompt template. Replace `{format_instructions}`,
/// `{job_description}` and `{resume_text}` before sending.
pub const RATING_PROMPT_TEMPLATE: &str = r#"Your task is to evaluate how well a given resume matches a specific job description.

Return ONLY valid JSON that exactly matches the provided schema — no extra text, explanations, or commentary.

{format_instructions}

Analyze based on:
1. Skills match: Identify matching skills and missing skills compared to the job description.
2. Experience relevance: How well past roles and achievements align with the job requirements.
3. Education & certifications: Relevance to the role.
4. Overall suitability score: A numeric score from 0 to 100, where 100 means a perfect match.
5. Scopes for improvement: List of areas for improvement to match the job description.

INPUTS:
Job Description:

{job_description}

Resume Text:

{resume_text}

INSTRUCTIONS:
- Compare the resume only against the job description provided.
- Be strict but fair — missing critical requirements should lower the score significantly.
- Ensure your reasoning is clear in the JSON fields.
- For skills_match, experience_match, education_match, and job_compliance, provide detailed breakdowns with scores for each category.
- Do not output anything except the JSON response.

EXAMPLE STRUCTURE:
{
  "overall_score": 75,
  "score_description": "Good match with some areas for improvement",
  "skills_match": {
    "Technical Skills": 80,
    "Soft Skills": 70,
    "Industry Knowledge": 60
  },
  "experience_match": {
    "Relevant Experience": 85,
    "Leadership Experience": 70,
    "Project Management": 60
  },
  "education_match": {
    "Degree Level": 90,
    "Field of Study": 80,
    "Certifications": 70
  },
  "job_compliance": {
    "Required Skills": 75,
    "Experience Level": 80,
    "Education Requirements": 85
  },
  "additional_points": [
    "Strong technical background",
    "Relevant project experience"
  ],
  "improvements": [
    "Add more specific examples of leadership",
    "Include relevant certifications"
  ]
}"#;

/// Repair prompt for the self-fixing pass. Replace `{format_instructions}`
/// and `{completion}` before sending. Used at most once per rating request.
pub const RATING_FIX_PROMPT_TEMPLATE: &str = r#"The following output was supposed to satisfy this schema but failed validation.

{format_instructions}

MALFORMED OUTPUT:
{completion}

Correct the output so it is strictly valid JSON matching the schema above.
Preserve the original scores and wording wherever they are usable.
Return ONLY the corrected JSON object."#;

/// System prompt for job description extraction — enforces JSON-only output.
pub const JOB_EXTRACT_SYSTEM: &str = "You are an expert job description analyst. \
    Extract structured job details from scraped posting text. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Job extraction prompt template. Replace `{job_text}` before sending.
pub const JOB_EXTRACT_PROMPT_TEMPLATE: &str = r#"Extract job details from the following text:

{job_text}

Return a JSON object with this EXACT schema (no extra fields):
{
  "title": "<job title>",
  "company": "<company name>",
  "location": "<location>",
  "description": ["<description line>", ...],
  "requirements": ["<requirement>", ...]
}
Use an empty string or empty list for fields the text does not mention."#;
