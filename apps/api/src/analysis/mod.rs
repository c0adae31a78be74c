//! Analysis — the resume scoring pipeline: job resolution, LLM rating, and
//! the `/rater` handler that drives them.

pub mod handlers;
pub mod job_resolver;
pub mod prompts;
pub mod rater;
