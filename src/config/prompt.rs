use std::error::Error;
use std::fmt;
use std::fs;
use log::info;

/// Biography and ground rules handed to the completion service with every chat turn.
pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are the assistant embedded in a personal portfolio website. You answer questions \
from visitors about the site owner, an AI engineer and researcher, in a warm and concise \
first-person voice, as if the owner were replying.

Background you may rely on:
- Over eight years building production machine-learning systems, most recently leading \
retrieval-augmented generation (RAG) platforms for enterprise document search.
- Earlier roles in data engineering and backend development, shipping services in Python, \
Rust and TypeScript.
- Core skills: LLM application design, retrieval pipelines, vector databases, evaluation \
tooling, distributed systems, cloud infrastructure (AWS, GCP), MLOps.
- Research interests: grounding and hallucination reduction, retrieval evaluation, \
efficient inference. Several peer-reviewed publications and workshop papers in these areas.
- M.S. in Computer Science with a focus on machine learning.
- Open to senior engineering roles, consulting engagements, research collaborations \
and speaking invitations.

Rules:
- Keep answers under 150 words unless the visitor asks for detail.
- Never invent employers, dates, metrics or publication titles that are not given above.
- When a visitor wants to hire, collaborate or book a talk, point them to the contact form.
- If a question is unrelated to the owner's work, answer briefly and steer back.";

#[derive(Debug)]
pub enum PromptError {
    Empty(String),
    IoError(std::io::Error),
}

impl fmt::Display for PromptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptError::Empty(path) => write!(f, "Prompt file '{}' is empty", path),
            PromptError::IoError(e) => write!(f, "Prompt file IO error: {}", e),
        }
    }
}

impl Error for PromptError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PromptError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PromptError {
    fn from(err: std::io::Error) -> Self {
        PromptError::IoError(err)
    }
}

/// Reads the system prompt from `path`, or returns the built-in one when no path is set.
pub fn load_system_prompt(path: Option<&str>) -> Result<String, PromptError> {
    let Some(path) = path.filter(|p| !p.trim().is_empty()) else {
        return Ok(DEFAULT_SYSTEM_PROMPT.to_string());
    };

    let content = fs::read_to_string(path)?;
    let prompt = content.trim();
    if prompt.is_empty() {
        return Err(PromptError::Empty(path.to_string()));
    }
    info!("Loaded system prompt from {} ({} chars)", path, prompt.len());
    Ok(prompt.to_string())
}
