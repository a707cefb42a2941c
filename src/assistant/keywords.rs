//! Ordered first-match keyword tables used by the chat fallback.

/// One row of a classification table: the rule matches when the lowercased
/// message contains any of `keywords` as a substring.
#[derive(Debug, Clone, Copy)]
pub struct KeywordRule<T> {
    pub keywords: &'static [&'static str],
    pub result: T,
}

impl<T> KeywordRule<T> {
    pub fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k))
    }
}

/// Returns the result of the first rule matching `lowered`. Rules are not
/// disjoint, so table order decides.
pub fn classify<'a, T>(rules: &'a [KeywordRule<T>], lowered: &str) -> Option<&'a T> {
    rules.iter().find(|rule| rule.matches(lowered)).map(|rule| &rule.result)
}

pub const RAG_ANSWER: &str = "\
Retrieval-augmented generation is the core of my recent work. I've designed and shipped RAG \
platforms that index millions of enterprise documents, combining hybrid keyword and vector \
search, re-ranking and citation-grounded answers. A big part of that work is evaluation: \
measuring retrieval recall and answer faithfulness so the system can be tuned with evidence \
instead of guesswork. Check out the projects section for case studies.";

pub const EXPERIENCE_ANSWER: &str = "\
I have more than eight years of experience building production ML systems. Most recently \
I've led the team behind an enterprise RAG and document-intelligence platform. Before that \
I worked in data engineering and backend development, building pipelines and APIs that \
served millions of requests a day. The experience page has the full timeline.";

pub const SKILLS_ANSWER: &str = "\
My core skills span LLM application design, retrieval pipelines, vector databases and \
evaluation tooling, on top of a solid distributed-systems background. Day to day I write \
Python, Rust and TypeScript, and I deploy on AWS and GCP with the usual MLOps tooling for \
monitoring, experiment tracking and CI/CD.";

pub const RESEARCH_ANSWER: &str = "\
My research focuses on grounding and hallucination reduction in language models, retrieval \
evaluation and efficient inference. I've published peer-reviewed papers and workshop \
contributions in these areas, and I enjoy turning research results into systems people \
actually use. The publications page lists everything with links.";

pub const PROJECTS_ANSWER: &str = "\
Some projects I'm proud of: an enterprise document-search assistant with grounded \
citations, an evaluation harness for retrieval quality, and a low-latency inference \
service for domain-specific models. Each project on this site includes the problem, the \
architecture and the measured results.";

pub const EDUCATION_ANSWER: &str = "\
I hold an M.S. in Computer Science with a focus on machine learning. I keep learning \
through research collaborations, conference workshops and by building things in the open.";

pub const AVAILABILITY_ANSWER: &str = "\
I'm open to senior engineering roles, consulting engagements, research collaborations and \
speaking invitations. The best way to reach me is the contact form on this site; tell me a \
bit about what you have in mind and I'll get back to you soon. You can also download my \
resume for a quick overview.";

pub const DEFAULT_ANSWER: &str = "\
Thanks for your question! I'm happy to tell you about my work. You can ask me about my RAG \
and retrieval projects, my professional experience, my technical skills, my research and \
publications, my education, or how to work together.";

pub const FALLBACK_RULES: &[KeywordRule<&str>] = &[
    KeywordRule { keywords: &["rag", "retrieval"], result: RAG_ANSWER },
    KeywordRule { keywords: &["experience", "work", "career", "job"], result: EXPERIENCE_ANSWER },
    KeywordRule { keywords: &["skill", "technolog", "stack", "language"], result: SKILLS_ANSWER },
    KeywordRule { keywords: &["research", "publication", "paper"], result: RESEARCH_ANSWER },
    KeywordRule { keywords: &["project", "built", "portfolio"], result: PROJECTS_ANSWER },
    KeywordRule { keywords: &["education", "degree", "university", "study"], result: EDUCATION_ANSWER },
    KeywordRule { keywords: &["hire", "available", "opportunit", "contact"], result: AVAILABILITY_ANSWER },
];

pub const HIRING_ACTIONS: &[&str] = &["Download Resume", "Contact Me", "View Projects"];
pub const PROJECT_ACTIONS: &[&str] = &["View Projects", "See GitHub", "Discuss a Project"];
pub const RESEARCH_ACTIONS: &[&str] = &["View Publications", "Read Research", "Contact Me"];
pub const DEFAULT_ACTIONS: &[&str] = &["View Projects", "Read Publications", "Contact Me"];

pub const ACTION_RULES: &[KeywordRule<&[&str]>] = &[
    KeywordRule { keywords: &["hire", "opportunity"], result: HIRING_ACTIONS },
    KeywordRule { keywords: &["project"], result: PROJECT_ACTIONS },
    KeywordRule { keywords: &["research", "publication"], result: RESEARCH_ACTIONS },
];

pub fn fallback_answer(lowered: &str) -> &'static str {
    classify(FALLBACK_RULES, lowered).copied().unwrap_or(DEFAULT_ANSWER)
}

pub fn suggested_actions(lowered: &str) -> Vec<String> {
    classify(ACTION_RULES, lowered)
        .copied()
        .unwrap_or(DEFAULT_ACTIONS)
        .iter()
        .map(|a| a.to_string())
        .collect()
}
