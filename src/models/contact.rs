use super::{ lenient_text, scalar_text };
use chrono::{ DateTime, Utc };
use log::warn;
use serde::{ Deserialize, Deserializer, Serialize };
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InquiryType {
    #[default]
    General,
    Recruitment,
    Consultation,
    Collaboration,
    Speaking,
}

impl InquiryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InquiryType::General => "general",
            InquiryType::Recruitment => "recruitment",
            InquiryType::Consultation => "consultation",
            InquiryType::Collaboration => "collaboration",
            InquiryType::Speaking => "speaking",
        }
    }

    /// Noun used by the acknowledgment email ("your opportunity", "your project", ...).
    pub fn acknowledgment_label(&self) -> &'static str {
        match self {
            InquiryType::Recruitment => "opportunity",
            InquiryType::Consultation => "project",
            _ => "inquiry",
        }
    }
}

impl fmt::Display for InquiryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InquiryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "general" => Ok(InquiryType::General),
            "recruitment" => Ok(InquiryType::Recruitment),
            "consultation" => Ok(InquiryType::Consultation),
            "collaboration" => Ok(InquiryType::Collaboration),
            "speaking" => Ok(InquiryType::Speaking),
            _ => Err(format!("Invalid inquiry type: '{}'", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Immediate,
    #[default]
    Planning,
    Exploratory,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Immediate => "immediate",
            Urgency::Planning => "planning",
            Urgency::Exploratory => "exploratory",
        }
    }
}

impl FromStr for Urgency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "immediate" => Ok(Urgency::Immediate),
            "planning" => Ok(Urgency::Planning),
            "exploratory" => Ok(Urgency::Exploratory),
            _ => Err(format!("Invalid urgency: '{}'", s)),
        }
    }
}

/// Contact form body exactly as the UI posts it. Nothing is validated yet,
/// and fields of an unexpected shape read as absent rather than failing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactForm {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub company: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub inquiry_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub technologies_of_interest: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub project_budget: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub timeline: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub urgency: Option<String>,
}

/// Accepts a JSON list or a comma-separated string. Non-scalar list items
/// are skipped.
fn lenient_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
    where D: Deserializer<'de>
{
    let list = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => Some(items.into_iter().filter_map(scalar_text).collect()),
        Some(Value::String(joined)) =>
            Some(
                joined
                    .split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(str::to_string)
                    .collect()
            ),
        _ => None,
    };
    Ok(list)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub inquiry_type: InquiryType,
    pub message: String,
    pub technologies_of_interest: Vec<String>,
    pub project_budget: Option<String>,
    pub timeline: Option<String>,
    pub urgency: Urgency,
}

impl ContactSubmission {
    /// Builds a submission from already-checked required fields, applying
    /// defaults to everything optional.
    pub fn normalize(name: String, email: String, message: String, form: ContactForm) -> Self {
        let inquiry_type = match form.inquiry_type.as_deref() {
            None | Some("") => InquiryType::default(),
            Some(raw) =>
                raw.parse().unwrap_or_else(|e| {
                    warn!("{}, using general", e);
                    InquiryType::default()
                }),
        };
        let urgency = match form.urgency.as_deref() {
            None | Some("") => Urgency::default(),
            Some(raw) =>
                raw.parse().unwrap_or_else(|e| {
                    warn!("{}, using planning", e);
                    Urgency::default()
                }),
        };

        Self {
            name,
            email,
            company: non_empty(form.company),
            inquiry_type,
            message,
            technologies_of_interest: form.technologies_of_interest.unwrap_or_default(),
            project_budget: non_empty(form.project_budget),
            timeline: non_empty(form.timeline),
            urgency,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestMetadata {
    pub ip_address: String,
    pub user_agent: String,
    pub referrer: Option<String>,
    pub received_at: DateTime<Utc>,
}

impl RequestMetadata {
    pub fn unknown() -> Self {
        Self {
            ip_address: "unknown".to_string(),
            user_agent: "unknown".to_string(),
            referrer: None,
            received_at: Utc::now(),
        }
    }
}

/// Row written to the contact store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactRecord {
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub inquiry_type: InquiryType,
    pub message: String,
    pub technologies_of_interest: Vec<String>,
    pub project_budget: Option<String>,
    pub timeline: Option<String>,
    pub urgency: Urgency,
    pub ip_address: String,
    pub user_agent: String,
    pub referrer: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl ContactRecord {
    pub fn new(submission: &ContactSubmission, metadata: &RequestMetadata) -> Self {
        Self {
            name: submission.name.clone(),
            email: submission.email.clone(),
            company: submission.company.clone(),
            inquiry_type: submission.inquiry_type,
            message: submission.message.clone(),
            technologies_of_interest: submission.technologies_of_interest.clone(),
            project_budget: submission.project_budget.clone(),
            timeline: submission.timeline.clone(),
            urgency: submission.urgency,
            ip_address: metadata.ip_address.clone(),
            user_agent: metadata.user_agent.clone(),
            referrer: metadata.referrer.clone(),
            status: "new".to_string(),
            created_at: metadata.received_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactReceipt {
    pub success: bool,
    pub message: String,
    pub id: String,
    pub email_sent: bool,
}
