use crate::cli::Args;
use crate::error::ApiError;
use crate::mail::{ create_mailer, templates, EmailMessage, EmailProvider, Mailer };
use crate::models::contact::{
    ContactForm,
    ContactReceipt,
    ContactRecord,
    ContactSubmission,
    RequestMetadata,
};
use crate::storage::{ create_contact_store, ContactStore };

use axum::http::HeaderMap;
use chrono::Utc;
use log::{ error, info, warn };
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::sync::Arc;

pub const REQUIRED_FIELDS_ERROR: &str = "Name, email, and message are required";
pub const INVALID_EMAIL_ERROR: &str = "Invalid email address";
pub const RECEIVED_MESSAGE: &str = "Thank you for your message! I'll get back to you soon.";

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static regex compile"));

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Checks the required fields in order and normalizes the rest of the form.
pub fn validate(form: ContactForm) -> Result<ContactSubmission, ApiError> {
    let required = |v: &Option<String>| v.clone().filter(|s| !s.is_empty());
    let (Some(name), Some(email), Some(message)) = (
        required(&form.name),
        required(&form.email),
        required(&form.message),
    ) else {
        return Err(ApiError::BadRequest(REQUIRED_FIELDS_ERROR.to_string()));
    };

    if !is_valid_email(&email) {
        return Err(ApiError::BadRequest(INVALID_EMAIL_ERROR.to_string()));
    }

    Ok(ContactSubmission::normalize(name, email, message, form))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Best-effort caller details taken from proxy and browser headers.
pub fn request_metadata(headers: &HeaderMap) -> RequestMetadata {
    let ip_address = header_str(headers, "x-forwarded-for")
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .or_else(|| header_str(headers, "x-real-ip"))
        .unwrap_or("unknown")
        .to_string();

    RequestMetadata {
        ip_address,
        user_agent: header_str(headers, "user-agent").unwrap_or("unknown").to_string(),
        referrer: header_str(headers, "referer").map(str::to_string),
        received_at: Utc::now(),
    }
}

fn temporary_id() -> String {
    format!("temp-{}", Utc::now().timestamp_millis())
}

/// Accepts contact form submissions. Storage and email are best effort: once
/// a submission validates, the caller is always told it was received.
pub struct ContactHandler {
    store: Arc<dyn ContactStore>,
    mailer: Mailer,
    mail_from: String,
    notify_email: String,
}

impl ContactHandler {
    pub fn new(
        store: Arc<dyn ContactStore>,
        mailer: Mailer,
        mail_from: impl Into<String>,
        notify_email: impl Into<String>
    ) -> Self {
        Self {
            store,
            mailer,
            mail_from: mail_from.into(),
            notify_email: notify_email.into(),
        }
    }

    pub fn from_args(args: &Args) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let store = create_contact_store(args)?;
        let mailer = create_mailer(args)?;
        info!("Contact notifications go to: {}", args.notify_email);
        Ok(Self::new(store, mailer, args.mail_from.clone(), args.notify_email.clone()))
    }

    pub async fn handle(
        &self,
        form: ContactForm,
        metadata: RequestMetadata
    ) -> Result<ContactReceipt, ApiError> {
        let submission = validate(form)?;

        let record = ContactRecord::new(&submission, &metadata);
        let id = match self.store.insert(&record).await {
            Ok(Some(id)) => id,
            Ok(None) => temporary_id(),
            Err(e) => {
                error!("Failed to store contact submission from {}: {}", submission.email, e);
                temporary_id()
            }
        };
        info!("Contact submission {} received ({} inquiry)", id, submission.inquiry_type);

        let provider = self.mailer.select();
        let email_sent = match &provider {
            Some(provider) => {
                let sent = match
                    templates::notification(&submission, &metadata, &self.mail_from, &self.notify_email)
                {
                    Ok(notification) => deliver(provider.as_ref(), &notification).await,
                    Err(e) => Err(e.into()),
                };
                match sent {
                    Ok(()) => true,
                    Err(e) => {
                        error!("Failed to send contact notification via {}: {}", provider.name(), e);
                        false
                    }
                }
            }
            None => {
                warn!("No email provider configured. Skipping notification for {}", id);
                false
            }
        };

        if email_sent {
            if let Some(provider) = &provider {
                let sent = match templates::acknowledgment(&submission, &self.mail_from) {
                    Ok(ack) => deliver(provider.as_ref(), &ack).await,
                    Err(e) => Err(e.into()),
                };
                if let Err(e) = sent {
                    error!("Failed to send acknowledgment via {}: {}", provider.name(), e);
                }
            }
        }

        Ok(ContactReceipt {
            success: true,
            message: RECEIVED_MESSAGE.to_string(),
            id,
            email_sent,
        })
    }
}

async fn deliver(
    provider: &dyn EmailProvider,
    message: &EmailMessage
) -> Result<(), Box<dyn Error + Send + Sync>> {
    provider.send(message).await?;
    info!("Sent '{}' via {}", message.subject, provider.name());
    Ok(())
}
