use async_trait::async_trait;
use log::debug;
use reqwest::Client as HttpClient;
use serde::{ Deserialize, Serialize };
use std::error::Error;

use super::{ EmailMessage, EmailProvider };

/// Transactional email over the Resend HTTP API.
pub struct ResendProvider {
    http: HttpClient,
    api_key: Option<String>,
    base_url: String,
}

#[derive(Serialize)]
struct ResendEmail<'a> {
    from: &'a str,
    to: Vec<&'a str>,
    subject: &'a str,
    html: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
}

#[derive(Deserialize)]
struct ResendResponse {
    id: Option<String>,
}

impl ResendProvider {
    pub fn new(
        api_key: Option<String>,
        base_url: String
    ) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let http = HttpClient::builder()
            .build()
            .map_err(|e| Box::new(e) as Box<dyn Error + Send + Sync>)?;
        Ok(Self { http, api_key, base_url })
    }
}

#[async_trait]
impl EmailProvider for ResendProvider {
    fn name(&self) -> &str {
        "resend"
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn send(&self, message: &EmailMessage) -> Result<(), Box<dyn Error + Send + Sync>> {
        let api_key = self.api_key.as_deref().ok_or("Resend API key is not configured")?;
        let url = format!("{}/emails", self.base_url.trim_end_matches('/'));

        let body = ResendEmail {
            from: &message.from,
            to: vec![message.to.as_str()],
            subject: &message.subject,
            html: &message.html,
            text: &message.text,
            reply_to: message.reply_to.as_deref(),
        };

        let resp = self.http
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json::<ResendResponse>()
            .await?;

        debug!("Resend accepted email to {} (id={:?})", message.to, resp.id);
        Ok(())
    }
}
