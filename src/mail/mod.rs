mod resend;
mod smtp;
pub mod templates;

pub use resend::ResendProvider;
pub use smtp::SmtpProvider;

use crate::cli::{ configured, Args };
use async_trait::async_trait;
use log::info;
use std::error::Error;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub html: String,
    pub text: String,
}

#[async_trait]
pub trait EmailProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Whether the credentials this provider needs are present.
    fn is_configured(&self) -> bool;

    async fn send(&self, message: &EmailMessage) -> Result<(), Box<dyn Error + Send + Sync>>;
}

/// Email providers in priority order. Only the first configured provider is
/// ever used for a given message; a failed send is not retried elsewhere.
#[derive(Clone, Default)]
pub struct Mailer {
    providers: Vec<Arc<dyn EmailProvider>>,
}

impl Mailer {
    pub fn new(providers: Vec<Arc<dyn EmailProvider>>) -> Self {
        Self { providers }
    }

    pub fn select(&self) -> Option<Arc<dyn EmailProvider>> {
        self.providers.iter().find(|p| p.is_configured()).cloned()
    }

    pub fn provider_names(&self) -> Vec<String> {
        self.providers
            .iter()
            .map(|p| {
                let state = if p.is_configured() { "configured" } else { "not configured" };
                format!("{} ({})", p.name(), state)
            })
            .collect()
    }
}

pub fn create_mailer(args: &Args) -> Result<Mailer, Box<dyn Error + Send + Sync>> {
    let resend = ResendProvider::new(
        configured(&args.resend_api_key).map(str::to_string),
        args.resend_base_url.clone()
    )?;

    let smtp = match (
        configured(&args.smtp_host),
        configured(&args.smtp_user),
        configured(&args.smtp_pass),
    ) {
        (Some(host), Some(user), Some(pass)) =>
            SmtpProvider::new(host, args.smtp_port, user.to_string(), pass.to_string())?,
        _ => SmtpProvider::unconfigured(),
    };

    let providers: Vec<Arc<dyn EmailProvider>> = vec![Arc::new(resend), Arc::new(smtp)];
    let mailer = Mailer::new(providers);
    info!("Email providers: {}", mailer.provider_names().join(", "));
    Ok(mailer)
}
