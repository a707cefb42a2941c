use async_trait::async_trait;
use lettre::message::{ header::ContentType, Mailbox, MultiPart, SinglePart };
use lettre::transport::smtp::authentication::Credentials;
use lettre::{ AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor };
use log::{ debug, warn };
use std::error::Error;

use super::{ EmailMessage, EmailProvider };

const IMPLICIT_TLS_PORT: u16 = 465;

/// Fallback provider relaying through an authenticated SMTP server.
pub struct SmtpProvider {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
}

impl SmtpProvider {
    pub fn new(
        host: &str,
        port: u16,
        user: String,
        pass: String
    ) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let builder = if port == IMPLICIT_TLS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?
        };
        let transport = builder.port(port).credentials(Credentials::new(user, pass)).build();
        Ok(Self { transport: Some(transport) })
    }

    pub fn unconfigured() -> Self {
        Self { transport: None }
    }
}

pub(crate) fn build_message(message: &EmailMessage) -> Result<Message, Box<dyn Error + Send + Sync>> {
    let mut builder = Message::builder()
        .from(message.from.parse::<Mailbox>()?)
        .to(message.to.parse::<Mailbox>()?)
        .subject(message.subject.as_str());
    if let Some(reply_to) = &message.reply_to {
        // Reply-To is a convenience; an unparseable one must not cost the email.
        match reply_to.parse::<Mailbox>() {
            Ok(mailbox) => {
                builder = builder.reply_to(mailbox);
            }
            Err(e) => warn!("Omitting Reply-To '{}': {}", reply_to, e),
        }
    }

    let body = MultiPart::alternative()
        .singlepart(
            SinglePart::builder().header(ContentType::TEXT_PLAIN).body(message.text.clone())
        )
        .singlepart(
            SinglePart::builder().header(ContentType::TEXT_HTML).body(message.html.clone())
        );
    Ok(builder.multipart(body)?)
}

#[async_trait]
impl EmailProvider for SmtpProvider {
    fn name(&self) -> &str {
        "smtp"
    }

    fn is_configured(&self) -> bool {
        self.transport.is_some()
    }

    async fn send(&self, message: &EmailMessage) -> Result<(), Box<dyn Error + Send + Sync>> {
        let transport = self.transport.as_ref().ok_or("SMTP credentials are not configured")?;
        let email = build_message(message)?;
        let response = transport.send(email).await?;
        debug!("SMTP accepted email to {} (code={})", message.to, response.code());
        Ok(())
    }
}
