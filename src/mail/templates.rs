use crate::models::contact::{ ContactSubmission, RequestMetadata };

use minijinja::{ context, Environment };
use once_cell::sync::Lazy;

use super::EmailMessage;

const NOTIFICATION_HTML: &str = r#"<h2>New contact form submission</h2>
<table>
{%- for label, value in fields %}
<tr><td><strong>{{ label }}:</strong></td><td>{{ value }}</td></tr>
{%- endfor %}
</table>
<h3>Message</h3>
<p style="white-space: pre-wrap">{{ message }}</p>
<hr>
<p><small>Received {{ received }} from {{ ip }} via {{ referrer }}</small></p>"#;

const NOTIFICATION_TEXT: &str = r#"New contact form submission

{% for label, value in fields -%}
{{ label }}: {{ value }}
{% endfor %}
Message:
{{ message }}

Received {{ received }} from {{ ip }} via {{ referrer }}"#;

const ACKNOWLEDGMENT_HTML: &str = r#"<h2>Thanks for reaching out, {{ name }}!</h2>
<p>I've received your message and appreciate you thinking of me for your {{ label }}.</p>
<p>I usually reply within two business days. If it's urgent, feel free to reply to this email with any extra details.</p>
<p>Best regards</p>"#;

const ACKNOWLEDGMENT_TEXT: &str = r#"Thanks for reaching out, {{ name }}!

I've received your message and appreciate you thinking of me for your {{ label }}.

I usually reply within two business days. If it's urgent, feel free to reply to this email with any extra details.

Best regards"#;

/// `.html` templates are autoescaped, `.txt` ones are not.
static TEMPLATES: Lazy<Environment<'static>> = Lazy::new(|| {
    let mut env = Environment::new();
    for (name, source) in [
        ("notification.html", NOTIFICATION_HTML),
        ("notification.txt", NOTIFICATION_TEXT),
        ("acknowledgment.html", ACKNOWLEDGMENT_HTML),
        ("acknowledgment.txt", ACKNOWLEDGMENT_TEXT),
    ] {
        env.add_template(name, source).expect("static template compile");
    }
    env
});

fn optional_fields(submission: &ContactSubmission) -> Vec<(&'static str, String)> {
    let mut fields = Vec::new();
    if let Some(company) = &submission.company {
        fields.push(("Company", company.clone()));
    }
    if !submission.technologies_of_interest.is_empty() {
        fields.push(("Technologies", submission.technologies_of_interest.join(", ")));
    }
    if let Some(budget) = &submission.project_budget {
        fields.push(("Budget", budget.clone()));
    }
    if let Some(timeline) = &submission.timeline {
        fields.push(("Timeline", timeline.clone()));
    }
    fields
}

/// Internal notification sent to the site operator for every accepted submission.
pub fn notification(
    submission: &ContactSubmission,
    metadata: &RequestMetadata,
    from: &str,
    operator: &str
) -> Result<EmailMessage, minijinja::Error> {
    let mut fields: Vec<(&str, String)> = vec![
        ("Name", submission.name.clone()),
        ("Email", submission.email.clone()),
        ("Inquiry type", submission.inquiry_type.to_string()),
        ("Urgency", submission.urgency.as_str().to_string())
    ];
    fields.extend(optional_fields(submission));

    let ctx = context! {
        fields => fields,
        message => &submission.message,
        received => metadata.received_at.to_rfc3339(),
        ip => &metadata.ip_address,
        referrer => metadata.referrer.as_deref().unwrap_or("direct"),
    };

    Ok(EmailMessage {
        from: from.to_string(),
        to: operator.to_string(),
        reply_to: Some(submission.email.clone()),
        subject: format!("New {} inquiry from {}", submission.inquiry_type, submission.name),
        html: TEMPLATES.get_template("notification.html")?.render(&ctx)?,
        text: TEMPLATES.get_template("notification.txt")?.render(&ctx)?,
    })
}

/// Thank-you note sent back to the submitter.
pub fn acknowledgment(
    submission: &ContactSubmission,
    from: &str
) -> Result<EmailMessage, minijinja::Error> {
    let ctx = context! {
        name => &submission.name,
        label => submission.inquiry_type.acknowledgment_label(),
    };

    Ok(EmailMessage {
        from: from.to_string(),
        to: submission.email.clone(),
        reply_to: None,
        subject: format!("Thanks for reaching out, {}!", submission.name),
        html: TEMPLATES.get_template("acknowledgment.html")?.render(&ctx)?,
        text: TEMPLATES.get_template("acknowledgment.txt")?.render(&ctx)?,
    })
}
