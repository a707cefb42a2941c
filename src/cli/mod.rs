use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Server Args ---
    /// Host address and port for the HTTP server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:3000")]
    pub server_addr: String,

    /// Maximum accepted requests per second across all clients. 0 disables the limit.
    #[arg(long, env = "RATE_LIMIT_PER_SECOND", default_value = "10")]
    pub rate_limit_per_second: u32,

    /// Enable debug logging/output
    #[arg(long, env = "DEBUG", default_value = "false")]
    pub debug: bool,

    /// Optional path to the TLS certificate file (PEM format). Requires --tls-key-path.
    #[arg(long, env = "TLS_CERT_PATH")]
    pub tls_cert_path: Option<String>,

    /// Optional path to the TLS private key file (PEM format). Requires --tls-cert-path.
    #[arg(long, env = "TLS_KEY_PATH")]
    pub tls_key_path: Option<String>,

    #[arg(long, env = "ENABLE_TLS", default_value = "false")]
    pub enable_tls: bool,

    // --- Chat LLM Provider Args ---
    /// Type of LLM provider for chat completion (openai, groq)
    #[arg(long, env = "CHAT_LLM_TYPE", default_value = "openai")]
    pub chat_llm_type: String,

    /// Base URL for the Chat LLM provider API. Adapters pick their public endpoint when unset.
    #[arg(long, env = "CHAT_BASE_URL")]
    pub chat_base_url: Option<String>,

    /// API Key for the Chat LLM provider. Empty or placeholder keys disable the provider.
    #[arg(long, env = "CHAT_API_KEY", default_value = "")]
    pub chat_api_key: String,

    /// Model name for chat completion (e.g., gpt-4o-mini, llama-3.1-8b-instant)
    #[arg(long, env = "CHAT_MODEL")]
    pub chat_model: Option<String>,

    /// Optional text file replacing the built-in assistant system prompt.
    #[arg(long, env = "PROMPTS_PATH")]
    pub prompts_path: Option<String>,

    // --- Contact Store Args ---
    /// Contact submission store type (supabase, memory)
    #[arg(long, env = "STORE_TYPE", default_value = "supabase")]
    pub store_type: String,

    /// Supabase project URL (e.g., https://xyzcompany.supabase.co)
    #[arg(long, env = "SUPABASE_URL")]
    pub supabase_url: Option<String>,

    /// Supabase service or anon key used for inserts.
    #[arg(long, env = "SUPABASE_KEY")]
    pub supabase_key: Option<String>,

    /// Table receiving contact submissions.
    #[arg(long, env = "SUPABASE_TABLE", default_value = "contact_submissions")]
    pub supabase_table: String,

    // --- Email Provider Args ---
    /// Resend API key. When set, Resend is the primary notification provider.
    #[arg(long, env = "RESEND_API_KEY")]
    pub resend_api_key: Option<String>,

    /// Base URL for the Resend API.
    #[arg(long, env = "RESEND_BASE_URL", default_value = "https://api.resend.com")]
    pub resend_base_url: String,

    /// SMTP relay host for the secondary notification provider.
    #[arg(long, env = "SMTP_HOST")]
    pub smtp_host: Option<String>,

    /// SMTP port. 465 uses implicit TLS, anything else STARTTLS.
    #[arg(long, env = "SMTP_PORT", default_value = "587")]
    pub smtp_port: u16,

    #[arg(long, env = "SMTP_USER")]
    pub smtp_user: Option<String>,

    #[arg(long, env = "SMTP_PASS")]
    pub smtp_pass: Option<String>,

    /// Sender address used for every outgoing email.
    #[arg(long, env = "MAIL_FROM", default_value = "Portfolio Contact <onboarding@resend.dev>")]
    pub mail_from: String,

    /// Operator address receiving new-submission notifications.
    #[arg(long, env = "NOTIFY_EMAIL", default_value = "hello@example.com")]
    pub notify_email: String,
}

/// Treats unset and blank values the same way.
pub fn configured(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
}
