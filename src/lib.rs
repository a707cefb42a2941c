pub mod assistant;
pub mod cli;
pub mod config;
pub mod contact;
pub mod error;
pub mod llm;
pub mod mail;
pub mod models;
pub mod server;
pub mod storage;

use assistant::ChatResolver;
use cli::Args;
use contact::ContactHandler;
use log::info;
use server::{ AppState, Server };
use std::error::Error;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("TLS Enabled: {}", args.enable_tls);
    info!("Rate Limit (req/s): {}", args.rate_limit_per_second);
    info!("Chat LLM Type: {}", args.chat_llm_type);
    info!("Prompts Path: {}", args.prompts_path.as_deref().unwrap_or("built-in"));
    info!("Contact Store Type: {}", args.store_type);
    info!("Notify Email: {}", args.notify_email);
    info!("Mail From: {}", args.mail_from);
    info!("-------------------------");

    let contact = ContactHandler::from_args(&args)?;
    let chat = ChatResolver::from_args(&args)?;
    info!(
        "Chat Replies: {}",
        if chat.has_completion_client() { "completion service with keyword fallback" } else { "keyword fallback only" }
    );

    let state = AppState::new(contact, chat);
    let server = Server::new(args.server_addr.clone(), state, args.clone());
    server.run().await?;

    Ok(())
}
