use crate::assistant::ChatResolver;
use crate::cli::Args;
use crate::contact::{ request_metadata, ContactHandler };
use crate::error::ApiError;
use crate::models::chat::{ ChatReply, ChatRequest };
use crate::models::contact::{ ContactForm, ContactReceipt };

use std::error::Error;
use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::sync::Arc;
use axum::{
    body::Bytes,
    extract::{ Request, State },
    http::HeaderMap,
    middleware::{ self, Next },
    response::{ IntoResponse, Response },
    routing::{ get, post },
    Json,
    Router,
};
use governor::{ RateLimiter, Quota, state::{ InMemoryState, NotKeyed }, clock::DefaultClock };
use serde_json::json;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{ Any, CorsLayer };
use log::{ info, warn, error };

pub const CONTACT_FAILURE: &str = "Failed to process contact form";
pub const CHAT_FAILURE: &str = "Failed to process message";

type RequestLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

#[derive(Clone)]
pub struct AppState {
    pub contact: Arc<ContactHandler>,
    pub chat: Arc<ChatResolver>,
}

impl AppState {
    pub fn new(contact: ContactHandler, chat: ChatResolver) -> Self {
        Self {
            contact: Arc::new(contact),
            chat: Arc::new(chat),
        }
    }
}

/// Builds the API router. `rate_limit_per_second` of 0 disables throttling.
pub fn router(state: AppState, rate_limit_per_second: u32) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app = Router::new()
        .route(
            "/api/contact",
            post(contact_handler).layer(CatchPanicLayer::custom(contact_panic))
        )
        .route("/api/ai/chat", post(chat_handler).layer(CatchPanicLayer::custom(chat_panic)))
        .route("/api/health", get(health_handler))
        .with_state(state);

    if let Some(per_second) = NonZeroU32::new(rate_limit_per_second) {
        let limiter: Arc<RequestLimiter> = Arc::new(RateLimiter::direct(Quota::per_second(per_second)));
        app = app.layer(middleware::from_fn_with_state(limiter, rate_limit));
    }

    app.layer(cors)
}

pub async fn start_http_server(
    addr: &str,
    state: AppState,
    args: &Args,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let addr = addr.parse::<SocketAddr>()?;
    let app = router(state, args.rate_limit_per_second);

    if args.enable_tls {
        let (cert_path, key_path) = match (&args.tls_cert_path, &args.tls_key_path) {
            (Some(cert_path), Some(key_path)) => (cert_path, key_path),
            (Some(_), None) | (None, Some(_)) => {
                error!("Both --tls-cert-path and --tls-key-path must be provided to enable TLS.");
                return Err("Missing TLS certificate or key path".into());
            }
            (None, None) => {
                error!("--enable-tls was set but no certificate/key paths provided.");
                return Err("TLS enabled without cert/key".into());
            }
        };
        info!(
            "TLS enabled. Loading certificate from '{}' and key from '{}'",
            cert_path,
            key_path
        );
        let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(
            cert_path,
            key_path
        ).await?;

        info!("Starting HTTPS API server on: https://{}", addr);
        axum_server::bind_rustls(addr, tls_config)
            .serve(app.into_make_service())
            .await?;
    } else {
        let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
            format!("Failed to bind HTTP server to {}: {}. Try a different port.", addr, e)
        })?;
        info!("Starting HTTP API server on: http://{}", addr);
        axum::serve(listener, app.into_make_service())
            .with_graceful_shutdown(shutdown_signal())
            .await?;
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, draining connections");
}

async fn rate_limit(
    State(limiter): State<Arc<RequestLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    if limiter.check().is_err() {
        warn!("Request rate limit exceeded for {}", request.uri().path());
        return ApiError::RateLimited.into_response();
    }
    next.run(request).await
}

async fn contact_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ContactReceipt>, ApiError> {
    let form: ContactForm = serde_json::from_slice(&body).map_err(|e| {
        error!("Contact form body could not be parsed: {}", e);
        ApiError::Internal(CONTACT_FAILURE.to_string())
    })?;

    let receipt = state.contact.handle(form, request_metadata(&headers)).await?;
    Ok(Json(receipt))
}

async fn chat_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ChatReply>, ApiError> {
    let request: ChatRequest = serde_json::from_slice(&body).map_err(|e| {
        error!("Chat request body could not be parsed: {}", e);
        ApiError::Internal(CHAT_FAILURE.to_string())
    })?;

    let message = request.message.as_deref().unwrap_or("");
    let reply = state.chat.resolve(message, &request.history).await?;
    Ok(Json(reply))
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

fn contact_panic(_: Box<dyn std::any::Any + Send + 'static>) -> Response {
    error!("Contact handler panicked");
    ApiError::Internal(CONTACT_FAILURE.to_string()).into_response()
}

fn chat_panic(_: Box<dyn std::any::Any + Send + 'static>) -> Response {
    error!("Chat handler panicked");
    ApiError::Internal(CHAT_FAILURE.to_string()).into_response()
}
