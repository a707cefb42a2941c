#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::{ to_bytes, Body };
use axum::http::{ Request, StatusCode };
use axum::Router;
use portfolio_server::assistant::ChatResolver;
use portfolio_server::contact::ContactHandler;
use portfolio_server::llm::chat::{ ChatClient, CompletionRequest, CompletionResponse };
use portfolio_server::mail::{ EmailMessage, EmailProvider, Mailer };
use portfolio_server::models::contact::ContactRecord;
use portfolio_server::server::{ router, AppState };
use portfolio_server::storage::{ ContactStore, MemoryContactStore };
use serde_json::Value;
use std::error::Error;
use std::sync::atomic::{ AtomicUsize, Ordering };
use std::sync::{ Arc, Mutex };
use tower::ServiceExt;

pub const OPERATOR: &str = "owner@example.com";
pub const SENDER: &str = "Portfolio <noreply@example.com>";

/// Email provider that records every message it is asked to send.
pub struct RecordingProvider {
    pub name: &'static str,
    pub configured: bool,
    /// Calls at or after this index fail.
    pub fail_from: Option<usize>,
    pub sent: Mutex<Vec<EmailMessage>>,
    calls: AtomicUsize,
}

impl RecordingProvider {
    pub fn new(name: &'static str, configured: bool, fail_from: Option<usize>) -> Arc<Self> {
        Arc::new(Self {
            name,
            configured,
            fail_from,
            sent: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailProvider for RecordingProvider {
    fn name(&self) -> &str {
        self.name
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn send(&self, message: &EmailMessage) -> Result<(), Box<dyn Error + Send + Sync>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_from.is_some_and(|n| call >= n) {
            return Err(format!("{} is down", self.name).into());
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

/// Store that counts inserts and either fails or delegates to memory.
pub struct CountingStore {
    pub fail: bool,
    pub inserts: AtomicUsize,
    pub inner: MemoryContactStore,
}

impl CountingStore {
    pub fn new(fail: bool) -> Arc<Self> {
        Arc::new(Self { fail, inserts: AtomicUsize::new(0), inner: MemoryContactStore::new() })
    }

    pub fn inserts(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContactStore for CountingStore {
    async fn insert(
        &self,
        record: &ContactRecord
    ) -> Result<Option<String>, Box<dyn Error + Send + Sync>> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err("database unreachable".into());
        }
        self.inner.insert(record).await
    }
}

/// Completion client returning a canned reply or error.
pub struct FakeChatClient {
    pub reply: Result<String, String>,
    pub requests: Mutex<Vec<CompletionRequest>>,
}

impl FakeChatClient {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self { reply: Ok(text.to_string()), requests: Mutex::new(Vec::new()) })
    }

    pub fn failing(error: &str) -> Arc<Self> {
        Arc::new(Self { reply: Err(error.to_string()), requests: Mutex::new(Vec::new()) })
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatClient for FakeChatClient {
    async fn complete(
        &self,
        request: &CompletionRequest
    ) -> Result<CompletionResponse, Box<dyn Error + Send + Sync>> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.reply {
            Ok(text) => Ok(CompletionResponse { response: text.clone() }),
            Err(e) => Err(e.clone().into()),
        }
    }

    fn get_model(&self) -> String {
        "fake".to_string()
    }

    fn get_base_url(&self) -> Option<String> {
        None
    }
}

pub fn mailer(providers: &[Arc<RecordingProvider>]) -> Mailer {
    Mailer::new(
        providers
            .iter()
            .map(|p| p.clone() as Arc<dyn EmailProvider>)
            .collect()
    )
}

pub fn contact_handler(store: Arc<dyn ContactStore>, mailer: Mailer) -> ContactHandler {
    ContactHandler::new(store, mailer, SENDER, OPERATOR)
}

pub fn app(contact: ContactHandler, chat: ChatResolver) -> Router {
    router(AppState::new(contact, chat), 0)
}

pub fn chat_app(client: Option<Arc<dyn ChatClient>>) -> Router {
    let contact = contact_handler(Arc::new(MemoryContactStore::new()), Mailer::default());
    app(contact, ChatResolver::new(client, "You are a test assistant."))
}

pub fn contact_app(store: Arc<dyn ContactStore>, mailer: Mailer) -> Router {
    app(contact_handler(store, mailer), ChatResolver::new(None, "unused"))
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

pub async fn post_json(app: &Router, path: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}
