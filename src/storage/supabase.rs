use async_trait::async_trait;
use log::debug;
use reqwest::header::{ HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE };
use reqwest::Client as HttpClient;
use serde_json::Value as JsonValue;
use std::error::Error;
use url::Url;

use crate::models::contact::ContactRecord;
use super::ContactStore;

/// Inserts rows through the PostgREST endpoint of a Supabase project.
pub struct SupabaseContactStore {
    http: HttpClient,
    endpoint: Url,
}

impl SupabaseContactStore {
    pub fn new(
        project_url: &str,
        api_key: &str,
        table: &str
    ) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let endpoint = table_endpoint(project_url, table)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("prefer", HeaderValue::from_static("return=representation"));
        headers.insert(
            "apikey",
            HeaderValue::from_str(api_key).map_err(|e| format!("Invalid Supabase key format: {}", e))?
        );
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|e| format!("Invalid Supabase key format: {}", e))?
        );

        let http = HttpClient::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| Box::new(e) as Box<dyn Error + Send + Sync>)?;

        Ok(Self { http, endpoint })
    }
}

fn table_endpoint(project_url: &str, table: &str) -> Result<Url, Box<dyn Error + Send + Sync>> {
    let base = Url::parse(&format!("{}/", project_url.trim_end_matches('/')))
        .map_err(|e| format!("Invalid Supabase URL '{}': {}", project_url, e))?;
    Ok(base.join(&format!("rest/v1/{}", table))?)
}

/// Reads `id` from the first row PostgREST echoes back. Numeric and uuid keys are both accepted.
fn returned_id(body: &JsonValue) -> Option<String> {
    let row = match body {
        JsonValue::Array(rows) => rows.first()?,
        other => other,
    };
    match row.get("id")? {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[async_trait]
impl ContactStore for SupabaseContactStore {
    async fn insert(
        &self,
        record: &ContactRecord
    ) -> Result<Option<String>, Box<dyn Error + Send + Sync>> {
        let body = self.http
            .post(self.endpoint.clone())
            .json(&[record])
            .send()
            .await?
            .error_for_status()?
            .json::<JsonValue>()
            .await?;

        let id = returned_id(&body);
        debug!("Stored contact submission (id={:?})", id);
        Ok(id)
    }
}
