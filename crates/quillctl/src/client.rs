//! HTTP plumbing for talking to the Playbooks API.
//!
//! Every `/api/*` route on the server is org-scoped, so each request
//! carries the `x-org-id` and `x-user-id` headers from the active
//! context (or the command-line overrides).

use anyhow::{Context, Result};
use reqwest::{Client, Response};

pub struct ApiClient {
    http: Client,
    base_url: String,
    org_id: String,
    user_id: String,
}

impl ApiClient {
    pub fn new(base_url: String, org_id: String, user_id: String) -> Self {
        Self {
            http: Client::new(),
            base_url,
            org_id,
            user_id,
        }
    }

    pub async fn get(&self, path: &str) -> Result<Response> {
        self.http
            .get(format!("{}{}", self.base_url, path))
            .header("x-org-id", &self.org_id)
            .header("x-user-id", &self.user_id)
            .send()
            .await
            .with_context(|| format!("Failed to send request: GET {}", path))
    }

    pub async fn post(&self, path: &str, body: &serde_json::Value) -> Result<Response> {
        self.http
            .post(format!("{}{}", self.base_url, path))
            .header("x-org-id", &self.org_id)
            .header("x-user-id", &self.user_id)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to send request: POST {}", path))
    }

    pub async fn put(&self, path: &str, body: &serde_json::Value) -> Result<Response> {
        self.http
            .put(format!("{}{}", self.base_url, path))
            .header("x-org-id", &self.org_id)
            .header("x-user-id", &self.user_id)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to send request: PUT {}", path))
    }
}

/// Print a successful response as pretty JSON, or report the error body
/// and exit non-zero so scripts can rely on the status code.
pub async fn print_response(response: Response) -> Result<()> {
    if response.status().is_success() {
        let result: serde_json::Value = response
            .json()
            .await
            .context("Failed to parse response body")?;
        println!("{}", serde_json::to_string_pretty(&result)?);
        Ok(())
    } else {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        eprintln!("Request failed: {} - {}", status, text);
        std::process::exit(1);
    }
}
