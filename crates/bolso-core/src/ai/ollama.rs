//! Ollama backend implementation
//!
//! HTTP client for the Ollama generate API. The prompt lists the statement
//! rows and the user's category list; the model answers with a JSON array,
//! one entry per row.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::ParsedStatementRow;

use super::parsing::parse_row_categorizations;
use super::types::{fallback_categorization, RowCategorization};
use super::CategorizerBackend;

/// Ollama-backed categorizer
#[derive(Clone)]
pub struct OllamaBackend {
    http_client: Client,
    base_url: String,
    model: String,
}

impl OllamaBackend {
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Option<Self> {
        let host = std::env::var("OLLAMA_HOST").ok()?;
        let model = std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| "llama3.2".to_string());
        Some(Self::new(&host, &model))
    }

    fn build_prompt(rows: &[ParsedStatementRow], categories: &[String]) -> String {
        let mut prompt = String::from(
            "You are categorizing bank statement entries for a personal \
             finance tracker. For each numbered entry below, answer with a \
             JSON array (one object per entry, same order) of the form \
             {\"category\": \"...\", \"type\": \"income\"|\"expense\"}. \
             Answer with the JSON array only.\n",
        );

        if !categories.is_empty() {
            prompt.push_str(&format!(
                "Allowed categories: {}.\n",
                categories.join(", ")
            ));
        }

        prompt.push_str("\nEntries:\n");
        for (i, row) in rows.iter().enumerate() {
            prompt.push_str(&format!(
                "{}. {} (amount {:.2})\n",
                i + 1,
                row.description,
                row.amount
            ));
        }

        prompt
    }
}

/// Request to Ollama API
#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    stream: bool,
}

/// Response from Ollama API
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
}

#[async_trait]
impl CategorizerBackend for OllamaBackend {
    async fn categorize_rows(
        &self,
        rows: &[ParsedStatementRow],
        categories: &[String],
    ) -> Result<Vec<RowCategorization>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let request = OllamaRequest {
            model: self.model.clone(),
            prompt: Self::build_prompt(rows, categories),
            stream: false,
        };

        let response = self
            .http_client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Http(response.error_for_status().unwrap_err()));
        }

        let ollama_response: OllamaResponse = response.json().await?;
        debug!("Ollama response: {}", ollama_response.response);

        let mut parsed = parse_row_categorizations(&ollama_response.response)?;

        // models sometimes drop or invent entries; realign by index so the
        // caller always gets one categorization per row
        if parsed.len() != rows.len() {
            warn!(
                "Ollama returned {} categorizations for {} rows; realigning",
                parsed.len(),
                rows.len()
            );
            parsed.truncate(rows.len());
            while parsed.len() < rows.len() {
                parsed.push(fallback_categorization(&rows[parsed.len()]));
            }
        }

        Ok(parsed)
    }

    async fn health_check(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);
        match self.http_client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("Ollama health check failed: {}", e);
                false
            }
        }
    }
}
