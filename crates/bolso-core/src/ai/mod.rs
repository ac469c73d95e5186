//! Pluggable categorization backends
//!
//! The categorization oracle is consumed as an opaque text-in/JSON-out
//! service: it receives normalized statement rows plus the user's category
//! list and returns a label and income/expense direction per row. Backends
//! run locally (Ollama) or in-process (mock); everything degrades
//! gracefully when no backend is configured.
//!
//! # Architecture
//!
//! - `CategorizerBackend` trait: the interface every backend implements
//! - `CategorizerClient` enum: concrete wrapper providing Clone +
//!   compile-time dispatch
//! - Backend implementations: `OllamaBackend`, `MockBackend`
//!
//! # Configuration
//!
//! Environment variables:
//! - `BOLSO_AI_BACKEND`: Backend to use (ollama, mock). Default: ollama
//! - `OLLAMA_HOST`: Ollama server URL (required for ollama backend)
//! - `OLLAMA_MODEL`: Model name (default: llama3.2)

mod mock;
mod ollama;
pub mod parsing;
pub mod types;

pub use mock::MockBackend;
pub use ollama::OllamaBackend;
pub use types::{fallback_categorization, RowCategorization};

use async_trait::async_trait;

use crate::error::Result;
use crate::models::ParsedStatementRow;

/// Trait defining the interface for categorization backends
#[async_trait]
pub trait CategorizerBackend: Send + Sync {
    /// Assign a category and direction to each statement row
    ///
    /// Must return exactly one entry per input row, aligned by index.
    async fn categorize_rows(
        &self,
        rows: &[ParsedStatementRow],
        categories: &[String],
    ) -> Result<Vec<RowCategorization>>;

    /// Whether the backend is reachable
    async fn health_check(&self) -> bool;
}

/// Concrete categorizer wrapper with compile-time dispatch
#[derive(Clone)]
pub enum CategorizerClient {
    Ollama(OllamaBackend),
    Mock(MockBackend),
}

impl CategorizerClient {
    /// Create from environment variables, or None when nothing is configured
    pub fn from_env() -> Option<Self> {
        let backend = std::env::var("BOLSO_AI_BACKEND").unwrap_or_else(|_| "ollama".to_string());
        match backend.as_str() {
            "mock" => Some(Self::Mock(MockBackend::new())),
            _ => OllamaBackend::from_env().map(Self::Ollama),
        }
    }

    pub async fn categorize_rows(
        &self,
        rows: &[ParsedStatementRow],
        categories: &[String],
    ) -> Result<Vec<RowCategorization>> {
        match self {
            Self::Ollama(backend) => backend.categorize_rows(rows, categories).await,
            Self::Mock(backend) => backend.categorize_rows(rows, categories).await,
        }
    }

    pub async fn health_check(&self) -> bool {
        match self {
            Self::Ollama(backend) => backend.health_check().await,
            Self::Mock(backend) => backend.health_check().await,
        }
    }
}
