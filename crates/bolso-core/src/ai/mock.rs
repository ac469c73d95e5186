//! Mock backend for testing
//!
//! Keyword-table categorizer. Useful for unit tests and offline use
//! without a running LLM server.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{ParsedStatementRow, TransactionType};

use super::types::{fallback_categorization, RowCategorization};
use super::CategorizerBackend;

/// Mock categorizer backend
///
/// Returns predictable assignments from a fixed keyword table; everything
/// else falls back to the sign-derived default.
#[derive(Clone, Default)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
}

impl MockBackend {
    /// Create a new mock backend (healthy by default)
    pub fn new() -> Self {
        Self { healthy: true }
    }

    /// Create an unhealthy mock backend
    pub fn unhealthy() -> Self {
        Self { healthy: false }
    }

    fn categorize_one(row: &ParsedStatementRow) -> RowCategorization {
        let description = row.description.to_lowercase();

        let known: &[(&[&str], &str, TransactionType)] = &[
            (
                &["salário", "salario", "pagamento", "pix recebido"],
                "Renda",
                TransactionType::Income,
            ),
            (
                &["mercado", "supermercado", "padaria"],
                "Mercado",
                TransactionType::Expense,
            ),
            (
                &["ifood", "restaurante", "lanchonete"],
                "Alimentação",
                TransactionType::Expense,
            ),
            (
                &["uber", "99app", "99*", "metrô", "metro", "ônibus", "onibus"],
                "Transporte",
                TransactionType::Expense,
            ),
            (
                &["netflix", "spotify", "prime"],
                "Assinaturas",
                TransactionType::Expense,
            ),
            (
                &["aluguel", "condomínio", "condominio"],
                "Moradia",
                TransactionType::Expense,
            ),
            (
                &["farmácia", "farmacia", "drogaria"],
                "Saúde",
                TransactionType::Expense,
            ),
        ];

        for (keywords, category, tx_type) in known {
            if keywords.iter().any(|k| description.contains(k)) {
                return RowCategorization {
                    category: category.to_string(),
                    tx_type: *tx_type,
                };
            }
        }

        fallback_categorization(row)
    }
}

#[async_trait]
impl CategorizerBackend for MockBackend {
    async fn categorize_rows(
        &self,
        rows: &[ParsedStatementRow],
        _categories: &[String],
    ) -> Result<Vec<RowCategorization>> {
        Ok(rows.iter().map(Self::categorize_one).collect())
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(description: &str, amount: f64) -> ParsedStatementRow {
        ParsedStatementRow {
            date: "01/05/2024".to_string(),
            description: description.to_string(),
            amount,
            category: None,
            bank: None,
        }
    }

    #[tokio::test]
    async fn test_keyword_table() {
        let backend = MockBackend::new();
        let rows = vec![
            row("UBER *TRIP", -18.9),
            row("Supermercado Boa Compra", -230.0),
            row("Pix recebido - João", 150.0),
        ];

        let result = backend.categorize_rows(&rows, &[]).await.unwrap();

        assert_eq!(result.len(), 3);
        assert_eq!(result[0].category, "Transporte");
        assert_eq!(result[0].tx_type, TransactionType::Expense);
        assert_eq!(result[1].category, "Mercado");
        assert_eq!(result[2].category, "Renda");
        assert_eq!(result[2].tx_type, TransactionType::Income);
    }

    #[tokio::test]
    async fn test_unknown_falls_back_to_sign() {
        let backend = MockBackend::new();
        let rows = vec![row("Coisa qualquer", -10.0), row("Outra coisa", 10.0)];

        let result = backend.categorize_rows(&rows, &[]).await.unwrap();

        assert_eq!(result[0].category, "Outros");
        assert_eq!(result[0].tx_type, TransactionType::Expense);
        assert_eq!(result[1].tx_type, TransactionType::Income);
    }

    #[tokio::test]
    async fn test_statement_category_wins_fallback() {
        let backend = MockBackend::new();
        let mut r = row("Desconhecido", -10.0);
        r.category = Some("Lazer".to_string());

        let result = backend.categorize_rows(&[r], &[]).await.unwrap();
        assert_eq!(result[0].category, "Lazer");
    }

    #[tokio::test]
    async fn test_health() {
        assert!(MockBackend::new().health_check().await);
        assert!(!MockBackend::unhealthy().health_check().await);
    }
}
