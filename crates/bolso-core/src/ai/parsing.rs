//! JSON parsing helpers for categorizer responses
//!
//! LLM responses often wrap the JSON payload in prose; these helpers cut
//! out the array before deserializing.

use crate::error::{Error, Result};

use super::types::RowCategorization;

/// Parse a JSON array of row categorizations from a model response
pub fn parse_row_categorizations(response: &str) -> Result<Vec<RowCategorization>> {
    let response = response.trim();

    let start = response.find('[');
    let end = response.rfind(']');

    match (start, end) {
        (Some(s), Some(e)) if s < e => {
            let json_str = &response[s..=e];
            serde_json::from_str(json_str).map_err(|e| {
                let truncated = if json_str.len() > 200 {
                    format!("{}...", &json_str[..200])
                } else {
                    json_str.to_string()
                };
                Error::InvalidData(format!("Invalid JSON from AI: {} | Raw: {}", e, truncated))
            })
        }
        _ => Err(Error::InvalidData(format!(
            "No JSON array found in AI response | Raw: {}",
            if response.len() > 200 {
                format!("{}...", &response[..200])
            } else {
                response.to_string()
            }
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionType;

    #[test]
    fn test_parse_clean_array() {
        let response = r#"[{"category":"Mercado","type":"expense"},{"category":"Renda","type":"income"}]"#;
        let rows = parse_row_categorizations(response).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].category, "Mercado");
        assert_eq!(rows[0].tx_type, TransactionType::Expense);
        assert_eq!(rows[1].tx_type, TransactionType::Income);
    }

    #[test]
    fn test_parse_array_wrapped_in_prose() {
        let response = "Here are the categories you asked for:\n[{\"category\":\"Lazer\",\"type\":\"expense\"}]\nLet me know if you need anything else.";
        let rows = parse_row_categorizations(response).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].category, "Lazer");
    }

    #[test]
    fn test_no_array_is_an_error() {
        assert!(parse_row_categorizations("no json here").is_err());
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(parse_row_categorizations(r#"[{"category": }]"#).is_err());
    }
}
