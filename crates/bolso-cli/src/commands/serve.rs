//! Serve command

use std::path::Path;

use anyhow::Result;

use bolso_core::ai::CategorizerClient;
use bolso_server::{create_router, serve, ServerConfig};

use super::open_db;

pub async fn cmd_serve(
    db_path: &Path,
    host: &str,
    port: u16,
    token: Option<String>,
) -> Result<()> {
    let db = open_db(db_path)?;

    let categorizer = CategorizerClient::from_env();
    if categorizer.is_some() {
        println!("🤖 AI categorization backend configured");
    }

    let config = ServerConfig {
        require_auth: token.is_some(),
        api_tokens: token.into_iter().collect(),
        allowed_origins: vec![],
    };
    if config.require_auth {
        println!("🔐 Bearer-token authentication enabled");
    }

    println!("🚀 bolso server on http://{}:{}", host, port);

    let router = create_router(db, categorizer, config);
    serve(router, host, port).await
}
