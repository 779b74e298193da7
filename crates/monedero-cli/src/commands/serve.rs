//! Server command implementation

use anyhow::Result;
use monedero_core::{AIClient, AIConfig, LedgerStore, PromptLibrary};
use monedero_server::ServerConfig;

pub async fn cmd_serve(store: LedgerStore, host: &str, port: u16) -> Result<()> {
    println!("🚀 Starting Monedero web server...");
    println!("   Ledger: {}", store.path().display());
    println!("   Listening: http://{}:{}", host, port);

    let ai = match AIClient::from_config(&AIConfig::from_env()) {
        Ok(client) => {
            let info = client.info();
            println!(
                "   Generation backend: {} ({}, model {})",
                info.backend, info.host, info.model
            );
            Some(client)
        }
        Err(e) => {
            println!("   ⚠️  {} - AI endpoints will return 503", e);
            None
        }
    };

    let config = ServerConfig::with_origins(
        &std::env::var("MONEDERO_ALLOWED_ORIGINS").unwrap_or_default(),
    );
    if config.allowed_origins.is_empty() {
        println!("   CORS: any origin");
    } else {
        println!(
            "   CORS: {} (MONEDERO_ALLOWED_ORIGINS)",
            config.allowed_origins.join(", ")
        );
    }
    println!();
    println!("   Press Ctrl+C to stop");

    monedero_server::serve_with_config(store, ai, PromptLibrary::new(), host, port, config)
        .await?;

    Ok(())
}
