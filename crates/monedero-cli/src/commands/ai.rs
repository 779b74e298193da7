//! Generation backend command implementations

use anyhow::Result;
use monedero_core::{AIClient, GenerationBackend, GenerationRequest};

const DEFAULT_TEST_PROMPT: &str = "Responde solo con la palabra: listo";

/// Test the generation backend connection with a short prompt
pub async fn cmd_ai_test(client: AIClient, prompt: Option<&str>) -> Result<()> {
    println!("🔍 Testing generation backend...\n");

    let info = client.info();
    println!("  Backend: {}", info.backend);
    println!("  Host:    {}", info.host);
    println!("  Model:   {}\n", info.model);

    print!("Checking availability... ");
    if client.health_check().await {
        println!("✅ Connected");
    } else {
        println!("❌ Failed");
        println!("\n⚠️  Could not reach the generation backend at {}", info.host);
        println!("\nCheck your configuration:");
        println!("  - Gemini: export GEMINI_API_KEY=<your key> (optionally GEMINI_MODEL)");
        println!("  - OpenAI-compatible: export AI_BACKEND=openai_compatible OPENAI_COMPATIBLE_HOST=<url>");
        return Ok(());
    }

    let prompt = prompt.unwrap_or(DEFAULT_TEST_PROMPT);
    println!("\n📋 Sending test prompt: \"{}\"\n", prompt);

    match client.generate(&GenerationRequest::new(prompt)).await {
        Ok(text) => println!("  → {}", text.trim()),
        Err(e) => println!("  ❌ Error: {}", e),
    }

    Ok(())
}
