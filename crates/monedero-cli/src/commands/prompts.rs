//! Prompts-related command implementations

use anyhow::Result;
use monedero_core::prompts::{default_prompts_dir, PromptId, PromptLibrary, PromptSource};

/// List all available prompts and their override status
pub fn cmd_prompts_list(library: &PromptLibrary) -> Result<()> {
    let prompts = library.list();

    println!("Available Prompts:\n");

    println!("{:<25} {:>7}  {}", "ID", "VERSION", "OVERRIDE");
    println!("{}", "-".repeat(50));

    for info in prompts {
        let override_status = match info.source {
            PromptSource::Override(_) => "✓ Custom",
            PromptSource::Embedded => "Default",
        };

        println!("{:<25} {:>7}  {}", info.id, info.version, override_status);
    }

    println!();
    println!(
        "Override directory: {}",
        library
            .override_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(not available)".to_string())
    );

    println!();
    println!("To customize a prompt:");
    println!("  1. Copy the default to the override directory as <id>.md");
    println!("  2. Edit the file with your changes");
    println!("  3. The next request picks up the new prompt");

    Ok(())
}

/// Show the content of a specific prompt
pub fn cmd_prompts_show(library: &PromptLibrary, prompt_id: &str) -> Result<()> {
    let Some(id) = PromptId::parse(prompt_id) else {
        eprintln!("Unknown prompt ID: {}", prompt_id);
        eprintln!();
        eprintln!("Available prompts:");
        for id in PromptId::all() {
            eprintln!("  - {}", id.as_str());
        }
        anyhow::bail!("Unknown prompt ID: {}", prompt_id);
    };

    let prompt = library.get(id)?;

    println!("Prompt: {}", prompt.metadata.id);
    println!("Version: {}", prompt.metadata.version);
    match prompt.source {
        PromptSource::Override(ref path) => println!("Source: Override ({})", path.display()),
        PromptSource::Embedded => println!("Source: Default"),
    }

    println!();
    println!("--- Content ---");
    println!("{}", prompt.content);

    Ok(())
}

/// Show the path where prompt overrides should be placed
pub fn cmd_prompts_path() -> Result<()> {
    match default_prompts_dir() {
        Some(path) => {
            println!("{}", path.display());

            if !path.exists() {
                eprintln!();
                eprintln!("Note: This directory does not exist yet.");
                eprintln!("Create it to start adding custom prompts.");
            }
        }
        None => {
            eprintln!("Could not determine prompts directory.");
            eprintln!("The data directory is not available on this system.");
        }
    }

    Ok(())
}
