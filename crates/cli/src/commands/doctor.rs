//! `readpal doctor`: diagnose configuration and provider health.

use readpal_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("ReadPal Doctor");
    println!("==============\n");

    let mut issues = 0;

    let config_path = AppConfig::config_dir().join("config.toml");
    if !config_path.exists() {
        println!("  [warn] No config file, using defaults. Run `readpal onboard`");
        issues += 1;
    }

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  [ok]   Config valid (model: {})", config.default_model);
            config
        }
        Err(e) => {
            println!("  [fail] Config invalid: {e}");
            println!("\n  1 issue found. Fix the config and re-run.");
            return Ok(());
        }
    };

    match config.knowledge.active_embedding_model() {
        Some(model) => println!("  [ok]   Embedding model: {model}"),
        None => println!("  [ok]   Retrieval: keyword search (no embedding model)"),
    }

    if config.has_api_key() {
        println!("  [ok]   API key configured");
    } else {
        println!("  [fail] No API key. Set READPAL_API_KEY or add api_key to config.toml");
        issues += 1;
    }

    let router = readpal_providers::router::build_from_config(&config);
    match router.default() {
        Some(provider) => match provider.health_check().await {
            Ok(true) => println!("  [ok]   Provider '{}' reachable", provider.name()),
            Ok(false) => {
                println!("  [fail] Provider '{}' unhealthy", provider.name());
                issues += 1;
            }
            Err(e) => {
                println!("  [fail] Provider '{}' check failed: {e}", provider.name());
                issues += 1;
            }
        },
        None => {
            println!("  [fail] Default provider '{}' not available", config.default_provider);
            issues += 1;
        }
    }

    println!();
    if issues == 0 {
        println!("  All checks passed.");
    } else {
        println!("  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
