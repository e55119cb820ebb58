//! `readpal ask` and `readpal summarize`: one-shot document queries.

use readpal_config::AppConfig;
use readpal_core::knowledge::DocumentUrl;

pub async fn ask(url: &str, question: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let companion = readpal_gateway::build_companion(&config)?;

    let answer = companion
        .ask_question(&DocumentUrl::new(url), question)
        .await?;
    println!("{}", answer.content);
    Ok(())
}

pub async fn summarize(url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let companion = readpal_gateway::build_companion(&config)?;

    let summary = companion.summarize(&DocumentUrl::new(url)).await?;
    println!("{}", summary.content);
    Ok(())
}
