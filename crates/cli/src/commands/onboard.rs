//! `readpal onboard`: first-time setup.

use readpal_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");

    println!("ReadPal setup");
    println!("=============\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("  Created config directory: {}", config_dir.display());
    }

    if config_path.exists() {
        println!("  Config already exists at: {}", config_path.display());
        println!("  Edit it manually or delete it and re-run onboard.");
        return Ok(());
    }

    std::fs::write(&config_path, AppConfig::default_toml())?;
    println!("  Created config.toml at: {}", config_path.display());
    println!("\nNext steps:");
    println!("  1. Set READPAL_API_KEY (or OPENAI_API_KEY), or add api_key to the config");
    println!("  2. Run `readpal doctor` to check the setup");
    println!("  3. Run `readpal gateway` to start the API");

    Ok(())
}
