//! Basic library usage against the Miragic API
//!
//! Requires `MIRAGIC_API_KEY` in the environment and images in `input/`:
//!
//! ```bash
//! MIRAGIC_API_KEY=... cargo run --example api_usage
//! ```

use anyhow::Result;
use miragic_sdk::{MiragicSdk, SdkConfig};

const SOURCE: &str = "input/portrait.jpg";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (optional)
    env_logger::init();

    println!("🚀 Miragic SDK v{}", MiragicSdk::get_version());
    println!("==================");

    let config = SdkConfig::from_env()?;
    config.setup_directories()?;
    if !config.validate() {
        anyhow::bail!("Configuration is incomplete");
    }
    println!("🔑 Using API key {}", config.api_key_hint());

    // Option sets start from the configured defaults
    let remove = config
        .remove_background_options()
        .with_edge_refinement(true);
    let blur = config.blur_options().with_strength(0.6);
    let upscale = config.upscale_options();

    let sdk = MiragicSdk::new(config)?;

    // 1. Service status
    println!("\n📡 Checking API status...");
    match sdk.get_api_status().await {
        Ok(status) => println!("✅ API status: {}", status),
        Err(e) => println!("⚠️ Status check failed: {}", e),
    }

    // 2. Background removal
    println!("\n✂️ Removing background...");
    let target = "output/portrait_no_bg.png";
    let output = sdk.remove_background(SOURCE, target, &remove).await?;
    println!("✅ Saved {}", output.display());

    // 3. Background blur
    println!("\n🌫️ Blurring background...");
    let target = "output/portrait_blurred.jpg";
    let output = sdk.blur_background(SOURCE, target, &blur).await?;
    println!("✅ Saved {}", output.display());

    // 4. Upscaling
    println!("\n🔍 Upscaling {}x...", upscale.scale_factor);
    let target = "output/portrait_upscaled.jpg";
    let output = sdk.upscale_image(SOURCE, target, &upscale).await?;
    println!("✅ Saved {}", output.display());

    // 5. Usage
    println!("\n📊 Usage statistics:");
    match sdk.get_usage_stats().await {
        Ok(usage) => println!("{}", serde_json::to_string_pretty(&usage)?),
        Err(e) => println!("⚠️ Usage lookup failed: {}", e),
    }

    Ok(())
}
