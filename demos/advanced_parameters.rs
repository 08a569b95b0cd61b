//! Parameter variations for each operation
//!
//! Writes one output per preset, upscale method and threshold so the
//! results can be compared side by side.
//!
//! ```bash
//! MIRAGIC_API_KEY=... cargo run --example advanced_parameters -- input/photo.jpg
//! ```

use anyhow::{Context, Result};
use miragic_sdk::{
    BlurOptions, BlurPreset, MiragicSdk, RetryConfig, RetryPolicy, SdkConfig, UpscaleMethod,
};
use std::path::PathBuf;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let source: PathBuf = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .context("Usage: advanced_parameters <image>")?;

    // Retries are opt-in; three attempts with a short backoff here
    let config = SdkConfig::from_env()?;
    let retry = RetryConfig::with_max_retries(3)
        .initial_delay(Duration::from_millis(250));
    let policy = RetryPolicy::new(retry);
    println!("🔁 Retry policy: {:?}", policy.config());

    let output_dir = config.output_dir.join("variants");
    std::fs::create_dir_all(&output_dir)?;
    let sdk = MiragicSdk::new(config)?.with_retry_policy(policy);

    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image");
    let out = |suffix: &str, ext: &str| output_dir.join(format!("{stem}_{suffix}.{ext}"));

    println!("\n🌫️ Blur presets");
    for preset in [
        BlurPreset::Portrait,
        BlurPreset::Product,
        BlurPreset::Artistic,
    ] {
        let options = BlurOptions::from(preset);
        let name = format!("{preset:?}").to_lowercase();
        let target = out(&name, "jpg");
        let result = sdk.blur_background(&source, target, &options).await;
        report(&name, result);
    }

    println!("\n🔍 Upscale methods (4x)");
    for method in UpscaleMethod::all() {
        let options = sdk
            .config()
            .upscale_options()
            .with_scale_factor(4)
            .with_method(*method)
            .with_sharpen(*method != UpscaleMethod::Nearest);
        let target = out(method.as_str(), "png");
        let result = sdk.upscale_image(&source, target, &options).await;
        report(method.as_str(), result);
    }

    println!("\n✂️ Background removal thresholds");
    for threshold in [64, 128, 200] {
        let options = sdk
            .config()
            .remove_background_options()
            .with_threshold(threshold)
            .with_hair_detection(true);
        let name = format!("threshold_{threshold}");
        let target = out(&name, "png");
        let result = sdk.remove_background(&source, target, &options).await;
        report(&name, result);
    }

    Ok(())
}

fn report(label: &str, result: miragic_sdk::Result<PathBuf>) {
    match result {
        Ok(path) => println!("  ✅ {label}: {}", path.display()),
        Err(e) => println!("  ❌ {label}: {e}"),
    }
}
