//! Process every supported image in `input/` with one operation
//!
//! ```bash
//! MIRAGIC_API_KEY=... cargo run --example batch_processing
//! ```

use anyhow::Result;
use miragic_sdk::{BatchProcessor, BlurOptions, BlurPreset, MiragicSdk, SdkConfig};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let config = SdkConfig::from_env()?;
    config.setup_directories()?;

    let mut inputs: Vec<PathBuf> = std::fs::read_dir(&config.input_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && config.is_supported_format(path))
        .collect();
    inputs.sort();

    if inputs.is_empty() {
        let input_dir = config.input_dir.display();
        println!("📭 No supported images in {input_dir}");
        return Ok(());
    }

    let output_dir = config.output_dir.join("blurred");
    let sdk = MiragicSdk::new(config)?;
    let batch = BatchProcessor::new(&output_dir);

    let count = inputs.len();
    println!("🔄 Blurring {count} image(s) with the portrait preset...");
    let options = BlurOptions::from(BlurPreset::Portrait);
    let result = batch
        .run(sdk.blur(), &inputs, &options, |progress| {
            let position = format!("[{}/{}]", progress.position, progress.total);
            match progress.outcome {
                Ok(output) => println!("  {position} ✅ {}", output.display()),
                Err(e) => println!("  {position} ❌ {}: {e}", progress.input.display()),
            }
        })
        .await?;

    println!(
        "\n📊 {} processed, {} failed in {:.2}s",
        result.processed.len(),
        result.failed.len(),
        result.elapsed.as_secs_f64()
    );

    Ok(())
}
