//! Miragic CLI Tool
//!
//! Command-line interface for background removal, background blur and
//! upscaling through the Miragic image-processing API.

#[cfg(feature = "cli")]
use miragic_sdk::cli;

#[cfg(feature = "cli")]
#[tokio::main]
async fn main() {
    if let Err(e) = cli::main().await {
        eprintln!("❌ {e:#}");
        std::process::exit(1);
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Please rebuild with --features cli");
    std::process::exit(1);
}
