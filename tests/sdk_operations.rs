//! SDK operation tests using the recording mock backend
//!
//! Covers the per-call check order, option bounds and output handling
//! without touching the network.

use miragic_sdk::{
    BlurOptions, BlurPreset, FormPart, MiragicError, MiragicSdk, MockBackend,
    RemoveBackgroundOptions, SdkConfig, UpscaleOptions,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

fn sdk_with(backend: &Arc<MockBackend>) -> MiragicSdk {
    let config = SdkConfig::builder("test-key").build().unwrap();
    MiragicSdk::with_backend(config, backend.clone())
}

fn input(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, b"image bytes").unwrap();
    path
}

#[tokio::test]
async fn test_each_operation_hits_its_endpoint() {
    let temp_dir = TempDir::new().unwrap();
    let source = input(&temp_dir, "photo.jpg");
    let backend = Arc::new(MockBackend::always_image(b"result".to_vec()));
    let sdk = sdk_with(&backend);

    sdk.remove_background(&source, temp_dir.path().join("a.png"), &Default::default())
        .await
        .unwrap();
    sdk.blur_background(&source, temp_dir.path().join("b.jpg"), &Default::default())
        .await
        .unwrap();
    sdk.upscale_image(&source, temp_dir.path().join("c.jpg"), &Default::default())
        .await
        .unwrap();

    let paths: Vec<String> = backend.requests().into_iter().map(|r| r.path).collect();
    assert_eq!(paths, vec!["/remove-background", "/blur-background", "/upscale"]);
}

#[tokio::test]
async fn test_returns_output_path_and_writes_exact_bytes() {
    let temp_dir = TempDir::new().unwrap();
    let source = input(&temp_dir, "photo.png");
    let payload: Vec<u8> = (0..=255).collect();
    let backend = Arc::new(MockBackend::new());
    backend.queue_image(payload.clone());

    let output = temp_dir.path().join("sub").join("dir").join("out.png");
    let written = sdk_with(&backend)
        .remove_background(&source, &output, &RemoveBackgroundOptions::default())
        .await
        .unwrap();

    assert_eq!(written, output);
    assert_eq!(std::fs::read(&output).unwrap(), payload);
}

#[tokio::test]
async fn test_missing_input_makes_no_remote_call() {
    let temp_dir = TempDir::new().unwrap();
    let backend = Arc::new(MockBackend::always_image(vec![1]));
    let sdk = sdk_with(&backend);

    let err = sdk
        .upscale_image(
            temp_dir.path().join("missing.jpg"),
            temp_dir.path().join("out.jpg"),
            &UpscaleOptions::default(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, MiragicError::InputNotFound { .. }));
    assert!(err.to_string().contains("missing.jpg"));
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn test_unsupported_extensions_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let backend = Arc::new(MockBackend::always_image(vec![1]));
    let sdk = sdk_with(&backend);

    for name in ["anim.gif", "doc.pdf", "noext"] {
        let source = input(&temp_dir, name);
        let err = sdk
            .remove_background(&source, temp_dir.path().join("out.png"), &Default::default())
            .await
            .unwrap_err();
        assert!(matches!(err, MiragicError::UnsupportedFormat(_)), "{name}");
    }

    let source = input(&temp_dir, "ok.jpg");
    let err = sdk
        .blur_background(&source, temp_dir.path().join("out.svg"), &Default::default())
        .await
        .unwrap_err();
    assert!(matches!(err, MiragicError::UnsupportedFormat(_)));

    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn test_supported_extensions_any_case() {
    let temp_dir = TempDir::new().unwrap();
    let backend = Arc::new(MockBackend::always_image(vec![1]));
    let sdk = sdk_with(&backend);

    for name in ["a.JPG", "b.jpeg", "c.PNG", "d.bmp", "e.TIFF", "f.webp"] {
        let source = input(&temp_dir, name);
        sdk.upscale_image(&source, temp_dir.path().join("out.png"), &Default::default())
            .await
            .unwrap_or_else(|e| panic!("{name}: {e}"));
    }
    assert_eq!(backend.call_count(), 6);
}

#[tokio::test]
async fn test_option_bounds() {
    let temp_dir = TempDir::new().unwrap();
    let source = input(&temp_dir, "photo.jpg");
    let output = temp_dir.path().join("out.jpg");
    let backend = Arc::new(MockBackend::always_image(vec![1]));
    let sdk = sdk_with(&backend);

    for threshold in [-1, 256] {
        let options = RemoveBackgroundOptions::default().with_threshold(threshold);
        let err = sdk
            .remove_background(&source, &output, &options)
            .await
            .unwrap_err();
        assert!(matches!(err, MiragicError::InvalidOption(_)));
    }
    for scale in [0, 9] {
        let options = UpscaleOptions::default().with_scale_factor(scale);
        let err = sdk
            .upscale_image(&source, &output, &options)
            .await
            .unwrap_err();
        assert!(matches!(err, MiragicError::InvalidOption(_)));
    }
    for strength in [-0.1, 1.1] {
        let options = BlurOptions::default().with_strength(strength);
        let err = sdk
            .blur_background(&source, &output, &options)
            .await
            .unwrap_err();
        assert!(matches!(err, MiragicError::InvalidOption(_)));
    }
    assert_eq!(backend.call_count(), 0);

    // Boundary values are accepted
    for threshold in [0, 255] {
        let options = RemoveBackgroundOptions::default().with_threshold(threshold);
        sdk.remove_background(&source, &output, &options)
            .await
            .unwrap();
    }
    for scale in [1, 8] {
        let options = UpscaleOptions::default().with_scale_factor(scale);
        sdk.upscale_image(&source, &output, &options).await.unwrap();
    }
    for strength in [0.0, 1.0] {
        let options = BlurOptions::default().with_strength(strength);
        sdk.blur_background(&source, &output, &options)
            .await
            .unwrap();
    }
    assert_eq!(backend.call_count(), 6);
}

#[tokio::test]
async fn test_invalid_option_reported_before_missing_input() {
    let temp_dir = TempDir::new().unwrap();
    let backend = Arc::new(MockBackend::new());
    let sdk = sdk_with(&backend);

    let missing = temp_dir.path().join("missing.jpg");
    let output = temp_dir.path().join("out.jpg");
    let options = UpscaleOptions::default().with_scale_factor(20);
    let err = sdk
        .upscale_image(&missing, &output, &options)
        .await
        .unwrap_err();
    assert!(matches!(err, MiragicError::InvalidOption(_)));
}

#[tokio::test]
async fn test_failed_call_keeps_existing_output() {
    let temp_dir = TempDir::new().unwrap();
    let source = input(&temp_dir, "photo.jpg");
    let output = temp_dir.path().join("out.jpg");
    std::fs::write(&output, b"previous result").unwrap();

    let backend = Arc::new(MockBackend::new());
    backend.queue_error(500, "internal error");
    let options = BlurOptions::from(BlurPreset::Portrait);
    let err = sdk_with(&backend)
        .blur_background(&source, &output, &options)
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert_eq!(std::fs::read(&output).unwrap(), b"previous result");
}

#[tokio::test]
async fn test_bytes_input_uploads_detected_type() {
    let temp_dir = TempDir::new().unwrap();
    let backend = Arc::new(MockBackend::always_image(vec![1]));
    let sdk = sdk_with(&backend);

    let jpeg = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];
    let output = temp_dir.path().join("out.png");
    let options = RemoveBackgroundOptions::default();
    sdk.remove_background(jpeg, &output, &options)
        .await
        .unwrap();

    let request = backend.last_request().unwrap().request;
    let file_part = request
        .parts
        .iter()
        .find(|part| part.name() == "image")
        .unwrap();
    match file_part {
        FormPart::File {
            filename,
            content_type,
            data,
            ..
        } => {
            assert_eq!(content_type, "image/jpeg");
            assert!(Path::new(filename)
                .extension()
                .is_some_and(|ext| ext == "jpg" || ext == "jpeg"));
            assert_eq!(data.len(), 10);
        },
        other => panic!("unexpected part {:?}", other),
    }
}

#[tokio::test]
async fn test_concurrent_calls_are_independent() {
    let temp_dir = TempDir::new().unwrap();
    let source = input(&temp_dir, "photo.jpg");
    let backend = Arc::new(MockBackend::always_image(b"done".to_vec()));
    let sdk = sdk_with(&backend);

    let upscaled = temp_dir.path().join("up.jpg");
    let blurred = temp_dir.path().join("blur.jpg");
    let upscale_options = UpscaleOptions::default();
    let blur_options = BlurOptions::default();

    let (first, second) = tokio::join!(
        sdk.upscale_image(&source, &upscaled, &upscale_options),
        sdk.blur_background(&source, &blurred, &blur_options),
    );

    assert_eq!(first.unwrap(), upscaled);
    assert_eq!(second.unwrap(), blurred);
    assert_eq!(std::fs::read(&upscaled).unwrap(), b"done");
    assert_eq!(std::fs::read(&blurred).unwrap(), b"done");
    assert_eq!(backend.call_count(), 2);
}

#[test]
fn test_version() {
    assert_eq!(MiragicSdk::get_version(), env!("CARGO_PKG_VERSION"));
    assert_eq!(miragic_sdk::version(), MiragicSdk::get_version());
}
