#![expect(
    clippy::tests_outside_test_module,
    reason = "integration tests are only compiled in test mode"
)]

// Integration tests that require a local Ollama instance
// Run with: cargo test --test integration_ollama -- --ignored

use std::env;
use std::time::Duration;

use bookrec::config::{Config, OllamaConfig};
use bookrec::embeddings::{Embedder, OllamaClient};

const TEST_MODEL: &str = "nomic-embed-text:latest";
const DEFAULT_OLLAMA_HOST: &str = "localhost";
const DEFAULT_OLLAMA_PORT: u16 = 11434;

fn create_integration_test_client() -> OllamaClient {
    let host = env::var("OLLAMA_HOST").unwrap_or_else(|_| DEFAULT_OLLAMA_HOST.to_string());
    let port = env::var("OLLAMA_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_OLLAMA_PORT);
    let model = env::var("OLLAMA_MODEL").unwrap_or_else(|_| TEST_MODEL.to_string());

    let config = Config {
        ollama: OllamaConfig {
            protocol: "http".to_string(),
            host,
            port,
            model,
            batch_size: 5,
            max_input_tokens: 512,
        },
        base_dir: None,
    };

    OllamaClient::new(&config)
        .expect("Failed to create Ollama client")
        .with_timeout(Duration::from_secs(60))
        .with_retry_attempts(3)
}

#[test]
#[ignore = "requires a local Ollama instance"]
fn real_ollama_health_check() {
    let client = create_integration_test_client();
    client.health_check().expect("health check should pass");
}

#[test]
#[ignore = "requires a local Ollama instance"]
fn real_embedding_has_stable_dimension() {
    let client = create_integration_test_client();

    let first = client
        .embed("deep learning for image recognition")
        .expect("embed should succeed");
    let second = client
        .embed("gardening basics")
        .expect("embed should succeed");

    assert!(!first.is_empty());
    assert_eq!(first.len(), second.len());
}

#[test]
#[ignore = "requires a local Ollama instance"]
fn real_embedding_is_deterministic() {
    let client = create_integration_test_client();

    let first = client.embed("deep learning").expect("embed should succeed");
    let second = client.embed("deep learning").expect("embed should succeed");

    assert_eq!(first, second);
}

#[test]
#[ignore = "requires a local Ollama instance"]
fn real_batch_matches_single_calls() {
    let client = create_integration_test_client();

    let texts = vec![
        "deep learning".to_string(),
        "gardening basics".to_string(),
        "attention networks".to_string(),
    ];
    let batch = client.embed_batch(&texts).expect("batch should succeed");

    assert_eq!(batch.len(), texts.len());
    for (text, vector) in texts.iter().zip(&batch) {
        let single = client.embed(text).expect("embed should succeed");
        assert_eq!(single.len(), vector.len());
    }
}
