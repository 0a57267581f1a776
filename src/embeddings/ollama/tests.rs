use super::*;
use crate::config::{Config, OllamaConfig};

fn test_config() -> Config {
    Config {
        ollama: OllamaConfig {
            protocol: "http".to_string(),
            host: "test-host".to_string(),
            port: 1234,
            model: "test-model".to_string(),
            batch_size: 128,
            max_input_tokens: 256,
        },
        base_dir: None,
    }
}

#[test]
fn client_configuration() {
    let client = OllamaClient::new(&test_config()).expect("Failed to create client");

    assert_eq!(client.model, "test-model");
    assert_eq!(client.batch_size, 128);
    assert_eq!(client.max_input_tokens, 256);
    assert_eq!(client.base_url.host_str(), Some("test-host"));
    assert_eq!(client.base_url.port(), Some(1234));
    assert_eq!(client.retry_attempts, DEFAULT_RETRY_ATTEMPTS);
}

#[test]
fn client_builder_methods() {
    let client = OllamaClient::new(&test_config())
        .expect("Failed to create client")
        .with_timeout(Duration::from_secs(60))
        .with_retry_attempts(5);

    assert_eq!(client.retry_attempts, 5);
}

#[test]
fn unreachable_server_surfaces_model_unavailable() {
    let mut config = test_config();
    config.ollama.host = "localhost".to_string();
    // Port 1 is reserved; connecting fails immediately
    config.ollama.port = 1;

    let client = OllamaClient::new(&config)
        .expect("Failed to create client")
        .with_retry_attempts(1);

    let err = Embedder::embed(&client, "some text").expect_err("embed should fail");
    assert!(matches!(err, RecError::ModelUnavailable(_)));
}
