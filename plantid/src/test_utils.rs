//! Test utilities for HTTP-level tests.

use crate::config::{Config, IdentificationConfig, UploadsConfig};
use axum_test::{
    TestServer,
    multipart::{MultipartForm, Part},
};
use std::path::Path;

/// Config pointing at a mock identification endpoint, storing uploads in `upload_dir`.
///
/// An explicit API key is set so tests never depend on the process environment.
pub fn create_test_config(identify_url: &str, upload_dir: &Path) -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        debug: true,
        identification: IdentificationConfig {
            url: identify_url.parse().expect("test identify url should parse"),
            api_key: Some("test-key".to_string()),
            ..Default::default()
        },
        uploads: UploadsConfig {
            dir: upload_dir.to_path_buf(),
            max_size: None,
        },
    }
}

pub async fn create_test_app(config: Config) -> TestServer {
    crate::Application::new(config)
        .await
        .expect("Failed to create application")
        .into_test_server()
}

/// A form with a single image under the `file` field
pub fn image_form(filename: &str, contents: &'static [u8]) -> MultipartForm {
    let part = Part::bytes(contents).file_name(filename.to_string()).mime_type("image/jpeg");
    MultipartForm::new().add_part("file", part)
}
