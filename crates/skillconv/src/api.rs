use std::path::Path;

use serde::{Deserialize, Serialize};
use skillconv_core::convert::{error_detail, ConversionRequest, ConversionResponse};
use skillconv_core::platform::Platform;

use crate::prelude::*;

/// Conversion service configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
}

impl ApiConfig {
    /// Default base URL for a locally running conversion service
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:8000";

    /// Load configuration from environment variables
    /// Uses SKILLCONV_API_URL with default fallback
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("SKILLCONV_API_URL")
                .unwrap_or_else(|_| Self::DEFAULT_BASE_URL.to_string()),
        }
    }

    /// Apply CLI overrides to the configuration
    pub fn with_overrides(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url {
            self.base_url = url;
        }
        self
    }

    /// Join an endpoint path onto the base URL
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Health record returned by `GET /health`
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HealthOutput {
    pub status: String,
}

/// Check that an HTTP response was successful, surfacing the service's
/// error detail when the body carries one.
async fn check_response(response: reqwest::Response, context: &str) -> Result<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let detail = error_detail(&body).unwrap_or_else(|| {
        if body.trim().is_empty() {
            context.to_string()
        } else {
            body
        }
    });

    Err(Error::Service { status, detail }.into())
}

/// Submit skill content to the conversion service.
pub async fn convert_data(
    config: &ApiConfig,
    request: &ConversionRequest,
) -> Result<ConversionResponse> {
    let client = reqwest::Client::new();
    let url = config.endpoint("convert");

    let response = client
        .post(&url)
        .json(request)
        .send()
        .await
        .map_err(|e| Error::Network(f!("Failed to reach {url}: {e}")))?;

    let response = check_response(response, "Conversion failed").await?;

    response
        .json()
        .await
        .map_err(|e| eyre!("Failed to parse conversion response: {e}"))
}

/// Upload a skill file and convert it.
///
/// The file travels as the `file` multipart part; the platform labels and
/// the optional email travel as plain form fields.
pub async fn upload_convert_data(
    config: &ApiConfig,
    file_path: &Path,
    source: Platform,
    target: Platform,
    user_email: Option<String>,
) -> Result<ConversionResponse> {
    if !file_path.is_file() {
        return Err(Error::InvalidInput(f!("File not found: {}", file_path.display())).into());
    }

    let filename = file_path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    let mime = mime_from_extension(&filename);

    let file_bytes = tokio::fs::read(file_path)
        .await
        .map_err(|e| eyre!("Failed to read {}: {e}", file_path.display()))?;

    let part = reqwest::multipart::Part::bytes(file_bytes)
        .file_name(filename)
        .mime_str(mime)
        .map_err(|e| eyre!("Invalid MIME type: {e}"))?;

    let mut form = reqwest::multipart::Form::new()
        .part("file", part)
        .text("source_platform", source.as_str())
        .text("target_platform", target.as_str());

    if let Some(email) = user_email {
        form = form.text("user_email", email);
    }

    let client = reqwest::Client::new();
    let url = config.endpoint("upload-convert");

    let response = client
        .post(&url)
        .multipart(form)
        .send()
        .await
        .map_err(|e| Error::Network(f!("Failed to reach {url}: {e}")))?;

    let response = check_response(response, "Upload conversion failed").await?;

    response
        .json()
        .await
        .map_err(|e| eyre!("Failed to parse conversion response: {e}"))
}

/// Ask the conversion service whether it is alive.
pub async fn health_data(config: &ApiConfig) -> Result<HealthOutput> {
    let client = reqwest::Client::new();
    let url = config.endpoint("health");

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| Error::Network(f!("Failed to reach {url}: {e}")))?;

    let response = check_response(response, "Health check failed").await?;

    response
        .json()
        .await
        .map_err(|e| eyre!("Failed to parse health response: {e}"))
}

/// Infer MIME type from file extension.
fn mime_from_extension(filename: &str) -> &'static str {
    let ext = filename.rsplit('.').next().unwrap_or("").to_lowercase();

    match ext.as_str() {
        "md" => "text/markdown",
        "txt" => "text/plain",
        "json" => "application/json",
        "yaml" | "yml" => "application/yaml",
        "xml" => "application/xml",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use std::io::Write;

    fn test_request() -> ConversionRequest {
        ConversionRequest {
            source_content: "---\nname: reviewer\n---\n\n# Review\n".to_string(),
            source_platform: Platform::Claude,
            target_platform: Platform::Chatgpt,
            user_email: None,
        }
    }

    fn response_body() -> serde_json::Value {
        serde_json::json!({
            "converted_content": "You are reviewer.",
            "conversion_notes": ["Added role header"],
            "warnings": [],
            "incompatible_features": [],
            "confidence_score": 0.9
        })
    }

    #[test]
    fn test_endpoint_joins_paths() {
        let config = ApiConfig {
            base_url: "http://localhost:8000".to_string(),
        };

        assert_eq!(config.endpoint("convert"), "http://localhost:8000/convert");
        assert_eq!(config.endpoint("/health"), "http://localhost:8000/health");
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let config = ApiConfig {
            base_url: "http://localhost:8000/".to_string(),
        };

        assert_eq!(
            config.endpoint("upload-convert"),
            "http://localhost:8000/upload-convert"
        );
    }

    #[test]
    fn test_with_overrides() {
        let config = ApiConfig {
            base_url: ApiConfig::DEFAULT_BASE_URL.to_string(),
        };

        let overridden = config
            .clone()
            .with_overrides(Some("http://converter.internal".to_string()));
        assert_eq!(overridden.base_url, "http://converter.internal");

        let unchanged = config.with_overrides(None);
        assert_eq!(unchanged.base_url, ApiConfig::DEFAULT_BASE_URL);
    }

    #[tokio::test]
    async fn test_convert_data_posts_request_record() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/convert")
                    .header("content-type", "application/json")
                    .json_body(serde_json::json!({
                        "source_content": "---\nname: reviewer\n---\n\n# Review\n",
                        "source_platform": "claude",
                        "target_platform": "chatgpt"
                    }));
                then.status(200).json_body(response_body());
            })
            .await;

        let config = ApiConfig {
            base_url: server.base_url(),
        };

        let response = convert_data(&config, &test_request()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.converted_content, "You are reviewer.");
        assert_eq!(response.conversion_notes, vec!["Added role header"]);
        assert_eq!(response.confidence_score, 0.9);
    }

    #[tokio::test]
    async fn test_convert_data_includes_email_when_present() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/convert")
                    .body_contains("\"user_email\":\"user@example.com\"");
                then.status(200).json_body(response_body());
            })
            .await;

        let config = ApiConfig {
            base_url: server.base_url(),
        };

        let mut request = test_request();
        request.user_email = Some("user@example.com".to_string());

        convert_data(&config, &request).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_convert_data_surfaces_service_detail() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/convert");
                then.status(400)
                    .json_body(serde_json::json!({"detail": "Invalid source platform: copilot"}));
            })
            .await;

        let config = ApiConfig {
            base_url: server.base_url(),
        };

        let err = convert_data(&config, &test_request()).await.unwrap_err();

        let message = err.to_string();
        assert!(message.contains("400"));
        assert!(message.contains("Invalid source platform: copilot"));
    }

    #[tokio::test]
    async fn test_convert_data_falls_back_to_body_text() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/convert");
                then.status(502).body("Bad Gateway");
            })
            .await;

        let config = ApiConfig {
            base_url: server.base_url(),
        };

        let err = convert_data(&config, &test_request()).await.unwrap_err();

        let message = err.to_string();
        assert!(message.contains("502"));
        assert!(message.contains("Bad Gateway"));
    }

    #[tokio::test]
    async fn test_upload_convert_data_sends_multipart_form() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/upload-convert")
                    .body_contains("name=\"file\"")
                    .body_contains("name=\"source_platform\"")
                    .body_contains("claude")
                    .body_contains("name=\"target_platform\"")
                    .body_contains("gemini")
                    .body_contains("# Review");
                then.status(200).json_body(response_body());
            })
            .await;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# Review").unwrap();

        let config = ApiConfig {
            base_url: server.base_url(),
        };

        let response = upload_convert_data(
            &config,
            file.path(),
            Platform::Claude,
            Platform::Gemini,
            None,
        )
        .await
        .unwrap();

        mock.assert_async().await;
        assert_eq!(response.confidence_score, 0.9);
    }

    #[tokio::test]
    async fn test_upload_convert_data_sends_email_field() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/upload-convert")
                    .body_contains("name=\"user_email\"")
                    .body_contains("user@example.com");
                then.status(200).json_body(response_body());
            })
            .await;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "content").unwrap();

        let config = ApiConfig {
            base_url: server.base_url(),
        };

        upload_convert_data(
            &config,
            file.path(),
            Platform::Chatgpt,
            Platform::Claude,
            Some("user@example.com".to_string()),
        )
        .await
        .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_upload_convert_data_rejects_missing_file() {
        let config = ApiConfig {
            base_url: "http://localhost:1".to_string(),
        };

        let err = upload_convert_data(
            &config,
            Path::new("/no/such/skill.md"),
            Platform::Claude,
            Platform::Chatgpt,
            None,
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains("File not found"));
    }

    #[tokio::test]
    async fn test_health_data() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/health");
                then.status(200)
                    .json_body(serde_json::json!({"status": "healthy"}));
            })
            .await;

        let config = ApiConfig {
            base_url: server.base_url(),
        };

        let health = health_data(&config).await.unwrap();

        assert_eq!(health.status, "healthy");
    }

    #[test]
    fn test_mime_from_extension() {
        assert_eq!(mime_from_extension("SKILL.md"), "text/markdown");
        assert_eq!(mime_from_extension("gem.txt"), "text/plain");
        assert_eq!(mime_from_extension("gpt.json"), "application/json");
        assert_eq!(mime_from_extension("skill.yaml"), "application/yaml");
        assert_eq!(mime_from_extension("no-extension"), "application/octet-stream");
    }
}
