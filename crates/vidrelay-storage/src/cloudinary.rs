//! Cloudinary media sink
//!
//! Uses the signed upload API (`/v1_1/{cloud}/{resource_type}/upload`) with the
//! payload sent as a streamed multipart part, and `/destroy` for deletions.
//! Requests are signed with SHA-256 over the sorted signable parameters followed
//! by the API secret.

use crate::traits::{
    MediaSink, ResourceType, SinkError, SinkResult, UploadOptions, UploadedMedia,
};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Response};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

const SIGNATURE_ALGORITHM: &str = "sha256";
const DEFAULT_FILE_NAME: &str = "upload";

/// Cloudinary account settings
#[derive(Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    /// e.g. "https://api.cloudinary.com"
    pub api_base: String,
    pub upload_folder: Option<String>,
    /// None = wait indefinitely
    pub timeout: Option<Duration>,
}

impl Debug for CloudinaryConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CloudinaryConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_base", &self.api_base)
            .field("upload_folder", &self.upload_folder)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
    #[serde(default)]
    bytes: Option<u64>,
    #[serde(default)]
    duration: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Cloudinary implementation of [`MediaSink`]
#[derive(Clone)]
pub struct CloudinarySink {
    http_client: reqwest::Client,
    config: CloudinaryConfig,
}

impl Debug for CloudinarySink {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CloudinarySink")
            .field("config", &self.config)
            .finish()
    }
}

impl CloudinarySink {
    pub fn new(config: CloudinaryConfig) -> SinkResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build().map_err(|e| {
            SinkError::ConfigError(format!("Failed to create HTTP client for Cloudinary: {}", e))
        })?;

        Ok(Self {
            http_client,
            config,
        })
    }

    fn endpoint(&self, resource_type: ResourceType, action: &str) -> String {
        format!(
            "{}/v1_1/{}/{}/{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.cloud_name,
            resource_type,
            action
        )
    }

    fn timestamp() -> String {
        chrono::Utc::now().timestamp().to_string()
    }

    fn sign(&self, params: &[(&str, String)]) -> String {
        sign_params(params, &self.config.api_secret)
    }

    /// Turn a non-success response into [`SinkError::Rejected`], preferring the
    /// provider's own error message when the body carries one.
    async fn rejection(response: Response) -> SinkError {
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.error.message)
            .unwrap_or(text);
        SinkError::Rejected { status, message }
    }
}

/// Compute a Cloudinary request signature.
///
/// Parameters are sorted by name, joined as `name=value` pairs with `&`, and the
/// secret is appended before hashing. Callers pass only signable parameters.
pub fn sign_params(params: &[(&str, String)], api_secret: &str) -> String {
    let mut sorted: Vec<&(&str, String)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let to_sign = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[async_trait]
impl MediaSink for CloudinarySink {
    async fn upload_stream(
        &self,
        data: Bytes,
        options: UploadOptions,
    ) -> SinkResult<UploadedMedia> {
        let url = self.endpoint(options.resource_type, "upload");
        let size = data.len() as u64;

        let mut signed = vec![("timestamp", Self::timestamp())];
        if let Some(ref folder) = self.config.upload_folder {
            signed.push(("folder", folder.clone()));
        }
        let signature = self.sign(&signed);

        let file_part = Part::stream_with_length(Body::from(data), size).file_name(
            options
                .file_name
                .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string()),
        );

        let mut form = Form::new()
            .text("api_key", self.config.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", SIGNATURE_ALGORITHM);
        for (key, value) in signed {
            form = form.text(key, value);
        }
        let form = form.part("file", file_part);

        let start = std::time::Instant::now();

        let response = self
            .http_client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, size_bytes = size, "Cloudinary upload request failed");
                SinkError::Transport(e.to_string())
            })?;

        if !response.status().is_success() {
            let err = Self::rejection(response).await;
            tracing::error!(error = %err, size_bytes = size, "Cloudinary rejected upload");
            return Err(err);
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| SinkError::InvalidResponse(e.to_string()))?;

        tracing::info!(
            public_id = %body.public_id,
            size_bytes = size,
            resource_type = %options.resource_type,
            duration_ms = start.elapsed().as_millis() as u64,
            "Cloudinary upload completed"
        );

        Ok(UploadedMedia {
            secure_url: body.secure_url,
            public_id: body.public_id,
            bytes: body.bytes,
            duration: body.duration,
        })
    }

    async fn delete(&self, public_id: &str, resource_type: ResourceType) -> SinkResult<()> {
        let url = self.endpoint(resource_type, "destroy");
        let timestamp = Self::timestamp();
        let signature = self.sign(&[
            ("public_id", public_id.to_string()),
            ("timestamp", timestamp.clone()),
        ]);

        let params = [
            ("public_id", public_id.to_string()),
            ("timestamp", timestamp),
            ("api_key", self.config.api_key.clone()),
            ("signature", signature),
            ("signature_algorithm", SIGNATURE_ALGORITHM.to_string()),
        ];

        let response = self
            .http_client
            .post(&url)
            .form(&params)
            .send()
            .await
            .map_err(|e| SinkError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(match Self::rejection(response).await {
                SinkError::Rejected { status, message } => {
                    SinkError::DeleteFailed(format!("{}: {}", status, message))
                }
                other => other,
            });
        }

        let body: DestroyResponse = response
            .json()
            .await
            .map_err(|e| SinkError::InvalidResponse(e.to_string()))?;

        match body.result.as_str() {
            "ok" | "not found" => {
                tracing::debug!(public_id = %public_id, result = %body.result, "Cloudinary destroy completed");
                Ok(())
            }
            other => Err(SinkError::DeleteFailed(format!(
                "unexpected destroy result '{}'",
                other
            ))),
        }
    }

    fn name(&self) -> &'static str {
        "cloudinary"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn test_config(api_base: String) -> CloudinaryConfig {
        CloudinaryConfig {
            cloud_name: "demo".to_string(),
            api_key: "1234".to_string(),
            api_secret: "shh".to_string(),
            api_base,
            upload_folder: None,
            timeout: Some(Duration::from_secs(5)),
        }
    }

    fn form_field(name: &str, value: &str) -> Matcher {
        Matcher::Regex(format!("name=\"{}\"\r\n\r\n{}\r\n", name, value))
    }

    #[test]
    fn test_sign_params_sorts_and_appends_secret() {
        let params = [
            ("timestamp", "1315060510".to_string()),
            ("public_id", "sample_image".to_string()),
            ("eager", "w_400,h_300,c_pad|w_260,h_200,c_crop".to_string()),
        ];
        assert_eq!(
            sign_params(&params, "abcd"),
            "cc927e1290f9e3ae4c1a741eda21a4630b4ce80f9ce0bc0296337d25cf40f91e"
        );
    }

    #[test]
    fn test_sign_params_with_folder() {
        let params = [
            ("timestamp", "1700000000".to_string()),
            ("folder", "clips".to_string()),
        ];
        assert_eq!(
            sign_params(&params, "shh"),
            "cc540115860b7ddd372a9784b6258d8e9b0ff160de361fc984cc4c4173783dd8"
        );
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let sink = CloudinarySink::new(test_config("https://api.cloudinary.com/".to_string()))
            .unwrap();
        assert_eq!(
            sink.endpoint(ResourceType::Video, "upload"),
            "https://api.cloudinary.com/v1_1/demo/video/upload"
        );
    }

    #[test]
    fn test_debug_hides_secret() {
        let sink = CloudinarySink::new(test_config("https://api.cloudinary.com".to_string()))
            .unwrap();
        assert!(!format!("{:?}", sink).contains("shh"));
    }

    #[tokio::test]
    async fn test_upload_stream_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1_1/demo/video/upload")
            .match_header("content-type", Matcher::Regex("multipart/form-data".to_string()))
            .match_body(Matcher::AllOf(vec![
                form_field("api_key", "1234"),
                form_field("signature_algorithm", "sha256"),
                Matcher::Regex("name=\"timestamp\"\r\n\r\n[0-9]+\r\n".to_string()),
                Matcher::Regex("name=\"signature\"\r\n\r\n[0-9a-f]{64}\r\n".to_string()),
                Matcher::Regex("name=\"file\"; filename=\"clip.mp4\"".to_string()),
                Matcher::Regex("fake video bytes".to_string()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"public_id":"abc","secure_url":"https://cdn.example/abc.mp4","bytes":16,"duration":1.5,"resource_type":"video"}"#,
            )
            .create_async()
            .await;

        let sink = CloudinarySink::new(test_config(server.url())).unwrap();
        let uploaded = sink
            .upload_stream(
                Bytes::from_static(b"fake video bytes"),
                UploadOptions::video().with_file_name(Some("clip.mp4".to_string())),
            )
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(uploaded.secure_url, "https://cdn.example/abc.mp4");
        assert_eq!(uploaded.public_id, "abc");
        assert_eq!(uploaded.bytes, Some(16));
        assert_eq!(uploaded.duration, Some(1.5));
    }

    #[tokio::test]
    async fn test_upload_stream_sends_folder() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1_1/demo/video/upload")
            .match_body(form_field("folder", "clips"))
            .with_status(200)
            .with_body(r#"{"public_id":"clips/abc","secure_url":"https://cdn.example/clips/abc.mp4"}"#)
            .create_async()
            .await;

        let mut config = test_config(server.url());
        config.upload_folder = Some("clips".to_string());
        let sink = CloudinarySink::new(config).unwrap();
        let uploaded = sink
            .upload_stream(Bytes::from_static(b"data"), UploadOptions::video())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(uploaded.public_id, "clips/abc");
        assert_eq!(uploaded.bytes, None);
    }

    #[tokio::test]
    async fn test_upload_stream_rejected_uses_provider_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1_1/demo/video/upload")
            .with_status(401)
            .with_body(r#"{"error":{"message":"Invalid Signature"}}"#)
            .create_async()
            .await;

        let sink = CloudinarySink::new(test_config(server.url())).unwrap();
        let err = sink
            .upload_stream(Bytes::from_static(b"data"), UploadOptions::video())
            .await
            .unwrap_err();

        match err {
            SinkError::Rejected { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid Signature");
            }
            other => panic!("Expected Rejected, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_upload_stream_rejected_with_plain_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1_1/demo/video/upload")
            .with_status(502)
            .with_body("Bad Gateway")
            .create_async()
            .await;

        let sink = CloudinarySink::new(test_config(server.url())).unwrap();
        let err = sink
            .upload_stream(Bytes::from_static(b"data"), UploadOptions::video())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SinkError::Rejected { status: 502, ref message } if message == "Bad Gateway"
        ));
    }

    #[tokio::test]
    async fn test_upload_stream_invalid_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1_1/demo/video/upload")
            .with_status(200)
            .with_body(r#"{"public_id":"abc"}"#)
            .create_async()
            .await;

        let sink = CloudinarySink::new(test_config(server.url())).unwrap();
        let err = sink
            .upload_stream(Bytes::from_static(b"data"), UploadOptions::video())
            .await
            .unwrap_err();

        assert!(matches!(err, SinkError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_upload_stream_transport_error() {
        // Nothing listens on port 1.
        let sink = CloudinarySink::new(test_config("http://127.0.0.1:1".to_string())).unwrap();
        let err = sink
            .upload_stream(Bytes::from_static(b"data"), UploadOptions::video())
            .await
            .unwrap_err();

        assert!(matches!(err, SinkError::Transport(_)));
    }

    #[tokio::test]
    async fn test_delete_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1_1/demo/video/destroy")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("public_id".to_string(), "clips/abc".to_string()),
                Matcher::UrlEncoded("api_key".to_string(), "1234".to_string()),
                Matcher::UrlEncoded("signature_algorithm".to_string(), "sha256".to_string()),
            ]))
            .with_status(200)
            .with_body(r#"{"result":"ok"}"#)
            .create_async()
            .await;

        let sink = CloudinarySink::new(test_config(server.url())).unwrap();
        sink.delete("clips/abc", ResourceType::Video).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_delete_not_found_is_ok() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1_1/demo/video/destroy")
            .with_status(200)
            .with_body(r#"{"result":"not found"}"#)
            .create_async()
            .await;

        let sink = CloudinarySink::new(test_config(server.url())).unwrap();
        assert!(sink.delete("missing", ResourceType::Video).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1_1/demo/video/destroy")
            .with_status(420)
            .with_body(r#"{"error":{"message":"Rate Limit Exceeded"}}"#)
            .create_async()
            .await;

        let sink = CloudinarySink::new(test_config(server.url())).unwrap();
        let err = sink.delete("abc", ResourceType::Video).await.unwrap_err();

        match err {
            SinkError::DeleteFailed(msg) => assert!(msg.contains("Rate Limit Exceeded")),
            other => panic!("Expected DeleteFailed, got {:?}", other),
        }
    }
}
