use std::time::{SystemTime, UNIX_EPOCH};

use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::IntegrationError;

const DEFAULT_FOLDER: &str = "transactions";

/// Signed uploads to the Cloudinary media CDN.
#[derive(Clone, Debug)]
pub struct StorageClient {
    http: reqwest::Client,
    cloud_name: String,
    api_key: String,
    api_secret: String,
    folder: String,
}

/// A file that landed on the CDN.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredFile {
    pub url: String,
    pub public_id: String,
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

impl StorageClient {
    #[must_use]
    pub fn new(
        cloud_name: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            cloud_name: cloud_name.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            folder: DEFAULT_FOLDER.to_string(),
        }
    }

    #[must_use]
    pub fn folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = folder.into();
        self
    }

    /// Uploads one file and returns its public URL and CDN handle.
    pub async fn upload(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<StoredFile, IntegrationError> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default();
        let signature = self.signature(timestamp);

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(content_type)?;
        let form = reqwest::multipart::Form::new()
            .text("api_key", self.api_key.clone())
            .text("timestamp", timestamp.to_string())
            .text("folder", self.folder.clone())
            .text("signature", signature)
            .part("file", part);

        let url = format!(
            "https://api.cloudinary.com/v1_1/{}/auto/upload",
            self.cloud_name
        );
        tracing::debug!(%url, file_name, "uploading file to media storage");
        let response = self.http.post(&url).multipart(form).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(IntegrationError::Service {
                service: "cloudinary",
                status: status.as_u16(),
                message,
            });
        }

        let body: UploadResponse = response.json().await?;
        Ok(StoredFile {
            url: body.secure_url,
            public_id: body.public_id,
        })
    }

    /// Request signature: SHA-256 over the signed parameters, sorted
    /// by name, with the API secret appended.
    fn signature(&self, timestamp: u64) -> String {
        hex::encode(Sha256::digest(self.signing_payload(timestamp)))
    }

    fn signing_payload(&self, timestamp: u64) -> String {
        format!(
            "folder={}&timestamp={}{}",
            self.folder, timestamp, self.api_secret
        )
    }
}
