use crate::IntegrationError;

const DEFAULT_BASE_URL: &str = "https://api.cloudmersive.com";
const SCAN_PATH: &str = "/receipts/scan/receipt/scan";

/// Relay to the Cloudmersive receipt-scanning API.
#[derive(Clone, Debug)]
pub struct OcrClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OcrClient {
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sends a receipt photo to the scanning service and returns its
    /// JSON answer verbatim; the caller decides what to keep.
    pub async fn scan_receipt(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<serde_json::Value, IntegrationError> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(content_type)?;
        let form = reqwest::multipart::Form::new().part("imageFile", part);

        let url = self.scan_url();
        tracing::debug!(%url, file_name, "relaying receipt to the scanning service");
        let response = self
            .http
            .post(&url)
            .header("Apikey", &self.api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(IntegrationError::Service {
                service: "cloudmersive",
                status: status.as_u16(),
                message: "invalid API key or quota exceeded".to_string(),
            });
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(IntegrationError::Service {
                service: "cloudmersive",
                status: status.as_u16(),
                message,
            });
        }

        response.json().await.map_err(Into::into)
    }

    fn scan_url(&self) -> String {
        format!("{}{}", self.base_url, SCAN_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_url_honours_custom_base() {
        let client = OcrClient::new("key");
        assert_eq!(
            client.scan_url(),
            "https://api.cloudmersive.com/receipts/scan/receipt/scan"
        );

        let client = OcrClient::new("key").base_url("http://localhost:9090");
        assert_eq!(
            client.scan_url(),
            "http://localhost:9090/receipts/scan/receipt/scan"
        );
    }
}
