use serde::Serialize;

use crate::IntegrationError;

/// Pushes decisions back to the systems that opened approval
/// requests.
#[derive(Clone, Debug, Default)]
pub struct OriginClient {
    http: reqwest::Client,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusPayload<'a> {
    status_approve_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<&'a str>,
}

impl OriginClient {
    #[must_use]
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    /// PUTs the decision to the origin record, addressed by the stored
    /// API path with the origin id appended.
    pub async fn push_status(
        &self,
        api_path: &str,
        id_from: &str,
        status_approve_id: i32,
        comment: Option<&str>,
    ) -> Result<(), IntegrationError> {
        let url = format!("{api_path}{id_from}");
        tracing::debug!(%url, status_approve_id, "pushing decision to origin system");
        let response = self
            .http
            .put(&url)
            .json(&StatusPayload {
                status_approve_id,
                comment,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IntegrationError::Service {
                service: "origin",
                status: status.as_u16(),
                message: body,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_uses_camel_case_and_drops_missing_comment() {
        let with_comment = serde_json::to_value(StatusPayload {
            status_approve_id: 3,
            comment: Some("no budget left"),
        })
        .unwrap();
        assert_eq!(
            with_comment,
            serde_json::json!({"statusApproveId": 3, "comment": "no budget left"})
        );

        let bare = serde_json::to_value(StatusPayload {
            status_approve_id: 2,
            comment: None,
        })
        .unwrap();
        assert_eq!(bare, serde_json::json!({"statusApproveId": 2}));
    }
}
