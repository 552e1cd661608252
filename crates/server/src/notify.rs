//! Chat digests triggered by scheduled callers (cron hits these with
//! the shared api key).

use api_types::Envelope;
use axum::{Json, extract::State};
use axum_extra::{
    TypedHeader,
    headers::{Error as AxumError, Header},
};

use crate::{ServerError, server::ServerState};
use engine::{ApproveListRow, TransactionFilter, User};
use integrations::ChatClient;

static API_KEY_HEADER: axum::http::HeaderName = axum::http::HeaderName::from_static("x-api-key");

/// `TypedHeader` for the `x-api-key` entry scheduled callers send.
pub(crate) struct ApiKeyHeader(String);

impl Header for ApiKeyHeader {
    fn name() -> &'static axum::http::HeaderName {
        &API_KEY_HEADER
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, AxumError>
    where
        Self: Sized,
        I: Iterator<Item = &'i axum::http::HeaderValue>,
    {
        let value = values.next().ok_or_else(AxumError::invalid)?;
        let Ok(value) = value.to_str() else {
            return Err(AxumError::invalid());
        };

        Ok(ApiKeyHeader(value.to_string()))
    }

    fn encode<E: Extend<axum::http::HeaderValue>>(&self, values: &mut E) {
        match axum::http::HeaderValue::from_str(&self.0) {
            Ok(value) => values.extend(std::iter::once(value)),
            Err(_) => tracing::error!("failed to encode x-api-key header"),
        }
    }
}

fn require_api_key(
    state: &ServerState,
    header: Option<TypedHeader<ApiKeyHeader>>,
) -> Result<(), ServerError> {
    match header {
        Some(TypedHeader(ApiKeyHeader(value))) if value == state.auth.api_key => Ok(()),
        _ => Err(ServerError::Unauthorized("invalid api key".to_string())),
    }
}

fn chat_client(state: &ServerState) -> Result<&ChatClient, ServerError> {
    state
        .integrations
        .chat
        .as_ref()
        .ok_or_else(|| ServerError::Internal("chat notifications are not configured".to_string()))
}

fn pending_digest(rows: &[ApproveListRow]) -> String {
    let mut message = format!(
        "Daily reminder: {} approval(s) waiting for review",
        rows.len()
    );
    for row in rows {
        let submitter = row
            .user
            .as_ref()
            .map(User::full_name)
            .unwrap_or_else(|| "unknown".to_string());
        message.push_str(&format!("\n- {} ({submitter})", row.approve_list.title));
    }
    message
}

fn summary_digest(net_amount: i64, pending_approvals: u64, pending_transactions: u64) -> String {
    format!(
        "Daily summary\nNet amount: {net_amount}\nPending approvals: {pending_approvals}\nPending transactions: {pending_transactions}"
    )
}

/// Pushes the list of requests still waiting for a decision to the
/// chat webhook. Nothing pending means nothing is sent.
pub async fn pending_approvals(
    api_key: Option<TypedHeader<ApiKeyHeader>>,
    State(state): State<ServerState>,
) -> Result<Json<Envelope<()>>, ServerError> {
    require_api_key(&state, api_key)?;

    let pending = state.engine.pending_approve_lists().await?;
    if pending.is_empty() {
        return Ok(Json(Envelope::message("no pending approvals")));
    }

    let chat = chat_client(&state)?;
    chat.send_message(&pending_digest(&pending)).await?;

    Ok(Json(Envelope::message(format!(
        "notified {} pending approval(s)",
        pending.len()
    ))))
}

/// Pushes the balance and the pending workload to the chat webhook.
pub async fn daily_summary(
    api_key: Option<TypedHeader<ApiKeyHeader>>,
    State(state): State<ServerState>,
) -> Result<Json<Envelope<()>>, ServerError> {
    require_api_key(&state, api_key)?;

    let net_amount = state.engine.net_amount().await?;
    let pending_approvals = state.engine.pending_approve_lists().await?.len() as u64;
    let filter = TransactionFilter {
        status_approve_id: Some(engine::PENDING),
        ..Default::default()
    };
    let (_, pending_transactions) = state.engine.list_transactions(1, 1, &filter).await?;

    let chat = chat_client(&state)?;
    chat.send_message(&summary_digest(
        net_amount.amount,
        pending_approvals,
        pending_transactions,
    ))
    .await?;

    Ok(Json(Envelope::message("daily summary sent")))
}
