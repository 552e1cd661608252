//! Net amount endpoints.

use api_types::{
    Envelope, PageEnvelope, PageQuery, Pagination,
    ledger::{HistoryNetAmountView, NetAmountSet, NetAmountView},
};
use axum::{
    Extension, Json,
    extract::{Query, State},
};

use crate::{ServerError, server::ServerState, views};
use engine::User;

pub async fn get(
    Extension(_user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<Envelope<NetAmountView>>, ServerError> {
    let net_amount = state.engine.net_amount().await?;

    Ok(Json(Envelope::data(views::net_amount_view(net_amount))))
}

pub async fn set(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<NetAmountSet>,
) -> Result<Json<Envelope<NetAmountView>>, ServerError> {
    let net_amount = state.engine.set_net_amount(user.id, payload.amount).await?;

    Ok(Json(Envelope::data(views::net_amount_view(net_amount))))
}

pub async fn history(
    Extension(_user): Extension<User>,
    State(state): State<ServerState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PageEnvelope<HistoryNetAmountView>>, ServerError> {
    let page = query.page();
    let size = query.size();
    let (snapshots, total) = state.engine.net_amount_history(page, size).await?;
    let data = snapshots.into_iter().map(views::history_view).collect();

    Ok(Json(PageEnvelope::new(data, Pagination::new(page, size, total))))
}
