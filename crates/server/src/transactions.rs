//! Transaction endpoints. Writes move the net amount right away; the
//! approve step only records the decision.

use api_types::{
    Envelope, PageEnvelope, Pagination,
    transaction::{
        TransactionApprove, TransactionCreate, TransactionQuery, TransactionUpdate,
        TransactionView,
    },
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, views};
use engine::{
    CreateTransactionCmd, TransactionFileNew, TransactionFilter, TransactionItemNew,
    UpdateTransactionCmd, User,
};

pub async fn list(
    Extension(_user): Extension<User>,
    State(state): State<ServerState>,
    Query(query): Query<TransactionQuery>,
) -> Result<Json<PageEnvelope<TransactionView>>, ServerError> {
    let page = query.page_query().page();
    let size = query.page_query().size();
    let filter = TransactionFilter {
        status_approve_id: query.status_approve_id,
        created_by: query.created_by,
        kind: query.kind.map(views::kind_to_engine),
        search: query.search,
    };
    let (rows, total) = state.engine.list_transactions(page, size, &filter).await?;
    let data = rows.into_iter().map(views::transaction_view).collect();

    Ok(Json(PageEnvelope::new(data, Pagination::new(page, size, total))))
}

pub async fn create(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<TransactionCreate>,
) -> Result<(StatusCode, Json<Envelope<TransactionView>>), ServerError> {
    let mut cmd = CreateTransactionCmd::new(
        payload.title,
        views::kind_to_engine(payload.kind),
        user.id,
    );
    if let Some(note) = payload.note {
        cmd = cmd.note(note);
    }
    cmd = cmd.items(
        payload
            .items
            .into_iter()
            .map(|item| TransactionItemNew::new(item.name, item.amount))
            .collect(),
    );
    cmd = cmd.files(
        payload
            .files
            .into_iter()
            .map(|file| TransactionFileNew::new(file.url, file.public_id))
            .collect(),
    );
    let row = state.engine.create_transaction(cmd).await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::data(views::transaction_view(row))),
    ))
}

pub async fn detail(
    Extension(_user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<TransactionView>>, ServerError> {
    let row = state.engine.transaction_detail(id).await?;

    Ok(Json(Envelope::data(views::transaction_view(row))))
}

pub async fn update(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransactionUpdate>,
) -> Result<Json<Envelope<TransactionView>>, ServerError> {
    let mut cmd = UpdateTransactionCmd::new(
        id,
        user.id,
        payload.title,
        views::kind_to_engine(payload.kind),
    );
    if let Some(note) = payload.note {
        cmd = cmd.note(note);
    }
    cmd = cmd.items(
        payload
            .items
            .into_iter()
            .map(|item| TransactionItemNew::new(item.name, item.amount))
            .collect(),
    );
    cmd = cmd.files(
        payload
            .files
            .into_iter()
            .map(|file| TransactionFileNew::new(file.url, file.public_id))
            .collect(),
    );
    let row = state.engine.update_transaction(cmd).await?;

    Ok(Json(Envelope::data(views::transaction_view(row))))
}

pub async fn approve(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransactionApprove>,
) -> Result<Json<Envelope<TransactionView>>, ServerError> {
    let row = state
        .engine
        .approve_transaction(id, user.id, payload.status_approve_id)
        .await?;

    Ok(Json(Envelope::data(views::transaction_view(row))))
}

pub async fn remove(
    Extension(user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<()>>, ServerError> {
    state.engine.delete_transaction(id, user.id).await?;

    Ok(Json(Envelope::message("transaction deleted")))
}
