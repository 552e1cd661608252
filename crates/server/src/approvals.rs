//! Approval request endpoints, including the open intake used by the
//! origin systems.

use api_types::{
    Envelope, PageEnvelope, PageQuery, Pagination,
    approval::{
        ApproveListCreate, ApproveListQuery, ApproveListUpdate, ApproveListView,
        StatusApproveCreate, StatusApproveView,
    },
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, views};
use engine::{ApproveListFilter, CreateApproveListCmd, UpdateApproveListCmd, User};

/// Open endpoint; the origin system authenticates with the api key in
/// the request body.
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ApproveListCreate>,
) -> Result<(StatusCode, Json<Envelope<ApproveListView>>), ServerError> {
    if payload.api_key != state.auth.api_key {
        return Err(ServerError::Generic("invalid api key".to_string()));
    }

    let mut cmd = CreateApproveListCmd::new(payload.url, payload.title, payload.detail);
    if let Some(comment) = payload.comment {
        cmd = cmd.comment(comment);
    }
    if let Some(id_from) = payload.id_from {
        cmd = cmd.id_from(id_from);
    }
    if let Some(api_path) = payload.api_path {
        cmd = cmd.api_path(api_path);
    }
    if let Some(status_approve_id) = payload.status_approve_id {
        cmd = cmd.status_approve_id(status_approve_id);
    }
    if let Some(config_id) = payload.config_id {
        cmd = cmd.config_id(config_id);
    }
    if let Some(user_id) = payload.user_id {
        cmd = cmd.user_id(user_id);
    }
    let row = state.engine.create_approve_list(cmd).await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::data(views::approve_list_view(row))),
    ))
}

pub async fn list(
    Extension(_user): Extension<User>,
    State(state): State<ServerState>,
    Query(query): Query<ApproveListQuery>,
) -> Result<Json<PageEnvelope<ApproveListView>>, ServerError> {
    let page = query.page_query().page();
    let size = query.page_query().size();
    let filter = ApproveListFilter {
        user_id: query.user_id,
        status_approve_id: query.status_approve_id,
        config_id: query.config_id,
        search: query.search,
    };
    let (rows, total) = state.engine.list_approve_lists(page, size, &filter).await?;
    let data = rows.into_iter().map(views::approve_list_view).collect();

    Ok(Json(PageEnvelope::new(data, Pagination::new(page, size, total))))
}

pub async fn list_for_user(
    Extension(_user): Extension<User>,
    State(state): State<ServerState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PageEnvelope<ApproveListView>>, ServerError> {
    let page = query.page();
    let size = query.size();
    let (rows, total) = state
        .engine
        .list_approve_lists_for_user(user_id, page, size)
        .await?;
    let data = rows.into_iter().map(views::approve_list_view).collect();

    Ok(Json(PageEnvelope::new(data, Pagination::new(page, size, total))))
}

pub async fn detail(
    Extension(_user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<ApproveListView>>, ServerError> {
    let row = state.engine.approve_list_detail(id).await?;

    Ok(Json(Envelope::data(views::approve_list_view(row))))
}

/// Stores the decision, then pushes it to the origin system when a
/// callback target is known. A failing callback never rolls back the
/// decision.
pub async fn update(
    Extension(_user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ApproveListUpdate>,
) -> Result<Json<Envelope<ApproveListView>>, ServerError> {
    let mut cmd = UpdateApproveListCmd::new(id);
    if let Some(comment) = payload.comment {
        cmd = cmd.comment(comment);
    }
    if let Some(status_approve_id) = payload.status_approve_id {
        cmd = cmd.status_approve_id(status_approve_id);
    }
    if let Some(api_path) = payload.api_path {
        cmd = cmd.api_path(api_path);
    }
    if let Some(id_from) = payload.id_from {
        cmd = cmd.id_from(id_from);
    }
    let (row, origin) = state.engine.update_approve_list(cmd).await?;

    if let Some(origin) = origin {
        if let Err(err) = state
            .integrations
            .origin
            .push_status(
                &origin.api_path,
                &origin.id_from,
                origin.status_approve_id,
                origin.comment.as_deref(),
            )
            .await
        {
            tracing::warn!("origin status callback failed: {err}");
        }
    }

    Ok(Json(Envelope::data(views::approve_list_view(row))))
}

pub async fn remove(
    Extension(_user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<()>>, ServerError> {
    state.engine.delete_approve_list(id).await?;

    Ok(Json(Envelope::message("approve list deleted")))
}

pub async fn status_new(
    Extension(_user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<StatusApproveCreate>,
) -> Result<(StatusCode, Json<Envelope<StatusApproveView>>), ServerError> {
    let status = state.engine.create_status_approve(&payload.name).await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::data(views::status_view(status))),
    ))
}
