//! Config and config-type endpoints.

use api_types::{
    Envelope, PageEnvelope, Pagination,
    config::{ConfigCreate, ConfigQuery, ConfigTypeCreate, ConfigTypeView, ConfigUpdate, ConfigView},
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, views};
use engine::{ConfigFilter, User};

pub async fn list_types(
    Extension(_user): Extension<User>,
    State(state): State<ServerState>,
) -> Result<Json<Envelope<Vec<ConfigTypeView>>>, ServerError> {
    let types = state.engine.list_config_types().await?;
    let data = types.into_iter().map(views::config_type_view).collect();

    Ok(Json(Envelope::data(data)))
}

pub async fn type_new(
    Extension(_user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<ConfigTypeCreate>,
) -> Result<(StatusCode, Json<Envelope<ConfigTypeView>>), ServerError> {
    let config_type = state.engine.create_config_type(&payload.name).await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::data(views::config_type_view(config_type))),
    ))
}

pub async fn list(
    Extension(_user): Extension<User>,
    State(state): State<ServerState>,
    Query(query): Query<ConfigQuery>,
) -> Result<Json<PageEnvelope<ConfigView>>, ServerError> {
    let page = query.page_query().page();
    let size = query.page_query().size();
    let filter = ConfigFilter {
        search: query.search,
    };
    let (rows, total) = state.engine.list_configs(page, size, &filter).await?;
    let data = rows.into_iter().map(views::config_view).collect();

    Ok(Json(PageEnvelope::new(data, Pagination::new(page, size, total))))
}

pub async fn create(
    Extension(_user): Extension<User>,
    State(state): State<ServerState>,
    Json(payload): Json<ConfigCreate>,
) -> Result<(StatusCode, Json<Envelope<ConfigView>>), ServerError> {
    let row = state
        .engine
        .create_config(&payload.name, payload.config_type_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::data(views::config_view(row))),
    ))
}

pub async fn detail(
    Extension(_user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<ConfigView>>, ServerError> {
    let row = state.engine.config_detail(id).await?;

    Ok(Json(Envelope::data(views::config_view(row))))
}

pub async fn update(
    Extension(_user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ConfigUpdate>,
) -> Result<Json<Envelope<ConfigView>>, ServerError> {
    let row = state
        .engine
        .update_config(id, payload.name.as_deref(), payload.config_type_id)
        .await?;

    Ok(Json(Envelope::data(views::config_view(row))))
}

pub async fn remove(
    Extension(_user): Extension<User>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<()>>, ServerError> {
    state.engine.delete_config(id).await?;

    Ok(Json(Envelope::message("config deleted")))
}
