use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{EngineError, status_approves};

/// Database row for an approval request.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "approve_lists")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub url: String,
    pub title: String,
    pub detail: String,
    pub comment: Option<String>,
    pub id_from: Option<String>,
    pub api_path: Option<String>,
    pub status_approve_id: i32,
    pub config_id: Option<String>,
    pub user_id: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// An approval request, usually submitted by an external system.
///
/// `id_from` is the record id on the origin system and `api_path` the
/// base URL to push the decision back to. Both stay optional; a request
/// without them never triggers a callback.
#[derive(Clone, Debug, PartialEq)]
pub struct ApproveList {
    pub id: Uuid,
    pub url: String,
    pub title: String,
    pub detail: String,
    pub comment: Option<String>,
    pub id_from: Option<String>,
    pub api_path: Option<String>,
    pub status_approve_id: i32,
    pub config_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ApproveList {
    #[must_use]
    pub fn new(url: String, title: String, detail: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            url,
            title,
            detail,
            comment: None,
            id_from: None,
            api_path: None,
            status_approve_id: status_approves::PENDING,
            config_id: None,
            user_id: None,
            created_at: now,
            updated_at: now,
        }
    }
}

impl From<&ApproveList> for ActiveModel {
    fn from(approve_list: &ApproveList) -> Self {
        Self {
            id: ActiveValue::Set(approve_list.id.to_string()),
            url: ActiveValue::Set(approve_list.url.clone()),
            title: ActiveValue::Set(approve_list.title.clone()),
            detail: ActiveValue::Set(approve_list.detail.clone()),
            comment: ActiveValue::Set(approve_list.comment.clone()),
            id_from: ActiveValue::Set(approve_list.id_from.clone()),
            api_path: ActiveValue::Set(approve_list.api_path.clone()),
            status_approve_id: ActiveValue::Set(approve_list.status_approve_id),
            config_id: ActiveValue::Set(approve_list.config_id.map(|id| id.to_string())),
            user_id: ActiveValue::Set(approve_list.user_id.map(|id| id.to_string())),
            created_at: ActiveValue::Set(approve_list.created_at),
            updated_at: ActiveValue::Set(approve_list.updated_at),
        }
    }
}

impl TryFrom<Model> for ApproveList {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound(model.id.clone()))?,
            url: model.url,
            title: model.title,
            detail: model.detail,
            comment: model.comment,
            id_from: model.id_from,
            api_path: model.api_path,
            status_approve_id: model.status_approve_id,
            config_id: parse_optional_id(model.config_id.as_deref())?,
            user_id: parse_optional_id(model.user_id.as_deref())?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

fn parse_optional_id(value: Option<&str>) -> Result<Option<Uuid>, EngineError> {
    value
        .map(|raw| Uuid::parse_str(raw).map_err(|_| EngineError::KeyNotFound(raw.to_string())))
        .transpose()
}
