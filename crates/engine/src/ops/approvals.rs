use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveValue, Condition, DatabaseTransaction, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use super::{ConfigRow, Engine, normalize_optional_text, normalize_required_name, with_tx};
use crate::{
    ApproveList, CreateApproveListCmd, EngineError, PENDING, ResultEngine, StatusApprove,
    UpdateApproveListCmd, User, approve_lists, configs, status_approves, users,
};

/// Filters for approval request listings.
#[derive(Clone, Debug, Default)]
pub struct ApproveListFilter {
    pub user_id: Option<Uuid>,
    pub status_approve_id: Option<i32>,
    pub config_id: Option<Uuid>,
    /// Substring match over title, detail and url.
    pub search: Option<String>,
}

/// An approval request joined with its status, config and owner.
#[derive(Clone, Debug, PartialEq)]
pub struct ApproveListRow {
    pub approve_list: ApproveList,
    pub status_approve: Option<StatusApprove>,
    pub config: Option<ConfigRow>,
    pub user: Option<User>,
}

/// Callback target for pushing a decision back to the origin system.
/// The caller appends `id_from` to `api_path` to form the request URL.
#[derive(Clone, Debug, PartialEq)]
pub struct OriginUpdate {
    pub api_path: String,
    pub id_from: String,
    pub status_approve_id: i32,
    pub comment: Option<String>,
}

impl Engine {
    /// Adds a new approval status beside the seeded ones.
    pub async fn create_status_approve(&self, name: &str) -> ResultEngine<StatusApprove> {
        let name = normalize_required_name(name, "status name")?;

        with_tx!(self, |db_tx| {
            let now = Utc::now();
            let model = status_approves::ActiveModel {
                id: ActiveValue::NotSet,
                name: ActiveValue::Set(name),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
            };
            let inserted = model.insert(&db_tx).await?;
            Ok(StatusApprove::from(inserted))
        })
    }

    /// Records an approval request, typically submitted by an external
    /// system. Referenced status, config and user must exist.
    pub async fn create_approve_list(
        &self,
        cmd: CreateApproveListCmd,
    ) -> ResultEngine<ApproveListRow> {
        let url = normalize_required_name(&cmd.url, "url")?;
        let title = normalize_required_name(&cmd.title, "title")?;
        let detail = normalize_required_name(&cmd.detail, "detail")?;

        with_tx!(self, |db_tx| {
            let status_approve_id = cmd.status_approve_id.unwrap_or(PENDING);
            self.require_status_approve(&db_tx, status_approve_id)
                .await?;
            if let Some(config_id) = cmd.config_id {
                self.require_config(&db_tx, config_id.to_string()).await?;
            }
            if let Some(user_id) = cmd.user_id {
                self.require_user(&db_tx, user_id.to_string()).await?;
            }
            let mut approve_list = ApproveList::new(url, title, detail);
            approve_list.comment = normalize_optional_text(cmd.comment.as_deref());
            approve_list.id_from = normalize_optional_text(cmd.id_from.as_deref());
            approve_list.api_path = normalize_optional_text(cmd.api_path.as_deref());
            approve_list.status_approve_id = status_approve_id;
            approve_list.config_id = cmd.config_id;
            approve_list.user_id = cmd.user_id;
            let model = approve_lists::ActiveModel::from(&approve_list)
                .insert(&db_tx)
                .await?;
            self.approve_list_row(&db_tx, model).await
        })
    }

    /// Approval requests matching `filter`, newest first, with the
    /// overall count.
    pub async fn list_approve_lists(
        &self,
        page: u64,
        size: u64,
        filter: &ApproveListFilter,
    ) -> ResultEngine<(Vec<ApproveListRow>, u64)> {
        with_tx!(self, |db_tx| {
            let mut query = approve_lists::Entity::find();
            if let Some(user_id) = filter.user_id {
                query = query.filter(approve_lists::Column::UserId.eq(user_id.to_string()));
            }
            if let Some(status_approve_id) = filter.status_approve_id {
                query = query.filter(approve_lists::Column::StatusApproveId.eq(status_approve_id));
            }
            if let Some(config_id) = filter.config_id {
                query = query.filter(approve_lists::Column::ConfigId.eq(config_id.to_string()));
            }
            if let Some(search) = filter.search.as_deref() {
                query = query.filter(
                    Condition::any()
                        .add(approve_lists::Column::Title.contains(search))
                        .add(approve_lists::Column::Detail.contains(search))
                        .add(approve_lists::Column::Url.contains(search)),
                );
            }
            let total = query.clone().count(&db_tx).await?;
            let models = query
                .order_by_desc(approve_lists::Column::CreatedAt)
                .order_by_desc(approve_lists::Column::Id)
                .offset(page.saturating_sub(1) * size)
                .limit(size)
                .all(&db_tx)
                .await?;
            let rows = self.approve_list_rows(&db_tx, models).await?;
            Ok((rows, total))
        })
    }

    /// Approval requests owned by one user, newest first.
    pub async fn list_approve_lists_for_user(
        &self,
        user_id: Uuid,
        page: u64,
        size: u64,
    ) -> ResultEngine<(Vec<ApproveListRow>, u64)> {
        let filter = ApproveListFilter {
            user_id: Some(user_id),
            ..Default::default()
        };
        self.list_approve_lists(page, size, &filter).await
    }

    pub async fn approve_list_detail(&self, approve_list_id: Uuid) -> ResultEngine<ApproveListRow> {
        with_tx!(self, |db_tx| {
            let model = approve_lists::Entity::find_by_id(approve_list_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(approve_list_id.to_string()))?;
            self.approve_list_row(&db_tx, model).await
        })
    }

    /// Applies a decision to an approval request. Only the comment and
    /// the status are stored; `api_path` and `id_from` in the command
    /// merely override the callback target returned alongside the row.
    pub async fn update_approve_list(
        &self,
        cmd: UpdateApproveListCmd,
    ) -> ResultEngine<(ApproveListRow, Option<OriginUpdate>)> {
        with_tx!(self, |db_tx| {
            let model = approve_lists::Entity::find_by_id(cmd.approve_list_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(cmd.approve_list_id.to_string()))?;
            let status_approve_id = match cmd.status_approve_id {
                Some(id) => {
                    self.require_status_approve(&db_tx, id).await?;
                    id
                }
                None => model.status_approve_id,
            };
            let comment = match cmd.comment.as_deref() {
                Some(comment) => normalize_optional_text(Some(comment)),
                None => model.comment.clone(),
            };
            let update = approve_lists::ActiveModel {
                id: ActiveValue::Set(model.id.clone()),
                comment: ActiveValue::Set(comment),
                status_approve_id: ActiveValue::Set(status_approve_id),
                updated_at: ActiveValue::Set(Utc::now()),
                ..Default::default()
            };
            let updated = update.update(&db_tx).await?;
            let origin = origin_update(&cmd, &updated);
            let row = self.approve_list_row(&db_tx, updated).await?;
            Ok((row, origin))
        })
    }

    pub async fn delete_approve_list(&self, approve_list_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let result = approve_lists::Entity::delete_by_id(approve_list_id.to_string())
                .exec(&db_tx)
                .await?;
            if result.rows_affected == 0 {
                return Err(EngineError::KeyNotFound(approve_list_id.to_string()));
            }
            Ok(())
        })
    }

    /// Requests still waiting for a decision, oldest first. Used by
    /// the notification digests.
    pub async fn pending_approve_lists(&self) -> ResultEngine<Vec<ApproveListRow>> {
        with_tx!(self, |db_tx| {
            let models = approve_lists::Entity::find()
                .filter(approve_lists::Column::StatusApproveId.eq(PENDING))
                .order_by_asc(approve_lists::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            self.approve_list_rows(&db_tx, models).await
        })
    }

    async fn approve_list_row(
        &self,
        db: &DatabaseTransaction,
        model: approve_lists::Model,
    ) -> ResultEngine<ApproveListRow> {
        let key = model.id.clone();
        self.approve_list_rows(db, vec![model])
            .await?
            .pop()
            .ok_or(EngineError::KeyNotFound(key))
    }

    async fn approve_list_rows(
        &self,
        db: &DatabaseTransaction,
        models: Vec<approve_lists::Model>,
    ) -> ResultEngine<Vec<ApproveListRow>> {
        let status_ids: Vec<i32> = models.iter().map(|model| model.status_approve_id).collect();
        let mut statuses = HashMap::new();
        if !status_ids.is_empty() {
            for model in status_approves::Entity::find()
                .filter(status_approves::Column::Id.is_in(status_ids))
                .all(db)
                .await?
            {
                statuses.insert(model.id, StatusApprove::from(model));
            }
        }

        let config_ids: Vec<String> = models
            .iter()
            .filter_map(|model| model.config_id.clone())
            .collect();
        let mut config_rows = HashMap::new();
        if !config_ids.is_empty() {
            let config_models = configs::Entity::find()
                .filter(configs::Column::Id.is_in(config_ids))
                .all(db)
                .await?;
            for row in self.config_rows(db, config_models).await? {
                config_rows.insert(row.config.id, row);
            }
        }

        let user_ids: Vec<String> = models
            .iter()
            .filter_map(|model| model.user_id.clone())
            .collect();
        let mut users_by_id = HashMap::new();
        if !user_ids.is_empty() {
            for model in users::Entity::find()
                .filter(users::Column::Id.is_in(user_ids))
                .all(db)
                .await?
            {
                let user = User::try_from(model)?;
                users_by_id.insert(user.id, user);
            }
        }

        let mut rows = Vec::with_capacity(models.len());
        for model in models {
            let approve_list = ApproveList::try_from(model)?;
            let status_approve = statuses.get(&approve_list.status_approve_id).cloned();
            let config = approve_list
                .config_id
                .and_then(|id| config_rows.get(&id).cloned());
            let user = approve_list
                .user_id
                .and_then(|id| users_by_id.get(&id).cloned());
            rows.push(ApproveListRow {
                approve_list,
                status_approve,
                config,
                user,
            });
        }
        Ok(rows)
    }
}

/// Resolves the callback target: values in the request win, stored
/// ones fill the gaps. Without both parts there is no callback.
fn origin_update(
    cmd: &UpdateApproveListCmd,
    model: &approve_lists::Model,
) -> Option<OriginUpdate> {
    let api_path =
        normalize_optional_text(cmd.api_path.as_deref()).or_else(|| model.api_path.clone());
    let id_from = normalize_optional_text(cmd.id_from.as_deref()).or_else(|| model.id_from.clone());
    match (api_path, id_from) {
        (Some(api_path), Some(id_from)) => Some(OriginUpdate {
            api_path,
            id_from,
            status_approve_id: model.status_approve_id,
            comment: model.comment.clone(),
        }),
        _ => None,
    }
}
